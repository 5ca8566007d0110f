//! a2xx instruction word layouts
//!
//! Every quantum is three little-endian dwords. CF entries are 48 bits wide
//! and packed two per quantum; ALU and fetch instructions fill a quantum
//! each. Field positions follow the hardware bitfield order, LSB first.

#[inline]
fn put(word: &mut u32, shift: u32, width: u32, value: u32) {
    let mask = (1u32 << width) - 1;
    *word |= (value & mask) << shift;
}

#[inline]
fn get(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & ((1u32 << width) - 1)
}

#[inline]
fn put64(word: &mut u64, shift: u32, width: u32, value: u32) {
    let mask = (1u64 << width) - 1;
    *word |= (value as u64 & mask) << shift;
}

#[inline]
fn get64(word: u64, shift: u32, width: u32) -> u32 {
    ((word >> shift) & ((1u64 << width) - 1)) as u32
}

//=============================================================================
// CONTROL FLOW
//=============================================================================

/// Buffer select values of an ALLOC
pub const SQ_NO_ALLOC: u32 = 0;
pub const SQ_POSITION: u32 = 1;
pub const SQ_PARAMETER_PIXEL: u32 = 2;
pub const SQ_MEMORY: u32 = 3;

/// CF opcode of a raw 48-bit CF word (bits 44-47)
pub fn cf_opcode(raw: u64) -> u8 {
    get64(raw, 44, 4) as u8
}

/// EXEC / EXEC_END CF word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecCfWord {
    pub address: u32,        // bits 0-8
    pub count: u32,          // bits 12-14
    pub yield_: bool,        // bit 15
    pub serialize: u32,      // bits 16-27
    pub vc: u32,             // bits 28-33
    pub bool_addr: u32,      // bits 34-41
    pub condition: bool,     // bit 42
    pub absolute_addr: bool, // bit 43
    pub opc: u8,             // bits 44-47
}

impl ExecCfWord {
    pub fn encode(&self) -> u64 {
        let mut raw = 0u64;
        put64(&mut raw, 0, 9, self.address);
        put64(&mut raw, 12, 3, self.count);
        put64(&mut raw, 15, 1, self.yield_ as u32);
        put64(&mut raw, 16, 12, self.serialize);
        put64(&mut raw, 28, 6, self.vc);
        put64(&mut raw, 34, 8, self.bool_addr);
        put64(&mut raw, 42, 1, self.condition as u32);
        put64(&mut raw, 43, 1, self.absolute_addr as u32);
        put64(&mut raw, 44, 4, self.opc as u32);
        raw
    }

    pub fn decode(raw: u64) -> Self {
        Self {
            address: get64(raw, 0, 9),
            count: get64(raw, 12, 3),
            yield_: get64(raw, 15, 1) != 0,
            serialize: get64(raw, 16, 12),
            vc: get64(raw, 28, 6),
            bool_addr: get64(raw, 34, 8),
            condition: get64(raw, 42, 1) != 0,
            absolute_addr: get64(raw, 43, 1) != 0,
            opc: cf_opcode(raw),
        }
    }
}

/// ALLOC CF word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocCfWord {
    pub size: u32,          // bits 0-3
    pub no_serial: bool,    // bit 40
    pub buffer_select: u32, // bits 41-42
    pub alloc_mode: bool,   // bit 43
    pub opc: u8,            // bits 44-47
}

impl AllocCfWord {
    pub fn encode(&self) -> u64 {
        let mut raw = 0u64;
        put64(&mut raw, 0, 4, self.size);
        put64(&mut raw, 40, 1, self.no_serial as u32);
        put64(&mut raw, 41, 2, self.buffer_select);
        put64(&mut raw, 43, 1, self.alloc_mode as u32);
        put64(&mut raw, 44, 4, self.opc as u32);
        raw
    }

    pub fn decode(raw: u64) -> Self {
        Self {
            size: get64(raw, 0, 4),
            no_serial: get64(raw, 40, 1) != 0,
            buffer_select: get64(raw, 41, 2),
            alloc_mode: get64(raw, 43, 1) != 0,
            opc: cf_opcode(raw),
        }
    }
}

/// Pack two 48-bit CF words into one quantum
pub fn pack_cf_pair(first: u64, second: u64) -> [u32; 3] {
    let first = first & 0xffff_ffff_ffff;
    let second = second & 0xffff_ffff_ffff;
    [
        first as u32,
        ((first >> 32) as u32) | (((second & 0xffff) as u32) << 16),
        (second >> 16) as u32,
    ]
}

/// Split a CF quantum back into its two 48-bit words
pub fn unpack_cf_pair(words: [u32; 3]) -> (u64, u64) {
    let first = words[0] as u64 | ((words[1] as u64 & 0xffff) << 32);
    let second = (words[1] as u64 >> 16) | ((words[2] as u64) << 16);
    (first, second)
}

//=============================================================================
// ALU
//=============================================================================

/// ALU instruction (vector + scalar co-issue)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AluWord {
    // dword0
    pub vector_dest: u32,       // bits 0-5
    pub vector_dest_rel: bool,  // bit 6
    pub low_precision_16b_fp: bool, // bit 7
    pub scalar_dest: u32,       // bits 8-13
    pub scalar_dest_rel: bool,  // bit 14
    pub export_data: bool,      // bit 15
    pub vector_write_mask: u32, // bits 16-19
    pub scalar_write_mask: u32, // bits 20-23
    pub vector_clamp: bool,     // bit 24
    pub scalar_clamp: bool,     // bit 25
    pub scalar_opc: u32,        // bits 26-31
    // dword1
    pub src3_swiz: u32,         // bits 0-7
    pub src2_swiz: u32,         // bits 8-15
    pub src1_swiz: u32,         // bits 16-23
    pub src3_reg_negate: bool,  // bit 24
    pub src2_reg_negate: bool,  // bit 25
    pub src1_reg_negate: bool,  // bit 26
    pub pred_select: u32,       // bits 27-28
    pub relative_addr: bool,    // bit 29
    pub const_1_rel_abs: bool,  // bit 30
    pub const_0_rel_abs: bool,  // bit 31
    // dword2
    pub src3_reg: u32,          // bits 0-5
    pub src3_reg_select: bool,  // bit 6
    pub src3_reg_abs: bool,     // bit 7
    pub src2_reg: u32,          // bits 8-13
    pub src2_reg_select: bool,  // bit 14
    pub src2_reg_abs: bool,     // bit 15
    pub src1_reg: u32,          // bits 16-21
    pub src1_reg_select: bool,  // bit 22
    pub src1_reg_abs: bool,     // bit 23
    pub vector_opc: u32,        // bits 24-28
    /// Register bank select: set for GPRs, clear for constants
    pub src3_sel: bool,         // bit 29
    pub src2_sel: bool,         // bit 30
    pub src1_sel: bool,         // bit 31
}

impl AluWord {
    pub fn encode(&self) -> [u32; 3] {
        let mut w = [0u32; 3];

        put(&mut w[0], 0, 6, self.vector_dest);
        put(&mut w[0], 6, 1, self.vector_dest_rel as u32);
        put(&mut w[0], 7, 1, self.low_precision_16b_fp as u32);
        put(&mut w[0], 8, 6, self.scalar_dest);
        put(&mut w[0], 14, 1, self.scalar_dest_rel as u32);
        put(&mut w[0], 15, 1, self.export_data as u32);
        put(&mut w[0], 16, 4, self.vector_write_mask);
        put(&mut w[0], 20, 4, self.scalar_write_mask);
        put(&mut w[0], 24, 1, self.vector_clamp as u32);
        put(&mut w[0], 25, 1, self.scalar_clamp as u32);
        put(&mut w[0], 26, 6, self.scalar_opc);

        put(&mut w[1], 0, 8, self.src3_swiz);
        put(&mut w[1], 8, 8, self.src2_swiz);
        put(&mut w[1], 16, 8, self.src1_swiz);
        put(&mut w[1], 24, 1, self.src3_reg_negate as u32);
        put(&mut w[1], 25, 1, self.src2_reg_negate as u32);
        put(&mut w[1], 26, 1, self.src1_reg_negate as u32);
        put(&mut w[1], 27, 2, self.pred_select);
        put(&mut w[1], 29, 1, self.relative_addr as u32);
        put(&mut w[1], 30, 1, self.const_1_rel_abs as u32);
        put(&mut w[1], 31, 1, self.const_0_rel_abs as u32);

        put(&mut w[2], 0, 6, self.src3_reg);
        put(&mut w[2], 6, 1, self.src3_reg_select as u32);
        put(&mut w[2], 7, 1, self.src3_reg_abs as u32);
        put(&mut w[2], 8, 6, self.src2_reg);
        put(&mut w[2], 14, 1, self.src2_reg_select as u32);
        put(&mut w[2], 15, 1, self.src2_reg_abs as u32);
        put(&mut w[2], 16, 6, self.src1_reg);
        put(&mut w[2], 22, 1, self.src1_reg_select as u32);
        put(&mut w[2], 23, 1, self.src1_reg_abs as u32);
        put(&mut w[2], 24, 5, self.vector_opc);
        put(&mut w[2], 29, 1, self.src3_sel as u32);
        put(&mut w[2], 30, 1, self.src2_sel as u32);
        put(&mut w[2], 31, 1, self.src1_sel as u32);

        w
    }

    pub fn decode(w: [u32; 3]) -> Self {
        Self {
            vector_dest: get(w[0], 0, 6),
            vector_dest_rel: get(w[0], 6, 1) != 0,
            low_precision_16b_fp: get(w[0], 7, 1) != 0,
            scalar_dest: get(w[0], 8, 6),
            scalar_dest_rel: get(w[0], 14, 1) != 0,
            export_data: get(w[0], 15, 1) != 0,
            vector_write_mask: get(w[0], 16, 4),
            scalar_write_mask: get(w[0], 20, 4),
            vector_clamp: get(w[0], 24, 1) != 0,
            scalar_clamp: get(w[0], 25, 1) != 0,
            scalar_opc: get(w[0], 26, 6),

            src3_swiz: get(w[1], 0, 8),
            src2_swiz: get(w[1], 8, 8),
            src1_swiz: get(w[1], 16, 8),
            src3_reg_negate: get(w[1], 24, 1) != 0,
            src2_reg_negate: get(w[1], 25, 1) != 0,
            src1_reg_negate: get(w[1], 26, 1) != 0,
            pred_select: get(w[1], 27, 2),
            relative_addr: get(w[1], 29, 1) != 0,
            const_1_rel_abs: get(w[1], 30, 1) != 0,
            const_0_rel_abs: get(w[1], 31, 1) != 0,

            src3_reg: get(w[2], 0, 6),
            src3_reg_select: get(w[2], 6, 1) != 0,
            src3_reg_abs: get(w[2], 7, 1) != 0,
            src2_reg: get(w[2], 8, 6),
            src2_reg_select: get(w[2], 14, 1) != 0,
            src2_reg_abs: get(w[2], 15, 1) != 0,
            src1_reg: get(w[2], 16, 6),
            src1_reg_select: get(w[2], 22, 1) != 0,
            src1_reg_abs: get(w[2], 23, 1) != 0,
            vector_opc: get(w[2], 24, 5),
            src3_sel: get(w[2], 29, 1) != 0,
            src2_sel: get(w[2], 30, 1) != 0,
            src1_sel: get(w[2], 31, 1) != 0,
        }
    }
}

//=============================================================================
// FETCH
//=============================================================================

/// Texture filter: take the setting from the bound fetch constant
pub const TEX_FILTER_USE_FETCH_CONST: u32 = 3;
pub const ANISO_FILTER_USE_FETCH_CONST: u32 = 7;
pub const ARBITRARY_FILTER_USE_FETCH_CONST: u32 = 7;

/// Vertex fetch instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VtxFetchWord {
    // dword0
    pub opc: u32,              // bits 0-4
    pub src_reg: u32,          // bits 5-10
    pub src_reg_am: bool,      // bit 11
    pub dst_reg: u32,          // bits 12-17
    pub dst_reg_am: bool,      // bit 18
    pub must_be_one: bool,     // bit 19
    pub const_index: u32,      // bits 20-24
    pub const_index_sel: u32,  // bits 25-26
    pub reserved0: u32,        // bits 27-29
    pub src_swiz: u32,         // bits 30-31
    // dword1
    pub dst_swiz: u32,         // bits 0-11
    pub format_comp_all: bool, // bit 12
    pub num_format_all: bool,  // bit 13
    pub signed_rf_mode_all: bool, // bit 14
    pub format: u32,           // bits 16-21
    pub exp_adjust_all: u32,   // bits 23-29
    pub reserved3: bool,       // bit 30
    pub pred_select: bool,     // bit 31
    // dword2
    pub stride: u32,           // bits 0-7
    pub offset: u32,           // bits 8-15
    pub pred_condition: bool,  // bit 31
}

impl VtxFetchWord {
    pub fn encode(&self) -> [u32; 3] {
        let mut w = [0u32; 3];

        put(&mut w[0], 0, 5, self.opc);
        put(&mut w[0], 5, 6, self.src_reg);
        put(&mut w[0], 11, 1, self.src_reg_am as u32);
        put(&mut w[0], 12, 6, self.dst_reg);
        put(&mut w[0], 18, 1, self.dst_reg_am as u32);
        put(&mut w[0], 19, 1, self.must_be_one as u32);
        put(&mut w[0], 20, 5, self.const_index);
        put(&mut w[0], 25, 2, self.const_index_sel);
        put(&mut w[0], 27, 3, self.reserved0);
        put(&mut w[0], 30, 2, self.src_swiz);

        put(&mut w[1], 0, 12, self.dst_swiz);
        put(&mut w[1], 12, 1, self.format_comp_all as u32);
        put(&mut w[1], 13, 1, self.num_format_all as u32);
        put(&mut w[1], 14, 1, self.signed_rf_mode_all as u32);
        put(&mut w[1], 16, 6, self.format);
        put(&mut w[1], 23, 7, self.exp_adjust_all);
        put(&mut w[1], 30, 1, self.reserved3 as u32);
        put(&mut w[1], 31, 1, self.pred_select as u32);

        put(&mut w[2], 0, 8, self.stride);
        put(&mut w[2], 8, 8, self.offset);
        put(&mut w[2], 31, 1, self.pred_condition as u32);

        w
    }

    pub fn decode(w: [u32; 3]) -> Self {
        Self {
            opc: get(w[0], 0, 5),
            src_reg: get(w[0], 5, 6),
            src_reg_am: get(w[0], 11, 1) != 0,
            dst_reg: get(w[0], 12, 6),
            dst_reg_am: get(w[0], 18, 1) != 0,
            must_be_one: get(w[0], 19, 1) != 0,
            const_index: get(w[0], 20, 5),
            const_index_sel: get(w[0], 25, 2),
            reserved0: get(w[0], 27, 3),
            src_swiz: get(w[0], 30, 2),

            dst_swiz: get(w[1], 0, 12),
            format_comp_all: get(w[1], 12, 1) != 0,
            num_format_all: get(w[1], 13, 1) != 0,
            signed_rf_mode_all: get(w[1], 14, 1) != 0,
            format: get(w[1], 16, 6),
            exp_adjust_all: get(w[1], 23, 7),
            reserved3: get(w[1], 30, 1) != 0,
            pred_select: get(w[1], 31, 1) != 0,

            stride: get(w[2], 0, 8),
            offset: get(w[2], 8, 8),
            pred_condition: get(w[2], 31, 1) != 0,
        }
    }
}

/// Texture fetch instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexFetchWord {
    // dword0
    pub opc: u32,              // bits 0-4
    pub src_reg: u32,          // bits 5-10
    pub src_reg_am: bool,      // bit 11
    pub dst_reg: u32,          // bits 12-17
    pub dst_reg_am: bool,      // bit 18
    pub fetch_valid_only: bool, // bit 19
    pub const_idx: u32,        // bits 20-24
    pub tx_coord_denorm: bool, // bit 25
    pub src_swiz: u32,         // bits 26-31
    // dword1
    pub dst_swiz: u32,         // bits 0-11
    pub mag_filter: u32,       // bits 12-13
    pub min_filter: u32,       // bits 14-15
    pub mip_filter: u32,       // bits 16-17
    pub aniso_filter: u32,     // bits 18-20
    pub arbitrary_filter: u32, // bits 21-23
    pub vol_mag_filter: u32,   // bits 24-25
    pub vol_min_filter: u32,   // bits 26-27
    pub use_comp_lod: bool,    // bit 28
    pub use_reg_lod: bool,     // bit 29
    pub sample_location: bool, // bit 31
    // dword2
    pub use_reg_gradients: bool, // bit 0
    pub lod_bias: u32,         // bits 2-8
    pub pred_condition: bool,  // bit 31
}

impl TexFetchWord {
    pub fn encode(&self) -> [u32; 3] {
        let mut w = [0u32; 3];

        put(&mut w[0], 0, 5, self.opc);
        put(&mut w[0], 5, 6, self.src_reg);
        put(&mut w[0], 11, 1, self.src_reg_am as u32);
        put(&mut w[0], 12, 6, self.dst_reg);
        put(&mut w[0], 18, 1, self.dst_reg_am as u32);
        put(&mut w[0], 19, 1, self.fetch_valid_only as u32);
        put(&mut w[0], 20, 5, self.const_idx);
        put(&mut w[0], 25, 1, self.tx_coord_denorm as u32);
        put(&mut w[0], 26, 6, self.src_swiz);

        put(&mut w[1], 0, 12, self.dst_swiz);
        put(&mut w[1], 12, 2, self.mag_filter);
        put(&mut w[1], 14, 2, self.min_filter);
        put(&mut w[1], 16, 2, self.mip_filter);
        put(&mut w[1], 18, 3, self.aniso_filter);
        put(&mut w[1], 21, 3, self.arbitrary_filter);
        put(&mut w[1], 24, 2, self.vol_mag_filter);
        put(&mut w[1], 26, 2, self.vol_min_filter);
        put(&mut w[1], 28, 1, self.use_comp_lod as u32);
        put(&mut w[1], 29, 1, self.use_reg_lod as u32);
        put(&mut w[1], 31, 1, self.sample_location as u32);

        put(&mut w[2], 0, 1, self.use_reg_gradients as u32);
        put(&mut w[2], 2, 7, self.lod_bias);
        put(&mut w[2], 31, 1, self.pred_condition as u32);

        w
    }

    pub fn decode(w: [u32; 3]) -> Self {
        Self {
            opc: get(w[0], 0, 5),
            src_reg: get(w[0], 5, 6),
            src_reg_am: get(w[0], 11, 1) != 0,
            dst_reg: get(w[0], 12, 6),
            dst_reg_am: get(w[0], 18, 1) != 0,
            fetch_valid_only: get(w[0], 19, 1) != 0,
            const_idx: get(w[0], 20, 5),
            tx_coord_denorm: get(w[0], 25, 1) != 0,
            src_swiz: get(w[0], 26, 6),

            dst_swiz: get(w[1], 0, 12),
            mag_filter: get(w[1], 12, 2),
            min_filter: get(w[1], 14, 2),
            mip_filter: get(w[1], 16, 2),
            aniso_filter: get(w[1], 18, 3),
            arbitrary_filter: get(w[1], 21, 3),
            vol_mag_filter: get(w[1], 24, 2),
            vol_min_filter: get(w[1], 26, 2),
            use_comp_lod: get(w[1], 28, 1) != 0,
            use_reg_lod: get(w[1], 29, 1) != 0,
            sample_location: get(w[1], 31, 1) != 0,

            use_reg_gradients: get(w[2], 0, 1) != 0,
            lod_bias: get(w[2], 2, 7),
            pred_condition: get(w[2], 31, 1) != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cf_pair_packing() {
        let first = 0x2000_0001_1001u64; // EXEC_END addr=1 cnt=1 seq=1
        let second = 0u64;
        let words = pack_cf_pair(first, second);
        assert_eq!(words, [0x0001_1001, 0x0000_2000, 0x0000_0000]);
        assert_eq!(unpack_cf_pair(words), (first, second));
    }

    #[test]
    fn test_cf_pair_straddles_middle_word() {
        let second = 0xc000_0000_0005u64;
        let words = pack_cf_pair(0, second);
        assert_eq!(words[1], 0x0005_0000);
        assert_eq!(words[2], 0xc000_0000);
        assert_eq!(unpack_cf_pair(words).1, second);
    }

    #[test]
    fn test_exec_word_fields() {
        let word = ExecCfWord {
            address: 0x1f,
            count: 0x7,
            serialize: 0xabc,
            opc: 2,
            ..Default::default()
        };
        let raw = word.encode();
        assert_eq!(raw & 0x1ff, 0x1f);
        assert_eq!((raw >> 12) & 0x7, 0x7);
        assert_eq!((raw >> 16) & 0xfff, 0xabc);
        assert_eq!(cf_opcode(raw), 2);
        assert_eq!(ExecCfWord::decode(raw), word);
    }

    #[test]
    fn test_alloc_word_fields() {
        let word = AllocCfWord {
            size: 0xf,
            buffer_select: SQ_PARAMETER_PIXEL,
            opc: 12,
            ..Default::default()
        };
        let raw = word.encode();
        assert_eq!(raw, 0xc400_0000_000f);
        assert_eq!(AllocCfWord::decode(raw), word);
    }

    #[test]
    fn test_alu_word_field_positions() {
        let word = AluWord {
            vector_dest: 0x3f,
            export_data: true,
            scalar_opc: 5,
            src1_sel: true,
            vector_opc: 11,
            ..Default::default()
        };
        let w = word.encode();
        assert_eq!(w[0], 0x3f | (1 << 15) | (5 << 26));
        assert_eq!(w[1], 0);
        assert_eq!(w[2], (11 << 24) | (1 << 31));
        assert_eq!(AluWord::decode(w), word);
    }

    #[test]
    fn test_vtx_fetch_word_field_positions() {
        let word = VtxFetchWord {
            opc: 0,
            src_reg: 1,
            dst_reg: 2,
            must_be_one: true,
            const_index: 20,
            reserved0: 1,
            dst_swiz: 0x688,
            format: 0x39,
            stride: 12,
            ..Default::default()
        };
        let w = word.encode();
        assert_eq!(w[0], (1 << 5) | (2 << 12) | (1 << 19) | (20 << 20) | (1 << 27));
        assert_eq!(w[1], 0x688 | (0x39 << 16));
        assert_eq!(w[2], 12);
        assert_eq!(VtxFetchWord::decode(w), word);
    }

    #[test]
    fn test_tex_fetch_word_filters() {
        let word = TexFetchWord {
            opc: 1,
            mag_filter: TEX_FILTER_USE_FETCH_CONST,
            min_filter: TEX_FILTER_USE_FETCH_CONST,
            mip_filter: TEX_FILTER_USE_FETCH_CONST,
            aniso_filter: ANISO_FILTER_USE_FETCH_CONST,
            arbitrary_filter: ARBITRARY_FILTER_USE_FETCH_CONST,
            vol_mag_filter: TEX_FILTER_USE_FETCH_CONST,
            vol_min_filter: TEX_FILTER_USE_FETCH_CONST,
            use_comp_lod: true,
            ..Default::default()
        };
        let w = word.encode();
        assert_eq!(w[0], 1);
        assert_eq!(w[1], 0x1fff_f000);
        assert_eq!(TexFetchWord::decode(w), word);
    }
}
