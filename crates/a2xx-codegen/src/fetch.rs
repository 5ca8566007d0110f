//! FETCH instruction encoder
//!
//! Operands are `dst, src`. Neither may carry modifiers.

use a2xx_core::EncodeError;
use a2xx_ir::{FetchInstr, FetchOpcode, Register, Signedness};

use crate::cf::check_range;
use crate::isa::{
    TexFetchWord, VtxFetchWord, ANISO_FILTER_USE_FETCH_CONST, ARBITRARY_FILTER_USE_FETCH_CONST,
    TEX_FILTER_USE_FETCH_CONST,
};
use crate::stats::ShaderInfo;
use crate::swizzle;

const MAX_STRIDE: u32 = 0xff;
const MAX_FORMAT: u32 = 0x3f;
const MAX_CONST_IDX: u32 = 0x1f;
const MAX_CONST_IDX_SEL: u32 = 0x3;

fn check_plain(operand: &'static str, reg: &Register) -> Result<(), EncodeError> {
    if !reg.flags.is_empty() {
        return Err(EncodeError::InvalidFlagCombination {
            operand,
            flags: reg.flags.bits(),
        });
    }
    Ok(())
}

/// Encode one fetch instruction.
///
/// `idx` is the position of the instruction in the program's flat
/// instruction stream; vertex fetches mark whether they come first.
pub fn encode_fetch(
    fetch: &FetchInstr,
    operands: &[&Register],
    idx: usize,
    info: &mut ShaderInfo,
) -> Result<[u32; 3], EncodeError> {
    let [dst, src] = operands else {
        return Err(EncodeError::OperandCount {
            expected: 2,
            found: operands.len(),
        });
    };

    info.record(dst, true);
    info.record(src, false);

    check_plain("fetch destination", dst)?;
    check_plain("fetch source", src)?;

    match fetch.opc {
        FetchOpcode::Vertex => {
            check_range("stride", fetch.stride, MAX_STRIDE)?;
            check_range("format", fetch.fmt, MAX_FORMAT)?;
            check_range("const index", fetch.const_idx, MAX_CONST_IDX)?;
            check_range("const index select", fetch.const_idx_sel, MAX_CONST_IDX_SEL)?;

            let first = idx == 0;
            Ok(VtxFetchWord {
                opc: fetch.opc.hw() as u32,
                src_reg: src.num as u32,
                src_swiz: swizzle::fetch_src(src, 1)?,
                dst_reg: dst.num as u32,
                dst_swiz: swizzle::fetch_dst(dst)?,
                must_be_one: true,
                num_format_all: true,
                const_index: fetch.const_idx,
                const_index_sel: fetch.const_idx_sel,
                format_comp_all: fetch.sign == Signedness::Signed,
                format: fetch.fmt,
                stride: fetch.stride,
                // set on every fetch but the program's first
                reserved3: !first,
                reserved0: first as u32,
                ..Default::default()
            }
            .encode())
        }
        FetchOpcode::Sample => {
            check_range("const index", fetch.const_idx, MAX_CONST_IDX)?;

            Ok(TexFetchWord {
                opc: fetch.opc.hw() as u32,
                src_reg: src.num as u32,
                src_swiz: swizzle::fetch_src(src, 3)?,
                dst_reg: dst.num as u32,
                dst_swiz: swizzle::fetch_dst(dst)?,
                const_idx: fetch.const_idx,
                mag_filter: TEX_FILTER_USE_FETCH_CONST,
                min_filter: TEX_FILTER_USE_FETCH_CONST,
                mip_filter: TEX_FILTER_USE_FETCH_CONST,
                aniso_filter: ANISO_FILTER_USE_FETCH_CONST,
                arbitrary_filter: ARBITRARY_FILTER_USE_FETCH_CONST,
                vol_mag_filter: TEX_FILTER_USE_FETCH_CONST,
                vol_min_filter: TEX_FILTER_USE_FETCH_CONST,
                use_comp_lod: true,
                ..Default::default()
            }
            .encode())
        }
        other => Err(EncodeError::UnsupportedOpcode(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2xx_ir::RegFlags;

    fn reg(num: u8, swizzle: Option<&str>) -> Register {
        Register {
            num,
            swizzle: swizzle.map(str::to_string),
            flags: RegFlags::empty(),
        }
    }

    #[test]
    fn test_vertex_fetch() {
        let dst = reg(1, Some("xyz1"));
        let src = reg(0, Some("x"));
        let fetch = FetchInstr::vertex(0x39, 12, 20, Signedness::Signed);
        let mut info = ShaderInfo::new();

        let words = encode_fetch(&fetch, &[&dst, &src], 0, &mut info).unwrap();
        let word = VtxFetchWord::decode(words);

        assert_eq!(word.opc, 0);
        assert_eq!(word.dst_reg, 1);
        assert_eq!(word.dst_swiz, 0xa88);
        assert_eq!(word.src_reg, 0);
        assert_eq!(word.src_swiz, 0);
        assert!(word.must_be_one);
        assert!(word.num_format_all);
        assert!(word.format_comp_all);
        assert_eq!(word.format, 0x39);
        assert_eq!(word.stride, 12);
        assert_eq!(word.const_index, 20);
        assert_eq!(word.reserved0, 1);
        assert!(!word.reserved3);

        assert_eq!(info.regs_written, 0b10);
        assert_eq!(info.max_input_reg, 0);
    }

    #[test]
    fn test_vertex_marker_bits_after_first() {
        let dst = reg(1, None);
        let src = reg(0, Some("x"));
        let fetch = FetchInstr::vertex(0x39, 12, 20, Signedness::Unsigned);
        let mut info = ShaderInfo::new();

        let word = VtxFetchWord::decode(encode_fetch(&fetch, &[&dst, &src], 3, &mut info).unwrap());
        assert_eq!(word.reserved0, 0);
        assert!(word.reserved3);
        assert!(!word.format_comp_all);
        assert_eq!(word.dst_swiz, 0x688);
    }

    #[test]
    fn test_vertex_ranges() {
        let dst = reg(1, None);
        let src = reg(0, Some("x"));
        let mut info = ShaderInfo::new();

        let fetch = FetchInstr::vertex(0x39, 256, 20, Signedness::Unsigned);
        let err = encode_fetch(&fetch, &[&dst, &src], 0, &mut info).unwrap_err();
        assert_eq!(
            err,
            EncodeError::FieldRangeOverflow {
                field: "stride",
                value: 256,
                max: 255
            }
        );

        let fetch = FetchInstr::vertex(64, 4, 20, Signedness::Unsigned);
        assert!(encode_fetch(&fetch, &[&dst, &src], 0, &mut info).is_err());

        let fetch = FetchInstr::vertex(0x39, 4, 32, Signedness::Unsigned);
        assert!(encode_fetch(&fetch, &[&dst, &src], 0, &mut info).is_err());
    }

    #[test]
    fn test_sample_fetch() {
        let dst = reg(0, None);
        let src = reg(0, Some("xyx"));
        let fetch = FetchInstr::sample(3);
        let mut info = ShaderInfo::new();

        let words = encode_fetch(&fetch, &[&dst, &src], 1, &mut info).unwrap();
        let word = TexFetchWord::decode(words);

        assert_eq!(word.opc, 1);
        assert_eq!(word.src_swiz, 0x04);
        assert_eq!(word.dst_swiz, 0x688);
        assert_eq!(word.const_idx, 3);
        assert_eq!(word.mag_filter, TEX_FILTER_USE_FETCH_CONST);
        assert_eq!(word.aniso_filter, ANISO_FILTER_USE_FETCH_CONST);
        assert!(word.use_comp_lod);
        assert_eq!(words[2], 0);
    }

    #[test]
    fn test_sample_needs_three_lanes() {
        let dst = reg(0, None);
        let src = reg(0, Some("x"));
        let mut info = ShaderInfo::new();
        let err = encode_fetch(&FetchInstr::sample(0), &[&dst, &src], 0, &mut info).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::InvalidSwizzleLength {
                expected: 3,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_fetch() {
        let dst = reg(0, None);
        let src = reg(0, Some("xyz"));
        let fetch = FetchInstr {
            opc: FetchOpcode::GetGradients,
            ..FetchInstr::sample(0)
        };
        let mut info = ShaderInfo::new();
        let err = encode_fetch(&fetch, &[&dst, &src], 0, &mut info).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedOpcode(_)));
    }

    #[test]
    fn test_fetch_operands_without_flags() {
        let dst = reg(0, None);
        let mut src = reg(1, Some("x"));
        src.flags = RegFlags::NEGATE;
        let mut info = ShaderInfo::new();
        let fetch = FetchInstr::vertex(0x39, 4, 20, Signedness::Unsigned);

        let err = encode_fetch(&fetch, &[&dst, &src], 0, &mut info).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::InvalidFlagCombination {
                operand: "fetch source",
                ..
            }
        ));

        let err = encode_fetch(&fetch, &[&dst], 0, &mut info).unwrap_err();
        assert_eq!(
            err,
            EncodeError::OperandCount {
                expected: 2,
                found: 1
            }
        );
    }
}
