//! ALU instruction encoder
//!
//! Operand order is `dst, src1, src2` for plain vector ops and
//! `dst, src3, src1, src2` for MULADDv (`dst = src3 + src1 * src2`). A
//! co-issued scalar op appends its destination and, unless MULADDv already
//! supplied one, the third source.

use a2xx_core::EncodeError;
use a2xx_ir::{AluInstr, RegFlags, Register, ScalarOpcode, VectorOpcode};

use crate::isa::AluWord;
use crate::stats::ShaderInfo;
use crate::swizzle;

/// One ALU source operand in encoded form
struct Src {
    reg: u32,
    swiz: u32,
    negate: bool,
    abs: bool,
    sel: bool,
}

fn check_dest(operand: &'static str, reg: &Register) -> Result<(), EncodeError> {
    if !(reg.flags - RegFlags::EXPORT).is_empty() {
        return Err(EncodeError::InvalidFlagCombination {
            operand,
            flags: reg.flags.bits(),
        });
    }
    Ok(())
}

fn src(operand: &'static str, reg: &Register) -> Result<Src, EncodeError> {
    if reg.is_export() {
        return Err(EncodeError::InvalidFlagCombination {
            operand,
            flags: reg.flags.bits(),
        });
    }
    Ok(Src {
        reg: reg.num as u32,
        swiz: swizzle::alu_src(reg)?,
        negate: reg.flags.contains(RegFlags::NEGATE),
        abs: reg.flags.contains(RegFlags::ABS),
        sel: !reg.is_const(),
    })
}

/// Encode one ALU instruction into its three dwords
pub fn encode_alu(
    alu: &AluInstr,
    operands: &[&Register],
    info: &mut ShaderInfo,
) -> Result<[u32; 3], EncodeError> {
    let expected = alu.operand_count();
    if operands.len() != expected {
        return Err(EncodeError::OperandCount {
            expected,
            found: operands.len(),
        });
    }

    let mut regs = operands.iter().copied();
    let mut next = || {
        regs.next().ok_or(EncodeError::OperandCount {
            expected,
            found: operands.len(),
        })
    };

    let dst = next()?;
    let mut src3_reg = if alu.vector_opc == VectorOpcode::MulAdd {
        Some(next()?)
    } else {
        None
    };
    let src1_reg = next()?;
    let src2_reg = next()?;

    info.record(dst, true);
    info.record(src1_reg, false);
    info.record(src2_reg, false);

    check_dest("vector destination", dst)?;
    let src1 = src("src1", src1_reg)?;
    let src2 = src("src2", src2_reg)?;

    let mut word = AluWord {
        vector_dest: dst.num as u32,
        export_data: dst.is_export(),
        vector_write_mask: swizzle::alu_dst(dst)?,
        vector_opc: alu.vector_opc.hw() as u32,

        src1_reg: src1.reg,
        src1_swiz: src1.swiz,
        src1_reg_negate: src1.negate,
        src1_reg_abs: src1.abs,
        src1_sel: src1.sel,

        src2_reg: src2.reg,
        src2_swiz: src2.swiz,
        src2_reg_negate: src2.negate,
        src2_reg_abs: src2.abs,
        src2_sel: src2.sel,
        ..Default::default()
    };

    match alu.scalar_opc {
        Some(scalar_opc) => {
            let sdst = next()?;
            info.record(sdst, true);
            if sdst.flags != dst.flags {
                return Err(EncodeError::InvalidFlagCombination {
                    operand: "scalar destination",
                    flags: sdst.flags.bits(),
                });
            }
            if src3_reg.is_none() {
                src3_reg = Some(next()?);
            }

            word.scalar_dest = sdst.num as u32;
            word.scalar_write_mask = swizzle::alu_dst(sdst)?;
            word.scalar_opc = scalar_opc.hw() as u32;
        }
        // the reference compiler always emits MAXs in an unused scalar slot
        None => word.scalar_opc = ScalarOpcode::Max.hw() as u32,
    }

    match src3_reg {
        Some(reg) => {
            info.record(reg, false);
            let src3 = src("src3", reg)?;
            word.src3_reg = src3.reg;
            word.src3_swiz = src3.swiz;
            word.src3_reg_negate = src3.negate;
            word.src3_reg_abs = src3.abs;
            word.src3_sel = src3.sel;
        }
        // likewise for the bank of an unused third source
        None => word.src3_sel = true,
    }

    Ok(word.encode())
}
