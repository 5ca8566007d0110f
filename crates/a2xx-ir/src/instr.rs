//! ALU and fetch instructions

use crate::arena::Registry;
use crate::opcode::{FetchOpcode, ScalarOpcode, Signedness, VectorOpcode};
use crate::register::Register;

/// One executable op inside an EXEC block
#[derive(Debug, Clone)]
pub struct Instruction {
    pub kind: InstrKind,
    /// Sequencer must wait for outstanding work before issuing this op
    pub sync: bool,
    pub(crate) operands: Registry<Register>,
}

impl Instruction {
    /// Operand handles in creation order
    pub fn operands(&self) -> &Registry<Register> {
        &self.operands
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self.kind, InstrKind::Fetch(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstrKind {
    Alu(AluInstr),
    Fetch(FetchInstr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluInstr {
    pub vector_opc: VectorOpcode,
    pub scalar_opc: Option<ScalarOpcode>,
}

impl AluInstr {
    pub fn vector(vector_opc: VectorOpcode) -> Self {
        Self {
            vector_opc,
            scalar_opc: None,
        }
    }

    pub fn co_issue(vector_opc: VectorOpcode, scalar_opc: ScalarOpcode) -> Self {
        Self {
            vector_opc,
            scalar_opc: Some(scalar_opc),
        }
    }

    /// Number of operands this op consumes: dest, sources, and the scalar pair
    pub fn operand_count(&self) -> usize {
        let vector = if self.vector_opc == VectorOpcode::MulAdd {
            4
        } else {
            3
        };
        match (self.scalar_opc, self.vector_opc) {
            (None, _) => vector,
            // scalar op reuses the MULADD third source
            (Some(_), VectorOpcode::MulAdd) => vector + 1,
            (Some(_), _) => vector + 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchInstr {
    pub opc: FetchOpcode,
    /// Vertex format (`instr_surf_fmt`)
    pub fmt: u32,
    /// Vertex stride in dwords
    pub stride: u32,
    /// Fetch constant index
    pub const_idx: u32,
    pub const_idx_sel: u32,
    pub sign: Signedness,
}

impl FetchInstr {
    pub fn vertex(fmt: u32, stride: u32, const_idx: u32, sign: Signedness) -> Self {
        Self {
            opc: FetchOpcode::Vertex,
            fmt,
            stride,
            const_idx,
            const_idx_sel: 0,
            sign,
        }
    }

    pub fn sample(const_idx: u32) -> Self {
        Self {
            opc: FetchOpcode::Sample,
            fmt: 0,
            stride: 0,
            const_idx,
            const_idx_sel: 0,
            sign: Signedness::Unsigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alu_operand_count() {
        assert_eq!(AluInstr::vector(VectorOpcode::Add).operand_count(), 3);
        assert_eq!(AluInstr::vector(VectorOpcode::MulAdd).operand_count(), 4);
        assert_eq!(
            AluInstr::co_issue(VectorOpcode::Mul, ScalarOpcode::RecipIeee).operand_count(),
            5
        );
        assert_eq!(
            AluInstr::co_issue(VectorOpcode::MulAdd, ScalarOpcode::Add).operand_count(),
            5
        );
    }
}
