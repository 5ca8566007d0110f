//! Control-flow entries

use crate::arena::Registry;
use crate::instr::Instruction;
use crate::opcode::{AllocTarget, CfOpcode};

/// One control-flow unit of the CF program
#[derive(Debug, Clone)]
pub enum Cf {
    Nop,
    Exec(ExecBlock),
    Alloc(AllocCf),
    /// Known CF opcode without an encoder
    Unsupported(CfOpcode),
}

impl Cf {
    pub fn opcode(&self) -> CfOpcode {
        match self {
            Self::Nop => CfOpcode::Nop,
            Self::Exec(exec) if exec.end => CfOpcode::ExecEnd,
            Self::Exec(_) => CfOpcode::Exec,
            Self::Alloc(_) => CfOpcode::Alloc,
            Self::Unsupported(op) => *op,
        }
    }

    pub fn as_exec(&self) -> Option<&ExecBlock> {
        match self {
            Self::Exec(exec) => Some(exec),
            _ => None,
        }
    }

    pub fn as_exec_mut(&mut self) -> Option<&mut ExecBlock> {
        match self {
            Self::Exec(exec) => Some(exec),
            _ => None,
        }
    }
}

/// EXEC / EXEC_END: runs a run of ALU and fetch instructions
#[derive(Debug, Clone)]
pub struct ExecBlock {
    /// EXEC_END: last block of the program
    pub end: bool,
    /// Address as written by the front-end, checked during resolution
    pub declared_addr: Option<u32>,
    /// Count as written by the front-end, checked during resolution
    pub declared_count: Option<u32>,
    pub(crate) instrs: Registry<Instruction>,
}

impl ExecBlock {
    pub fn instrs(&self) -> &Registry<Instruction> {
        &self.instrs
    }
}

/// ALLOC: reserves export buffer space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocCf {
    pub size: u32,
    pub target: AllocTarget,
}
