//! Shader IR for the a2xx assembler
//!
//! The front-end builds a [`Shader`] through its `create_*` calls; every
//! entity lives in an arena owned by the shader and is referred to by a
//! typed [`Handle`].

pub mod arena;
pub mod cf;
pub mod instr;
pub mod opcode;
pub mod register;
pub mod shader;

pub use arena::{Arena, Handle, Registry};
pub use cf::{AllocCf, Cf, ExecBlock};
pub use instr::{AluInstr, FetchInstr, InstrKind, Instruction};
pub use opcode::{AllocTarget, CfOpcode, FetchOpcode, ScalarOpcode, Signedness, VectorOpcode};
pub use register::{RegFlags, Register, MAX_REG};
pub use shader::{
    Attribute, AttributeId, CfId, Const, ConstId, InstrId, RegId, Sampler, SamplerId, Shader,
    Uniform, UniformId, Varying, VaryingId,
};
