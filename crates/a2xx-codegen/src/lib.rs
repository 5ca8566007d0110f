//! a2xx shader code generation
//!
//! Resolves a [`Shader`](a2xx_ir::Shader)'s EXEC blocks and encodes its CF
//! program and instructions into the hardware word stream.

pub mod alu;
pub mod assemble;
pub mod cf;
pub mod fetch;
pub mod isa;
pub mod resolve;
pub mod stats;
pub mod swizzle;

pub use assemble::{assemble, Assembler, Assembly, QUANTUM_DWORDS};
pub use cf::{decode_cf, encode_cf, DecodedCf};
pub use resolve::{resolve, ExecFields, ResolutionMismatch, ResolvedCf, ResolvedProgram};
pub use stats::ShaderInfo;
