//! a2xx-asm - shader IR and assembler for Adreno a2xx shader cores
//!
//! A front-end builds a [`Shader`] through its `create_*` API and hands it
//! to an [`Assembler`], which returns the hardware word stream together
//! with register usage statistics.
//!
//! ```no_run
//! use a2xx_asm::prelude::*;
//!
//! let mut shader = Shader::new();
//! let cf = shader.create_cf(CfOpcode::ExecEnd)?;
//! let add = shader.create_instr(cf, InstrKind::Alu(AluInstr::vector(VectorOpcode::Add)))?;
//! shader.create_reg(add, 0, Some("xyzw"), RegFlags::empty())?;
//! shader.create_reg(add, 1, Some("xyzw"), RegFlags::empty())?;
//! shader.create_reg(add, 2, Some("xyzw"), RegFlags::empty())?;
//!
//! let assembly = assemble(&shader)?;
//! assert_eq!(assembly.words.len(), 6);
//! # Ok::<(), a2xx_asm::AsmError>(())
//! ```

pub use a2xx_codegen;
pub use a2xx_core;
pub use a2xx_ir;

pub use a2xx_codegen::{assemble, Assembler, Assembly, ResolutionMismatch, ShaderInfo};
pub use a2xx_core::{AsmError, Config, EncodeError, Limits, Location, Result};
pub use a2xx_ir::Shader;

/// Commonly used construction and assembly types
pub mod prelude {
    pub use a2xx_codegen::{assemble, Assembler, Assembly};
    pub use a2xx_core::{AsmError, Config, Result};
    pub use a2xx_ir::{
        AllocTarget, AluInstr, CfOpcode, FetchInstr, InstrKind, RegFlags, ScalarOpcode, Shader,
        Signedness, VectorOpcode,
    };
}

/// Set up logging from `config` and return an assembler configured by it.
///
/// Shaders should be created with [`new_shader`] (or
/// `Shader::with_limits(config.limits)`) so their capacities match.
pub fn init(config: &Config) -> Assembler {
    a2xx_core::logging::init(&config.debug);
    tracing::info!(
        "a2xx assembler ready (limits: {} CFs, {} instructions per EXEC)",
        config.limits.cfs,
        config.limits.instrs_per_exec
    );
    Assembler::from_config(config)
}

/// Empty shader with the capacities from `config`
pub fn new_shader(config: &Config) -> Shader {
    Shader::with_limits(config.limits)
}
