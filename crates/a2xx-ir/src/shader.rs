//! Shader: owner of every IR entity and the construction API
//!
//! A shader is built bottom-up by the front-end (CFs, then instructions
//! inside EXEC blocks, then operands), handed to the assembler once, and
//! dropped as a whole.

use crate::arena::{next_owner, Arena, Handle, Registry};
use crate::cf::{AllocCf, Cf, ExecBlock};
use crate::instr::{InstrKind, Instruction};
use crate::opcode::{AllocTarget, CfOpcode};
use crate::register::{RegFlags, Register, MAX_REG};
use a2xx_core::{AsmError, Limits, RegistryKind, Result};

pub type AttributeId = Handle<Attribute>;
pub type ConstId = Handle<Const>;
pub type SamplerId = Handle<Sampler>;
pub type UniformId = Handle<Uniform>;
pub type VaryingId = Handle<Varying>;
pub type CfId = Handle<Cf>;
pub type InstrId = Handle<Instruction>;
pub type RegId = Handle<Register>;

/// Vertex attribute bound to registers `rstart..rstart + num`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub rstart: u32,
    pub num: u32,
}

/// Immediate constant register contents
#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub cstart: u32,
    pub val: [f32; 4],
}

/// Texture unit name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sampler {
    pub idx: u32,
    pub name: String,
}

/// Uniform bound to constants `cstart..cstart + num`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uniform {
    pub name: String,
    pub cstart: u32,
    pub num: u32,
}

/// Varying bound to registers `rstart..rstart + num`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Varying {
    pub name: String,
    pub rstart: u32,
    pub num: u32,
}

/// Arena plus the shader-level registry that owns its entries
#[derive(Debug, Clone)]
struct Table<T> {
    arena: Arena<T>,
    registry: Registry<T>,
}

impl<T> Table<T> {
    fn new(owner: u32, kind: RegistryKind, capacity: usize) -> Self {
        Self {
            arena: Arena::with_owner(owner),
            registry: Registry::new(kind, capacity),
        }
    }

    fn append(&mut self, value: T) -> Result<Handle<T>> {
        self.registry.append(&mut self.arena, value)
    }

    fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.registry.iter().map(move |h| &self.arena[h])
    }
}

/// A shader program under construction.
///
/// Handles returned by one shader are rejected by every other shader with
/// [`AsmError::UnknownHandle`]. A clone accepts the handles of the shader
/// it was cloned from.
#[derive(Debug, Clone)]
pub struct Shader {
    limits: Limits,
    attributes: Table<Attribute>,
    consts: Table<Const>,
    samplers: Table<Sampler>,
    uniforms: Table<Uniform>,
    varyings: Table<Varying>,
    cfs: Table<Cf>,
    instrs: Arena<Instruction>,
    regs: Arena<Register>,
}

impl Shader {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        let owner = next_owner();
        tracing::debug!("New shader {} with limits {:?}", owner, limits);
        Self {
            limits,
            attributes: Table::new(owner, RegistryKind::Attributes, limits.attributes),
            consts: Table::new(owner, RegistryKind::Consts, limits.consts),
            samplers: Table::new(owner, RegistryKind::Samplers, limits.samplers),
            uniforms: Table::new(owner, RegistryKind::Uniforms, limits.uniforms),
            varyings: Table::new(owner, RegistryKind::Varyings, limits.varyings),
            cfs: Table::new(owner, RegistryKind::Cfs, limits.cfs),
            instrs: Arena::with_owner(owner),
            regs: Arena::with_owner(owner),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn create_attribute(&mut self, rstart: u32, num: u32, name: &str) -> Result<AttributeId> {
        tracing::debug!("R{}-R{}: {}", rstart, (rstart + num).saturating_sub(1), name);
        self.attributes.append(Attribute {
            name: name.to_string(),
            rstart,
            num,
        })
    }

    pub fn create_const(&mut self, cstart: u32, val: [f32; 4]) -> Result<ConstId> {
        tracing::debug!(
            "C{}: {}, {}, {}, {}",
            cstart,
            val[0],
            val[1],
            val[2],
            val[3]
        );
        self.consts.append(Const { cstart, val })
    }

    pub fn create_sampler(&mut self, idx: u32, name: &str) -> Result<SamplerId> {
        tracing::debug!("CONST({}): {}", idx, name);
        self.samplers.append(Sampler {
            idx,
            name: name.to_string(),
        })
    }

    pub fn create_uniform(&mut self, cstart: u32, num: u32, name: &str) -> Result<UniformId> {
        tracing::debug!("C{}-C{}: {}", cstart, (cstart + num).saturating_sub(1), name);
        self.uniforms.append(Uniform {
            name: name.to_string(),
            cstart,
            num,
        })
    }

    pub fn create_varying(&mut self, rstart: u32, num: u32, name: &str) -> Result<VaryingId> {
        tracing::debug!("R{}-R{}: {}", rstart, (rstart + num).saturating_sub(1), name);
        self.varyings.append(Varying {
            name: name.to_string(),
            rstart,
            num,
        })
    }

    /// Append a CF entry of the given kind.
    ///
    /// An ALLOC created this way has size 0 and no target; use
    /// [`Shader::create_alloc`] or [`Shader::cf_mut`] to fill it in.
    pub fn create_cf(&mut self, opcode: CfOpcode) -> Result<CfId> {
        tracing::debug!("CF {}", opcode);
        let cf = match opcode {
            CfOpcode::Nop => Cf::Nop,
            CfOpcode::Exec | CfOpcode::ExecEnd => Cf::Exec(ExecBlock {
                end: opcode == CfOpcode::ExecEnd,
                declared_addr: None,
                declared_count: None,
                instrs: Registry::new(RegistryKind::Instructions, self.limits.instrs_per_exec),
            }),
            CfOpcode::Alloc => Cf::Alloc(AllocCf {
                size: 0,
                target: AllocTarget::NoAlloc,
            }),
            other => Cf::Unsupported(other),
        };
        self.cfs.append(cf)
    }

    pub fn create_alloc(&mut self, size: u32, target: AllocTarget) -> Result<CfId> {
        tracing::debug!("CF ALLOC {} size {}", target, size);
        self.cfs.append(Cf::Alloc(AllocCf { size, target }))
    }

    /// Append an instruction to an EXEC / EXEC_END block
    pub fn create_instr(&mut self, cf: CfId, kind: InstrKind) -> Result<InstrId> {
        tracing::debug!("{:?} in CF {}", kind, cf.index());
        let regs_per_instr = self.limits.regs_per_instr;
        let exec = self
            .cfs
            .arena
            .get_mut(cf)
            .ok_or(AsmError::UnknownHandle {
                registry: RegistryKind::Cfs,
                index: cf.index() as u32,
            })?
            .as_exec_mut()
            .ok_or(AsmError::NotExecBlock { cf: cf.index() })?;

        exec.instrs.append(
            &mut self.instrs,
            Instruction {
                kind,
                sync: false,
                operands: Registry::new(RegistryKind::Operands, regs_per_instr),
            },
        )
    }

    /// Append an operand to an instruction.
    ///
    /// Only the index range is checked here; flag and swizzle legality
    /// depend on the operand's role and are checked by the encoders.
    pub fn create_reg(
        &mut self,
        instr: InstrId,
        num: u32,
        swizzle: Option<&str>,
        flags: RegFlags,
    ) -> Result<RegId> {
        tracing::debug!("{:?}, {}, {:?}", flags, num, swizzle);
        if num > MAX_REG {
            return Err(AsmError::FieldRangeOverflow {
                field: "register",
                value: num,
                max: MAX_REG,
            });
        }

        let instruction = self.instrs.get_mut(instr).ok_or(AsmError::UnknownHandle {
            registry: RegistryKind::Instructions,
            index: instr.index() as u32,
        })?;

        instruction.operands.append(
            &mut self.regs,
            Register {
                num: num as u8,
                swizzle: swizzle.map(str::to_string),
                flags,
            },
        )
    }

    pub fn cf(&self, id: CfId) -> Result<&Cf> {
        self.cfs.arena.get(id).ok_or(AsmError::UnknownHandle {
            registry: RegistryKind::Cfs,
            index: id.index() as u32,
        })
    }

    pub fn cf_mut(&mut self, id: CfId) -> Result<&mut Cf> {
        self.cfs.arena.get_mut(id).ok_or(AsmError::UnknownHandle {
            registry: RegistryKind::Cfs,
            index: id.index() as u32,
        })
    }

    pub fn instr(&self, id: InstrId) -> Result<&Instruction> {
        self.instrs.get(id).ok_or(AsmError::UnknownHandle {
            registry: RegistryKind::Instructions,
            index: id.index() as u32,
        })
    }

    pub fn instr_mut(&mut self, id: InstrId) -> Result<&mut Instruction> {
        self.instrs.get_mut(id).ok_or(AsmError::UnknownHandle {
            registry: RegistryKind::Instructions,
            index: id.index() as u32,
        })
    }

    pub fn reg(&self, id: RegId) -> Result<&Register> {
        self.regs.get(id).ok_or(AsmError::UnknownHandle {
            registry: RegistryKind::Operands,
            index: id.index() as u32,
        })
    }

    /// CF entries in program order
    pub fn cfs(&self) -> impl ExactSizeIterator<Item = &Cf> + '_ {
        self.cfs.iter()
    }

    pub fn cf_count(&self) -> usize {
        self.cfs.registry.len()
    }

    /// Instructions of an EXEC block in program order.
    ///
    /// Fails with `UnknownHandle` if the block was built by another shader.
    pub fn exec_instrs<'a>(
        &'a self,
        exec: &'a ExecBlock,
    ) -> Result<impl DoubleEndedIterator<Item = &'a Instruction> + ExactSizeIterator + 'a> {
        if let Some(foreign) = exec.instrs.iter().find(|&h| !self.instrs.contains(h)) {
            return Err(AsmError::UnknownHandle {
                registry: RegistryKind::Instructions,
                index: foreign.index() as u32,
            });
        }
        Ok(exec.instrs.iter().map(move |h| &self.instrs[h]))
    }

    /// Operands of an instruction in creation order.
    ///
    /// Fails with `UnknownHandle` if the instruction was built by another
    /// shader.
    pub fn operands<'a>(
        &'a self,
        instr: &'a Instruction,
    ) -> Result<impl ExactSizeIterator<Item = &'a Register> + 'a> {
        if let Some(foreign) = instr.operands.iter().find(|&h| !self.regs.contains(h)) {
            return Err(AsmError::UnknownHandle {
                registry: RegistryKind::Operands,
                index: foreign.index() as u32,
            });
        }
        Ok(instr.operands.iter().map(move |h| &self.regs[h]))
    }

    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &Attribute> + '_ {
        self.attributes.iter()
    }

    pub fn consts(&self) -> impl ExactSizeIterator<Item = &Const> + '_ {
        self.consts.iter()
    }

    pub fn samplers(&self) -> impl ExactSizeIterator<Item = &Sampler> + '_ {
        self.samplers.iter()
    }

    pub fn uniforms(&self) -> impl ExactSizeIterator<Item = &Uniform> + '_ {
        self.uniforms.iter()
    }

    pub fn varyings(&self) -> impl ExactSizeIterator<Item = &Varying> + '_ {
        self.varyings.iter()
    }
}

impl Default for Shader {
    fn default() -> Self {
        Self::new()
    }
}
