//! Address and sequence resolution for EXEC blocks
//!
//! CF packets and instruction slots share one address space, CF program
//! first. Each EXEC block is assigned the address of its first instruction
//! and a sequence mask describing its instructions to the sequencer.

use std::fmt;

use a2xx_core::Result;
use a2xx_ir::{AllocCf, Cf, CfOpcode, ExecBlock, Shader};

/// Sequence bit0: instruction is a fetch
pub const SEQ_FETCH: u32 = 0x1;
/// Sequence bit1: instruction carries a sync marker
pub const SEQ_SYNC: u32 = 0x2;

/// Computed EXEC fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecFields {
    pub addr: u32,
    pub count: u32,
    pub sequence: u32,
}

/// Caller-declared EXEC field that disagreed with the computed value.
///
/// Not fatal: the computed value is always the one encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMismatch {
    Address { cf: usize, declared: u32, computed: u32 },
    Count { cf: usize, declared: u32, computed: u32 },
}

impl fmt::Display for ResolutionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address {
                cf,
                declared,
                computed,
            } => write!(
                f,
                "CF {}: declared address {} does not match computed {}",
                cf, declared, computed
            ),
            Self::Count {
                cf,
                declared,
                computed,
            } => write!(
                f,
                "CF {}: declared count {} does not match computed {}",
                cf, declared, computed
            ),
        }
    }
}

/// A CF entry with its EXEC fields filled in
#[derive(Debug, Clone, Copy)]
pub enum ResolvedCf<'a> {
    Nop,
    Exec {
        block: &'a ExecBlock,
        fields: ExecFields,
    },
    Alloc(AllocCf),
    Unsupported(CfOpcode),
}

impl ResolvedCf<'_> {
    pub fn opcode(&self) -> CfOpcode {
        match self {
            Self::Nop => CfOpcode::Nop,
            Self::Exec { block, .. } if block.end => CfOpcode::ExecEnd,
            Self::Exec { .. } => CfOpcode::Exec,
            Self::Alloc(_) => CfOpcode::Alloc,
            Self::Unsupported(op) => *op,
        }
    }
}

/// Result of one resolution pass over a CF list
#[derive(Debug, Clone)]
pub struct ResolvedProgram<'a> {
    pub cfs: Vec<ResolvedCf<'a>>,
    pub warnings: Vec<ResolutionMismatch>,
    /// Address one past the last instruction slot
    pub end_addr: u32,
}

/// Sequence mask of an EXEC block: two bits per instruction, the last
/// instruction in the most significant pair
pub fn sequence(shader: &Shader, block: &ExecBlock) -> Result<u32> {
    Ok(shader.exec_instrs(block)?.rev().fold(0, |seq, instr| {
        let mut bits = 0;
        if instr.is_fetch() {
            bits |= SEQ_FETCH;
        }
        if instr.sync {
            bits |= SEQ_SYNC;
        }
        (seq << 2) | bits
    }))
}

/// Resolve an already padded CF list.
///
/// Fails only when an EXEC block in `cfs` was built by another shader.
pub fn resolve<'a>(shader: &'a Shader, cfs: &[&'a Cf]) -> Result<ResolvedProgram<'a>> {
    let mut addr = (cfs.len() / 2) as u32;
    let mut warnings = Vec::new();

    let resolved: Vec<ResolvedCf<'a>> = cfs
        .iter()
        .enumerate()
        .map(|(i, &cf)| match cf {
            Cf::Nop => Ok(ResolvedCf::Nop),
            Cf::Alloc(alloc) => Ok(ResolvedCf::Alloc(*alloc)),
            Cf::Unsupported(op) => Ok(ResolvedCf::Unsupported(*op)),
            Cf::Exec(block) => {
                let fields = ExecFields {
                    addr,
                    count: block.instrs().len() as u32,
                    sequence: sequence(shader, block)?,
                };

                if let Some(declared) = block.declared_addr.filter(|&d| d != fields.addr) {
                    warnings.push(ResolutionMismatch::Address {
                        cf: i,
                        declared,
                        computed: fields.addr,
                    });
                }
                if let Some(declared) = block.declared_count.filter(|&d| d != fields.count) {
                    warnings.push(ResolutionMismatch::Count {
                        cf: i,
                        declared,
                        computed: fields.count,
                    });
                }

                tracing::debug!(
                    "CF {}: {} addr={} cnt={} seq=0x{:03x}",
                    i,
                    cf.opcode(),
                    fields.addr,
                    fields.count,
                    fields.sequence
                );

                addr += fields.count;
                Ok(ResolvedCf::Exec { block, fields })
            }
        })
        .collect::<Result<_>>()?;

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    Ok(ResolvedProgram {
        cfs: resolved,
        warnings,
        end_addr: addr,
    })
}
