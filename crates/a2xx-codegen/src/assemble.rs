//! Assembly driver: resolution, CF packets, then instruction slots

use a2xx_core::{AsmError, Config, Location, Result};
use a2xx_ir::{Cf, InstrKind, Register, Shader};

use crate::alu::encode_alu;
use crate::cf::encode_cf;
use crate::fetch::encode_fetch;
use crate::isa::pack_cf_pair;
use crate::resolve::{resolve, ResolutionMismatch, ResolvedCf};
use crate::stats::ShaderInfo;

/// Dwords per CF pair or instruction slot
pub const QUANTUM_DWORDS: usize = 3;

/// Assembled shader binary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// CF packets followed by instruction slots
    pub words: Vec<u32>,
    /// Register usage
    pub info: ShaderInfo,
    /// Declared EXEC fields that were overridden
    pub warnings: Vec<ResolutionMismatch>,
    cf_len: usize,
}

impl Assembly {
    /// Binary as bytes, in host byte order
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// CF program part of the binary
    pub fn cf_words(&self) -> &[u32] {
        &self.words[..self.cf_len]
    }

    /// Instruction part of the binary
    pub fn instr_words(&self) -> &[u32] {
        &self.words[self.cf_len..]
    }

    /// Number of (padded) CF entries
    pub fn cf_count(&self) -> usize {
        self.cf_len / QUANTUM_DWORDS * 2
    }

    pub fn instr_count(&self) -> usize {
        self.instr_words().len() / QUANTUM_DWORDS
    }
}

/// Turns a finished [`Shader`] into hardware words
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    trace_encoding: bool,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            trace_encoding: config.debug.trace_encoding,
        }
    }

    /// Log every emitted word triple at trace level
    pub fn with_trace_encoding(mut self, enabled: bool) -> Self {
        self.trace_encoding = enabled;
        self
    }

    /// Assemble a shader.
    ///
    /// Any encoding failure aborts the whole pass; nothing partial is
    /// returned.
    pub fn assemble(&self, shader: &Shader) -> Result<Assembly> {
        let pad = Cf::Nop;
        let mut cfs: Vec<&Cf> = shader.cfs().collect();
        if cfs.len() % 2 != 0 {
            tracing::debug!("Padding CF program with NOP");
            cfs.push(&pad);
        }

        let program = resolve(shader, &cfs)?;

        let instr_total = program.end_addr as usize - cfs.len() / 2;
        let cf_len = cfs.len() / 2 * QUANTUM_DWORDS;
        let mut words = Vec::with_capacity(cf_len + instr_total * QUANTUM_DWORDS);

        for (pair, entries) in program.cfs.chunks(2).enumerate() {
            let mut raw = [0u64; 2];
            for (j, cf) in entries.iter().enumerate() {
                raw[j] = encode_cf(cf).map_err(|kind| AsmError::Encode {
                    at: Location::cf(pair * 2 + j),
                    kind,
                })?;
            }
            let packet = pack_cf_pair(raw[0], raw[1]);
            self.trace_words(pair, &packet);
            words.extend_from_slice(&packet);
        }

        let mut info = ShaderInfo::new();
        let mut idx = 0usize;
        for (cf_idx, cf) in program.cfs.iter().enumerate() {
            let ResolvedCf::Exec { block, .. } = cf else {
                continue;
            };

            for instr in shader.exec_instrs(block)? {
                let operands: Vec<&Register> = shader.operands(instr)?.collect();
                let encoded = match &instr.kind {
                    InstrKind::Alu(alu) => encode_alu(alu, &operands, &mut info),
                    InstrKind::Fetch(fetch) => encode_fetch(fetch, &operands, idx, &mut info),
                };
                let slot = encoded.map_err(|kind| AsmError::Encode {
                    at: Location::instr(cf_idx, idx),
                    kind,
                })?;
                self.trace_words(cfs.len() / 2 + idx, &slot);
                words.extend_from_slice(&slot);
                idx += 1;
            }
        }

        tracing::debug!(
            "Assembled {} CFs, {} instructions into {} dwords (max_reg={:?}, max_input_reg={}, regs_written=0x{:x})",
            cfs.len(),
            idx,
            words.len(),
            info.max_reg,
            info.max_input_reg,
            info.regs_written
        );

        Ok(Assembly {
            words,
            info,
            warnings: program.warnings,
            cf_len,
        })
    }

    fn trace_words(&self, addr: usize, words: &[u32; 3]) {
        if self.trace_encoding {
            tracing::trace!(
                "{:3}: {:08x} {:08x} {:08x}",
                addr,
                words[0],
                words[1],
                words[2]
            );
        }
    }
}

/// Assemble with default settings
pub fn assemble(shader: &Shader) -> Result<Assembly> {
    Assembler::new().assemble(shader)
}
