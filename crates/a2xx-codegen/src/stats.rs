//! Register usage statistics gathered while encoding

use a2xx_ir::Register;

/// Register footprint of an assembled shader, consumed by the thread
/// scheduler when the program is bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShaderInfo {
    /// Highest GPR index touched, `None` if the program uses no GPRs
    pub max_reg: Option<u8>,
    /// Highest GPR read before any write: the live-in inputs
    pub max_input_reg: u8,
    /// GPRs written by some destination
    pub regs_written: u64,
}

impl ShaderInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one operand. Constants and exports are not GPRs and are
    /// ignored.
    pub fn record(&mut self, reg: &Register, dest: bool) {
        if !reg.is_gpr() {
            return;
        }

        self.max_reg = Some(self.max_reg.map_or(reg.num, |max| max.max(reg.num)));

        let bit = 1u64.checked_shl(reg.num as u32).unwrap_or(0);
        if dest {
            self.regs_written |= bit;
        } else if self.regs_written & bit == 0 {
            self.max_input_reg = self.max_input_reg.max(reg.num);
        }
    }

    /// Number of GPRs the program needs allocated
    pub fn gpr_count(&self) -> u32 {
        self.max_reg.map_or(0, |max| max as u32 + 1)
    }

    pub fn is_written(&self, num: u8) -> bool {
        num < 64 && self.regs_written & (1u64 << num) != 0
    }
}
