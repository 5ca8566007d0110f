//! Register operands

use bitflags::bitflags;

/// Highest addressable register index (6-bit field)
pub const MAX_REG: u32 = 0x3f;

bitflags! {
    /// Operand modifiers
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct RegFlags: u8 {
        /// Operand reads the constant bank
        const CONST = 0x01;
        const NEGATE = 0x02;
        const ABS = 0x04;
        /// Destination is an export slot rather than a GPR
        const EXPORT = 0x08;
    }
}

/// One operand reference of an instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub num: u8,
    pub swizzle: Option<String>,
    pub flags: RegFlags,
}

impl Register {
    pub fn is_const(&self) -> bool {
        self.flags.contains(RegFlags::CONST)
    }

    pub fn is_export(&self) -> bool {
        self.flags.contains(RegFlags::EXPORT)
    }

    /// Whether this operand names a general purpose register
    pub fn is_gpr(&self) -> bool {
        !self.flags.intersects(RegFlags::CONST | RegFlags::EXPORT)
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.flags.contains(RegFlags::NEGATE) {
            f.write_str("-")?;
        }
        if self.flags.contains(RegFlags::ABS) {
            f.write_str("|")?;
        }
        let bank = if self.is_const() {
            "C"
        } else if self.is_export() {
            "export"
        } else {
            "R"
        };
        write!(f, "{}{}", bank, self.num)?;
        if let Some(swizzle) = &self.swizzle {
            write!(f, ".{}", swizzle)?;
        }
        if self.flags.contains(RegFlags::ABS) {
            f.write_str("|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_display() {
        let reg = Register {
            num: 3,
            swizzle: Some("xyzw".to_string()),
            flags: RegFlags::CONST | RegFlags::NEGATE,
        };
        assert_eq!(reg.to_string(), "-C3.xyzw");

        let reg = Register {
            num: 1,
            swizzle: None,
            flags: RegFlags::ABS,
        };
        assert_eq!(reg.to_string(), "|R1|");
    }

    #[test]
    fn test_register_gpr() {
        let mut reg = Register {
            num: 0,
            swizzle: None,
            flags: RegFlags::empty(),
        };
        assert!(reg.is_gpr());
        reg.flags = RegFlags::EXPORT;
        assert!(!reg.is_gpr());
        reg.flags = RegFlags::CONST | RegFlags::ABS;
        assert!(!reg.is_gpr());
    }
}
