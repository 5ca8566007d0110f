//! Error types for the a2xx assembler

use std::fmt;
use thiserror::Error;

/// Main error type for shader construction and assembly
#[derive(Error, Debug)]
pub enum AsmError {
    #[error("{registry} registry full (capacity {capacity})")]
    CapacityExceeded { registry: RegistryKind, capacity: usize },

    #[error("{field} value {value} exceeds maximum {max}")]
    FieldRangeOverflow {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("CF {cf} is not an EXEC block")]
    NotExecBlock { cf: usize },

    #[error("Unknown {registry} handle: {index}")]
    UnknownHandle { registry: RegistryKind, index: u32 },

    #[error("{kind} at {at}")]
    Encode { at: Location, kind: EncodeError },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AsmError {
    /// The encoding failure kind, if this error came out of assembly
    pub fn encode_kind(&self) -> Option<&EncodeError> {
        match self {
            Self::Encode { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Encoding failures. Each one aborts the whole assembly pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Unsupported opcode: {0}")]
    UnsupportedOpcode(String),

    #[error("Unsupported alloc target: {0}")]
    UnsupportedAllocTarget(String),

    #[error("Invalid {context} swizzle character '{ch}' in \"{swizzle}\"")]
    InvalidSwizzleChar {
        context: &'static str,
        swizzle: String,
        ch: char,
    },

    #[error("Invalid {context} swizzle length {found} (expected {expected})")]
    InvalidSwizzleLength {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid flags 0x{flags:x} on {operand}")]
    InvalidFlagCombination { operand: &'static str, flags: u8 },

    #[error("{field} value {value} exceeds maximum {max}")]
    FieldRangeOverflow {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Expected {expected} operands, found {found}")]
    OperandCount { expected: usize, found: usize },
}

/// Fixed-capacity collection an entity is appended to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Attributes,
    Consts,
    Samplers,
    Uniforms,
    Varyings,
    Cfs,
    Instructions,
    Operands,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attributes => "attribute",
            Self::Consts => "const",
            Self::Samplers => "sampler",
            Self::Uniforms => "uniform",
            Self::Varyings => "varying",
            Self::Cfs => "CF",
            Self::Instructions => "instruction",
            Self::Operands => "operand",
        };
        f.write_str(name)
    }
}

/// Position of a failing entity within the program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    /// Index into the (padded) CF list
    pub cf: Option<usize>,
    /// Index into the flat instruction stream
    pub instr: Option<usize>,
}

impl Location {
    pub fn cf(cf: usize) -> Self {
        Self {
            cf: Some(cf),
            instr: None,
        }
    }

    pub fn instr(cf: usize, instr: usize) -> Self {
        Self {
            cf: Some(cf),
            instr: Some(instr),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.cf, self.instr) {
            (Some(cf), Some(instr)) => write!(f, "CF {}, instruction {}", cf, instr),
            (Some(cf), None) => write!(f, "CF {}", cf),
            (None, Some(instr)) => write!(f, "instruction {}", instr),
            (None, None) => f.write_str("shader"),
        }
    }
}

/// Result type alias for assembler operations
pub type Result<T> = std::result::Result<T, AsmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AsmError::CapacityExceeded {
            registry: RegistryKind::Cfs,
            capacity: 64,
        };
        assert_eq!(format!("{}", err), "CF registry full (capacity 64)");

        let err = AsmError::Encode {
            at: Location::instr(2, 5),
            kind: EncodeError::FieldRangeOverflow {
                field: "stride",
                value: 300,
                max: 0xff,
            },
        };
        assert_eq!(
            format!("{}", err),
            "stride value 300 exceeds maximum 255 at CF 2, instruction 5"
        );
    }

    #[test]
    fn test_encode_kind() {
        let err = AsmError::Encode {
            at: Location::cf(1),
            kind: EncodeError::UnsupportedOpcode("LOOP_START".to_string()),
        };
        assert!(matches!(
            err.encode_kind(),
            Some(EncodeError::UnsupportedOpcode(_))
        ));

        let err = AsmError::NotExecBlock { cf: 0 };
        assert!(err.encode_kind().is_none());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AsmError = io.into();
        assert!(matches!(err, AsmError::Io(_)));
    }
}
