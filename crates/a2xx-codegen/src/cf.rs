//! CF entry encoder

use a2xx_core::EncodeError;
use a2xx_ir::{AllocTarget, CfOpcode};

use crate::isa::{self, AllocCfWord, ExecCfWord};
use crate::resolve::ResolvedCf;

const MAX_EXEC_ADDR: u32 = 0x1f;
const MAX_EXEC_COUNT: u32 = 0x7;
const MAX_EXEC_SEQUENCE: u32 = 0xfff;
const MAX_ALLOC_SIZE: u32 = 0xf;

pub(crate) fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), EncodeError> {
    if value > max {
        return Err(EncodeError::FieldRangeOverflow { field, value, max });
    }
    Ok(())
}

/// Encode one resolved CF entry into its 48-bit word
pub fn encode_cf(cf: &ResolvedCf<'_>) -> Result<u64, EncodeError> {
    let opc = cf.opcode().hw();

    match cf {
        ResolvedCf::Nop => Ok(ExecCfWord {
            opc,
            ..Default::default()
        }
        .encode()),
        ResolvedCf::Exec { fields, .. } => {
            check_range("address", fields.addr, MAX_EXEC_ADDR)?;
            check_range("count", fields.count, MAX_EXEC_COUNT)?;
            check_range("sequence", fields.sequence, MAX_EXEC_SEQUENCE)?;

            Ok(ExecCfWord {
                address: fields.addr,
                count: fields.count,
                serialize: fields.sequence,
                opc,
                ..Default::default()
            }
            .encode())
        }
        ResolvedCf::Alloc(alloc) => {
            check_range("size", alloc.size, MAX_ALLOC_SIZE)?;

            let buffer_select = match alloc.target {
                AllocTarget::Position => isa::SQ_POSITION,
                AllocTarget::ParamPixel => isa::SQ_PARAMETER_PIXEL,
                other => return Err(EncodeError::UnsupportedAllocTarget(other.to_string())),
            };

            Ok(AllocCfWord {
                size: alloc.size,
                buffer_select,
                opc,
                ..Default::default()
            }
            .encode())
        }
        ResolvedCf::Unsupported(op) => Err(EncodeError::UnsupportedOpcode(op.to_string())),
    }
}

/// Decoded view of a CF word, as far as the encoder writes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedCf {
    Nop,
    Exec {
        end: bool,
        addr: u32,
        count: u32,
        sequence: u32,
    },
    Alloc {
        size: u32,
        target: AllocTarget,
    },
    Other(CfOpcode),
}

/// Read a 48-bit CF word back into its fields
pub fn decode_cf(raw: u64) -> Option<DecodedCf> {
    let opc = CfOpcode::from_hw(isa::cf_opcode(raw))?;
    let decoded = match opc {
        CfOpcode::Nop => DecodedCf::Nop,
        CfOpcode::Exec | CfOpcode::ExecEnd => {
            let word = ExecCfWord::decode(raw);
            DecodedCf::Exec {
                end: opc == CfOpcode::ExecEnd,
                addr: word.address,
                count: word.count,
                sequence: word.serialize,
            }
        }
        CfOpcode::Alloc => {
            let word = AllocCfWord::decode(raw);
            let target = match word.buffer_select {
                isa::SQ_NO_ALLOC => AllocTarget::NoAlloc,
                isa::SQ_POSITION => AllocTarget::Position,
                isa::SQ_PARAMETER_PIXEL => AllocTarget::ParamPixel,
                isa::SQ_MEMORY => AllocTarget::Memory,
                _ => return None,
            };
            DecodedCf::Alloc {
                size: word.size,
                target,
            }
        }
        other => DecodedCf::Other(other),
    };
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ExecFields;
    use a2xx_ir::{AllocCf, Shader};

    #[test]
    fn test_nop_is_zero() {
        assert_eq!(encode_cf(&ResolvedCf::Nop).unwrap(), 0);
        assert_eq!(decode_cf(0), Some(DecodedCf::Nop));
    }

    #[test]
    fn test_alloc() {
        let raw = encode_cf(&ResolvedCf::Alloc(AllocCf {
            size: 2,
            target: AllocTarget::ParamPixel,
        }))
        .unwrap();
        assert_eq!(
            decode_cf(raw),
            Some(DecodedCf::Alloc {
                size: 2,
                target: AllocTarget::ParamPixel
            })
        );
    }

    #[test]
    fn test_decode_every_alloc_target() {
        let targets = [
            (isa::SQ_NO_ALLOC, AllocTarget::NoAlloc),
            (isa::SQ_POSITION, AllocTarget::Position),
            (isa::SQ_PARAMETER_PIXEL, AllocTarget::ParamPixel),
            (isa::SQ_MEMORY, AllocTarget::Memory),
        ];
        for (buffer_select, target) in targets {
            let raw = AllocCfWord {
                size: 1,
                buffer_select,
                opc: CfOpcode::Alloc.hw(),
                ..Default::default()
            }
            .encode();
            assert_eq!(decode_cf(raw), Some(DecodedCf::Alloc { size: 1, target }));
        }
    }

    #[test]
    fn test_alloc_target_rejected() {
        for target in [AllocTarget::NoAlloc, AllocTarget::Memory] {
            let err = encode_cf(&ResolvedCf::Alloc(AllocCf { size: 0, target })).unwrap_err();
            assert!(matches!(err, EncodeError::UnsupportedAllocTarget(_)));
        }
    }

    #[test]
    fn test_alloc_size_range() {
        let err = encode_cf(&ResolvedCf::Alloc(AllocCf {
            size: 16,
            target: AllocTarget::Position,
        }))
        .unwrap_err();
        assert_eq!(
            err,
            EncodeError::FieldRangeOverflow {
                field: "size",
                value: 16,
                max: 15
            }
        );
    }

    #[test]
    fn test_unsupported_opcode() {
        let err = encode_cf(&ResolvedCf::Unsupported(CfOpcode::LoopStart)).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedOpcode("LOOP_START".to_string()));
    }

    #[test]
    fn test_exec_fields() {
        let mut shader = Shader::new();
        let cf = shader.create_cf(CfOpcode::ExecEnd).unwrap();
        let block = shader.cf(cf).unwrap().as_exec().unwrap();

        let fields = ExecFields {
            addr: 0x1f,
            count: 7,
            sequence: 0xfff,
        };
        let raw = encode_cf(&ResolvedCf::Exec { block, fields }).unwrap();
        assert_eq!(
            decode_cf(raw),
            Some(DecodedCf::Exec {
                end: true,
                addr: 0x1f,
                count: 7,
                sequence: 0xfff
            })
        );

        let fields = ExecFields {
            addr: 0x20,
            ..fields
        };
        let err = encode_cf(&ResolvedCf::Exec { block, fields }).unwrap_err();
        assert_eq!(
            err,
            EncodeError::FieldRangeOverflow {
                field: "address",
                value: 0x20,
                max: 0x1f
            }
        );
    }
}
