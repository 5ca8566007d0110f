//! a2xx opcode and selector tables
//!
//! Discriminants are the hardware encodings.

use std::fmt;

macro_rules! hw_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $value:literal => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            /// Hardware encoding
            pub fn hw(self) -> u8 {
                self as u8
            }

            /// Look up an opcode by its hardware encoding
            pub fn from_hw(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Mnemonic as printed by the disassembler
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

hw_enum! {
    /// Control-flow opcodes
    pub enum CfOpcode {
        Nop = 0 => "NOP",
        Exec = 1 => "EXEC",
        ExecEnd = 2 => "EXEC_END",
        CondExec = 3 => "COND_EXEC",
        CondExecEnd = 4 => "COND_EXEC_END",
        CondPredExec = 5 => "COND_PRED_EXEC",
        CondPredExecEnd = 6 => "COND_PRED_EXEC_END",
        LoopStart = 7 => "LOOP_START",
        LoopEnd = 8 => "LOOP_END",
        CondCall = 9 => "COND_CALL",
        Return = 10 => "RETURN",
        CondJmp = 11 => "COND_JMP",
        Alloc = 12 => "ALLOC",
        CondExecPredClean = 13 => "COND_EXEC_PRED_CLEAN",
        CondExecPredCleanEnd = 14 => "COND_EXEC_PRED_CLEAN_END",
        MarkVsFetchDone = 15 => "MARK_VS_FETCH_DONE",
    }
}

hw_enum! {
    /// ALU vector opcodes
    pub enum VectorOpcode {
        Add = 0 => "ADDv",
        Mul = 1 => "MULv",
        Max = 2 => "MAXv",
        Min = 3 => "MINv",
        SetE = 4 => "SETEv",
        SetGt = 5 => "SETGTv",
        SetGte = 6 => "SETGTEv",
        SetNe = 7 => "SETNEv",
        Frac = 8 => "FRACv",
        Trunc = 9 => "TRUNCv",
        Floor = 10 => "FLOORv",
        MulAdd = 11 => "MULADDv",
        CndE = 12 => "CNDEv",
        CndGte = 13 => "CNDGTEv",
        CndGt = 14 => "CNDGTv",
        Dot4 = 15 => "DOT4v",
        Dot3 = 16 => "DOT3v",
        Dot2Add = 17 => "DOT2ADDv",
        Cube = 18 => "CUBEv",
        Max4 = 19 => "MAX4v",
        PredSetEPush = 20 => "PRED_SETE_PUSHv",
        PredSetNePush = 21 => "PRED_SETNE_PUSHv",
        PredSetGtPush = 22 => "PRED_SETGT_PUSHv",
        PredSetGtePush = 23 => "PRED_SETGTE_PUSHv",
        KillE = 24 => "KILLEv",
        KillGt = 25 => "KILLGTv",
        KillGte = 26 => "KILLGTEv",
        KillNe = 27 => "KILLNEv",
        Dst = 28 => "DSTv",
        MovA = 29 => "MOVAv",
    }
}

hw_enum! {
    /// ALU scalar opcodes
    pub enum ScalarOpcode {
        Add = 0 => "ADDs",
        AddPrev = 1 => "ADD_PREVs",
        Mul = 2 => "MULs",
        MulPrev = 3 => "MUL_PREVs",
        MulPrev2 = 4 => "MUL_PREV2s",
        Max = 5 => "MAXs",
        Min = 6 => "MINs",
        SetE = 7 => "SETEs",
        SetGt = 8 => "SETGTs",
        SetGte = 9 => "SETGTEs",
        SetNe = 10 => "SETNEs",
        Frac = 11 => "FRACs",
        Trunc = 12 => "TRUNCs",
        Floor = 13 => "FLOORs",
        ExpIeee = 14 => "EXP_IEEE",
        LogClamp = 15 => "LOG_CLAMP",
        LogIeee = 16 => "LOG_IEEE",
        RecipClamp = 17 => "RECIP_CLAMP",
        RecipFf = 18 => "RECIP_FF",
        RecipIeee = 19 => "RECIP_IEEE",
        RecipSqClamp = 20 => "RECIPSQ_CLAMP",
        RecipSqFf = 21 => "RECIPSQ_FF",
        RecipSqIeee = 22 => "RECIPSQ_IEEE",
        MovA = 23 => "MOVAs",
        MovAFloor = 24 => "MOVA_FLOORs",
        Sub = 25 => "SUBs",
        SubPrev = 26 => "SUB_PREVs",
        PredSetE = 27 => "PRED_SETEs",
        PredSetNe = 28 => "PRED_SETNEs",
        PredSetGt = 29 => "PRED_SETGTs",
        PredSetGte = 30 => "PRED_SETGTEs",
        PredSetInv = 31 => "PRED_SET_INVs",
        PredSetPop = 32 => "PRED_SET_POPs",
        PredSetClr = 33 => "PRED_SET_CLRs",
        PredSetRestore = 34 => "PRED_SET_RESTOREs",
        KillE = 35 => "KILLEs",
        KillGt = 36 => "KILLGTs",
        KillGte = 37 => "KILLGTEs",
        KillNe = 38 => "KILLNEs",
        KillOne = 39 => "KILLONEs",
        SqrtIeee = 40 => "SQRT_IEEE",
        MulConst0 = 42 => "MUL_CONST_0",
        MulConst1 = 43 => "MUL_CONST_1",
        AddConst0 = 44 => "ADD_CONST_0",
        AddConst1 = 45 => "ADD_CONST_1",
        SubConst0 = 46 => "SUB_CONST_0",
        SubConst1 = 47 => "SUB_CONST_1",
        Sin = 48 => "SIN",
        Cos = 49 => "COS",
        RetainPrev = 50 => "RETAIN_PREV",
    }
}

hw_enum! {
    /// Fetch opcodes
    pub enum FetchOpcode {
        Vertex = 0 => "VERTEX",
        Sample = 1 => "SAMPLE",
        GetBorderColorFrac = 16 => "GET_BORDER_COLOR_FRAC",
        GetCompTexLod = 17 => "GET_COMP_TEX_LOD",
        GetGradients = 18 => "GET_GRADIENTS",
        GetWeights = 19 => "GET_WEIGHTS",
        SetTexLod = 24 => "SET_TEX_LOD",
        SetGradientsH = 25 => "SET_GRADIENTS_H",
        SetGradientsV = 26 => "SET_GRADIENTS_V",
    }
}

hw_enum! {
    /// Export buffer selected by an ALLOC
    pub enum AllocTarget {
        NoAlloc = 0 => "NO_ALLOC",
        Position = 1 => "POSITION",
        ParamPixel = 2 => "PARAM/PIXEL",
        Memory = 3 => "MEMORY",
    }
}

/// Declared signedness of vertex data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Signedness {
    #[default]
    Unsigned,
    Signed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cf_opcode_roundtrip() {
        for v in 0..16u8 {
            let op = CfOpcode::from_hw(v).unwrap();
            assert_eq!(op.hw(), v);
        }
        assert!(CfOpcode::from_hw(16).is_none());
    }

    #[test]
    fn test_scalar_hole() {
        assert_eq!(ScalarOpcode::from_hw(40), Some(ScalarOpcode::SqrtIeee));
        assert!(ScalarOpcode::from_hw(41).is_none());
        assert_eq!(ScalarOpcode::from_hw(42), Some(ScalarOpcode::MulConst0));
        assert_eq!(ScalarOpcode::Max.hw(), 5);
    }

    #[test]
    fn test_names() {
        assert_eq!(VectorOpcode::MulAdd.to_string(), "MULADDv");
        assert_eq!(CfOpcode::ExecEnd.name(), "EXEC_END");
        assert_eq!(FetchOpcode::Sample.hw(), 1);
        assert_eq!(AllocTarget::ParamPixel.hw(), 2);
    }
}
