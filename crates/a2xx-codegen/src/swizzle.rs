//! Swizzle and write-mask encoding
//!
//! Swizzles are written lane 0 first ("xyzw") and land in the low bits of
//! the encoded field.

use a2xx_core::EncodeError;
use a2xx_ir::Register;

/// Identity destination swizzle of a fetch ("xyzw")
pub const FETCH_DST_IDENTITY: u32 = 0x688;

/// All four lanes written
pub const ALU_WRITE_ALL: u32 = 0xf;

fn check_len(context: &'static str, swizzle: &str, expected: usize) -> Result<(), EncodeError> {
    let found = swizzle.chars().count();
    if found != expected {
        return Err(EncodeError::InvalidSwizzleLength {
            context,
            expected,
            found,
        });
    }
    Ok(())
}

fn invalid(context: &'static str, swizzle: &str, ch: char) -> EncodeError {
    EncodeError::InvalidSwizzleChar {
        context,
        swizzle: swizzle.to_string(),
        ch,
    }
}

fn lane_index(ch: char) -> Option<u32> {
    match ch {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        'w' => Some(3),
        _ => None,
    }
}

/// Source selector of a fetch: 2 bits per lane over `lanes` lanes.
///
/// Vertex fetches read one lane, texture fetches three. The swizzle is
/// mandatory here.
pub fn fetch_src(reg: &Register, lanes: usize) -> Result<u32, EncodeError> {
    const CONTEXT: &str = "fetch source";

    let swizzle = reg.swizzle.as_deref().ok_or(EncodeError::InvalidSwizzleLength {
        context: CONTEXT,
        expected: lanes,
        found: 0,
    })?;
    check_len(CONTEXT, swizzle, lanes)?;
    tracing::trace!("fetch src R{}.{}", reg.num, swizzle);

    swizzle.chars().enumerate().try_fold(0u32, |swiz, (i, ch)| {
        let code = lane_index(ch).ok_or_else(|| invalid(CONTEXT, swizzle, ch))?;
        Ok(swiz | (code << (2 * i)))
    })
}

/// Destination selector of a fetch: 3 bits per lane
pub fn fetch_dst(reg: &Register) -> Result<u32, EncodeError> {
    const CONTEXT: &str = "fetch destination";

    let Some(swizzle) = reg.swizzle.as_deref() else {
        return Ok(FETCH_DST_IDENTITY);
    };
    check_len(CONTEXT, swizzle, 4)?;
    tracing::trace!("fetch dst R{}.{}", reg.num, swizzle);

    swizzle.chars().enumerate().try_fold(0u32, |swiz, (i, ch)| {
        let code = match ch {
            '0' => 4,
            '1' => 5,
            '_' => 7,
            other => lane_index(other).ok_or_else(|| invalid(CONTEXT, swizzle, ch))?,
        };
        Ok(swiz | (code << (3 * i)))
    })
}

/// Write mask of an ALU destination: one bit per lane.
///
/// Lane `i` accepts only its own component letter or `_`.
pub fn alu_dst(reg: &Register) -> Result<u32, EncodeError> {
    const CONTEXT: &str = "ALU destination";

    let Some(swizzle) = reg.swizzle.as_deref() else {
        return Ok(ALU_WRITE_ALL);
    };
    check_len(CONTEXT, swizzle, 4)?;
    tracing::trace!("alu dst R{}.{}", reg.num, swizzle);

    swizzle
        .chars()
        .zip("xyzw".chars())
        .enumerate()
        .try_fold(0u32, |mask, (i, (ch, expected))| match ch {
            _ if ch == expected => Ok(mask | (1 << i)),
            '_' => Ok(mask),
            _ => Err(invalid(CONTEXT, swizzle, ch)),
        })
}

/// Source swizzle of an ALU operand: 2 bits per lane, relative to the lane
pub fn alu_src(reg: &Register) -> Result<u32, EncodeError> {
    const CONTEXT: &str = "ALU source";

    let Some(swizzle) = reg.swizzle.as_deref() else {
        return Ok(0);
    };
    check_len(CONTEXT, swizzle, 4)?;
    tracing::trace!("vector src R{}.{}", reg.num, swizzle);

    swizzle.chars().enumerate().try_fold(0u32, |swiz, (i, ch)| {
        let letter = lane_index(ch).ok_or_else(|| invalid(CONTEXT, swizzle, ch))?;
        let code = letter.wrapping_sub(i as u32) & 0x3;
        Ok(swiz | (code << (2 * i)))
    })
}
