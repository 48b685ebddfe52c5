//! Integer-to-text conversion for the emitter and status line.

use heapless::Vec;

/// 64 binary digits plus a two-character base marker or a sign.
pub const DIGIT_CAPACITY: usize = 68;

const DIGIT_ALPHABET: &[u8; 16] = b"0123456789ABCDEF";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatError {
    /// Base outside `2..=16`.
    InvalidBase(u8),
}

/// Finished digit string, built on the stack.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Digits {
    buf: Vec<u8, DIGIT_CAPACITY>,
}

impl Digits {
    pub fn as_str(&self) -> &str {
        // The buffer only ever holds the digit alphabet plus marker/sign.
        core::str::from_utf8(&self.buf).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Renders `value` in `base`, lowest-order digit first, then reverses the
/// buffer in place so it reads left to right.
///
/// When `signed` is set and `base` is 10, `value` is taken as two's
/// complement: a negative value formats its magnitude behind a `-`. Bases
/// 2, 8 and 16 carry their `0b`/`0o`/`0x` marker. The digit loop runs at
/// least once, so zero formats as a single `0`.
pub fn format_number(value: u64, base: u8, signed: bool) -> Result<Digits, FormatError> {
    if !(2..=16).contains(&base) {
        return Err(FormatError::InvalidBase(base));
    }

    let mut digits = Digits::default();
    let mut negative = false;
    let mut magnitude = value;

    if base == 10 && signed && (value as i64) < 0 {
        magnitude = (value as i64).unsigned_abs();
        negative = true;
    }

    loop {
        let _ = digits
            .buf
            .push(DIGIT_ALPHABET[(magnitude % base as u64) as usize]);
        magnitude /= base as u64;
        if magnitude == 0 {
            break;
        }
    }

    // Markers are appended in reverse emission order; the final reversal
    // puts them in front of the digits.
    match base {
        2 => {
            let _ = digits.buf.push(b'b');
            let _ = digits.buf.push(b'0');
        }
        8 => {
            let _ = digits.buf.push(b'o');
            let _ = digits.buf.push(b'0');
        }
        16 => {
            let _ = digits.buf.push(b'x');
            let _ = digits.buf.push(b'0');
        }
        10 if negative => {
            let _ = digits.buf.push(b'-');
        }
        _ => {}
    }

    digits.buf.reverse();
    Ok(digits)
}
