//! `printf`-subset emitter over character sinks.
//!
//! The template walks one code unit at a time; `%` introduces a directive
//! whose argument comes from a typed, positionally-consumed list. The same
//! routine serves the primary and the diagnostic sink; which one is a
//! wiring choice, not a code path.

use crate::fmt::{FormatError, format_number};

/// Somewhere characters go: the pixel console, a firmware text console,
/// a test buffer.
pub trait CharSink {
    type Error;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// One formatting argument. Matched positionally against directives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arg<'a> {
    /// `%s`
    Str(&'a str),
    /// `%d`
    Int(i32),
    /// `%u`
    Uint(u32),
    /// `%x`, word-sized
    Hex(usize),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmitError<E> {
    /// Unrecognized directive character.
    BadSpecifier(char),
    /// More directives than arguments.
    MissingArgument(char),
    /// Argument variant does not match the directive.
    ArgMismatch { directive: char },
    /// Formatter failure, surfaced as-is.
    Format(FormatError),
    /// The sink itself failed to accept output.
    Sink(E),
}

/// Emits `template` to `sink`, substituting `%s`/`%d`/`%u`/`%x` from `args`.
///
/// A bad directive still writes a diagnostic naming the offending character
/// to the sink, then the call stops; output already written stays.
pub fn emit<S: CharSink>(
    sink: &mut S,
    template: &str,
    args: &[Arg<'_>],
) -> Result<(), EmitError<S::Error>> {
    let mut args = args.iter();
    let mut chars = template.chars();
    let mut one = [0u8; 4];

    while let Some(c) = chars.next() {
        if c != '%' {
            sink.write_str(c.encode_utf8(&mut one))
                .map_err(EmitError::Sink)?;
            continue;
        }

        let Some(directive) = chars.next() else {
            sink.write_str("Invalid format specifier: %\r\n")
                .map_err(EmitError::Sink)?;
            return Err(EmitError::BadSpecifier('%'));
        };

        match directive {
            's' => match args.next() {
                Some(Arg::Str(text)) => sink.write_str(text).map_err(EmitError::Sink)?,
                Some(_) => return Err(EmitError::ArgMismatch { directive }),
                None => return Err(EmitError::MissingArgument(directive)),
            },
            'd' => match args.next() {
                Some(Arg::Int(number)) => {
                    write_number(sink, *number as i64 as u64, 10, true)?;
                }
                Some(_) => return Err(EmitError::ArgMismatch { directive }),
                None => return Err(EmitError::MissingArgument(directive)),
            },
            'u' => match args.next() {
                Some(Arg::Uint(number)) => {
                    write_number(sink, *number as u64, 10, false)?;
                }
                Some(_) => return Err(EmitError::ArgMismatch { directive }),
                None => return Err(EmitError::MissingArgument(directive)),
            },
            'x' => match args.next() {
                Some(Arg::Hex(number)) => {
                    write_number(sink, *number as u64, 16, false)?;
                }
                Some(_) => return Err(EmitError::ArgMismatch { directive }),
                None => return Err(EmitError::MissingArgument(directive)),
            },
            other => {
                sink.write_str("Invalid format specifier: %")
                    .map_err(EmitError::Sink)?;
                sink.write_str(other.encode_utf8(&mut one))
                    .map_err(EmitError::Sink)?;
                sink.write_str("\r\n").map_err(EmitError::Sink)?;
                return Err(EmitError::BadSpecifier(other));
            }
        }
    }

    Ok(())
}

/// [`emit`] to `sink`, reporting any formatting failure on `diagnostics`.
///
/// Sink failures are returned untouched; a diagnostic write failure never
/// masks the original error.
pub fn emit_report<S: CharSink, D: CharSink>(
    sink: &mut S,
    diagnostics: &mut D,
    template: &str,
    args: &[Arg<'_>],
) -> Result<(), EmitError<S::Error>> {
    let result = emit(sink, template, args);
    let report = match &result {
        Ok(()) | Err(EmitError::Sink(_)) => None,
        Err(EmitError::BadSpecifier(_)) => Some("emit failed: bad directive\r\n"),
        Err(EmitError::MissingArgument(_)) => Some("emit failed: missing argument\r\n"),
        Err(EmitError::ArgMismatch { .. }) => Some("emit failed: mismatched argument\r\n"),
        Err(EmitError::Format(_)) => Some("emit failed: number formatting\r\n"),
    };
    if let Some(report) = report {
        let _ = diagnostics.write_str(report);
    }
    result
}

fn write_number<S: CharSink>(
    sink: &mut S,
    value: u64,
    base: u8,
    signed: bool,
) -> Result<(), EmitError<S::Error>> {
    let digits = format_number(value, base, signed).map_err(EmitError::Format)?;
    sink.write_str(digits.as_str()).map_err(EmitError::Sink)
}
