//! Wall-clock status line redrawn in place at the top of the console.

use crate::console::{ConsoleError, ConsoleSession};
use crate::emit::{Arg, CharSink, EmitError, emit};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CalendarTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Calendar clock capability, polled.
pub trait ClockSource {
    type Error;

    fn now(&mut self) -> Result<CalendarTime, Self::Error>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusError<CE> {
    Clock(CE),
    Console(EmitError<ConsoleError>),
}

/// Writes `YYYY-MM-DD` and `HH:MM:SS` lines with two-digit zero padding.
pub fn write_status<S: CharSink>(
    sink: &mut S,
    time: &CalendarTime,
) -> Result<(), EmitError<S::Error>> {
    emit(
        sink,
        "%u-%s%u-%s%u\r\n%s%u:%s%u:%s%u",
        &[
            Arg::Uint(time.year as u32),
            Arg::Str(pad(time.month)),
            Arg::Uint(time.month as u32),
            Arg::Str(pad(time.day)),
            Arg::Uint(time.day as u32),
            Arg::Str(pad(time.hour)),
            Arg::Uint(time.hour as u32),
            Arg::Str(pad(time.minute)),
            Arg::Uint(time.minute as u32),
            Arg::Str(pad(time.second)),
            Arg::Uint(time.second as u32),
        ],
    )
}

fn pad(value: u8) -> &'static str {
    if value < 10 { "0" } else { "" }
}

/// Tracks the last drawn second so a cooperative loop can poll freely.
#[derive(Default)]
pub struct StatusLine {
    last_second: Option<u8>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls the clock and redraws at the home position when the second
    /// changed. Returns whether a redraw happened.
    pub fn refresh<C: ClockSource>(
        &mut self,
        console: &mut ConsoleSession<'_, '_>,
        clock: &mut C,
    ) -> Result<bool, StatusError<C::Error>> {
        let time = clock.now().map_err(StatusError::Clock)?;
        if self.last_second == Some(time.second) {
            return Ok(false);
        }

        console
            .move_to(0, 0)
            .map_err(|err| StatusError::Console(EmitError::Sink(err)))?;
        write_status(console, &time).map_err(StatusError::Console)?;
        self.last_second = Some(time.second);
        Ok(true)
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub CalendarTime);

impl ClockSource for FixedClock {
    type Error = core::convert::Infallible;

    fn now(&mut self) -> Result<CalendarTime, Self::Error> {
        Ok(self.0)
    }
}
