#![cfg_attr(not(test), no_std)]

//! Firmware-style console and menu core.
//!
//! Everything the surrounding firmware provides (key events, the pixel
//! frame, the system clock, power-off) enters through capability traits.
//! The core never talks to hardware directly, so the whole crate runs under
//! the host test harness.

pub mod console;
pub mod emit;
pub mod fmt;
pub mod font;
pub mod input;
pub mod menu;
pub mod paint;
pub mod status;

pub use console::{ConsoleConfig, ConsoleError, ConsoleSession};
pub use emit::{Arg, CharSink, EmitError, emit, emit_report};
pub use font::{BitOrder, Font};
pub use input::{KeyEvent, KeyPoll, KeySource, ShutdownPort};
pub use menu::{ActionError, MenuNavigator, MenuState};
pub use paint::{MenuPainter, Palette, PixelPainter, RowStyle};
pub use status::{CalendarTime, ClockSource, StatusLine};
