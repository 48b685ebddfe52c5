//! Stdin-backed key drivers for the host harness.
//!
//! Lines stand in for firmware keystrokes: `w`/`k` is up, `s`/`j` is down,
//! `q` is escape, an empty line is confirm. Any other line sends its first
//! character as a unicode key.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use bootcon_core::input::{
    KeyEvent, KeyPoll, KeySource, Polled, SCANCODE_DOWN, SCANCODE_ESC, SCANCODE_UP,
};

pub fn map_line(line: &str) -> KeyEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.chars().next() {
        None => KeyEvent::unicode('\r'),
        Some('w' | 'k') => KeyEvent::scancode(SCANCODE_UP),
        Some('s' | 'j') => KeyEvent::scancode(SCANCODE_DOWN),
        Some('q') => KeyEvent::scancode(SCANCODE_ESC),
        Some(other) => KeyEvent::unicode(other),
    }
}

/// Blocks on one stdin line per keystroke.
pub struct BlockingStdinKeys;

impl KeySource for BlockingStdinKeys {
    type Error = io::Error;

    fn wait_key(&mut self) -> Result<KeyEvent, Self::Error> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(map_line(&line))
    }
}

/// Non-blocking driver fed by a reader thread, for exercising the polled
/// key path end to end.
pub struct ChannelKeys {
    rx: Receiver<KeyEvent>,
}

pub fn spawn_stdin_reader() -> ChannelKeys {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(map_line(&line)).is_err() {
                break;
            }
        }
    });
    ChannelKeys { rx }
}

impl KeyPoll for ChannelKeys {
    type Error = io::Error;

    fn poll_key(&mut self) -> Result<Option<KeyEvent>, Self::Error> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => {
                // Keeps the spin adapter from burning a host core.
                thread::sleep(Duration::from_millis(10));
                Ok(None)
            }
            Err(TryRecvError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin reader stopped",
            )),
        }
    }
}

/// The one key source the harness hands to the menu loop.
pub enum HarnessKeys {
    Blocking(BlockingStdinKeys),
    Polled(Polled<ChannelKeys>),
    Scripted(std::vec::IntoIter<KeyEvent>),
}

impl KeySource for HarnessKeys {
    type Error = io::Error;

    fn wait_key(&mut self) -> Result<KeyEvent, Self::Error> {
        match self {
            Self::Blocking(keys) => keys.wait_key(),
            Self::Polled(keys) => keys.wait_key(),
            Self::Scripted(events) => events.next().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted")
            }),
        }
    }
}
