//! Keyboard capability traits and scripted test doubles.

/// Firmware scan code for the up arrow.
pub const SCANCODE_UP: u16 = 0x01;
/// Firmware scan code for the down arrow.
pub const SCANCODE_DOWN: u16 = 0x02;
/// Firmware scan code for escape.
pub const SCANCODE_ESC: u16 = 0x17;

/// One keystroke as the firmware reports it: a scan code for function and
/// navigation keys, a unicode code point for printable ones. Exactly one of
/// the two carries the key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    pub scan_code: u16,
    pub unicode: char,
}

impl KeyEvent {
    pub fn scancode(scan_code: u16) -> Self {
        Self {
            scan_code,
            unicode: '\0',
        }
    }

    pub fn unicode(unicode: char) -> Self {
        Self {
            scan_code: 0,
            unicode,
        }
    }

    /// Carriage return with no scan code, the only confirm chord.
    pub fn is_confirm(&self) -> bool {
        self.scan_code == 0 && self.unicode == '\r'
    }
}

/// Blocking keystroke source.
pub trait KeySource {
    type Error;

    /// Parks until a key arrives.
    fn wait_key(&mut self) -> Result<KeyEvent, Self::Error>;
}

/// Non-blocking keystroke source.
pub trait KeyPoll {
    type Error;

    fn poll_key(&mut self) -> Result<Option<KeyEvent>, Self::Error>;
}

/// Adapts a poller into a blocking source by spinning.
pub struct Polled<T: KeyPoll> {
    inner: T,
}

impl<T: KeyPoll> Polled<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: KeyPoll> KeySource for Polled<T> {
    type Error = T::Error;

    fn wait_key(&mut self) -> Result<KeyEvent, Self::Error> {
        loop {
            if let Some(event) = self.inner.poll_key()? {
                return Ok(event);
            }
            core::hint::spin_loop();
        }
    }
}

/// Last resort once the operator asks to leave: cuts power and never
/// returns.
pub trait ShutdownPort {
    fn power_off(&mut self) -> !;
}

/// Replays a fixed key sequence, then reports exhaustion.
pub struct ScriptedKeys<'a> {
    events: &'a [KeyEvent],
    next: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScriptExhausted;

impl<'a> ScriptedKeys<'a> {
    pub fn new(events: &'a [KeyEvent]) -> Self {
        Self { events, next: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.next
    }
}

impl KeySource for ScriptedKeys<'_> {
    type Error = ScriptExhausted;

    fn wait_key(&mut self) -> Result<KeyEvent, Self::Error> {
        let event = self.events.get(self.next).ok_or(ScriptExhausted)?;
        self.next += 1;
        Ok(*event)
    }
}
