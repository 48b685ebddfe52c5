//! Menu state machine and its blocking interaction loop.
//!
//! Key handling is a pure transition function so it can be tested without a
//! framebuffer or a keyboard; [`run`] wires it to the capability traits.

use log::debug;

use crate::emit::{Arg, CharSink, EmitError, emit};
use crate::input::{KeyEvent, KeySource, SCANCODE_DOWN, SCANCODE_ESC, SCANCODE_UP, ShutdownPort};
use crate::paint::{MenuPainter, RowStyle};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuState {
    /// Not yet drawn.
    Idle,
    Highlighted(usize),
    Executing(usize),
    ShuttingDown,
}

/// What the caller must do after feeding a key in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuReply {
    /// Key consumed, nothing to repaint.
    Ignored,
    /// Highlight moved, repaint exactly these two rows.
    Moved { from: usize, to: usize },
    /// Run the action bound to this entry.
    Invoke(usize),
    Shutdown,
}

/// An action failure carries the failing collaborator's status verbatim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionError {
    pub status: usize,
    pub message: &'static str,
}

impl ActionError {
    pub fn display_unsupported() -> Self {
        Self {
            status: 0x3,
            message: "display mode unsupported",
        }
    }

    pub fn display_device_error() -> Self {
        Self {
            status: 0x7,
            message: "display device error",
        }
    }
}

pub type Action<'f, P> = &'f mut dyn FnMut(&mut P) -> Result<(), ActionError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuError<PE, KE, DE> {
    Paint(PE),
    Keys(KE),
    Diagnostics(EmitError<DE>),
    /// Fewer actions than labels.
    EntryMismatch { labels: usize, actions: usize },
}

/// Selection cursor over a fixed list of entry labels.
pub struct MenuNavigator<'a> {
    labels: &'a [&'a str],
    index: usize,
    state: MenuState,
}

impl<'a> MenuNavigator<'a> {
    pub fn new(labels: &'a [&'a str]) -> Self {
        Self {
            labels,
            index: 0,
            state: MenuState::Idle,
        }
    }

    pub fn labels(&self) -> &'a [&'a str] {
        self.labels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Fresh entry: highlight returns to the first row.
    pub fn enter(&mut self) {
        self.index = 0;
        self.state = MenuState::Highlighted(0);
    }

    /// Re-entry after a failed action, keeping the selection.
    pub fn resume(&mut self, index: usize) {
        self.index = index.min(self.labels.len().saturating_sub(1));
        self.state = MenuState::Highlighted(self.index);
    }

    /// Pure key transition. Arrow moves saturate at the ends, confirm
    /// invokes, escape shuts down, anything else is consumed silently.
    pub fn handle_key(&mut self, key: KeyEvent) -> MenuReply {
        if key.is_confirm() {
            self.state = MenuState::Executing(self.index);
            return MenuReply::Invoke(self.index);
        }

        match key.scan_code {
            SCANCODE_UP if self.index > 0 => {
                let from = self.index;
                self.index -= 1;
                self.state = MenuState::Highlighted(self.index);
                MenuReply::Moved {
                    from,
                    to: self.index,
                }
            }
            SCANCODE_DOWN if self.index + 1 < self.labels.len() => {
                let from = self.index;
                self.index += 1;
                self.state = MenuState::Highlighted(self.index);
                MenuReply::Moved {
                    from,
                    to: self.index,
                }
            }
            SCANCODE_ESC => {
                self.state = MenuState::ShuttingDown;
                MenuReply::Shutdown
            }
            _ => MenuReply::Ignored,
        }
    }
}

/// Blocks on keys and drives painter, actions and diagnostics until the
/// operator asks to power off. Action failures are reported and survived.
pub fn run<P, K, D, S>(
    nav: &mut MenuNavigator<'_>,
    actions: &mut [Action<'_, P>],
    painter: &mut P,
    keys: &mut K,
    diagnostics: &mut D,
    shutdown: &mut S,
) -> Result<(), MenuError<P::Error, K::Error, D::Error>>
where
    P: MenuPainter,
    K: KeySource,
    D: CharSink,
    S: ShutdownPort,
{
    if actions.len() < nav.labels().len() {
        return Err(MenuError::EntryMismatch {
            labels: nav.labels().len(),
            actions: actions.len(),
        });
    }

    nav.enter();
    painter
        .paint_all(nav.labels(), nav.index())
        .map_err(MenuError::Paint)?;

    loop {
        let key = keys.wait_key().map_err(MenuError::Keys)?;
        match nav.handle_key(key) {
            MenuReply::Ignored => {}
            MenuReply::Moved { from, to } => {
                painter
                    .paint_row(from, nav.labels()[from], RowStyle::Default)
                    .map_err(MenuError::Paint)?;
                painter
                    .paint_row(to, nav.labels()[to], RowStyle::Highlighted)
                    .map_err(MenuError::Paint)?;
            }
            MenuReply::Invoke(entry) => {
                debug!("invoking menu entry {entry}");
                match (actions[entry])(painter) {
                    Ok(()) => nav.enter(),
                    Err(failure) => {
                        emit(
                            diagnostics,
                            "ERROR %x; %s\r\nPress any key to go back...\r\n",
                            &[Arg::Hex(failure.status), Arg::Str(failure.message)],
                        )
                        .map_err(MenuError::Diagnostics)?;
                        keys.wait_key().map_err(MenuError::Keys)?;
                        nav.resume(entry);
                    }
                }
                painter
                    .paint_all(nav.labels(), nav.index())
                    .map_err(MenuError::Paint)?;
            }
            MenuReply::Shutdown => shutdown.power_off(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ScriptExhausted, ScriptedKeys};
    use core::convert::Infallible;

    const LABELS: [&str; 3] = ["First", "Second", "Third"];

    fn down() -> KeyEvent {
        KeyEvent::scancode(SCANCODE_DOWN)
    }

    fn up() -> KeyEvent {
        KeyEvent::scancode(SCANCODE_UP)
    }

    fn confirm() -> KeyEvent {
        KeyEvent::unicode('\r')
    }

    #[derive(Default)]
    struct RecordingPainter {
        rows: Vec<(usize, String, RowStyle)>,
        clears: usize,
    }

    impl MenuPainter for RecordingPainter {
        type Error = Infallible;

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.clears += 1;
            Ok(())
        }

        fn paint_row(
            &mut self,
            row: usize,
            label: &str,
            style: RowStyle,
        ) -> Result<(), Self::Error> {
            self.rows.push((row, label.into(), style));
            Ok(())
        }
    }

    #[derive(Default)]
    struct StringSink(String);

    impl CharSink for StringSink {
        type Error = Infallible;

        fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
            self.0.push_str(text);
            Ok(())
        }
    }

    struct NoShutdown;

    impl ShutdownPort for NoShutdown {
        fn power_off(&mut self) -> ! {
            panic!("power off");
        }
    }

    #[test]
    fn moves_saturate_at_both_ends() {
        let mut nav = MenuNavigator::new(&LABELS);
        nav.enter();

        assert_eq!(nav.handle_key(up()), MenuReply::Ignored);
        assert_eq!(nav.index(), 0);

        assert_eq!(nav.handle_key(down()), MenuReply::Moved { from: 0, to: 1 });
        assert_eq!(nav.handle_key(down()), MenuReply::Moved { from: 1, to: 2 });
        assert_eq!(nav.handle_key(down()), MenuReply::Ignored);
        assert_eq!(nav.index(), 2);
        assert_eq!(nav.state(), MenuState::Highlighted(2));
    }

    #[test]
    fn unrecognized_keys_are_consumed_silently() {
        let mut nav = MenuNavigator::new(&LABELS);
        nav.enter();

        assert_eq!(nav.handle_key(KeyEvent::unicode('x')), MenuReply::Ignored);
        assert_eq!(nav.handle_key(KeyEvent::scancode(0x42)), MenuReply::Ignored);
        assert_eq!(nav.state(), MenuState::Highlighted(0));
    }

    #[test]
    fn escape_and_confirm_transition_the_state() {
        let mut nav = MenuNavigator::new(&LABELS);
        nav.enter();

        assert_eq!(nav.handle_key(confirm()), MenuReply::Invoke(0));
        assert_eq!(nav.state(), MenuState::Executing(0));

        nav.resume(0);
        assert_eq!(nav.handle_key(KeyEvent::scancode(SCANCODE_ESC)), MenuReply::Shutdown);
        assert_eq!(nav.state(), MenuState::ShuttingDown);
    }

    #[test]
    fn down_down_up_highlights_the_second_row() {
        let mut nav = MenuNavigator::new(&LABELS);
        let script = [down(), down(), up()];
        let mut keys = ScriptedKeys::new(&script);
        let mut painter = RecordingPainter::default();
        let mut diag = StringSink::default();
        let mut actions: [Action<'_, RecordingPainter>; 3] =
            [&mut |_| Ok(()), &mut |_| Ok(()), &mut |_| Ok(())];

        let err = run(
            &mut nav,
            &mut actions,
            &mut painter,
            &mut keys,
            &mut diag,
            &mut NoShutdown,
        )
        .unwrap_err();
        assert_eq!(err, MenuError::Keys(ScriptExhausted));

        assert_eq!(nav.index(), 1);
        assert_eq!(nav.state(), MenuState::Highlighted(1));
        // Last repaint pair: row 2 back to default, row 1 highlighted.
        assert_eq!(
            painter.rows.last(),
            Some(&(1, "Second".to_string(), RowStyle::Highlighted))
        );
        assert!(diag.0.is_empty());
    }

    #[test]
    fn successful_action_resets_the_highlight_to_the_first_row() {
        let mut nav = MenuNavigator::new(&LABELS);
        let script = [down(), confirm()];
        let mut keys = ScriptedKeys::new(&script);
        let mut painter = RecordingPainter::default();
        let mut diag = StringSink::default();
        let mut ran = 0usize;
        let mut count = |_: &mut RecordingPainter| {
            ran += 1;
            Ok(())
        };
        let mut actions: [Action<'_, RecordingPainter>; 3] =
            [&mut |_| Ok(()), &mut count, &mut |_| Ok(())];

        let err = run(
            &mut nav,
            &mut actions,
            &mut painter,
            &mut keys,
            &mut diag,
            &mut NoShutdown,
        )
        .unwrap_err();
        assert_eq!(err, MenuError::Keys(ScriptExhausted));

        drop(actions);
        assert_eq!(ran, 1);
        assert_eq!(nav.index(), 0);
        // Entry paint, then the post-action full repaint.
        assert_eq!(painter.clears, 2);
        assert_eq!(
            painter.rows.last(),
            Some(&(2, "Third".to_string(), RowStyle::Default))
        );
    }

    #[test]
    fn failed_action_reports_waits_and_keeps_the_selection() {
        let mut nav = MenuNavigator::new(&LABELS);
        // Confirm on row 1, any key to acknowledge the report.
        let script = [down(), confirm(), KeyEvent::unicode(' ')];
        let mut keys = ScriptedKeys::new(&script);
        let mut painter = RecordingPainter::default();
        let mut diag = StringSink::default();
        let mut fail = |_: &mut RecordingPainter| Err(ActionError::display_device_error());
        let mut actions: [Action<'_, RecordingPainter>; 3] =
            [&mut |_| Ok(()), &mut fail, &mut |_| Ok(())];

        let err = run(
            &mut nav,
            &mut actions,
            &mut painter,
            &mut keys,
            &mut diag,
            &mut NoShutdown,
        )
        .unwrap_err();
        assert_eq!(err, MenuError::Keys(ScriptExhausted));

        assert_eq!(
            diag.0,
            "ERROR 0x7; display device error\r\nPress any key to go back...\r\n"
        );
        // Selection survives the failure.
        assert_eq!(nav.index(), 1);
        assert_eq!(nav.state(), MenuState::Highlighted(1));
        assert_eq!(painter.clears, 2);
    }

    #[test]
    fn mismatched_action_table_is_rejected_up_front() {
        let mut nav = MenuNavigator::new(&LABELS);
        let mut keys = ScriptedKeys::new(&[]);
        let mut painter = RecordingPainter::default();
        let mut diag = StringSink::default();
        let mut actions: [Action<'_, RecordingPainter>; 1] = [&mut |_| Ok(())];

        let err = run(
            &mut nav,
            &mut actions,
            &mut painter,
            &mut keys,
            &mut diag,
            &mut NoShutdown,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MenuError::EntryMismatch {
                labels: 3,
                actions: 1
            }
        );
    }

    #[test]
    #[should_panic(expected = "power off")]
    fn escape_delegates_to_the_shutdown_port() {
        let mut nav = MenuNavigator::new(&LABELS);
        let script = [KeyEvent::scancode(SCANCODE_ESC)];
        let mut keys = ScriptedKeys::new(&script);
        let mut painter = RecordingPainter::default();
        let mut diag = StringSink::default();
        let mut actions: [Action<'_, RecordingPainter>; 3] =
            [&mut |_| Ok(()), &mut |_| Ok(()), &mut |_| Ok(())];

        let _ = run(
            &mut nav,
            &mut actions,
            &mut painter,
            &mut keys,
            &mut diag,
            &mut NoShutdown,
        );
    }
}
