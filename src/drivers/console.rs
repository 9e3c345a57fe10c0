use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    self as term_event, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
    MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Where raw terminal events come from.
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

/// The controlling terminal, through crossterm's global reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        term_event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        term_event::read()
    }
}

/// Reads pointer and key events from an [`EventSource`].
///
/// Terminals report a drag as one event per cell crossed. Runs of drag or
/// hover events that are already available are collapsed into the last
/// one, since the playground warps the seat to absolute cells anyway.
pub struct ConsoleInputDriver<E = TerminalEvents> {
    source: E,
    pending: VecDeque<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::with_source(TerminalEvents)
    }
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventSource> ConsoleInputDriver<E> {
    pub fn with_source(source: E) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
        }
    }

    /// Events the playground has no use for.
    fn ignored(event: &Event) -> bool {
        match event {
            Event::Key(key) => key.kind == KeyEventKind::Release,
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => true,
            _ => false,
        }
    }

    /// `next` replaces `current` when both are pointer motion of the same
    /// kind with the same modifiers.
    fn supersedes(current: &Event, next: &Event) -> bool {
        let (Event::Mouse(a), Event::Mouse(b)) = (current, next) else {
            return false;
        };
        let same_motion = match (a.kind, b.kind) {
            (MouseEventKind::Drag(x), MouseEventKind::Drag(y)) => x == y,
            (MouseEventKind::Moved, MouseEventKind::Moved) => true,
            _ => false,
        };
        same_motion && a.modifiers == b.modifiers
    }

    fn next_raw(&mut self) -> io::Result<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }
        loop {
            let event = self.source.read()?;
            if !Self::ignored(&event) {
                return Ok(event);
            }
        }
    }

    fn coalesce(&mut self, mut event: Event) -> io::Result<Event> {
        loop {
            let next = match self.pending.pop_front() {
                Some(next) => next,
                None if self.source.poll(Duration::ZERO)? => self.source.read()?,
                None => return Ok(event),
            };
            if Self::ignored(&next) {
                continue;
            }
            if Self::supersedes(&event, &next) {
                event = next;
            } else {
                self.pending.push_front(next);
                return Ok(event);
            }
        }
    }
}

impl<E: EventSource> InputDriver for ConsoleInputDriver<E> {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        self.source.poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        let event = self.next_raw()?;
        self.coalesce(event)
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

/// Full-screen ratatui terminal on the alternate screen.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        tracing::debug!("terminal entered");
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        tracing::debug!("terminal restored");
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};

    /// Events as a terminal would deliver them, without a terminal.
    struct Scripted(VecDeque<Event>);

    impl EventSource for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    type Driver = ConsoleInputDriver<Scripted>;

    fn driver(events: impl IntoIterator<Item = Event>) -> Driver {
        ConsoleInputDriver::with_source(Scripted(events.into_iter().collect()))
    }

    fn mouse(kind: MouseEventKind, column: u16, modifiers: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row: 1,
            modifiers,
        })
    }

    fn key_release(c: char) -> Event {
        let mut release = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        Event::Key(release)
    }

    #[test]
    fn drag_runs_collapse_to_the_last_cell() {
        let drag = MouseEventKind::Drag(MouseButton::Left);
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 4, KeyModifiers::NONE);
        let mut driver = driver([
            mouse(drag, 2, KeyModifiers::NONE),
            mouse(drag, 3, KeyModifiers::NONE),
            Event::FocusLost,
            mouse(drag, 4, KeyModifiers::NONE),
            up.clone(),
        ]);

        assert!(driver.poll(Duration::ZERO).unwrap());
        assert_eq!(driver.read().unwrap(), mouse(drag, 4, KeyModifiers::NONE));
        assert!(driver.poll(Duration::ZERO).unwrap());
        assert_eq!(driver.read().unwrap(), up);
        assert!(!driver.poll(Duration::ZERO).unwrap());
    }

    #[test]
    fn a_lone_motion_is_returned_as_is() {
        let moved = mouse(MouseEventKind::Moved, 7, KeyModifiers::NONE);
        let mut driver = driver([moved.clone()]);
        assert_eq!(driver.read().unwrap(), moved);
        assert!(!driver.poll(Duration::ZERO).unwrap());
    }

    #[test]
    fn ignored_events_are_skipped_before_the_next_read() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        let mut driver = driver([key_release('a'), Event::FocusGained, press.clone()]);
        assert_eq!(driver.read().unwrap(), press);
    }

    #[test]
    fn presses_and_modifier_changes_are_kept() {
        let drag = MouseEventKind::Drag(MouseButton::Left);
        let down = MouseEventKind::Down(MouseButton::Left);
        assert!(!Driver::supersedes(
            &mouse(down, 1, KeyModifiers::NONE),
            &mouse(down, 1, KeyModifiers::NONE)
        ));
        assert!(!Driver::supersedes(
            &mouse(drag, 1, KeyModifiers::NONE),
            &mouse(drag, 2, KeyModifiers::ALT)
        ));
        assert!(!Driver::supersedes(
            &mouse(drag, 1, KeyModifiers::NONE),
            &mouse(MouseEventKind::Drag(MouseButton::Right), 2, KeyModifiers::NONE)
        ));
        assert!(Driver::supersedes(
            &mouse(MouseEventKind::Moved, 1, KeyModifiers::NONE),
            &mouse(MouseEventKind::Moved, 9, KeyModifiers::NONE)
        ));
    }

    #[test]
    fn key_releases_and_focus_changes_are_ignored() {
        assert!(Driver::ignored(&key_release('q')));
        assert!(Driver::ignored(&Event::FocusLost));
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!Driver::ignored(&Event::Key(press)));
    }
}
