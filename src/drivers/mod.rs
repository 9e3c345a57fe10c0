//! Terminal front-end for the playground binary.
//!
//! The seat never talks to the terminal directly: input arrives as crossterm
//! events through an [`InputDriver`] and the desktop is drawn through an
//! [`OutputDriver`], so tests can script both ends.

pub mod console;

use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::ui::UiFrame;

pub trait InputDriver {
    /// Whether an event is ready within `timeout`.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    /// Ask the terminal to report (or stop reporting) mouse events.
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;
    /// Drawable area in cells; one cell is one desktop pixel.
    fn size(&self) -> io::Result<(u16, u16)>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}
