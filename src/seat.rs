//! Seat-scoped pointer state and its accessors.
//!
//! Every piece of state that survives between input events lives here. The
//! event handlers are split across `cursor` (dispatch), `interactive`
//! (move/resize), `preview` and `constraint`, each adding an `impl Seat`.

use crate::click::DoubleClickTracker;
use crate::config::Config;
use crate::constraint::Constraint;
use crate::cursor_shape::{CursorNames, CursorShape};
use crate::geometry::{Rect, ResizeEdges};
use crate::interactive::ResizeThrottle;
use crate::mousebind::Modifiers;
use crate::node::{ConstraintId, SurfaceId, ViewId};
use crate::pressed::{BoundButtons, PressedState};
use crate::preview::ResizePreview;
use crate::scroll::ScrollAccumulator;
use crate::server::Server;

/// Snapshot taken when an interactive move or resize starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub view: ViewId,
    /// Cursor position at the start of the operation.
    pub grab_x: f64,
    pub grab_y: f64,
    /// View geometry at the start of the operation.
    pub grab_box: Rect,
    /// Edges being dragged; empty for moves.
    pub edges: ResizeEdges,
}

/// Top-level dispatch mode. Move and Resize own the grabbed view; leaving
/// them drops the grab.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Passthrough,
    Move(Grab),
    Resize(Grab),
    Menu,
    WindowSwitcher,
}

impl InputMode {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, InputMode::Passthrough)
    }

    pub fn grab(&self) -> Option<&Grab> {
        match self {
            InputMode::Move(grab) | InputMode::Resize(grab) => Some(grab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Seat {
    pub(crate) config: Config,
    pub(crate) mode: InputMode,
    pub(crate) cursor_x: f64,
    pub(crate) cursor_y: f64,
    pub(crate) modifiers: Modifiers,
    pub(crate) pressed: PressedState,
    pub(crate) bound_buttons: BoundButtons,
    pub(crate) double_click: DoubleClickTracker,
    pub(crate) scroll: ScrollAccumulator,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) current_constraint: Option<ConstraintId>,
    pub(crate) server_cursor: CursorShape,
    pub(crate) cursor_names: CursorNames,
    pub(crate) cursor_visible: bool,
    pub(crate) resize_throttle: ResizeThrottle,
    pub(crate) preview: ResizePreview,
    /// Time of the last press. `None` after a press inside a menu, so the
    /// paired release always selects or closes.
    pub(crate) press_msec: Option<u32>,
    pub(crate) last_event_msec: u32,
    pub(crate) updating_focus: bool,
    pub(crate) drag_active: bool,
    pub(crate) region_prevent_snap: bool,
    pub(crate) scroll_wheel_emulation: bool,
}

impl Seat {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mode: InputMode::Passthrough,
            cursor_x: 0.0,
            cursor_y: 0.0,
            modifiers: Modifiers::empty(),
            pressed: PressedState::default(),
            bound_buttons: BoundButtons::default(),
            double_click: DoubleClickTracker::new(),
            scroll: ScrollAccumulator::new(),
            constraints: Vec::new(),
            current_constraint: None,
            server_cursor: CursorShape::Client,
            cursor_names: CursorNames::Xdg,
            cursor_visible: true,
            resize_throttle: ResizeThrottle::default(),
            preview: ResizePreview::default(),
            press_msec: None,
            last_event_msec: 0,
            updating_focus: false,
            drag_active: false,
            region_prevent_snap: false,
            scroll_wheel_emulation: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn grabbed_view(&self) -> Option<ViewId> {
        self.mode.grab().map(|grab| grab.view)
    }

    pub fn cursor_position(&self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn pressed(&self) -> &PressedState {
        &self.pressed
    }

    pub fn bound_buttons(&self) -> &BoundButtons {
        &self.bound_buttons
    }

    pub fn server_cursor(&self) -> CursorShape {
        self.server_cursor
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Keyboard modifier state, fed by the host's keyboard handling.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Start or stop a client drag-and-drop session.
    pub fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }

    pub fn region_prevent_snap(&self) -> bool {
        self.region_prevent_snap
    }

    pub fn set_scroll_wheel_emulation(&mut self, enabled: bool) {
        self.scroll_wheel_emulation = enabled;
    }

    pub fn scroll_wheel_emulation(&self) -> bool {
        self.scroll_wheel_emulation
    }

    /// Record which cursor name table the theme provides and redraw.
    pub fn load_cursor_theme<S: Server>(&mut self, server: &mut S, names: CursorNames) {
        if names == CursorNames::X11 {
            tracing::info!("cursor theme is missing cursor names, using fallback");
        }
        self.cursor_names = names;
        self.update_cursor_image(server);
    }

    pub fn begin_window_switcher(&mut self) -> bool {
        if !self.mode.is_passthrough() {
            return false;
        }
        tracing::debug!("entering window switcher mode");
        self.mode = InputMode::WindowSwitcher;
        true
    }

    pub fn end_window_switcher<S: Server>(&mut self, server: &mut S) {
        if self.mode != InputMode::WindowSwitcher {
            return;
        }
        tracing::debug!("leaving window switcher mode");
        self.mode = InputMode::Passthrough;
        self.update_focus(server);
    }

    /// Close an open menu from outside the pointer path (e.g. a key press).
    pub fn close_menu<S: Server>(&mut self, server: &mut S) {
        if self.mode != InputMode::Menu {
            return;
        }
        server.close_root_menu();
        self.mode = InputMode::Passthrough;
        self.update_focus(server);
    }

    /// Destroy notification for a client surface.
    pub fn surface_destroyed(&mut self, surface: SurfaceId) {
        if self.pressed.surface_destroyed(surface) {
            tracing::debug!(surface = ?surface, "pressed surface destroyed");
        }
    }

    /// Destroy notification for a view: abandon any grab or press on it.
    pub fn view_destroyed<S: Server>(&mut self, server: &mut S, view: ViewId) {
        self.cancel_interactive(server, view);
        if self.pressed.view() == Some(view) {
            self.pressed.reset();
        }
        if self.preview.view() == Some(view) {
            self.preview.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_seat_is_idle() {
        let seat = Seat::new(Config::default());
        assert!(seat.mode().is_passthrough());
        assert_eq!(seat.grabbed_view(), None);
        assert!(seat.bound_buttons().is_empty());
        assert!(!seat.pressed().is_set());
        assert!(seat.cursor_visible());
    }

    #[test]
    fn window_switcher_requires_passthrough() {
        let mut seat = Seat::new(Config::default());
        assert!(seat.begin_window_switcher());
        assert!(!seat.begin_window_switcher());
        assert_eq!(*seat.mode(), InputMode::WindowSwitcher);
    }

    #[test]
    fn grab_is_only_exposed_for_interactive_modes() {
        let grab = Grab {
            view: ViewId(4),
            grab_x: 1.0,
            grab_y: 2.0,
            grab_box: Rect::new(0, 0, 10, 10),
            edges: ResizeEdges::empty(),
        };
        assert_eq!(InputMode::Move(grab).grab().map(|g| g.view), Some(ViewId(4)));
        assert_eq!(InputMode::Menu.grab(), None);
    }
}
