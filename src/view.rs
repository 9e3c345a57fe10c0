//! The slice of window state the input core reads.

use crate::geometry::Rect;
use crate::node::SurfaceId;

/// Which axes of a view are maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewAxis {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

/// Named screen region a view can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TiledState {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    /// Maximized rather than tiled.
    Center,
}

/// Output edge that triggered an edge snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEdge {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub surface: Option<SurfaceId>,
    /// Committed geometry of the client area.
    pub current: Rect,
    /// Geometry most recently requested from the client.
    pub pending: Rect,
    /// Floating geometry to return to when leaving a tiled or maximized state.
    pub natural: Rect,
    pub fullscreen: bool,
    pub shaded: bool,
    pub maximized: ViewAxis,
    pub tiled: TiledState,
    pub tiled_region: bool,
    pub fixed_position: bool,
    /// Panels and docks reserve screen space and never move interactively.
    pub has_strut: bool,
    /// Offset of the client's window geometry inside its surface.
    pub geometry_offset: (i32, i32),
}

impl ViewState {
    pub fn is_floating(&self) -> bool {
        !(self.fullscreen
            || self.maximized != ViewAxis::None
            || self.tiled != TiledState::None
            || self.tiled_region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floating_excludes_every_pinned_state() {
        let mut state = ViewState::default();
        assert!(state.is_floating());
        state.maximized = ViewAxis::Vertical;
        assert!(!state.is_floating());
        state.maximized = ViewAxis::None;
        state.tiled_region = true;
        assert!(!state.is_floating());
        state.tiled_region = false;
        state.tiled = TiledState::Left;
        assert!(!state.is_floating());
    }
}
