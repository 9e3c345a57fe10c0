//! Interactive move and resize.
//!
//! A move or resize owns the grabbed view from `begin_*` until
//! `finish_interactive` or `cancel_interactive`. While it runs, pointer
//! motion never reaches clients.

use crate::constants::FALLBACK_REFRESH_MHZ;
use crate::cursor_shape::CursorShape;
use crate::geometry::{Rect, ResizeEdges, anchor_box_to_cursor};
use crate::node::ViewId;
use crate::seat::{Grab, InputMode, Seat};
use crate::server::Server;
use crate::snap::{SnapTarget, edge_snap_info};
use crate::view::{TiledState, ViewAxis};

/// Last resize commit, used to hold resize updates to the output refresh
/// rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeThrottle {
    last_view: Option<ViewId>,
    last_msec: u32,
}

impl ResizeThrottle {
    /// Returns false if an update for `view` at `time_msec` comes too soon
    /// after the previous one. Accepted updates are recorded.
    pub fn admit(&mut self, view: ViewId, time_msec: u32, refresh_mhz: i32) -> bool {
        if self.last_view == Some(view) {
            let refresh = if refresh_mhz <= 0 {
                FALLBACK_REFRESH_MHZ
            } else {
                refresh_mhz
            };
            let interval = 1_000_000 / refresh as u32;
            if time_msec.wrapping_sub(self.last_msec) < interval {
                return false;
            }
        }
        self.last_view = Some(view);
        self.last_msec = time_msec;
        true
    }
}

impl Seat {
    /// Start moving `view` with the pointer.
    ///
    /// A tiled or maximized view that unsnap resistance still holds keeps
    /// its tiled state here; it is untiled and restored under the cursor by
    /// the first motion that breaks free.
    pub fn begin_move<S: Server>(&mut self, server: &mut S, view: ViewId) {
        let Some(state) = self.interactive_candidate(server, view) else {
            return;
        };
        if state.fullscreen {
            return;
        }

        let mut geometry = state.current;
        // A tiled view held by unsnap resistance stays put until the drag
        // passes the threshold; process_cursor_move restores it then.
        let (mut hold_x, mut hold_y) = (state.current.x, state.current.y);
        let held = !state.is_floating() && !server.unsnap(view, &mut hold_x, &mut hold_y);
        if held {
            tracing::debug!(view = ?view, "tiled view held by resistance");
        } else if !state.is_floating() {
            // Leave maximize/tile now at natural size; a snap on release
            // may put it right back.
            geometry.width = state.natural.width;
            geometry.height = state.natural.height;
            anchor_box_to_cursor(&mut geometry, &state.current, self.cursor_x, self.cursor_y);
            server.set_shade(view, false);
            server.set_untiled(view);
            server.restore_to(view, geometry);
        } else {
            server.store_natural_geometry(view);
            server.invalidate_last_layout_geometry(view);
        }

        // A modifier held at the start (A-Left drag) means the user moves
        // freely and does not want region snapping.
        self.region_prevent_snap = !self.modifiers.is_empty();
        self.set_cursor(server, CursorShape::Grab);
        self.enter_grab(view, geometry, ResizeEdges::empty(), false);
    }

    /// Start resizing `view` by dragging `edges`.
    pub fn begin_resize<S: Server>(&mut self, server: &mut S, view: ViewId, edges: ResizeEdges) {
        let Some(state) = self.interactive_candidate(server, view) else {
            return;
        };
        if state.shaded || state.fullscreen || state.maximized == ViewAxis::Both {
            return;
        }

        server.invalidate_last_layout_geometry(view);
        // Half-maximized or tiled views resize from where they are now.
        server.set_untiled(view);
        server.restore_to(view, state.pending);
        self.set_cursor(server, CursorShape::from_edges(edges));
        self.enter_grab(view, state.current, edges, true);
    }

    fn interactive_candidate<S: Server>(
        &self,
        server: &S,
        view: ViewId,
    ) -> Option<crate::view::ViewState> {
        if !self.mode.is_passthrough() {
            return None;
        }
        let state = server.view(view)?;
        if state.fixed_position || state.has_strut {
            tracing::debug!(view = ?view, "view cannot be moved or resized");
            return None;
        }
        Some(state)
    }

    fn enter_grab(&mut self, view: ViewId, grab_box: Rect, edges: ResizeEdges, resize: bool) {
        let grab = Grab {
            view,
            grab_x: self.cursor_x,
            grab_y: self.cursor_y,
            grab_box,
            edges,
        };
        self.mode = if resize {
            InputMode::Resize(grab)
        } else {
            InputMode::Move(grab)
        };
        tracing::debug!(view = ?view, resize, edges = ?edges, "interactive begin");
    }

    pub(crate) fn process_cursor_move<S: Server>(&mut self, server: &mut S) {
        let InputMode::Move(grab) = self.mode else {
            return;
        };
        let view = grab.view;
        let mut x = (grab.grab_box.x as f64 + (self.cursor_x - grab.grab_x)) as i32;
        let mut y = (grab.grab_box.y as f64 + (self.cursor_y - grab.grab_y)) as i32;

        if server.unsnap(view, &mut x, &mut y) {
            if let Some(state) = server.view(view) {
                let mut geometry =
                    Rect::new(0, 0, state.natural.width, state.natural.height);
                anchor_box_to_cursor(&mut geometry, &state.current, self.cursor_x, self.cursor_y);
                server.set_shade(view, false);
                server.set_untiled(view);
                server.restore_to(view, geometry);
                x = geometry.x;
                y = geometry.y;
                // Continue the drag from the restored box.
                self.mode = InputMode::Move(Grab {
                    grab_x: self.cursor_x,
                    grab_y: self.cursor_y,
                    grab_box: Rect { x, y, ..geometry },
                    ..grab
                });
                tracing::debug!(view = ?view, "untiled during move");
            }
        }

        server.apply_move_resistance(view, &mut x, &mut y);
        server.move_view(view, x, y);
        self.update_snap_overlay(server, view);
    }

    pub(crate) fn process_cursor_resize<S: Server>(&mut self, server: &mut S, time_msec: u32) {
        let InputMode::Resize(grab) = self.mode else {
            return;
        };
        let view = grab.view;
        let refresh = server
            .output_of_view(view)
            .filter(|output| output.usable)
            .map_or(0, |output| output.refresh_mhz);
        if !self.resize_throttle.admit(view, time_msec, refresh) {
            return;
        }

        let Some(current) = server.view_current_geometry(view) else {
            return;
        };
        let dx = self.cursor_x - grab.grab_x;
        let dy = self.cursor_y - grab.grab_y;
        let edges = grab.edges;
        let origin = grab.grab_box;
        let mut geometry = current;

        if edges.contains(ResizeEdges::TOP) {
            geometry.y = (origin.y as f64 + dy) as i32;
            geometry.height = (origin.height as f64 - dy) as i32;
        } else if edges.contains(ResizeEdges::BOTTOM) {
            geometry.height = (origin.height as f64 + dy) as i32;
        }
        if edges.contains(ResizeEdges::LEFT) {
            geometry.x = (origin.x as f64 + dx) as i32;
            geometry.width = (origin.width as f64 - dx) as i32;
        } else if edges.contains(ResizeEdges::RIGHT) {
            geometry.width = (origin.width as f64 + dx) as i32;
        }

        server.apply_resize_resistance(view, &mut geometry);
        server.adjust_size(view, &mut geometry.width, &mut geometry.height);

        // Size hints may have changed the size; keep the far edge fixed.
        if edges.contains(ResizeEdges::TOP) {
            geometry.y = origin.y + origin.height - geometry.height;
        }
        if edges.contains(ResizeEdges::LEFT) {
            geometry.x = origin.x + origin.width - geometry.width;
        }

        if self.config.resize_draw_contents {
            server.set_view_geometry(view, geometry);
        } else {
            self.update_preview(server, view, geometry);
        }
    }

    /// Whether releasing a move now would snap to a region.
    pub fn regions_should_snap(&self) -> bool {
        matches!(self.mode, InputMode::Move(_))
            && !self.region_prevent_snap
            && !self.modifiers.is_empty()
    }

    fn snap_target<S: Server>(&self, server: &S) -> Option<SnapTarget> {
        if self.regions_should_snap()
            && let Some(region) = server.region_at_cursor(self.cursor_x, self.cursor_y)
        {
            return Some(SnapTarget::Region(region));
        }
        let output = server.nearest_output(self.cursor_x, self.cursor_y);
        edge_snap_info(&self.config, output.as_ref(), self.cursor_x, self.cursor_y)
            .map(SnapTarget::Edge)
    }

    fn update_snap_overlay<S: Server>(&self, server: &mut S, view: ViewId) {
        let target = self.snap_target(server);
        server.update_overlay(view, target);
    }

    fn snap_to_region<S: Server>(&self, server: &mut S, view: ViewId) -> bool {
        if !self.regions_should_snap() {
            return false;
        }
        let Some(region) = server.region_at_cursor(self.cursor_x, self.cursor_y) else {
            return false;
        };
        tracing::debug!(view = ?view, region = ?region, "snap to region");
        server.snap_to_region(view, region);
        true
    }

    fn snap_to_edge<S: Server>(&self, server: &mut S, view: ViewId) -> bool {
        let output = server.nearest_output(self.cursor_x, self.cursor_y);
        let Some(info) = edge_snap_info(&self.config, output.as_ref(), self.cursor_x, self.cursor_y)
        else {
            return false;
        };
        tracing::debug!(view = ?view, tiled = ?info.tiled_state, "snap to edge");
        // Natural geometry was stored when the move began.
        if info.tiled_state == TiledState::Center {
            server.maximize(view, ViewAxis::Both, false);
        } else {
            server.snap_to_edge(view, info.tiled_state, info.output, false);
        }
        true
    }

    /// End the interactive operation on `view`, snapping a moved view if
    /// the cursor is over a region or near an output edge.
    pub fn finish_interactive<S: Server>(&mut self, server: &mut S, view: ViewId) {
        if self.grabbed_view() != Some(view) {
            return;
        }
        if self.preview.is_active() && self.preview.view() == Some(view) {
            self.finish_preview(server, self.last_event_msec);
        }
        if matches!(self.mode, InputMode::Move(_)) && !self.snap_to_region(server, view) {
            self.snap_to_edge(server, view);
        }
        self.cancel_interactive(server, view);
    }

    /// Drop the grab on `view` without touching its geometry. Safe to call
    /// when `view` is not grabbed.
    pub fn cancel_interactive<S: Server>(&mut self, server: &mut S, view: ViewId) {
        if self.grabbed_view() != Some(view) {
            return;
        }
        server.hide_overlay();
        self.discard_preview(server, view);
        self.mode = InputMode::Passthrough;
        tracing::debug!(view = ?view, "interactive end");
        self.update_focus(server);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_only_applies_to_the_same_view() {
        let mut throttle = ResizeThrottle::default();
        assert!(throttle.admit(ViewId(1), 1000, 60_000));
        // 60 Hz allows one update every 16 ms.
        assert!(!throttle.admit(ViewId(1), 1010, 60_000));
        assert!(throttle.admit(ViewId(2), 1010, 60_000));
        assert!(throttle.admit(ViewId(2), 1026, 60_000));
    }

    #[test]
    fn unknown_refresh_falls_back_to_250hz() {
        let mut throttle = ResizeThrottle::default();
        assert!(throttle.admit(ViewId(1), 0, 0));
        assert!(!throttle.admit(ViewId(1), 3, 0));
        assert!(throttle.admit(ViewId(1), 4, -1));
    }

    #[test]
    fn throttle_survives_timestamp_wrap() {
        let mut throttle = ResizeThrottle::default();
        assert!(throttle.admit(ViewId(1), u32::MAX - 2, 60_000));
        assert!(!throttle.admit(ViewId(1), 5, 60_000));
        assert!(throttle.admit(ViewId(1), 20, 60_000));
    }
}
