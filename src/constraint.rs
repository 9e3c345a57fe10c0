//! Pointer lock and confinement requested by clients.

use crate::cursor::InputDevice;
use crate::geometry::Rect;
use crate::node::{ConstraintId, SurfaceId};
use crate::seat::Seat;
use crate::server::Server;

/// Union of boxes in surface-local coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    boxes: Vec<Rect>,
}

impl Region {
    pub fn new(boxes: Vec<Rect>) -> Self {
        Self { boxes }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self { boxes: vec![rect] }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.box_at(x, y).is_some()
    }

    fn box_at(&self, x: f64, y: f64) -> Option<&Rect> {
        let (x, y) = (x.floor(), y.floor());
        self.boxes.iter().find(|b| b.contains(x, y))
    }

    /// Confine a motion from `from` to `to`. Returns `None` when the start
    /// point lies outside the region, the target when it is inside, and
    /// otherwise the target clamped to the box holding the start point.
    pub fn confine(&self, from: (f64, f64), to: (f64, f64)) -> Option<(f64, f64)> {
        let start = self.box_at(from.0, from.1)?;
        if self.contains(to.0, to.1) {
            return Some(to);
        }
        let (x, y) = start.closest_point(to.0, to.1);
        Some((x, y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Motion is dropped entirely; the client sees only relative motion.
    Locked,
    Confined(Region),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub id: ConstraintId,
    pub surface: SurfaceId,
    pub kind: ConstraintKind,
    /// Where the client wants the cursor when the constraint ends, local
    /// to its surface.
    pub cursor_hint: Option<(f64, f64)>,
}

impl Seat {
    pub fn current_constraint(&self) -> Option<&Constraint> {
        let id = self.current_constraint?;
        self.constraints.iter().find(|c| c.id == id)
    }

    /// Register a new constraint; it activates at once if its surface
    /// belongs to the active view.
    pub fn create_constraint<S: Server>(&mut self, server: &mut S, constraint: Constraint) {
        let id = constraint.id;
        let surface = constraint.surface;
        self.constraints.retain(|c| c.id != id);
        self.constraints.push(constraint);

        let active_surface = server
            .active_view()
            .and_then(|view| server.view(view))
            .and_then(|state| state.surface);
        if active_surface == Some(surface) {
            self.constrain_cursor(server, Some(id));
        }
    }

    /// Make `id` the active constraint, deactivating the previous one.
    /// Dropping to no constraint warps the cursor to the old hint.
    pub fn constrain_cursor<S: Server>(&mut self, server: &mut S, id: Option<ConstraintId>) {
        if self.current_constraint == id {
            return;
        }
        if let Some(old) = self.current_constraint {
            if id.is_none() {
                self.warp_to_constraint_hint(server, old);
            }
            server.constraint_deactivated(old);
        }
        self.current_constraint = id;
        if let Some(id) = id {
            tracing::debug!(constraint = ?id, "pointer constraint activated");
            server.constraint_activated(id);
        }
    }

    /// Keyboard focus moved to `surface`: activate its constraint, if any.
    pub fn refocus_constraint<S: Server>(&mut self, server: &mut S, surface: Option<SurfaceId>) {
        let id = surface.and_then(|surface| {
            self.constraints
                .iter()
                .find(|c| c.surface == surface)
                .map(|c| c.id)
        });
        self.constrain_cursor(server, id);
    }

    pub fn set_cursor_hint(&mut self, id: ConstraintId, hint: Option<(f64, f64)>) {
        if let Some(constraint) = self.constraints.iter_mut().find(|c| c.id == id) {
            constraint.cursor_hint = hint;
        }
    }

    pub fn destroy_constraint<S: Server>(&mut self, server: &mut S, id: ConstraintId) {
        if self.current_constraint == Some(id) {
            self.warp_to_constraint_hint(server, id);
            self.current_constraint = None;
        }
        self.constraints.retain(|c| c.id != id);
    }

    pub(crate) fn cursor_locked(&self, device: InputDevice) -> bool {
        device == InputDevice::Pointer
            && self
                .current_constraint()
                .is_some_and(|c| c.kind == ConstraintKind::Locked)
    }

    /// Shorten a pointer delta so the cursor stays inside the confinement
    /// region. Deltas are returned unchanged when confinement fails.
    pub(crate) fn apply_constraint<S: Server>(
        &self,
        server: &S,
        device: InputDevice,
        dx: f64,
        dy: f64,
    ) -> (f64, f64) {
        if device != InputDevice::Pointer {
            return (dx, dy);
        }
        let Some(ConstraintKind::Confined(region)) = self.current_constraint().map(|c| &c.kind)
        else {
            return (dx, dy);
        };
        let Some(origin) = server
            .active_view()
            .and_then(|view| server.view_current_geometry(view))
        else {
            return (dx, dy);
        };
        let sx = self.cursor_x - origin.x as f64;
        let sy = self.cursor_y - origin.y as f64;
        match region.confine((sx, sy), (sx + dx, sy + dy)) {
            Some((cx, cy)) => (cx - sx, cy - sy),
            None => (dx, dy),
        }
    }

    fn warp_to_constraint_hint<S: Server>(&mut self, server: &mut S, id: ConstraintId) {
        let Some((hx, hy)) = self
            .constraints
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.cursor_hint)
        else {
            return;
        };
        let Some(origin) = server
            .active_view()
            .and_then(|view| server.view_current_geometry(view))
        else {
            return;
        };
        self.cursor_x = origin.x as f64 + hx;
        self.cursor_y = origin.y as f64 + hy;
        tracing::debug!(x = self.cursor_x, y = self.cursor_y, "warp to constraint hint");
        server.warp_pointer(self.cursor_x, self.cursor_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confine_keeps_inside_targets() {
        let region = Region::from_rect(Rect::new(0, 0, 100, 100));
        assert_eq!(region.confine((10.0, 10.0), (50.0, 60.0)), Some((50.0, 60.0)));
    }

    #[test]
    fn confine_clamps_to_start_box() {
        let region = Region::from_rect(Rect::new(0, 0, 100, 100));
        let (x, y) = region.confine((10.0, 10.0), (150.0, -20.0)).expect("inside");
        assert!(x < 100.0 && x > 99.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn confine_fails_from_outside() {
        let region = Region::from_rect(Rect::new(0, 0, 100, 100));
        assert_eq!(region.confine((200.0, 10.0), (50.0, 50.0)), None);
    }

    #[test]
    fn multi_box_region_allows_crossing() {
        let region = Region::new(vec![Rect::new(0, 0, 50, 50), Rect::new(50, 0, 50, 50)]);
        assert_eq!(region.confine((10.0, 10.0), (70.0, 10.0)), Some((70.0, 10.0)));
    }
}
