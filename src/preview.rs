//! Outline shown instead of live geometry while resizing with
//! `resize_draw_contents` off.

use crate::constants::PREVIEW_HIDE_DELAY_MS;
use crate::geometry::Rect;
use crate::node::ViewId;
use crate::seat::Seat;
use crate::server::Server;

/// Timer that fires at most once per arming. Re-arming before it fires
/// moves the deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<u32>,
}

impl OneShotTimer {
    pub fn arm(&mut self, now_msec: u32, delay_msec: u32) {
        self.deadline = Some(now_msec.wrapping_add(delay_msec));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when `now_msec` reaches the deadline.
    pub fn fire_due(&mut self, now_msec: u32) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        // Signed distance keeps the comparison correct across wrap.
        if (now_msec.wrapping_sub(deadline) as i32) < 0 {
            return false;
        }
        self.deadline = None;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizePreview {
    view: Option<ViewId>,
    geometry: Option<Rect>,
    hide_timer: OneShotTimer,
}

impl ResizePreview {
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn geometry(&self) -> Option<Rect> {
        self.geometry
    }

    /// An uncommitted outline is on screen.
    pub fn is_active(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn hide_pending(&self) -> bool {
        self.hide_timer.is_armed()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Seat {
    pub fn preview(&self) -> &ResizePreview {
        &self.preview
    }

    pub(crate) fn update_preview<S: Server>(&mut self, server: &mut S, view: ViewId, geometry: Rect) {
        if let Some(old) = self.preview.view
            && old != view
        {
            server.hide_resize_preview(old);
        }
        self.preview.hide_timer.cancel();
        self.preview.view = Some(view);
        self.preview.geometry = Some(geometry);
        server.show_resize_preview(view, geometry);
    }

    /// Commit the outline geometry to its view and hide the outline a
    /// little later, once the client has had time to redraw.
    pub(crate) fn finish_preview<S: Server>(&mut self, server: &mut S, now_msec: u32) {
        let (Some(view), Some(geometry)) = (self.preview.view, self.preview.geometry.take()) else {
            return;
        };
        tracing::debug!(view = ?view, geometry = ?geometry, "committing resize preview");
        server.set_view_geometry(view, geometry);
        self.preview.hide_timer.arm(now_msec, PREVIEW_HIDE_DELAY_MS);
    }

    /// Take down an outline that was never committed.
    pub(crate) fn discard_preview<S: Server>(&mut self, server: &mut S, view: ViewId) {
        if self.preview.view != Some(view) || !self.preview.is_active() {
            return;
        }
        tracing::debug!(view = ?view, "discarding resize preview");
        server.hide_resize_preview(view);
        self.preview.clear();
    }

    /// Run timers that are due at `now_msec`. The host calls this from its
    /// event loop.
    pub fn dispatch_timers<S: Server>(&mut self, server: &mut S, now_msec: u32) {
        if self.preview.hide_timer.fire_due(now_msec)
            && let Some(view) = self.preview.view
        {
            server.hide_resize_preview(view);
            self.preview.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once_at_deadline() {
        let mut timer = OneShotTimer::default();
        timer.arm(1000, 100);
        assert!(!timer.fire_due(1099));
        assert!(timer.fire_due(1100));
        assert!(!timer.fire_due(1200));
    }

    #[test]
    fn rearming_moves_the_deadline() {
        let mut timer = OneShotTimer::default();
        timer.arm(1000, 100);
        timer.arm(1050, 100);
        assert!(!timer.fire_due(1120));
        assert!(timer.fire_due(1150));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = OneShotTimer::default();
        timer.arm(0, 100);
        timer.cancel();
        assert!(!timer.fire_due(500));
    }

    #[test]
    fn deadline_across_wrap() {
        let mut timer = OneShotTimer::default();
        timer.arm(u32::MAX - 10, 100);
        assert!(!timer.fire_due(u32::MAX));
        assert!(timer.fire_due(89));
    }
}
