//! What the last unreleased press landed on, and which buttons the
//! compositor kept for itself.

use std::collections::BTreeSet;

use crate::context::CursorContext;
use crate::geometry::ResizeEdges;
use crate::node::{NodeId, SurfaceId, ViewId};

/// Target of the outstanding press.
///
/// The surface is a weak handle paired with a destroy watch: both are set
/// and cleared together, so a destroyed surface can never be reported as
/// pressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressedState {
    ctx: Option<CursorContext>,
    toplevel: Option<SurfaceId>,
    resize_edges: ResizeEdges,
    destroy_watch: Option<SurfaceId>,
}

impl PressedState {
    pub(crate) fn new(
        ctx: CursorContext,
        toplevel: Option<SurfaceId>,
        resize_edges: ResizeEdges,
    ) -> Self {
        Self {
            destroy_watch: ctx.surface(),
            ctx: Some(ctx),
            toplevel,
            resize_edges,
        }
    }

    pub fn is_set(&self) -> bool {
        self.ctx.is_some()
    }

    /// Context captured at press time.
    pub fn context(&self) -> Option<&CursorContext> {
        self.ctx.as_ref()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.ctx.and_then(|ctx| ctx.view())
    }

    pub fn node(&self) -> Option<NodeId> {
        self.ctx.and_then(|ctx| ctx.node)
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.destroy_watch
    }

    pub fn toplevel(&self) -> Option<SurfaceId> {
        self.toplevel
    }

    pub fn resize_edges(&self) -> ResizeEdges {
        self.resize_edges
    }

    /// Destroy notification: true if the pressed surface went away and the
    /// state was cleared.
    pub(crate) fn surface_destroyed(&mut self, surface: SurfaceId) -> bool {
        if self.destroy_watch != Some(surface) {
            return false;
        }
        self.reset();
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Physical buttons whose press was consumed, so their release must not
/// reach a client either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundButtons {
    buttons: BTreeSet<u32>,
}

impl BoundButtons {
    pub fn insert(&mut self, button: u32) {
        self.buttons.insert(button);
    }

    pub fn remove(&mut self, button: u32) {
        self.buttons.remove(&button);
    }

    pub fn contains(&self, button: u32) -> bool {
        self.buttons.contains(&button)
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PartKind;

    fn surface(index: u32) -> SurfaceId {
        SurfaceId {
            index,
            generation: 0,
        }
    }

    fn client_ctx(s: SurfaceId) -> CursorContext {
        CursorContext {
            kind: PartKind::Client {
                surface: s,
                view: Some(ViewId(3)),
            },
            node: Some(NodeId(9)),
            sx: 1.0,
            sy: 2.0,
        }
    }

    #[test]
    fn surface_and_watch_are_set_together() {
        let pressed = PressedState::new(client_ctx(surface(1)), None, ResizeEdges::empty());
        assert_eq!(pressed.surface(), Some(surface(1)));
        assert_eq!(pressed.view(), Some(ViewId(3)));
        assert_eq!(pressed.node(), Some(NodeId(9)));
    }

    #[test]
    fn destroy_of_other_surface_is_ignored() {
        let mut pressed = PressedState::new(client_ctx(surface(1)), None, ResizeEdges::empty());
        assert!(!pressed.surface_destroyed(surface(2)));
        assert!(pressed.is_set());
        assert!(pressed.surface_destroyed(surface(1)));
        assert!(!pressed.is_set());
        assert_eq!(pressed.surface(), None);
        assert_eq!(pressed.view(), None);
    }

    #[test]
    fn decoration_press_has_no_watch() {
        let ctx = CursorContext {
            kind: PartKind::Decoration {
                part: crate::part::Part::Left,
                view: ViewId(1),
            },
            ..CursorContext::default()
        };
        let pressed = PressedState::new(ctx, None, ResizeEdges::LEFT);
        assert_eq!(pressed.surface(), None);
        assert_eq!(pressed.resize_edges(), ResizeEdges::LEFT);
    }

    #[test]
    fn bound_buttons_track_membership() {
        let mut bound = BoundButtons::default();
        bound.insert(272);
        bound.insert(272);
        assert_eq!(bound.len(), 1);
        bound.remove(272);
        assert!(bound.is_empty());
        bound.remove(273);
        assert!(!bound.contains(273));
    }
}
