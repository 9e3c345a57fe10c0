//! Handles for scene nodes, surfaces, views and outputs, plus the closed set
//! of node descriptors the hit-test walk recognises.

use crate::part::Part;

/// Scene node handle. Only valid while the node exists; never retained past
/// a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Generation-checked surface handle. A destroyed surface's slot may be
/// reused, but never with the same generation, so a stale handle compares
/// unequal to the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutputId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(pub u32);

/// What a scene node is, as far as point queries care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Tree,
    Rect,
    Buffer,
}

/// Typed tag attached to the scene nodes that carry meaning for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeDescriptor {
    View(ViewId),
    XdgPopup(ViewId),
    LayerSurface(SurfaceId),
    LayerPopup(SurfaceId),
    SessionLockSurface(SurfaceId),
    ImePopup(SurfaceId),
    SsdButton { part: Part, view: ViewId },
    MenuItem,
    /// Grouping nodes with no input meaning of their own.
    Tree,
    Node,
    ScaledBuffer,
}
