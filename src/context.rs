//! Hit-testing: classify whatever is under the pointer.

use crate::node::{NodeDescriptor, NodeId, NodeKind, SurfaceId, ViewId};
use crate::part::Part;
use crate::server::SceneGraph;

/// What a pointer position resolved to.
///
/// Surface-bearing variants carry their surface; the others cannot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PartKind {
    /// Nothing but the desktop background.
    Root,
    Client {
        surface: SurfaceId,
        view: Option<ViewId>,
    },
    /// A server-side decoration region of a view. `Part::None` means the
    /// view's tree was hit but no decoration part claims the point.
    Decoration { part: Part, view: ViewId },
    MenuItem,
    LayerSurface { surface: SurfaceId },
    LayerSubsurface { surface: SurfaceId },
    Unmanaged { surface: SurfaceId },
    #[default]
    None,
}

/// Result of one hit-test. Built fresh for every event and never kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorContext {
    pub kind: PartKind,
    /// Node that decided the classification. Decoration buttons and menu
    /// items report their own node, not the leaf under the pointer.
    pub node: Option<NodeId>,
    /// Pointer position local to the hit node.
    pub sx: f64,
    pub sy: f64,
}

impl CursorContext {
    pub fn root() -> Self {
        Self {
            kind: PartKind::Root,
            ..Self::default()
        }
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        match self.kind {
            PartKind::Client { surface, .. }
            | PartKind::LayerSurface { surface }
            | PartKind::LayerSubsurface { surface }
            | PartKind::Unmanaged { surface } => Some(surface),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<ViewId> {
        match self.kind {
            PartKind::Client { view, .. } => view,
            PartKind::Decoration { view, .. } => Some(view),
            _ => None,
        }
    }

    /// Binding context of the target.
    pub fn part(&self) -> Part {
        match self.kind {
            PartKind::Root => Part::Root,
            PartKind::Client { .. } => Part::Client,
            PartKind::Decoration { part, .. } => part,
            PartKind::MenuItem => Part::Menu,
            PartKind::LayerSurface { .. } => Part::LayerSurface,
            PartKind::LayerSubsurface { .. } => Part::LayerSubsurface,
            PartKind::Unmanaged { .. } => Part::Unmanaged,
            PartKind::None => Part::None,
        }
    }
}

/// Classify the topmost node at a layout point.
///
/// Drag icons are hidden while querying so they never shadow the real
/// target. The first descriptor found walking from the leaf towards the root
/// decides the result.
pub fn resolve<S: SceneGraph + ?Sized>(scene: &mut S, x: f64, y: f64) -> CursorContext {
    let icons_visible = scene.drag_icons_visible();
    if icons_visible {
        scene.set_drag_icons_visible(false);
    }
    let hit = scene.node_at(x, y);
    if icons_visible {
        scene.set_drag_icons_visible(true);
    }

    let Some((leaf, sx, sy)) = hit else {
        return CursorContext::root();
    };
    let mut ctx = CursorContext {
        kind: PartKind::None,
        node: Some(leaf),
        sx,
        sy,
    };

    if scene.node_kind(leaf) == Some(NodeKind::Buffer)
        && scene.is_unmanaged(leaf)
        && let Some(surface) = scene.surface_from_node(leaf)
    {
        ctx.kind = PartKind::Unmanaged { surface };
        return ctx;
    }

    let mut node = Some(leaf);
    while let Some(current) = node {
        if let Some(descriptor) = scene.descriptor(current) {
            match descriptor {
                NodeDescriptor::View(view) | NodeDescriptor::XdgPopup(view) => {
                    let part = scene.ssd_part_at(view, leaf, x, y);
                    ctx.kind = match (part, scene.surface_from_node(leaf)) {
                        (Part::Client, Some(surface)) => PartKind::Client {
                            surface,
                            view: Some(view),
                        },
                        _ => PartKind::Decoration { part, view },
                    };
                    return ctx;
                }
                NodeDescriptor::SsdButton { part, view } => {
                    ctx.node = Some(current);
                    ctx.kind = PartKind::Decoration { part, view };
                    return ctx;
                }
                NodeDescriptor::LayerSurface(surface) => {
                    ctx.node = Some(current);
                    ctx.kind = PartKind::LayerSurface { surface };
                    return ctx;
                }
                NodeDescriptor::LayerPopup(surface) => {
                    ctx.node = Some(current);
                    ctx.kind = PartKind::Client {
                        surface,
                        view: None,
                    };
                    return ctx;
                }
                NodeDescriptor::SessionLockSurface(surface) | NodeDescriptor::ImePopup(surface) => {
                    let surface = scene.surface_from_node(leaf).unwrap_or(surface);
                    ctx.kind = PartKind::Client {
                        surface,
                        view: None,
                    };
                    return ctx;
                }
                NodeDescriptor::MenuItem => {
                    ctx.node = Some(current);
                    ctx.kind = PartKind::MenuItem;
                    return ctx;
                }
                NodeDescriptor::Tree | NodeDescriptor::Node | NodeDescriptor::ScaledBuffer => {}
            }
        }

        // Layer-shell subsurfaces carry no descriptor of their own.
        if scene.node_kind(current) == Some(NodeKind::Buffer)
            && let Some(surface) = scene.surface_from_node(current)
            && scene.is_subsurface(surface)
            && scene.subsurface_parent_layer(surface).is_some()
        {
            ctx.kind = PartKind::LayerSubsurface { surface };
            return ctx;
        }

        node = scene.parent(current);
    }

    ctx
}
