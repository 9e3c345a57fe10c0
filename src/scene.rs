//! In-memory scene graph: a tree of positioned nodes plus the table of
//! client surfaces they display.

use crate::node::{ClientId, NodeDescriptor, NodeId, NodeKind, SurfaceId, ViewId};
use crate::part::Part;
use crate::server::SceneGraph;

/// Protocol role of a client surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    Toplevel,
    Popup { parent: SurfaceId },
    Subsurface { parent: SurfaceId },
    Layer { keyboard_interactive: bool },
    Unmanaged,
    LockSurface,
}

#[derive(Debug, Clone)]
struct SceneNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    enabled: bool,
    descriptor: Option<NodeDescriptor>,
    part: Option<Part>,
    surface: Option<SurfaceId>,
}

#[derive(Debug, Clone)]
struct SurfaceSlot {
    generation: u32,
    alive: bool,
    role: SurfaceRole,
    client: ClientId,
}

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    surfaces: Vec<SurfaceSlot>,
    root: NodeId,
    content: NodeId,
    unmanaged: NodeId,
    drag_icons: NodeId,
    hovered_button: Option<NodeId>,
    next_client: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Root with three stacked trees: general content, unmanaged surfaces
    /// and drag icons (topmost).
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            surfaces: Vec::new(),
            root: NodeId(0),
            content: NodeId(0),
            unmanaged: NodeId(0),
            drag_icons: NodeId(0),
            hovered_button: None,
            next_client: 1,
        };
        scene.root = scene.insert(None, NodeKind::Tree, 0, 0, None);
        scene.content = scene.create_tree(scene.root);
        scene.unmanaged = scene.create_tree(scene.root);
        scene.drag_icons = scene.create_tree(scene.root);
        scene.set_enabled(scene.drag_icons, false);
        scene
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn unmanaged_tree(&self) -> NodeId {
        self.unmanaged
    }

    pub fn drag_icons(&self) -> NodeId {
        self.drag_icons
    }

    pub fn hovered_button(&self) -> Option<NodeId> {
        self.hovered_button
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        width: i32,
        height: i32,
        surface: Option<SurfaceId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(SceneNode {
            kind,
            parent,
            children: Vec::new(),
            x: 0,
            y: 0,
            width,
            height,
            enabled: true,
            descriptor: None,
            part: None,
            surface,
        }));
        if let Some(parent) = parent
            && let Some(p) = self.node_mut(parent)
        {
            p.children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn create_tree(&mut self, parent: NodeId) -> NodeId {
        self.insert(Some(parent), NodeKind::Tree, 0, 0, None)
    }

    pub fn create_rect(&mut self, parent: NodeId, width: i32, height: i32) -> NodeId {
        self.insert(Some(parent), NodeKind::Rect, width, height, None)
    }

    pub fn create_buffer(
        &mut self,
        parent: NodeId,
        width: i32,
        height: i32,
        surface: Option<SurfaceId>,
    ) -> NodeId {
        self.insert(Some(parent), NodeKind::Buffer, width, height, surface)
    }

    pub fn set_position(&mut self, node: NodeId, x: i32, y: i32) {
        if let Some(n) = self.node_mut(node) {
            n.x = x;
            n.y = y;
        }
    }

    pub fn set_size(&mut self, node: NodeId, width: i32, height: i32) {
        if let Some(n) = self.node_mut(node) {
            n.width = width;
            n.height = height;
        }
    }

    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.node_mut(node) {
            n.enabled = enabled;
        }
    }

    pub fn is_enabled(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.enabled)
    }

    pub fn set_descriptor(&mut self, node: NodeId, descriptor: NodeDescriptor) {
        if let Some(n) = self.node_mut(node) {
            n.descriptor = Some(descriptor);
        }
    }

    /// Tag a node as a decoration part.
    pub fn set_part(&mut self, node: NodeId, part: Part) {
        if let Some(n) = self.node_mut(node) {
            n.part = Some(part);
        }
    }

    pub fn part(&self, node: NodeId) -> Option<Part> {
        self.node(node).and_then(|n| n.part)
    }

    pub fn size(&self, node: NodeId) -> Option<(i32, i32)> {
        self.node(node).map(|n| (n.width, n.height))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Move a node above its siblings.
    pub fn raise_to_top(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != node);
            p.children.push(node);
        }
    }

    /// Destroy a node and its whole subtree.
    pub fn destroy_node(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        if let Some(parent) = self.node(node).and_then(|n| n.parent)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|&c| c != node);
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) {
                stack.extend(removed.children);
            }
            if self.hovered_button == Some(id) {
                self.hovered_button = None;
            }
        }
    }

    /// Create a surface owned by a fresh client, or by the parent's client
    /// for popups and subsurfaces.
    pub fn create_surface(&mut self, role: SurfaceRole) -> SurfaceId {
        let client = match role {
            SurfaceRole::Popup { parent } | SurfaceRole::Subsurface { parent } => {
                self.surface_client(parent)
            }
            _ => None,
        };
        let client = client.unwrap_or_else(|| {
            let client = ClientId(self.next_client);
            self.next_client += 1;
            client
        });
        self.create_surface_for(role, client)
    }

    pub fn create_surface_for(&mut self, role: SurfaceRole, client: ClientId) -> SurfaceId {
        if let Some(index) = self.surfaces.iter().position(|s| !s.alive) {
            let slot = &mut self.surfaces[index];
            slot.generation += 1;
            slot.alive = true;
            slot.role = role;
            slot.client = client;
            return SurfaceId {
                index: index as u32,
                generation: slot.generation,
            };
        }
        self.surfaces.push(SurfaceSlot {
            generation: 0,
            alive: true,
            role,
            client,
        });
        SurfaceId {
            index: self.surfaces.len() as u32 - 1,
            generation: 0,
        }
    }

    fn slot(&self, surface: SurfaceId) -> Option<&SurfaceSlot> {
        self.surfaces
            .get(surface.index as usize)
            .filter(|s| s.alive && s.generation == surface.generation)
    }

    /// Destroy a surface; every buffer node still showing it stops doing so.
    pub fn destroy_surface(&mut self, surface: SurfaceId) {
        let Some(slot) = self.surfaces.get_mut(surface.index as usize) else {
            return;
        };
        if slot.generation != surface.generation {
            return;
        }
        slot.alive = false;
        for node in self.nodes.iter_mut().flatten() {
            if node.surface == Some(surface) {
                node.surface = None;
            }
        }
    }

    pub fn surface_role(&self, surface: SurfaceId) -> Option<SurfaceRole> {
        self.slot(surface).map(|s| s.role)
    }

    pub fn surface_client(&self, surface: SurfaceId) -> Option<ClientId> {
        self.slot(surface).map(|s| s.client)
    }

    pub fn set_keyboard_interactive(&mut self, surface: SurfaceId, interactive: bool) {
        if let Some(slot) = self.surfaces.get_mut(surface.index as usize)
            && slot.alive
            && slot.generation == surface.generation
            && let SurfaceRole::Layer {
                keyboard_interactive,
            } = &mut slot.role
        {
            *keyboard_interactive = interactive;
        }
    }

    /// Follow popup and subsurface parents to the surface at the root.
    pub fn root_surface(&self, surface: SurfaceId) -> Option<SurfaceId> {
        let mut current = surface;
        loop {
            match self.surface_role(current)? {
                SurfaceRole::Popup { parent } | SurfaceRole::Subsurface { parent } => {
                    current = parent
                }
                _ => return Some(current),
            }
        }
    }

    fn hit(&self, id: NodeId, x: f64, y: f64, ox: i32, oy: i32) -> Option<(NodeId, f64, f64)> {
        let node = self.node(id)?;
        if !node.enabled {
            return None;
        }
        let (nx, ny) = (ox + node.x, oy + node.y);
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit(child, x, y, nx, ny) {
                return Some(hit);
            }
        }
        if node.kind == NodeKind::Tree {
            return None;
        }
        let (lx, ly) = (x - nx as f64, y - ny as f64);
        (lx >= 0.0 && ly >= 0.0 && lx < node.width as f64 && ly < node.height as f64)
            .then_some((id, lx, ly))
    }
}

impl SceneGraph for Scene {
    fn node_at(&self, x: f64, y: f64) -> Option<(NodeId, f64, f64)> {
        self.hit(self.root, x, y, 0, 0)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn descriptor(&self, node: NodeId) -> Option<NodeDescriptor> {
        self.node(node).and_then(|n| n.descriptor)
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }

    fn surface_from_node(&self, node: NodeId) -> Option<SurfaceId> {
        let n = self.node(node)?;
        if n.kind != NodeKind::Buffer {
            return None;
        }
        n.surface.filter(|&s| self.slot(s).is_some())
    }

    fn is_unmanaged(&self, node: NodeId) -> bool {
        self.parent(node) == Some(self.unmanaged)
    }

    fn is_subsurface(&self, surface: SurfaceId) -> bool {
        matches!(
            self.surface_role(surface),
            Some(SurfaceRole::Subsurface { .. })
        )
    }

    fn subsurface_parent_layer(&self, surface: SurfaceId) -> Option<SurfaceId> {
        let mut current = surface;
        while let Some(SurfaceRole::Subsurface { parent }) = self.surface_role(current) {
            current = parent;
        }
        (current != surface && self.is_layer_surface(current)).then_some(current)
    }

    fn is_layer_surface(&self, surface: SurfaceId) -> bool {
        matches!(self.surface_role(surface), Some(SurfaceRole::Layer { .. }))
    }

    fn layer_keyboard_interactive(&self, surface: SurfaceId) -> bool {
        matches!(
            self.surface_role(surface),
            Some(SurfaceRole::Layer {
                keyboard_interactive: true
            })
        )
    }

    fn surface_alive(&self, surface: SurfaceId) -> bool {
        self.slot(surface).is_some()
    }

    fn node_coords(&self, node: NodeId) -> Option<(i32, i32)> {
        let mut n = self.node(node)?;
        let (mut x, mut y) = (n.x, n.y);
        while let Some(parent) = n.parent {
            n = self.node(parent)?;
            x += n.x;
            y += n.y;
        }
        Some((x, y))
    }

    fn ssd_part_at(&self, view: ViewId, node: NodeId, _x: f64, _y: f64) -> Part {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.node(id) else {
                break;
            };
            if let Some(part) = n.part {
                return part;
            }
            if matches!(
                n.descriptor,
                Some(NodeDescriptor::View(v) | NodeDescriptor::XdgPopup(v)) if v == view
            ) {
                break;
            }
            current = n.parent;
        }
        if self.surface_from_node(node).is_some() {
            Part::Client
        } else {
            Part::None
        }
    }

    fn set_drag_icons_visible(&mut self, visible: bool) {
        self.set_enabled(self.drag_icons, visible);
    }

    fn drag_icons_visible(&self) -> bool {
        self.is_enabled(self.drag_icons)
    }

    fn set_button_hover(&mut self, button: Option<NodeId>) {
        self.hovered_button = button;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topmost_child_wins() {
        let mut scene = Scene::new();
        let content = scene.content();
        let below = scene.create_rect(content, 10, 10);
        let above = scene.create_rect(content, 10, 10);
        scene.set_position(above, 5, 5);

        assert_eq!(scene.node_at(7.0, 7.0).map(|h| h.0), Some(above));
        assert_eq!(scene.node_at(2.0, 2.0).map(|h| h.0), Some(below));
        scene.raise_to_top(below);
        assert_eq!(scene.node_at(7.0, 7.0).map(|h| h.0), Some(below));
    }

    #[test]
    fn disabled_subtrees_are_invisible_to_queries() {
        let mut scene = Scene::new();
        let content = scene.content();
        let tree = scene.create_tree(content);
        scene.set_position(tree, 100, 0);
        let rect = scene.create_rect(tree, 10, 10);

        assert_eq!(scene.node_at(101.0, 1.0), Some((rect, 1.0, 1.0)));
        assert_eq!(scene.node_coords(rect), Some((100, 0)));
        scene.set_enabled(tree, false);
        assert_eq!(scene.node_at(101.0, 1.0), None);
    }

    #[test]
    fn destroyed_surface_handles_go_stale() {
        let mut scene = Scene::new();
        let first = scene.create_surface(SurfaceRole::Toplevel);
        scene.destroy_surface(first);
        let second = scene.create_surface(SurfaceRole::Toplevel);

        assert_eq!(first.index, second.index);
        assert_ne!(first, second);
        assert!(!scene.surface_alive(first));
        assert!(scene.surface_alive(second));
    }

    #[test]
    fn popups_share_their_parent_client() {
        let mut scene = Scene::new();
        let toplevel = scene.create_surface(SurfaceRole::Toplevel);
        let popup = scene.create_surface(SurfaceRole::Popup { parent: toplevel });
        assert_eq!(scene.surface_client(toplevel), scene.surface_client(popup));
        assert_eq!(scene.root_surface(popup), Some(toplevel));
    }

    #[test]
    fn destroy_node_removes_subtree() {
        let mut scene = Scene::new();
        let content = scene.content();
        let tree = scene.create_tree(content);
        let rect = scene.create_rect(tree, 5, 5);
        scene.destroy_node(tree);
        assert_eq!(scene.node_at(1.0, 1.0), None);
        assert_eq!(scene.node_kind(rect), None);
    }
}
