//! A complete in-memory host for the seat.
//!
//! `Desktop` owns a [`Scene`] with server-side decorated views, outputs,
//! snap regions, menus and the client-facing pointer state, and implements
//! every collaborator trait in [`crate::server`]. It records what clients and
//! the action runner would have seen so callers can inspect it.

use std::collections::{BTreeMap, BTreeSet};

use crate::context::CursorContext;
use crate::cursor::{AxisOrientation, AxisSource, ButtonState};
use crate::cursor_shape::CursorImage;
use crate::geometry::Rect;
use crate::mousebind::Action;
use crate::node::{
    ClientId, ConstraintId, NodeDescriptor, NodeId, NodeKind, OutputId, RegionId, SurfaceId,
    ViewId,
};
use crate::part::Part;
use crate::scene::{Scene, SurfaceRole};
use crate::server::{
    ActionRunner, Focus, MenuHost, OutputInfo, Outputs, PointerClient, Resistance, SceneGraph,
    Snapper, Views,
};
use crate::snap::SnapTarget;
use crate::view::{TiledState, ViewAxis, ViewState};

/// Decoration metrics, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decor {
    pub titlebar_height: i32,
    pub border_width: i32,
    pub button_width: i32,
    pub menu_item_height: i32,
    pub menu_width: i32,
}

impl Default for Decor {
    fn default() -> Self {
        Self {
            titlebar_height: 24,
            border_width: 4,
            button_width: 24,
            menu_item_height: 20,
            menu_width: 120,
        }
    }
}

impl Decor {
    /// One-cell borders for a character grid.
    pub fn compact() -> Self {
        Self {
            titlebar_height: 1,
            border_width: 1,
            button_width: 3,
            menu_item_height: 1,
            menu_width: 16,
        }
    }
}

/// What a client would have received over the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Enter {
        surface: SurfaceId,
        sx: f64,
        sy: f64,
    },
    Leave {
        surface: SurfaceId,
    },
    Motion {
        surface: SurfaceId,
        time_msec: u32,
        sx: f64,
        sy: f64,
    },
    RelativeMotion {
        time_msec: u32,
        dx: f64,
        dy: f64,
    },
    Button {
        surface: SurfaceId,
        time_msec: u32,
        button: u32,
        state: ButtonState,
    },
    Axis {
        surface: SurfaceId,
        orientation: AxisOrientation,
        delta: f64,
        delta_discrete: i32,
        source: AxisSource,
    },
    Frame,
    PopupDone {
        surface: SurfaceId,
    },
}

#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub label: String,
    pub action: Action,
}

impl MenuEntry {
    pub fn new(label: &str, action: Action) -> Self {
        Self {
            label: label.to_string(),
            action,
        }
    }
}

#[derive(Debug, Clone)]
struct OpenMenu {
    name: String,
    tree: NodeId,
    items: Vec<(NodeId, Action)>,
    selected: Option<usize>,
    view: Option<ViewId>,
}

#[derive(Debug, Clone)]
struct ViewNodes {
    tree: NodeId,
    client: NodeId,
    title: NodeId,
    buttons: Vec<(Part, NodeId, NodeId)>,
    borders: [(Part, NodeId); 8],
}

#[derive(Debug, Clone)]
struct ViewEntry {
    state: ViewState,
    nodes: ViewNodes,
    title: String,
    minimized: bool,
    omnipresent: bool,
}

#[derive(Debug, Clone)]
pub struct Desktop {
    scene: Scene,
    decor: Decor,
    views: BTreeMap<ViewId, ViewEntry>,
    next_view: u32,
    outputs: Vec<OutputInfo>,
    regions: Vec<(RegionId, Rect)>,
    layers: NodeId,
    menu_layer: NodeId,
    menus: BTreeMap<String, Vec<MenuEntry>>,
    open_menu: Option<OpenMenu>,
    popups: BTreeMap<SurfaceId, NodeId>,
    pointer_focus: Option<SurfaceId>,
    popup_grab: Option<SurfaceId>,
    keyboard_focus: Option<SurfaceId>,
    active_view: Option<ViewId>,
    cursor_image: CursorImage,
    overlay: Option<SnapTarget>,
    preview: Option<(ViewId, Rect)>,
    client_events: Vec<ClientEvent>,
    actions: Vec<(Option<ViewId>, Action)>,
    closed: Vec<ViewId>,
    active_constraint: Option<ConstraintId>,
    last_warp: Option<(f64, f64)>,
    keybinds_inhibited: BTreeSet<ViewId>,
    unsnap_threshold: i32,
    edge_strength: i32,
    min_size: (i32, i32),
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new(Decor::default())
    }
}

impl Desktop {
    pub fn new(decor: Decor) -> Self {
        let mut scene = Scene::new();
        let root = scene.root();
        let layers = scene.create_tree(root);
        let menu_layer = scene.create_tree(root);
        let mut menus = BTreeMap::new();
        menus.insert(
            "root-menu".to_string(),
            vec![
                MenuEntry::new("Terminal", Action::Custom("Execute terminal".to_string())),
                MenuEntry::new("Reconfigure", Action::Custom("Reconfigure".to_string())),
                MenuEntry::new("Exit", Action::Custom("Exit".to_string())),
            ],
        );
        menus.insert(
            "client-menu".to_string(),
            vec![
                MenuEntry::new("Minimize", Action::Iconify),
                MenuEntry::new("Maximize", Action::ToggleMaximize),
                MenuEntry::new("Shade", Action::ToggleShade),
                MenuEntry::new("Close", Action::Close),
            ],
        );
        Self {
            scene,
            decor,
            views: BTreeMap::new(),
            next_view: 1,
            outputs: Vec::new(),
            regions: Vec::new(),
            layers,
            menu_layer,
            menus,
            open_menu: None,
            popups: BTreeMap::new(),
            pointer_focus: None,
            popup_grab: None,
            keyboard_focus: None,
            active_view: None,
            cursor_image: CursorImage::Hidden,
            overlay: None,
            preview: None,
            client_events: Vec::new(),
            actions: Vec::new(),
            closed: Vec::new(),
            active_constraint: None,
            last_warp: None,
            keybinds_inhibited: BTreeSet::new(),
            unsnap_threshold: 20,
            edge_strength: 0,
            min_size: (100, 60),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn decor(&self) -> Decor {
        self.decor
    }

    pub fn set_unsnap_threshold(&mut self, threshold: i32) {
        self.unsnap_threshold = threshold;
    }

    /// Distance within which moved windows stick to output edges; zero
    /// turns edge resistance off.
    pub fn set_edge_strength(&mut self, strength: i32) {
        self.edge_strength = strength;
    }

    pub fn set_min_size(&mut self, width: i32, height: i32) {
        self.min_size = (width, height);
    }

    pub fn add_output(&mut self, layout_box: Rect) -> OutputId {
        let id = OutputId(self.outputs.len() as u32 + 1);
        self.outputs.push(OutputInfo {
            id,
            layout_box,
            usable_area: Rect::new(0, 0, layout_box.width, layout_box.height),
            refresh_mhz: 60_000,
            usable: true,
        });
        id
    }

    fn output_mut(&mut self, output: OutputId) -> Option<&mut OutputInfo> {
        self.outputs.iter_mut().find(|o| o.id == output)
    }

    /// Usable area in output-local coordinates.
    pub fn set_usable_area(&mut self, output: OutputId, area: Rect) {
        if let Some(o) = self.output_mut(output) {
            o.usable_area = area;
        }
    }

    pub fn set_refresh(&mut self, output: OutputId, refresh_mhz: i32) {
        if let Some(o) = self.output_mut(output) {
            o.refresh_mhz = refresh_mhz;
        }
    }

    pub fn set_output_usable(&mut self, output: OutputId, usable: bool) {
        if let Some(o) = self.output_mut(output) {
            o.usable = usable;
        }
    }

    /// Move or resize an output, keeping its usable area in sync.
    pub fn resize_output(&mut self, output: OutputId, layout_box: Rect) {
        if let Some(o) = self.output_mut(output) {
            o.layout_box = layout_box;
            o.usable_area = Rect::new(0, 0, layout_box.width, layout_box.height);
        }
    }

    pub fn outputs(&self) -> &[OutputInfo] {
        &self.outputs
    }

    pub fn add_region(&mut self, area: Rect) -> RegionId {
        let id = RegionId(self.regions.len() as u32 + 1);
        self.regions.push((id, area));
        id
    }

    /// Map a new decorated toplevel with its client area at `geometry`.
    pub fn add_view(&mut self, title: &str, geometry: Rect) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        let surface = self.scene.create_surface(SurfaceRole::Toplevel);

        let content = self.scene.content();
        let tree = self.scene.create_tree(content);
        self.scene.set_descriptor(tree, NodeDescriptor::View(id));
        let client = self.scene.create_buffer(tree, 0, 0, Some(surface));
        let title_node = self.scene.create_rect(tree, 0, 0);
        self.scene.set_part(title_node, Part::Title);

        let mut buttons = Vec::new();
        for part in [Part::ButtonClose, Part::ButtonMaximize, Part::ButtonIconify] {
            let button = self.scene.create_tree(tree);
            self.scene
                .set_descriptor(button, NodeDescriptor::SsdButton { part, view: id });
            let hitbox = self.scene.create_rect(button, 0, 0);
            buttons.push((part, button, hitbox));
        }

        // Corners come last so they sit above the edges they overlap.
        let borders = [
            Part::Top,
            Part::Bottom,
            Part::Left,
            Part::Right,
            Part::CornerTopLeft,
            Part::CornerTopRight,
            Part::CornerBottomLeft,
            Part::CornerBottomRight,
        ]
        .map(|part| {
            let node = self.scene.create_rect(tree, 0, 0);
            self.scene.set_part(node, part);
            (part, node)
        });

        self.views.insert(
            id,
            ViewEntry {
                state: ViewState {
                    surface: Some(surface),
                    current: geometry,
                    pending: geometry,
                    natural: geometry,
                    ..ViewState::default()
                },
                nodes: ViewNodes {
                    tree,
                    client,
                    title: title_node,
                    buttons,
                    borders,
                },
                title: title.to_string(),
                minimized: false,
                omnipresent: false,
            },
        );
        self.layout_view(id);
        tracing::debug!(view = ?id, title, "view mapped");
        id
    }

    /// Unmap a view and destroy its surface. The caller must tell the seat.
    pub fn remove_view(&mut self, view: ViewId) -> Option<SurfaceId> {
        let entry = self.views.remove(&view)?;
        self.scene.destroy_node(entry.nodes.tree);
        let surface = entry.state.surface;
        if let Some(surface) = surface {
            self.destroy_client_surface(surface);
        }
        if self.active_view == Some(view) {
            self.active_view = None;
        }
        self.keybinds_inhibited.remove(&view);
        tracing::debug!(view = ?view, "view unmapped");
        surface
    }

    fn destroy_client_surface(&mut self, surface: SurfaceId) {
        self.scene.destroy_surface(surface);
        if self.pointer_focus == Some(surface) {
            self.pointer_focus = None;
        }
        if self.keyboard_focus == Some(surface) {
            self.keyboard_focus = None;
        }
        if self.popup_grab == Some(surface) {
            self.popup_grab = None;
        }
    }

    /// Views closed by an action since the last call, to be unmapped by the
    /// caller.
    pub fn take_closed_views(&mut self) -> Vec<ViewId> {
        std::mem::take(&mut self.closed)
    }

    /// Open an xdg popup for `view` at `area` (relative to the view's client
    /// area) and give it an explicit pointer grab.
    pub fn open_popup(&mut self, view: ViewId, area: Rect) -> Option<SurfaceId> {
        let entry = self.views.get(&view)?;
        let parent = entry.state.surface?;
        let view_tree = entry.nodes.tree;
        let surface = self.scene.create_surface(SurfaceRole::Popup { parent });
        let tree = self.scene.create_tree(view_tree);
        self.scene.set_descriptor(tree, NodeDescriptor::XdgPopup(view));
        self.scene.set_position(tree, area.x, area.y);
        self.scene.create_buffer(tree, area.width, area.height, Some(surface));
        self.popups.insert(surface, tree);
        self.popup_grab = Some(surface);
        Some(surface)
    }

    pub fn close_popup(&mut self, surface: SurfaceId) {
        if let Some(tree) = self.popups.remove(&surface) {
            self.scene.destroy_node(tree);
            self.destroy_client_surface(surface);
        }
    }

    pub fn add_layer_surface(&mut self, area: Rect, keyboard_interactive: bool) -> SurfaceId {
        let surface = self.scene.create_surface(SurfaceRole::Layer {
            keyboard_interactive,
        });
        let tree = self.scene.create_tree(self.layers);
        self.scene
            .set_descriptor(tree, NodeDescriptor::LayerSurface(surface));
        self.scene.set_position(tree, area.x, area.y);
        self.scene
            .create_buffer(tree, area.width, area.height, Some(surface));
        surface
    }

    /// Subsurface of a layer surface; `area` is in layout coordinates.
    pub fn add_layer_subsurface(&mut self, parent: SurfaceId, area: Rect) -> SurfaceId {
        let surface = self
            .scene
            .create_surface(SurfaceRole::Subsurface { parent });
        let node = self
            .scene
            .create_buffer(self.layers, area.width, area.height, Some(surface));
        self.scene.set_position(node, area.x, area.y);
        surface
    }

    /// Override-redirect X11 window.
    pub fn add_unmanaged(&mut self, area: Rect) -> SurfaceId {
        let surface = self.scene.create_surface(SurfaceRole::Unmanaged);
        let tree = self.scene.unmanaged_tree();
        let node = self
            .scene
            .create_buffer(tree, area.width, area.height, Some(surface));
        self.scene.set_position(node, area.x, area.y);
        surface
    }

    pub fn add_menu(&mut self, name: &str, entries: Vec<MenuEntry>) {
        self.menus.insert(name.to_string(), entries);
    }

    pub fn open_menu_name(&self) -> Option<&str> {
        self.open_menu.as_ref().map(|m| m.name.as_str())
    }

    /// Labels of the open menu with the highlighted index.
    pub fn open_menu_items(&self) -> Option<(Vec<(String, Rect)>, Option<usize>)> {
        let menu = self.open_menu.as_ref()?;
        let entries = self.menus.get(&menu.name)?;
        let items = entries
            .iter()
            .zip(&menu.items)
            .filter_map(|(entry, (node, _))| {
                let (x, y) = self.scene.node_coords(*node)?;
                let (w, h) = self.scene.size(*node)?;
                Some((entry.label.clone(), Rect::new(x, y, w, h)))
            })
            .collect();
        Some((items, menu.selected))
    }

    pub fn set_keybinds_inhibited(&mut self, view: ViewId, inhibited: bool) {
        if inhibited {
            self.keybinds_inhibited.insert(view);
        } else {
            self.keybinds_inhibited.remove(&view);
        }
    }

    pub fn client_events(&self) -> &[ClientEvent] {
        &self.client_events
    }

    pub fn take_client_events(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.client_events)
    }

    /// Actions handed to the runner, in order.
    pub fn actions(&self) -> &[(Option<ViewId>, Action)] {
        &self.actions
    }

    pub fn cursor_image(&self) -> &CursorImage {
        &self.cursor_image
    }

    pub fn overlay(&self) -> Option<SnapTarget> {
        self.overlay
    }

    pub fn resize_preview(&self) -> Option<(ViewId, Rect)> {
        self.preview
    }

    pub fn active_constraint(&self) -> Option<ConstraintId> {
        self.active_constraint
    }

    pub fn last_warp(&self) -> Option<(f64, f64)> {
        self.last_warp
    }

    pub fn keyboard_focus(&self) -> Option<SurfaceId> {
        self.keyboard_focus
    }

    pub fn hovered_button(&self) -> Option<NodeId> {
        self.scene.hovered_button()
    }

    /// Decoration button currently highlighted.
    pub fn hovered_button_part(&self) -> Option<(ViewId, Part)> {
        let hovered = self.scene.hovered_button()?;
        self.views.iter().find_map(|(&id, entry)| {
            entry
                .nodes
                .buttons
                .iter()
                .find(|(_, tree, _)| *tree == hovered)
                .map(|&(part, _, _)| (id, part))
        })
    }

    /// Frame box a moved view would occupy if dropped on the current snap
    /// target.
    pub fn overlay_box(&self) -> Option<Rect> {
        match self.overlay? {
            SnapTarget::Region(region) => self
                .regions
                .iter()
                .find(|(id, _)| *id == region)
                .map(|&(_, area)| area),
            SnapTarget::Edge(info) => {
                let output = self.outputs.iter().find(|o| o.id == info.output)?;
                Some(Self::tile_box(Self::usable_box(output), info.tiled_state))
            }
        }
    }

    pub fn view_title(&self, view: ViewId) -> Option<&str> {
        self.views.get(&view).map(|v| v.title.as_str())
    }

    pub fn is_minimized(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|v| v.minimized)
    }

    pub fn is_omnipresent(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|v| v.omnipresent)
    }

    /// Mapped views from bottom to top.
    pub fn stacking(&self) -> Vec<ViewId> {
        self.scene
            .children(self.scene.content())
            .iter()
            .filter_map(|&node| match self.scene.descriptor(node) {
                Some(NodeDescriptor::View(view)) => Some(view),
                _ => None,
            })
            .collect()
    }

    /// Client area plus decorations.
    pub fn frame_box(&self, view: ViewId) -> Option<Rect> {
        let entry = self.views.get(&view)?;
        let geo = entry.state.current;
        let (t, b) = (self.decor.titlebar_height, self.decor.border_width);
        let body = if entry.state.shaded { 0 } else { geo.height };
        Some(Rect::new(
            geo.x - b,
            geo.y - t - b,
            geo.width + 2 * b,
            body + t + 2 * b,
        ))
    }

    /// Layout box of a decoration button.
    pub fn button_box(&self, view: ViewId, part: Part) -> Option<Rect> {
        let entry = self.views.get(&view)?;
        let &(_, _, hitbox) = entry.nodes.buttons.iter().find(|(p, _, _)| *p == part)?;
        self.node_box(hitbox)
    }

    pub fn title_box(&self, view: ViewId) -> Option<Rect> {
        let entry = self.views.get(&view)?;
        self.node_box(entry.nodes.title)
    }

    pub fn border_box(&self, view: ViewId, part: Part) -> Option<Rect> {
        let entry = self.views.get(&view)?;
        let &(_, node) = entry.nodes.borders.iter().find(|(p, _)| *p == part)?;
        self.node_box(node)
    }

    fn node_box(&self, node: NodeId) -> Option<Rect> {
        let (x, y) = self.scene.node_coords(node)?;
        let (w, h) = self.scene.size(node)?;
        Some(Rect::new(x, y, w, h))
    }

    /// Client area that fills a frame box.
    fn client_box(&self, frame: Rect) -> Rect {
        let (t, b) = (self.decor.titlebar_height, self.decor.border_width);
        Rect::new(
            frame.x + b,
            frame.y + t + b,
            frame.width - 2 * b,
            frame.height - t - 2 * b,
        )
    }

    fn usable_box(output: &OutputInfo) -> Rect {
        let area = output.usable_area;
        Rect::new(
            output.layout_box.x + area.x,
            output.layout_box.y + area.y,
            area.width,
            area.height,
        )
    }

    fn layout_view(&mut self, view: ViewId) {
        let Some(entry) = self.views.get(&view) else {
            return;
        };
        let geo = entry.state.current;
        let shaded = entry.state.shaded;
        let minimized = entry.minimized;
        let nodes = entry.nodes.clone();
        let Decor {
            titlebar_height: t,
            border_width: b,
            button_width: bw,
            ..
        } = self.decor;
        let body = if shaded { 0 } else { geo.height };
        let (w, scene) = (geo.width, &mut self.scene);

        scene.set_enabled(nodes.tree, !minimized);
        scene.set_position(nodes.tree, geo.x, geo.y);
        scene.set_size(nodes.client, w, geo.height);
        scene.set_enabled(nodes.client, !shaded);
        scene.set_position(nodes.title, 0, -t);
        scene.set_size(nodes.title, w, t);
        for (i, &(_, button, hitbox)) in nodes.buttons.iter().enumerate() {
            scene.set_position(button, w - (i as i32 + 1) * bw, -t);
            scene.set_size(hitbox, bw, t);
        }
        for (part, node) in nodes.borders {
            let (x, y, width, height) = match part {
                Part::Top => (-b, -t - b, w + 2 * b, b),
                Part::Bottom => (-b, body, w + 2 * b, b),
                Part::Left => (-b, -t, b, t + body),
                Part::Right => (w, -t, b, t + body),
                Part::CornerTopLeft => (-b, -t - b, b, b),
                Part::CornerTopRight => (w, -t - b, b, b),
                Part::CornerBottomLeft => (-b, body, b, b),
                _ => (w, body, b, b),
            };
            scene.set_position(node, x, y);
            scene.set_size(node, width, height);
        }
    }

    fn with_state(&mut self, view: ViewId, f: impl FnOnce(&mut ViewState)) {
        if let Some(entry) = self.views.get_mut(&view) {
            f(&mut entry.state);
            self.layout_view(view);
        }
    }

    fn raise_view(&mut self, view: ViewId) {
        if let Some(entry) = self.views.get(&view) {
            self.scene.raise_to_top(entry.nodes.tree);
        }
    }

    fn toggle_maximize(&mut self, view: ViewId) {
        let Some(state) = self.view(view) else {
            return;
        };
        if state.maximized == ViewAxis::Both {
            self.maximize(view, ViewAxis::None, false);
        } else {
            self.maximize(view, ViewAxis::Both, true);
        }
    }

    fn tile_box(area: Rect, tiled: TiledState) -> Rect {
        let (hw, hh) = (area.width / 2, area.height / 2);
        let left = Rect::new(area.x, area.y, hw, area.height);
        let right = Rect::new(area.x + hw, area.y, area.width - hw, area.height);
        let (top_h, bottom_y, bottom_h) = (hh, area.y + hh, area.height - hh);
        match tiled {
            TiledState::Left => left,
            TiledState::Right => right,
            TiledState::Up => Rect::new(area.x, area.y, area.width, top_h),
            TiledState::Down => Rect::new(area.x, bottom_y, area.width, bottom_h),
            TiledState::UpLeft => Rect { height: top_h, ..left },
            TiledState::UpRight => Rect { height: top_h, ..right },
            TiledState::DownLeft => Rect {
                y: bottom_y,
                height: bottom_h,
                ..left
            },
            TiledState::DownRight => Rect {
                y: bottom_y,
                height: bottom_h,
                ..right
            },
            TiledState::None | TiledState::Center => area,
        }
    }

    fn stick_to_edge(value: &mut i32, edge: i32, strength: i32) {
        if (*value - edge).abs() < strength {
            *value = edge;
        }
    }
}

impl SceneGraph for Desktop {
    fn node_at(&self, x: f64, y: f64) -> Option<(NodeId, f64, f64)> {
        self.scene.node_at(x, y)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.scene.parent(node)
    }

    fn descriptor(&self, node: NodeId) -> Option<NodeDescriptor> {
        self.scene.descriptor(node)
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.scene.node_kind(node)
    }

    fn surface_from_node(&self, node: NodeId) -> Option<SurfaceId> {
        self.scene.surface_from_node(node)
    }

    fn is_unmanaged(&self, node: NodeId) -> bool {
        self.scene.is_unmanaged(node)
    }

    fn is_subsurface(&self, surface: SurfaceId) -> bool {
        self.scene.is_subsurface(surface)
    }

    fn subsurface_parent_layer(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.scene.subsurface_parent_layer(surface)
    }

    fn is_layer_surface(&self, surface: SurfaceId) -> bool {
        self.scene.is_layer_surface(surface)
    }

    fn layer_keyboard_interactive(&self, surface: SurfaceId) -> bool {
        self.scene.layer_keyboard_interactive(surface)
    }

    fn surface_alive(&self, surface: SurfaceId) -> bool {
        self.scene.surface_alive(surface)
    }

    fn node_coords(&self, node: NodeId) -> Option<(i32, i32)> {
        self.scene.node_coords(node)
    }

    fn ssd_part_at(&self, view: ViewId, node: NodeId, x: f64, y: f64) -> Part {
        self.scene.ssd_part_at(view, node, x, y)
    }

    fn set_drag_icons_visible(&mut self, visible: bool) {
        self.scene.set_drag_icons_visible(visible);
    }

    fn drag_icons_visible(&self) -> bool {
        self.scene.drag_icons_visible()
    }

    fn set_button_hover(&mut self, button: Option<NodeId>) {
        self.scene.set_button_hover(button);
    }
}

impl Views for Desktop {
    fn view(&self, view: ViewId) -> Option<ViewState> {
        self.views.get(&view).map(|v| v.state.clone())
    }

    fn set_view_geometry(&mut self, view: ViewId, geometry: Rect) {
        self.with_state(view, |s| {
            s.current = geometry;
            s.pending = geometry;
        });
    }

    fn move_view(&mut self, view: ViewId, x: i32, y: i32) {
        self.with_state(view, |s| {
            s.current.x = x;
            s.current.y = y;
            s.pending.x = x;
            s.pending.y = y;
        });
    }

    fn restore_to(&mut self, view: ViewId, geometry: Rect) {
        self.with_state(view, |s| {
            s.fullscreen = false;
            s.maximized = ViewAxis::None;
            if !geometry.is_empty() {
                s.current = geometry;
                s.pending = geometry;
            }
        });
    }

    fn set_shade(&mut self, view: ViewId, shaded: bool) {
        self.with_state(view, |s| s.shaded = shaded);
    }

    fn set_untiled(&mut self, view: ViewId) {
        self.with_state(view, |s| {
            s.tiled = TiledState::None;
            s.tiled_region = false;
        });
    }

    fn store_natural_geometry(&mut self, view: ViewId) {
        self.with_state(view, |s| {
            if s.is_floating() {
                s.natural = s.current;
            }
        });
    }

    fn maximize(&mut self, view: ViewId, axis: ViewAxis, store_natural_geometry: bool) {
        let Some(area) = self.output_of_view(view).map(|o| Self::usable_box(&o)) else {
            return;
        };
        let full = self.client_box(area);
        self.with_state(view, |s| {
            if store_natural_geometry && s.is_floating() {
                s.natural = s.current;
            }
            let natural = s.natural;
            s.current = match axis {
                ViewAxis::None if !natural.is_empty() => natural,
                ViewAxis::None => s.current,
                ViewAxis::Horizontal => Rect {
                    x: full.x,
                    width: full.width,
                    ..s.current
                },
                ViewAxis::Vertical => Rect {
                    y: full.y,
                    height: full.height,
                    ..s.current
                },
                ViewAxis::Both => full,
            };
            s.pending = s.current;
            s.maximized = axis;
            s.tiled = TiledState::None;
        });
    }

    fn view_from_surface(&self, surface: SurfaceId) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, v)| v.state.surface == Some(surface))
            .map(|(&id, _)| id)
    }

    fn toplevel_of(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.scene.root_surface(surface)
    }

    fn inhibits_actions(&self, view: ViewId, actions: &[Action]) -> bool {
        self.keybinds_inhibited.contains(&view) && !actions.contains(&Action::ToggleKeybinds)
    }

    fn show_resize_preview(&mut self, view: ViewId, geometry: Rect) {
        self.preview = Some((view, geometry));
    }

    fn hide_resize_preview(&mut self, view: ViewId) {
        if self.preview.is_some_and(|(v, _)| v == view) {
            self.preview = None;
        }
    }
}

impl Outputs for Desktop {
    fn nearest_output(&self, x: f64, y: f64) -> Option<OutputInfo> {
        self.outputs
            .iter()
            .min_by(|a, b| {
                a.layout_box
                    .distance_squared(x, y)
                    .total_cmp(&b.layout_box.distance_squared(x, y))
            })
            .copied()
    }

    fn output_of_view(&self, view: ViewId) -> Option<OutputInfo> {
        let (cx, cy) = self.views.get(&view)?.state.current.center();
        self.nearest_output(cx as f64, cy as f64)
    }

    fn closest_point(&self, x: f64, y: f64) -> (f64, f64) {
        self.nearest_output(x, y)
            .map_or((x, y), |o| o.layout_box.closest_point(x, y))
    }
}

impl Resistance for Desktop {
    fn unsnap(&mut self, view: ViewId, x: &mut i32, y: &mut i32) -> bool {
        let Some(state) = self.view(view) else {
            return false;
        };
        if state.is_floating() {
            return false;
        }
        if self.unsnap_threshold <= 0 {
            return true;
        }
        let dx = *x - state.current.x;
        let dy = *y - state.current.y;
        if dx * dx + dy * dy < self.unsnap_threshold * self.unsnap_threshold {
            *x = state.current.x;
            *y = state.current.y;
            return false;
        }
        true
    }

    fn apply_move_resistance(&mut self, view: ViewId, x: &mut i32, y: &mut i32) {
        if self.edge_strength <= 0 {
            return;
        }
        let (Some(output), Some(frame), Some(current)) = (
            self.output_of_view(view),
            self.frame_box(view),
            self.view_current_geometry(view),
        ) else {
            return;
        };
        let area = Self::usable_box(&output);
        // Frame offsets relative to the client origin.
        let (ox, oy) = (frame.x - current.x, frame.y - current.y);
        let mut left = *x + ox;
        let mut top = *y + oy;
        Self::stick_to_edge(&mut left, area.x, self.edge_strength);
        Self::stick_to_edge(&mut top, area.y, self.edge_strength);
        let mut right = left + frame.width;
        let mut bottom = top + frame.height;
        Self::stick_to_edge(&mut right, area.right(), self.edge_strength);
        Self::stick_to_edge(&mut bottom, area.bottom(), self.edge_strength);
        *x = right - frame.width - ox;
        *y = bottom - frame.height - oy;
    }

    fn apply_resize_resistance(&mut self, view: ViewId, geometry: &mut Rect) {
        if self.edge_strength <= 0 {
            return;
        }
        let Some(output) = self.output_of_view(view) else {
            return;
        };
        let area = self.client_box(Self::usable_box(&output));
        let mut right = geometry.right();
        let mut bottom = geometry.bottom();
        Self::stick_to_edge(&mut right, area.right(), self.edge_strength);
        Self::stick_to_edge(&mut bottom, area.bottom(), self.edge_strength);
        geometry.width = right - geometry.x;
        geometry.height = bottom - geometry.y;
    }

    fn adjust_size(&mut self, _view: ViewId, width: &mut i32, height: &mut i32) {
        *width = (*width).max(self.min_size.0);
        *height = (*height).max(self.min_size.1);
    }
}

impl Snapper for Desktop {
    fn region_at_cursor(&self, x: f64, y: f64) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|(_, area)| area.contains(x, y))
            .map(|&(id, _)| id)
    }

    fn snap_to_region(&mut self, view: ViewId, region: RegionId) {
        let Some(&(_, area)) = self.regions.iter().find(|(id, _)| *id == region) else {
            return;
        };
        let geometry = self.client_box(area);
        self.with_state(view, |s| {
            s.current = geometry;
            s.pending = geometry;
            s.maximized = ViewAxis::None;
            s.tiled = TiledState::None;
            s.tiled_region = true;
        });
    }

    fn snap_to_edge(
        &mut self,
        view: ViewId,
        tiled: TiledState,
        output: OutputId,
        store_natural_geometry: bool,
    ) {
        let Some(info) = self.outputs.iter().find(|o| o.id == output).copied() else {
            return;
        };
        let geometry = self.client_box(Self::tile_box(Self::usable_box(&info), tiled));
        self.with_state(view, |s| {
            if store_natural_geometry && s.is_floating() {
                s.natural = s.current;
            }
            s.current = geometry;
            s.pending = geometry;
            s.maximized = ViewAxis::None;
            s.tiled = tiled;
            s.tiled_region = false;
        });
    }

    fn update_overlay(&mut self, _view: ViewId, target: Option<SnapTarget>) {
        self.overlay = target;
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }
}

impl Focus for Desktop {
    fn focus_surface(&mut self, surface: SurfaceId) {
        self.keyboard_focus = Some(surface);
    }

    fn focus_view(&mut self, view: ViewId, raise: bool) {
        let Some(entry) = self.views.get_mut(&view) else {
            return;
        };
        if entry.minimized {
            entry.minimized = false;
            self.layout_view(view);
        }
        self.active_view = Some(view);
        self.keyboard_focus = self.views.get(&view).and_then(|v| v.state.surface);
        if raise {
            self.raise_view(view);
        }
    }

    fn focus_layer(&mut self, layer: SurfaceId) {
        self.keyboard_focus = Some(layer);
    }

    fn active_view(&self) -> Option<ViewId> {
        self.active_view
    }
}

impl PointerClient for Desktop {
    fn pointer_focus(&self) -> Option<SurfaceId> {
        self.pointer_focus
    }

    fn focused_client(&self) -> Option<ClientId> {
        self.pointer_focus
            .and_then(|surface| self.scene.surface_client(surface))
    }

    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64) {
        if self.pointer_focus == Some(surface) {
            return;
        }
        if let Some(old) = self.pointer_focus.take() {
            self.client_events.push(ClientEvent::Leave { surface: old });
        }
        self.client_events
            .push(ClientEvent::Enter { surface, sx, sy });
        self.pointer_focus = Some(surface);
    }

    fn pointer_clear_focus(&mut self) {
        if let Some(old) = self.pointer_focus.take() {
            self.client_events.push(ClientEvent::Leave { surface: old });
        }
    }

    fn pointer_motion(&mut self, time_msec: u32, sx: f64, sy: f64) {
        if let Some(surface) = self.pointer_focus {
            self.client_events.push(ClientEvent::Motion {
                surface,
                time_msec,
                sx,
                sy,
            });
        }
    }

    fn pointer_relative_motion(&mut self, time_msec: u32, dx: f64, dy: f64) {
        if self.pointer_focus.is_some() {
            self.client_events
                .push(ClientEvent::RelativeMotion { time_msec, dx, dy });
        }
    }

    fn pointer_button(&mut self, time_msec: u32, button: u32, state: ButtonState) {
        if let Some(surface) = self.pointer_focus {
            self.client_events.push(ClientEvent::Button {
                surface,
                time_msec,
                button,
                state,
            });
        }
    }

    fn pointer_axis(
        &mut self,
        _time_msec: u32,
        orientation: AxisOrientation,
        delta: f64,
        delta_discrete: i32,
        source: AxisSource,
    ) {
        if let Some(surface) = self.pointer_focus {
            self.client_events.push(ClientEvent::Axis {
                surface,
                orientation,
                delta,
                delta_discrete,
                source,
            });
        }
    }

    fn pointer_frame(&mut self) {
        if self.pointer_focus.is_some() {
            self.client_events.push(ClientEvent::Frame);
        }
    }

    fn pointer_has_grab(&self) -> bool {
        self.popup_grab.is_some()
    }

    fn pointer_end_grab(&mut self) {
        // Ending the grab dismisses the popup that held it.
        if let Some(surface) = self.popup_grab.take() {
            self.client_events.push(ClientEvent::PopupDone { surface });
            self.close_popup(surface);
        }
    }

    fn set_cursor_image(&mut self, image: CursorImage) {
        self.cursor_image = image;
    }

    fn warp_pointer(&mut self, x: f64, y: f64) {
        self.last_warp = Some((x, y));
    }

    fn constraint_activated(&mut self, constraint: ConstraintId) {
        self.active_constraint = Some(constraint);
    }

    fn constraint_deactivated(&mut self, constraint: ConstraintId) {
        if self.active_constraint == Some(constraint) {
            self.active_constraint = None;
        }
    }

    fn move_drag_icons(&mut self, x: f64, y: f64) {
        let icons = self.scene.drag_icons();
        self.scene.set_position(icons, x as i32, y as i32);
    }
}

impl MenuHost for Desktop {
    fn process_menu_motion(&mut self, item: Option<NodeId>) {
        if let Some(menu) = self.open_menu.as_mut() {
            menu.selected = item.and_then(|node| menu.items.iter().position(|(n, _)| *n == node));
        }
    }

    fn open_menu(&mut self, name: &str, x: f64, y: f64) -> bool {
        let Some(entries) = self.menus.get(name).cloned() else {
            tracing::debug!(menu = name, "no such menu");
            return false;
        };
        self.close_root_menu();
        let tree = self.scene.create_tree(self.menu_layer);
        self.scene.set_position(tree, x as i32, y as i32);
        let (item_h, width) = (self.decor.menu_item_height, self.decor.menu_width);
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let node = self.scene.create_rect(tree, width, item_h);
                self.scene.set_position(node, 0, i as i32 * item_h);
                self.scene.set_descriptor(node, NodeDescriptor::MenuItem);
                (node, entry.action)
            })
            .collect();
        self.open_menu = Some(OpenMenu {
            name: name.to_string(),
            tree,
            items,
            selected: None,
            view: self.active_view,
        });
        true
    }

    fn call_selected_menu_actions(&mut self) -> bool {
        let Some(menu) = self.open_menu.as_ref() else {
            return true;
        };
        let Some((_, action)) = menu.selected.and_then(|index| menu.items.get(index)) else {
            return false;
        };
        let (view, action) = (menu.view, action.clone());
        self.close_root_menu();
        self.run_action(view, &action, &CursorContext::default());
        true
    }

    fn close_root_menu(&mut self) {
        if let Some(menu) = self.open_menu.take() {
            self.scene.destroy_node(menu.tree);
        }
    }
}

impl ActionRunner for Desktop {
    fn run_action(&mut self, view: Option<ViewId>, action: &Action, _ctx: &CursorContext) {
        self.actions.push((view, action.clone()));
        match action {
            Action::Unfocus => {
                self.active_view = None;
                self.keyboard_focus = None;
            }
            Action::Move
            | Action::Resize
            | Action::ShowMenu(_)
            | Action::Custom(_) => {}
            _ => {
                let Some(view) = view else {
                    return;
                };
                match action {
                    Action::Focus => self.focus_view(view, false),
                    Action::Raise => self.raise_view(view),
                    Action::Close => {
                        if !self.closed.contains(&view) {
                            self.closed.push(view);
                        }
                    }
                    Action::Iconify => {
                        if let Some(entry) = self.views.get_mut(&view) {
                            entry.minimized = true;
                        }
                        if self.active_view == Some(view) {
                            self.active_view = None;
                        }
                        self.layout_view(view);
                    }
                    Action::ToggleMaximize => self.toggle_maximize(view),
                    Action::ToggleShade => {
                        let shaded = self.views.get(&view).is_some_and(|v| v.state.shaded);
                        self.set_shade(view, !shaded);
                    }
                    Action::Shade => self.set_shade(view, true),
                    Action::Unshade => self.set_shade(view, false),
                    Action::ToggleOmnipresent => {
                        if let Some(entry) = self.views.get_mut(&view) {
                            entry.omnipresent = !entry.omnipresent;
                        }
                    }
                    Action::ToggleKeybinds => {
                        let inhibited = self.keybinds_inhibited.contains(&view);
                        self.set_keybinds_inhibited(view, !inhibited);
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{self, PartKind};

    fn desktop() -> (Desktop, ViewId) {
        let mut desktop = Desktop::default();
        desktop.add_output(Rect::new(0, 0, 1920, 1080));
        let view = desktop.add_view("term", Rect::new(100, 100, 400, 300));
        (desktop, view)
    }

    #[test]
    fn decorations_resolve_to_their_parts() {
        let (mut desktop, view) = desktop();
        let max = desktop.button_box(view, Part::ButtonMaximize).expect("button");
        let ctx = context::resolve(&mut desktop, max.x as f64 + 1.0, max.y as f64 + 1.0);
        assert_eq!(
            ctx.kind,
            PartKind::Decoration {
                part: Part::ButtonMaximize,
                view
            }
        );

        let ctx = context::resolve(&mut desktop, 150.0, 90.0);
        assert_eq!(ctx.part(), Part::Title);

        // Top-left corner cell of the frame.
        let ctx = context::resolve(&mut desktop, 97.0, 73.0);
        assert_eq!(ctx.part(), Part::CornerTopLeft);

        let ctx = context::resolve(&mut desktop, 200.0, 200.0);
        assert_eq!(ctx.part(), Part::Client);
        assert_eq!((ctx.sx, ctx.sy), (100.0, 100.0));
    }

    #[test]
    fn maximize_fills_the_usable_area_with_decorations() {
        let (mut desktop, view) = desktop();
        desktop.maximize(view, ViewAxis::Both, true);
        let state = desktop.view(view).expect("view");
        assert_eq!(state.current, Rect::new(4, 28, 1912, 1048));
        assert_eq!(state.natural, Rect::new(100, 100, 400, 300));
        desktop.maximize(view, ViewAxis::None, false);
        assert_eq!(desktop.view(view).expect("view").current, Rect::new(100, 100, 400, 300));
    }

    #[test]
    fn unsnap_holds_until_threshold() {
        let (mut desktop, view) = desktop();
        desktop.maximize(view, ViewAxis::Both, true);
        let (mut x, mut y) = (10, 30);
        assert!(!desktop.unsnap(view, &mut x, &mut y));
        assert_eq!((x, y), (4, 28));
        let (mut x, mut y) = (4, 60);
        assert!(desktop.unsnap(view, &mut x, &mut y));
    }

    #[test]
    fn pointer_enter_is_idempotent() {
        let (mut desktop, view) = desktop();
        let surface = desktop.view(view).and_then(|s| s.surface).expect("surface");
        desktop.pointer_enter(surface, 1.0, 1.0);
        desktop.pointer_enter(surface, 2.0, 2.0);
        assert_eq!(desktop.client_events().len(), 1);
        desktop.pointer_clear_focus();
        assert_eq!(desktop.client_events()[1], ClientEvent::Leave { surface });
    }

    #[test]
    fn closest_point_stays_on_outputs() {
        let (desktop, _) = desktop();
        let (x, y) = desktop.closest_point(-50.0, 2000.0);
        assert_eq!(x, 0.0);
        assert!(y < 1080.0 && y > 1079.0);
    }

    #[test]
    fn edge_tiles_split_the_usable_area() {
        let (mut desktop, view) = desktop();
        desktop.snap_to_edge(view, TiledState::UpRight, OutputId(1), true);
        let state = desktop.view(view).expect("view");
        assert_eq!(state.tiled, TiledState::UpRight);
        assert_eq!(desktop.frame_box(view), Some(Rect::new(960, 0, 960, 540)));
    }

    #[test]
    fn menu_selection_runs_the_item_action() {
        let (mut desktop, view) = desktop();
        desktop.focus_view(view, false);
        assert!(desktop.open_menu("client-menu", 10.0, 10.0));
        let (items, selected) = desktop.open_menu_items().expect("open");
        assert_eq!(items.len(), 4);
        assert_eq!(selected, None);
        let ctx = context::resolve(&mut desktop, 15.0, 15.0);
        assert_eq!(ctx.kind, PartKind::MenuItem);
        desktop.process_menu_motion(ctx.node);
        assert!(desktop.call_selected_menu_actions());
        assert_eq!(desktop.open_menu_name(), None);
        assert_eq!(desktop.actions(), &[(Some(view), Action::Iconify)][..]);
        assert!(desktop.is_minimized(view));
    }
}
