//! Interfaces the seat uses to reach the rest of the compositor.
//!
//! Each trait covers one collaborator. A host implements all of them on one
//! type and gets [`Server`] for free.

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
use crate::snap::SnapTarget;
use crate::view::{TiledState, ViewAxis, ViewState};

/// Scene-graph queries used by the hit-test walk.
pub trait SceneGraph {
    /// Topmost input-accepting node at a layout point, plus the point in
    /// that node's local coordinates.
    fn node_at(&self, x: f64, y: f64) -> Option<(NodeId, f64, f64)>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn descriptor(&self, node: NodeId) -> Option<NodeDescriptor>;
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;
    /// Client surface a buffer node displays.
    fn surface_from_node(&self, node: NodeId) -> Option<SurfaceId>;
    /// Whether the node sits directly in the tree of unmanaged (X11
    /// override-redirect) surfaces.
    fn is_unmanaged(&self, node: NodeId) -> bool;
    fn is_subsurface(&self, surface: SurfaceId) -> bool;
    /// Layer surface at the root of a subsurface chain, if any.
    fn subsurface_parent_layer(&self, surface: SurfaceId) -> Option<SurfaceId>;
    fn is_layer_surface(&self, surface: SurfaceId) -> bool;
    fn layer_keyboard_interactive(&self, surface: SurfaceId) -> bool;
    fn surface_alive(&self, surface: SurfaceId) -> bool;
    /// Layout coordinates of a node.
    fn node_coords(&self, node: NodeId) -> Option<(i32, i32)>;
    /// Decoration part of `view` under the leaf node at a layout point.
    fn ssd_part_at(&self, view: ViewId, node: NodeId, x: f64, y: f64) -> Part;
    fn set_drag_icons_visible(&mut self, visible: bool);
    fn drag_icons_visible(&self) -> bool;
    /// Highlight the decoration button under the pointer, or none.
    fn set_button_hover(&mut self, button: Option<NodeId>);
}

/// Window state and the geometry calls the move/resize engine makes.
pub trait Views {
    fn view(&self, view: ViewId) -> Option<ViewState>;

    fn view_current_geometry(&self, view: ViewId) -> Option<Rect> {
        self.view(view).map(|state| state.current)
    }

    fn set_view_geometry(&mut self, view: ViewId, geometry: Rect);
    fn move_view(&mut self, view: ViewId, x: i32, y: i32);
    /// Return a view to floating geometry, leaving fullscreen or maximized
    /// state as required.
    fn restore_to(&mut self, view: ViewId, geometry: Rect);
    fn set_shade(&mut self, view: ViewId, shaded: bool);
    fn set_untiled(&mut self, view: ViewId);
    fn store_natural_geometry(&mut self, view: ViewId);

    fn invalidate_last_layout_geometry(&mut self, _view: ViewId) {}

    fn maximize(&mut self, view: ViewId, axis: ViewAxis, store_natural_geometry: bool);
    fn view_from_surface(&self, surface: SurfaceId) -> Option<ViewId>;
    /// Toplevel surface owning a surface (itself for toplevels and layer
    /// surfaces).
    fn toplevel_of(&self, surface: SurfaceId) -> Option<SurfaceId>;

    /// Whether a client holding a shortcut inhibitor blocks these actions.
    fn inhibits_actions(&self, _view: ViewId, _actions: &[Action]) -> bool {
        false
    }

    fn show_resize_preview(&mut self, view: ViewId, geometry: Rect);
    fn hide_resize_preview(&mut self, view: ViewId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputInfo {
    pub id: OutputId,
    /// Output position and size in layout coordinates.
    pub layout_box: Rect,
    /// Area left after panels reserve space, in output-local coordinates.
    pub usable_area: Rect,
    /// Refresh rate in mHz; zero or negative when unknown.
    pub refresh_mhz: i32,
    pub usable: bool,
}

pub trait Outputs {
    fn nearest_output(&self, x: f64, y: f64) -> Option<OutputInfo>;
    fn output_of_view(&self, view: ViewId) -> Option<OutputInfo>;
    /// Closest point inside the output layout.
    fn closest_point(&self, x: f64, y: f64) -> (f64, f64);
}

/// Policy that perturbs interactive geometry near edges and tiled states.
pub trait Resistance {
    /// Hold a tiled view in place until the drag passes a threshold.
    /// Returns true once the view should be untiled.
    fn unsnap(&mut self, view: ViewId, x: &mut i32, y: &mut i32) -> bool;
    fn apply_move_resistance(&mut self, view: ViewId, x: &mut i32, y: &mut i32);
    fn apply_resize_resistance(&mut self, view: ViewId, geometry: &mut Rect);
    /// Apply min/max/increment size hints.
    fn adjust_size(&mut self, view: ViewId, width: &mut i32, height: &mut i32);
}

pub trait Snapper {
    fn region_at_cursor(&self, x: f64, y: f64) -> Option<RegionId>;
    fn snap_to_region(&mut self, view: ViewId, region: RegionId);
    fn snap_to_edge(
        &mut self,
        view: ViewId,
        tiled: TiledState,
        output: OutputId,
        store_natural_geometry: bool,
    );
    /// Preview where the view would land if the move finished now.
    fn update_overlay(&mut self, view: ViewId, target: Option<SnapTarget>);
    fn hide_overlay(&mut self);
}

pub trait Focus {
    fn focus_surface(&mut self, surface: SurfaceId);
    fn focus_view(&mut self, view: ViewId, raise: bool);
    fn focus_layer(&mut self, layer: SurfaceId);
    fn active_view(&self) -> Option<ViewId>;

    fn focus_view_or_surface(
        &mut self,
        view: Option<ViewId>,
        surface: Option<SurfaceId>,
        raise: bool,
    ) {
        if let Some(view) = view {
            self.focus_view(view, raise);
        } else if let Some(surface) = surface {
            self.focus_surface(surface);
        }
    }
}

/// Client-facing side of the pointer: the events the focused client sees,
/// its popup grab, and the cursor image.
pub trait PointerClient {
    fn pointer_focus(&self) -> Option<SurfaceId>;
    fn focused_client(&self) -> Option<ClientId>;
    /// Enter `surface`, leaving the previous one. Re-entering the focused
    /// surface is a no-op.
    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64);
    fn pointer_clear_focus(&mut self);
    fn pointer_motion(&mut self, time_msec: u32, sx: f64, sy: f64);
    fn pointer_relative_motion(&mut self, time_msec: u32, dx: f64, dy: f64);
    fn pointer_button(&mut self, time_msec: u32, button: u32, state: ButtonState);
    fn pointer_axis(
        &mut self,
        time_msec: u32,
        orientation: AxisOrientation,
        delta: f64,
        delta_discrete: i32,
        source: AxisSource,
    );
    fn pointer_frame(&mut self);
    fn pointer_has_grab(&self) -> bool;
    fn pointer_end_grab(&mut self);
    fn set_cursor_image(&mut self, image: CursorImage);
    /// Move the visible cursor to a layout point.
    fn warp_pointer(&mut self, x: f64, y: f64);
    fn constraint_activated(&mut self, constraint: ConstraintId);
    fn constraint_deactivated(&mut self, constraint: ConstraintId);
    fn move_drag_icons(&mut self, x: f64, y: f64);
}

pub trait MenuHost {
    /// Highlight the menu item under the pointer, or none.
    fn process_menu_motion(&mut self, item: Option<NodeId>);
    /// Open a named menu at a layout point. Returns false if it does not exist.
    fn open_menu(&mut self, name: &str, x: f64, y: f64) -> bool;
    /// Activate the highlighted item. Returns true if that closed the menu.
    fn call_selected_menu_actions(&mut self) -> bool;
    fn close_root_menu(&mut self);
}

pub trait ActionRunner {
    fn run_action(&mut self, view: Option<ViewId>, action: &Action, ctx: &CursorContext);
}

/// Everything the seat needs from its host.
pub trait Server:
    SceneGraph + Views + Outputs + Resistance + Snapper + Focus + PointerClient + MenuHost + ActionRunner
{
}

impl<T> Server for T where
    T: SceneGraph
        + Views
        + Outputs
        + Resistance
        + Snapper
        + Focus
        + PointerClient
        + MenuHost
        + ActionRunner
{
}
