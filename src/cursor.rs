//! Pointer event dispatch.
//!
//! Every handler resolves the target under the cursor, consults the input
//! mode and the bindings, and then either forwards the event to the client
//! under the pointer, runs bound actions, or feeds the interactive
//! move/resize engine.

use crate::click::ClickTarget;
use crate::constants::{SCROLL_WHEEL_EMULATION_FACTOR, SCROLL_WHEEL_EMULATION_STEP};
use crate::context::{self, CursorContext, PartKind};
use crate::cursor_shape::{CursorImage, CursorShape};
use crate::geometry::ResizeEdges;
use crate::mousebind::{Action, MouseEvent};
use crate::node::{ClientId, SurfaceId, ViewId};
use crate::part::Part;
use crate::pressed::PressedState;
use crate::seat::{InputMode, Seat};
use crate::server::Server;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisOrientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSource {
    Wheel,
    Finger,
    Continuous,
    WheelTilt,
}

/// Kind of device an event came from; constraints only apply to pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputDevice {
    #[default]
    Pointer,
    Touch,
    Tablet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    pub device: InputDevice,
    pub time_msec: u32,
    pub dx: f64,
    pub dy: f64,
    pub unaccel_dx: f64,
    pub unaccel_dy: f64,
    /// Device has natural scrolling enabled; flips emulated scroll.
    pub natural_scroll: bool,
}

impl MotionEvent {
    pub fn new(time_msec: u32, dx: f64, dy: f64) -> Self {
        Self {
            device: InputDevice::Pointer,
            time_msec,
            dx,
            dy,
            unaccel_dx: dx,
            unaccel_dy: dy,
            natural_scroll: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub time_msec: u32,
    pub button: u32,
    pub state: ButtonState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEvent {
    pub time_msec: u32,
    pub orientation: AxisOrientation,
    pub delta: f64,
    /// High-resolution wheel steps; 120 per physical click, zero for
    /// touchpads.
    pub delta_discrete: f64,
    pub source: AxisSource,
    /// Per-device multiplier applied to what the client receives.
    pub scroll_factor: f64,
}

impl AxisEvent {
    /// One wheel click on a plain mouse.
    pub fn wheel(time_msec: u32, orientation: AxisOrientation, clicks: f64) -> Self {
        Self {
            time_msec,
            orientation,
            delta: 15.0 * clicks,
            delta_discrete: 120.0 * clicks,
            source: AxisSource::Wheel,
            scroll_factor: 1.0,
        }
    }
}

impl Seat {
    /// Hit-test at the current cursor position.
    pub fn cursor_context<S: Server>(&self, server: &mut S) -> CursorContext {
        context::resolve(server, self.cursor_x, self.cursor_y)
    }

    /// Relative pointer motion.
    pub fn handle_motion<S: Server>(&mut self, server: &mut S, event: &MotionEvent) {
        self.last_event_msec = event.time_msec;
        self.set_cursor_visible(server, true);

        if self.scroll_wheel_emulation {
            let (orientation, delta) = if event.dx.abs() > event.dy.abs() {
                (AxisOrientation::Horizontal, event.dx)
            } else {
                (AxisOrientation::Vertical, event.dy)
            };
            let natural = if event.natural_scroll { -1.0 } else { 1.0 };
            let factor = SCROLL_WHEEL_EMULATION_FACTOR * natural;
            self.emulate_axis(
                server,
                orientation,
                SCROLL_WHEEL_EMULATION_STEP * factor * delta,
                0.0,
                AxisSource::Continuous,
                event.time_msec,
            );
            return;
        }

        server.pointer_relative_motion(event.time_msec, event.unaccel_dx, event.unaccel_dy);
        self.preprocess_motion(server, event.device, event.time_msec, event.dx, event.dy);
    }

    /// Absolute motion, already mapped to layout coordinates.
    pub fn handle_motion_absolute<S: Server>(
        &mut self,
        server: &mut S,
        device: InputDevice,
        time_msec: u32,
        x: f64,
        y: f64,
    ) {
        self.last_event_msec = time_msec;
        self.set_cursor_visible(server, true);
        let (dx, dy) = (x - self.cursor_x, y - self.cursor_y);
        server.pointer_relative_motion(time_msec, dx, dy);
        self.preprocess_motion(server, device, time_msec, dx, dy);
    }

    pub fn handle_button<S: Server>(&mut self, server: &mut S, event: &ButtonEvent) {
        self.last_event_msec = event.time_msec;
        self.set_cursor_visible(server, true);
        self.dispatch_button(server, event.button, event.state, event.time_msec);
    }

    pub fn handle_axis<S: Server>(&mut self, server: &mut S, event: &AxisEvent) {
        self.last_event_msec = event.time_msec;
        self.set_cursor_visible(server, true);
        if self.process_axis(server, event.orientation, event.delta, event.delta_discrete) {
            let factor = event.scroll_factor;
            server.pointer_axis(
                event.time_msec,
                event.orientation,
                factor * event.delta,
                (factor * event.delta_discrete).round() as i32,
                event.source,
            );
        }
    }

    pub fn handle_frame<S: Server>(&mut self, server: &mut S) {
        server.pointer_frame();
    }

    fn preprocess_motion<S: Server>(
        &mut self,
        server: &mut S,
        device: InputDevice,
        time_msec: u32,
        dx: f64,
        dy: f64,
    ) {
        if self.cursor_locked(device) {
            return;
        }
        let (dx, dy) = self.apply_constraint(server, device, dx, dy);
        self.move_cursor(server, dx, dy);
        if let Some((sx, sy)) = self.process_motion(server, time_msec) {
            server.pointer_motion(time_msec, sx, sy);
        }
    }

    pub(crate) fn move_cursor<S: Server>(&mut self, server: &mut S, dx: f64, dy: f64) {
        let (x, y) = server.closest_point(self.cursor_x + dx, self.cursor_y + dy);
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// Route a motion that already moved the cursor. Returns surface-local
    /// coordinates when the focused client should get a motion event.
    pub fn process_motion<S: Server>(
        &mut self,
        server: &mut S,
        time_msec: u32,
    ) -> Option<(f64, f64)> {
        match self.mode {
            InputMode::Move(_) => {
                self.process_cursor_move(server);
                return None;
            }
            InputMode::Resize(_) => {
                self.process_cursor_resize(server, time_msec);
                return None;
            }
            _ => {}
        }

        let ctx = self.cursor_context(server);
        if ctx.kind == PartKind::MenuItem {
            server.process_menu_motion(ctx.node);
            self.set_cursor(server, CursorShape::Default);
            return None;
        }
        if self.mode == InputMode::Menu {
            self.set_cursor(server, CursorShape::Default);
        }

        if self.drag_active {
            server.move_drag_icons(self.cursor_x, self.cursor_y);
        }

        // Drag bindings use the view and edges captured at press time so a
        // fast first motion cannot move the wrong window.
        let mut drags = Vec::new();
        for bind in self.config.mousebinds.iter_mut() {
            if ctx.part() == Part::Client
                && let Some(view) = ctx.view()
                && server.inhibits_actions(view, &bind.actions)
            {
                continue;
            }
            if bind.event == MouseEvent::Drag && bind.pressed_in_context {
                bind.pressed_in_context = false;
                drags.push(bind.actions.clone());
            }
        }
        if !drags.is_empty() {
            let pressed = self.pressed.clone();
            let pressed_ctx = pressed.context().copied().unwrap_or_default();
            for actions in drags {
                self.run_actions(
                    server,
                    pressed.view(),
                    &actions,
                    &pressed_ctx,
                    pressed.resize_edges(),
                );
            }
        }

        let old_focus = server.pointer_focus();
        let notify = self.update_common(server, &ctx, true);
        let new_focus = server.pointer_focus();

        if self.config.focus_follow_mouse
            && let Some(surface) = new_focus
            && old_focus != new_focus
        {
            let view = server.view_from_surface(surface);
            server.focus_view_or_surface(view, Some(surface), self.config.raise_on_focus);
        }

        notify
    }

    /// Shared tail of motion, focus updates and unhandled scrolls: hover,
    /// enter/leave and the cursor image.
    fn update_common<S: Server>(
        &mut self,
        server: &mut S,
        ctx: &CursorContext,
        cursor_has_moved: bool,
    ) -> Option<(f64, f64)> {
        self.update_button_hover(server, ctx);

        if !self.mode.is_passthrough() {
            return None;
        }

        if let Some(pressed_surface) = self.pressed.surface()
            && !server.surface_alive(pressed_surface)
        {
            // The host never reported the destroy; drop the stale target.
            tracing::debug!(surface = ?pressed_surface, "pressed surface is gone");
            self.pressed.reset();
        }

        if let Some(pressed_surface) = self.pressed.surface()
            && ctx.surface() != Some(pressed_surface)
            && !self.update_pressed_surface(server, ctx)
            && !self.drag_active
        {
            // A button is held over another surface: keep feeding it so
            // text selection and scrollbars keep working outside its bounds.
            if cursor_has_moved {
                return self.motion_out_of_surface(server);
            }
            return None;
        }

        if let Some(surface) = ctx.surface() {
            server.pointer_enter(surface, ctx.sx, ctx.sy);
            self.server_cursor = CursorShape::Client;
            if cursor_has_moved {
                return Some((ctx.sx, ctx.sy));
            }
        } else {
            server.pointer_clear_focus();
            if !self.drag_active {
                let mut shape = CursorShape::from_edges(ctx.part().resize_edges());
                let shaded = ctx
                    .view()
                    .and_then(|view| server.view(view))
                    .is_some_and(|state| state.shaded);
                if shaded && shape.is_resize() {
                    shape = CursorShape::Default;
                }
                self.set_cursor(server, shape);
            }
        }
        None
    }

    fn update_button_hover<S: Server>(&self, server: &mut S, ctx: &CursorContext) {
        let button = match ctx.kind {
            PartKind::Decoration { part, .. } if part.is_button() => ctx.node,
            _ => None,
        };
        server.set_button_hover(button);
    }

    /// Allow leave/enter between surfaces of one toplevel while a popup grab
    /// is active; menus built from popups rely on it.
    fn update_pressed_surface<S: Server>(&mut self, server: &mut S, ctx: &CursorContext) -> bool {
        if !server.pointer_has_grab() {
            return false;
        }
        if let Some(pressed) = self.pressed.surface()
            && let Some(surface) = ctx.surface()
            && surface != pressed
        {
            let toplevel = server.toplevel_of(surface);
            if toplevel.is_some() && toplevel == self.pressed.toplevel() {
                self.set_pressed(server, ctx);
                return true;
            }
        }
        false
    }

    /// Cursor position local to the pressed surface.
    fn motion_out_of_surface<S: Server>(&self, server: &S) -> Option<(f64, f64)> {
        let surface = self.pressed.surface()?;
        let node = self.pressed.node();
        let view_origin = self.pressed.view().and_then(|view| server.view(view)).map(|state| {
            (
                state.current.x - state.geometry_offset.0,
                state.current.y - state.geometry_offset.1,
            )
        });

        let origin = match (node, view_origin) {
            (Some(node), _) if server.is_subsurface(surface) => server.node_coords(node),
            (_, Some(origin)) => Some(origin),
            (Some(node), None) if server.is_layer_surface(surface) => server.node_coords(node),
            (Some(node), None) if server.is_unmanaged(node) => server.node_coords(node),
            _ => None,
        };
        let Some((lx, ly)) = origin else {
            tracing::error!(surface = ?surface, "can't detect surface for out-of-surface movement");
            return None;
        };
        Some((self.cursor_x - lx as f64, self.cursor_y - ly as f64))
    }

    fn set_pressed<S: Server>(&mut self, server: &mut S, ctx: &CursorContext) {
        assert!(
            ctx.view().is_some() || ctx.surface().is_some(),
            "pressed target needs a view or a surface"
        );
        let toplevel = ctx.surface().and_then(|surface| server.toplevel_of(surface));
        let edges = self.resize_edges_at(server, ctx);
        self.pressed = PressedState::new(*ctx, toplevel, edges);
        tracing::debug!(view = ?ctx.view(), surface = ?ctx.surface(), "pressed");
    }

    /// Edges an interactive resize started from `ctx` should drag: the
    /// border under the cursor, or else the nearest half of the view on
    /// each axis.
    pub fn resize_edges_at<S: Server>(&self, server: &S, ctx: &CursorContext) -> ResizeEdges {
        let mut edges = ctx.part().resize_edges();
        if edges.is_empty()
            && let Some(view) = ctx.view()
            && let Some(current) = server.view_current_geometry(view)
        {
            let (x, y) = (self.cursor_x as i32, self.cursor_y as i32);
            edges |= if x < current.x + current.width / 2 {
                ResizeEdges::LEFT
            } else {
                ResizeEdges::RIGHT
            };
            edges |= if y < current.y + current.height / 2 {
                ResizeEdges::TOP
            } else {
                ResizeEdges::BOTTOM
            };
        }
        edges
    }

    fn dispatch_button<S: Server>(
        &mut self,
        server: &mut S,
        button: u32,
        state: ButtonState,
        time_msec: u32,
    ) {
        match state {
            ButtonState::Pressed => {
                if self.process_button_press(server, button, time_msec) {
                    server.pointer_button(time_msec, button, state);
                }
            }
            ButtonState::Released => {
                if self.process_button_release(server, button, time_msec) {
                    server.pointer_button(time_msec, button, state);
                }
                self.finish_button_release(server, button);
            }
        }
    }

    /// Returns true if the press should be forwarded to the client with
    /// pointer focus.
    pub fn process_button_press<S: Server>(
        &mut self,
        server: &mut S,
        button: u32,
        time_msec: u32,
    ) -> bool {
        let ctx = self.cursor_context(server);
        self.press_msec = Some(time_msec);

        if ctx.view().is_some() || ctx.surface().is_some() {
            self.set_pressed(server, &ctx);
        }

        if self.mode == InputMode::Menu {
            // The next release must always select or close.
            self.press_msec = None;
            self.bound_buttons.insert(button);
            return false;
        }

        // Surfaces outside the binding system take focus on press.
        match ctx.kind {
            PartKind::LayerSurface { surface } => {
                tracing::debug!("press on layer surface");
                if server.layer_keyboard_interactive(surface) {
                    server.focus_layer(surface);
                }
            }
            PartKind::LayerSubsurface { surface } => {
                tracing::debug!("press on layer subsurface");
                if let Some(layer) = server.subsurface_parent_layer(surface)
                    && server.layer_keyboard_interactive(layer)
                {
                    server.focus_layer(layer);
                }
            }
            PartKind::Unmanaged { surface } => {
                server.focus_view_or_surface(None, Some(surface), false);
            }
            _ => {}
        }

        // Pressing anywhere but the client dismisses its popup.
        if !matches!(
            ctx.kind,
            PartKind::Client { .. } | PartKind::LayerSubsurface { .. }
        ) && server.pointer_has_grab()
        {
            server.pointer_end_grab();
            self.bound_buttons.insert(button);
            return false;
        }

        let consumed_by_frame = self.process_press_mousebinding(server, &ctx, button, time_msec);
        if ctx.surface().is_some() && !consumed_by_frame {
            return true;
        }

        self.bound_buttons.insert(button);
        false
    }

    fn process_press_mousebinding<S: Server>(
        &mut self,
        server: &mut S,
        ctx: &CursorContext,
        button: u32,
        time_msec: u32,
    ) -> bool {
        if self.mode == InputMode::WindowSwitcher {
            return false;
        }

        let target = ClickTarget {
            view: ctx.view(),
            part: ctx.part(),
        };
        let double_click =
            self.double_click
                .register(button, target, time_msec, self.config.doubleclick_time);
        if double_click {
            tracing::debug!(button, part = %target.part, "double click");
        }

        let part = ctx.part();
        let modifiers = self.modifiers;
        let mut consumed_by_frame = false;
        let mut to_run = Vec::new();
        for bind in self.config.mousebinds.iter_mut() {
            if part == Part::Client
                && let Some(view) = ctx.view()
                && server.inhibits_actions(view, &bind.actions)
            {
                continue;
            }
            if !bind.matches_button(part, button, modifiers) {
                continue;
            }
            let swallows = matches!(bind.context, Part::Frame | Part::All);
            match bind.event {
                MouseEvent::Drag | MouseEvent::Click => {
                    // Deferred to the first motion or the release, unless
                    // this press completes a double-click.
                    if !double_click {
                        consumed_by_frame |= swallows;
                        bind.pressed_in_context = true;
                    }
                    continue;
                }
                MouseEvent::DoubleClick if !double_click => continue,
                MouseEvent::DoubleClick | MouseEvent::Press => {}
                MouseEvent::Release | MouseEvent::Scroll => continue,
            }
            consumed_by_frame |= swallows;
            to_run.push(bind.actions.clone());
        }

        let edges = self.resize_edges_at(server, ctx);
        for actions in to_run {
            self.run_actions(server, ctx.view(), &actions, ctx, edges);
        }
        consumed_by_frame
    }

    /// Returns true if the release should be forwarded to the client with
    /// pointer focus.
    pub fn process_button_release<S: Server>(
        &mut self,
        server: &mut S,
        button: u32,
        time_msec: u32,
    ) -> bool {
        let ctx = self.cursor_context(server);
        let pressed_surface = self.pressed.surface();
        let notify = !self.bound_buttons.contains(button);

        self.pressed.reset();

        if self.mode == InputMode::Menu {
            let ignored = self.press_msec.is_some_and(|press| {
                time_msec.wrapping_sub(press) <= self.config.menu_ignore_button_release_period
            });
            if !ignored {
                let closed = if ctx.kind == PartKind::MenuItem {
                    server.call_selected_menu_actions()
                } else {
                    server.close_root_menu();
                    true
                };
                if closed {
                    self.mode = InputMode::Passthrough;
                    self.update_focus(server);
                }
            }
            return notify;
        }

        if !self.mode.is_passthrough() {
            return notify;
        }

        if let Some(pressed) = pressed_surface
            && ctx.surface() != Some(pressed)
        {
            // Released away from the pressed surface: the release still
            // goes to that surface, but no bindings run.
            return notify;
        }

        self.process_release_mousebinding(server, &ctx, button);
        notify
    }

    fn process_release_mousebinding<S: Server>(
        &mut self,
        server: &mut S,
        ctx: &CursorContext,
        button: u32,
    ) {
        if self.mode == InputMode::WindowSwitcher {
            return;
        }

        let part = ctx.part();
        let modifiers = self.modifiers;
        let to_run: Vec<Vec<Action>> = self
            .config
            .mousebinds
            .iter()
            .filter(|bind| {
                !(part == Part::Client
                    && ctx
                        .view()
                        .is_some_and(|view| server.inhibits_actions(view, &bind.actions)))
            })
            .filter(|bind| bind.matches_button(part, button, modifiers))
            .filter(|bind| match bind.event {
                MouseEvent::Release => true,
                MouseEvent::Click => bind.pressed_in_context,
                _ => false,
            })
            .map(|bind| bind.actions.clone())
            .collect();

        let edges = self.resize_edges_at(server, ctx);
        for actions in to_run {
            self.run_actions(server, ctx.view(), &actions, ctx, edges);
        }
    }

    /// Second half of a release: forget deferred bindings and the bound
    /// state of `button`, and end an interactive operation. Returns true if
    /// one was ended.
    pub fn finish_button_release<S: Server>(&mut self, server: &mut S, button: u32) -> bool {
        self.config.mousebinds.clear_pressed(button);
        self.bound_buttons.remove(button);

        let Some(view) = self.grabbed_view() else {
            return false;
        };
        self.finish_interactive(server, view);
        true
    }

    /// Returns true if the axis event should be forwarded to the client.
    pub fn process_axis<S: Server>(
        &mut self,
        server: &mut S,
        orientation: AxisOrientation,
        delta: f64,
        delta_discrete: f64,
    ) -> bool {
        let ctx = self.cursor_context(server);
        let step = self.scroll.accumulate(orientation, delta, delta_discrete);

        let mut handled = false;
        if let Some(direction) = step.direction {
            let part = ctx.part();
            let modifiers = self.modifiers;
            let mut to_run = Vec::new();
            for bind in self.config.mousebinds.iter() {
                if part == Part::Client
                    && let Some(view) = ctx.view()
                    && server.inhibits_actions(view, &bind.actions)
                {
                    continue;
                }
                if bind.context.contains(part)
                    && bind.direction == Some(direction)
                    && bind.modifiers == modifiers
                    && bind.event == MouseEvent::Scroll
                {
                    handled = true;
                    // Partial steps on touchpads and hi-res wheels are
                    // swallowed without running anything.
                    if step.run_action {
                        to_run.push(bind.actions.clone());
                    }
                }
            }
            let edges = self.resize_edges_at(server, &ctx);
            for actions in to_run {
                self.run_actions(server, ctx.view(), &actions, &ctx, edges);
            }
        }

        if ctx.surface().is_some() && !handled {
            self.update_common(server, &ctx, false);
            return true;
        }
        false
    }

    pub(crate) fn run_actions<S: Server>(
        &mut self,
        server: &mut S,
        view: Option<ViewId>,
        actions: &[Action],
        ctx: &CursorContext,
        resize_edges: ResizeEdges,
    ) {
        for action in actions {
            tracing::debug!(view = ?view, action = %action, "running action");
            match action {
                Action::Move => {
                    if let Some(view) = view {
                        self.begin_move(server, view);
                    }
                }
                Action::Resize => {
                    if let Some(view) = view {
                        self.begin_resize(server, view, resize_edges);
                    }
                }
                Action::ShowMenu(menu) => {
                    if self.mode.is_passthrough()
                        && server.open_menu(menu, self.cursor_x, self.cursor_y)
                    {
                        tracing::debug!(menu = %menu, "entering menu mode");
                        self.mode = InputMode::Menu;
                    }
                }
                other => server.run_action(view, other, ctx),
            }
        }
    }

    /// Re-evaluate pointer focus and cursor image without motion, e.g. after
    /// a window moved under a stationary cursor.
    pub fn update_focus<S: Server>(&mut self, server: &mut S) {
        if self.updating_focus {
            return;
        }
        self.updating_focus = true;
        let ctx = self.cursor_context(server);
        if (ctx.view().is_some() || ctx.surface().is_some())
            && self.config.focus_follow_mouse
            && !self.config.focus_follow_mouse_requires_movement
        {
            server.focus_view_or_surface(ctx.view(), ctx.surface(), self.config.raise_on_focus);
        }
        self.update_common(server, &ctx, false);
        self.updating_focus = false;
    }

    pub fn set_cursor<S: Server>(&mut self, server: &mut S, shape: CursorShape) {
        assert!(shape != CursorShape::Client, "client cursor is not server drawn");
        if self.server_cursor == shape {
            return;
        }
        if self.cursor_visible
            && let Some(name) = shape.name(self.cursor_names)
        {
            server.set_cursor_image(CursorImage::Named(name.to_string()));
        }
        self.server_cursor = shape;
    }

    pub fn set_cursor_visible<S: Server>(&mut self, server: &mut S, visible: bool) {
        if self.cursor_visible == visible {
            return;
        }
        self.cursor_visible = visible;
        self.update_cursor_image(server);
    }

    /// Redraw the cursor image, e.g. after an output change.
    pub fn update_cursor_image<S: Server>(&mut self, server: &mut S) {
        if !self.cursor_visible {
            server.set_cursor_image(CursorImage::Hidden);
            return;
        }
        if self.server_cursor == CursorShape::Client {
            // The client's image may be gone; re-enter so it sets it again.
            if server.pointer_focus().is_some() {
                self.server_cursor = CursorShape::Default;
                server.set_cursor_image(CursorImage::Named(String::new()));
                server.pointer_clear_focus();
                self.update_focus(server);
            }
            return;
        }
        if let Some(name) = self.server_cursor.name(self.cursor_names) {
            server.set_cursor_image(CursorImage::Hidden);
            server.set_cursor_image(CursorImage::Named(name.to_string()));
        }
    }

    fn client_cursor_allowed<S: Server>(&self, server: &S, client: ClientId) -> bool {
        if !self.mode.is_passthrough() || !self.cursor_visible {
            return false;
        }
        if server.focused_client() != Some(client) {
            tracing::info!(client = ?client, "cursor request from unfocused client");
            return false;
        }
        true
    }

    /// A client asks to use one of its surfaces as the cursor image.
    pub fn request_set_cursor<S: Server>(
        &mut self,
        server: &mut S,
        client: ClientId,
        surface: Option<SurfaceId>,
        hotspot_x: i32,
        hotspot_y: i32,
    ) {
        if self.client_cursor_allowed(server, client) {
            server.set_cursor_image(CursorImage::Client {
                surface,
                hotspot_x,
                hotspot_y,
            });
        }
    }

    /// A client asks for a named cursor shape.
    pub fn request_set_shape<S: Server>(&mut self, server: &mut S, client: ClientId, shape: &str) {
        if self.client_cursor_allowed(server, client) {
            tracing::debug!(shape, "set xcursor to shape");
            server.set_cursor_image(CursorImage::Named(shape.to_string()));
        }
    }

    /// Synthesized relative motion from touch or tablet front-ends.
    pub fn emulate_move<S: Server>(
        &mut self,
        server: &mut S,
        dx: f64,
        dy: f64,
        time_msec: u32,
    ) {
        if dx == 0.0 && dy == 0.0 {
            tracing::debug!(dx, dy, "dropping useless emulated motion");
            return;
        }
        self.last_event_msec = time_msec;
        server.pointer_relative_motion(time_msec, dx, dy);
        self.move_cursor(server, dx, dy);
        if let Some((sx, sy)) = self.process_motion(server, time_msec) {
            server.pointer_motion(time_msec, sx, sy);
        }
        server.pointer_frame();
    }

    pub fn emulate_move_absolute<S: Server>(
        &mut self,
        server: &mut S,
        x: f64,
        y: f64,
        time_msec: u32,
    ) {
        let (dx, dy) = (x - self.cursor_x, y - self.cursor_y);
        self.emulate_move(server, dx, dy, time_msec);
    }

    pub fn emulate_button<S: Server>(
        &mut self,
        server: &mut S,
        button: u32,
        state: ButtonState,
        time_msec: u32,
    ) {
        self.last_event_msec = time_msec;
        self.dispatch_button(server, button, state, time_msec);
        server.pointer_frame();
    }

    pub fn emulate_axis<S: Server>(
        &mut self,
        server: &mut S,
        orientation: AxisOrientation,
        delta: f64,
        delta_discrete: f64,
        source: AxisSource,
        time_msec: u32,
    ) {
        self.last_event_msec = time_msec;
        if self.process_axis(server, orientation, delta, delta_discrete) {
            server.pointer_axis(
                time_msec,
                orientation,
                delta,
                delta_discrete.round() as i32,
                source,
            );
        }
        server.pointer_frame();
    }
}
