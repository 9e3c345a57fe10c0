//! Terminal playground: a [`Desktop`] drawn with ratatui and driven by
//! crossterm mouse events. One terminal cell is one layout pixel.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use indoc::indoc;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Clear};

use crate::config::Config;
use crate::constants::{BTN_LEFT, BTN_MIDDLE, BTN_RIGHT};
use crate::cursor::{AxisEvent, AxisOrientation, ButtonEvent, ButtonState, InputDevice};
use crate::desktop::{Decor, Desktop};
use crate::error::Result;
use crate::event_loop::ControlFlow;
use crate::geometry::Rect;
use crate::mousebind::Modifiers;
use crate::node::{OutputId, ViewId};
use crate::part::Part;
use crate::seat::{InputMode, Seat};
use crate::server::{Focus, Views};
use crate::ui::UiFrame;

const BUTTON_GLYPHS: [(Part, &str); 3] = [
    (Part::ButtonClose, "[x]"),
    (Part::ButtonMaximize, "[+]"),
    (Part::ButtonIconify, "[_]"),
];

const CLIENT_HINT: &str = indoc! {"
    drag title: move
    alt+drag: move
    drag border: resize
    dblclick title: maximize
    wheel on title: shade
    right click desktop: menu
"};

pub struct Playground {
    desktop: Desktop,
    seat: Seat,
    output: OutputId,
    next_title: u32,
    status: String,
}

impl Playground {
    /// Build a desktop filling a `width` x `height` terminal. The bottom row
    /// is kept for the status line.
    pub fn new(config: Config, width: u16, height: u16) -> Result<Self> {
        config.validate()?;
        let mut desktop = Desktop::new(Decor::compact());
        desktop.set_min_size(12, 3);
        desktop.set_unsnap_threshold(2);
        let output = desktop.add_output(Self::output_box(width, height));
        Ok(Self {
            desktop,
            seat: Seat::new(config),
            output,
            next_title: 1,
            status: String::from("q: quit  n: new window  esc: cancel"),
        })
    }

    fn output_box(width: u16, height: u16) -> Rect {
        Rect::new(0, 0, width as i32, (height as i32 - 1).max(1))
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut Desktop {
        &mut self.desktop
    }

    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    /// Open a window cascaded from the previous one.
    pub fn spawn_window(&mut self) -> ViewId {
        let n = self.next_title as i32;
        self.next_title += 1;
        let offset = (n - 1) % 6 * 3;
        let geometry = Rect::new(4 + offset, 3 + offset, 30, 8);
        let view = self.desktop.add_view(&format!("shell {n}"), geometry);
        self.desktop.focus_view(view, true);
        view
    }

    pub fn handle_event(&mut self, event: &Event, time_msec: u32) -> ControlFlow {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => {
                self.seat.set_modifiers(modifiers_from(mouse.modifiers));
                let x = mouse.column as f64 + 0.5;
                let y = mouse.row as f64 + 0.5;
                match mouse.kind {
                    MouseEventKind::Down(button) => {
                        self.warp(time_msec, x, y);
                        self.button(time_msec, button, ButtonState::Pressed);
                    }
                    MouseEventKind::Up(button) => {
                        self.warp(time_msec, x, y);
                        self.button(time_msec, button, ButtonState::Released);
                    }
                    MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                        self.seat.handle_motion_absolute(
                            &mut self.desktop,
                            InputDevice::Pointer,
                            time_msec,
                            x,
                            y,
                        );
                    }
                    MouseEventKind::ScrollUp => {
                        self.scroll(time_msec, AxisOrientation::Vertical, -1.0)
                    }
                    MouseEventKind::ScrollDown => {
                        self.scroll(time_msec, AxisOrientation::Vertical, 1.0)
                    }
                    MouseEventKind::ScrollLeft => {
                        self.scroll(time_msec, AxisOrientation::Horizontal, -1.0)
                    }
                    MouseEventKind::ScrollRight => {
                        self.scroll(time_msec, AxisOrientation::Horizontal, 1.0)
                    }
                }
                self.seat.handle_frame(&mut self.desktop);
                self.reap_closed_views();
            }
            Event::Resize(width, height) => {
                self.desktop
                    .resize_output(self.output, Self::output_box(*width, *height));
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        match key.code {
            KeyCode::Char('q') => return ControlFlow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ControlFlow::Quit;
            }
            KeyCode::Char('n') => {
                let view = self.spawn_window();
                tracing::debug!(view = ?view, "spawned window");
            }
            KeyCode::Esc => {
                self.seat.close_menu(&mut self.desktop);
                if let Some(view) = self.seat.grabbed_view() {
                    self.seat.cancel_interactive(&mut self.desktop, view);
                }
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    /// Terminals report presses without a preceding motion event.
    fn warp(&mut self, time_msec: u32, x: f64, y: f64) {
        if self.seat.cursor_position() != (x, y) {
            self.seat
                .handle_motion_absolute(&mut self.desktop, InputDevice::Pointer, time_msec, x, y);
        }
    }

    fn button(&mut self, time_msec: u32, button: MouseButton, state: ButtonState) {
        let event = ButtonEvent {
            time_msec,
            button: button_code(button),
            state,
        };
        self.seat.handle_button(&mut self.desktop, &event);
    }

    fn scroll(&mut self, time_msec: u32, orientation: AxisOrientation, clicks: f64) {
        let event = AxisEvent::wheel(time_msec, orientation, clicks);
        self.seat.handle_axis(&mut self.desktop, &event);
    }

    fn reap_closed_views(&mut self) {
        for view in self.desktop.take_closed_views() {
            self.seat.view_destroyed(&mut self.desktop, view);
            if let Some(surface) = self.desktop.remove_view(view) {
                self.seat.surface_destroyed(surface);
            }
        }
    }

    /// Fire due timers. Called once per event-loop tick.
    pub fn tick(&mut self, time_msec: u32) {
        self.seat.dispatch_timers(&mut self.desktop, time_msec);
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        frame.set_style(
            Rect::new(0, 0, area.width as i32, area.height as i32),
            Style::default().bg(Color::Black),
        );

        for view in self.desktop.stacking() {
            if !self.desktop.is_minimized(view) {
                self.render_view(frame, view);
            }
        }

        let accent = Style::default().fg(Color::Yellow);
        if let Some(target) = self.desktop.overlay_box() {
            frame.render_widget(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .border_style(accent),
                target,
            );
        }
        if let Some((view, geometry)) = self.desktop.resize_preview()
            && self.desktop.view(view).is_some()
        {
            let decor = self.desktop.decor();
            let outline = Rect::new(
                geometry.x - decor.border_width,
                geometry.y - decor.titlebar_height - decor.border_width,
                geometry.width + 2 * decor.border_width,
                geometry.height + decor.titlebar_height + 2 * decor.border_width,
            );
            frame.render_widget(
                Block::bordered()
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(Color::Magenta)),
                outline,
            );
        }

        self.render_menu(frame);
        self.render_status(frame);
    }

    fn render_view(&self, frame: &mut UiFrame<'_>, view: ViewId) {
        let (Some(state), Some(outer)) = (self.desktop.view(view), self.desktop.frame_box(view))
        else {
            return;
        };
        let active = self.desktop.active_view() == Some(view);
        let border = if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(Clear, outer);
        frame.render_widget(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border),
            outer,
        );

        if let Some(title) = self.desktop.title_box(view) {
            let style = border.add_modifier(Modifier::BOLD);
            let name = self.desktop.view_title(view).unwrap_or_default();
            frame.set_line(title.x, title.y, name, title.width, style);
        }
        let hovered = self.desktop.hovered_button_part();
        for (part, glyph) in BUTTON_GLYPHS {
            let Some(hitbox) = self.desktop.button_box(view, part) else {
                continue;
            };
            let style = if hovered == Some((view, part)) {
                border.add_modifier(Modifier::REVERSED)
            } else {
                border
            };
            frame.set_line(hitbox.x, hitbox.y, glyph, hitbox.width, style);
        }

        if !state.shaded {
            let client = state.current;
            let size = format!("{}x{}", client.width, client.height);
            frame.set_line(client.x, client.y, &size, client.width, Style::default());
            let hint = Style::default().fg(Color::DarkGray);
            for (row, line) in (1..client.height).zip(CLIENT_HINT.lines()) {
                frame.set_line(client.x, client.y + row, line, client.width, hint);
            }
        }
    }

    fn render_menu(&self, frame: &mut UiFrame<'_>) {
        let Some((items, selected)) = self.desktop.open_menu_items() else {
            return;
        };
        for (index, (label, rect)) in items.iter().enumerate() {
            let style = if selected == Some(index) {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::White).bg(Color::Blue)
            };
            frame.set_style(*rect, style);
            frame.set_line(rect.x + 1, rect.y, label, rect.width - 1, style);
        }
    }

    fn render_status(&self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.height == 0 {
            return;
        }
        let mode = match self.seat.mode() {
            InputMode::Passthrough => "passthrough",
            InputMode::Move(_) => "move",
            InputMode::Resize(_) => "resize",
            InputMode::Menu => "menu",
            InputMode::WindowSwitcher => "switcher",
        };
        let (x, y) = self.seat.cursor_position();
        let line = format!(
            " {mode} | {:.0},{:.0} | cursor {:?} | {}",
            x.floor(),
            y.floor(),
            self.seat.server_cursor(),
            self.status
        );
        let row = area.height as i32 - 1;
        let style = Style::default().fg(Color::Black).bg(Color::Gray);
        frame.set_style(Rect::new(0, row, area.width as i32, 1), style);
        frame.set_line(0, row, &line, area.width as i32, style);
    }
}

fn button_code(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => BTN_LEFT,
        MouseButton::Right => BTN_RIGHT,
        MouseButton::Middle => BTN_MIDDLE,
    }
}

fn modifiers_from(keys: KeyModifiers) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if keys.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if keys.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CTRL;
    }
    if keys.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }
    if keys.contains(KeyModifiers::SUPER) {
        modifiers |= Modifiers::LOGO;
    }
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseEvent;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect as CellRect;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn playground() -> (Playground, ViewId) {
        let config = Config {
            snap_edge_range: 1,
            snap_edge_corner_range: 4,
            ..Config::default()
        };
        let mut playground = Playground::new(config, 80, 25).expect("config");
        let view = playground.spawn_window();
        (playground, view)
    }

    #[test]
    fn title_drag_moves_the_window() {
        let (mut pg, view) = playground();
        // Window client area starts at (4, 3); its title row is y = 2.
        pg.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 8, 2), 10);
        // The first drag motion starts the move where the cursor now is.
        pg.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 9, 2), 20);
        assert!(matches!(pg.seat().mode(), InputMode::Move(_)));
        pg.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 19, 7), 30);
        pg.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 19, 7), 40);
        assert!(pg.seat().mode().is_passthrough());
        let geometry = pg.desktop().view(view).expect("view").current;
        assert_eq!((geometry.x, geometry.y), (14, 8));
    }

    #[test]
    fn close_button_removes_the_window() {
        let (mut pg, view) = playground();
        let close = pg
            .desktop()
            .button_box(view, Part::ButtonClose)
            .expect("button");
        let (col, row) = (close.x as u16, close.y as u16);
        pg.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row), 10);
        pg.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col, row), 20);
        assert!(pg.desktop().view(view).is_none());
        assert!(pg.desktop().stacking().is_empty());
    }

    #[test]
    fn q_quits() {
        let (mut pg, _) = playground();
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(pg.handle_event(&quit, 0), ControlFlow::Quit);
    }

    #[test]
    fn render_draws_title_and_status() {
        let (pg, _) = playground();
        let area = CellRect::new(0, 0, 80, 25);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        pg.render(&mut frame);
        let title: String = (4..11).map(|x| buffer[(x, 2)].symbol()).collect();
        assert_eq!(title, "shell 1");
        let status: String = (1..12).map(|x| buffer[(x, 24)].symbol()).collect();
        assert_eq!(status, "passthrough");
        let hint: String = (4..14).map(|x| buffer[(x, 4)].symbol()).collect();
        assert_eq!(hint, "drag title");
    }
}
