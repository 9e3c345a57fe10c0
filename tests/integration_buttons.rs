use cursor_wm::constants::{BTN_LEFT, BTN_RIGHT};
use cursor_wm::cursor::{ButtonEvent, ButtonState, InputDevice};
use cursor_wm::desktop::{ClientEvent, Desktop};
use cursor_wm::node::ViewId;
use cursor_wm::server::Views;
use cursor_wm::view::ViewAxis;
use cursor_wm::{Action, Config, Modifiers, MouseEvent, Mousebind, Part, Seat};

fn setup(config: Config) -> (Desktop, Seat, ViewId) {
    let mut desktop = Desktop::default();
    desktop.add_output(cursor_wm::Rect::new(0, 0, 1920, 1080));
    let view = desktop.add_view("term", cursor_wm::Rect::new(100, 100, 400, 300));
    (desktop, Seat::new(config), view)
}

fn warp(seat: &mut Seat, desktop: &mut Desktop, time: u32, x: f64, y: f64) {
    seat.handle_motion_absolute(desktop, InputDevice::Pointer, time, x, y);
    seat.handle_frame(desktop);
}

fn button(seat: &mut Seat, desktop: &mut Desktop, time: u32, button: u32, state: ButtonState) {
    seat.handle_button(
        desktop,
        &ButtonEvent {
            time_msec: time,
            button,
            state,
        },
    );
    seat.handle_frame(desktop);
}

fn click(seat: &mut Seat, desktop: &mut Desktop, time: u32, btn: u32) {
    button(seat, desktop, time, btn, ButtonState::Pressed);
    button(seat, desktop, time + 20, btn, ButtonState::Released);
}

fn count(desktop: &Desktop, action: &Action) -> usize {
    desktop.actions().iter().filter(|(_, a)| a == action).count()
}

fn client_buttons(desktop: &Desktop) -> Vec<(u32, ButtonState)> {
    desktop
        .client_events()
        .iter()
        .filter_map(|event| match event {
            ClientEvent::Button { button, state, .. } => Some((*button, *state)),
            _ => None,
        })
        .collect()
}

#[test]
fn bound_buttons_never_outlive_their_release() {
    let (mut desktop, mut seat, _view) = setup(Config::default());

    // Forwarded to the client: never bound.
    warp(&mut seat, &mut desktop, 10, 200.0, 200.0);
    button(&mut seat, &mut desktop, 20, BTN_LEFT, ButtonState::Pressed);
    assert!(!seat.bound_buttons().contains(BTN_LEFT));
    button(&mut seat, &mut desktop, 30, BTN_LEFT, ButtonState::Released);
    assert!(seat.bound_buttons().is_empty());

    // Consumed by the titlebar: bound until its release.
    warp(&mut seat, &mut desktop, 40, 150.0, 88.0);
    button(&mut seat, &mut desktop, 50, BTN_LEFT, ButtonState::Pressed);
    assert!(seat.bound_buttons().contains(BTN_LEFT));
    button(&mut seat, &mut desktop, 60, BTN_LEFT, ButtonState::Released);
    assert!(seat.bound_buttons().is_empty());

    // Empty desktop.
    warp(&mut seat, &mut desktop, 70, 1000.0, 800.0);
    button(&mut seat, &mut desktop, 80, BTN_LEFT, ButtonState::Pressed);
    assert!(seat.bound_buttons().contains(BTN_LEFT));
    button(&mut seat, &mut desktop, 90, BTN_LEFT, ButtonState::Released);
    assert!(seat.bound_buttons().is_empty());

    // The client saw exactly its own press/release pair.
    assert_eq!(
        client_buttons(&desktop),
        vec![
            (BTN_LEFT, ButtonState::Pressed),
            (BTN_LEFT, ButtonState::Released)
        ]
    );
}

#[test]
fn overlapping_presses_release_independently() {
    let (mut desktop, mut seat, _view) = setup(Config::default());
    warp(&mut seat, &mut desktop, 10, 150.0, 88.0);

    button(&mut seat, &mut desktop, 20, BTN_LEFT, ButtonState::Pressed);
    button(&mut seat, &mut desktop, 30, BTN_RIGHT, ButtonState::Pressed);
    assert_eq!(seat.bound_buttons().len(), 2);

    button(&mut seat, &mut desktop, 40, BTN_LEFT, ButtonState::Released);
    assert!(!seat.bound_buttons().contains(BTN_LEFT));
    assert!(seat.bound_buttons().contains(BTN_RIGHT));

    button(&mut seat, &mut desktop, 50, BTN_RIGHT, ButtonState::Released);
    assert!(seat.bound_buttons().is_empty());
    assert!(client_buttons(&desktop).is_empty());
}

fn double_click_config() -> Config {
    let mut config = Config::default();
    config.mousebinds.push(
        Mousebind::new(
            Part::Root,
            BTN_LEFT,
            Modifiers::empty(),
            MouseEvent::DoubleClick,
        )
        .with_action(Action::Custom("double".to_string())),
    );
    config
}

#[test]
fn triple_click_is_one_double_click() {
    let (mut desktop, mut seat, _view) = setup(double_click_config());
    let double = Action::Custom("double".to_string());
    warp(&mut seat, &mut desktop, 10, 1000.0, 800.0);

    click(&mut seat, &mut desktop, 100, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 0);
    click(&mut seat, &mut desktop, 200, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 1);
    click(&mut seat, &mut desktop, 300, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 1);

    // The third click started a new pair.
    click(&mut seat, &mut desktop, 400, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 2);
}

#[test]
fn slow_or_mismatched_clicks_are_not_double() {
    let (mut desktop, mut seat, _view) = setup(double_click_config());
    let double = Action::Custom("double".to_string());
    warp(&mut seat, &mut desktop, 10, 1000.0, 800.0);

    click(&mut seat, &mut desktop, 100, BTN_LEFT);
    click(&mut seat, &mut desktop, 100 + 600, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 0);

    // Different button in between breaks the pair.
    click(&mut seat, &mut desktop, 2000, BTN_LEFT);
    click(&mut seat, &mut desktop, 2050, BTN_RIGHT);
    seat.close_menu(&mut desktop);
    click(&mut seat, &mut desktop, 2100, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 0);

    // Different target in between breaks the pair.
    click(&mut seat, &mut desktop, 4000, BTN_LEFT);
    warp(&mut seat, &mut desktop, 4010, 200.0, 200.0);
    click(&mut seat, &mut desktop, 4020, BTN_LEFT);
    warp(&mut seat, &mut desktop, 4030, 1000.0, 800.0);
    click(&mut seat, &mut desktop, 4040, BTN_LEFT);
    assert_eq!(count(&desktop, &double), 0);
}

#[test]
fn maximize_button_click_runs_once_and_never_reaches_the_client() {
    let (mut desktop, mut seat, view) = setup(Config::default());
    let max = desktop
        .button_box(view, Part::ButtonMaximize)
        .expect("maximize button");
    let (x, y) = (max.x as f64 + 12.0, max.y as f64 + 12.0);

    warp(&mut seat, &mut desktop, 10, x, y);
    button(&mut seat, &mut desktop, 100, BTN_LEFT, ButtonState::Pressed);
    assert_eq!(count(&desktop, &Action::ToggleMaximize), 0);
    button(&mut seat, &mut desktop, 150, BTN_LEFT, ButtonState::Released);

    assert_eq!(count(&desktop, &Action::ToggleMaximize), 1);
    assert!(client_buttons(&desktop).is_empty());
    assert!(seat.bound_buttons().is_empty());
    let state = desktop.view(view).expect("view");
    assert_eq!(state.maximized, ViewAxis::Both);
}

#[test]
fn click_released_elsewhere_does_not_fire() {
    let (mut desktop, mut seat, view) = setup(Config::default());
    let close = desktop.button_box(view, Part::ButtonClose).expect("close");

    warp(&mut seat, &mut desktop, 10, close.x as f64 + 5.0, close.y as f64 + 5.0);
    button(&mut seat, &mut desktop, 20, BTN_LEFT, ButtonState::Pressed);
    warp(&mut seat, &mut desktop, 30, 1000.0, 800.0);
    button(&mut seat, &mut desktop, 40, BTN_LEFT, ButtonState::Released);

    assert_eq!(count(&desktop, &Action::Close), 0);
    assert!(desktop.take_closed_views().is_empty());
}

#[test]
fn alt_drag_on_client_is_swallowed() {
    let (mut desktop, mut seat, _view) = setup(Config::default());
    warp(&mut seat, &mut desktop, 10, 200.0, 200.0);
    seat.set_modifiers(Modifiers::ALT);
    button(&mut seat, &mut desktop, 20, BTN_LEFT, ButtonState::Pressed);
    assert!(seat.bound_buttons().contains(BTN_LEFT));
    button(&mut seat, &mut desktop, 30, BTN_LEFT, ButtonState::Released);
    assert!(client_buttons(&desktop).is_empty());
}

#[test]
fn inhibited_view_skips_client_bindings() {
    let (mut desktop, mut seat, view) = setup(Config::default());
    desktop.set_keybinds_inhibited(view, true);
    warp(&mut seat, &mut desktop, 10, 200.0, 200.0);
    click(&mut seat, &mut desktop, 20, BTN_LEFT);
    assert_eq!(count(&desktop, &Action::Focus), 0);
    assert_eq!(client_buttons(&desktop).len(), 2);
}
