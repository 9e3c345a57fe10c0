use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::constants::{
    BTN_BACK, BTN_EXTRA, BTN_FORWARD, BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, BTN_SIDE, BTN_TASK,
};
use crate::error::{Error, Result};
use crate::part::Part;

bitflags! {
    /// Keyboard modifiers held while a pointer event happens.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 1;
        const CAPS = 2;
        const CTRL = 4;
        const ALT = 8;
        const MOD2 = 16;
        const MOD3 = 32;
        const LOGO = 64;
        const MOD5 = 128;
    }
}

impl Modifiers {
    fn from_prefix(token: &str) -> Result<Self> {
        let modifier = match token {
            "S" => Modifiers::SHIFT,
            "C" => Modifiers::CTRL,
            "A" | "Mod1" => Modifiers::ALT,
            "W" | "Mod4" => Modifiers::LOGO,
            "M" | "Mod5" => Modifiers::MOD5,
            "H" | "Mod3" => Modifiers::MOD3,
            _ => return Err(Error::UnknownModifier(token.to_string())),
        };
        Ok(modifier)
    }
}

/// When a binding fires relative to the physical button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEvent {
    Press,
    Release,
    /// Press and release without leaving the pressed surface.
    Click,
    DoubleClick,
    /// First motion after a press.
    Drag,
    Scroll,
}

impl FromStr for MouseEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "press" => Ok(MouseEvent::Press),
            "release" => Ok(MouseEvent::Release),
            "click" => Ok(MouseEvent::Click),
            "doubleclick" => Ok(MouseEvent::DoubleClick),
            "drag" => Ok(MouseEvent::Drag),
            "scroll" => Ok(MouseEvent::Scroll),
            _ => Err(Error::UnknownEvent(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(Error::UnknownDirection(s.to_string())),
        }
    }
}

/// An action a binding triggers.
///
/// `Move`, `Resize` and `ShowMenu` change the input mode and are carried out
/// by the seat; everything else is handed to the host's action runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Move,
    Resize,
    ShowMenu(String),
    Focus,
    Raise,
    Unfocus,
    Close,
    Iconify,
    ToggleMaximize,
    ToggleShade,
    Shade,
    Unshade,
    ToggleOmnipresent,
    ToggleKeybinds,
    /// Any other named action, passed through verbatim.
    Custom(String),
}

impl Action {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Action::Move | Action::Resize)
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Parses `Name` or `Name argument`.
    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.splitn(2, char::is_whitespace);
        let name = tokens.next().unwrap_or_default();
        let argument = tokens.next().map(str::trim).filter(|arg| !arg.is_empty());
        let action = match name.to_ascii_lowercase().as_str() {
            "move" => Action::Move,
            "resize" => Action::Resize,
            "showmenu" => Action::ShowMenu(argument.unwrap_or("root-menu").to_string()),
            "focus" => Action::Focus,
            "raise" => Action::Raise,
            "unfocus" => Action::Unfocus,
            "close" => Action::Close,
            "iconify" => Action::Iconify,
            "togglemaximize" => Action::ToggleMaximize,
            "toggleshade" => Action::ToggleShade,
            "shade" => Action::Shade,
            "unshade" => Action::Unshade,
            "toggleomnipresent" => Action::ToggleOmnipresent,
            "togglekeybinds" => Action::ToggleKeybinds,
            "" => return Err(Error::UnknownAction(s.to_string())),
            _ => Action::Custom(s.trim().to_string()),
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ShowMenu(menu) => write!(f, "ShowMenu {menu}"),
            Action::Custom(name) => f.write_str(name),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Parse a button description like `"A-Left"` or `"W-S-Right"`.
pub fn parse_button(s: &str) -> Result<(u32, Modifiers)> {
    let (modifiers, name) = split_modifiers(s)?;
    let button = match name.to_ascii_lowercase().as_str() {
        "left" => BTN_LEFT,
        "right" => BTN_RIGHT,
        "middle" => BTN_MIDDLE,
        "side" => BTN_SIDE,
        "extra" => BTN_EXTRA,
        "forward" => BTN_FORWARD,
        "back" => BTN_BACK,
        "task" => BTN_TASK,
        _ => return Err(Error::UnknownButton(s.to_string())),
    };
    Ok((button, modifiers))
}

/// Parse a scroll direction description like `"C-Up"`.
pub fn parse_direction(s: &str) -> Result<(Direction, Modifiers)> {
    let (modifiers, name) = split_modifiers(s)?;
    Ok((name.parse()?, modifiers))
}

fn split_modifiers(s: &str) -> Result<(Modifiers, &str)> {
    let mut tokens: Vec<&str> = s.split('-').collect();
    let name = tokens.pop().unwrap_or_default();
    let mut modifiers = Modifiers::empty();
    for token in tokens {
        modifiers |= Modifiers::from_prefix(token)?;
    }
    Ok((modifiers, name))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mousebind {
    pub context: Part,
    /// Zero for scroll bindings.
    pub button: u32,
    pub direction: Option<Direction>,
    pub modifiers: Modifiers,
    pub event: MouseEvent,
    pub actions: Vec<Action>,
    /// Set by a press that a deferred `Click`/`Drag` binding is waiting on.
    pub(crate) pressed_in_context: bool,
}

impl Mousebind {
    pub fn new(context: Part, button: u32, modifiers: Modifiers, event: MouseEvent) -> Self {
        Self {
            context,
            button,
            direction: None,
            modifiers,
            event,
            actions: Vec::new(),
            pressed_in_context: false,
        }
    }

    pub fn scroll(context: Part, direction: Direction, modifiers: Modifiers) -> Self {
        Self {
            direction: Some(direction),
            ..Self::new(context, 0, modifiers, MouseEvent::Scroll)
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Build a binding from its textual parts, e.g.
    /// `Mousebind::parse("Titlebar", "Left", "Drag", &["Move"])`.
    /// Scroll bindings take a direction (`"Up"`) in place of the button.
    pub fn parse(context: &str, trigger: &str, event: &str, actions: &[&str]) -> Result<Self> {
        let context: Part = context.parse()?;
        let event: MouseEvent = event.parse()?;
        let mut bind = if event == MouseEvent::Scroll {
            let (direction, modifiers) = parse_direction(trigger)?;
            Self::scroll(context, direction, modifiers)
        } else {
            let (button, modifiers) = parse_button(trigger)?;
            Self::new(context, button, modifiers, event)
        };
        for action in actions {
            bind.actions.push(action.parse()?);
        }
        Ok(bind)
    }

    pub fn pressed_in_context(&self) -> bool {
        self.pressed_in_context
    }

    pub(crate) fn matches_button(&self, context: Part, button: u32, modifiers: Modifiers) -> bool {
        self.context.contains(context) && self.button == button && self.modifiers == modifiers
    }
}

/// Ordered list of bindings; evaluation order is declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mousebinds {
    binds: Vec<Mousebind>,
}

impl Mousebinds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings matching a stock stacking desktop.
    pub fn default_set() -> Self {
        use Action::*;
        use MouseEvent::*;
        use Part as P;

        let none = Modifiers::empty();
        let alt = Modifiers::ALT;
        let mut binds = Self::new();
        let mut add = |context, button, modifiers, event, actions: &[Action]| {
            let mut bind = Mousebind::new(context, button, modifiers, event);
            bind.actions.extend_from_slice(actions);
            binds.push(bind);
        };

        add(P::Frame, BTN_LEFT, alt, Press, &[Focus, Raise]);
        add(P::Frame, BTN_LEFT, alt, Drag, &[Move]);
        add(P::Frame, BTN_RIGHT, alt, Press, &[Focus, Raise]);
        add(P::Frame, BTN_RIGHT, alt, Drag, &[Resize]);

        add(P::Titlebar, BTN_LEFT, none, Press, &[Focus, Raise]);
        add(P::Titlebar, BTN_LEFT, none, Drag, &[Move]);
        add(P::Title, BTN_LEFT, none, DoubleClick, &[ToggleMaximize]);
        add(P::Titlebar, BTN_MIDDLE, none, Press, &[Focus, Raise]);

        for border in [P::Top, P::Bottom, P::Left, P::Right] {
            add(border, BTN_LEFT, none, Press, &[Focus, Raise]);
            add(border, BTN_LEFT, none, Drag, &[Resize]);
        }

        add(P::ButtonClose, BTN_LEFT, none, Click, &[Close]);
        add(P::ButtonMaximize, BTN_LEFT, none, Click, &[ToggleMaximize]);
        add(P::ButtonIconify, BTN_LEFT, none, Click, &[Iconify]);
        add(P::ButtonShade, BTN_LEFT, none, Click, &[ToggleShade]);
        add(P::ButtonOmnipresent, BTN_LEFT, none, Click, &[ToggleOmnipresent]);
        add(
            P::ButtonWindowMenu,
            BTN_LEFT,
            none,
            Click,
            &[ShowMenu("client-menu".to_string())],
        );

        add(P::Client, BTN_LEFT, none, Press, &[Focus, Raise]);
        add(P::Client, BTN_MIDDLE, none, Press, &[Focus, Raise]);
        add(P::Client, BTN_RIGHT, none, Press, &[Focus, Raise]);

        add(P::Root, BTN_LEFT, none, Press, &[Unfocus]);
        add(P::Root, BTN_RIGHT, none, Press, &[ShowMenu("root-menu".to_string())]);

        binds.push(Mousebind::scroll(P::Title, Direction::Up, none).with_action(Shade));
        binds.push(Mousebind::scroll(P::Title, Direction::Down, none).with_action(Unshade));
        binds
    }

    pub fn push(&mut self, bind: Mousebind) {
        self.binds.push(bind);
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mousebind> {
        self.binds.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mousebind> {
        self.binds.iter_mut()
    }

    /// Forget deferred click/drag state for every binding on `button`.
    pub(crate) fn clear_pressed(&mut self, button: u32) {
        for bind in self.binds.iter_mut().filter(|b| b.button == button) {
            bind.pressed_in_context = false;
        }
    }
}

impl FromIterator<Mousebind> for Mousebinds {
    fn from_iter<T: IntoIterator<Item = Mousebind>>(iter: T) -> Self {
        Self {
            binds: iter.into_iter().collect(),
        }
    }
}
