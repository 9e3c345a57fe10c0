//! Semantic regions a pointer can be over, used both as hit-test results
//! and as binding contexts.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::geometry::ResizeEdges;

/// Region of the desktop a pointer event resolved to.
///
/// Declaration order matters: the button, titlebar and frame groupings used
/// by [`Part::contains`] are contiguous ranges of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Part {
    #[default]
    None,
    ButtonClose,
    ButtonMaximize,
    ButtonIconify,
    ButtonWindowIcon,
    ButtonWindowMenu,
    ButtonShade,
    ButtonOmnipresent,
    /// Any titlebar button.
    Button,
    Titlebar,
    TitlebarCornerRight,
    TitlebarCornerLeft,
    Title,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomRight,
    CornerBottomLeft,
    Top,
    Right,
    Bottom,
    Left,
    Client,
    Frame,
    Root,
    Menu,
    Osd,
    LayerSurface,
    LayerSubsurface,
    Unmanaged,
    All,
}

impl Part {
    pub fn is_button(self) -> bool {
        (Part::ButtonClose..=Part::ButtonOmnipresent).contains(&self)
    }

    /// Whether a binding for `self` applies to a pointer over `candidate`.
    pub fn contains(self, candidate: Part) -> bool {
        if self == candidate || self == Part::All {
            return true;
        }
        match self {
            Part::Button => candidate.is_button(),
            Part::Titlebar => (Part::ButtonClose..=Part::Title).contains(&candidate),
            Part::Title => (Part::Titlebar..=Part::Title).contains(&candidate),
            Part::Frame => (Part::ButtonClose..=Part::Client).contains(&candidate),
            Part::Top => matches!(candidate, Part::CornerTopLeft | Part::CornerTopRight),
            Part::Right => matches!(candidate, Part::CornerTopRight | Part::CornerBottomRight),
            Part::Bottom => matches!(candidate, Part::CornerBottomRight | Part::CornerBottomLeft),
            Part::Left => matches!(candidate, Part::CornerTopLeft | Part::CornerBottomLeft),
            _ => false,
        }
    }

    /// Edges a drag on this decoration part resizes.
    pub fn resize_edges(self) -> ResizeEdges {
        match self {
            Part::Top => ResizeEdges::TOP,
            Part::Right => ResizeEdges::RIGHT,
            Part::Bottom => ResizeEdges::BOTTOM,
            Part::Left => ResizeEdges::LEFT,
            Part::CornerTopLeft | Part::TitlebarCornerLeft => ResizeEdges::TOP | ResizeEdges::LEFT,
            Part::CornerTopRight | Part::TitlebarCornerRight => {
                ResizeEdges::TOP | ResizeEdges::RIGHT
            }
            Part::CornerBottomRight => ResizeEdges::BOTTOM | ResizeEdges::RIGHT,
            Part::CornerBottomLeft => ResizeEdges::BOTTOM | ResizeEdges::LEFT,
            _ => ResizeEdges::empty(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Part::None => "None",
            Part::ButtonClose => "Close",
            Part::ButtonMaximize => "Maximize",
            Part::ButtonIconify => "Iconify",
            Part::ButtonWindowIcon => "Icon",
            Part::ButtonWindowMenu => "WindowMenu",
            Part::ButtonShade => "Shade",
            Part::ButtonOmnipresent => "AllDesktops",
            Part::Button => "Button",
            Part::Titlebar => "Titlebar",
            Part::TitlebarCornerRight => "TitlebarCornerRight",
            Part::TitlebarCornerLeft => "TitlebarCornerLeft",
            Part::Title => "Title",
            Part::CornerTopLeft => "TLCorner",
            Part::CornerTopRight => "TRCorner",
            Part::CornerBottomRight => "BRCorner",
            Part::CornerBottomLeft => "BLCorner",
            Part::Top => "Top",
            Part::Right => "Right",
            Part::Bottom => "Bottom",
            Part::Left => "Left",
            Part::Client => "Client",
            Part::Frame => "Frame",
            Part::Root => "Root",
            Part::Menu => "Menu",
            Part::Osd => "Osd",
            Part::LayerSurface => "LayerSurface",
            Part::LayerSubsurface => "LayerSubsurface",
            Part::Unmanaged => "Unmanaged",
            Part::All => "All",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Part {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let part = match s.to_ascii_lowercase().as_str() {
            "close" => Part::ButtonClose,
            "maximize" => Part::ButtonMaximize,
            "iconify" => Part::ButtonIconify,
            "icon" => Part::ButtonWindowIcon,
            "windowmenu" => Part::ButtonWindowMenu,
            "shade" => Part::ButtonShade,
            "alldesktops" => Part::ButtonOmnipresent,
            "button" => Part::Button,
            "titlebar" => Part::Titlebar,
            "title" => Part::Title,
            "tlcorner" => Part::CornerTopLeft,
            "trcorner" => Part::CornerTopRight,
            "brcorner" => Part::CornerBottomRight,
            "blcorner" => Part::CornerBottomLeft,
            "top" => Part::Top,
            "right" => Part::Right,
            "bottom" => Part::Bottom,
            "left" => Part::Left,
            "client" => Part::Client,
            "frame" => Part::Frame,
            "root" | "desktop" => Part::Root,
            "menu" => Part::Menu,
            "all" => Part::All,
            _ => return Err(Error::UnknownContext(s.to_string())),
        };
        Ok(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_contains_decoration_and_client() {
        assert!(Part::Frame.contains(Part::ButtonClose));
        assert!(Part::Frame.contains(Part::Left));
        assert!(Part::Frame.contains(Part::Client));
        assert!(!Part::Frame.contains(Part::Root));
        assert!(!Part::Frame.contains(Part::Menu));
    }

    #[test]
    fn titlebar_contains_buttons_but_not_borders() {
        assert!(Part::Titlebar.contains(Part::ButtonMaximize));
        assert!(Part::Titlebar.contains(Part::Title));
        assert!(!Part::Titlebar.contains(Part::Top));
        assert!(!Part::Title.contains(Part::ButtonMaximize));
        assert!(Part::Title.contains(Part::TitlebarCornerLeft));
    }

    #[test]
    fn edges_contain_adjacent_corners() {
        assert!(Part::Top.contains(Part::CornerTopLeft));
        assert!(Part::Top.contains(Part::CornerTopRight));
        assert!(!Part::Top.contains(Part::CornerBottomLeft));
        assert!(Part::Left.contains(Part::CornerBottomLeft));
    }

    #[test]
    fn all_contains_everything() {
        assert!(Part::All.contains(Part::Root));
        assert!(Part::All.contains(Part::LayerSubsurface));
        assert!(Part::Button.contains(Part::ButtonShade));
        assert!(!Part::Button.contains(Part::Title));
    }

    #[test]
    fn corners_resize_two_edges() {
        assert_eq!(
            Part::CornerBottomLeft.resize_edges(),
            ResizeEdges::BOTTOM | ResizeEdges::LEFT
        );
        assert_eq!(
            Part::TitlebarCornerRight.resize_edges(),
            ResizeEdges::TOP | ResizeEdges::RIGHT
        );
        assert!(Part::Title.resize_edges().is_empty());
    }

    #[test]
    fn parses_context_names() {
        assert_eq!("Desktop".parse::<Part>().ok(), Some(Part::Root));
        assert_eq!("tlcorner".parse::<Part>().ok(), Some(Part::CornerTopLeft));
        assert!(matches!(
            "Nowhere".parse::<Part>(),
            Err(Error::UnknownContext(_))
        ));
    }
}
