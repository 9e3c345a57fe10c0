use crate::error::{Error, Result};
use crate::mousebind::Mousebinds;

/// Tunables for pointer handling.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Distance from an output edge within which a move snaps; disabled
    /// when not positive.
    pub snap_edge_range: i32,
    /// Distance from an output corner within which an edge snap becomes a
    /// corner snap; disabled when not positive.
    pub snap_edge_corner_range: i32,
    /// Snapping to the top edge maximizes instead of tiling the top half.
    pub snap_top_maximize: bool,
    /// Maximum interval between two presses of a double-click.
    pub doubleclick_time: u32,
    /// Releases this soon after the press that opened a menu are ignored.
    pub menu_ignore_button_release_period: u32,
    /// Resize the real window during a drag instead of a preview outline.
    pub resize_draw_contents: bool,
    pub focus_follow_mouse: bool,
    pub focus_follow_mouse_requires_movement: bool,
    pub raise_on_focus: bool,
    pub mousebinds: Mousebinds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snap_edge_range: 10,
            snap_edge_corner_range: 50,
            snap_top_maximize: true,
            doubleclick_time: 500,
            menu_ignore_button_release_period: 250,
            resize_draw_contents: true,
            focus_follow_mouse: false,
            focus_follow_mouse_requires_movement: true,
            raise_on_focus: false,
            mousebinds: Mousebinds::default_set(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.doubleclick_time == 0 {
            return Err(Error::InvalidConfig(
                "doubleclick_time must be positive".to_string(),
            ));
        }
        let mut scroll_binds = self
            .mousebinds
            .iter()
            .filter(|b| b.event == crate::mousebind::MouseEvent::Scroll);
        if scroll_binds.any(|b| b.direction.is_none()) {
            return Err(Error::InvalidConfig(
                "scroll binding without a direction".to_string(),
            ));
        }
        if self
            .mousebinds
            .iter()
            .any(|b| b.event != crate::mousebind::MouseEvent::Scroll && b.button == 0)
        {
            return Err(Error::InvalidConfig(
                "button binding without a button".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mousebind::{Modifiers, MouseEvent, Mousebind};
    use crate::part::Part;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.snap_edge_range, 10);
        assert!(!config.mousebinds.is_empty());
    }

    #[test]
    fn zero_doubleclick_time_is_rejected() {
        let config = Config {
            doubleclick_time: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn buttonless_binding_is_rejected() {
        let mut config = Config::default();
        config
            .mousebinds
            .push(Mousebind::new(Part::Root, 0, Modifiers::empty(), MouseEvent::Press));
        assert!(config.validate().is_err());
    }
}
