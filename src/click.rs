//! Double-click detection.

use crate::node::ViewId;
use crate::part::Part;

/// Identity of what a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClickTarget {
    pub view: Option<ViewId>,
    pub part: Part,
}

/// Remembers the previous press so the next one can be classified.
#[derive(Debug, Clone, Default)]
pub struct DoubleClickTracker {
    last: Option<(u32, ClickTarget)>,
    last_time_msec: Option<u32>,
}

impl DoubleClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press and report whether it completes a double-click.
    ///
    /// A completed double-click forgets the previous press so a third rapid
    /// press starts a new pair.
    pub fn register(
        &mut self,
        button: u32,
        target: ClickTarget,
        time_msec: u32,
        threshold_msec: u32,
    ) -> bool {
        let elapsed = self
            .last_time_msec
            .map(|last| time_msec.wrapping_sub(last));
        self.last_time_msec = Some(time_msec);

        if self.last != Some((button, target)) {
            self.last = Some((button, target));
            return false;
        }
        match elapsed {
            Some(elapsed) if elapsed < threshold_msec => {
                self.last = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BTN_LEFT, BTN_RIGHT};

    const TITLE: ClickTarget = ClickTarget {
        view: Some(ViewId(1)),
        part: Part::Title,
    };

    #[test]
    fn second_press_within_threshold_is_double() {
        let mut tracker = DoubleClickTracker::new();
        assert!(!tracker.register(BTN_LEFT, TITLE, 1000, 500));
        assert!(tracker.register(BTN_LEFT, TITLE, 1200, 500));
    }

    #[test]
    fn slow_second_press_is_not_double() {
        let mut tracker = DoubleClickTracker::new();
        assert!(!tracker.register(BTN_LEFT, TITLE, 1000, 500));
        assert!(!tracker.register(BTN_LEFT, TITLE, 1500, 500));
        // The slow press still refreshes the timestamp.
        assert!(tracker.register(BTN_LEFT, TITLE, 1600, 500));
    }

    #[test]
    fn triple_click_yields_one_double() {
        let mut tracker = DoubleClickTracker::new();
        let hits: Vec<bool> = [0, 100, 200]
            .into_iter()
            .map(|t| tracker.register(BTN_LEFT, TITLE, t, 500))
            .collect();
        assert_eq!(hits, vec![false, true, false]);
    }

    #[test]
    fn target_or_button_change_breaks_the_pair() {
        let mut tracker = DoubleClickTracker::new();
        let other = ClickTarget {
            view: Some(ViewId(2)),
            part: Part::Title,
        };
        assert!(!tracker.register(BTN_LEFT, TITLE, 0, 500));
        assert!(!tracker.register(BTN_LEFT, other, 50, 500));
        assert!(!tracker.register(BTN_RIGHT, other, 100, 500));
        assert!(tracker.register(BTN_RIGHT, other, 150, 500));
    }
}
