//! Quantizes raw scroll deltas into the unit steps scroll bindings fire on.

use crate::constants::{CONTINUOUS_STEP, DISCRETE_STEP};
use crate::cursor::AxisOrientation;
use crate::mousebind::Direction;

/// Outcome of feeding one axis event to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    /// Direction from the sign of the raw delta; `None` for a zero delta.
    pub direction: Option<Direction>,
    /// Whether enough scroll accumulated to fire bound actions.
    pub run_action: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisRemainder {
    discrete: f64,
    continuous: f64,
}

/// Running remainders, one pair per axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollAccumulator {
    horizontal: AxisRemainder,
    vertical: AxisRemainder,
}

impl ScrollAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one axis event. Discrete deltas (in 1/120 wheel clicks) take
    /// precedence when non-zero; a zero continuous delta ends the gesture and
    /// clears the remainder.
    pub fn accumulate(
        &mut self,
        orientation: AxisOrientation,
        delta: f64,
        delta_discrete: f64,
    ) -> ScrollStep {
        let axis = match orientation {
            AxisOrientation::Horizontal => &mut self.horizontal,
            AxisOrientation::Vertical => &mut self.vertical,
        };

        let mut run_action = false;
        if delta_discrete != 0.0 {
            axis.discrete += delta_discrete;
            if axis.discrete.abs() >= DISCRETE_STEP {
                axis.discrete %= DISCRETE_STEP;
                run_action = true;
            }
        } else if delta == 0.0 {
            axis.continuous = 0.0;
        } else {
            axis.continuous += delta;
            if axis.continuous.abs() >= CONTINUOUS_STEP {
                axis.continuous %= CONTINUOUS_STEP;
                run_action = true;
            }
        }

        let direction = if delta == 0.0 && delta_discrete == 0.0 {
            None
        } else {
            let negative = if delta_discrete != 0.0 {
                delta_discrete < 0.0
            } else {
                delta < 0.0
            };
            Some(match (orientation, negative) {
                (AxisOrientation::Horizontal, true) => Direction::Left,
                (AxisOrientation::Horizontal, false) => Direction::Right,
                (AxisOrientation::Vertical, true) => Direction::Up,
                (AxisOrientation::Vertical, false) => Direction::Down,
            })
        };

        ScrollStep {
            direction,
            run_action,
        }
    }

    /// Remaining (discrete, continuous) scroll on an axis.
    pub fn remainder(&self, orientation: AxisOrientation) -> (f64, f64) {
        let axis = match orientation {
            AxisOrientation::Horizontal => &self.horizontal,
            AxisOrientation::Vertical => &self.vertical,
        };
        (axis.discrete, axis.continuous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(acc: &mut ScrollAccumulator, n: usize, discrete: f64) -> usize {
        (0..n)
            .filter(|_| {
                acc.accumulate(AxisOrientation::Vertical, discrete / 8.0, discrete)
                    .run_action
            })
            .count()
    }

    #[test]
    fn four_quarter_clicks_make_one_unit() {
        let mut acc = ScrollAccumulator::new();
        assert_eq!(feed(&mut acc, 4, 30.0), 1);
        assert_eq!(acc.remainder(AxisOrientation::Vertical).0, 0.0);
    }

    #[test]
    fn five_quarter_clicks_leave_a_remainder() {
        let mut acc = ScrollAccumulator::new();
        assert_eq!(feed(&mut acc, 5, 30.0), 1);
        assert_eq!(acc.remainder(AxisOrientation::Vertical).0, 30.0);
    }

    #[test]
    fn continuous_scroll_resets_on_zero() {
        let mut acc = ScrollAccumulator::new();
        let step = acc.accumulate(AxisOrientation::Horizontal, -6.0, 0.0);
        assert!(!step.run_action);
        assert_eq!(step.direction, Some(Direction::Left));
        let end = acc.accumulate(AxisOrientation::Horizontal, 0.0, 0.0);
        assert!(!end.run_action);
        assert_eq!(end.direction, None);
        assert_eq!(acc.remainder(AxisOrientation::Horizontal), (0.0, 0.0));
        assert!(!acc.accumulate(AxisOrientation::Horizontal, -6.0, 0.0).run_action);
        assert!(acc.accumulate(AxisOrientation::Horizontal, -6.0, 0.0).run_action);
        assert_eq!(acc.remainder(AxisOrientation::Horizontal).1, -2.0);
    }

    #[test]
    fn axes_accumulate_independently() {
        let mut acc = ScrollAccumulator::new();
        acc.accumulate(AxisOrientation::Vertical, 0.0, 90.0);
        let step = acc.accumulate(AxisOrientation::Horizontal, 0.0, 90.0);
        assert!(!step.run_action);
        assert_eq!(step.direction, Some(Direction::Right));
        let back = acc.accumulate(AxisOrientation::Vertical, 0.0, -30.0);
        assert!(!back.run_action);
        assert_eq!(back.direction, Some(Direction::Up));
        let down = acc.accumulate(AxisOrientation::Vertical, 0.0, 60.0);
        assert!(down.run_action);
        assert_eq!(down.direction, Some(Direction::Down));
    }
}
