//! Per-frame motion of a single marquee row.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::MarqueeConfig;

/// Drift direction of a row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Content moves towards negative x.
    Left,
    /// Content moves towards positive x.
    Right,
}

impl Direction {
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    /// Constant drift, or easing back to it after a push.
    Drift,
    /// Finger down; position follows the finger.
    Drag { last_x: f64, velocity: f64 },
    /// Finger released; momentum decays by friction.
    Coast,
}

/// One row of duplicated content scrolling with wrap-around.
#[derive(Debug, Clone)]
pub struct MarqueeRow {
    direction: Direction,
    items: Vec<&'static str>,
    block_width: f64,
    position: f64,
    speed: f64,
    motion: Motion,
    config: MarqueeConfig,
}

impl MarqueeRow {
    /// Creates a row at rest position 0, drifting at base speed.
    ///
    /// `items` is one copy of the content; the row stores it twice so the
    /// wrap point is invisible.
    #[must_use]
    pub fn new(direction: Direction, items: &[&'static str], config: MarqueeConfig) -> Self {
        let block_width = config.block_width(items.len());
        let mut doubled = items.to_vec();
        doubled.extend_from_slice(items);

        Self {
            direction,
            items: doubled,
            block_width,
            position: 0.0,
            speed: config.base_speed(block_width) * direction.sign(),
            motion: Motion::Drift,
            config,
        }
    }

    fn drift_speed(&self) -> f64 {
        self.config.base_speed(self.block_width) * self.direction.sign()
    }

    fn max_speed(&self) -> f64 {
        self.config.base_speed(self.block_width) * self.config.max_speed_factor
    }

    fn wrap(&self, position: f64) -> f64 {
        if self.block_width <= 0.0 {
            return 0.0;
        }
        let wrapped = position.rem_euclid(self.block_width);
        // rem_euclid can round up to the divisor for tiny negative input
        if wrapped >= self.block_width { 0.0 } else { wrapped }
    }

    /// Feeds a pointer movement of `dx` pixels since the last frame.
    /// Speed follows the pointer with exponential smoothing, clamped.
    pub fn push(&mut self, dx: f64) {
        if !dx.is_finite() || matches!(self.motion, Motion::Drag { .. }) {
            return;
        }
        let max = self.max_speed();
        self.speed = (self.speed + (dx - self.speed) * self.config.smoothing).clamp(-max, max);
        self.motion = Motion::Drift;
    }

    pub fn touch_start(&mut self, x: f64) {
        self.motion = Motion::Drag {
            last_x: x,
            velocity: 0.0,
        };
    }

    /// Moves the row with the finger.
    pub fn touch_move(&mut self, x: f64) {
        if let Motion::Drag { last_x, .. } = self.motion {
            let dx = x - last_x;
            self.position = self.wrap(self.position + dx);
            self.motion = Motion::Drag { last_x: x, velocity: dx };
        }
    }

    /// Releases the finger; the last drag velocity becomes momentum.
    pub fn touch_end(&mut self) {
        if let Motion::Drag { velocity, .. } = self.motion {
            let max = self.max_speed();
            self.speed = velocity.clamp(-max, max);
            self.motion = Motion::Coast;
            log::trace!("Marquee release at {:.2} px/frame", self.speed);
        }
    }

    /// Advances one animation frame.
    pub fn tick(&mut self) {
        let drift = self.drift_speed();

        match self.motion {
            Motion::Drag { .. } => return,
            Motion::Coast => {
                self.speed *= self.config.friction;
                if self.speed.abs() < drift.abs() {
                    self.speed = drift;
                    self.motion = Motion::Drift;
                }
            }
            Motion::Drift => {
                self.speed += (drift - self.speed) * self.config.decay;
            }
        }

        self.position = self.wrap(self.position + self.speed);
    }

    /// Horizontal offset in `[0, block_width)`.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.position
    }

    /// Current signed speed in pixels per frame.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether a finger is down on this row.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.motion, Motion::Drag { .. })
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Width of one copy of the content.
    #[must_use]
    pub const fn block_width(&self) -> f64 {
        self.block_width
    }

    /// The rendered items, content repeated twice.
    #[must_use]
    pub fn items(&self) -> &[&'static str] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TECHNOLOGIES;

    fn row(direction: Direction) -> MarqueeRow {
        MarqueeRow::new(direction, &TECHNOLOGIES, MarqueeConfig::default())
    }

    #[test]
    fn items_are_duplicated() {
        let row = row(Direction::Left);
        assert_eq!(row.items().len(), 24);
        assert_eq!(row.items()[0], row.items()[12]);
    }

    #[test]
    fn drift_wraps_within_block() {
        let mut left = row(Direction::Left);
        let mut right = row(Direction::Right);
        for _ in 0..10_000 {
            left.tick();
            right.tick();
            assert!((0.0..left.block_width()).contains(&left.offset()));
            assert!((0.0..right.block_width()).contains(&right.offset()));
        }
        assert!(left.speed() < 0.0);
        assert!(right.speed() > 0.0);
    }

    #[test]
    fn push_is_smoothed_and_clamped() {
        let mut row = row(Direction::Left);
        let base = row.speed();

        row.push(10.0);
        let expected = base + (10.0 - base) * 0.15;
        assert!((row.speed() - expected).abs() < 1e-9);

        for _ in 0..1000 {
            row.push(10_000.0);
        }
        let max = MarqueeConfig::default().base_speed(row.block_width()) * 8.0;
        assert!((row.speed() - max).abs() < 1e-9);
    }

    #[test]
    fn push_decays_back_to_drift() {
        let mut row = row(Direction::Right);
        let base = row.speed();
        for _ in 0..20 {
            row.push(-40.0);
        }
        assert!(row.speed() < 0.0);

        for _ in 0..2000 {
            row.tick();
        }
        assert!((row.speed() - base).abs() < 1e-6);
    }

    #[test]
    fn drag_follows_finger_then_coasts() {
        let mut row = row(Direction::Left);
        row.touch_start(100.0);
        row.touch_move(120.0);
        row.touch_move(128.0);
        assert!(row.is_dragging());
        assert!((row.offset() - 28.0).abs() < 1e-9);

        row.tick();
        assert!((row.offset() - 28.0).abs() < 1e-9, "tick must not move a dragged row");

        row.touch_end();
        assert!(!row.is_dragging());
        let released = row.speed();
        assert!((released - 8.0).abs() < 1e-9);

        row.tick();
        assert!((row.speed() - released * 0.95).abs() < 1e-9);

        let base = MarqueeConfig::default().base_speed(row.block_width());
        for _ in 0..500 {
            row.tick();
        }
        assert!((row.speed() + base).abs() < 1e-6, "momentum should settle into leftward drift");
    }

    #[test]
    fn non_finite_push_is_ignored() {
        let mut row = row(Direction::Left);
        let before = row.speed();
        row.push(f64::NAN);
        assert!((row.speed() - before).abs() < f64::EPSILON);
    }
}
