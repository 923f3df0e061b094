#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Headless model of the two-row tech-stack ticker.
//!
//! Each row drifts at a constant speed and wraps modulo the width of one
//! copy of its content. Pointer movement pushes a row (smoothed, clamped
//! velocity that eases back to the drift); touch input drags it directly
//! and leaves momentum that decays by friction.

pub mod row;

use serde::{Deserialize, Serialize};

pub use row::{Direction, MarqueeRow};

/// The technologies shown in the ticker, in display order.
pub const TECHNOLOGIES: [&str; 12] = [
    "Next.js",
    "TypeScript",
    "Tailwind CSS",
    "Supabase",
    "PostgreSQL",
    "Mistral AI",
    "Framer Motion",
    "Node.js",
    "React",
    "Vercel",
    "PostGIS",
    "Claude AI",
];

/// Motion tuning. Speeds are in pixels per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// Seconds one content block takes to scroll past at rest.
    pub cycle_secs: f64,
    /// Frames per second the simulation assumes.
    pub fps: f64,
    /// Width of one item, in pixels.
    pub item_width: f64,
    /// Gap between items, in pixels.
    pub gap: f64,
    /// Weight of each new pointer delta in the smoothed push speed.
    pub smoothing: f64,
    /// Per-frame easing from a pushed speed back to the drift.
    pub decay: f64,
    /// Maximum speed as a multiple of the drift speed.
    pub max_speed_factor: f64,
    /// Per-frame momentum retained after a touch release.
    pub friction: f64,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            cycle_secs: 30.0,
            fps: 60.0,
            item_width: 180.0,
            gap: 32.0,
            smoothing: 0.15,
            decay: 0.05,
            max_speed_factor: 8.0,
            friction: 0.95,
        }
    }
}

impl MarqueeConfig {
    /// Width of one copy of `items` items.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn block_width(&self, items: usize) -> f64 {
        items as f64 * (self.item_width + self.gap)
    }

    /// Drift speed that scrolls one block per cycle.
    #[must_use]
    pub fn base_speed(&self, block_width: f64) -> f64 {
        let frames = self.cycle_secs * self.fps;
        if frames > 0.0 { block_width / frames } else { 0.0 }
    }
}

/// Both ticker rows. The top row drifts left, the bottom row right.
#[derive(Debug, Clone)]
pub struct Marquee {
    rows: [MarqueeRow; 2],
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new(MarqueeConfig::default())
    }
}

impl Marquee {
    #[must_use]
    pub fn new(config: MarqueeConfig) -> Self {
        Self {
            rows: [
                MarqueeRow::new(Direction::Left, &TECHNOLOGIES, config),
                MarqueeRow::new(Direction::Right, &TECHNOLOGIES, config),
            ],
        }
    }

    /// Advances both rows one frame.
    pub fn tick(&mut self) {
        for row in &mut self.rows {
            row.tick();
        }
    }

    #[must_use]
    pub const fn rows(&self) -> &[MarqueeRow; 2] {
        &self.rows
    }

    /// Row `index` (0 = top), for routing pointer and touch input.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut MarqueeRow> {
        self.rows.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_drift_in_opposite_directions() {
        let mut marquee = Marquee::default();
        marquee.tick();
        let [top, bottom] = marquee.rows();
        assert_eq!(top.direction(), Direction::Left);
        assert_eq!(bottom.direction(), Direction::Right);
        assert!(top.speed() < 0.0 && bottom.speed() > 0.0);
        assert!((top.offset() + bottom.offset() - top.block_width()).abs() < 1e-9);
    }

    #[test]
    fn one_cycle_returns_to_start() {
        let config = MarqueeConfig::default();
        let mut marquee = Marquee::new(config);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frames = (config.cycle_secs * config.fps) as usize;
        for _ in 0..frames {
            marquee.tick();
        }
        for row in marquee.rows() {
            let offset = row.offset();
            assert!(offset < 1e-6 || row.block_width() - offset < 1e-6, "offset {offset}");
        }
    }

    #[test]
    fn input_routes_to_single_row() {
        let mut marquee = Marquee::default();
        marquee.row_mut(1).unwrap().push(20.0);
        let [top, bottom] = marquee.rows();
        assert!(bottom.speed() > top.speed().abs());
        assert!(marquee.row_mut(2).is_none());
    }

    #[test]
    fn base_speed_covers_one_block_per_cycle() {
        let config = MarqueeConfig::default();
        let width = config.block_width(TECHNOLOGIES.len());
        assert!((width - 2544.0).abs() < f64::EPSILON);
        assert!((config.base_speed(width) * 1800.0 - width).abs() < 1e-9);
    }
}
