//! Hell Station - a playa fuel-runner game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, actions, art-car AI, kinematics)
//! - `platform`: Browser/native platform abstraction (clock, keyboard)
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Fixed simulation constants (not data-driven)
pub mod consts {
    /// Largest frame delta fed to kinematics (seconds), prevents tunneling after a stall
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Fraction of `fuel_max` at which a car resumes patrolling
    pub const PATROL_RESUME_FRACTION: f32 = 0.8;

    /// Cars within this distance of their target keep their current velocity
    pub const ARRIVAL_RADIUS: f32 = 5.0;
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered_on(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive on all four edges
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    /// Standard 2D intersection: the x ranges and the y ranges must both overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }
}

/// Index of the element nearest to `origin`, first encountered wins ties
pub fn nearest_by<'a, T, I>(
    items: I,
    origin: Vec2,
    pos: impl Fn(&T) -> Vec2,
) -> Option<(usize, f32)>
where
    T: 'a,
    I: IntoIterator<Item = (usize, &'a T)>,
{
    let mut best: Option<(usize, f32)> = None;
    for (idx, item) in items {
        let dist = origin.distance(pos(item));
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best
}
