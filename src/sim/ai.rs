//! Art car decision making
//!
//! Fuel level drives a small state machine with a hysteresis band between
//! the low threshold and the patrol-resume mark. Target selection runs
//! independently; callers only steer toward it while seeking fuel.

use glam::Vec2;

use super::state::{ArtCar, CarState, GasCan, HellStation, Player};
use crate::consts::PATROL_RESUME_FRACTION;
use crate::nearest_by;

/// A car's state and steering target for this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiDecision {
    pub state: CarState,
    pub target: Vec2,
}

/// Next behavioral state from the current fuel level
pub fn decide_state(car: &ArtCar) -> CarState {
    if car.fuel <= car.fuel_low_threshold {
        return CarState::SeekFuel;
    }
    if car.fuel >= PATROL_RESUME_FRACTION * car.fuel_max {
        return CarState::Patrol;
    }
    // Inside the band: hold whatever we were doing
    match car.state {
        CarState::Patrol => CarState::Patrol,
        CarState::SeekFuel => CarState::SeekFuel,
        CarState::Refueling => CarState::Refueling,
        CarState::Idle => CarState::Idle,
    }
}

/// Where the car would head for fuel
///
/// A nearby player carrying a can wins, then the nearest ground can, then the
/// middle of the station.
pub fn choose_target(
    car: &ArtCar,
    player: &Player,
    cans: &[GasCan],
    station: &HellStation,
    perception_radius: f32,
) -> Vec2 {
    if player.held_can().is_some() && player.pos.distance(car.pos) <= perception_radius {
        return player.pos;
    }

    nearest_by(
        cans.iter().enumerate().filter(|(_, c)| !c.active),
        car.pos,
        |c| c.pos,
    )
    .map(|(idx, _)| cans[idx].pos)
    .unwrap_or_else(|| station.aabb.center())
}

pub fn decide(
    car: &ArtCar,
    player: &Player,
    cans: &[GasCan],
    station: &HellStation,
    perception_radius: f32,
) -> AiDecision {
    AiDecision {
        state: decide_state(car),
        target: choose_target(car, player, cans, station, perception_radius),
    }
}
