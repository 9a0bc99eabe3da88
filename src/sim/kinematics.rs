//! Car motion, fuel burn and moving-platform transfer
//!
//! Plain Euler integration; `dt` is in seconds.

use glam::Vec2;

use super::state::{ArtCar, CarState, Player};
use crate::consts::ARRIVAL_RADIUS;
use crate::Aabb;

/// Burn `rate` fuel per second, never dropping below empty
pub fn consume_fuel(car: ArtCar, rate: f32, dt: f32) -> ArtCar {
    let fuel = car.fuel - rate * dt;
    car.with_fuel(fuel)
}

/// Point a seeking car at `target` at constant `speed`
///
/// Only `SeekFuel` cars steer. Within [`ARRIVAL_RADIUS`] of the target the
/// velocity is left as is.
pub fn steer(car: ArtCar, target: Option<Vec2>, speed: f32) -> ArtCar {
    let Some(target) = target else {
        return car;
    };
    if car.state != CarState::SeekFuel {
        return car;
    }

    let to_target = target - car.pos;
    let dist = to_target.length();
    if dist <= ARRIVAL_RADIUS {
        return car;
    }

    ArtCar {
        vel: to_target / dist * speed,
        ..car
    }
}

/// Advance position (and the deck with it) by `vel * dt`
pub fn integrate_car(car: ArtCar, dt: f32) -> ArtCar {
    let delta = car.vel * dt;
    ArtCar {
        pos: car.pos + delta,
        platform_aabb: car.platform_aabb.translated(delta),
        ..car
    }
}

/// Box around the player used for platform checks
pub fn player_box(player: &Player, size: f32) -> Aabb {
    Aabb::centered_on(player.pos, size, size)
}

/// Carry a player standing on `car`'s deck along with the car's motion
///
/// The player inherits the car's displacement for this step, not its
/// position. A player whose box misses the deck stays put.
pub fn carry_on_platform(player: Player, car: &ArtCar, box_size: f32, dt: f32) -> Player {
    if !player_box(&player, box_size).overlaps(&car.platform_aabb) {
        return player;
    }
    Player {
        pos: player.pos + car.vel * dt,
        ..player
    }
}

/// Apply held-key movement for one step
pub fn move_player(player: Player, direction: Vec2, speed: f32, dt: f32) -> Player {
    let vel = direction.normalize_or_zero() * speed;
    Player {
        vel,
        pos: player.pos + vel * dt,
        ..player
    }
}
