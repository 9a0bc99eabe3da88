//! Player interactions: pickup, mount/dismount, fuel delivery and drop
//!
//! Every operation takes the entities it touches by value and returns them in
//! an outcome struct with a success flag. A failed action hands its inputs
//! back untouched.

use super::state::{ArtCar, Bike, GasCan, HeldItem, Player};
use crate::nearest_by;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct PickupOutcome {
    pub picked: bool,
    pub player: Player,
    pub cans: Vec<GasCan>,
    pub picked_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountOutcome {
    pub mounted: bool,
    pub player: Player,
    pub art_car_id: Option<String>,
    pub bike_left: Option<Bike>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliverOutcome {
    pub delivered: bool,
    pub fuel_added: f32,
    pub karma_gained: u32,
    pub player: Player,
    pub car: ArtCar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub dropped: bool,
    pub player: Player,
    pub cans: Vec<GasCan>,
    pub dropped_id: Option<String>,
}

/// Pick up the nearest ground can within `range`
///
/// No-op while the player already holds something.
pub fn try_pickup_gas_can(player: Player, mut cans: Vec<GasCan>, range: f32) -> PickupOutcome {
    let unchanged = |player, cans| PickupOutcome {
        picked: false,
        player,
        cans,
        picked_id: None,
    };

    if player.holding.is_some() {
        return unchanged(player, cans);
    }

    let nearest = nearest_by(
        cans.iter().enumerate().filter(|(_, c)| !c.active),
        player.pos,
        |c| c.pos,
    );
    let Some((idx, dist)) = nearest else {
        return unchanged(player, cans);
    };
    if dist > range {
        return unchanged(player, cans);
    }

    let can = &mut cans[idx];
    can.active = true;
    let id = can.id.clone();
    log::debug!("Player {} picked up {} ({:.1} away)", player.id, id, dist);

    PickupOutcome {
        picked: true,
        player: Player {
            holding: Some(HeldItem::gas_can(id.clone())),
            ..player
        },
        cans,
        picked_id: Some(id),
    }
}

/// Climb aboard the strictly-nearest car within `range`, leaving the bike behind
///
/// Blocked while holding a can or already riding. The player's position is
/// not changed by mounting.
pub fn try_mount_art_car(player: Player, cars: &[ArtCar], range: f32) -> MountOutcome {
    let unchanged = |player| MountOutcome {
        mounted: false,
        player,
        art_car_id: None,
        bike_left: None,
    };

    if player.holding.is_some() || player.is_mounted() {
        return unchanged(player);
    }

    let nearest = nearest_by(
        cars.iter().enumerate().filter(|(_, c)| c.pos.distance(player.pos) <= range),
        player.pos,
        |c| c.pos,
    );
    let Some((idx, _)) = nearest else {
        return unchanged(player);
    };

    let car_id = cars[idx].id.clone();
    let bike = Bike { pos: player.pos };
    log::info!("Player {} mounted {}", player.id, car_id);

    MountOutcome {
        mounted: true,
        player: Player {
            mounted_on: Some(car_id.clone()),
            bike: Some(bike),
            ..player
        },
        art_car_id: Some(car_id),
        bike_left: Some(bike),
    }
}

/// Step off the car; the caller decides where the player ends up
pub fn dismount(player: Player) -> Player {
    if !player.is_mounted() {
        return player;
    }
    log::info!("Player {} dismounted", player.id);
    Player {
        mounted_on: None,
        bike: None,
        ..player
    }
}

/// Hand the held can to `car`: full refill plus a karma reward
///
/// The refill replaces the car's fuel with `tuning.refill_fuel` rather than
/// adding to it.
pub fn deliver_gas_to_art_car(player: Player, car: ArtCar, tuning: &Tuning) -> DeliverOutcome {
    let in_range = player.pos.distance(car.pos) <= tuning.deliver_range;
    if player.held_can().is_none() || !in_range {
        return DeliverOutcome {
            delivered: false,
            fuel_added: 0.0,
            karma_gained: 0,
            player,
            car,
        };
    }

    let before = car.fuel;
    let car = car.with_fuel(tuning.refill_fuel);
    let fuel_added = car.fuel - before;
    let karma = player.karma.saturating_add(tuning.delivery_karma);
    log::info!(
        "Player {} fueled {} (+{:.1} fuel, +{} karma)",
        player.id,
        car.id,
        fuel_added,
        tuning.delivery_karma
    );

    DeliverOutcome {
        delivered: true,
        fuel_added,
        karma_gained: tuning.delivery_karma,
        player: Player {
            holding: None,
            karma,
            ..player
        },
        car,
    }
}

/// Put the held can back on the ground at the player's feet
///
/// The station cap only limits spawning: dropping inside a station rectangle
/// can leave more ground cans there than `max_cans`.
///
/// A held id missing from `cans` is a broken reference: the hold is cleared,
/// nothing is dropped, and a warning is logged.
pub fn drop_gas_can(player: Player, mut cans: Vec<GasCan>) -> DropOutcome {
    let Some(held) = player.held_can().map(str::to_owned) else {
        return DropOutcome {
            dropped: false,
            player,
            cans,
            dropped_id: None,
        };
    };

    let Some(can) = cans.iter_mut().find(|c| c.id == held) else {
        log::warn!("Player {} held unknown can {}, clearing hold", player.id, held);
        return DropOutcome {
            dropped: false,
            player: Player {
                holding: None,
                ..player
            },
            cans,
            dropped_id: None,
        };
    };

    can.active = false;
    can.pos = player.pos;
    log::debug!("Player {} dropped {}", player.id, held);

    DropOutcome {
        dropped: true,
        player: Player {
            holding: None,
            ..player
        },
        cans,
        dropped_id: Some(held),
    }
}
