//! One simulation step
//!
//! Order within a tick is fixed: station spawn, player movement, player
//! actions, art car fuel/AI, then kinematics. AI reads the cans and player as
//! left by the action phase, and kinematics sees the freshly decided states.

use glam::Vec2;

use super::actions::{
    deliver_gas_to_art_car, dismount, drop_gas_can, try_mount_art_car, try_pickup_gas_can,
};
use super::ai;
use super::kinematics::{carry_on_platform, consume_fuel, integrate_car, move_player, steer};
use super::rng::RandomSource;
use super::spawner;
use super::state::{ArtCar, CarState, World};
use crate::consts::MAX_FRAME_DT;
use crate::nearest_by;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held movement direction (unnormalized, zero when idle)
    pub move_dir: Vec2,
    /// Mount the nearest car, or dismount if riding
    pub toggle_mount: bool,
    /// Deliver to the nearest car, or drop the can if none is close enough
    pub deliver_or_drop: bool,
}

/// Something noteworthy that happened during a tick (for HUD/audio)
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    CanSpawned { id: String },
    CanPicked { id: String },
    CanDropped { id: String },
    Mounted { car_id: String },
    Dismounted { car_id: String },
    Delivered { car_id: String, can_id: String, karma: u32 },
    CarStateChanged { car_id: String, from: CarState, to: CarState },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub world: World,
    pub events: Vec<SimEvent>,
}

/// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DT]`
fn frame_dt(last: Option<f64>, now_ms: f64) -> f32 {
    match last {
        Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
        None => 0.0,
    }
}

/// Advance the world to `now_ms`
pub fn tick<R: RandomSource>(
    world: World,
    input: &TickInput,
    now_ms: f64,
    rng: &mut R,
) -> TickOutcome {
    let mut events = Vec::new();
    let dt = frame_dt(world.last_tick_at, now_ms);
    let World {
        station,
        cans,
        player,
        cars,
        tuning,
        pickup_blocked_until,
        ..
    } = world;
    let mut pickup_blocked_until = pickup_blocked_until;

    // --- SPAWN ---
    let spawned = spawner::tick(station, cans, now_ms, rng);
    let station = spawned.station;
    let mut cans = spawned.cans;
    if let Some(id) = spawned.spawned {
        events.push(SimEvent::CanSpawned { id });
    }

    // --- PLAYER MOVEMENT ---
    let mut player = move_player(player, input.move_dir, tuning.player_speed, dt);
    let mut cars = cars;

    // Mounted reference must name a live car
    if let Some(car_id) = player.mounted_on.clone() {
        if !cars.iter().any(|c| c.id == car_id) {
            log::warn!("Player {} rode missing car {}, dismounting", player.id, car_id);
            player = dismount(player);
            events.push(SimEvent::Dismounted { car_id });
        }
    }

    // --- ACTIONS ---
    if input.toggle_mount {
        if let Some(car_id) = player.mounted_on.clone() {
            player = dismount(player);
            events.push(SimEvent::Dismounted { car_id });
        } else {
            let out = try_mount_art_car(player, &cars, tuning.mount_range);
            player = out.player;
            if let Some(car_id) = out.art_car_id {
                events.push(SimEvent::Mounted { car_id });
            }
        }
    }

    if input.deliver_or_drop {
        let nearest =
            nearest_by(cars.iter().enumerate(), player.pos, |c| c.pos).map(|(idx, _)| idx);
        let can_id = player.held_can().map(str::to_owned);
        let mut delivered = false;

        if let (Some(idx), Some(can_id)) = (nearest, can_id) {
            let car = cars.remove(idx);
            let out = deliver_gas_to_art_car(player, car, &tuning);
            cars.insert(idx, out.car);
            player = out.player;
            if out.delivered {
                delivered = true;
                events.push(SimEvent::Delivered {
                    car_id: cars[idx].id.clone(),
                    can_id,
                    karma: out.karma_gained,
                });
            }
        }

        if !delivered {
            let out = drop_gas_can(player, cans);
            player = out.player;
            cans = out.cans;
            if let Some(id) = out.dropped_id {
                pickup_blocked_until = now_ms + tuning.drop_pickup_cooldown_ms;
                events.push(SimEvent::CanDropped { id });
            }
        }
    }

    if now_ms >= pickup_blocked_until {
        let out = try_pickup_gas_can(player, cans, tuning.pickup_range);
        player = out.player;
        cans = out.cans;
        if let Some(id) = out.picked_id {
            events.push(SimEvent::CanPicked { id });
        }
    }

    // --- ART CAR FUEL + AI ---
    let cars: Vec<_> = cars
        .into_iter()
        .map(|car| {
            let car = consume_fuel(car, tuning.fuel_burn_per_sec, dt);
            let decision = ai::decide(&car, &player, &cans, &station, tuning.ai_perception_radius);
            if decision.state != car.state {
                log::info!(
                    "Car {}: {:?} -> {:?} (fuel {:.1})",
                    car.id,
                    car.state,
                    decision.state,
                    car.fuel
                );
                events.push(SimEvent::CarStateChanged {
                    car_id: car.id.clone(),
                    from: car.state,
                    to: decision.state,
                });
            }
            let car = ArtCar {
                state: decision.state,
                ..car
            };
            steer(car, Some(decision.target), tuning.seek_speed)
        })
        .collect();

    // --- KINEMATICS ---
    let ridden = player.mounted_on.as_deref().and_then(|id| cars.iter().find(|c| c.id == id));
    if let Some(car) = ridden {
        player = carry_on_platform(player, car, tuning.player_box_size, dt);
    }
    let cars = cars.into_iter().map(|car| integrate_car(car, dt)).collect();

    TickOutcome {
        world: World {
            station,
            cans,
            player,
            cars,
            tuning,
            last_tick_at: Some(now_ms),
            pickup_blocked_until,
        },
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Aabb;
    use crate::sim::rng::SimRng;
    use crate::sim::state::{ArtCar, GasCan, HellStation, HeldItem, Player};
    use crate::tuning::Tuning;

    fn world_with_car(car_pos: Vec2, player_pos: Vec2) -> World {
        let tuning = Tuning::default();
        let station = HellStation::new("hs", Aabb::new(100.0, 100.0, 200.0, 100.0), 1000, 3);
        let car = ArtCar::spawn("car-0", car_pos, &mut SimRng::new(4), &tuning);
        let car = ArtCar { vel: Vec2::ZERO, ..car };
        World::new(station, Player::new("player", player_pos), vec![car], tuning)
    }

    #[test]
    fn test_seeking_car_targets_can_spawned_this_tick() {
        let car_pos = Vec2::new(0.0, 500.0);
        let mut world = world_with_car(car_pos, Vec2::new(-1000.0, -1000.0));
        world.cars[0].fuel = 5.0;
        let mut rng = SimRng::new(11);

        let out = tick(world, &TickInput::default(), 1000.0, &mut rng);
        assert!(out.events.contains(&SimEvent::CanSpawned { id: "hs-1".into() }));
        assert!(out.world.player.holding.is_none());

        let can = &out.world.cans[0];
        assert!(!can.active);
        let car = &out.world.cars[0];
        assert_eq!(car.state, CarState::SeekFuel);
        // First tick has dt = 0, so the car has not moved off its spawn point
        assert_eq!(car.pos, car_pos);

        let seek_speed = out.world.tuning.seek_speed;
        let toward_can = (can.pos - car_pos).normalize() * seek_speed;
        let toward_station = (out.world.station.aabb.center() - car_pos).normalize() * seek_speed;
        assert!(car.vel.abs_diff_eq(toward_can, 1e-3));
        assert!(!toward_can.abs_diff_eq(toward_station, 1e-3));
    }

    #[test]
    fn test_first_tick_has_zero_dt() {
        assert_eq!(frame_dt(None, 5000.0), 0.0);
        assert_eq!(frame_dt(Some(5000.0), 4000.0), 0.0);
        assert_eq!(frame_dt(Some(0.0), 50.0), 0.05);
        assert_eq!(frame_dt(Some(0.0), 10_000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_spawn_then_proximity_pickup() {
        let mut world = world_with_car(Vec2::new(-1000.0, -1000.0), Vec2::new(200.0, 150.0));
        world.tuning.pickup_range = 500.0;
        let mut rng = SimRng::new(1);
        let out = tick(world, &TickInput::default(), 1000.0, &mut rng);
        assert!(out.events.contains(&SimEvent::CanSpawned { id: "hs-1".into() }));
        assert!(out.events.contains(&SimEvent::CanPicked { id: "hs-1".into() }));
        assert_eq!(out.world.player.held_can(), Some("hs-1"));
        assert!(out.world.cans[0].active);
    }

    #[test]
    fn test_toggle_mount_then_dismount() {
        let world = world_with_car(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        let mut rng = SimRng::new(2);
        let input = TickInput {
            toggle_mount: true,
            ..Default::default()
        };
        let out = tick(world, &input, 16.0, &mut rng);
        assert_eq!(out.world.player.mounted_on.as_deref(), Some("car-0"));
        assert_eq!(out.events, vec![SimEvent::Mounted { car_id: "car-0".into() }]);

        let out = tick(out.world, &input, 32.0, &mut rng);
        assert!(out.world.player.mounted_on.is_none());
        assert!(out.world.player.bike.is_none());
    }

    #[test]
    fn test_deliver_to_nearest_car() {
        let mut world = world_with_car(Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0));
        world.cars[0].fuel = 0.0;
        let mut can = GasCan::on_ground("can-9", Vec2::new(20.0, 0.0));
        can.active = true;
        world.cans.push(can);
        world.player.holding = Some(HeldItem::gas_can("can-9"));

        let input = TickInput {
            deliver_or_drop: true,
            ..Default::default()
        };
        let out = tick(world, &input, 16.0, &mut SimRng::new(3));
        let tuning = &out.world.tuning;
        assert!(out.world.player.holding.is_none());
        assert_eq!(out.world.player.karma, tuning.delivery_karma);
        assert_eq!(out.world.cars[0].fuel, tuning.refill_fuel);
        assert!(
            out.events
                .iter()
                .any(|e| matches!(e, SimEvent::Delivered { can_id, .. } if can_id == "can-9"))
        );
        // Fuel is full again, so the car is patrolling
        assert_eq!(out.world.cars[0].state, CarState::Patrol);
    }

    #[test]
    fn test_drop_when_no_car_in_range_blocks_repickup() {
        let mut world = world_with_car(Vec2::new(-1000.0, 0.0), Vec2::new(0.0, 0.0));
        let mut can = GasCan::on_ground("can-1", Vec2::ZERO);
        can.active = true;
        world.cans.push(can);
        world.player.holding = Some(HeldItem::gas_can("can-1"));
        let mut rng = SimRng::new(5);

        let drop = TickInput {
            deliver_or_drop: true,
            ..Default::default()
        };
        let out = tick(world, &drop, 100.0, &mut rng);
        assert!(out.events.contains(&SimEvent::CanDropped { id: "can-1".into() }));
        assert!(out.world.player.holding.is_none());

        let out = tick(out.world, &TickInput::default(), 600.0, &mut rng);
        assert!(out.world.player.holding.is_none());

        let out = tick(out.world, &TickInput::default(), 1100.0, &mut rng);
        assert_eq!(out.world.player.held_can(), Some("can-1"));
    }

    #[test]
    fn test_drop_can_overfill_station() {
        let player_pos = Vec2::new(250.0, 180.0);
        let mut world = world_with_car(Vec2::new(-1000.0, 0.0), player_pos);
        for (i, x) in [120.0, 140.0, 160.0].into_iter().enumerate() {
            world.cans.push(GasCan::on_ground(format!("can-{i}"), Vec2::new(x, 120.0)));
        }
        let mut held = GasCan::on_ground("can-3", player_pos);
        held.active = true;
        world.cans.push(held);
        world.player.holding = Some(HeldItem::gas_can("can-3"));
        let mut rng = SimRng::new(8);

        let drop = TickInput {
            deliver_or_drop: true,
            ..Default::default()
        };
        let out = tick(world, &drop, 500.0, &mut rng);
        assert!(out.events.contains(&SimEvent::CanDropped { id: "can-3".into() }));
        assert_eq!(out.world.ground_cans_at_station(), 4);
        assert!(out.world.ground_cans_at_station() > out.world.station.max_cans);

        // Over the cap, so the next due spawn is skipped
        let out = tick(out.world, &TickInput::default(), 1000.0, &mut rng);
        assert!(!out.events.iter().any(|e| matches!(e, SimEvent::CanSpawned { .. })));
        assert_eq!(out.world.cans.len(), 4);
    }

    #[test]
    fn test_missing_car_dismounts() {
        let mut world = world_with_car(Vec2::ZERO, Vec2::ZERO);
        world.player.mounted_on = Some("gone".into());
        world.player.bike = Some(crate::sim::state::Bike { pos: Vec2::ZERO });
        let out = tick(world, &TickInput::default(), 16.0, &mut SimRng::new(6));
        assert!(out.world.player.mounted_on.is_none());
        assert!(out.world.player.bike.is_none());
    }

    #[test]
    fn test_rider_is_carried() {
        let mut world = world_with_car(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0));
        world.cars[0].fuel = world.cars[0].fuel_max;
        world.cars[0].vel = Vec2::new(40.0, 0.0);
        let mut rng = SimRng::new(7);
        let mount = TickInput {
            toggle_mount: true,
            ..Default::default()
        };
        let out = tick(world, &mount, 0.0, &mut rng);
        let out = tick(out.world, &TickInput::default(), 100.0, &mut rng);
        let player = &out.world.player;
        assert!((player.pos.x - 9.0).abs() < 1e-3);
        assert!((out.world.cars[0].pos.x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_low_fuel_car_heads_for_can() {
        let mut world = world_with_car(Vec2::new(0.0, 0.0), Vec2::new(-500.0, -500.0));
        world.cars[0].fuel = 5.0;
        world.cans.push(GasCan::on_ground("g", Vec2::new(0.0, 300.0)));
        let mut rng = SimRng::new(8);
        let out = tick(world, &TickInput::default(), 0.0, &mut rng);
        let out = tick(out.world, &TickInput::default(), 100.0, &mut rng);
        let car = &out.world.cars[0];
        assert_eq!(car.state, CarState::SeekFuel);
        assert!(car.vel.x.abs() < 1e-3);
        assert!((car.vel.y - out.world.tuning.seek_speed).abs() < 1e-3);
    }
}
