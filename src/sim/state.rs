//! World model
//!
//! Plain entity data. Behavior lives in the sibling modules, which take these
//! by value and hand back updated copies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::Aabb;
use crate::tuning::Tuning;

/// A fuel can, either on the ground or carried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasCan {
    pub id: String,
    pub pos: Vec2,
    /// True once picked up; false while lying on the ground
    pub active: bool,
}

impl GasCan {
    pub fn on_ground(id: impl Into<String>, pos: Vec2) -> Self {
        Self {
            id: id.into(),
            pos,
            active: false,
        }
    }
}

/// A station that periodically drops gas cans inside its rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HellStation {
    pub id: String,
    pub aabb: Aabb,
    pub spawn_interval_ms: u32,
    /// Cap on simultaneous ground cans inside `aabb`
    pub max_cans: usize,
    /// Timestamp (ms) of the last successful spawn
    pub last_spawn_at: f64,
}

impl HellStation {
    pub fn new(id: impl Into<String>, aabb: Aabb, spawn_interval_ms: u32, max_cans: usize) -> Self {
        Self {
            id: id.into(),
            aabb,
            spawn_interval_ms,
            max_cans,
            last_spawn_at: 0.0,
        }
    }
}

/// Kinds of item the player can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    GasCan,
}

/// Weak reference to a carried item, resolved by id each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    pub kind: ItemKind,
    pub id: String,
}

impl HeldItem {
    pub fn gas_can(id: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::GasCan,
            id: id.into(),
        }
    }
}

/// Where the player left their bike when climbing aboard a car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub holding: Option<HeldItem>,
    /// Id of the car the player rides; `bike` is `Some` exactly while this is
    pub mounted_on: Option<String>,
    pub bike: Option<Bike>,
    pub karma: u32,
}

impl Player {
    pub fn new(id: impl Into<String>, pos: Vec2) -> Self {
        Self {
            id: id.into(),
            pos,
            vel: Vec2::ZERO,
            holding: None,
            mounted_on: None,
            bike: None,
            karma: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted_on.is_some()
    }

    /// Id of the held gas can, if any
    pub fn held_can(&self) -> Option<&str> {
        match &self.holding {
            Some(HeldItem {
                kind: ItemKind::GasCan,
                id,
            }) => Some(id.as_str()),
            None => None,
        }
    }
}

/// Art car behavioral state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CarState {
    #[default]
    Patrol,
    SeekFuel,
    /// Held over from a previous tick only; no transition produces it yet
    Refueling,
    /// Held over from a previous tick only; no transition produces it yet
    Idle,
}

/// Cosmetic art car theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarDesign {
    Disco,
    Dragon,
    Galleon,
    Octopus,
    Cupcake,
}

impl CarDesign {
    pub const ALL: [CarDesign; 5] = [
        CarDesign::Disco,
        CarDesign::Dragon,
        CarDesign::Galleon,
        CarDesign::Octopus,
        CarDesign::Cupcake,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtCar {
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Always within `[0, fuel_max]`
    pub fuel: f32,
    pub fuel_max: f32,
    pub fuel_low_threshold: f32,
    pub state: CarState,
    /// Deck the player can ride on; moves with the car
    pub platform_aabb: Aabb,
    pub design: CarDesign,
    pub size: f32,
    pub speed: f32,
}

impl ArtCar {
    /// Build a car at `pos` with cosmetics, starting fuel and a patrol heading drawn from `rng`
    pub fn spawn<R: RandomSource>(
        id: impl Into<String>,
        pos: Vec2,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Self {
        let design = rng.pick(&CarDesign::ALL).copied().unwrap_or(CarDesign::Disco);
        let size = rng.range(tuning.car_size_min, tuning.car_size_max);
        let speed = rng.range(tuning.car_speed_min, tuning.car_speed_max);
        let fuel = rng.range(tuning.car_fuel_low_threshold, tuning.car_fuel_max);
        let heading = rng.range(0.0, std::f32::consts::TAU);

        Self {
            id: id.into(),
            pos,
            vel: Vec2::from_angle(heading) * speed,
            fuel: fuel.clamp(0.0, tuning.car_fuel_max),
            fuel_max: tuning.car_fuel_max,
            fuel_low_threshold: tuning.car_fuel_low_threshold,
            state: CarState::Patrol,
            platform_aabb: Aabb::centered_on(pos, size, size * 0.6),
            design,
            size,
            speed,
        }
    }

    /// Copy with fuel clamped into `[0, fuel_max]`
    pub fn with_fuel(mut self, fuel: f32) -> Self {
        self.fuel = fuel.clamp(0.0, self.fuel_max);
        self
    }
}

/// Everything the simulation owns for one session
///
/// Passed into and returned from [`super::tick`]; there is no global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub station: HellStation,
    pub cans: Vec<GasCan>,
    pub player: Player,
    pub cars: Vec<ArtCar>,
    pub tuning: Tuning,
    /// Timestamp (ms) of the previous tick, `None` before the first
    pub last_tick_at: Option<f64>,
    /// Proximity pickup is ignored until this timestamp (ms)
    pub pickup_blocked_until: f64,
}

impl World {
    pub fn new(station: HellStation, player: Player, cars: Vec<ArtCar>, tuning: Tuning) -> Self {
        Self {
            station,
            cans: Vec::new(),
            player,
            cars,
            tuning,
            last_tick_at: None,
            pickup_blocked_until: 0.0,
        }
    }

    /// Default playa layout: one station, the player south of it, `car_count` cars around it
    pub fn with_seed_layout<R: RandomSource>(
        rng: &mut R,
        car_count: usize,
        tuning: Tuning,
    ) -> Self {
        let aabb = Aabb::new(100.0, 100.0, 200.0, 100.0);
        let station = HellStation::new("hell-station", aabb, 1000, 3);
        let center = station.aabb.center();
        let player = Player::new("player", center + Vec2::new(0.0, 250.0));

        let cars = (0..car_count)
            .map(|i| {
                let angle = rng.range(0.0, std::f32::consts::TAU);
                let dist = rng.range(250.0, 500.0);
                let pos = center + Vec2::from_angle(angle) * dist;
                ArtCar::spawn(format!("car-{i}"), pos, rng, &tuning)
            })
            .collect();

        Self::new(station, player, cars, tuning)
    }

    pub fn car(&self, id: &str) -> Option<&ArtCar> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn can(&self, id: &str) -> Option<&GasCan> {
        self.cans.iter().find(|c| c.id == id)
    }

    /// Inactive cans lying inside the station rectangle
    pub fn ground_cans_at_station(&self) -> usize {
        super::spawner::ground_cans_inside(&self.station, &self.cans)
    }

    /// Read-only JSON view for the render layer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
