//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as an argument, never from the wall clock
//! - Seeded RNG only, through [`RandomSource`]
//! - Entities are taken by value and handed back; no global state
//! - No rendering or platform dependencies

pub mod actions;
pub mod ai;
pub mod kinematics;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actions::{
    DeliverOutcome, DropOutcome, MountOutcome, PickupOutcome, deliver_gas_to_art_car, dismount,
    drop_gas_can, try_mount_art_car, try_pickup_gas_can,
};
pub use ai::AiDecision;
pub use rng::{RandomSource, SimRng};
pub use spawner::SpawnOutcome;
pub use state::{
    ArtCar, Bike, CarDesign, CarState, GasCan, HeldItem, HellStation, ItemKind, Player, World,
};
pub use tick::{SimEvent, TickInput, TickOutcome, tick};
