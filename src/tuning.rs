//! Data-driven game balance
//!
//! Every proximity range and rate the simulation consults lives here, so a
//! balance pass is a JSON edit rather than a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("cannot read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` must be finite and non-negative, got {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("car_fuel_low_threshold ({low}) exceeds car_fuel_max ({max})")]
    FuelThreshold { low: f32, max: f32 },
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Balance knobs for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Interaction ranges ===
    /// Max distance from player to a ground can for pickup
    pub pickup_range: f32,
    /// Max distance from player to an art car for mounting
    pub mount_range: f32,
    /// Max distance from player to an art car for fuel delivery
    pub deliver_range: f32,

    // === Delivery rewards ===
    /// Fuel a car is set to on delivery (a full refill, not additive)
    pub refill_fuel: f32,
    /// Karma awarded per delivery
    pub delivery_karma: u32,

    // === Art car behavior ===
    /// Cars notice a player carrying fuel within this radius
    pub ai_perception_radius: f32,
    /// Speed of a car steering toward fuel (units/s)
    pub seek_speed: f32,
    /// Fuel burned per second of driving
    pub fuel_burn_per_sec: f32,

    // === Player ===
    /// Walking/biking speed (units/s)
    pub player_speed: f32,
    /// Side of the square box used for platform checks
    pub player_box_size: f32,
    /// Auto-pickup is suppressed this long after a drop (ms)
    pub drop_pickup_cooldown_ms: f64,

    // === Art car factory ===
    pub car_fuel_max: f32,
    pub car_fuel_low_threshold: f32,
    pub car_size_min: f32,
    pub car_size_max: f32,
    pub car_speed_min: f32,
    pub car_speed_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pickup_range: 40.0,
            mount_range: 60.0,
            deliver_range: 70.0,

            refill_fuel: 100.0,
            delivery_karma: 10,

            ai_perception_radius: 200.0,
            seek_speed: 60.0,
            fuel_burn_per_sec: 2.0,

            player_speed: 140.0,
            player_box_size: 16.0,
            drop_pickup_cooldown_ms: 1000.0,

            car_fuel_max: 100.0,
            car_fuel_low_threshold: 25.0,
            car_size_min: 80.0,
            car_size_max: 140.0,
            car_speed_min: 20.0,
            car_speed_max: 45.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning file; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning (pickup={}, mount={}, deliver={})",
            tuning.pickup_range,
            tuning.mount_range,
            tuning.deliver_range
        );
        Ok(tuning)
    }

    /// Read and parse a tuning file from disk
    pub fn from_path(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Tuning from `path`, or defaults when there is no path or it fails to load
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_path(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("pickup_range", self.pickup_range),
            ("mount_range", self.mount_range),
            ("deliver_range", self.deliver_range),
            ("refill_fuel", self.refill_fuel),
            ("ai_perception_radius", self.ai_perception_radius),
            ("seek_speed", self.seek_speed),
            ("fuel_burn_per_sec", self.fuel_burn_per_sec),
            ("player_speed", self.player_speed),
            ("player_box_size", self.player_box_size),
            ("drop_pickup_cooldown_ms", self.drop_pickup_cooldown_ms as f32),
            ("car_fuel_max", self.car_fuel_max),
            ("car_fuel_low_threshold", self.car_fuel_low_threshold),
            ("car_size_min", self.car_size_min),
            ("car_speed_min", self.car_speed_min),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        if self.car_fuel_low_threshold > self.car_fuel_max {
            return Err(TuningError::FuelThreshold {
                low: self.car_fuel_low_threshold,
                max: self.car_fuel_max,
            });
        }
        if self.car_size_min > self.car_size_max {
            return Err(TuningError::InvertedRange {
                field: "car_size",
                min: self.car_size_min,
                max: self.car_size_max,
            });
        }
        if self.car_speed_min > self.car_speed_max {
            return Err(TuningError::InvertedRange {
                field: "car_speed",
                min: self.car_speed_min,
                max: self.car_speed_max,
            });
        }
        Ok(())
    }
}
