//! Startup configuration for a simulation session.

use bevy::prelude::*;

use crate::time::rates;
use crate::types::calendar_to_j2000_seconds;
use crate::vector3d::Vector3d;

/// Default multiplier applied to real time when advancing axial spin.
/// At 3600, one real second spins a body through one hour of its day.
pub const DEFAULT_SPIN_MULTIPLIER: f64 = 3600.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid epoch {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")]
    InvalidEpoch {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },

    #[error("invalid scale setting {name}: {value} (must be positive and finite)")]
    InvalidScale { name: &'static str, value: f64 },

    #[error("invalid speed multiplier: {0} (must be finite)")]
    InvalidSpeedMultiplier(f64),

    #[error("invalid spin multiplier: {0} (must be finite)")]
    InvalidSpinMultiplier(f64),

    #[error("invalid root position: {0}")]
    InvalidRootPosition(Vector3d),
}

/// UTC calendar instant all epoch anomaly snapshots refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochConfig {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Default for EpochConfig {
    /// J2000: 2000-01-01 12:00 UTC.
    fn default() -> Self {
        Self {
            year: 2000,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
        }
    }
}

impl EpochConfig {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Seconds since J2000 for this instant.
    pub fn to_j2000_seconds(&self) -> Result<f64, ConfigError> {
        calendar_to_j2000_seconds(self.year, self.month, self.day, self.hour, self.minute, 0)
            .ok_or(ConfigError::InvalidEpoch {
                year: self.year,
                month: self.month,
                day: self.day,
                hour: self.hour,
                minute: self.minute,
            })
    }
}

/// Multipliers turning designer units into scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSettings {
    /// Applied to planet distances from their attractor
    pub distance_scale: f64,
    /// Applied to moon distances from their planet
    pub moon_distance_scale: f64,
    /// Applied to planet and moon diameters
    pub diameter_scale: f64,
    /// Applied to the Sun's diameter
    pub sun_diameter_scale: f64,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            distance_scale: 1.0,
            moon_distance_scale: 30.0,
            diameter_scale: 0.1,
            sun_diameter_scale: 0.01,
        }
    }
}

impl ScaleSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("distance_scale", self.distance_scale),
            ("moon_distance_scale", self.moon_distance_scale),
            ("diameter_scale", self.diameter_scale),
            ("sun_diameter_scale", self.sun_diameter_scale),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidScale { name, value });
            }
        }
        Ok(())
    }
}

/// Session configuration, supplied once at startup.
#[derive(Resource, Clone, Debug)]
pub struct SimulationConfig {
    pub epoch: EpochConfig,
    /// Simulated seconds per real second (negative runs backwards)
    pub speed_multiplier: f64,
    pub start_paused: bool,
    pub scale: ScaleSettings,
    /// Real-time multiplier for axial spin; not affected by the orbital clock
    pub spin_multiplier: f64,
    /// World position of bodies without an attractor
    pub root_position: Vector3d,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            epoch: EpochConfig::default(),
            speed_multiplier: rates::DAY_PER_SEC,
            start_paused: false,
            scale: ScaleSettings::default(),
            spin_multiplier: DEFAULT_SPIN_MULTIPLIER,
            root_position: Vector3d::ZERO,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.epoch.to_j2000_seconds()?;
        self.scale.validate()?;
        if !self.speed_multiplier.is_finite() {
            return Err(ConfigError::InvalidSpeedMultiplier(self.speed_multiplier));
        }
        if !self.spin_multiplier.is_finite() {
            return Err(ConfigError::InvalidSpinMultiplier(self.spin_multiplier));
        }
        if !self.root_position.is_finite() {
            return Err(ConfigError::InvalidRootPosition(self.root_position));
        }
        Ok(())
    }
}
