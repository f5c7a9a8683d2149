//! Mutable orbital state of a single body.

use std::f64::consts::TAU;

use super::Ellipse;
use crate::bodies::BodyId;
use crate::vector3d::Vector3d;

/// Closed-form mean anomaly after `elapsed_seconds` (negative rewinds).
///
/// This is the single formula every position in the simulation derives from;
/// nothing integrates per-frame deltas.
#[inline]
pub fn mean_anomaly_at(mean_anomaly_at_epoch: f64, mean_motion: f64, elapsed_seconds: f64) -> f64 {
    mean_anomaly_at_epoch + elapsed_seconds * mean_motion
}

/// Mean motion in radians per second for an orbital period in seconds.
pub fn mean_motion_from_period(period_seconds: f64) -> f64 {
    TAU / period_seconds
}

/// Phase and rate of an orbit around an attractor.
///
/// `mean_anomaly` is kept unwrapped (it may exceed 2π or go negative);
/// [`OrbitalState::progress`] folds it into a single revolution.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalState {
    mean_anomaly: f64,
    mean_motion: f64,
    attractor: Option<BodyId>,
}

impl OrbitalState {
    pub fn new(attractor: Option<BodyId>, mean_anomaly: f64, mean_motion: f64) -> Self {
        Self {
            mean_anomaly,
            mean_motion,
            attractor,
        }
    }

    /// State of a body that orbits nothing (the root of the hierarchy).
    pub fn stationary() -> Self {
        Self::new(None, 0.0, 0.0)
    }

    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Data write only: cached positions are not refreshed until the owner materializes.
    pub fn set_mean_anomaly(&mut self, value: f64) {
        self.mean_anomaly = value;
    }

    /// Radians per simulated second.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    pub fn set_mean_motion(&mut self, value: f64) {
        self.mean_motion = value;
    }

    pub fn attractor(&self) -> Option<BodyId> {
        self.attractor
    }

    /// Fraction of the current revolution in [0, 1).
    pub fn progress(&self) -> f64 {
        // rem_euclid rounds tiny negative inputs up to exactly 1.0
        let progress = (self.mean_anomaly / TAU).rem_euclid(1.0);
        if progress < 1.0 { progress } else { 0.0 }
    }

    /// Orbital period in seconds, infinite for a stationary state.
    pub fn period(&self) -> f64 {
        TAU / self.mean_motion
    }

    /// Whether the mean motion describes a forward, advancing orbit.
    pub fn has_valid_motion(&self) -> bool {
        self.mean_motion.is_finite() && self.mean_motion > 0.0
    }

    /// Offset from the attractor for the current phase.
    ///
    /// The orbit plane is the world XZ plane: shape point (u, v) maps to (u, 0, v).
    pub fn offset_on(&self, shape: &Ellipse) -> Vector3d {
        let point = shape.evaluate(self.progress());
        Vector3d::new(point.x, 0.0, point.y)
    }
}

/// Capability the time controller drives: write a phase, then materialize it.
///
/// Resolved once when a body is registered; the per-tick pass only calls
/// through it.
pub trait Orbiting {
    fn orbital_state(&self) -> &OrbitalState;

    fn orbital_state_mut(&mut self) -> &mut OrbitalState;

    /// Recompute the world position from the current phase, relative to the
    /// attractor's already-materialized position.
    fn materialize(&mut self, attractor_position: Vector3d);

    fn mean_anomaly(&self) -> f64 {
        self.orbital_state().mean_anomaly()
    }

    fn mean_motion(&self) -> f64 {
        self.orbital_state().mean_motion()
    }

    fn attractor(&self) -> Option<BodyId> {
        self.orbital_state().attractor()
    }

    fn set_mean_anomaly(&mut self, value: f64) {
        self.orbital_state_mut().set_mean_anomaly(value);
    }
}
