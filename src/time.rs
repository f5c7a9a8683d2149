//! Simulated clock and epoch-based recomputation of orbital phase.
//!
//! The controller owns the epoch instant, the current simulated instant and
//! one anomaly snapshot per registered body. Every pass recomputes each
//! body's mean anomaly in closed form from `current - epoch`, so fast-forward,
//! rewind and arbitrary jumps never accumulate drift.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::bodies::{BodyId, BodyRegistry};
use crate::orbit::{Orbiting, mean_anomaly_at};
use crate::types::{SECONDS_PER_DAY, current_j2000_seconds};

/// Preset time rates (simulated seconds per real second)
pub mod rates {
    use crate::types::{DAYS_PER_YEAR, SECONDS_PER_DAY};

    /// Real-time
    pub const REALTIME: f64 = 1.0;
    /// 1 minute per second
    pub const MINUTE_PER_SEC: f64 = 60.0;
    /// 1 hour per second
    pub const HOUR_PER_SEC: f64 = 3600.0;
    /// 1 day per second
    pub const DAY_PER_SEC: f64 = SECONDS_PER_DAY;
    /// 1 week per second
    pub const WEEK_PER_SEC: f64 = 7.0 * SECONDS_PER_DAY;
    /// 1 month per second (~30 days)
    pub const MONTH_PER_SEC: f64 = 30.0 * SECONDS_PER_DAY;
    /// 1 year per second
    pub const YEAR_PER_SEC: f64 = DAYS_PER_YEAR * SECONDS_PER_DAY;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    #[error("non-finite simulated instant: {0}")]
    NonFiniteInstant(f64),

    #[error("non-finite speed multiplier: {0}")]
    NonFiniteSpeed(f64),

    #[error("mean anomaly of {body} is not finite {elapsed} s after epoch")]
    NonFiniteAnomaly { body: String, elapsed: f64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),

    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    #[error("{0} has no attractor and cannot be registered for orbital updates")]
    NoAttractor(String),

    #[error("{0} cannot orbit itself")]
    SelfAttractor(String),

    #[error("attractor {attractor:?} of {body} does not exist")]
    UnknownAttractor { body: String, attractor: BodyId },

    #[error("attractor {attractor} of {body} is not a known body name")]
    UnknownAttractorName { body: String, attractor: String },

    #[error("attractor {attractor:?} of {body} must be registered first")]
    AttractorNotRegistered { body: String, attractor: BodyId },

    #[error("{0} would orbit a moon (only two levels of hierarchy are supported)")]
    NestingTooDeep(String),

    #[error("{body} has invalid mean motion {mean_motion} rad/s (orbital period must be positive)")]
    InvalidMeanMotion { body: String, mean_motion: f64 },

    #[error("{body} has invalid eccentricity {eccentricity} (must be in [0, 1))")]
    InvalidEccentricity { body: String, eccentricity: f64 },

    #[error("{body} has invalid {name} {value} (must be finite and non-negative)")]
    InvalidAttribute {
        body: String,
        name: &'static str,
        value: f64,
    },
}

/// Whether ticks advance the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockMode {
    Running,
    Paused,
}

/// How a recompute pass treats a body whose anomaly is not finite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PassMode {
    /// Fail the whole pass before anything is written (scrubs)
    Atomic,
    /// Prune the body and keep updating the rest (ticks)
    Isolated,
}

/// Anomaly captured once, when a body is registered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochSnapshot {
    pub body: BodyId,
    pub mean_anomaly_at_epoch: f64,
    depth: usize,
}

/// Process-wide simulated clock.
pub struct TimeController {
    /// Reference instant in seconds since J2000
    epoch: f64,
    /// Displayed instant in seconds since J2000
    current: f64,
    /// Simulated seconds per real second
    speed_multiplier: f64,
    mode: ClockMode,
    /// Sorted by attractor depth so attractors materialize first
    snapshots: Vec<EpochSnapshot>,
}

impl TimeController {
    /// Clock starting at the epoch instant.
    pub fn new(epoch: f64, speed_multiplier: f64) -> Self {
        Self {
            epoch,
            current: epoch,
            speed_multiplier,
            mode: ClockMode::Running,
            snapshots: Vec::new(),
        }
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Current simulated instant in seconds since J2000.
    pub fn current_time(&self) -> f64 {
        self.current
    }

    /// Seconds from the epoch to the current instant (negative before it).
    pub fn elapsed_seconds(&self) -> f64 {
        self.current - self.epoch
    }

    /// Simulated days from the epoch to the current instant.
    pub fn days_since_epoch(&self) -> f64 {
        self.elapsed_seconds() / SECONDS_PER_DAY
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Change the forward playback rate. Already computed positions are unaffected.
    pub fn set_speed_multiplier(&mut self, seconds_per_real_second: f64) -> Result<(), TimeError> {
        if !seconds_per_real_second.is_finite() {
            return Err(TimeError::NonFiniteSpeed(seconds_per_real_second));
        }
        self.speed_multiplier = seconds_per_real_second;
        info!("Time scale: {} sim-s per real-s", seconds_per_real_second);
        Ok(())
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.mode == ClockMode::Paused
    }

    pub fn pause(&mut self) {
        self.mode = ClockMode::Paused;
        info!("Simulation paused");
    }

    pub fn resume(&mut self) {
        self.mode = ClockMode::Running;
        info!("Simulation running");
    }

    pub fn toggle_pause(&mut self) {
        match self.mode {
            ClockMode::Running => self.pause(),
            ClockMode::Paused => self.resume(),
        }
    }

    pub fn is_registered(&self, id: BodyId) -> bool {
        self.snapshots.iter().any(|s| s.body == id)
    }

    /// Registered bodies in materialization order.
    pub fn registered(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.snapshots.iter().map(|s| s.body)
    }

    pub fn active_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn anomaly_at_epoch(&self, id: BodyId) -> Option<f64> {
        self.snapshots
            .iter()
            .find(|s| s.body == id)
            .map(|s| s.mean_anomaly_at_epoch)
    }

    /// Capture the epoch anomaly snapshot for `id`.
    ///
    /// The body's current mean anomaly is taken as its phase at the epoch
    /// instant. Bodies without an attractor, with a non-advancing orbit or
    /// nested deeper than planet → moon are rejected. The attractor must be a
    /// root or already registered, so it is materialized before the body.
    pub fn register(&mut self, id: BodyId, bodies: &BodyRegistry) -> Result<(), RegistrationError> {
        let body = bodies.get(id).ok_or(RegistrationError::UnknownBody(id))?;
        let name = body.name().to_owned();

        if self.is_registered(id) {
            return Err(RegistrationError::AlreadyRegistered(name));
        }
        let attractor = body
            .attractor()
            .ok_or_else(|| RegistrationError::NoAttractor(name.clone()))?;
        if attractor == id {
            return Err(RegistrationError::SelfAttractor(name));
        }
        if !bodies.contains(attractor) {
            return Err(RegistrationError::UnknownAttractor {
                body: name,
                attractor,
            });
        }
        let depth = bodies
            .depth(id)
            .ok_or_else(|| RegistrationError::NestingTooDeep(name.clone()))?;
        if depth > 2 {
            return Err(RegistrationError::NestingTooDeep(name));
        }
        let attractor_is_root = bodies
            .get(attractor)
            .is_some_and(|a| a.attractor().is_none());
        if !attractor_is_root && !self.is_registered(attractor) {
            return Err(RegistrationError::AttractorNotRegistered {
                body: name,
                attractor,
            });
        }
        if !body.orbital_state().has_valid_motion() {
            return Err(RegistrationError::InvalidMeanMotion {
                body: name,
                mean_motion: body.mean_motion(),
            });
        }

        let snapshot = EpochSnapshot {
            body: id,
            mean_anomaly_at_epoch: body.mean_anomaly(),
            depth,
        };
        let index = self.snapshots.partition_point(|s| s.depth <= depth);
        self.snapshots.insert(index, snapshot);

        info!(
            "Registered {} (depth {}, anomaly at epoch {:.4} rad)",
            name, depth, snapshot.mean_anomaly_at_epoch
        );
        Ok(())
    }

    /// Running mode: advance the clock by `speed × real_dt`, then recompute
    /// every body. Never fails; bad input is logged and ignored, and a body
    /// whose anomaly overflows is pruned without holding back the others.
    pub fn tick(&mut self, real_dt_seconds: f64, bodies: &mut BodyRegistry) {
        if !real_dt_seconds.is_finite() || real_dt_seconds < 0.0 {
            warn!("Ignoring invalid tick delta {}", real_dt_seconds);
            return;
        }
        if self.is_paused() {
            return;
        }

        let next = self.current + self.speed_multiplier * real_dt_seconds;
        if !next.is_finite() {
            warn!("Tick would leave the clock at {}, holding at {}", next, self.current);
            return;
        }
        self.current = next;
        self.recompute_isolated(bodies);
    }

    /// Scrub to an absolute instant and recompute every body.
    ///
    /// Atomic: on error the clock and all bodies keep their previous state.
    pub fn set_global_time(
        &mut self,
        instant: f64,
        bodies: &mut BodyRegistry,
    ) -> Result<(), TimeError> {
        if !instant.is_finite() {
            return Err(TimeError::NonFiniteInstant(instant));
        }

        let previous = self.current;
        self.current = instant;
        if let Err(err) = self.recompute(bodies) {
            self.current = previous;
            return Err(err);
        }
        debug!("Scrubbed to {} s since J2000", instant);
        Ok(())
    }

    /// Scrub by a relative amount of simulated time.
    pub fn jump_by(&mut self, seconds: f64, bodies: &mut BodyRegistry) -> Result<(), TimeError> {
        self.set_global_time(self.current + seconds, bodies)
    }

    pub fn reset_to_epoch(&mut self, bodies: &mut BodyRegistry) -> Result<(), TimeError> {
        self.set_global_time(self.epoch, bodies)
    }

    /// Scrub to the system clock's current instant.
    pub fn jump_to_now(&mut self, bodies: &mut BodyRegistry) -> Result<(), TimeError> {
        self.set_global_time(current_j2000_seconds(), bodies)
    }

    /// Recompute every registered body at the current instant, all or nothing.
    ///
    /// Anomalies are staged for all bodies before any is written, so a failure
    /// leaves every body untouched. Bodies whose own entry or attractor has
    /// gone away are pruned from the active set during this pass.
    pub fn recompute(&mut self, bodies: &mut BodyRegistry) -> Result<(), TimeError> {
        self.recompute_pass(bodies, PassMode::Atomic)
    }

    /// Recompute every registered body at the current instant, one body at a
    /// time: a body whose anomaly is not finite is pruned (along with its
    /// satellites) and the rest are still updated.
    pub fn recompute_isolated(&mut self, bodies: &mut BodyRegistry) {
        if let Err(err) = self.recompute_pass(bodies, PassMode::Isolated) {
            // isolated passes prune instead of failing
            warn!("Recompute failed: {}", err);
        }
    }

    fn recompute_pass(
        &mut self,
        bodies: &mut BodyRegistry,
        mode: PassMode,
    ) -> Result<(), TimeError> {
        let elapsed = self.elapsed_seconds();
        let mut pruned: HashSet<BodyId> = HashSet::new();

        let mut staged: Vec<Option<f64>> = Vec::with_capacity(self.snapshots.len());
        for snapshot in &self.snapshots {
            let Some(body) = bodies.get(snapshot.body) else {
                staged.push(None);
                continue;
            };
            let anomaly =
                mean_anomaly_at(snapshot.mean_anomaly_at_epoch, body.mean_motion(), elapsed);
            if !anomaly.is_finite() {
                let err = TimeError::NonFiniteAnomaly {
                    body: body.name().to_owned(),
                    elapsed,
                };
                match mode {
                    PassMode::Atomic => return Err(err),
                    PassMode::Isolated => {
                        warn!("Pruning {:?} from active set: {}", snapshot.body, err);
                        pruned.insert(snapshot.body);
                        staged.push(None);
                        continue;
                    }
                }
            }
            staged.push(Some(anomaly));
        }

        for (snapshot, anomaly) in self.snapshots.iter().zip(&staged) {
            if pruned.contains(&snapshot.body) {
                continue;
            }
            match (anomaly, bodies.get_mut(snapshot.body)) {
                (Some(anomaly), Some(body)) => body.set_mean_anomaly(*anomaly),
                _ => {
                    warn!("Pruning destroyed body {:?} from active set", snapshot.body);
                    pruned.insert(snapshot.body);
                }
            }
        }

        for snapshot in &self.snapshots {
            if pruned.contains(&snapshot.body) {
                continue;
            }
            let Some(attractor) = bodies.get(snapshot.body).and_then(|b| b.attractor()) else {
                pruned.insert(snapshot.body);
                continue;
            };
            let attractor_position = if pruned.contains(&attractor) {
                None
            } else {
                bodies.get(attractor).map(|a| a.world_position())
            };
            let Some(attractor_position) = attractor_position else {
                warn!(
                    "Pruning {:?}: attractor {:?} is gone or was pruned",
                    snapshot.body, attractor
                );
                pruned.insert(snapshot.body);
                continue;
            };
            if let Some(body) = bodies.get_mut(snapshot.body) {
                body.materialize(attractor_position);
            }
        }

        if !pruned.is_empty() {
            self.snapshots.retain(|s| !pruned.contains(&s.body));
        }
        Ok(())
    }
}
