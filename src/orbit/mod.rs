//! Orbit geometry and per-body orbital state.
//!
//! Every orbit is a fixed parametric ellipse centered on its attractor. The
//! only quantity that moves with time is the mean anomaly, which is always
//! re-derived from the elapsed time since the epoch instead of integrated.

pub mod ellipse;
pub mod state;

#[cfg(test)]
mod proptest_orbit;

pub use ellipse::Ellipse;
pub use state::{Orbiting, OrbitalState, mean_anomaly_at, mean_motion_from_period};
