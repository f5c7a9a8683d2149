//! Orbit shape evaluator.

use bevy::math::DVec2;
use std::f64::consts::TAU;

/// Closed elliptical path centered on the origin of the orbit plane.
///
/// `x_radius` lies along the local u axis and `y_radius` along v. Equal radii
/// give the circular approximation used for most bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub x_radius: f64,
    pub y_radius: f64,
}

impl Ellipse {
    pub fn new(x_radius: f64, y_radius: f64) -> Self {
        Self { x_radius, y_radius }
    }

    pub fn circle(radius: f64) -> Self {
        Self::new(radius, radius)
    }

    /// Ellipse with semi-major axis `semi_major_axis` and the semi-minor axis
    /// implied by `eccentricity` (b = a·√(1 − e²)).
    pub fn from_eccentricity(semi_major_axis: f64, eccentricity: f64) -> Self {
        let semi_minor = semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt();
        Self::new(semi_major_axis, semi_minor)
    }

    /// Point on the ellipse at `progress` revolutions (one revolution per unit).
    ///
    /// Progress outside [0, 1) is wrapped, so the function is periodic with
    /// period 1 and carries no state between calls.
    pub fn evaluate(&self, progress: f64) -> DVec2 {
        let angle = TAU * progress.rem_euclid(1.0);
        DVec2::new(self.x_radius * angle.cos(), self.y_radius * angle.sin())
    }

    /// Closed polyline of `segments + 1` points, first and last coinciding.
    pub fn points(&self, segments: usize) -> Vec<DVec2> {
        let segments = segments.max(3);
        (0..=segments)
            .map(|i| self.evaluate(i as f64 / segments as f64))
            .collect()
    }

    pub fn is_degenerate(&self) -> bool {
        self.x_radius == 0.0 && self.y_radius == 0.0
    }
}
