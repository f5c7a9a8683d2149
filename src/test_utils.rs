//! Test utilities for orbit and clock tests.
//!
//! Provides body fixtures with round-number attributes and assertions for
//! the hierarchy invariants every recompute pass must preserve.

use crate::bodies::{BodyDescriptor, BodyId, BodyKind, PhysicalAttributes};

/// Fixtures for creating test bodies.
pub mod fixtures {
    use super::*;

    pub const SUN_DIAMETER: f64 = 1000.0;
    pub const PLANET_DIAMETER: f64 = 10.0;
    pub const MOON_DIAMETER: f64 = 2.0;

    /// Root body at the origin, slowly rotating and untilted.
    pub fn sun() -> BodyDescriptor {
        BodyDescriptor {
            name: "Sun".to_owned(),
            kind: BodyKind::Sun,
            attractor: None,
            attributes: PhysicalAttributes {
                distance: 0.0,
                diameter: SUN_DIAMETER,
                gravity: 274.0,
                axial_tilt_deg: 0.0,
                rotation_period_hours: 600.0,
            },
            orbital_period_days: 0.0,
            mean_anomaly_at_epoch_deg: 0.0,
            eccentricity: 0.0,
        }
    }

    /// Circular planet starting 30° into its orbit.
    pub fn planet(attractor: BodyId, distance: f64, period_days: f64) -> BodyDescriptor {
        BodyDescriptor {
            name: "Planet".to_owned(),
            kind: BodyKind::Planet,
            attractor: Some(attractor),
            attributes: PhysicalAttributes {
                distance,
                diameter: PLANET_DIAMETER,
                gravity: 9.8,
                axial_tilt_deg: 20.0,
                rotation_period_hours: 24.0,
            },
            orbital_period_days: period_days,
            mean_anomaly_at_epoch_deg: 30.0,
            eccentricity: 0.0,
        }
    }

    /// Circular, tidally locked moon starting at zero anomaly.
    pub fn moon(attractor: BodyId, distance: f64, period_days: f64) -> BodyDescriptor {
        BodyDescriptor {
            name: "Moon".to_owned(),
            kind: BodyKind::Moon,
            attractor: Some(attractor),
            attributes: PhysicalAttributes {
                distance,
                diameter: MOON_DIAMETER,
                gravity: 1.6,
                axial_tilt_deg: 0.0,
                rotation_period_hours: period_days * 24.0,
            },
            orbital_period_days: period_days,
            mean_anomaly_at_epoch_deg: 0.0,
            eccentricity: 0.0,
        }
    }
}

/// Assertions for hierarchy invariants.
pub mod assertions {
    use crate::bodies::{BodyId, BodyRegistry};
    use crate::orbit::Orbiting;

    /// Assert `id`'s world position is exactly its attractor's position plus
    /// its own orbit offset.
    ///
    /// # Panics
    /// Panics if either body is missing or the positions differ bitwise.
    pub fn assert_composes_with_attractor(bodies: &BodyRegistry, id: BodyId) {
        let body = bodies.get(id).expect("body should exist");
        let attractor = body.attractor().expect("body should have an attractor");
        let base = bodies
            .get(attractor)
            .expect("attractor should exist")
            .world_position();
        let expected = base + body.orbit_offset();
        let actual = body.world_position();
        assert!(
            actual.x == expected.x && actual.y == expected.y && actual.z == expected.z,
            "{} at {} does not compose: attractor {} + offset {}",
            body.name(),
            actual,
            base,
            body.orbit_offset()
        );
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{BodyRegistry, CelestialBody};
    use crate::orbit::Orbiting;

    #[test]
    fn test_fixture_hierarchy() {
        let mut bodies = BodyRegistry::new();
        let sun = bodies.insert(CelestialBody::new(fixtures::sun()));
        let planet = bodies.insert(CelestialBody::new(fixtures::planet(sun, 1.0, 10.0)));
        let moon = bodies.insert(CelestialBody::new(fixtures::moon(planet, 0.1, 1.0)));

        assert_eq!(bodies.depth(moon), Some(2));
        assert_eq!(bodies.get(sun).unwrap().attractor(), None);
    }

    #[test]
    fn test_composition_holds_after_materialize() {
        let mut bodies = BodyRegistry::new();
        let sun = bodies.insert(CelestialBody::new(fixtures::sun()));
        let planet = bodies.insert(CelestialBody::new(fixtures::planet(sun, 1.0, 10.0)));
        let body = bodies.get_mut(planet).unwrap();
        body.apply_changes(&Default::default(), Some(1.0));
        body.materialize(crate::vector3d::Vector3d::ZERO);

        assertions::assert_composes_with_attractor(&bodies, planet);
    }
}
