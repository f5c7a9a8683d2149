//! Common test utilities for integration tests.

#![allow(dead_code)]

use orrery::bodies::{BodyDescriptor, BodyId, BodyKind, PhysicalAttributes};
use orrery::config::{EpochConfig, SimulationConfig};
use orrery::simulation::Simulation;
use orrery::vector3d::Vector3d;

/// Descriptor with round-number attributes.
pub fn body(
    name: &str,
    kind: BodyKind,
    attractor: Option<BodyId>,
    distance: f64,
    period_days: f64,
    anomaly_deg: f64,
) -> BodyDescriptor {
    BodyDescriptor {
        name: name.to_owned(),
        kind,
        attractor,
        attributes: PhysicalAttributes {
            distance,
            diameter: 10.0,
            gravity: 1.0,
            axial_tilt_deg: 0.0,
            rotation_period_hours: 24.0,
        },
        orbital_period_days: period_days,
        mean_anomaly_at_epoch_deg: anomaly_deg,
        eccentricity: 0.0,
    }
}

/// Sun, a one-year planet starting at anomaly 0 and a 27-day moon.
pub struct Scene {
    pub simulation: Simulation,
    pub sun: BodyId,
    pub planet: BodyId,
    pub moon: BodyId,
}

/// Scene with its epoch at 2000-01-01T00:00Z, paused unless resumed.
pub fn scene(speed_multiplier: f64) -> Scene {
    let config = SimulationConfig {
        epoch: EpochConfig::new(2000, 1, 1, 0, 0),
        speed_multiplier,
        ..Default::default()
    };
    let mut simulation = Simulation::new(config).expect("valid config");
    let sun = simulation
        .spawn_body(body("Sun", BodyKind::Sun, None, 0.0, 0.0, 0.0))
        .expect("sun");
    let planet = simulation
        .spawn_body(body("Planet", BodyKind::Planet, Some(sun), 150.0, 365.25, 0.0))
        .expect("planet");
    let moon = simulation
        .spawn_body(body("Moon", BodyKind::Moon, Some(planet), 0.4, 27.3, 90.0))
        .expect("moon");
    Scene {
        simulation,
        sun,
        planet,
        moon,
    }
}

/// Bitwise comparison of two positions.
pub fn same_position(a: Vector3d, b: Vector3d) -> bool {
    a.x.to_bits() == b.x.to_bits()
        && a.y.to_bits() == b.y.to_bits()
        && a.z.to_bits() == b.z.to_bits()
}
