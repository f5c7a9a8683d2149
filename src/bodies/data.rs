//! Physical and orbital data for the preset solar system (J2000 epoch).
//! Source: NASA planetary fact sheets, simplified to circular-ish orbits in one plane.

use super::{BodyDescriptor, BodyId, BodyKind, PhysicalAttributes};

/// Static description of a preset body. The attractor is referenced by name
/// and resolved when the preset is loaded.
#[derive(Clone, Copy, Debug)]
pub struct PresetBody {
    pub name: &'static str,
    pub kind: BodyKind,
    pub attractor: Option<&'static str>,
    /// Millions of km
    pub distance: f64,
    /// Thousands of km
    pub diameter: f64,
    /// m/s²
    pub gravity: f64,
    pub axial_tilt_deg: f64,
    pub rotation_period_hours: f64,
    pub orbital_period_days: f64,
    pub mean_anomaly_at_epoch_deg: f64,
    pub eccentricity: f64,
}

impl PresetBody {
    /// Descriptor for this preset with its attractor already resolved.
    pub fn descriptor(&self, attractor: Option<BodyId>) -> BodyDescriptor {
        BodyDescriptor {
            name: self.name.to_owned(),
            kind: self.kind,
            attractor,
            attributes: PhysicalAttributes {
                distance: self.distance,
                diameter: self.diameter,
                gravity: self.gravity,
                axial_tilt_deg: self.axial_tilt_deg,
                rotation_period_hours: self.rotation_period_hours,
            },
            orbital_period_days: self.orbital_period_days,
            mean_anomaly_at_epoch_deg: self.mean_anomaly_at_epoch_deg,
            eccentricity: self.eccentricity,
        }
    }
}

/// Sun, the eight planets and the major moons, attractors listed before
/// their satellites.
pub fn solar_system() -> &'static [PresetBody] {
    SOLAR_SYSTEM
}

const fn planet(
    name: &'static str,
    distance: f64,
    diameter: f64,
    gravity: f64,
    axial_tilt_deg: f64,
    rotation_period_hours: f64,
    orbital_period_days: f64,
    mean_anomaly_at_epoch_deg: f64,
    eccentricity: f64,
) -> PresetBody {
    PresetBody {
        name,
        kind: BodyKind::Planet,
        attractor: Some("Sun"),
        distance,
        diameter,
        gravity,
        axial_tilt_deg,
        rotation_period_hours,
        orbital_period_days,
        mean_anomaly_at_epoch_deg,
        eccentricity,
    }
}

/// Tidally locked moon: rotation period equals orbital period.
const fn moon(
    name: &'static str,
    parent: &'static str,
    distance: f64,
    diameter: f64,
    gravity: f64,
    orbital_period_days: f64,
    mean_anomaly_at_epoch_deg: f64,
    eccentricity: f64,
) -> PresetBody {
    PresetBody {
        name,
        kind: BodyKind::Moon,
        attractor: Some(parent),
        distance,
        diameter,
        gravity,
        axial_tilt_deg: 0.0,
        rotation_period_hours: orbital_period_days * 24.0,
        orbital_period_days,
        mean_anomaly_at_epoch_deg,
        eccentricity,
    }
}

static SOLAR_SYSTEM: &[PresetBody] = &[
    PresetBody {
        name: "Sun",
        kind: BodyKind::Sun,
        attractor: None,
        distance: 0.0,
        diameter: 1392.7,
        gravity: 274.0,
        axial_tilt_deg: 7.25,
        rotation_period_hours: 609.12,
        orbital_period_days: 0.0,
        mean_anomaly_at_epoch_deg: 0.0,
        eccentricity: 0.0,
    },
    planet("Mercury", 57.9, 4.879, 3.7, 0.034, 1407.6, 87.969, 174.79, 0.2056),
    planet("Venus", 108.2, 12.104, 8.9, 177.4, -5832.5, 224.701, 50.42, 0.0068),
    planet("Earth", 149.6, 12.756, 9.8, 23.44, 23.9345, 365.256, 357.53, 0.0167),
    planet("Mars", 227.9, 6.792, 3.7, 25.19, 24.6229, 686.980, 19.41, 0.0934),
    planet("Jupiter", 778.6, 142.984, 23.1, 3.13, 9.925, 4332.59, 20.02, 0.0484),
    planet("Saturn", 1433.5, 120.536, 9.0, 26.73, 10.656, 10759.22, 317.02, 0.0542),
    planet("Uranus", 2872.5, 51.118, 8.7, 97.77, -17.24, 30688.5, 142.24, 0.0472),
    planet("Neptune", 4495.1, 49.528, 11.0, 28.32, 16.11, 60182.0, 256.23, 0.0086),
    moon("Moon", "Earth", 0.3844, 3.475, 1.62, 27.3217, 134.96, 0.0549),
    moon("Io", "Jupiter", 0.4217, 3.643, 1.796, 1.769, 342.02, 0.0041),
    moon("Europa", "Jupiter", 0.6709, 3.122, 1.314, 3.551, 171.02, 0.0094),
    moon("Ganymede", "Jupiter", 1.0704, 5.268, 1.428, 7.155, 317.54, 0.0011),
    moon("Callisto", "Jupiter", 1.8827, 4.821, 1.235, 16.689, 181.41, 0.0074),
    moon("Titan", "Saturn", 1.2219, 5.150, 1.352, 15.945, 163.31, 0.0288),
];
