//! Celestial bodies: physical attributes, derived orbit geometry and world transform.
//!
//! Hierarchy is limited to two levels (Sun → planet → moon). A body's world
//! position is its attractor's world position plus its own orbit offset.

pub mod data;

pub use data::{PresetBody, solar_system};

use bevy::math::DQuat;
use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::config::ScaleSettings;
use crate::orbit::{Ellipse, OrbitalState, Orbiting, mean_motion_from_period};
use crate::types::{DEG_TO_RAD, SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::vector3d::Vector3d;

/// Stable handle to a body in a [`BodyRegistry`]. Handles are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Role of a body in the two-level hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Sun,
    Planet,
    Moon,
}

/// Designer-set physical attributes.
///
/// Distances are in millions of km and diameters in thousands of km; the
/// [`ScaleSettings`] multipliers turn both into scene units.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicalAttributes {
    /// Mean distance from the attractor
    pub distance: f64,
    /// Equatorial diameter
    pub diameter: f64,
    /// Surface gravity in m/s²
    pub gravity: f64,
    /// Axial tilt in degrees
    pub axial_tilt_deg: f64,
    /// Sidereal rotation period in hours (negative for retrograde, 0 for none)
    pub rotation_period_hours: f64,
}

/// Everything needed to construct a body.
#[derive(Clone, Debug)]
pub struct BodyDescriptor {
    pub name: String,
    pub kind: BodyKind,
    pub attractor: Option<BodyId>,
    pub attributes: PhysicalAttributes,
    /// Orbital period in days (ignored for bodies without an attractor)
    pub orbital_period_days: f64,
    /// Mean anomaly at the epoch instant in degrees
    pub mean_anomaly_at_epoch_deg: f64,
    /// Flattening of the orbit shape, 0 for a circle
    pub eccentricity: f64,
}

/// A simulation entity: physical attributes plus orbital state and the
/// geometry derived from them.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    name: String,
    kind: BodyKind,
    attributes: PhysicalAttributes,
    orbital_period_days: f64,
    eccentricity: f64,
    orbit: OrbitalState,
    shape: Ellipse,
    scaled_diameter: f64,
    orbit_offset: Vector3d,
    position: Vector3d,
    spin_angle: f64,
}

impl CelestialBody {
    /// Build a body from its descriptor. Derived geometry stays empty until
    /// [`CelestialBody::apply_changes`] runs.
    pub fn new(descriptor: BodyDescriptor) -> Self {
        let orbit = match descriptor.attractor {
            Some(attractor) => OrbitalState::new(
                Some(attractor),
                descriptor.mean_anomaly_at_epoch_deg * DEG_TO_RAD,
                mean_motion_from_period(descriptor.orbital_period_days * SECONDS_PER_DAY),
            ),
            None => OrbitalState::stationary(),
        };

        Self {
            name: descriptor.name,
            kind: descriptor.kind,
            attributes: descriptor.attributes,
            orbital_period_days: descriptor.orbital_period_days,
            eccentricity: descriptor.eccentricity,
            orbit,
            shape: Ellipse::circle(0.0),
            scaled_diameter: 0.0,
            orbit_offset: Vector3d::ZERO,
            position: Vector3d::ZERO,
            spin_angle: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn attributes(&self) -> &PhysicalAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut PhysicalAttributes {
        &mut self.attributes
    }

    pub fn orbital_period_days(&self) -> f64 {
        self.orbital_period_days
    }

    /// Takes effect on the next [`CelestialBody::apply_changes`].
    pub fn set_orbital_period_days(&mut self, days: f64) {
        self.orbital_period_days = days;
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn shape(&self) -> &Ellipse {
        &self.shape
    }

    /// Diameter after scale multipliers, in scene units.
    pub fn scaled_diameter(&self) -> f64 {
        self.scaled_diameter
    }

    /// Semi-major radius of the scaled orbit.
    pub fn orbit_radius(&self) -> f64 {
        self.shape.x_radius
    }

    /// Offset from the attractor at the last materialization.
    pub fn orbit_offset(&self) -> Vector3d {
        self.orbit_offset
    }

    pub fn world_position(&self) -> Vector3d {
        self.position
    }

    /// Place an attractor-less body directly.
    pub fn set_world_position(&mut self, position: Vector3d) {
        self.position = position;
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    /// Axial tilt about Z followed by the current spin about the body's own axis.
    pub fn world_rotation(&self) -> DQuat {
        DQuat::from_rotation_z(self.attributes.axial_tilt_deg * DEG_TO_RAD)
            * DQuat::from_rotation_y(self.spin_angle)
    }

    /// Recompute scale-dependent geometry.
    ///
    /// `attractor_diameter` is the attractor's scaled diameter, so the orbit
    /// clears the attractor's rendered surface. Mean motion is re-derived from
    /// the orbital period; the current mean anomaly is left untouched.
    pub fn apply_changes(&mut self, scale: &ScaleSettings, attractor_diameter: Option<f64>) {
        let diameter_scale = match self.kind {
            BodyKind::Sun => scale.sun_diameter_scale,
            BodyKind::Planet | BodyKind::Moon => scale.diameter_scale,
        };
        self.scaled_diameter = self.attributes.diameter * diameter_scale;

        let Some(attractor_diameter) = attractor_diameter else {
            self.shape = Ellipse::circle(0.0);
            return;
        };

        let distance_scale = match self.kind {
            BodyKind::Moon => scale.moon_distance_scale,
            BodyKind::Sun | BodyKind::Planet => scale.distance_scale,
        };
        let radius = self.attributes.distance * distance_scale + attractor_diameter / 2.0;
        self.shape = Ellipse::from_eccentricity(radius, self.eccentricity);

        self.orbit
            .set_mean_motion(mean_motion_from_period(self.orbital_period_days * SECONDS_PER_DAY));
    }

    /// Advance axial spin by real elapsed time, independent of the orbital clock.
    pub fn spin(&mut self, real_dt_seconds: f64, spin_multiplier: f64) {
        let period_seconds = self.attributes.rotation_period_hours * SECONDS_PER_HOUR;
        if period_seconds == 0.0 || !period_seconds.is_finite() {
            return;
        }
        let delta = real_dt_seconds * spin_multiplier * TAU / period_seconds;
        self.spin_angle = (self.spin_angle + delta).rem_euclid(TAU);
    }
}

impl Orbiting for CelestialBody {
    fn orbital_state(&self) -> &OrbitalState {
        &self.orbit
    }

    fn orbital_state_mut(&mut self) -> &mut OrbitalState {
        &mut self.orbit
    }

    fn materialize(&mut self, attractor_position: Vector3d) {
        self.orbit_offset = self.orbit.offset_on(&self.shape);
        self.position = attractor_position + self.orbit_offset;
    }
}

/// Owner of every live body, keyed by [`BodyId`].
#[derive(Default)]
pub struct BodyRegistry {
    bodies: BTreeMap<BodyId, CelestialBody>,
    next_id: u32,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: CelestialBody) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, body);
        id
    }

    pub fn remove(&mut self, id: BodyId) -> Option<CelestialBody> {
        self.bodies.remove(&id)
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(&id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> + '_ {
        self.bodies.iter().map(|(&id, body)| (id, body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut CelestialBody)> + '_ {
        self.bodies.iter_mut().map(|(&id, body)| (id, body))
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.iter()
            .find(|(_, body)| body.name() == name)
            .map(|(id, _)| id)
    }

    /// Number of attractor links between `id` and the root; `None` if the
    /// chain is broken or cyclic.
    pub fn depth(&self, id: BodyId) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.get(id)?;
        while let Some(attractor) = current.attractor() {
            depth += 1;
            if depth > self.bodies.len() {
                return None;
            }
            current = self.get(attractor)?;
        }
        Some(depth)
    }

    /// Bodies orbiting `id` directly.
    pub fn satellites_of(&self, id: BodyId) -> Vec<BodyId> {
        self.iter()
            .filter(|(_, body)| body.attractor() == Some(id))
            .map(|(satellite, _)| satellite)
            .collect()
    }

    /// All live ids, attractors before their satellites; bodies with a
    /// broken chain come last.
    pub fn ids_by_depth(&self) -> Vec<BodyId> {
        let mut ids: Vec<(usize, BodyId)> = self
            .iter()
            .map(|(id, _)| (self.depth(id).unwrap_or(usize::MAX), id))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }
}
