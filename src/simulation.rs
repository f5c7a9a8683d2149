//! Simulation context: the one object that owns every body and the clock.
//!
//! Constructed explicitly by the host session and handed to whatever needs
//! it (as a Bevy resource in the app, or directly in tests). All external
//! operations go through here so body geometry and the clock stay in step.

use bevy::math::DQuat;
use bevy::prelude::*;

use crate::bodies::{BodyDescriptor, BodyId, BodyRegistry, CelestialBody, PresetBody, solar_system};
use crate::config::{ConfigError, ScaleSettings, SimulationConfig};
use crate::orbit::Orbiting;
use crate::time::{RegistrationError, TimeController, TimeError};
use crate::vector3d::Vector3d;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("time error: {0}")]
    Time(#[from] TimeError),
}

#[derive(Resource)]
pub struct Simulation {
    config: SimulationConfig,
    bodies: BodyRegistry,
    clock: TimeController,
}

impl Simulation {
    /// Empty simulation with the clock at the configured epoch.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let epoch = config.epoch.to_j2000_seconds()?;

        let mut clock = TimeController::new(epoch, config.speed_multiplier);
        if config.start_paused {
            clock.pause();
        }

        Ok(Self {
            config,
            bodies: BodyRegistry::new(),
            clock,
        })
    }

    /// Simulation populated with the preset solar system, every orbiting body registered.
    pub fn with_solar_system(config: SimulationConfig) -> Result<Self, SimulationError> {
        let mut simulation = Self::new(config)?;
        simulation.load_solar_system()?;
        Ok(simulation)
    }

    /// Add and register every body of the preset solar system.
    pub fn load_solar_system(&mut self) -> Result<Vec<BodyId>, RegistrationError> {
        self.load_presets(solar_system())
    }

    /// Add and register `presets` in order, resolving attractors by name.
    /// Attractors must appear before their satellites.
    pub fn load_presets(
        &mut self,
        presets: &[PresetBody],
    ) -> Result<Vec<BodyId>, RegistrationError> {
        let mut ids = Vec::with_capacity(presets.len());
        for preset in presets {
            let attractor = match preset.attractor {
                Some(name) => Some(self.bodies.find_by_name(name).ok_or_else(|| {
                    RegistrationError::UnknownAttractorName {
                        body: preset.name.to_owned(),
                        attractor: name.to_owned(),
                    }
                })?),
                None => None,
            };
            ids.push(self.spawn_body(preset.descriptor(attractor))?);
        }
        info!("Loaded {} bodies, {} orbiting", ids.len(), self.clock.active_count());
        Ok(ids)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &TimeController {
        &self.clock
    }

    pub fn bodies(&self) -> &BodyRegistry {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies.find_by_name(name)
    }

    /// Insert a body without registering it with the clock.
    ///
    /// Its geometry is built immediately; attractor-less bodies are placed at
    /// the configured root position.
    pub fn add_body(&mut self, descriptor: BodyDescriptor) -> Result<BodyId, RegistrationError> {
        check_attribute(&descriptor.name, "distance", descriptor.attributes.distance)?;
        check_attribute(&descriptor.name, "diameter", descriptor.attributes.diameter)?;
        if !(0.0..1.0).contains(&descriptor.eccentricity) {
            return Err(RegistrationError::InvalidEccentricity {
                body: descriptor.name,
                eccentricity: descriptor.eccentricity,
            });
        }
        if let Some(attractor) = descriptor.attractor
            && !self.bodies.contains(attractor)
        {
            return Err(RegistrationError::UnknownAttractor {
                body: descriptor.name,
                attractor,
            });
        }

        let is_root = descriptor.attractor.is_none();
        let id = self.bodies.insert(CelestialBody::new(descriptor));
        self.rebuild_geometry(id);
        if is_root && let Some(body) = self.bodies.get_mut(id) {
            body.set_world_position(self.config.root_position);
        }
        Ok(id)
    }

    /// Capture the epoch snapshot for `id` and bring it to the current instant.
    pub fn register_body(&mut self, id: BodyId) -> Result<(), RegistrationError> {
        self.clock.register(id, &self.bodies)?;
        self.refresh();
        Ok(())
    }

    /// Add a body and register it if it orbits something. A body the clock
    /// rejects is removed again.
    pub fn spawn_body(&mut self, descriptor: BodyDescriptor) -> Result<BodyId, RegistrationError> {
        let orbits = descriptor.attractor.is_some();
        let id = self.add_body(descriptor)?;
        if orbits && let Err(err) = self.register_body(id) {
            self.bodies.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Register every orbiting body not yet registered, attractors first.
    pub fn register_all(&mut self) -> Result<usize, RegistrationError> {
        let pending: Vec<BodyId> = self
            .bodies
            .ids_by_depth()
            .into_iter()
            .filter(|&id| !self.clock.is_registered(id))
            .filter(|&id| self.bodies.get(id).is_some_and(|b| b.attractor().is_some()))
            .collect();
        for &id in &pending {
            self.clock.register(id, &self.bodies)?;
        }
        self.refresh();
        Ok(pending.len())
    }

    /// Remove a body. The clock prunes it, and any satellite left without an
    /// attractor, on its next pass.
    pub fn destroy_body(&mut self, id: BodyId) -> Option<CelestialBody> {
        let body = self.bodies.remove(id)?;
        info!("Destroyed {}", body.name());
        Some(body)
    }

    /// Advance one host frame. Orbits follow the simulated clock; axial spin
    /// follows real time so it stays smooth while the clock is paused or scrubbed.
    pub fn tick(&mut self, real_dt_seconds: f64) {
        self.clock.tick(real_dt_seconds, &mut self.bodies);

        if real_dt_seconds.is_finite() && real_dt_seconds >= 0.0 {
            let multiplier = self.config.spin_multiplier;
            for (_, body) in self.bodies.iter_mut() {
                body.spin(real_dt_seconds, multiplier);
            }
        }
    }

    /// Scrub to an absolute instant (seconds since J2000).
    pub fn set_global_time(&mut self, instant: f64) -> Result<(), TimeError> {
        self.clock.set_global_time(instant, &mut self.bodies)?;
        info!("Jumped to {}", crate::types::format_date(instant));
        Ok(())
    }

    pub fn jump_by(&mut self, seconds: f64) -> Result<(), TimeError> {
        self.clock.jump_by(seconds, &mut self.bodies)
    }

    pub fn reset_to_epoch(&mut self) -> Result<(), TimeError> {
        self.clock.reset_to_epoch(&mut self.bodies)
    }

    pub fn jump_to_now(&mut self) -> Result<(), TimeError> {
        self.clock.jump_to_now(&mut self.bodies)
    }

    pub fn set_speed_multiplier(&mut self, seconds_per_real_second: f64) -> Result<(), TimeError> {
        self.clock.set_speed_multiplier(seconds_per_real_second)
    }

    /// Current simulated instant in seconds since J2000.
    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
    }

    pub fn world_position(&self, id: BodyId) -> Option<Vector3d> {
        self.bodies.get(id).map(|b| b.world_position())
    }

    pub fn world_rotation(&self, id: BodyId) -> Option<DQuat> {
        self.bodies.get(id).map(|b| b.world_rotation())
    }

    /// Rebuild `id`'s derived geometry and that of its satellites, then
    /// re-materialize everything at the current instant.
    pub fn apply_changes(&mut self, id: BodyId) -> Result<(), RegistrationError> {
        if !self.bodies.contains(id) {
            return Err(RegistrationError::UnknownBody(id));
        }
        self.rebuild_geometry(id);
        for satellite in self.bodies.satellites_of(id) {
            self.rebuild_geometry(satellite);
        }
        self.refresh();
        Ok(())
    }

    /// Edit a body's orbital period. Non-positive periods are rejected and
    /// leave the body unchanged.
    pub fn set_orbital_period(&mut self, id: BodyId, days: f64) -> Result<(), RegistrationError> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(RegistrationError::UnknownBody(id))?;
        if !(days.is_finite() && days > 0.0) {
            return Err(RegistrationError::InvalidMeanMotion {
                body: body.name().to_owned(),
                mean_motion: crate::orbit::mean_motion_from_period(
                    days * crate::types::SECONDS_PER_DAY,
                ),
            });
        }
        body.set_orbital_period_days(days);
        self.apply_changes(id)
    }

    /// Edit the distance from the attractor. Negative or non-finite values
    /// are rejected and leave the body unchanged.
    pub fn set_distance(&mut self, id: BodyId, distance: f64) -> Result<(), RegistrationError> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(RegistrationError::UnknownBody(id))?;
        check_attribute(body.name(), "distance", distance)?;
        body.attributes_mut().distance = distance;
        self.apply_changes(id)
    }

    /// Edit the diameter. Negative or non-finite values are rejected and
    /// leave the body unchanged.
    pub fn set_diameter(&mut self, id: BodyId, diameter: f64) -> Result<(), RegistrationError> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(RegistrationError::UnknownBody(id))?;
        check_attribute(body.name(), "diameter", diameter)?;
        body.attributes_mut().diameter = diameter;
        self.apply_changes(id)
    }

    /// Replace the scale multipliers and rebuild every body's geometry.
    pub fn set_scale(&mut self, scale: ScaleSettings) -> Result<(), ConfigError> {
        scale.validate()?;
        self.config.scale = scale;
        for id in self.bodies.ids_by_depth() {
            self.rebuild_geometry(id);
        }
        self.refresh();
        Ok(())
    }

    fn rebuild_geometry(&mut self, id: BodyId) {
        let attractor_diameter = self
            .bodies
            .get(id)
            .and_then(|b| b.attractor())
            .and_then(|a| self.bodies.get(a))
            .map(|a| a.scaled_diameter());
        let scale = self.config.scale;
        if let Some(body) = self.bodies.get_mut(id) {
            body.apply_changes(&scale, attractor_diameter);
        }
    }

    /// Re-materialize at the current instant, pruning any body that overflows.
    fn refresh(&mut self) {
        self.clock.recompute_isolated(&mut self.bodies);
    }
}

fn check_attribute(body: &str, name: &'static str, value: f64) -> Result<(), RegistrationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RegistrationError::InvalidAttribute {
            body: body.to_owned(),
            name,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpochConfig;
    use crate::test_utils::fixtures;
    use crate::types::SECONDS_PER_DAY;
    use approx::assert_relative_eq;

    fn simulation() -> Simulation {
        Simulation::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            epoch: EpochConfig::new(2000, 0, 1, 0, 0),
            ..Default::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_start_paused() {
        let config = SimulationConfig {
            start_paused: true,
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.tick(1.0);
        assert_eq!(sim.current_time(), 0.0);
    }

    #[test]
    fn test_solar_system_loads() {
        let sim = Simulation::with_solar_system(SimulationConfig::default()).unwrap();
        assert_eq!(sim.bodies().len(), solar_system().len());
        assert_eq!(sim.clock().active_count(), solar_system().len() - 1);

        let sun = sim.find_by_name("Sun").unwrap();
        assert_eq!(sim.world_position(sun), Some(Vector3d::ZERO));
    }

    #[test]
    fn test_root_position_from_config() {
        let config = SimulationConfig {
            root_position: Vector3d::new(5.0, 0.0, -5.0),
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let planet = sim.spawn_body(fixtures::planet(sun, 10.0, 100.0)).unwrap();

        assert_eq!(sim.world_position(sun), Some(Vector3d::new(5.0, 0.0, -5.0)));
        let offset = sim.body(planet).unwrap().orbit_offset();
        assert_eq!(
            sim.world_position(planet),
            Some(Vector3d::new(5.0, 0.0, -5.0) + offset)
        );
    }

    #[test]
    fn test_spawn_rejects_and_removes_bad_period() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let result = sim.spawn_body(fixtures::planet(sun, 10.0, 0.0));

        assert!(matches!(result, Err(RegistrationError::InvalidMeanMotion { .. })));
        assert_eq!(sim.bodies().len(), 1);
    }

    #[test]
    fn test_spawn_rejects_bad_eccentricity() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let mut descriptor = fixtures::planet(sun, 10.0, 100.0);
        descriptor.eccentricity = 1.0;

        assert!(matches!(
            sim.spawn_body(descriptor),
            Err(RegistrationError::InvalidEccentricity { .. })
        ));
    }

    #[test]
    fn test_register_all_scans_unregistered() {
        let mut sim = simulation();
        let sun = sim.add_body(fixtures::sun()).unwrap();
        let planet = sim.add_body(fixtures::planet(sun, 10.0, 100.0)).unwrap();
        sim.add_body(fixtures::moon(planet, 0.1, 5.0)).unwrap();

        assert_eq!(sim.register_all(), Ok(2));
        assert_eq!(sim.register_all(), Ok(0));
        assert_eq!(sim.clock().active_count(), 2);
    }

    #[test]
    fn test_set_orbital_period_keeps_epoch_snapshot() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let planet = sim.spawn_body(fixtures::planet(sun, 10.0, 100.0)).unwrap();
        let snapshot = sim.clock().anomaly_at_epoch(planet);

        sim.set_orbital_period(planet, 50.0).unwrap();
        sim.set_global_time(25.0 * SECONDS_PER_DAY).unwrap();

        assert_eq!(sim.clock().anomaly_at_epoch(planet), snapshot);
        let anomaly = sim.body(planet).unwrap().mean_anomaly();
        assert_relative_eq!(anomaly - snapshot.unwrap(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_set_orbital_period_rejects_zero() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let planet = sim.spawn_body(fixtures::planet(sun, 10.0, 100.0)).unwrap();

        assert!(sim.set_orbital_period(planet, 0.0).is_err());
        assert_eq!(sim.body(planet).unwrap().orbital_period_days(), 100.0);
    }

    #[test]
    fn test_diameter_change_pushes_satellite_orbit_out() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let planet = sim.spawn_body(fixtures::planet(sun, 10.0, 100.0)).unwrap();
        let moon = sim.spawn_body(fixtures::moon(planet, 0.1, 5.0)).unwrap();
        let before = sim.body(moon).unwrap().orbit_radius();

        sim.set_diameter(planet, 100.0).unwrap();

        let after = sim.body(moon).unwrap().orbit_radius();
        let grown = (100.0 - fixtures::PLANET_DIAMETER) * sim.config().scale.diameter_scale / 2.0;
        assert_relative_eq!(after - before, grown, epsilon = 1e-9);

        let planet_pos = sim.world_position(planet).unwrap();
        let offset = sim.body(moon).unwrap().orbit_offset();
        assert_eq!(sim.world_position(moon), Some(planet_pos + offset));
    }

    #[test]
    fn test_set_scale_rebuilds_all() {
        let mut sim = Simulation::with_solar_system(SimulationConfig::default()).unwrap();
        let earth = sim.find_by_name("Earth").unwrap();
        let before = sim.body(earth).unwrap().orbit_radius();

        let mut scale = sim.config().scale;
        scale.distance_scale *= 2.0;
        sim.set_scale(scale).unwrap();

        let after = sim.body(earth).unwrap().orbit_radius();
        assert_relative_eq!(
            after - before,
            149.6 * ScaleSettings::default().distance_scale,
            epsilon = 1e-9
        );
        assert!(sim.set_scale(ScaleSettings { diameter_scale: -1.0, ..scale }).is_err());
    }

    #[test]
    fn test_spin_ignores_pause() {
        let mut sim = Simulation::with_solar_system(SimulationConfig::default()).unwrap();
        let earth = sim.find_by_name("Earth").unwrap();
        sim.pause();

        let before = sim.world_rotation(earth).unwrap();
        let position = sim.world_position(earth).unwrap();
        sim.tick(0.5);

        assert_ne!(sim.world_rotation(earth).unwrap(), before);
        assert_eq!(sim.world_position(earth).unwrap().x, position.x);
    }

    #[test]
    fn test_add_body_rejects_invalid_attributes() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();

        let mut descriptor = fixtures::planet(sun, f64::NAN, 100.0);
        assert!(matches!(
            sim.spawn_body(descriptor.clone()),
            Err(RegistrationError::InvalidAttribute { name: "distance", .. })
        ));
        descriptor.attributes.distance = 10.0;
        descriptor.attributes.diameter = -3.0;
        assert!(matches!(
            sim.spawn_body(descriptor),
            Err(RegistrationError::InvalidAttribute { name: "diameter", .. })
        ));
        assert_eq!(sim.bodies().len(), 1);
    }

    #[test]
    fn test_rejected_edit_leaves_body_unchanged() {
        let mut sim = simulation();
        let sun = sim.spawn_body(fixtures::sun()).unwrap();
        let planet = sim.spawn_body(fixtures::planet(sun, 10.0, 100.0)).unwrap();
        let moon = sim.spawn_body(fixtures::moon(planet, 0.1, 5.0)).unwrap();
        let moon_radius = sim.body(moon).unwrap().orbit_radius();

        assert!(sim.set_distance(planet, -1.0).is_err());
        assert!(sim.set_distance(planet, f64::INFINITY).is_err());
        assert!(sim.set_diameter(planet, f64::NAN).is_err());

        let body = sim.body(planet).unwrap();
        assert_eq!(body.attributes().distance, 10.0);
        assert_eq!(body.attributes().diameter, fixtures::PLANET_DIAMETER);
        assert_eq!(sim.body(moon).unwrap().orbit_radius(), moon_radius);

        sim.tick(1.0);
        assert!(sim.world_position(moon).unwrap().is_finite());
        assert_eq!(sim.set_distance(planet, 0.0), Ok(()));
    }

    #[test]
    fn test_unknown_preset_attractor_name() {
        let mut sim = simulation();
        let stray = PresetBody {
            name: "Stray",
            kind: crate::bodies::BodyKind::Moon,
            attractor: Some("Vulcan"),
            distance: 1.0,
            diameter: 1.0,
            gravity: 1.0,
            axial_tilt_deg: 0.0,
            rotation_period_hours: 24.0,
            orbital_period_days: 10.0,
            mean_anomaly_at_epoch_deg: 0.0,
            eccentricity: 0.0,
        };

        let result = sim.load_presets(&[stray]);
        assert!(matches!(
            result,
            Err(RegistrationError::UnknownAttractorName { ref attractor, .. })
                if attractor == "Vulcan"
        ));
        assert!(sim.bodies().is_empty());
    }

    #[test]
    fn test_destroy_body_prunes_on_next_tick() {
        let mut sim = Simulation::with_solar_system(SimulationConfig::default()).unwrap();
        let jupiter = sim.find_by_name("Jupiter").unwrap();
        let active = sim.clock().active_count();

        assert!(sim.destroy_body(jupiter).is_some());
        sim.tick(0.1);

        // Jupiter plus its four moons
        assert_eq!(sim.clock().active_count(), active - 5);
        assert!(sim.destroy_body(jupiter).is_none());
    }
}
