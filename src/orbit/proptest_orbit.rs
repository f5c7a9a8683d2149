//! Property-based tests for orbit evaluation using proptest.
//!
//! These verify that positions depend only on elapsed time since the epoch,
//! across a wide range of shapes, rates and instants.

use proptest::prelude::*;
use std::f64::consts::TAU;

use super::{Ellipse, OrbitalState, mean_anomaly_at, mean_motion_from_period};
use crate::bodies::{BodyRegistry, CelestialBody};
use crate::config::ScaleSettings;
use crate::test_utils::fixtures;
use crate::time::TimeController;
use crate::types::SECONDS_PER_DAY;
use crate::vector3d::Vector3d;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Evaluating the shape is periodic with period 1 in progress.
    #[test]
    fn prop_evaluate_is_periodic(
        x_radius in 0.1f64..1000.0,
        y_radius in 0.1f64..1000.0,
        progress in -10.0f64..10.0,
        turns in -5i32..5,
    ) {
        let shape = Ellipse::new(x_radius, y_radius);
        let a = shape.evaluate(progress);
        let b = shape.evaluate(progress + turns as f64);

        let tolerance = 1e-9 * x_radius.max(y_radius);
        prop_assert!((a - b).length() < tolerance, "{:?} vs {:?}", a, b);
    }

    /// Every evaluated point lies on the ellipse: (x/a)² + (y/b)² = 1.
    #[test]
    fn prop_evaluate_stays_on_ellipse(
        semi_major in 0.1f64..1000.0,
        eccentricity in 0.0f64..0.95,
        progress in 0.0f64..1.0,
    ) {
        let shape = Ellipse::from_eccentricity(semi_major, eccentricity);
        let p = shape.evaluate(progress);
        let on_curve = (p.x / shape.x_radius).powi(2) + (p.y / shape.y_radius).powi(2);
        prop_assert!((on_curve - 1.0).abs() < 1e-9, "on_curve = {}", on_curve);
    }

    /// Progress always folds into a single revolution.
    #[test]
    fn prop_progress_in_unit_interval(anomaly in -1.0e6f64..1.0e6) {
        let state = OrbitalState::new(None, anomaly, 1.0);
        let progress = state.progress();
        prop_assert!((0.0..1.0).contains(&progress), "progress = {}", progress);
    }

    /// Jumping forward then back by the same amount restores the anomaly.
    #[test]
    fn prop_time_reversal_restores_anomaly(
        anomaly_at_epoch in 0.0f64..TAU,
        period_days in 0.5f64..60_000.0,
        start_days in -36_500.0f64..36_500.0,
        delta_days in -3650.0f64..3650.0,
    ) {
        let mean_motion = mean_motion_from_period(period_days * SECONDS_PER_DAY);
        let start = start_days * SECONDS_PER_DAY;
        let delta = delta_days * SECONDS_PER_DAY;

        let before = mean_anomaly_at(anomaly_at_epoch, mean_motion, start);
        let there = mean_anomaly_at(anomaly_at_epoch, mean_motion, start + delta);
        let back = mean_anomaly_at(anomaly_at_epoch, mean_motion, start + delta - delta);

        prop_assert!(there.is_finite());
        prop_assert!((back - before).abs() < 1e-9, "{} vs {}", back, before);
    }

    /// Reaching an instant by any sequence of scrubs gives the same positions
    /// as jumping there directly.
    #[test]
    fn prop_positions_depend_only_on_instant(
        target_days in -10_000.0f64..10_000.0,
        detours in prop::collection::vec(-10_000.0f64..10_000.0, 0..6),
    ) {
        let scale = ScaleSettings::default();
        let mut direct = BodyRegistry::new();
        let sun = direct.insert(CelestialBody::new(fixtures::sun()));
        let planet = direct.insert(CelestialBody::new(fixtures::planet(sun, 150.0, 365.25)));
        let moon = direct.insert(CelestialBody::new(fixtures::moon(planet, 0.4, 27.3)));

        let sun_diameter = fixtures::SUN_DIAMETER * scale.sun_diameter_scale;
        let planet_diameter = fixtures::PLANET_DIAMETER * scale.diameter_scale;
        direct.get_mut(sun).unwrap().apply_changes(&scale, None);
        direct.get_mut(planet).unwrap().apply_changes(&scale, Some(sun_diameter));
        direct.get_mut(moon).unwrap().apply_changes(&scale, Some(planet_diameter));
        let mut wandering = clone_registry(&direct);

        let mut clock_a = TimeController::new(0.0, 1.0);
        let mut clock_b = TimeController::new(0.0, 1.0);
        for id in [planet, moon] {
            clock_a.register(id, &direct).unwrap();
            clock_b.register(id, &wandering).unwrap();
        }

        let target = target_days * SECONDS_PER_DAY;
        clock_a.set_global_time(target, &mut direct).unwrap();
        for detour in detours {
            clock_b.set_global_time(detour * SECONDS_PER_DAY, &mut wandering).unwrap();
        }
        clock_b.set_global_time(target, &mut wandering).unwrap();

        for id in [planet, moon] {
            let a = direct.get(id).unwrap().world_position();
            let b = wandering.get(id).unwrap().world_position();
            prop_assert!(a.x == b.x && a.y == b.y && a.z == b.z, "{} vs {}", a, b);
        }
    }

    /// Normalizing never yields NaN and is either zero or unit length.
    #[test]
    fn prop_normalized_is_unit_or_zero(
        x in -1.0e6f64..1.0e6,
        y in -1.0e6f64..1.0e6,
        z in -1.0e6f64..1.0e6,
    ) {
        let n = Vector3d::new(x, y, z).normalized();
        prop_assert!(n.is_finite());
        let length = n.magnitude();
        prop_assert!(length == 0.0 || (length - 1.0).abs() < 1e-12, "length = {}", length);
    }
}

/// Bodies are inserted in the same order so ids line up with `source`.
fn clone_registry(source: &BodyRegistry) -> BodyRegistry {
    let mut copy = BodyRegistry::new();
    for (_, body) in source.iter() {
        copy.insert(body.clone());
    }
    copy
}
