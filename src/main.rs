//! Orrery - headless solar system clock
//!
//! Runs the preset solar system at a fixed frame rate and logs the simulated
//! date as it advances.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;

use orrery::config::SimulationConfig;
use orrery::plugin::{OrbitingBody, OrreryPlugin, SimulationSet};
use orrery::simulation::Simulation;
use orrery::time::rates;
use orrery::types::format_date;

fn main() -> AppExit {
    let config = SimulationConfig {
        speed_multiplier: rates::WEEK_PER_SEC,
        ..Default::default()
    };

    let simulation = match Simulation::with_solar_system(config) {
        Ok(simulation) => simulation,
        Err(err) => {
            eprintln!("Failed to build simulation: {err}");
            return AppExit::error();
        }
    };

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
            LogPlugin::default(),
        ))
        // Insert the simulation before the plugin that drives it
        .insert_resource(simulation)
        .add_plugins(OrreryPlugin)
        .add_systems(Startup, spawn_bodies)
        .add_systems(Update, report_clock.after(SimulationSet))
        .run()
}

fn spawn_bodies(mut commands: Commands, simulation: Res<Simulation>) {
    for (id, body) in simulation.bodies().iter() {
        commands.spawn((
            Name::new(body.name().to_owned()),
            OrbitingBody(id),
            Transform::from_translation(body.world_position().as_vec3()),
        ));
    }
}

/// Log the simulated date whenever it rolls over.
fn report_clock(simulation: Res<Simulation>, mut last: Local<String>) {
    let date = format_date(simulation.current_time());
    if *last != date {
        info!("{}", date);
        *last = date;
    }
}
