//! Bevy integration: drives the [`Simulation`] resource from frame time and
//! mirrors body state onto entity transforms.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::bodies::BodyId;
use crate::config::SimulationConfig;
use crate::simulation::Simulation;

/// Ties an entity to a simulated body. Despawning the entity destroys the body.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrbitingBody(pub BodyId);

/// Entity → body lookup, needed once the component itself is gone.
#[derive(Resource, Default, Debug)]
pub struct BodyEntities(HashMap<Entity, BodyId>);

impl BodyEntities {
    pub fn get(&self, entity: Entity) -> Option<BodyId> {
        self.0.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// System set label for the per-frame simulation pass (clock, lifecycle, sync).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

/// Advances the [`Simulation`] resource once per frame.
///
/// An app that inserts its own `Simulation` keeps it. Otherwise the preset
/// solar system is loaded from the app's [`SimulationConfig`] resource, or
/// from the default configuration.
pub struct OrreryPlugin;

impl Plugin for OrreryPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Simulation>() {
            let config = app
                .world()
                .get_resource::<SimulationConfig>()
                .cloned()
                .unwrap_or_default();
            match Simulation::with_solar_system(config) {
                Ok(simulation) => {
                    app.insert_resource(simulation);
                }
                Err(err) => error!("Simulation not started: {}", err),
            }
        }

        app.init_resource::<BodyEntities>().add_systems(
            Update,
            (
                track_body_entities,
                release_despawned_bodies,
                advance_simulation,
                sync_body_transforms,
            )
                .chain()
                .in_set(SimulationSet)
                .run_if(resource_exists::<Simulation>),
        );
    }
}

/// Tick the clock and axial spin by the frame's real delta.
pub fn advance_simulation(time: Res<Time>, mut simulation: ResMut<Simulation>) {
    simulation.tick(time.delta_secs_f64());
}

pub fn track_body_entities(
    query: Query<(Entity, &OrbitingBody), Added<OrbitingBody>>,
    mut entities: ResMut<BodyEntities>,
) {
    for (entity, body) in query.iter() {
        entities.0.insert(entity, body.0);
    }
}

/// Destroy the body behind every entity that lost its [`OrbitingBody`] tag.
pub fn release_despawned_bodies(
    mut removed: RemovedComponents<OrbitingBody>,
    mut entities: ResMut<BodyEntities>,
    mut simulation: ResMut<Simulation>,
) {
    for entity in removed.read() {
        if let Some(id) = entities.0.remove(&entity) {
            simulation.destroy_body(id);
        }
    }
}

/// Copy world position, rotation and scaled diameter onto each tagged entity.
pub fn sync_body_transforms(
    simulation: Res<Simulation>,
    mut query: Query<(&OrbitingBody, &mut Transform)>,
) {
    for (body, mut transform) in query.iter_mut() {
        let Some(body) = simulation.body(body.0) else {
            continue;
        };
        transform.translation = body.world_position().as_vec3();
        transform.rotation = body.world_rotation().as_quat();
        transform.scale = Vec3::splat(body.scaled_diameter() as f32);
    }
}
