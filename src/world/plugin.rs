//! World plugin - scene loading, tile layers, collision, camera, and debug view.

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy_rapier2d::prelude::*;

use crate::core::{GameConfig, GameState, LoadSet, SceneAssets};
use crate::player::{spawn_player, PlayerAnimations, PlayerSet};

use super::builder::{spawn_tile_colliders, spawn_tile_layers, tileset_layout};
use super::camera::{follow_player, spawn_camera, CameraBounds};
use super::data::{load_scene_definitions, map_to_world, CurrentScene, SceneRegistry};
use super::debug::{enable_debug_graphics, CollidingTiles, DebugGraphics};

/// Name of the object marking where the player starts.
pub const SPAWN_POINT: &str = "Spawn Point";

/// World plugin - handles scene data and scene setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugGraphics>()
            .add_systems(
                OnEnter(GameState::Loading),
                load_scene_definitions.in_set(LoadSet::Data),
            )
            .add_systems(
                OnEnter(GameState::InGame),
                (configure_physics, setup_scene.after(PlayerSet::Animations)),
            )
            .add_systems(
                Update,
                enable_debug_graphics.run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                PostUpdate,
                follow_player
                    .after(PhysicsSet::Writeback)
                    .before(TransformSystem::TransformPropagate),
            );
    }
}

/// Apply the configured gravity to the physics world.
fn configure_physics(config: Res<GameConfig>, mut rapier_config: Query<&mut RapierConfiguration>) {
    for mut rapier in rapier_config.iter_mut() {
        rapier.gravity = config.world_gravity();
    }
}

/// Build the current scene: tile layers, colliders, player, and camera.
pub fn setup_scene(
    mut commands: Commands,
    config: Res<GameConfig>,
    scene_registry: Res<SceneRegistry>,
    current_scene: Res<CurrentScene>,
    assets: Res<SceneAssets>,
    animations: Option<Res<PlayerAnimations>>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let Some(scene) = scene_registry.get(&current_scene.name) else {
        error!("Scene '{}' not found in registry!", current_scene.name);
        return;
    };

    info!("Building scene: {}", scene.name);
    info!(
        "Map size: {}x{} px",
        scene.width_in_pixels(),
        scene.height_in_pixels()
    );

    let layout = layouts.add(tileset_layout(scene));
    spawn_tile_layers(&mut commands, scene, assets.tileset.clone(), layout);

    spawn_tile_colliders(&mut commands, scene);

    commands.insert_resource(CollidingTiles {
        cells: scene.colliding_tiles(),
        tile_size: scene.tile_size,
    });

    let bounds = Rect::from_corners(
        Vec2::ZERO,
        map_to_world(Vec2::new(scene.width_in_pixels(), scene.height_in_pixels())),
    );
    commands.insert_resource(CameraBounds(bounds));

    let spawn = match scene.require_object(SPAWN_POINT) {
        Ok(object) => map_to_world(Vec2::new(object.x, object.y)),
        Err(e) => {
            warn!("{} in scene '{}', spawning at map center", e, scene.name);
            bounds.center()
        }
    };

    match animations {
        Some(animations) => {
            spawn_player(
                &mut commands,
                spawn,
                &config.player,
                assets.atlas.clone(),
                &animations,
            );
        }
        None => error!("Player animations missing, not spawning the player"),
    }

    spawn_camera(&mut commands, spawn);
}

#[cfg(test)]
mod tests {
    use super::super::builder::TileLayer;
    use super::super::camera::MainCamera;
    use super::super::data::{SceneDefinition, SceneDefinitionRaw};
    use super::*;
    use crate::player::{Player, PLAYER_Z};
    use bevy::ecs::system::RunSystemOnce;
    use std::collections::HashMap;

    const SCENE: &str = r###"(
        name: "yard",
        tile_size: 32.0,
        tileset: (image: "tilesets/yard.png", columns: 4, rows: 4),
        palette: {
            '.': (tile: 0),
            '#': (tile: 5, collided: true),
        },
        layers: [
            (name: "Below Layer", rows: ["....", "....", "...."]),
            (name: "World Layer", rows: ["##  ", "    ", " ###"]),
            (name: "Above Layer", rows: ["    ", " .  ", "    "]),
        ],
        objects: [
            (name: "Spawn Point", x: 48.0, y: 80.0),
        ],
    )"###;

    fn yard(src: &str) -> SceneDefinition {
        let raw: SceneDefinitionRaw = ron::from_str(src).expect("valid RON");
        SceneDefinition::from_raw(raw).expect("valid scene")
    }

    fn scene_world(scene: SceneDefinition, current: &str) -> World {
        let mut world = World::new();
        world.insert_resource(GameConfig::default());
        world.insert_resource(SceneAssets::default());
        world.init_resource::<Assets<TextureAtlasLayout>>();

        let mut registry = SceneRegistry::default();
        registry.scenes.insert(scene.name.clone(), scene);
        world.insert_resource(registry);
        world.insert_resource(CurrentScene {
            name: current.to_string(),
        });

        world.insert_resource(PlayerAnimations {
            walk: HashMap::new(),
            idle: HashMap::new(),
            spawn_frame: 0,
            layout: Handle::default(),
        });
        world
    }

    fn player_translation(world: &mut World) -> Vec3 {
        world
            .query_filtered::<&Transform, With<Player>>()
            .single(world)
            .translation
    }

    #[test]
    fn test_player_spawns_at_spawn_point_above_layers() {
        let mut world = scene_world(yard(SCENE), "yard");
        world.run_system_once(setup_scene).expect("system runs");

        assert_eq!(player_translation(&mut world), Vec3::new(48.0, -80.0, PLAYER_Z));

        let layer_z: Vec<f32> = world
            .query_filtered::<&Transform, With<TileLayer>>()
            .iter(&world)
            .map(|t| t.translation.z)
            .collect();
        assert_eq!(layer_z.len(), 3);
        assert!(layer_z.iter().all(|&z| z < PLAYER_Z));

        let mut layer_names: Vec<String> = world
            .query_filtered::<&Name, With<TileLayer>>()
            .iter(&world)
            .map(|name| name.as_str().to_string())
            .collect();
        layer_names.sort();
        assert_eq!(layer_names, vec!["Above Layer", "Below Layer", "World Layer"]);

        let camera = world
            .query_filtered::<&Transform, With<MainCamera>>()
            .single(&world)
            .translation;
        assert_eq!(camera.truncate(), Vec2::new(48.0, -80.0));
    }

    #[test]
    fn test_collision_and_bounds_resources() {
        let mut world = scene_world(yard(SCENE), "yard");
        world.run_system_once(setup_scene).expect("system runs");

        let tiles = world.resource::<CollidingTiles>();
        assert_eq!(tiles.cells, vec![(0, 0), (1, 0), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(tiles.tile_size, 32.0);

        let bounds = world.resource::<CameraBounds>().0;
        assert_eq!(bounds, Rect::new(0.0, -96.0, 128.0, 0.0));
    }

    #[test]
    fn test_missing_spawn_point_uses_map_center() {
        let src = SCENE.replace("(name: \"Spawn Point\", x: 48.0, y: 80.0),", "");
        let mut world = scene_world(yard(&src), "yard");
        world.run_system_once(setup_scene).expect("system runs");

        assert_eq!(player_translation(&mut world), Vec3::new(64.0, -48.0, PLAYER_Z));
    }

    #[test]
    fn test_missing_scene_builds_nothing() {
        let mut world = scene_world(yard(SCENE), "elsewhere");
        world.run_system_once(setup_scene).expect("system runs");

        assert_eq!(
            world.query_filtered::<(), With<Player>>().iter(&world).count(),
            0
        );
        assert_eq!(
            world.query_filtered::<(), With<TileLayer>>().iter(&world).count(),
            0
        );
        assert!(!world.contains_resource::<CameraBounds>());
        assert!(!world.contains_resource::<CollidingTiles>());
    }

    #[test]
    fn test_missing_animations_skips_player_only() {
        let mut world = scene_world(yard(SCENE), "yard");
        world.remove_resource::<PlayerAnimations>();
        world.run_system_once(setup_scene).expect("system runs");

        assert_eq!(
            world.query_filtered::<(), With<Player>>().iter(&world).count(),
            0
        );
        assert_eq!(
            world.query_filtered::<(), With<MainCamera>>().iter(&world).count(),
            1
        );
    }
}
