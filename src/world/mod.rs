//! World module - scene data, tile layers, collision, and camera.

mod builder;
mod camera;
mod data;
mod debug;
mod error;
mod plugin;

pub use builder::{merge_tiles_into_strips, SceneGeometry, TileCollider, TileLayer, TileStrip};
pub use camera::{clamp_camera, CameraBounds, MainCamera};
pub use data::{
    load_scene_file, map_to_world, read_ron_file, world_to_map, CurrentScene, ObjectDef,
    ResolvedLayer, ResolvedTile, SceneDefinition, SceneRegistry,
};
pub use debug::{CollidingTiles, CollisionOverlay, DebugGraphics, FaceEdge};
pub use error::DataLoadError;
pub use plugin::{setup_scene, WorldPlugin, SPAWN_POINT};
