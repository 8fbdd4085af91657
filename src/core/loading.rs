//! Asset preload: request the scene's images and wait for them.

use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;

use super::config::GameConfig;
use super::states::GameState;
use crate::player::AtlasRegistry;
use crate::world::{CurrentScene, SceneRegistry};

/// Handles to the images the scene needs before it can be built.
#[derive(Resource, Default)]
pub struct SceneAssets {
    pub tileset: Handle<Image>,
    pub atlas: Handle<Image>,
}

impl SceneAssets {
    fn handles(&self) -> [(&'static str, UntypedAssetId); 2] {
        [
            ("tileset", self.tileset.id().untyped()),
            ("atlas", self.atlas.id().untyped()),
        ]
    }
}

/// Request the tileset and atlas images for the current scene.
pub fn preload_scene_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    current_scene: Res<CurrentScene>,
    scene_registry: Res<SceneRegistry>,
    atlas_registry: Res<AtlasRegistry>,
) {
    let mut assets = SceneAssets::default();

    match scene_registry.get(&current_scene.name) {
        Some(scene) => assets.tileset = asset_server.load(scene.tileset.image.clone()),
        None => error!("Scene '{}' not found in registry!", current_scene.name),
    }

    match atlas_registry.get(&config.atlas) {
        Some(atlas) => assets.atlas = asset_server.load(atlas.image.clone()),
        None => error!("Atlas '{}' not found in registry!", config.atlas),
    }

    commands.insert_resource(assets);
}

/// Whether an image needs no more waiting. Images that were never requested
/// or that failed count as settled; failures are logged.
fn is_settled(label: &str, state: Option<LoadState>) -> bool {
    match state {
        None | Some(LoadState::Loaded) => true,
        Some(LoadState::Failed(e)) => {
            warn!("Failed to load {} image: {}", label, e);
            true
        }
        Some(_) => false,
    }
}

/// Move on to gameplay once every requested image has loaded or failed.
///
/// The scene is built even when an image failed; the affected sprites
/// simply render without a texture.
pub fn check_scene_assets(
    asset_server: Res<AssetServer>,
    assets: Res<SceneAssets>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut ready = true;
    for (label, id) in assets.handles() {
        ready &= is_settled(label, asset_server.get_load_state(id));
    }

    if ready {
        info!("Scene assets ready");
        next_state.set(GameState::InGame);
    }
}
