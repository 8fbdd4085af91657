//! Sprite atlas data and the player's frame-based walk animations.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::components::{Facing, Player, SpriteAnimator};
use crate::core::{GameConfig, PlayerConfig};
use crate::world::{read_ron_file, DataLoadError};

/// Sprite sheet definition as read from RON.
///
/// The sheet is a uniform grid; `frames` names cells by row-major index.
#[derive(Debug, Clone, Deserialize)]
pub struct AtlasDefinition {
    /// Image path relative to `assets/`.
    pub image: String,
    /// Cell size in pixels.
    pub tile_size: (u32, u32),
    pub columns: u32,
    pub rows: u32,
    #[serde(default)]
    pub padding: Option<(u32, u32)>,
    pub frames: HashMap<String, usize>,
}

impl AtlasDefinition {
    /// Look up a frame index by name.
    pub fn frame(&self, atlas: &str, name: &str) -> Result<usize, DataLoadError> {
        let index = *self.frames.get(name).ok_or_else(|| DataLoadError::MissingFrame {
            atlas: atlas.to_string(),
            frame: name.to_string(),
        })?;

        let count = (self.columns * self.rows) as usize;
        if index >= count {
            return Err(DataLoadError::FrameOutOfRange {
                atlas: atlas.to_string(),
                frame: name.to_string(),
                index,
                count,
            });
        }
        Ok(index)
    }

    /// Grid layout for Bevy's texture atlas.
    pub fn layout(&self) -> TextureAtlasLayout {
        TextureAtlasLayout::from_grid(
            UVec2::new(self.tile_size.0, self.tile_size.1),
            self.columns,
            self.rows,
            self.padding.map(|(x, y)| UVec2::new(x, y)),
            None,
        )
    }
}

/// Resource storing all loaded atlas definitions.
#[derive(Resource, Default)]
pub struct AtlasRegistry {
    pub atlases: HashMap<String, AtlasDefinition>,
}

impl AtlasRegistry {
    /// Get an atlas by name.
    pub fn get(&self, name: &str) -> Option<&AtlasDefinition> {
        self.atlases.get(name)
    }
}

/// Load all atlas definitions from assets/data/atlas/.
pub fn load_atlas_definitions(mut commands: Commands) {
    let mut registry = AtlasRegistry::default();
    let atlas_path = Path::new("assets/data/atlas");

    if let Ok(entries) = fs::read_dir(atlas_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let name = stem.to_string_lossy().to_string();

            match read_ron_file::<AtlasDefinition>(&path) {
                Ok(atlas) => {
                    info!("Loaded atlas: {} ({} frames)", name, atlas.frames.len());
                    registry.atlases.insert(name, atlas);
                }
                Err(e) => error!("Failed to load atlas {:?}: {}", path, e),
            }
        }
    } else {
        warn!("Atlas directory not found: {:?}", atlas_path);
    }

    commands.insert_resource(registry);
}

/// Build frame names the way a sprite packer numbers them:
/// `prefix` followed by the index, left-padded with zeros to `zero_pad` digits.
pub fn generate_frame_names(prefix: &str, start: usize, end: usize, zero_pad: usize) -> Vec<String> {
    (start..=end)
        .map(|i| format!("{prefix}{i:0zero_pad$}"))
        .collect()
}

/// Name of the looping walk animation for a facing.
pub fn walk_animation_key(character: &str, facing: Facing) -> String {
    format!("{}-{}-walk", character, facing.name())
}

/// Name of the static idle frame for a facing.
pub fn idle_frame_name(character: &str, facing: Facing) -> String {
    format!("{}-{}", character, facing.name())
}

/// A looping sequence of atlas frames.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkAnimation {
    pub key: String,
    pub frames: Vec<usize>,
}

/// The player's walk animations and idle frames, resolved against the atlas.
#[derive(Resource, Debug, Clone)]
pub struct PlayerAnimations {
    pub walk: HashMap<Facing, WalkAnimation>,
    pub idle: HashMap<Facing, usize>,
    /// Frame shown before any input arrives.
    pub spawn_frame: usize,
    pub layout: Handle<TextureAtlasLayout>,
}

impl PlayerAnimations {
    /// Resolve every walk animation and idle frame for the configured character.
    pub fn resolve(
        atlas_name: &str,
        atlas: &AtlasDefinition,
        player: &PlayerConfig,
        layout: Handle<TextureAtlasLayout>,
    ) -> Result<Self, DataLoadError> {
        let character = player.character.as_str();
        let walk_frames = player.walk_frames;
        let mut walk = HashMap::new();
        let mut idle = HashMap::new();

        for facing in Facing::ALL {
            let key = walk_animation_key(character, facing);
            if walk_frames == 0 {
                return Err(DataLoadError::EmptyAnimation(key));
            }
            let frames = generate_frame_names(&format!("{key}."), 0, walk_frames - 1, 3)
                .iter()
                .map(|name| atlas.frame(atlas_name, name))
                .collect::<Result<Vec<_>, _>>()?;
            walk.insert(facing, WalkAnimation { key, frames });

            let idle_name = idle_frame_name(character, facing);
            idle.insert(facing, atlas.frame(atlas_name, &idle_name)?);
        }

        let spawn_frame = atlas.frame(atlas_name, &player.initial_frame)?;

        Ok(Self {
            walk,
            idle,
            spawn_frame,
            layout,
        })
    }

    pub fn walk(&self, facing: Facing) -> Option<&WalkAnimation> {
        self.walk.get(&facing)
    }

    pub fn idle_frame(&self, facing: Facing) -> Option<usize> {
        self.idle.get(&facing).copied()
    }
}

/// Create the player's walk animations from the configured atlas.
pub fn setup_player_animations(
    mut commands: Commands,
    config: Res<GameConfig>,
    registry: Res<AtlasRegistry>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let Some(atlas) = registry.get(&config.atlas) else {
        error!("Atlas '{}' not found in registry!", config.atlas);
        return;
    };

    let layout = layouts.add(atlas.layout());
    match PlayerAnimations::resolve(&config.atlas, atlas, &config.player, layout) {
        Ok(animations) => {
            for facing in Facing::ALL {
                if let Some(walk) = animations.walk(facing) {
                    info!("Created animation '{}' ({} frames)", walk.key, walk.frames.len());
                }
            }
            commands.insert_resource(animations);
        }
        Err(e) => error!("Failed to create player animations: {}", e),
    }
}

/// Advance playing walk animations and write the current frame to the sprite.
pub fn animate_sprites(
    time: Res<Time>,
    animations: Option<Res<PlayerAnimations>>,
    mut query: Query<(&mut SpriteAnimator, &mut Sprite), With<Player>>,
) {
    let Some(animations) = animations else {
        return;
    };

    for (mut animator, mut sprite) in query.iter_mut() {
        let Some(facing) = animator.playing() else {
            continue;
        };
        let Some(walk) = animations.walk(facing) else {
            continue;
        };

        if let Some(frame) = animator.tick(time.delta(), walk.frames.len()) {
            set_atlas_index(&mut sprite, walk.frames[frame]);
        }
    }
}

/// Point the sprite at a different cell of its atlas.
pub fn set_atlas_index(sprite: &mut Sprite, index: usize) {
    if let Some(atlas) = sprite.texture_atlas.as_mut() {
        atlas.index = index;
    }
}
