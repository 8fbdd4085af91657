//! Scene data structures and RON loading.
//!
//! A scene is a stack of character grids sharing one palette, plus a list of
//! named point objects. Map coordinates are in pixels with y pointing down,
//! matching how the grids read on screen; [`map_to_world`] converts them into
//! Bevy's y-up world space.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use crate::core::GameConfig;

/// Character that always means "no tile", regardless of palette.
pub const EMPTY_TILE: char = ' ';

/// Read and deserialize a RON file.
pub fn read_ron_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, DataLoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
        path: display,
        details: e.to_string(),
    })
}

/// Convert a point or vector in map pixels (y down) to world space (y up).
pub fn map_to_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

/// Convert a point or vector in world space (y up) to map pixels (y down).
pub fn world_to_map(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

// === Raw (file) types ===

/// Tileset image and its grid layout.
#[derive(Debug, Clone, Deserialize)]
pub struct TilesetDef {
    /// Image path relative to `assets/`.
    pub image: String,
    pub columns: u32,
    pub rows: u32,
}

/// Definition of a tile in the palette.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TileDef {
    /// Index into the tileset grid (row-major).
    pub tile: u32,
    /// Whether the tile blocks movement when placed on the collision layer.
    #[serde(default)]
    pub collided: bool,
}

/// One tile layer as written in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub rows: Vec<String>,
}

/// A named point in map pixels.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectDef {
    pub name: String,
    pub x: f32,
    pub y: f32,
}

fn default_tile_size() -> f32 {
    32.0
}

fn default_collision_layer() -> String {
    "World Layer".to_string()
}

/// Raw scene definition as read from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDefinitionRaw {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    pub tileset: TilesetDef,
    pub palette: HashMap<char, TileDef>,
    pub layers: Vec<LayerDef>,
    #[serde(default = "default_collision_layer")]
    pub collision_layer: String,
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

// === Resolved types ===

/// A tile placed on a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTile {
    pub index: u32,
    pub collided: bool,
}

/// A tile layer with every cell resolved against the palette.
#[derive(Debug, Clone)]
pub struct ResolvedLayer {
    pub name: String,
    /// Rows top to bottom; `None` means empty.
    pub tiles: Vec<Vec<Option<ResolvedTile>>>,
}

impl ResolvedLayer {
    /// Iterate `(x, y, tile)` over non-empty cells.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (usize, usize, ResolvedTile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, tile)| tile.map(|t| (x, y, t)))
        })
    }
}

/// Processed scene definition.
#[derive(Debug, Clone)]
pub struct SceneDefinition {
    pub name: String,
    pub tile_size: f32,
    pub tileset: TilesetDef,
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Layers in draw order (first is drawn lowest).
    pub layers: Vec<ResolvedLayer>,
    pub collision_layer: String,
    pub objects: Vec<ObjectDef>,
}

impl SceneDefinition {
    /// Create from raw definition, validating layer sizes and palette references.
    pub fn from_raw(raw: SceneDefinitionRaw) -> Result<Self, DataLoadError> {
        let tile_count = raw.tileset.columns * raw.tileset.rows;
        for (&character, def) in &raw.palette {
            if def.tile >= tile_count {
                return Err(DataLoadError::TileOutOfRange {
                    character,
                    tile: def.tile,
                    count: tile_count,
                });
            }
        }

        let (width, height) = raw
            .layers
            .first()
            .map(|layer| {
                let width = layer.rows.first().map(|row| row.chars().count()).unwrap_or(0);
                (width, layer.rows.len())
            })
            .unwrap_or((0, 0));

        let mut layers = Vec::with_capacity(raw.layers.len());
        for layer in &raw.layers {
            let layer_width = layer
                .rows
                .iter()
                .map(|row| row.chars().count())
                .find(|&w| w != width)
                .unwrap_or(width);
            let layer_height = layer.rows.len();
            if layer_width != width || layer_height != height {
                return Err(DataLoadError::GridMismatch {
                    layer: layer.name.clone(),
                    expected_width: width,
                    expected_height: height,
                    actual_width: layer_width,
                    actual_height: layer_height,
                });
            }

            let mut tiles = Vec::with_capacity(height);
            for (y, row) in layer.rows.iter().enumerate() {
                let mut tile_row = Vec::with_capacity(width);
                for (x, c) in row.chars().enumerate() {
                    if c == EMPTY_TILE {
                        tile_row.push(None);
                        continue;
                    }
                    let def = raw.palette.get(&c).ok_or_else(|| DataLoadError::UnknownPaletteEntry {
                        layer: layer.name.clone(),
                        character: c,
                        x,
                        y,
                    })?;
                    tile_row.push(Some(ResolvedTile {
                        index: def.tile,
                        collided: def.collided,
                    }));
                }
                tiles.push(tile_row);
            }

            layers.push(ResolvedLayer {
                name: layer.name.clone(),
                tiles,
            });
        }

        if !layers.iter().any(|l| l.name == raw.collision_layer) {
            return Err(DataLoadError::MissingLayer(raw.collision_layer));
        }

        Ok(Self {
            name: raw.name,
            tile_size: raw.tile_size,
            tileset: raw.tileset,
            width,
            height,
            layers,
            collision_layer: raw.collision_layer,
            objects: raw.objects,
        })
    }

    pub fn width_in_pixels(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    pub fn height_in_pixels(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Find a layer by name.
    pub fn layer(&self, name: &str) -> Option<&ResolvedLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Find the first object with the given name.
    pub fn find_object(&self, name: &str) -> Option<&ObjectDef> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Find an object the scene can't do without.
    pub fn require_object(&self, name: &str) -> Result<&ObjectDef, DataLoadError> {
        self.find_object(name)
            .ok_or_else(|| DataLoadError::MissingObject(name.to_string()))
    }

    /// Grid positions of tiles marked `collided` on the collision layer.
    pub fn colliding_tiles(&self) -> Vec<(usize, usize)> {
        self.layer(&self.collision_layer)
            .map(|layer| {
                layer
                    .iter_tiles()
                    .filter(|(_, _, tile)| tile.collided)
                    .map(|(x, y, _)| (x, y))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// World-space center of the tile at grid position `(x, y)`.
    pub fn tile_center(&self, x: usize, y: usize) -> Vec2 {
        map_to_world(Vec2::new(
            (x as f32 + 0.5) * self.tile_size,
            (y as f32 + 0.5) * self.tile_size,
        ))
    }
}

/// Resource storing all loaded scene definitions.
#[derive(Resource, Default)]
pub struct SceneRegistry {
    pub scenes: HashMap<String, SceneDefinition>,
}

impl SceneRegistry {
    /// Get a scene by name.
    pub fn get(&self, name: &str) -> Option<&SceneDefinition> {
        self.scenes.get(name)
    }
}

/// Resource indicating which scene to build.
#[derive(Resource)]
pub struct CurrentScene {
    pub name: String,
}

/// Load a single scene file and resolve it.
pub fn load_scene_file(path: impl AsRef<Path>) -> Result<SceneDefinition, DataLoadError> {
    let raw: SceneDefinitionRaw = read_ron_file(path)?;
    SceneDefinition::from_raw(raw)
}

/// Load all scene definitions from assets/data/scenes/ and select the
/// configured scene.
pub fn load_scene_definitions(mut commands: Commands, config: Res<GameConfig>) {
    let mut registry = SceneRegistry::default();
    let scenes_path = Path::new("assets/data/scenes");

    if let Ok(entries) = fs::read_dir(scenes_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let scene_name = stem.to_string_lossy().to_string();

            match load_scene_file(&path) {
                Ok(scene) => {
                    info!(
                        "Loaded scene: {} ({}x{} tiles, {} layers)",
                        scene_name,
                        scene.width,
                        scene.height,
                        scene.layers.len()
                    );
                    registry.scenes.insert(scene_name, scene);
                }
                Err(e) => error!("Failed to load scene {:?}: {}", path, e),
            }
        }
    } else {
        warn!("Scenes directory not found: {:?}", scenes_path);
    }

    info!("Loaded {} scene(s)", registry.scenes.len());
    commands.insert_resource(registry);
    commands.insert_resource(CurrentScene {
        name: config.scene.clone(),
    });
}
