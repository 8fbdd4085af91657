//! Scene construction from data definitions.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

use super::data::SceneDefinition;

/// Marker for all scene entities (layers, tiles, colliders).
#[derive(Component)]
pub struct SceneGeometry;

/// A tile layer; tiles are its children and its `Name` is the layer name.
#[derive(Component, Debug)]
pub struct TileLayer;

/// Static collider covering a rectangle of colliding tiles.
#[derive(Component)]
pub struct TileCollider;

/// An axis-aligned rectangle of merged tiles, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStrip {
    pub center: Vec2,
    pub size: Vec2,
}

/// Draw every layer of the scene as sprites from the tileset.
///
/// Layers are stacked in declaration order, one z unit apart, starting at 0.
pub fn spawn_tile_layers(
    commands: &mut Commands,
    scene: &SceneDefinition,
    tileset: Handle<Image>,
    layout: Handle<TextureAtlasLayout>,
) {
    let tile_size = Vec2::splat(scene.tile_size);

    for (z, layer) in scene.layers.iter().enumerate() {
        commands
            .spawn((
                SceneGeometry,
                TileLayer,
                Name::new(layer.name.clone()),
                Transform::from_xyz(0.0, 0.0, z as f32),
                Visibility::default(),
            ))
            .with_children(|parent| {
                for (x, y, tile) in layer.iter_tiles() {
                    let mut sprite = Sprite::from_atlas_image(
                        tileset.clone(),
                        TextureAtlas {
                            layout: layout.clone(),
                            index: tile.index as usize,
                        },
                    );
                    sprite.custom_size = Some(tile_size);
                    parent.spawn((
                        sprite,
                        Transform::from_translation(scene.tile_center(x, y).extend(0.0)),
                    ));
                }
            });
    }
}

/// Grid layout matching the scene's tileset image.
pub fn tileset_layout(scene: &SceneDefinition) -> TextureAtlasLayout {
    TextureAtlasLayout::from_grid(
        UVec2::splat(scene.tile_size as u32),
        scene.tileset.columns,
        scene.tileset.rows,
        None,
        None,
    )
}

/// Spawn fixed colliders for the colliding tiles of the collision layer.
pub fn spawn_tile_colliders(commands: &mut Commands, scene: &SceneDefinition) {
    let cells = scene.colliding_tiles();
    let strips = merge_tiles_into_strips(&cells, scene.tile_size);

    for strip in &strips {
        commands.spawn((
            SceneGeometry,
            TileCollider,
            RigidBody::Fixed,
            Collider::cuboid(strip.size.x / 2.0, strip.size.y / 2.0),
            Transform::from_translation(strip.center.extend(0.0)),
        ));
    }

    info!(
        "Merged {} colliding tiles into {} colliders",
        cells.len(),
        strips.len()
    );
}

/// Merge grid cells into rectangles: extend each run to the right, then
/// extend that run downward while every cell below it is present.
///
/// Cells are `(x, y)` with y growing down the map; results are world space.
pub fn merge_tiles_into_strips(cells: &[(usize, usize)], tile_size: f32) -> Vec<TileStrip> {
    let mut remaining: HashSet<(usize, usize)> = cells.iter().copied().collect();
    let mut ordered: Vec<_> = remaining.iter().copied().collect();
    ordered.sort_by_key(|&(x, y)| (y, x));

    let mut strips = Vec::new();
    for (start_x, start_y) in ordered {
        if !remaining.contains(&(start_x, start_y)) {
            continue;
        }

        let mut width = 1;
        while remaining.contains(&(start_x + width, start_y)) {
            width += 1;
        }

        let mut height = 1;
        while (0..width).all(|dx| remaining.contains(&(start_x + dx, start_y + height))) {
            height += 1;
        }

        for dy in 0..height {
            for dx in 0..width {
                remaining.remove(&(start_x + dx, start_y + dy));
            }
        }

        let size = Vec2::new(width as f32, height as f32) * tile_size;
        let top_left = Vec2::new(start_x as f32, start_y as f32) * tile_size;
        let center = super::data::map_to_world(top_left + size / 2.0);
        strips.push(TileStrip { center, size });
    }

    strips
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tile() {
        let strips = merge_tiles_into_strips(&[(0, 0)], 32.0);
        assert_eq!(
            strips,
            vec![TileStrip {
                center: Vec2::new(16.0, -16.0),
                size: Vec2::new(32.0, 32.0),
            }]
        );
    }

    #[test]
    fn test_horizontal_run() {
        let strips = merge_tiles_into_strips(&[(2, 1), (3, 1), (4, 1)], 32.0);
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].center, Vec2::new(112.0, -48.0));
        assert_eq!(strips[0].size, Vec2::new(96.0, 32.0));
    }

    #[test]
    fn test_block_merges_vertically() {
        let strips = merge_tiles_into_strips(&[(0, 0), (1, 0), (0, 1), (1, 1)], 16.0);
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].center, Vec2::new(16.0, -16.0));
        assert_eq!(strips[0].size, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn test_l_shape_splits() {
        // ##
        // #
        let strips = merge_tiles_into_strips(&[(0, 0), (1, 0), (0, 1)], 32.0);
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0].size, Vec2::new(64.0, 32.0));
        assert_eq!(strips[1].center, Vec2::new(16.0, -48.0));
        assert_eq!(strips[1].size, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn test_every_cell_covered_once() {
        let cells = [(0, 0), (2, 0), (1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)];
        let strips = merge_tiles_into_strips(&cells, 1.0);
        let area: f32 = strips.iter().map(|s| s.size.x * s.size.y).sum();
        assert_eq!(area, cells.len() as f32);
    }

    #[test]
    fn test_empty() {
        assert!(merge_tiles_into_strips(&[], 32.0).is_empty());
    }
}
