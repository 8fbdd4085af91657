//! Physics debug view, switched on by the first press of the debug key.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use std::collections::HashSet;

use super::builder::SceneGeometry;
use super::data::map_to_world;
use crate::core::GameConfig;

/// Z of the collision overlay; above the player.
pub const DEBUG_OVERLAY_Z: f32 = 20.0;

/// Thickness of the lines drawn on exposed faces, in pixels.
pub const FACE_EDGE_WIDTH: f32 = 2.0;

/// Color of the collision overlay.
pub fn colliding_tile_color() -> Color {
    Color::srgba(243.0 / 255.0, 134.0 / 255.0, 48.0 / 255.0, 0.75)
}

/// Color of the lines on colliding faces.
pub fn face_edge_color() -> Color {
    Color::srgb(40.0 / 255.0, 39.0 / 255.0, 37.0 / 255.0)
}

/// Colliding tiles of the collision layer, as grid cells (y down).
#[derive(Resource, Debug, Clone, Default)]
pub struct CollidingTiles {
    pub cells: Vec<(usize, usize)>,
    pub tile_size: f32,
}

/// A thin world-space rectangle along one side of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceEdge {
    pub center: Vec2,
    pub size: Vec2,
}

impl CollidingTiles {
    /// World-space center of every colliding tile.
    pub fn centers(&self) -> Vec<Vec2> {
        self.cells
            .iter()
            .map(|&(x, y)| {
                map_to_world(Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * self.tile_size)
            })
            .collect()
    }

    /// Edges on the sides of colliding tiles that don't touch another
    /// colliding tile.
    pub fn face_edges(&self) -> Vec<FaceEdge> {
        let solid: HashSet<(usize, usize)> = self.cells.iter().copied().collect();
        let is_solid = |x: Option<usize>, y: Option<usize>| match (x, y) {
            (Some(x), Some(y)) => solid.contains(&(x, y)),
            _ => false,
        };

        let size = self.tile_size;
        let horizontal = Vec2::new(size, FACE_EDGE_WIDTH);
        let vertical = Vec2::new(FACE_EDGE_WIDTH, size);

        let mut edges = Vec::new();
        for &(x, y) in &self.cells {
            let (left, top) = (x as f32 * size, y as f32 * size);
            let mid = Vec2::new(left + size / 2.0, top + size / 2.0);

            if !is_solid(Some(x), y.checked_sub(1)) {
                edges.push((Vec2::new(mid.x, top), horizontal));
            }
            if !is_solid(Some(x), Some(y + 1)) {
                edges.push((Vec2::new(mid.x, top + size), horizontal));
            }
            if !is_solid(x.checked_sub(1), Some(y)) {
                edges.push((Vec2::new(left, mid.y), vertical));
            }
            if !is_solid(Some(x + 1), Some(y)) {
                edges.push((Vec2::new(left + size, mid.y), vertical));
            }
        }

        edges
            .into_iter()
            .map(|(center, size)| FaceEdge {
                center: map_to_world(center),
                size,
            })
            .collect()
    }
}

/// Whether the debug view has been switched on. It is never switched off.
#[derive(Resource, Debug, Default)]
pub struct DebugGraphics {
    pub enabled: bool,
}

/// Marker for collision overlay sprites.
#[derive(Component)]
pub struct CollisionOverlay;

/// Turn on Rapier's debug renderer and paint the colliding tiles.
pub fn enable_debug_graphics(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    tiles: Option<Res<CollidingTiles>>,
    mut debug: ResMut<DebugGraphics>,
    mut render_context: ResMut<DebugRenderContext>,
) {
    if debug.enabled || !keyboard.just_pressed(config.keys.debug) {
        return;
    }

    debug.enabled = true;
    render_context.enabled = true;

    let Some(tiles) = tiles else {
        info!("Physics debug rendering enabled");
        return;
    };

    let color = colliding_tile_color();
    let size = Vec2::splat(tiles.tile_size);
    let centers = tiles.centers();
    for center in &centers {
        commands.spawn((
            SceneGeometry,
            CollisionOverlay,
            Sprite::from_color(color, size),
            Transform::from_translation(center.extend(DEBUG_OVERLAY_Z)),
        ));
    }

    let edge_color = face_edge_color();
    let edges = tiles.face_edges();
    for edge in &edges {
        commands.spawn((
            SceneGeometry,
            CollisionOverlay,
            Sprite::from_color(edge_color, edge.size),
            Transform::from_translation(edge.center.extend(DEBUG_OVERLAY_Z + 0.1)),
        ));
    }

    info!(
        "Physics debug rendering enabled ({} colliding tiles highlighted, {} faces)",
        centers.len(),
        edges.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn debug_world(press: Option<KeyCode>) -> World {
        let mut world = World::new();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        if let Some(key) = press {
            keyboard.press(key);
        }
        world.insert_resource(keyboard);
        world.insert_resource(GameConfig::default());
        world.insert_resource(DebugGraphics::default());
        world.insert_resource(DebugRenderContext {
            enabled: false,
            ..default()
        });
        // Two tiles side by side: 2 fills and 6 exposed faces.
        world.insert_resource(CollidingTiles {
            cells: vec![(0, 0), (1, 0)],
            tile_size: 32.0,
        });
        world
    }

    fn overlay_count(world: &mut World) -> usize {
        world
            .query_filtered::<(), With<CollisionOverlay>>()
            .iter(world)
            .count()
    }

    #[test]
    fn test_debug_key_enables_once() {
        let mut world = debug_world(Some(KeyCode::KeyD));
        world.run_system_once(enable_debug_graphics).expect("system runs");

        assert!(world.resource::<DebugGraphics>().enabled);
        assert!(world.resource::<DebugRenderContext>().enabled);
        assert_eq!(overlay_count(&mut world), 8);

        // Key still reads as just pressed; the overlay is not spawned again.
        world.run_system_once(enable_debug_graphics).expect("system runs");
        assert_eq!(overlay_count(&mut world), 8);
    }

    #[test]
    fn test_other_keys_do_nothing() {
        let mut world = debug_world(Some(KeyCode::ArrowLeft));
        world.run_system_once(enable_debug_graphics).expect("system runs");

        assert!(!world.resource::<DebugGraphics>().enabled);
        assert!(!world.resource::<DebugRenderContext>().enabled);
        assert_eq!(overlay_count(&mut world), 0);
    }

    #[test]
    fn test_centers_flip_y() {
        let tiles = CollidingTiles {
            cells: vec![(0, 0), (2, 1)],
            tile_size: 32.0,
        };
        assert_eq!(
            tiles.centers(),
            vec![Vec2::new(16.0, -16.0), Vec2::new(80.0, -48.0)]
        );
    }

    #[test]
    fn test_single_tile_has_four_faces() {
        let tiles = CollidingTiles {
            cells: vec![(1, 1)],
            tile_size: 32.0,
        };
        let edges = tiles.face_edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&FaceEdge {
            center: Vec2::new(48.0, -32.0),
            size: Vec2::new(32.0, FACE_EDGE_WIDTH),
        }));
        assert!(edges.contains(&FaceEdge {
            center: Vec2::new(64.0, -48.0),
            size: Vec2::new(FACE_EDGE_WIDTH, 32.0),
        }));
    }

    #[test]
    fn test_shared_faces_are_not_drawn() {
        // ##
        // #
        let tiles = CollidingTiles {
            cells: vec![(0, 0), (1, 0), (0, 1)],
            tile_size: 32.0,
        };
        let edges = tiles.face_edges();
        assert_eq!(edges.len(), 8);
        // Between (0, 0) and (1, 0).
        assert!(!edges.iter().any(|e| e.center == Vec2::new(32.0, -16.0)));
        // Between (0, 0) and (0, 1).
        assert!(!edges.iter().any(|e| e.center == Vec2::new(16.0, -32.0)));
    }
}
