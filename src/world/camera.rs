//! Camera that follows the player and stays inside the map.

use bevy::prelude::*;

use crate::player::Player;

/// Marker for the main 2D camera.
#[derive(Component)]
pub struct MainCamera;

/// World-space rectangle the camera view must stay inside.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraBounds(pub Rect);

/// Spawn the 2D camera centered on `position`.
pub fn spawn_camera(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Camera2d,
            MainCamera,
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

/// Where to put the camera center so a view of `half_view` around it stays
/// inside `bounds`. On an axis where the bounds are smaller than the view,
/// the camera is centered on the bounds instead.
pub fn clamp_camera(target: Vec2, half_view: Vec2, bounds: Rect) -> Vec2 {
    let clamp_axis = |target: f32, half: f32, min: f32, max: f32| {
        if max - min <= half * 2.0 {
            (min + max) / 2.0
        } else {
            target.clamp(min + half, max - half)
        }
    };

    Vec2::new(
        clamp_axis(target.x, half_view.x, bounds.min.x, bounds.max.x),
        clamp_axis(target.y, half_view.y, bounds.min.y, bounds.max.y),
    )
}

/// Keep the camera on the player, clamped to the map.
pub fn follow_player(
    bounds: Option<Res<CameraBounds>>,
    player_query: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut camera_query: Query<(&mut Transform, &OrthographicProjection), With<MainCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok((mut camera, projection)) = camera_query.get_single_mut() else {
        return;
    };

    let target = player.translation.truncate();
    let position = match bounds {
        Some(bounds) => clamp_camera(target, projection.area.half_size(), bounds.0),
        None => target,
    };

    camera.translation.x = position.x;
    camera.translation.y = position.y;
}
