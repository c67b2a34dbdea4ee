//! Pointer input: click anywhere inside the container to drop one particle.
//!
//! The cursor position arrives in screen coordinates (top-left origin);
//! [`Orientation::click_to_world`] maps it under the possibly-rotated camera
//! so the particle always appears exactly under the pointer, flipped or not.
//! Clicked-in particles are ordinary drop particles: they count against the
//! cap and can therefore trigger the fill → countdown transition early.

use crate::config::SimConfig;
use crate::particle::spawn_drop_particle;
use crate::scene::{ContainerSize, Orientation};
use crate::theme::ActiveTheme;
use bevy::prelude::*;
use rand::Rng;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, click_spawn_system);
    }
}

/// Spawn one particle at the orientation-corrected click position.
pub fn click_spawn_system(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    orientation: Res<Orientation>,
    container: Res<ContainerSize>,
    config: Res<SimConfig>,
    theme: Res<ActiveTheme>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    // Ignore clicks outside the container bounds.
    if cursor.x <= 0.0
        || cursor.x >= container.width
        || cursor.y <= 0.0
        || cursor.y >= container.height
    {
        return;
    }

    let pos = orientation.click_to_world(cursor, container.width, container.height);
    let mut rng = rand::thread_rng();
    let radius = rng.gen_range(config.particle_radius_min..config.particle_radius_max);
    let color = theme.0.sample_color(&mut rng);
    spawn_drop_particle(&mut commands, pos, radius, color, &config);
}
