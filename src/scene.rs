//! Scene state: container orientation, container dimensions, and the
//! flip / reset / resize lifecycle.
//!
//! ## Invariant
//!
//! The Rapier gravity vector is always derived from [`Orientation`]:
//! straight down when `Normal`, straight up when `Flipped`, horizontal
//! component always zero.  Every mutation path (flip, reset, resize, setup)
//! goes through [`Orientation::gravity`], so the two can never drift apart.
//!
//! ## Systems
//!
//! | System          | Schedule | Purpose                                        |
//! |-----------------|----------|------------------------------------------------|
//! | `setup_scene`   | Startup  | Camera, initial container size, first arena    |
//! | `setup_gravity` | Startup  | Write the initial gravity vector into Rapier   |
//! | `flip_system`   | Update   | Handle [`FlipRequest`]: rotate, invert, clear  |
//! | `reset_system`  | Update   | Handle [`ResetRequest`]: back to a fresh drop  |
//! | `resize_system` | Update   | Track window size, regenerate, clear, restart  |

use crate::arena::ArenaRebuild;
use crate::config::SimConfig;
use crate::particle::{DropParticle, SplashParticle};
use crate::scheduler::SpawnScheduler;
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_rapier2d::prelude::*;

// ── Orientation ───────────────────────────────────────────────────────────────

/// Whether the container is in its normal or 180°-flipped state.
///
/// Determines the spawn edge, the gravity sign, and the camera rotation.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Flipped,
}

impl Orientation {
    /// The opposite orientation.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Normal => Orientation::Flipped,
            Orientation::Flipped => Orientation::Normal,
        }
    }

    /// World gravity vector for this orientation.
    ///
    /// `accel` is the configured magnitude; the horizontal component is
    /// always zero.
    #[inline]
    pub fn gravity(self, accel: f32) -> Vec2 {
        match self {
            Orientation::Normal => Vec2::new(0.0, -accel),
            Orientation::Flipped => Vec2::new(0.0, accel),
        }
    }

    /// World-space y at which new particles spawn: just inside the edge the
    /// particles fall away from (top when normal, bottom when flipped).
    #[inline]
    pub fn spawn_y(self, container_height: f32, edge_inset: f32) -> f32 {
        let y = container_height / 2.0 - edge_inset;
        match self {
            Orientation::Normal => y,
            Orientation::Flipped => -y,
        }
    }

    /// Camera rotation presenting this orientation: flipped turns the view
    /// 180° so particles always appear to fall down the screen.
    #[inline]
    pub fn camera_rotation(self) -> Quat {
        match self {
            Orientation::Normal => Quat::IDENTITY,
            Orientation::Flipped => Quat::from_rotation_z(std::f32::consts::PI),
        }
    }

    /// Convert a cursor position (top-left origin, y down) into the world
    /// position under it, accounting for the camera rotation of this
    /// orientation.
    pub fn click_to_world(self, cursor: Vec2, container_width: f32, container_height: f32) -> Vec2 {
        let world = Vec2::new(
            cursor.x - container_width / 2.0,
            -(cursor.y - container_height / 2.0),
        );
        match self {
            Orientation::Normal => world,
            Orientation::Flipped => -world,
        }
    }
}

// ── Container size ────────────────────────────────────────────────────────────

/// Current container (window) dimensions in pixels; follows window resizes.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ContainerSize {
    fn default() -> Self {
        Self {
            width: crate::constants::CONTAINER_WIDTH,
            height: crate::constants::CONTAINER_HEIGHT,
        }
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// Flip the container: invert gravity, clear particles, restart dropping.
/// Written by the countdown when it reaches zero.
#[derive(Message, Debug, Clone, Copy)]
pub struct FlipRequest;

/// Full reset back to normal orientation with a fresh arena.
/// Written by the HUD reset button.
#[derive(Message, Debug, Clone, Copy)]
pub struct ResetRequest;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Orientation>()
            .init_resource::<ContainerSize>()
            .add_message::<FlipRequest>()
            .add_message::<ResetRequest>()
            .add_systems(Update, (flip_system, reset_system, resize_system));
    }
}

// ── Startup systems (wired in main.rs, after config load) ─────────────────────

/// Spawn the 2D camera, seed the container size from config, and request the
/// first arena build.
pub fn setup_scene(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut container: ResMut<ContainerSize>,
    mut rebuild: MessageWriter<ArenaRebuild>,
) {
    commands.spawn(Camera2d);
    container.width = config.container_width;
    container.height = config.container_height;
    rebuild.write(ArenaRebuild);
    eprintln!("[SETUP] Scene ready ({}×{})", container.width, container.height);
}

/// Write the initial gravity vector into the Rapier world.
pub fn setup_gravity(
    orientation: Res<Orientation>,
    config: Res<SimConfig>,
    mut rapier: Query<&mut RapierConfiguration>,
) {
    apply_gravity(&mut rapier, *orientation, config.gravity_accel);
}

/// Push the orientation-derived gravity vector into every Rapier context.
fn apply_gravity(
    rapier: &mut Query<&mut RapierConfiguration>,
    orientation: Orientation,
    accel: f32,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = orientation.gravity(accel);
    }
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Handle pending [`FlipRequest`]s: toggle orientation (once per request),
/// rotate the camera, invert gravity, clear every tracked particle, and
/// restart the spawn scheduler.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn flip_system(
    mut requests: MessageReader<FlipRequest>,
    mut commands: Commands,
    mut orientation: ResMut<Orientation>,
    config: Res<SimConfig>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut rapier: Query<&mut RapierConfiguration>,
    mut q_camera: Query<&mut Transform, With<Camera2d>>,
    q_particles: Query<Entity, Or<(With<DropParticle>, With<SplashParticle>)>>,
) {
    let mut flipped = false;
    for _ in requests.read() {
        *orientation = orientation.toggled();
        flipped = true;
    }
    if !flipped {
        return;
    }

    apply_gravity(&mut rapier, *orientation, config.gravity_accel);
    for mut camera in q_camera.iter_mut() {
        camera.rotation = orientation.camera_rotation();
    }
    for entity in q_particles.iter() {
        commands.entity(entity).despawn();
    }
    scheduler.start();
}

/// Handle pending [`ResetRequest`]s: restore normal orientation and default
/// gravity, clear every particle, regenerate the arena, restart dropping.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn reset_system(
    mut requests: MessageReader<ResetRequest>,
    mut commands: Commands,
    mut orientation: ResMut<Orientation>,
    config: Res<SimConfig>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut rebuild: MessageWriter<ArenaRebuild>,
    mut rapier: Query<&mut RapierConfiguration>,
    mut q_camera: Query<&mut Transform, With<Camera2d>>,
    q_particles: Query<Entity, Or<(With<DropParticle>, With<SplashParticle>)>>,
) {
    if requests.read().next().is_none() {
        return;
    }

    *orientation = Orientation::Normal;
    apply_gravity(&mut rapier, *orientation, config.gravity_accel);
    for mut camera in q_camera.iter_mut() {
        camera.rotation = orientation.camera_rotation();
    }
    for entity in q_particles.iter() {
        commands.entity(entity).despawn();
    }
    rebuild.write(ArenaRebuild);
    scheduler.start();
}

/// Track window resizes: update the container dimensions, regenerate the
/// arena for the new bounds, reapply gravity for the current orientation,
/// clear particles, and restart dropping.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn resize_system(
    mut resizes: MessageReader<WindowResized>,
    mut commands: Commands,
    mut container: ResMut<ContainerSize>,
    orientation: Res<Orientation>,
    config: Res<SimConfig>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut rebuild: MessageWriter<ArenaRebuild>,
    mut rapier: Query<&mut RapierConfiguration>,
    q_particles: Query<Entity, Or<(With<DropParticle>, With<SplashParticle>)>>,
) {
    let Some(resize) = resizes.read().last() else {
        return;
    };

    container.width = resize.width;
    container.height = resize.height;
    apply_gravity(&mut rapier, *orientation, config.gravity_accel);
    for entity in q_particles.iter() {
        commands.entity(entity).despawn();
    }
    rebuild.write(ArenaRebuild);
    scheduler.start();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_sign_matches_orientation() {
        let g = Orientation::Normal.gravity(980.0);
        assert_eq!(g, Vec2::new(0.0, -980.0));
        let g = Orientation::Flipped.gravity(980.0);
        assert_eq!(g, Vec2::new(0.0, 980.0));
    }

    #[test]
    fn gravity_horizontal_component_is_always_zero() {
        for o in [Orientation::Normal, Orientation::Flipped] {
            assert_eq!(o.gravity(123.0).x, 0.0);
        }
    }

    #[test]
    fn double_toggle_restores_orientation_and_gravity() {
        let o = Orientation::Normal;
        let twice = o.toggled().toggled();
        assert_eq!(twice, o);
        assert_eq!(twice.gravity(980.0), o.gravity(980.0));
    }

    #[test]
    fn spawn_edge_follows_orientation() {
        // Normal drops in from just under the top edge.
        assert_eq!(Orientation::Normal.spawn_y(600.0, 10.0), 290.0);
        // Flipped drops in from just above the bottom edge.
        assert_eq!(Orientation::Flipped.spawn_y(600.0, 10.0), -290.0);
    }

    #[test]
    fn click_to_world_centers_and_inverts_y() {
        let w = Orientation::Normal.click_to_world(Vec2::new(400.0, 300.0), 800.0, 600.0);
        assert_eq!(w, Vec2::ZERO);
        let w = Orientation::Normal.click_to_world(Vec2::new(500.0, 100.0), 800.0, 600.0);
        assert_eq!(w, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn flipped_click_lands_under_the_cursor() {
        // With the camera turned 180°, the world point under a given screen
        // position is the negation of the unrotated mapping.
        let cursor = Vec2::new(500.0, 100.0);
        let normal = Orientation::Normal.click_to_world(cursor, 800.0, 600.0);
        let flipped = Orientation::Flipped.click_to_world(cursor, 800.0, 600.0);
        assert_eq!(flipped, -normal);
    }

    #[test]
    fn camera_rotation_is_identity_or_half_turn() {
        assert_eq!(Orientation::Normal.camera_rotation(), Quat::IDENTITY);
        let q = Orientation::Flipped.camera_rotation();
        // A half turn about z maps +x to −x.
        let v = q.mul_vec3(Vec3::X);
        assert!((v.x + 1.0).abs() < 1e-6);
    }
}
