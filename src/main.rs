use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use hourglass::arena::ArenaPlugin;
use hourglass::config::{load_sim_config, SimConfig};
use hourglass::effects::EffectsPlugin;
use hourglass::hud::{setup_hud, HudPlugin};
use hourglass::input::InputPlugin;
use hourglass::particle::ParticlePlugin;
use hourglass::scene::{setup_gravity, setup_scene, ScenePlugin};
use hourglass::scheduler::SchedulerPlugin;
use hourglass::theme::{ActiveTheme, ThemePlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hourglass".into(),
                resolution: WindowResolution::new(800, 600),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(ActiveTheme::default().0.background))
        // Insert SimConfig with compiled defaults; load_sim_config will
        // overwrite it from assets/hourglass.toml (if present) in Startup.
        .insert_resource(SimConfig::default())
        // pixels_per_meter(1.0) keeps world units equal to screen pixels, so
        // the configured gravity/velocities read directly in px/s.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins((
            ScenePlugin,
            ArenaPlugin,
            ParticlePlugin,
            SchedulerPlugin,
            EffectsPlugin,
            ThemePlugin,
            HudPlugin,
            InputPlugin,
        ))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the
                // final values.
                load_sim_config,
                setup_scene.after(load_sim_config),
                setup_gravity.after(load_sim_config),
                setup_hud.after(load_sim_config),
            ),
        )
        .run();
}
