//! Cosmetic effects: impact splashes and motion trails.
//!
//! ## Splashes
//!
//! `splash_on_impact_system` listens for `CollisionEvent::Started` between a
//! drop particle and any arena piece.  When the particle's impact speed
//! clears the configured threshold, a burst of splash particles erupts in a
//! radial fan around the impact point, sized linearly with impact speed and
//! capped at `splash_max_count`, each launched outward plus a fixed bias
//! against the current gravity.  `splash_update_system` then ages every
//! splash: fade begins after the fade delay and runs linearly to transparent,
//! and the entity is removed at the end of its fixed lifetime regardless of
//! fade progress.
//!
//! ## Trails
//!
//! `trail_record_system` appends each live particle's position to its
//! bounded [`Trail`] every frame; `trail_render_system` draws the history as
//! a gizmo polyline whose per-segment alpha ramps from near-transparent
//! (oldest) up to the configured base alpha (newest).
//!
//! Everything here is an ordinary per-tick pass over owned component state —
//! no coupling to render callbacks — and none of it touches mass,
//! restitution, or any other physical parameter after creation.

use crate::arena::ArenaKind;
use crate::config::SimConfig;
use crate::particle::{spawn_splash_particle, DropParticle, SplashParticle, Trail};
use crate::scene::Orientation;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;
use std::collections::HashSet;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (splash_update_system, trail_record_system, trail_render_system),
        )
        // Collision events are produced by the physics step; read them in
        // PostUpdate alongside the step's own writeback.
        .add_systems(PostUpdate, splash_on_impact_system);
    }
}

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// Number of splash particles for an impact at `speed`: linear in the
/// impact-to-threshold ratio, at least 1, capped at `max`.
pub fn splash_burst_count(speed: f32, threshold: f32, max: u32) -> u32 {
    ((speed / threshold) as u32).clamp(1, max)
}

/// Splash opacity at `age`: fully opaque until `fade_delay`, then a linear
/// ramp to zero over `fade_duration`.
pub fn splash_alpha(age: f32, fade_delay: f32, fade_duration: f32) -> f32 {
    if age <= fade_delay {
        1.0
    } else {
        1.0 - ((age - fade_delay) / fade_duration).clamp(0.0, 1.0)
    }
}

/// Alpha for trail segment `index` out of `segment_count`, ramping up to
/// `base_alpha` on the newest segment.
pub fn trail_segment_alpha(index: usize, segment_count: usize, base_alpha: f32) -> f32 {
    base_alpha * (index + 1) as f32 / segment_count as f32
}

/// Launch velocity for one splash: outward along `dir` scaled by impact
/// speed, plus the fixed rise bias against gravity.
fn splash_velocity(dir: Vec2, impact_speed: f32, rise_dir: Vec2, config: &SimConfig) -> Vec2 {
    dir * impact_speed * config.splash_speed_scale + rise_dir * config.splash_rise_bias
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Spawn splash bursts for high-impact particle–arena collisions.
///
/// Matches `CollisionEvent::Started` pairs; ignores `Stopped`.  Each particle
/// produces at most one burst per frame even if it touches several pieces at
/// once.
pub fn splash_on_impact_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    config: Res<SimConfig>,
    orientation: Res<Orientation>,
    q_drops: Query<(&Transform, &Velocity, &DropParticle)>,
    q_arena: Query<(), With<ArenaKind>>,
) {
    let mut processed: HashSet<Entity> = HashSet::new();
    let mut rng = rand::thread_rng();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let particle_entity = if q_drops.contains(e1) && q_arena.contains(e2) {
            e1
        } else if q_drops.contains(e2) && q_arena.contains(e1) {
            e2
        } else {
            continue;
        };

        if !processed.insert(particle_entity) {
            continue;
        }

        let Ok((transform, velocity, drop)) = q_drops.get(particle_entity) else {
            continue;
        };

        let impact_speed = velocity.linvel.length();
        if impact_speed < config.splash_impact_threshold {
            continue;
        }

        let pos = transform.translation.truncate();
        let rise_dir = -orientation.gravity(1.0);
        let count = splash_burst_count(
            impact_speed,
            config.splash_impact_threshold,
            config.splash_max_count,
        );

        for i in 0..count {
            // Even fan with a little angular jitter so bursts don't look stamped.
            let angle = std::f32::consts::TAU * i as f32 / count as f32
                + rng.gen_range(-0.25_f32..0.25_f32);
            let dir = Vec2::new(angle.cos(), angle.sin());
            let vel = splash_velocity(dir, impact_speed, rise_dir, &config);
            spawn_splash_particle(&mut commands, pos, vel, drop.color, &config);
        }
    }
}

/// Age every splash: apply the fade ramp to its material and despawn it at
/// the end of its lifetime, whatever the fade has reached.
pub fn splash_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut SplashParticle, Option<&MeshMaterial2d<ColorMaterial>>)>,
) {
    let dt = time.delta_secs();

    for (entity, mut splash, material) in query.iter_mut() {
        splash.age += dt;

        if splash.age >= config.splash_lifetime_secs {
            commands.entity(entity).despawn();
            continue;
        }

        let alpha = splash_alpha(
            splash.age,
            config.splash_fade_delay_secs,
            config.splash_fade_duration_secs,
        );
        if let Some(handle) = material {
            if let Some(mat) = materials.get_mut(&handle.0) {
                let c = Srgba::from(splash.base_color);
                mat.color = Color::srgba(c.red, c.green, c.blue, alpha);
            }
        }
    }
}

/// Append each live particle's position to its trail, evicting the oldest
/// entry past capacity.
pub fn trail_record_system(
    config: Res<SimConfig>,
    mut query: Query<(&Transform, &mut Trail), With<DropParticle>>,
) {
    for (transform, mut trail) in query.iter_mut() {
        trail.record(transform.translation.truncate(), config.trail_capacity);
    }
}

/// Draw every trail as a fading polyline behind its particle.
pub fn trail_render_system(
    mut gizmos: Gizmos,
    config: Res<SimConfig>,
    query: Query<(&Trail, &DropParticle)>,
) {
    for (trail, drop) in query.iter() {
        let points = &trail.0;
        if points.len() < 2 {
            continue;
        }
        let segment_count = points.len() - 1;
        let base = Srgba::from(drop.color);
        for (i, pair) in points.iter().zip(points.iter().skip(1)).enumerate() {
            let alpha = trail_segment_alpha(i, segment_count, config.trail_base_alpha);
            let color = Color::srgba(base.red, base.green, base.blue, alpha);
            gizmos.line_2d(*pair.0, *pair.1, color);
        }
    }
}
