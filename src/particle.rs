//! Particle entities: falling drop particles and short-lived splash particles.
//!
//! ## Design
//!
//! Both kinds are lightweight ECS entities classified by typed marker
//! components ([`DropParticle`] and [`SplashParticle`]), never by string
//! tags.  Rapier owns their motion; this module owns creation and the
//! render-facing pieces:
//!
//! | System                        | Schedule | Purpose                                  |
//! |-------------------------------|----------|------------------------------------------|
//! | `init_particle_mesh`          | Startup  | Create the shared unit-circle mesh       |
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned particles |
//!
//! Spawn helpers take only `&mut Commands` and return the created [`Entity`]
//! directly, so callers never have to re-locate a body by position after the
//! fact.  A single shared unit-radius circle mesh ([`ParticleMesh`]) is
//! scaled per entity via its `Transform`; each particle receives its own
//! [`ColorMaterial`] so it can be recolored and faded individually.
//!
//! ## Collision groups
//!
//! | Layer          | Group   | Collides with       |
//! |----------------|---------|---------------------|
//! | Drop particles | GROUP_1 | GROUP_1 \| GROUP_2  |
//! | Arena pieces   | GROUP_2 | GROUP_1             |
//! | Splashes       | GROUP_3 | nothing             |
//!
//! Splash particles keep a tiny collider so Rapier gives them mass (and
//! therefore gravity), but an empty filter makes them purely ballistic:
//! they sail through the pile they erupted from.

use crate::config::SimConfig;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier2d::prelude::*;
use std::collections::VecDeque;

// ── Components ────────────────────────────────────────────────────────────────

/// A falling particle counted against the population cap.
#[derive(Component, Debug, Clone)]
pub struct DropParticle {
    /// Collider and visual radius (px).
    pub radius: f32,
    /// Current fill color, sampled from the active theme.
    pub color: Color,
}

/// A short-lived cosmetic splash particle.  Never counted against the cap.
#[derive(Component, Debug, Clone)]
pub struct SplashParticle {
    /// Seconds alive so far; drives both fade and unconditional removal.
    pub age: f32,
    /// Fill color before fade is applied.
    pub base_color: Color,
}

/// Bounded recent-position history for the motion-trail renderer.
///
/// Oldest positions are evicted first once capacity is reached.
#[derive(Component, Debug, Clone, Default)]
pub struct Trail(pub VecDeque<Vec2>);

impl Trail {
    /// Append `pos`, evicting from the front to stay within `capacity`.
    pub fn record(&mut self, pos: Vec2, capacity: usize) {
        self.0.push_back(pos);
        while self.0.len() > capacity {
            self.0.pop_front();
        }
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Shared unit-radius circle mesh used by every particle entity.
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlePlugin;

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh)
            .add_systems(Update, attach_particle_mesh_system);
    }
}

// ── Startup system ────────────────────────────────────────────────────────────

/// Create the shared unit circle mesh and store it as [`ParticleMesh`].
fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(1.0, 24));
    commands.insert_resource(ParticleMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned particle.
///
/// Uses `Added<…>` filters so it only touches entities that appeared since
/// the last frame — zero overhead for the steady-state population.
#[allow(clippy::type_complexity)]
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    q_drops: Query<(Entity, &DropParticle), Added<DropParticle>>,
    q_splashes: Query<(Entity, &SplashParticle), Added<SplashParticle>>,
) {
    for (entity, drop) in q_drops.iter() {
        let mat = materials.add(ColorMaterial::from_color(drop.color));
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(mat)));
    }
    for (entity, splash) in q_splashes.iter() {
        let mat = materials.add(ColorMaterial::from_color(splash.base_color));
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(mat)));
    }
}

// ── Spawn helpers ─────────────────────────────────────────────────────────────

/// Spawn one drop particle at `pos` and return its entity.
///
/// The radius should come from the configured random range; the color from
/// the active theme.  The entity starts at rest — gravity does the rest.
pub fn spawn_drop_particle(
    commands: &mut Commands,
    pos: Vec2,
    radius: f32,
    color: Color,
    config: &SimConfig,
) -> Entity {
    commands
        .spawn((
            DropParticle { radius, color },
            Trail::default(),
            Transform::from_translation(pos.extend(0.1)).with_scale(Vec3::splat(radius)),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::ball(1.0),
            Restitution::coefficient(config.particle_restitution),
            Friction::coefficient(config.particle_friction),
            ColliderMassProperties::Density(config.particle_density),
            Velocity::zero(),
            CollisionGroups::new(Group::GROUP_1, Group::GROUP_1 | Group::GROUP_2),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

/// Spawn one splash particle at `pos` with initial velocity `vel`.
///
/// Lives in a collision group that matches nothing, so it flies a pure
/// ballistic arc under the current gravity until the effects layer removes it.
pub fn spawn_splash_particle(
    commands: &mut Commands,
    pos: Vec2,
    vel: Vec2,
    color: Color,
    config: &SimConfig,
) -> Entity {
    commands
        .spawn((
            SplashParticle {
                age: 0.0,
                base_color: color,
            },
            Transform::from_translation(pos.extend(0.2))
                .with_scale(Vec3::splat(config.splash_radius)),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::ball(1.0),
            ColliderMassProperties::Density(config.particle_density),
            Velocity {
                linvel: vel,
                angvel: 0.0,
            },
            CollisionGroups::new(Group::GROUP_3, Group::NONE),
        ))
        .id()
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    // Centre vertex.
    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
