//! Static arena geometry: boundary walls, tilted beam obstacles, center post.
//!
//! ## Flow
//!
//! 1. Anything that invalidates the arena — setup, reset, window resize,
//!    theme switch — writes an [`ArenaRebuild`] message.
//! 2. [`arena_rebuild_system`] drains pending requests, despawns every
//!    existing piece, and spawns a fresh randomized layout sized to the
//!    current container and colored from the active theme.
//!
//! Layout generation itself is a pure function ([`generate_layout`]) over an
//! explicit random source, so the randomization ranges are unit-testable
//! without a Bevy world.  Each generation is independent and unseeded.
//!
//! Pieces are classified by the typed [`ArenaKind`] component; color and any
//! other per-kind handling match on it exhaustively.

use crate::config::SimConfig;
use crate::scene::ContainerSize;
use crate::theme::ActiveTheme;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier2d::prelude::*;
use rand::Rng;

// ── Components, resources & messages ──────────────────────────────────────────

/// Which piece of static geometry an arena entity is.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArenaKind {
    /// One of the four boundary walls.
    Wall,
    /// A tilted beam obstacle particles cascade off.
    Beam,
    /// The short vertical post near mid-container.
    Post,
}

/// Request to tear down and regenerate all static geometry.
#[derive(Message, Debug, Clone, Copy)]
pub struct ArenaRebuild;

/// Shared unit quad mesh used by every arena piece (scaled per entity).
#[derive(Resource)]
pub struct ArenaMesh(pub Handle<Mesh>);

/// One rectangle of the generated layout, in world coordinates
/// (origin at container center, +y up).
#[derive(Debug, Clone, Copy)]
pub struct RectSpec {
    pub kind: ArenaKind,
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Counter-clockwise tilt in radians.
    pub angle: f32,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ArenaRebuild>()
            .add_systems(Startup, init_arena_mesh)
            // PostUpdate so same-frame rebuild requests from reset/resize/theme
            // systems are honored without a one-frame hole in the geometry.
            .add_systems(PostUpdate, arena_rebuild_system);
    }
}

fn init_arena_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(quad_mesh());
    commands.insert_resource(ArenaMesh(handle));
}

// ── Layout generation ─────────────────────────────────────────────────────────

/// Generate a full arena layout for a `width × height` container.
///
/// Returns the four walls followed by two beams and the center post.
/// Beam widths, vertical placements, and tilts, plus the post height and
/// vertical wobble, are drawn fresh from `rng` on every call.
pub fn generate_layout(
    width: f32,
    height: f32,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec<RectSpec> {
    let t = config.wall_thickness;
    let inset = config.wall_inset;
    let mut specs = Vec::with_capacity(7);

    // Walls sit just outside the container edge, pulled back by `inset` so a
    // sliver remains visible.
    let wall_y = height / 2.0 + t / 2.0 - inset;
    let wall_x = width / 2.0 + t / 2.0 - inset;
    specs.push(RectSpec {
        kind: ArenaKind::Wall,
        center: Vec2::new(0.0, -wall_y),
        half_extents: Vec2::new(width / 2.0, t / 2.0),
        angle: 0.0,
    });
    specs.push(RectSpec {
        kind: ArenaKind::Wall,
        center: Vec2::new(0.0, wall_y),
        half_extents: Vec2::new(width / 2.0, t / 2.0),
        angle: 0.0,
    });
    specs.push(RectSpec {
        kind: ArenaKind::Wall,
        center: Vec2::new(-wall_x, 0.0),
        half_extents: Vec2::new(t / 2.0, height / 2.0),
        angle: 0.0,
    });
    specs.push(RectSpec {
        kind: ArenaKind::Wall,
        center: Vec2::new(wall_x, 0.0),
        half_extents: Vec2::new(t / 2.0, height / 2.0),
        angle: 0.0,
    });

    // Two beams: one in the upper-middle band, one in the lower-middle band.
    // Placement fractions are measured from the top edge.
    let beam_half_h = config.beam_height / 2.0;
    for y_frac_min in [config.beam_upper_y_frac, config.beam_lower_y_frac] {
        let beam_width =
            width * (config.beam_width_frac_min + rng.gen_range(0.0..config.beam_width_frac_span));
        let y_frac = y_frac_min + rng.gen_range(0.0..config.beam_y_frac_span);
        specs.push(RectSpec {
            kind: ArenaKind::Beam,
            center: Vec2::new(0.0, height * (0.5 - y_frac)),
            half_extents: Vec2::new(beam_width / 2.0, beam_half_h),
            angle: rng.gen_range(-config.beam_max_tilt..config.beam_max_tilt),
        });
    }

    // Center post: randomized height, wobbling around mid-container.
    let post_height = height
        * (config.post_height_frac_min + rng.gen_range(0.0..config.post_height_frac_span));
    let wobble = height * config.post_y_wobble_frac;
    specs.push(RectSpec {
        kind: ArenaKind::Post,
        center: Vec2::new(0.0, rng.gen_range(-wobble..wobble)),
        half_extents: Vec2::new(config.post_width / 2.0, post_height / 2.0),
        angle: 0.0,
    });

    specs
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Tear down and regenerate all static geometry when a rebuild was requested.
///
/// Multiple pending requests collapse into a single rebuild.
pub fn arena_rebuild_system(
    mut commands: Commands,
    mut requests: MessageReader<ArenaRebuild>,
    existing: Query<Entity, With<ArenaKind>>,
    container: Res<ContainerSize>,
    config: Res<SimConfig>,
    theme: Res<ActiveTheme>,
    arena_mesh: Res<ArenaMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if requests.read().next().is_none() {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let mut rng = rand::thread_rng();
    let specs = generate_layout(container.width, container.height, &config, &mut rng);
    for spec in &specs {
        let color = match spec.kind {
            ArenaKind::Wall => theme.0.wall,
            ArenaKind::Beam => theme.0.beam,
            ArenaKind::Post => theme.0.post,
        };
        let mat = materials.add(ColorMaterial::from_color(color));
        commands.spawn((
            spec.kind,
            Transform::from_translation(spec.center.extend(0.05))
                .with_rotation(Quat::from_rotation_z(spec.angle))
                .with_scale(Vec3::new(
                    spec.half_extents.x * 2.0,
                    spec.half_extents.y * 2.0,
                    1.0,
                )),
            Visibility::default(),
            RigidBody::Fixed,
            // Unit cuboid; the transform scale stretches it to full size.
            Collider::cuboid(0.5, 0.5),
            CollisionGroups::new(Group::GROUP_2, Group::GROUP_1),
            Mesh2d(arena_mesh.0.clone()),
            MeshMaterial2d(mat),
        ));
    }
    println!("✓ Arena regenerated: {} pieces", specs.len());
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a unit (1×1, origin-centred) quad mesh.
fn quad_mesh() -> Mesh {
    let positions: Vec<[f32; 3]> = vec![
        [-0.5, 0.5, 0.0],
        [0.5, 0.5, 0.0],
        [0.5, -0.5, 0.0],
        [-0.5, -0.5, 0.0],
    ];
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; 4];
    let uvs: Vec<[f32; 2]> = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    // Two CCW triangles: [tl, br, tr] [tl, bl, br]
    let indices = Indices::U32(vec![0, 2, 1, 0, 3, 2]);
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(indices);
    mesh
}
