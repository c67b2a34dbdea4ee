//! Centralised simulation and presentation constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::SimConfig`] mirrors every constant for runtime override
//! via `assets/hourglass.toml`; this file remains the authoritative default.

// ── Container ─────────────────────────────────────────────────────────────────

/// Initial container (window) width in pixels.
///
/// The live value is tracked by [`crate::scene::ContainerSize`] and follows
/// window resizes; this constant only seeds the first frame.
pub const CONTAINER_WIDTH: f32 = 800.0;

/// Initial container (window) height in pixels.
pub const CONTAINER_HEIGHT: f32 = 600.0;

/// Thickness of the four boundary walls (px).
pub const WALL_THICKNESS: f32 = 30.0;

/// How far each wall is pulled back inside the container edge (px).
///
/// Keeps a sliver of wall visible instead of placing the full slab outside
/// the viewport.
pub const WALL_INSET: f32 = 5.0;

// ── Gravity ───────────────────────────────────────────────────────────────────

/// Magnitude of vertical gravity (px/s²).
///
/// 980 makes one world pixel behave like one centimetre under Earth gravity,
/// which reads naturally at the default container scale.  The sign applied to
/// the Rapier world is derived from [`crate::scene::Orientation`]; the
/// horizontal component is always zero.
pub const GRAVITY_ACCEL: f32 = 980.0;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Maximum simultaneous drop particles before the flip countdown starts.
///
/// Splash particles never count against this cap.
pub const PARTICLE_CAP: u32 = 100;

/// Seconds between automatic particle drops while the scheduler is running.
pub const DROP_INTERVAL_SECS: f32 = 0.15;

/// Vertical inset from the spawn edge at which new particles appear (px).
pub const SPAWN_EDGE_INSET: f32 = 10.0;

/// Width of the horizontal spawn jitter band as a fraction of container width.
///
/// Drops land in `centre ± width × SPAWN_JITTER_FRAC / 2`.
pub const SPAWN_JITTER_FRAC: f32 = 0.3;

/// Minimum drop-particle radius (px).
pub const PARTICLE_RADIUS_MIN: f32 = 8.0;

/// Maximum drop-particle radius (px).
pub const PARTICLE_RADIUS_MAX: f32 = 12.0;

/// Restitution coefficient for drop particles.
/// 0.0 = perfectly inelastic; 1.0 = perfectly elastic.
pub const PARTICLE_RESTITUTION: f32 = 0.4;

/// Friction coefficient for drop-particle contacts.
pub const PARTICLE_FRICTION: f32 = 0.05;

/// Collider density for drop particles (mass per px²).
///
/// Kept low so a full container of 100 particles settles without the stack
/// crushing the bottom layer through the floor.
pub const PARTICLE_DENSITY: f32 = 0.001;

// ── Flip countdown ────────────────────────────────────────────────────────────

/// Seconds the countdown displays before the container flips.
pub const FLIP_COUNTDOWN_SECS: u32 = 3;

/// Seconds per countdown tick.
pub const COUNTDOWN_TICK_SECS: f32 = 1.0;

// ── Splash effects ────────────────────────────────────────────────────────────

/// Impact speed (px/s) below which a particle–arena collision spawns no splash.
///
/// Equivalent to ~2 px per 60 Hz physics step; slow rolls and settled stacks
/// stay quiet while genuine drops splash.
pub const SPLASH_IMPACT_THRESHOLD: f32 = 120.0;

/// Maximum splash particles spawned by a single impact.
pub const SPLASH_MAX_COUNT: u32 = 8;

/// Seconds a splash particle lives before unconditional removal.
pub const SPLASH_LIFETIME_SECS: f32 = 0.8;

/// Seconds after spawn before a splash particle begins fading.
pub const SPLASH_FADE_DELAY_SECS: f32 = 0.4;

/// Seconds over which a splash particle fades from opaque to transparent.
pub const SPLASH_FADE_DURATION_SECS: f32 = 0.4;

/// Splash particle collider radius (px).
pub const SPLASH_RADIUS: f32 = 2.5;

/// Outward splash speed as a fraction of the impact speed.
pub const SPLASH_SPEED_SCALE: f32 = 0.35;

/// Fixed splash launch speed against gravity (px/s), added on top of the
/// radial component so splashes arc instead of skating along the surface.
pub const SPLASH_RISE_BIAS: f32 = 60.0;

// ── Trails ────────────────────────────────────────────────────────────────────

/// Recent positions retained per drop particle for the motion trail.
pub const TRAIL_CAPACITY: usize = 15;

/// Alpha of the newest trail segment; older segments ramp down toward zero.
pub const TRAIL_BASE_ALPHA: f32 = 0.35;

// ── Arena generation ──────────────────────────────────────────────────────────

/// Beam obstacle width range as a fraction of container width: min + span.
pub const BEAM_WIDTH_FRAC_MIN: f32 = 0.5;
pub const BEAM_WIDTH_FRAC_SPAN: f32 = 0.3;

/// Beam obstacle height (px).
pub const BEAM_HEIGHT: f32 = 20.0;

/// Upper beam vertical placement, measured from the top edge as a fraction of
/// container height: `BEAM_UPPER_Y_FRAC + rand(BEAM_Y_FRAC_SPAN)`.
pub const BEAM_UPPER_Y_FRAC: f32 = 0.25;

/// Lower beam vertical placement, measured from the top edge.
pub const BEAM_LOWER_Y_FRAC: f32 = 0.55;

/// Random span added to either beam's vertical placement fraction.
pub const BEAM_Y_FRAC_SPAN: f32 = 0.2;

/// Maximum beam tilt in radians (±15°).
pub const BEAM_MAX_TILT: f32 = std::f32::consts::PI / 12.0;

/// Center post width (px).
pub const POST_WIDTH: f32 = 15.0;

/// Center post height range as a fraction of container height: min + span.
pub const POST_HEIGHT_FRAC_MIN: f32 = 0.15;
pub const POST_HEIGHT_FRAC_SPAN: f32 = 0.15;

/// Center post vertical wobble around mid-container as a fraction of height.
pub const POST_Y_WOBBLE_FRAC: f32 = 0.05;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Font size for the population / countdown readout.
pub const HUD_FONT_SIZE: f32 = 22.0;
