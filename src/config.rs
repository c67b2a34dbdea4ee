//! Runtime simulation configuration loaded from `assets/hourglass.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/hourglass.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<SimConfig>` to any system parameter list and read values
//! with `config.particle_cap`, `config.drop_interval_secs`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SimConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_drop_interval, validate_gravity_accel, validate_particle_cap,
    validate_splash_timing,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable simulation and presentation configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/hourglass.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Container ─────────────────────────────────────────────────────────────
    pub container_width: f32,
    pub container_height: f32,
    pub wall_thickness: f32,
    pub wall_inset: f32,

    // ── Gravity ───────────────────────────────────────────────────────────────
    pub gravity_accel: f32,

    // ── Particles ─────────────────────────────────────────────────────────────
    pub particle_cap: u32,
    pub drop_interval_secs: f32,
    pub spawn_edge_inset: f32,
    pub spawn_jitter_frac: f32,
    pub particle_radius_min: f32,
    pub particle_radius_max: f32,
    pub particle_restitution: f32,
    pub particle_friction: f32,
    pub particle_density: f32,

    // ── Flip countdown ────────────────────────────────────────────────────────
    pub flip_countdown_secs: u32,
    pub countdown_tick_secs: f32,

    // ── Splash effects ────────────────────────────────────────────────────────
    pub splash_impact_threshold: f32,
    pub splash_max_count: u32,
    pub splash_lifetime_secs: f32,
    pub splash_fade_delay_secs: f32,
    pub splash_fade_duration_secs: f32,
    pub splash_radius: f32,
    pub splash_speed_scale: f32,
    pub splash_rise_bias: f32,

    // ── Trails ────────────────────────────────────────────────────────────────
    pub trail_capacity: usize,
    pub trail_base_alpha: f32,

    // ── Arena generation ──────────────────────────────────────────────────────
    pub beam_width_frac_min: f32,
    pub beam_width_frac_span: f32,
    pub beam_height: f32,
    pub beam_upper_y_frac: f32,
    pub beam_lower_y_frac: f32,
    pub beam_y_frac_span: f32,
    pub beam_max_tilt: f32,
    pub post_width: f32,
    pub post_height_frac_min: f32,
    pub post_height_frac_span: f32,
    pub post_y_wobble_frac: f32,

    // ── HUD ───────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Container
            container_width: CONTAINER_WIDTH,
            container_height: CONTAINER_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            wall_inset: WALL_INSET,
            // Gravity
            gravity_accel: GRAVITY_ACCEL,
            // Particles
            particle_cap: PARTICLE_CAP,
            drop_interval_secs: DROP_INTERVAL_SECS,
            spawn_edge_inset: SPAWN_EDGE_INSET,
            spawn_jitter_frac: SPAWN_JITTER_FRAC,
            particle_radius_min: PARTICLE_RADIUS_MIN,
            particle_radius_max: PARTICLE_RADIUS_MAX,
            particle_restitution: PARTICLE_RESTITUTION,
            particle_friction: PARTICLE_FRICTION,
            particle_density: PARTICLE_DENSITY,
            // Flip countdown
            flip_countdown_secs: FLIP_COUNTDOWN_SECS,
            countdown_tick_secs: COUNTDOWN_TICK_SECS,
            // Splash effects
            splash_impact_threshold: SPLASH_IMPACT_THRESHOLD,
            splash_max_count: SPLASH_MAX_COUNT,
            splash_lifetime_secs: SPLASH_LIFETIME_SECS,
            splash_fade_delay_secs: SPLASH_FADE_DELAY_SECS,
            splash_fade_duration_secs: SPLASH_FADE_DURATION_SECS,
            splash_radius: SPLASH_RADIUS,
            splash_speed_scale: SPLASH_SPEED_SCALE,
            splash_rise_bias: SPLASH_RISE_BIAS,
            // Trails
            trail_capacity: TRAIL_CAPACITY,
            trail_base_alpha: TRAIL_BASE_ALPHA,
            // Arena generation
            beam_width_frac_min: BEAM_WIDTH_FRAC_MIN,
            beam_width_frac_span: BEAM_WIDTH_FRAC_SPAN,
            beam_height: BEAM_HEIGHT,
            beam_upper_y_frac: BEAM_UPPER_Y_FRAC,
            beam_lower_y_frac: BEAM_LOWER_Y_FRAC,
            beam_y_frac_span: BEAM_Y_FRAC_SPAN,
            beam_max_tilt: BEAM_MAX_TILT,
            post_width: POST_WIDTH,
            post_height_frac_min: POST_HEIGHT_FRAC_MIN,
            post_height_frac_span: POST_HEIGHT_FRAC_SPAN,
            post_y_wobble_frac: POST_Y_WOBBLE_FRAC,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl SimConfig {
    /// Check the loaded values against their safe ranges.
    ///
    /// Returns the first violation found, or `Ok(())` when every checked
    /// field is usable.
    pub fn validate(&self) -> crate::error::SimResult<()> {
        validate_drop_interval(self.drop_interval_secs)?;
        validate_particle_cap(self.particle_cap)?;
        validate_gravity_accel(self.gravity_accel)?;
        validate_splash_timing(
            self.splash_lifetime_secs,
            self.splash_fade_delay_secs,
            self.splash_fade_duration_secs,
        )?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/hourglass.toml` and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse errors and values that
/// fail [`SimConfig::validate`] are printed to stderr and the compiled
/// defaults are kept; a missing file is silently ignored.
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    let path = "assets/hourglass.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    println!("✓ Loaded simulation config from {path}");
                }
                Err(e) => {
                    eprintln!("⚠ Rejected {path}: {e}; using defaults");
                }
            },
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn default_matches_constants() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.particle_cap, PARTICLE_CAP);
        assert_eq!(cfg.drop_interval_secs, DROP_INTERVAL_SECS);
        assert_eq!(cfg.flip_countdown_secs, FLIP_COUNTDOWN_SECS);
        assert_eq!(cfg.trail_capacity, TRAIL_CAPACITY);
        assert_eq!(cfg.wall_thickness, WALL_THICKNESS);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg: SimConfig = toml::from_str("particle_cap = 25\n").unwrap();
        assert_eq!(cfg.particle_cap, 25);
        assert_eq!(cfg.drop_interval_secs, DROP_INTERVAL_SECS);
        assert_eq!(cfg.gravity_accel, GRAVITY_ACCEL);
    }

    #[test]
    fn bad_values_fail_validation() {
        let cfg: SimConfig = toml::from_str("drop_interval_secs = 0.0\n").unwrap();
        assert!(cfg.validate().is_err());

        let cfg: SimConfig = toml::from_str("particle_cap = 0\n").unwrap();
        assert!(cfg.validate().is_err());

        let cfg: SimConfig =
            toml::from_str("splash_fade_delay_secs = 0.6\nsplash_fade_duration_secs = 0.4\n")
                .unwrap();
        assert!(cfg.validate().is_err());
    }
}
