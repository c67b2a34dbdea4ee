//! Simulation-specific error types.
//!
//! The toy has no failing runtime operations (timers are plain fields and
//! spawning cannot fail), so the only error surface is configuration: values
//! loaded from `assets/hourglass.toml` that would put the simulation into a
//! nonsensical state are rejected here before they reach any system.

use std::fmt;

/// Top-level error enum for the hourglass simulation.
#[derive(Debug)]
pub enum SimError {
    /// A tuning value is outside its safe operating range.
    /// Returned by the validation helpers consulted during config load.
    UnsafeConstant {
        /// Name of the offending field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `drop_interval_secs` is strictly positive.
///
/// A zero or negative interval would spawn a particle every frame and blow
/// through the cap within a second.
pub fn validate_drop_interval(value: f32) -> SimResult<()> {
    if value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name: "drop_interval_secs",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless `particle_cap` is at least 1.
pub fn validate_particle_cap(value: u32) -> SimResult<()> {
    if value == 0 {
        Err(SimError::UnsafeConstant {
            name: "particle_cap",
            value: value as f32,
            safe_range: "[1, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless `gravity_accel` is strictly positive.
///
/// The orientation machinery owns the sign; the configured magnitude must not.
pub fn validate_gravity_accel(value: f32) -> SimResult<()> {
    if value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name: "gravity_accel",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if the splash fade window extends past the splash
/// lifetime — a splash must never outlive its unconditional removal.
pub fn validate_splash_timing(lifetime: f32, fade_delay: f32, fade_duration: f32) -> SimResult<()> {
    if lifetime <= 0.0 {
        return Err(SimError::UnsafeConstant {
            name: "splash_lifetime_secs",
            value: lifetime,
            safe_range: "(0.0, ∞)",
        });
    }
    if fade_delay + fade_duration > lifetime {
        return Err(SimError::UnsafeConstant {
            name: "splash_fade_delay_secs + splash_fade_duration_secs",
            value: fade_delay + fade_duration,
            safe_range: "≤ splash_lifetime_secs",
        });
    }
    Ok(())
}
