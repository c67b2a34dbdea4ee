//! Hourglass — a gravity-flipping particle drop toy.
//!
//! Particles rain into a walled container strewn with randomized obstacles;
//! when the container fills, a short countdown flips it upside-down and the
//! cycle starts again.  Rigid-body physics is delegated entirely to Rapier;
//! this crate owns the drop → fill → countdown → flip state machine and the
//! cosmetic layer (impact splashes, motion trails, color themes).

pub mod arena;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod hud;
pub mod input;
pub mod particle;
pub mod scene;
pub mod scheduler;
pub mod theme;
