//! Spawn scheduling: the drop → fill → countdown → flip cycle.
//!
//! ## State
//!
//! All timing state lives in one [`SpawnScheduler`] resource:
//!
//! - `dropping` + `drop_elapsed`: the repeating drop tick.  There is at most
//!   one drop timer because it *is* these two fields; "cancelling" it means
//!   clearing them, which is always safe.
//! - `countdown: Option<Countdown>`: the pre-flip countdown.  Whether a
//!   countdown is active is an explicit `is_some()` check, never an
//!   inference from displayed text.
//!
//! ## Cycle
//!
//! While `dropping`, every elapsed drop interval spawns one particle at the
//! orientation-appropriate edge — unless the live population has reached the
//! cap, in which case dropping stops and a countdown begins (exactly once;
//! re-reaching the cap while a countdown runs has no further effect).  The
//! countdown ticks once per second from 3; on reaching zero it emits a
//! [`FlipRequest`] and clears itself.  The flip handler in
//! [`crate::scene`] then inverts gravity, clears the world, and calls
//! [`SpawnScheduler::start`] to begin the next fill.

use crate::config::SimConfig;
use crate::particle::{spawn_drop_particle, DropParticle};
use crate::scene::{ContainerSize, FlipRequest, Orientation};
use crate::theme::ActiveTheme;
use bevy::prelude::*;
use rand::Rng;

// ── State ─────────────────────────────────────────────────────────────────────

/// A running pre-flip countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    /// Whole seconds still displayed; the flip fires when this reaches zero.
    pub seconds_remaining: u32,
    /// Seconds accumulated toward the next one-second tick.
    pub tick_elapsed: f32,
}

/// Owns the drop timer and the countdown timer.
///
/// Starting either timer implicitly cancels the previous instance of the
/// same kind; they are plain fields, so two of a kind cannot coexist.
#[derive(Resource, Debug, Clone)]
pub struct SpawnScheduler {
    /// Whether the repeating drop tick is running.
    pub dropping: bool,
    /// Seconds accumulated toward the next drop.
    pub drop_elapsed: f32,
    /// The active countdown, if any.
    pub countdown: Option<Countdown>,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        // The toy starts dropping immediately.
        Self {
            dropping: true,
            drop_elapsed: 0.0,
            countdown: None,
        }
    }
}

impl SpawnScheduler {
    /// (Re)start the drop cycle: cancel any countdown, zero the drop
    /// accumulator, begin dropping.
    pub fn start(&mut self) {
        self.countdown = None;
        self.drop_elapsed = 0.0;
        self.dropping = true;
    }

    /// Stop the drop tick; the countdown (if any) is unaffected.
    pub fn stop_dropping(&mut self) {
        self.dropping = false;
        self.drop_elapsed = 0.0;
    }

    /// Cancel the countdown (if any); the drop tick is unaffected.
    pub fn clear_countdown(&mut self) {
        self.countdown = None;
    }

    /// Begin a countdown from `seconds`, replacing any existing one.
    pub fn begin_countdown(&mut self, seconds: u32) {
        self.countdown = Some(Countdown {
            seconds_remaining: seconds,
            tick_elapsed: 0.0,
        });
    }

    /// Whether a countdown is currently running.
    #[inline]
    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Advance the drop timer by `dt`; returns how many drops fell due.
    ///
    /// Returns 0 while the drop tick is stopped.
    pub fn tick_drop(&mut self, dt: f32, interval_secs: f32) -> u32 {
        if !self.dropping {
            return 0;
        }
        self.drop_elapsed += dt;
        let mut due = 0;
        while self.drop_elapsed >= interval_secs {
            self.drop_elapsed -= interval_secs;
            due += 1;
        }
        due
    }

    /// Advance the countdown by `dt`.  Returns `true` exactly when the
    /// countdown reaches zero; the countdown clears itself and the caller
    /// must trigger the flip.
    pub fn tick_countdown(&mut self, dt: f32, tick_secs: f32) -> bool {
        let Some(countdown) = self.countdown.as_mut() else {
            return false;
        };
        countdown.tick_elapsed += dt;
        while countdown.tick_elapsed >= tick_secs {
            countdown.tick_elapsed -= tick_secs;
            countdown.seconds_remaining = countdown.seconds_remaining.saturating_sub(1);
            if countdown.seconds_remaining == 0 {
                self.countdown = None;
                return true;
            }
        }
        false
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnScheduler>()
            .add_systems(Update, (particle_drop_system, countdown_system));
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// The repeating drop tick.
///
/// Each due drop checks the live population first: below the cap it spawns
/// one particle at a horizontally-jittered position near container centre,
/// at the edge the current orientation drops from; at the cap it stops the
/// drop tick and starts the countdown, guarded so an already-running
/// countdown is never restarted.
pub fn particle_drop_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<SimConfig>,
    container: Res<ContainerSize>,
    orientation: Res<Orientation>,
    theme: Res<ActiveTheme>,
    mut scheduler: ResMut<SpawnScheduler>,
    q_drops: Query<(), With<DropParticle>>,
) {
    let due = scheduler.tick_drop(time.delta_secs(), config.drop_interval_secs);
    if due == 0 {
        return;
    }

    let mut rng = rand::thread_rng();
    let mut population = q_drops.iter().count() as u32;

    for _ in 0..due {
        if population >= config.particle_cap {
            scheduler.stop_dropping();
            if !scheduler.countdown_active() {
                scheduler.begin_countdown(config.flip_countdown_secs);
            }
            return;
        }

        let jitter_half = container.width * config.spawn_jitter_frac / 2.0;
        let pos = Vec2::new(
            rng.gen_range(-jitter_half..jitter_half),
            orientation.spawn_y(container.height, config.spawn_edge_inset),
        );
        let radius = rng.gen_range(config.particle_radius_min..config.particle_radius_max);
        let color = theme.0.sample_color(&mut rng);
        spawn_drop_particle(&mut commands, pos, radius, color, &config);
        population += 1;
    }
}

/// Tick the pre-flip countdown; emit exactly one [`FlipRequest`] when it
/// reaches zero.
pub fn countdown_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut flips: MessageWriter<FlipRequest>,
) {
    if scheduler.tick_countdown(time.delta_secs(), config.countdown_tick_secs) {
        flips.write(FlipRequest);
    }
}
