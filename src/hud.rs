//! HUD: population / countdown readout, reset button, theme selector.
//!
//! ## Systems
//!
//! | System                  | Schedule | Purpose                               |
//! |-------------------------|----------|---------------------------------------|
//! | `setup_hud`             | Startup  | Spawn readout text and button row     |
//! | `status_display_system` | Update   | Refresh `<count>/<cap>` / countdown   |
//! | `hud_button_system`     | Update   | Reset + theme button clicks           |
//!
//! The readout always reflects explicit scheduler state: while a countdown
//! runs it shows the remaining seconds, otherwise the live population over
//! the cap.

use crate::config::SimConfig;
use crate::particle::DropParticle;
use crate::scene::ResetRequest;
use crate::scheduler::SpawnScheduler;
use crate::theme::{builtin_themes, ThemeSwitchRequest};
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the population / countdown readout text node.
#[derive(Component)]
pub struct StatusReadout;

/// Tags the RESET button.
#[derive(Component)]
pub struct ResetButton;

/// Tags a theme selector button with the theme name it applies.
#[derive(Component, Clone, Copy)]
pub struct ThemeButton(pub &'static str);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (status_display_system, hud_button_system));
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn readout_color() -> Color {
    Color::srgb(0.25, 0.28, 0.35)
}
fn button_bg() -> Color {
    Color::srgba(0.15, 0.17, 0.22, 0.85)
}
fn button_border() -> Color {
    Color::srgb(0.45, 0.48, 0.55)
}
fn button_text() -> Color {
    Color::srgb(0.85, 0.87, 0.92)
}

// ── Startup (wired in main.rs, after config load) ─────────────────────────────

/// Spawn the readout in the top-left corner and the button row (one button
/// per built-in theme, then RESET) along the top-right.
pub fn setup_hud(mut commands: Commands, config: Res<SimConfig>) {
    // ── Status readout ────────────────────────────────────────────────────────
    commands.spawn((
        Text::new(format!("0/{}", config.particle_cap)),
        TextFont {
            font_size: config.hud_font_size,
            ..default()
        },
        TextColor(readout_color()),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(14.0),
            ..default()
        },
        StatusReadout,
    ));

    // ── Button row ────────────────────────────────────────────────────────────
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            right: Val::Px(14.0),
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|row| {
            for theme in builtin_themes() {
                hud_button(row, theme.name, ThemeButton(theme.name));
            }
            hud_button(row, "RESET", ResetButton);
        });
}

/// Spawn one small bordered button with `label` and the given marker bundle.
fn hud_button(parent: &mut ChildSpawnerCommands<'_>, label: &str, marker: impl Bundle) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(button_bg()),
            BorderColor::all(button_border()),
            marker,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label.to_owned()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(button_text()),
            ));
        });
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Refresh the readout: countdown seconds while a countdown runs, otherwise
/// the live population over the cap.
pub fn status_display_system(
    scheduler: Res<SpawnScheduler>,
    config: Res<SimConfig>,
    q_drops: Query<(), With<DropParticle>>,
    mut q_text: Query<&mut Text, With<StatusReadout>>,
) {
    let status = match &scheduler.countdown {
        Some(countdown) => format!("Flip in: {}s", countdown.seconds_remaining),
        None => format!("{}/{}", q_drops.iter().count(), config.particle_cap),
    };

    for mut text in q_text.iter_mut() {
        if text.0 != status {
            *text = Text::new(status.clone());
        }
    }
}

/// Handle RESET and theme button presses; tint button text on hover.
#[allow(clippy::type_complexity)]
pub fn hud_button_system(
    reset_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<ResetButton>)>,
    theme_query: Query<
        (&Interaction, &ThemeButton, &Children),
        (Changed<Interaction>, Without<ResetButton>),
    >,
    mut btn_text: Query<&mut TextColor>,
    mut resets: MessageWriter<ResetRequest>,
    mut themes: MessageWriter<ThemeSwitchRequest>,
) {
    for (interaction, children) in reset_query.iter() {
        match interaction {
            Interaction::Pressed => {
                resets.write(ResetRequest);
            }
            Interaction::Hovered => tint(children, &mut btn_text, Color::WHITE),
            Interaction::None => tint(children, &mut btn_text, button_text()),
        }
    }

    for (interaction, theme, children) in theme_query.iter() {
        match interaction {
            Interaction::Pressed => {
                themes.write(ThemeSwitchRequest {
                    name: theme.0.to_owned(),
                });
            }
            Interaction::Hovered => tint(children, &mut btn_text, Color::WHITE),
            Interaction::None => tint(children, &mut btn_text, button_text()),
        }
    }
}

fn tint(children: &Children, btn_text: &mut Query<&mut TextColor>, color: Color) {
    for child in children.iter() {
        if let Ok(mut text_color) = btn_text.get_mut(child) {
            *text_color = TextColor(color);
        }
    }
}
