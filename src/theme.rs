//! Color themes: named palette/background records and live switching.
//!
//! A [`Theme`] affects colors only — never shapes, masses, or any other
//! physical property.  Exactly one theme is active at a time
//! ([`ActiveTheme`]); switching via [`ThemeSwitchRequest`]:
//!
//! 1. looks the name up in the built-in registry (unknown names are silently
//!    ignored),
//! 2. reapplies the window background ([`ClearColor`]),
//! 3. requests an arena rebuild so walls/beams/post pick up the new colors,
//! 4. recolors every live drop and splash particle by resampling from the
//!    new palette.

use crate::arena::ArenaRebuild;
use crate::particle::{DropParticle, SplashParticle};
use bevy::prelude::*;
use rand::Rng;

// ── Theme record ──────────────────────────────────────────────────────────────

/// Immutable named color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Registry key, also used as the HUD button label.
    pub name: &'static str,
    /// Window clear color.
    pub background: Color,
    /// Ordered palette particles sample from.
    pub palette: Vec<Color>,
    /// Boundary wall fill.
    pub wall: Color,
    /// Beam obstacle fill.
    pub beam: Color,
    /// Center post fill.
    pub post: Color,
}

impl Theme {
    /// Sample one particle color uniformly from the palette.
    pub fn sample_color(&self, rng: &mut impl Rng) -> Color {
        self.palette[rng.gen_range(0..self.palette.len())]
    }
}

/// Convert a packed `0xRRGGBB` value into an sRGB [`Color`].
fn rgb(hex: u32) -> Color {
    Color::srgb(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// The built-in theme registry, in HUD display order.
///
/// "paper" reproduces the toy's original look; the others are darker
/// variations on the same six-color palette idea.
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme {
            name: "paper",
            background: rgb(0xffffff),
            palette: vec![
                rgb(0xef4444),
                rgb(0xf97316),
                rgb(0xeab308),
                rgb(0x22c55e),
                rgb(0x3b82f6),
                rgb(0x8b5cf6),
            ],
            wall: rgb(0x9ca3af),
            beam: rgb(0xcbd5e1),
            post: rgb(0xe2e8f0),
        },
        Theme {
            name: "midnight",
            background: rgb(0x0f172a),
            palette: vec![
                rgb(0x38bdf8),
                rgb(0x818cf8),
                rgb(0xc084fc),
                rgb(0xf472b6),
                rgb(0x2dd4bf),
                rgb(0xfacc15),
            ],
            wall: rgb(0x334155),
            beam: rgb(0x475569),
            post: rgb(0x64748b),
        },
        Theme {
            name: "ember",
            background: rgb(0x1c1917),
            palette: vec![
                rgb(0xfbbf24),
                rgb(0xf97316),
                rgb(0xef4444),
                rgb(0xdc2626),
                rgb(0xfde68a),
                rgb(0xfb923c),
            ],
            wall: rgb(0x44403c),
            beam: rgb(0x57534e),
            post: rgb(0x78716c),
        },
    ]
}

/// Look up a built-in theme by name.
pub fn find_theme(name: &str) -> Option<Theme> {
    builtin_themes().into_iter().find(|t| t.name == name)
}

// ── Resources & messages ──────────────────────────────────────────────────────

/// The currently active theme.
#[derive(Resource, Debug, Clone)]
pub struct ActiveTheme(pub Theme);

impl Default for ActiveTheme {
    fn default() -> Self {
        Self(builtin_themes().remove(0))
    }
}

/// Request to switch the active theme by registry name.
///
/// Unknown names are ignored without effect.
#[derive(Message, Debug, Clone)]
pub struct ThemeSwitchRequest {
    pub name: String,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveTheme>()
            .add_message::<ThemeSwitchRequest>()
            .add_systems(Update, theme_switch_system);
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Apply pending theme-switch requests.
///
/// Recoloring touches only the render-facing side of each particle: the
/// stored base color and its `ColorMaterial`.  Colliders, masses, and
/// restitution are untouched, and splash fade state keeps running against
/// the newly sampled base color.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn theme_switch_system(
    mut requests: MessageReader<ThemeSwitchRequest>,
    mut active: ResMut<ActiveTheme>,
    mut clear_color: ResMut<ClearColor>,
    mut rebuild: MessageWriter<ArenaRebuild>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut q_drops: Query<
        (&mut DropParticle, &MeshMaterial2d<ColorMaterial>),
        Without<SplashParticle>,
    >,
    mut q_splashes: Query<
        (&mut SplashParticle, &MeshMaterial2d<ColorMaterial>),
        Without<DropParticle>,
    >,
) {
    // Only the last pending request matters.
    let Some(request) = requests.read().last() else {
        return;
    };

    let Some(theme) = find_theme(&request.name) else {
        // Unknown theme name: silently ignore.
        return;
    };
    if theme.name == active.0.name {
        return;
    }

    println!("✓ Theme switched to '{}'", theme.name);
    active.0 = theme;
    clear_color.0 = active.0.background;
    rebuild.write(ArenaRebuild);

    let mut rng = rand::thread_rng();
    for (mut drop, material) in q_drops.iter_mut() {
        let color = active.0.sample_color(&mut rng);
        drop.color = color;
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.color = color;
        }
    }
    for (mut splash, material) in q_splashes.iter_mut() {
        let color = active.0.sample_color(&mut rng);
        splash.base_color = color;
        if let Some(mat) = materials.get_mut(&material.0) {
            // Preserve whatever alpha the fade system last wrote.
            let alpha = Srgba::from(mat.color).alpha;
            let c = Srgba::from(color);
            mat.color = Color::srgba(c.red, c.green, c.blue, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_unique_names_and_nonempty_palettes() {
        let themes = builtin_themes();
        assert!(!themes.is_empty());
        for theme in &themes {
            assert!(!theme.palette.is_empty(), "{} palette empty", theme.name);
        }
        let mut names: Vec<_> = themes.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), themes.len(), "theme names must be unique");
    }

    #[test]
    fn find_theme_known_and_unknown() {
        assert!(find_theme("paper").is_some());
        assert!(find_theme("midnight").is_some());
        assert!(find_theme("does-not-exist").is_none());
    }

    #[test]
    fn default_active_theme_is_first_registry_entry() {
        let active = ActiveTheme::default();
        assert_eq!(active.0.name, builtin_themes()[0].name);
    }

    #[test]
    fn sample_color_draws_from_palette() {
        let theme = find_theme("paper").unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let c = theme.sample_color(&mut rng);
            assert!(theme.palette.contains(&c));
        }
    }

    #[test]
    fn rgb_unpacks_channels() {
        let c = Srgba::from(rgb(0xff8000));
        assert!((c.red - 1.0).abs() < 1e-6);
        assert!((c.green - 128.0 / 255.0).abs() < 1e-6);
        assert!(c.blue.abs() < 1e-6);
    }
}
