use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

const FALLBACK_THEME: &str = "catppuccin-mocha";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Declares the colour slots with their fallback value and a `Color` accessor each.
macro_rules! palette {
    ($($slot:ident: $fallback:literal,)*) => {
        /// Hex colours as written in theme files. Slots missing from a file
        /// keep their fallback.
        #[derive(Clone, Debug, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ThemeColors {
            $(pub $slot: String,)*
        }

        impl Default for ThemeColors {
            fn default() -> Self {
                Self {
                    $($slot: $fallback.to_string(),)*
                }
            }
        }

        impl ThemeColors {
            $(
                pub fn $slot(&self) -> Color {
                    parse_color(&self.$slot)
                }
            )*
        }
    };
}

palette! {
    bg: "#1e1e2e",
    fg: "#cdd6f4",
    text_muted: "#7f849c",
    accent: "#89b4fa",
    accent_dim: "#45475a",
    border: "#45475a",
    border_focused: "#89b4fa",
    header_bg: "#313244",
    header_fg: "#cdd6f4",
    bar_filled: "#89b4fa",
    bar_empty: "#313244",
    correct_bg: "#4caf50",
    incorrect_bg: "#ef4444",
    error: "#f38ba8",
    warning: "#f9e2af",
    success: "#a6e3a1",
}

/// `#rrggbb` to an RGB colour; anything else leaves the terminal default.
pub fn parse_color(hex: &str) -> Color {
    let hex = hex.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match (hex.len(), channel(0..2), channel(2..4), channel(4..6)) {
        (6, Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

impl Theme {
    /// A theme from the user's theme directory wins over a bundled one of the same name.
    pub fn load(name: &str) -> Option<Self> {
        Self::from_user_dir(name).or_else(|| Self::bundled(name))
    }

    fn user_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quizr").join("themes"))
    }

    fn from_user_dir(name: &str) -> Option<Self> {
        let path = Self::user_dir()?.join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        toml::from_str(&content)
            .inspect_err(|err| log::warn!("Ignoring theme {}: {err}", path.display()))
            .ok()
    }

    fn bundled(name: &str) -> Option<Self> {
        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::bundled(FALLBACK_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}
