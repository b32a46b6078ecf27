//! Configuration persistence for snapnote settings

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage and annotation styles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::RED
    }
}

impl ShapeColor {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Selection indicator blue
    pub const DODGER_BLUE: Self = Self::rgb(30.0 / 255.0, 144.0 / 255.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build a color from 8-bit channels
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Save location for exported captures (Pictures or Documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

/// Global capture hotkey parsed from its settings string, e.g. `Ctrl+Shift+S`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: HotkeyKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyKey {
    PrintScreen,
    F12,
    S,
    C,
}

impl Hotkey {
    /// Parse a hotkey string. Unknown keys fall back to PrintScreen.
    pub fn parse(hotkey: &str) -> Self {
        let key = if hotkey.contains("PrintScreen") {
            HotkeyKey::PrintScreen
        } else if hotkey.contains("F12") {
            HotkeyKey::F12
        } else if hotkey.ends_with("+S") {
            HotkeyKey::S
        } else if hotkey.ends_with("+C") {
            HotkeyKey::C
        } else {
            HotkeyKey::PrintScreen
        };
        Self {
            ctrl: hotkey.contains("Ctrl"),
            alt: hotkey.contains("Alt"),
            shift: hotkey.contains("Shift"),
            key,
        }
    }
}

/// Read-only tool defaults handed to an editing session when it starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolDefaults {
    pub stroke_width: f32,
    pub opacity: f32,
    pub color: ShapeColor,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        SnapNoteConfig::default().tool_defaults()
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapNoteConfig {
    /// Global hotkey that starts a capture
    pub capture_hotkey: String,
    /// Initial opacity for new annotations (0.0-1.0)
    pub default_opacity: f32,
    /// Initial stroke width for new annotations
    pub default_stroke_width: f32,
    /// Initial annotation color
    pub default_color: ShapeColor,
    /// UI language name, resolved by the localization layer
    pub language: String,
    /// Where exported captures are saved by default
    pub save_location: SaveLocation,
}

impl Default for SnapNoteConfig {
    fn default() -> Self {
        Self {
            capture_hotkey: "Ctrl+Shift+S".to_string(),
            default_opacity: 1.0,
            default_stroke_width: 3.0,
            default_color: ShapeColor::RED,
            language: "English".to_string(),
            save_location: SaveLocation::Pictures,
        }
    }
}

impl SnapNoteConfig {
    /// Directory name used under the platform config dir
    pub const ID: &'static str = "snapnote";

    /// Default settings file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("settings.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|json| serde_json::from_str(&json).map_err(anyhow::Error::from))
        {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path().context("no config directory available")?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Snapshot of the values an editing session starts with
    pub fn tool_defaults(&self) -> ToolDefaults {
        ToolDefaults {
            stroke_width: self.default_stroke_width,
            opacity: self.default_opacity.clamp(0.0, 1.0),
            color: self.default_color,
        }
    }

    pub fn hotkey(&self) -> Hotkey {
        Hotkey::parse(&self.capture_hotkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgba_u8() {
        assert_eq!(ShapeColor::RED.to_rgba_u8(), [255, 0, 0, 255]);
        assert_eq!(ShapeColor::RED.with_alpha(0.5).to_rgba_u8(), [255, 0, 0, 128]);
        assert_eq!(
            ShapeColor::from_rgba_u8(30, 144, 255, 255).to_rgba_u8(),
            [30, 144, 255, 255]
        );
    }

    #[test]
    fn test_hotkey_parse() {
        let hk = Hotkey::parse("Ctrl+Shift+S");
        assert!(hk.ctrl && hk.shift && !hk.alt);
        assert_eq!(hk.key, HotkeyKey::S);

        assert_eq!(Hotkey::parse("Ctrl+F12").key, HotkeyKey::F12);
        assert_eq!(Hotkey::parse("Alt+PrintScreen").key, HotkeyKey::PrintScreen);
        assert_eq!(Hotkey::parse("garbage").key, HotkeyKey::PrintScreen);
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let config = SnapNoteConfig {
            default_opacity: 0.5,
            default_stroke_width: 4.0,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(SnapNoteConfig::load_from(&path), config);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(SnapNoteConfig::load_from(&path), SnapNoteConfig::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SnapNoteConfig =
            serde_json::from_str(r#"{ "default_stroke_width": 6.0 }"#).unwrap();
        assert_eq!(config.default_stroke_width, 6.0);
        assert_eq!(config.default_opacity, 1.0);
        assert_eq!(config.capture_hotkey, "Ctrl+Shift+S");
    }

    #[test]
    fn test_tool_defaults_clamps_opacity() {
        let config = SnapNoteConfig {
            default_opacity: 3.0,
            ..Default::default()
        };
        assert_eq!(config.tool_defaults().opacity, 1.0);
    }
}
