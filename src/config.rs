use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoltieConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_layer")]
    pub layer: String,
    #[serde(default = "default_anchor")]
    pub anchor: String,
    #[serde(default = "default_margin")]
    pub margin_top: i32,
    #[serde(default)]
    pub margin_bottom: i32,
    #[serde(default)]
    pub margin_left: i32,
    #[serde(default = "default_margin")]
    pub margin_right: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_true")]
    pub show_source: bool,
    #[serde(default = "default_true")]
    pub show_chemistry: bool,
    #[serde(default = "default_true")]
    pub show_percentage: bool,
    #[serde(default = "default_true")]
    pub show_saving_mode: bool,
    #[serde(default = "default_true")]
    pub show_full_time: bool,
    #[serde(default = "default_true")]
    pub show_remaining_time: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_fg_color", deserialize_with = "deserialize_color")]
    pub fg_color: [u8; 4],
    #[serde(default = "default_bg_color", deserialize_with = "deserialize_color")]
    pub bg_color: [u8; 4],
    #[serde(default = "default_label_color", deserialize_with = "deserialize_color")]
    pub label_color: [u8; 4],
    #[serde(default = "default_good_color", deserialize_with = "deserialize_color")]
    pub charge_good_color: [u8; 4],
    #[serde(default = "default_warn_color", deserialize_with = "deserialize_color")]
    pub charge_warn_color: [u8; 4],
    #[serde(default = "default_crit_color", deserialize_with = "deserialize_color")]
    pub charge_crit_color: [u8; 4],
}

// Defaults

fn default_layer() -> String { "top".into() }
fn default_anchor() -> String { "top right".into() }
fn default_margin() -> i32 { 20 }
fn default_true() -> bool { true }
fn default_opacity() -> f32 { 1.0 }
fn default_font() -> String { "monospace".into() }
fn default_font_size() -> f32 { 16.0 }
fn default_poll_interval() -> u64 { 1 }

fn default_fg_color() -> [u8; 4] { [0xFF, 0xFF, 0xFF, 0xFF] }
fn default_bg_color() -> [u8; 4] { [0x1A, 0x1A, 0x2E, 0xCC] }
fn default_label_color() -> [u8; 4] { [0x9C, 0xA3, 0xAF, 0xFF] }
fn default_good_color() -> [u8; 4] { [0x4A, 0xDE, 0x80, 0xFF] }
fn default_warn_color() -> [u8; 4] { [0xFB, 0xBF, 0x24, 0xFF] }
fn default_crit_color() -> [u8; 4] { [0xEF, 0x44, 0x44, 0xFF] }

fn deserialize_color<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 4], D::Error> {
    let s = String::deserialize(d)?;
    parse_color(&s).map_err(serde::de::Error::custom)
}

pub fn parse_color(s: &str) -> Result<[u8; 4]> {
    let s = s.trim_start_matches('#');
    anyhow::ensure!(s.len() == 6 || s.len() == 8, "Color must be RRGGBB or RRGGBBAA");
    let r = u8::from_str_radix(&s[0..2], 16)?;
    let g = u8::from_str_radix(&s[2..4], 16)?;
    let b = u8::from_str_radix(&s[4..6], 16)?;
    let a = if s.len() == 8 { u8::from_str_radix(&s[6..8], 16)? } else { 0xFF };
    Ok([r, g, b, a])
}

// Implementations

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            layer: default_layer(),
            anchor: default_anchor(),
            margin_top: default_margin(),
            margin_bottom: 0,
            margin_left: 0,
            margin_right: default_margin(),
            opacity: default_opacity(),
            output: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            show_source: true,
            show_chemistry: true,
            show_percentage: true,
            show_saving_mode: true,
            show_full_time: true,
            show_remaining_time: true,
            poll_interval: default_poll_interval(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            fg_color: default_fg_color(),
            bg_color: default_bg_color(),
            label_color: default_label_color(),
            charge_good_color: default_good_color(),
            charge_warn_color: default_warn_color(),
            charge_crit_color: default_crit_color(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs_path().join("config.toml")
}

fn dirs_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
            PathBuf::from(home).join(".config")
        });
    base.join("voltie")
}

/// Read and parse the config file as a toml_edit document, preserving formatting and comments.
fn read_config_doc(path: &std::path::Path) -> Option<toml_edit::DocumentMut> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to read config: {}", e);
            return None;
        }
    };
    match content.parse::<toml_edit::DocumentMut>() {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("Failed to parse config: {}", e);
            None
        }
    }
}

/// Write a toml_edit document back to disk, preserving formatting.
fn write_config_doc(path: &std::path::Path, doc: &toml_edit::DocumentMut) {
    if let Err(e) = std::fs::write(path, doc.to_string()) {
        log::warn!("Failed to write config: {}", e);
    }
}

/// Ensure a [window] table exists in the document, creating one if needed.
fn ensure_window_table(doc: &mut toml_edit::DocumentMut) {
    if !doc.contains_key("window") {
        doc["window"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
}

pub fn save_margins_to_config(path: &std::path::Path, top: i32, right: i32, bottom: i32, left: i32) {
    let Some(mut doc) = read_config_doc(path) else { return };
    ensure_window_table(&mut doc);

    doc["window"]["margin_top"] = toml_edit::value(top as i64);
    doc["window"]["margin_right"] = toml_edit::value(right as i64);
    doc["window"]["margin_bottom"] = toml_edit::value(bottom as i64);
    doc["window"]["margin_left"] = toml_edit::value(left as i64);

    write_config_doc(path, &doc);
    log::info!("Persisted margins to {}", path.display());
}

pub fn save_output_to_config(path: &std::path::Path, output_name: &str) {
    let Some(mut doc) = read_config_doc(path) else { return };
    ensure_window_table(&mut doc);

    doc["window"]["output"] = toml_edit::value(output_name);

    write_config_doc(path, &doc);
    log::info!("Persisted output to {}", path.display());
}

pub fn load_config(path: &std::path::Path) -> Result<VoltieConfig> {
    if !path.exists() {
        log::info!("Config file not found at {}, generating default", path.display());
        let content = generate_default_config();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match std::fs::write(path, &content) {
            Ok(()) => log::info!("Created default config at {}", path.display()),
            Err(e) => log::warn!("Failed to write default config: {}", e),
        }
        return Ok(VoltieConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: VoltieConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

fn generate_default_config() -> String {
    r#"# voltie — Wayland layer-shell battery status widget
# Configuration file — generated automatically on first run.
# Uncomment and edit values to customise. Defaults are shown.

[window]
# Layer: background | bottom | top | overlay
layer  = "top"
# Anchor edges: top | bottom | left | right (space-separated)
anchor = "top right"
# Margins from anchored edges (px)
margin_top    = 20
margin_right  = 20
margin_bottom = 0
margin_left   = 0
# Window opacity 0.0-1.0
opacity = 1.0
# Output to display on (empty = compositor default)
# output = "HDMI-A-1"

[display]
# Font: system font name or path to .ttf/.otf
font = "monospace"
# Text size in px (window auto-sizes to fit)
font_size = 16.0
# Which battery fields to show
show_source         = true
show_chemistry      = true
show_percentage     = true
show_saving_mode    = true
show_full_time      = true
show_remaining_time = true
# Seconds between battery re-samples
poll_interval = 1

[theme]
# Colours in RRGGBB or RRGGBBAA hex (# prefix optional)
fg_color    = "FFFFFFFF"
bg_color    = "1a1a2eCC"
label_color = "9CA3AFFF"
# Charge-level fill colours
charge_good_color = "4ADE80FF"
charge_warn_color = "FBBF24FF"
charge_crit_color = "EF4444FF"
"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_default_config_parses_to_defaults() {
        let config: VoltieConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.window.anchor, "top right");
        assert_eq!(config.display.poll_interval, 1);
        assert_eq!(config.theme.bg_color, [0x1A, 0x1A, 0x2E, 0xCC]);
        assert!(config.display.show_chemistry);
    }

    #[test]
    fn color_parsing() {
        assert_eq!(parse_color("#FF0000").unwrap(), [0xFF, 0, 0, 0xFF]);
        assert_eq!(parse_color("00ff0080").unwrap(), [0, 0xFF, 0, 0x80]);
        assert!(parse_color("nope").is_err());
    }
}
