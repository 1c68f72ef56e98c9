use serde::{Deserialize, Deserializer, Serialize};

use crate::playback::{DEFAULT_CHUNK_SIZE, DEFAULT_WPM};

/// Text styles the terminal can apply to the flashed chunk or the highlight.
pub const STYLE_PRESET_LIST: &[&str] = &["plain", "bold", "italic", "underlined", "reversed"];

pub const THEME_PRESET_LIST: &[&str] = &["auto", "dark", "light"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_wpm: u32,
    pub default_chunk_size: usize,
    pub wpm_step: u32,
    pub jump_back_chunks: usize,
    pub jump_forward_chunks: usize,
    #[serde(deserialize_with = "display_style")]
    pub display_style: String,
    #[serde(deserialize_with = "highlight_style")]
    pub highlight_style: String,
    pub show_source_text: bool,
    pub show_progress_indicator: bool,
    #[serde(deserialize_with = "theme")]
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_wpm: DEFAULT_WPM,
            default_chunk_size: DEFAULT_CHUNK_SIZE,
            wpm_step: 50,
            jump_back_chunks: 5,
            jump_forward_chunks: 5,
            display_style: "bold".to_string(),
            highlight_style: "reversed".to_string(),
            show_source_text: true,
            show_progress_indicator: true,
            theme: "auto".to_string(),
        }
    }
}

fn preset_or<'de, D>(d: D, presets: &[&str], fallback: &str) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(d)?;
    Ok(if presets.contains(&value.as_str()) {
        value
    } else {
        fallback.to_string()
    })
}

fn display_style<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    preset_or(d, STYLE_PRESET_LIST, "bold")
}

fn highlight_style<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    preset_or(d, STYLE_PRESET_LIST, "reversed")
}

fn theme<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    preset_or(d, THEME_PRESET_LIST, "auto")
}

/// Single-character key bindings, as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keymaps {
    pub toggle_play: String,
    pub stop: String,
    pub restart: String,
    pub jump_back: String,
    pub jump_forward: String,
    pub wpm_up: String,
    pub wpm_down: String,
    pub chunk_size_up: String,
    pub chunk_size_down: String,
    pub reset_speed: String,
    pub settings: String,
    pub about: String,
    pub help: String,
    pub quit: String,
}

impl Default for Keymaps {
    fn default() -> Self {
        Self {
            toggle_play: " ".to_string(),
            stop: "s".to_string(),
            restart: "r".to_string(),
            jump_back: "h".to_string(),
            jump_forward: "l".to_string(),
            wpm_up: "+".to_string(),
            wpm_down: "-".to_string(),
            chunk_size_up: "]".to_string(),
            chunk_size_down: "[".to_string(),
            reset_speed: "R".to_string(),
            settings: "S".to_string(),
            about: "a".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl Keymaps {
    /// Whether `binding` is exactly the character `c`.
    pub fn matches(binding: &str, c: char) -> bool {
        let mut chars = binding.chars();
        chars.next() == Some(c) && chars.next().is_none()
    }
}
