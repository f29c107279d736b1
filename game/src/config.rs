use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use engine::graphics::Color;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub jungle_width: u32,
    pub cell_size: u32,
    pub compact_cell_size: u32,
    /// Window widths at or below this use `compact_cell_size`.
    pub compact_breakpoint: u32,
    pub base_fps: u32,
    pub min_speed: u32,
    pub max_speed: u32,
    pub initial_speed: u32,
    pub resize_debounce_ms: u64,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            jungle_width: 20,
            cell_size: 20,
            compact_cell_size: 15,
            compact_breakpoint: 768,
            base_fps: 4,
            min_speed: 1,
            max_speed: 5,
            initial_speed: 1,
            resize_debounce_ms: 250,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults, then the JSON file named by `SNAKE_CONFIG`, then individual env overrides.
    pub fn load() -> Self {
        let base = match std::env::var_os("SNAKE_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Self::default(),
        };
        base.with_env_overrides().sanitized()
    }

    pub fn from_file(path: &Path) -> Self {
        let parsed = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice::<Self>(&bytes).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_u32("SNAKE_JUNGLE_WIDTH") {
            self.jungle_width = v;
        }
        if let Some(v) = env_u32("SNAKE_BASE_FPS") {
            self.base_fps = v;
        }
        if let Some(v) = env_u32("SNAKE_SPEED") {
            self.initial_speed = v;
        }
        if let Some(v) = std::env::var("SNAKE_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.seed = Some(v);
        }
        self
    }

    pub fn sanitized(mut self) -> Self {
        self.jungle_width = self.jungle_width.max(2);
        self.cell_size = self.cell_size.max(4);
        self.compact_cell_size = self.compact_cell_size.clamp(4, self.cell_size);
        self.base_fps = self.base_fps.max(1);
        self.min_speed = self.min_speed.max(1);
        self.max_speed = self.max_speed.max(self.min_speed);
        self.initial_speed = self.initial_speed.clamp(self.min_speed, self.max_speed);
        self
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn cell_size_for_window(&self, window_width: u32) -> u32 {
        if window_width <= self.compact_breakpoint {
            self.compact_cell_size
        } else {
            self.cell_size
        }
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse::<u32>().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub eye: Color,
    pub tongue: Color,
    pub hud_background: Color,
    pub text: Color,
    pub accent: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [0x1a, 0x1a, 0x1a, 0xff],
            grid: [0x33, 0x33, 0x33, 0xff],
            snake_head: [0x4f, 0xc3, 0xf7, 0xff],
            snake_body: [0x81, 0xc7, 0x84, 0xff],
            food: [0xff, 0x57, 0x22, 0xff],
            eye: [0xff, 0xff, 0xff, 0xff],
            tongue: [0xff, 0x4d, 0x4d, 0xff],
            hud_background: [0x10, 0x10, 0x14, 0xff],
            text: [0xe0, 0xe0, 0xe0, 0xff],
            accent: [0x4f, 0xc3, 0xf7, 0xff],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_speed_bounds() {
        let config = GameConfig {
            min_speed: 0,
            max_speed: 0,
            initial_speed: 9,
            base_fps: 0,
            ..GameConfig::default()
        }
        .sanitized();

        assert_eq!(config.min_speed, 1);
        assert_eq!(config.max_speed, 1);
        assert_eq!(config.initial_speed, 1);
        assert_eq!(config.base_fps, 1);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: GameConfig =
            serde_json::from_str(r#"{"jungle_width": 12}"#).expect("config JSON should parse");
        assert_eq!(parsed.jungle_width, 12);
        assert_eq!(parsed.base_fps, 4);
        assert_eq!(parsed.max_speed, 5);
        assert_eq!(parsed.seed, None);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = GameConfig::from_file(Path::new("/definitely/not/here.json"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn narrow_windows_use_compact_cells() {
        let config = GameConfig::default();
        assert_eq!(config.cell_size_for_window(768), 15);
        assert_eq!(config.cell_size_for_window(1024), 20);
    }
}
