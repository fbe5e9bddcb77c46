//! Engine configuration.
//!
//! Provides run, output and gameplay settings.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use stillwalk_gameplay::GameplayConfig;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "stillwalk.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run Settings ===
    /// RON level set to load
    pub level_file: PathBuf,
    /// RON input script (None = built-in demo)
    pub script_file: Option<PathBuf>,
    /// Frames to run before exiting
    pub frames: u32,
    /// Frames per second
    pub target_fps: u32,
    /// Pace frames against the wall clock
    pub realtime: bool,

    // === Output Settings ===
    /// Where to write the final frame snapshot as JSON (None = stdout)
    pub snapshot_file: Option<PathBuf>,

    // === Gameplay Settings ===
    /// Gameplay tuning
    pub gameplay: GameplayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            level_file: PathBuf::from("assets/levels.ron"),
            script_file: None,
            frames: 600, // 10 seconds
            target_fps: 60,
            realtime: false,

            snapshot_file: None,

            gameplay: GameplayConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let mut config = match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str::<Self>(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        return Self::default();
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                return Self::default();
            },
        };

        config.validate();
        config
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(10, 240);
        self.frames = self.frames.max(1);
        self.gameplay.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.level_file, PathBuf::from("assets/levels.ron"));
        assert_eq!(config.target_fps, 60);
        assert!(!config.realtime);
        assert_eq!(config.gameplay.start_room.as_str(), "HALLSPAWN");
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        // Set invalid values
        config.target_fps = 1;
        config.frames = 0;

        config.validate();

        // Should be clamped
        assert_eq!(config.target_fps, 10);
        assert_eq!(config.frames, 1);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("stillwalk.toml");

        let mut config = EngineConfig::default();
        config.frames = 120;
        config.realtime = true;
        config.snapshot_file = Some(PathBuf::from("out/snapshot.json"));
        config.gameplay.player.speed = 5.0;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.frames, 120);
        assert!(loaded.realtime);
        assert_eq!(loaded.snapshot_file, Some(PathBuf::from("out/snapshot.json")));
        assert!((loaded.gameplay.player.speed - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/stillwalk.toml");
        // Should return defaults
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("stillwalk.toml");
        fs::write(&config_path, "frames = \"many\"").expect("Failed to write config");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.frames, 600);
    }

    #[test]
    fn test_partial_gameplay_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("stillwalk.toml");
        fs::write(
            &config_path,
            "frames = 30\n\n[gameplay]\nstart_room = \"CELLAR\"\n\n[gameplay.player]\nmax_ammo = 3\n",
        )
        .expect("Failed to write config");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.frames, 30);
        assert_eq!(config.gameplay.start_room.as_str(), "CELLAR");
        assert_eq!(config.gameplay.player.max_ammo, 3);
        assert!((config.gameplay.player.speed - 4.0).abs() < f32::EPSILON);
    }
}
