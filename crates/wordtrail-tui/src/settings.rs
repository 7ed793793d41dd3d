//! Command line and config file handling

use clap::{Parser, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use wordtrail_core::GameConfig;

/// Built-in grid presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// 5x5
    Compact,
    /// 6x6
    Standard,
    /// 8x8
    Large,
}

impl Preset {
    pub fn config(self) -> GameConfig {
        match self {
            Preset::Compact => GameConfig::compact(),
            Preset::Standard => GameConfig::standard(),
            Preset::Large => GameConfig::large(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wordtrail",
    about = "Trace hidden words through a grid of letters",
    version
)]
pub struct Cli {
    /// Start from a preset instead of the config file
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Grid side length (overrides the config file)
    #[arg(long)]
    pub grid_size: Option<usize>,

    /// Noise letters (overrides the config file)
    #[arg(long)]
    pub alphabet: Option<String>,

    /// Era to start in
    #[arg(long)]
    pub era: Option<String>,

    /// Seed for reproducible grids
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file (default: <config dir>/wordtrail/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save file (default: <data dir>/wordtrail/save.json)
    #[arg(long = "save-file")]
    pub save_file: Option<PathBuf>,

    /// Write logs here; RUST_LOG picks the level
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Forget every solved word before starting
    #[arg(long)]
    pub reset_progress: bool,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordtrail")
        .join("config.json")
}

pub fn default_save_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordtrail")
        .join("save.json")
}

/// Read a config file; a missing file means the standard preset
pub fn read_config(path: &Path) -> wordtrail_core::Result<GameConfig> {
    match fs::read_to_string(path) {
        Ok(json) => parse_config(&json),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(GameConfig::standard()),
        Err(e) => Err(wordtrail_core::StorageError::from(e).into()),
    }
}

pub fn parse_config(json: &str) -> wordtrail_core::Result<GameConfig> {
    let config: GameConfig =
        serde_json::from_str(json).map_err(wordtrail_core::StorageError::from)?;
    Ok(config)
}

impl Cli {
    /// Apply command line overrides and validate
    pub fn apply(&self, mut config: GameConfig) -> wordtrail_core::Result<GameConfig> {
        if let Some(size) = self.grid_size {
            config = config.with_grid_size(size);
        }
        if let Some(alphabet) = &self.alphabet {
            config = config.with_alphabet(alphabet);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load_config(&self) -> wordtrail_core::Result<GameConfig> {
        if let Some(preset) = self.preset {
            log::info!("config from the {:?} preset", preset);
            return self.apply(preset.config());
        }
        let path = self.config.clone().unwrap_or_else(default_config_path);
        let config = read_config(&path)?;
        log::info!("config from {}", path.display());
        self.apply(config)
    }

    pub fn save_path(&self) -> PathBuf {
        self.save_file.clone().unwrap_or_else(default_save_path)
    }
}
