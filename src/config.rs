use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub mod defaults {
    use std::path::PathBuf;

    pub fn best_score_file() -> PathBuf {
        PathBuf::from(".game-2048-best.json")
    }

    pub fn log() -> String {
        "warn".to_string()
    }
}

/// Settings for the terminal game. Every field may be omitted from the TOML file.
///
/// ```toml
/// best_score_file = "/home/me/.local/share/2048/best.json"
/// seed = 7
/// log = "game_2048=debug"
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the best score is persisted.
    #[serde(default = "defaults::best_score_file")]
    pub best_score_file: PathBuf,
    /// Keep the best score in memory only.
    #[serde(default)]
    pub no_persist: bool,
    /// Fixed RNG seed; random from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// tracing filter, e.g. "info", "game_2048=debug".
    #[serde(default = "defaults::log")]
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            best_score_file: defaults::best_score_file(),
            no_persist: false,
            seed: None,
            log: defaults::log(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}
