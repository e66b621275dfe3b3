use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "NUTRIFY_DATA_DIR";

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory: `--data-dir`, then `NUTRIFY_DATA_DIR`, then
    /// the platform data directory.
    pub fn load(data_dir_flag: Option<PathBuf>) -> Result<Self> {
        let from_env = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let data_dir = match data_dir_flag.or(from_env) {
            Some(dir) => dir,
            None => ProjectDirs::from("", "", "nutrify")
                .context("Could not determine home directory")?
                .data_dir()
                .to_path_buf(),
        };

        Self::in_dir(data_dir)
    }

    pub fn in_dir(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("nutrify.db");
        log::debug!("Using database at {}", db_path.display());

        Ok(Config { db_path, data_dir })
    }
}
