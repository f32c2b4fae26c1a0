//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `DRIVEFLOW__SECTION__KEY`
//! 3. Config file: `--config FILE`, otherwise the platform config file and
//!    `./driveflow.toml` when present
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "DRIVEFLOW";

/// File written by `driveflow init --local`.
pub const LOCAL_CONFIG_FILE: &str = "driveflow.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub images: ImagesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Where imported vehicle pictures are kept.
    pub dir: PathBuf,
    /// Edge of the square thumbnails fit into, in pixels.
    pub thumbnail_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://driveflow.db".into(),
                max_connections: 4,
            },
            images: ImagesConfig {
                dir: PathBuf::from(driveflow_adapters::DEFAULT_IMAGES_DIR),
                thumbnail_size: driveflow_adapters::DEFAULT_THUMBNAIL_SIZE.0,
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then files, then the environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the default locations are read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_with(config_file, environment())
    }

    fn load_with(config_file: Option<&PathBuf>, env: Environment) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("Invalid built-in defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Reading config file");
                builder = builder.add_source(toml_file(path, true));
            }
            None => {
                builder = builder
                    .add_source(toml_file(&Self::config_path(), false))
                    .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE), false));
            }
        }

        builder
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `driveflow.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "driveflow", "driveflow")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Thumbnail bounds as a square box.
    pub fn thumbnail_bounds(&self) -> (u32, u32) {
        (self.images.thumbnail_size, self.images.thumbnail_size)
    }
}

fn toml_file(path: &Path, required: bool) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(required)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.database.url, "sqlite://driveflow.db");
        assert_eq!(cfg.database.max_connections, 4);
        assert_eq!(cfg.images.dir, PathBuf::from("vehicle_images"));
        assert_eq!(cfg.thumbnail_bounds(), (150, 150));
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.output.format, "human");
    }

    #[test]
    fn file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            "[database]\nurl = \"sqlite://fleet.db\"\n\n[images]\nthumbnail_size = 64\n",
        );
        let cfg = AppConfig::load_with(Some(&path), env_with(&[])).unwrap();
        assert_eq!(cfg.database.url, "sqlite://fleet.db");
        assert_eq!(cfg.database.max_connections, 4);
        assert_eq!(cfg.thumbnail_bounds(), (64, 64));
    }

    #[test]
    fn environment_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[database]\nurl = \"sqlite://fleet.db\"\n");
        let cfg = AppConfig::load_with(
            Some(&path),
            env_with(&[
                ("DRIVEFLOW__DATABASE__URL", "sqlite::memory:"),
                ("DRIVEFLOW__OUTPUT__NO_COLOR", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert!(cfg.output.no_color);
    }

    #[test]
    fn explicit_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(AppConfig::load_with(Some(&missing), env_with(&[])).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[database]\nmax_connections = \"many\"\n");
        assert!(AppConfig::load_with(Some(&path), env_with(&[])).is_err());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
