use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::catalog::{DEFAULT_BASE_URL, DEFAULT_DOCUMENTS};

const ENV_PREFIX: &str = "FMHY_SYNC";
const DEFAULT_CONFIG_FILE: &str = "fmhy_sync";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub store_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub documents: Vec<String>,
}

impl Settings {
    /// Defaults, then the config file, then `FMHY_SYNC_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Settings> {
        let documents: Vec<String> = DEFAULT_DOCUMENTS.iter().map(|d| d.to_string()).collect();

        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("store_path", "data/master.json")?
            .set_default("snapshot_dir", "data/snapshots")?
            .set_default("concurrency", 8_i64)?
            .set_default("timeout_secs", 30_i64)?
            .set_default(
                "user_agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("documents", documents)?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("documents"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if settings.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        Ok(settings)
    }
}

// ── Tests ──
