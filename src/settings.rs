use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::budget::Assumptions;
use crate::error::{Result, WageError};
use crate::loader::{SourceSpec, YearlyAggregate};
use crate::models::SourceKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub sources: Sources,
    #[serde(default)]
    pub aggregate: YearlyAggregate,
    #[serde(default)]
    pub assumptions: Assumptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            sources: Sources::default(),
            aggregate: YearlyAggregate::default(),
            assumptions: Assumptions::default(),
        }
    }
}

/// File layout of the four input series. Any source left out of the settings
/// file keeps its FRED default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub income: SourceSpec,
    pub house: SourceSpec,
    pub chicken: SourceSpec,
    pub gas: SourceSpec,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            income: SourceSpec::fred(SourceKind::Income),
            house: SourceSpec::fred(SourceKind::House),
            chicken: SourceSpec::fred(SourceKind::Chicken),
            gas: SourceSpec::fred(SourceKind::Gas),
        }
    }
}

impl Sources {
    pub fn get(&self, kind: SourceKind) -> &SourceSpec {
        match kind {
            SourceKind::Income => &self.income,
            SourceKind::House => &self.house,
            SourceKind::Chicken => &self.chicken,
            SourceKind::Gas => &self.gas,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("wage-explore")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("wage-explore")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| WageError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_path() -> PathBuf {
    settings_path()
}

/// Data directory to read from: the `--data-dir` override if given, otherwise
/// the configured one.
pub fn resolve_data_dir(settings: &Settings, data_dir: Option<&str>) -> PathBuf {
    match data_dir {
        Some(dir) => PathBuf::from(shellexpand_path(dir)),
        None => PathBuf::from(shellexpand_path(&settings.data_dir)),
    }
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
