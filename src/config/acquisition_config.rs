use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::constants::{
    COPY_CHUNK_SIZE, DEFAULT_CAPTURE_TOOL, DEFAULT_CASE_ID, DEFAULT_EVIDENCE_DIR_NAME,
    DEFAULT_REPORT_NAME, DEFAULT_TARGET_FILE_NAME, HASH_BLOCK_SIZE, RAM_FALLBACK_SIZE,
    TARGET_PLACEHOLDER_SIZE,
};

/// Settings for one acquisition session.
///
/// Every field has a default, so a YAML file only needs the keys it overrides.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Working directory holding the target drive and the evidence locker.
    /// Falls back to the process working directory.
    pub work_dir: Option<PathBuf>,
    pub evidence_dir_name: String,
    pub target_file_name: String,
    /// Size of the zero-filled placeholder created when the target is missing
    pub target_placeholder_size: u64,
    /// RAM capture tool, relative paths resolve against `work_dir`
    pub capture_tool: PathBuf,
    /// Size of the synthetic artifact written when the capture tool is unavailable
    pub ram_fallback_size: u64,
    pub copy_chunk_size: usize,
    pub hash_block_size: usize,
    pub case_id: String,
    pub report_name: String,
    /// Launch the platform viewer after the report is written
    pub open_report: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            evidence_dir_name: DEFAULT_EVIDENCE_DIR_NAME.to_string(),
            target_file_name: DEFAULT_TARGET_FILE_NAME.to_string(),
            target_placeholder_size: TARGET_PLACEHOLDER_SIZE,
            capture_tool: PathBuf::from(DEFAULT_CAPTURE_TOOL),
            ram_fallback_size: RAM_FALLBACK_SIZE,
            copy_chunk_size: COPY_CHUNK_SIZE,
            hash_block_size: HASH_BLOCK_SIZE,
            case_id: DEFAULT_CASE_ID.to_string(),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            open_report: true,
        }
    }
}

impl AcquisitionConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: AcquisitionConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        AcquisitionConfig::default().save_to_yaml_file(path)
    }

    /// Reject settings that would make the actions loop forever or write nowhere
    pub fn validate(&self) -> Result<()> {
        if self.copy_chunk_size == 0 {
            bail!("copy_chunk_size must be greater than zero");
        }
        if self.hash_block_size == 0 {
            bail!("hash_block_size must be greater than zero");
        }
        for (field, value) in [
            ("evidence_dir_name", &self.evidence_dir_name),
            ("target_file_name", &self.target_file_name),
            ("report_name", &self.report_name),
        ] {
            if value.trim().is_empty() {
                bail!("{} must not be empty", field);
            }
        }
        Ok(())
    }

    /// Resolve the working directory, defaulting to the current directory
    pub fn resolve_work_dir(&self) -> Result<PathBuf> {
        match &self.work_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }
}

/// Load the configuration from `config_path`, or use the defaults when no path is given.
///
/// A path that is missing, unreadable or not valid YAML is an error; no file
/// is created in its place.
pub fn load_or_default(config_path: Option<&Path>) -> Result<AcquisitionConfig> {
    match config_path {
        Some(path) => AcquisitionConfig::from_yaml_file(path),
        None => {
            info!("No config path provided, using default configuration");
            Ok(AcquisitionConfig::default())
        }
    }
}
