use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the config file looked up in the working and user config directories
const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Caption service settings
    pub captions: CaptionsConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionsConfig {
    /// Base URL of the YouTube frontend
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout, client default if not set
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory transcripts are written to
    pub output_dir: Option<PathBuf>,

    /// Number of transcript characters shown in the console preview
    pub preview_chars: usize,

    /// Reject video IDs that do not look like YouTube IDs before fetching
    pub strict_ids: bool,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            user_agent: concat!("youtube-transcript-extractor/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            preview_chars: 500,
            strict_ids: false,
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, or use defaults.
    ///
    /// Nothing is written to disk; use [`Config::init`] to create a file.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());

        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Write the default configuration to the user config directory
    pub fn init() -> Result<PathBuf> {
        let path = Self::user_config_path()?;
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }

        Self::default().save_to(&path)?;
        Ok(path)
    }

    /// Find an existing config file, current directory first
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::user_config_path().ok().filter(|path| path.exists())
    }

    /// Get the per-user configuration file path
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir
            .join("youtube-transcript-extractor")
            .join(CONFIG_FILE_NAME))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.captions.base_url)
            .with_context(|| format!("Invalid caption base URL: {}", self.captions.base_url))?;

        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("Caption base URL must use HTTP or HTTPS protocol");
        }

        if self.app.preview_chars == 0 {
            anyhow::bail!("Preview length must be greater than zero");
        }

        if self.captions.request_timeout_secs == Some(0) {
            anyhow::bail!("Request timeout must be greater than zero");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Caption Base URL: {}", self.captions.base_url);
        println!("  User Agent: {}", self.captions.user_agent);
        match self.captions.request_timeout_secs {
            Some(secs) => println!("  Request Timeout: {}s", secs),
            None => println!("  Request Timeout: client default"),
        }
        if let Some(dir) = &self.app.output_dir {
            println!("  Output Directory: {}", dir.display());
        }
        println!("  Preview Length: {} chars", self.app.preview_chars);
        println!("  Strict IDs: {}", self.app.strict_ids);
    }
}
