use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Server configuration.
///
/// Loaded once at startup and shared read-only (behind an `Arc`) with every
/// component that needs the web root or the log file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory all served files must live under
    pub web_root: PathBuf,
    pub host: String,
    pub port: u16,
    /// Append-only access log
    pub log_file: PathBuf,
    /// Upper bound on connections handled at once
    pub max_connections: usize,
    /// Size of the single read taken from each connection
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_root: PathBuf::from("."),
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_file: PathBuf::from("server.log"),
            max_connections: 64,
            read_buffer_size: 4096,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Reads the YAML file named by `HEARTH_CONFIG` when set, otherwise starts
    /// from the defaults. `WEB_ROOT`, `HOST`, `PORT`, `LOG_FILE` and
    /// `MAX_CONNECTIONS` override individual values. The result is validated.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("HEARTH_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml(&text)?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses a YAML document. Missing keys take their default values.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid config document")
    }

    /// Builds a validated configuration serving `web_root` with defaults for
    /// everything else.
    pub fn for_web_root(web_root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let mut cfg = Self {
            web_root: web_root.into(),
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(root) = std::env::var("WEB_ROOT") {
            self.web_root = PathBuf::from(root);
        }
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?;
        }
        if let Ok(log_file) = std::env::var("LOG_FILE") {
            self.log_file = PathBuf::from(log_file);
        }
        if let Ok(max) = std::env::var("MAX_CONNECTIONS") {
            self.max_connections = max
                .parse()
                .with_context(|| format!("MAX_CONNECTIONS is not a number: {}", max))?;
        }
        Ok(())
    }

    /// Checks the web root is an existing directory and canonicalises it.
    pub fn validate(&mut self) -> anyhow::Result<()> {
        let root = self
            .web_root
            .canonicalize()
            .with_context(|| format!("web root {} does not exist", self.web_root.display()))?;

        if !root.is_dir() {
            bail!("web root {} is not a directory", root.display());
        }
        if self.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.read_buffer_size == 0 {
            bail!("read_buffer_size must be at least 1");
        }

        self.web_root = root;
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
