//! Service configuration.
//!
//! Built once at startup from defaults, an optional TOML file and the
//! `FORTUNE_BIN` environment variable, then handed by value to whoever needs it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`FortuneConfig::binary`].
pub const FORTUNE_BIN_ENV: &str = "FORTUNE_BIN";

/// Top-level service configuration (TOML).
///
/// Missing fields fall back to the values the demo deployment uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address to bind the HTTP listener to.
    pub bind: String,

    /// Port to listen on.
    pub port: u16,

    /// Runtime worker threads.
    pub workers: usize,

    pub fortune: FortuneConfig,

    pub image: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FortuneConfig {
    /// Path to the `fortune` executable.
    pub binary: PathBuf,

    /// Kill the child if it has not exited after this many seconds.
    pub timeout_secs: u64,

    /// Keep at most this many bytes of stdout/stderr.
    pub output_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageConfig {
    /// Base URL; the caption is appended as the final path segment.
    pub base_url: String,

    /// Value of the `fontSize` query parameter.
    pub font_size: u32,

    /// Whole-request timeout for the upstream call.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            workers: 1,
            fortune: FortuneConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl Default for FortuneConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/app/bin/fortune"),
            timeout_secs: 10,
            output_limit_bytes: 64 * 1024,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cataas.com/cat/cute/says".to_string(),
            font_size: 22,
            timeout_secs: 30,
        }
    }
}

impl FortuneConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ImageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            return Err(anyhow!("bind must not be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("port must be > 0"));
        }
        if self.workers == 0 {
            return Err(anyhow!("workers must be > 0"));
        }
        if self.fortune.binary.as_os_str().is_empty() {
            return Err(anyhow!("fortune.binary must not be empty"));
        }
        if self.fortune.timeout_secs == 0 {
            return Err(anyhow!("fortune.timeout_secs must be > 0"));
        }
        if self.fortune.output_limit_bytes == 0 {
            return Err(anyhow!("fortune.output_limit_bytes must be > 0"));
        }
        if self.image.base_url.trim().is_empty() {
            return Err(anyhow!("image.base_url must not be empty"));
        }
        if self.image.timeout_secs == 0 {
            return Err(anyhow!("image.timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Apply environment overrides using `lookup` (normally `std::env::var`).
    ///
    /// Blank values are ignored.
    pub fn resolve_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(binary) = lookup(FORTUNE_BIN_ENV).filter(|v| !v.trim().is_empty()) {
            self.fortune.binary = PathBuf::from(binary);
        }
        self
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ServiceConfig::default()`. The result is
/// not validated yet; overrides are applied first.
pub fn load_config(path: &Path) -> Result<ServiceConfig> {
    if !path.exists() {
        return Ok(ServiceConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ServiceConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = ServiceConfig::default();
        cfg.validate().expect("valid");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.fortune.binary, PathBuf::from("/app/bin/fortune"));
        assert_eq!(cfg.image.font_size, 22);
    }

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ServiceConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("catsay.toml");
        fs::write(
            &path,
            "port = 8001\n\n[fortune]\nbinary = \"/usr/games/fortune\"\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.port, 8001);
        assert_eq!(cfg.fortune.binary, PathBuf::from("/usr/games/fortune"));
        assert_eq!(cfg.fortune.timeout_secs, 10);
        assert_eq!(cfg.image, ImageConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("catsay.toml");
        fs::write(&path, "port = \"eighty\"\n").expect("write");

        let err = load_config(&path).expect_err("should fail");
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn env_overrides_fortune_binary() {
        let cfg = ServiceConfig::default().resolve_env(|key| {
            (key == FORTUNE_BIN_ENV).then(|| "/opt/fortune/bin/fortune".to_string())
        });
        assert_eq!(cfg.fortune.binary, PathBuf::from("/opt/fortune/bin/fortune"));
    }

    #[test]
    fn blank_env_keeps_configured_binary() {
        let cfg = ServiceConfig::default().resolve_env(|_| Some("  ".to_string()));
        assert_eq!(cfg.fortune.binary, FortuneConfig::default().binary);

        let cfg = ServiceConfig::default().resolve_env(no_env);
        assert_eq!(cfg.fortune.binary, FortuneConfig::default().binary);
    }

    #[test]
    fn validate_rejects_zero_values() {
        let mut cfg = ServiceConfig::default();
        cfg.port = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ServiceConfig::default();
        cfg.workers = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ServiceConfig::default();
        cfg.fortune.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ServiceConfig::default();
        cfg.image.base_url = String::new();
        assert!(cfg.validate().is_err());
    }
}
