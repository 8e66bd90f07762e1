//! Text source abstraction and the `fortune` executable behind it.
//!
//! The [`TextSource`] trait decouples request handling from the local binary.
//! Tests swap in scripted sources that never spawn a process.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};

use crate::config::FortuneConfig;
use crate::core::caption::caption_for;
use crate::io::process::run_command;

/// Something that produces a line of text to caption a picture with.
pub trait TextSource: Send + Sync {
    /// Produce trimmed text. Blocking; callers on an async runtime should move
    /// this onto a blocking thread.
    fn produce(&self) -> Result<String>;
}

/// Parameters for invoking `fortune`.
#[derive(Debug, Clone)]
pub struct FortuneSettings {
    /// Executable to run.
    pub binary: PathBuf,
    /// Maximum time to wait for the process.
    pub timeout: Duration,
    /// Truncate captured output beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl From<&FortuneConfig> for FortuneSettings {
    fn from(cfg: &FortuneConfig) -> Self {
        Self {
            binary: cfg.binary.clone(),
            timeout: cfg.timeout(),
            output_limit_bytes: cfg.output_limit_bytes,
        }
    }
}

/// Text source that runs `<binary> -s` and reads the short fortune from stdout.
#[derive(Debug, Clone)]
pub struct FortuneCommand {
    settings: FortuneSettings,
}

impl FortuneCommand {
    pub fn new(settings: FortuneSettings) -> Self {
        Self { settings }
    }
}

impl TextSource for FortuneCommand {
    #[instrument(skip_all, fields(binary = %self.settings.binary.display()))]
    fn produce(&self) -> Result<String> {
        let mut cmd = Command::new(&self.settings.binary);
        cmd.arg("-s");

        let output = run_command(
            cmd,
            self.settings.timeout,
            self.settings.output_limit_bytes,
        )
        .context("run fortune")?;

        if output.timed_out {
            warn!(
                timeout_secs = self.settings.timeout.as_secs(),
                "fortune timed out"
            );
            return Err(anyhow!(
                "fortune timed out after {:?}",
                self.settings.timeout
            ));
        }
        if !output.status.success() {
            let stderr = output.stderr_excerpt();
            warn!(exit_code = ?output.status.code(), %stderr, "fortune failed");
            return Err(anyhow!(
                "fortune failed with status {:?}: {}",
                output.status.code(),
                stderr
            ));
        }

        let text = output.stdout_text();
        debug!(fortune = %text, "fortune produced");
        Ok(text)
    }
}

/// Produce text from `source` and turn it into an encoded caption.
pub fn caption(source: &dyn TextSource) -> Result<String> {
    let text = source.produce()?;
    Ok(caption_for(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingText, StaticText};

    #[test]
    fn caption_wraps_and_encodes_source_text() {
        let source = StaticText::new("  Hello World\n");
        assert_eq!(caption(&source).expect("caption"), "Hello%20World");
    }

    #[test]
    fn caption_propagates_source_failure() {
        let source = FailingText::new("fortune exploded");
        let err = caption(&source).expect_err("should fail");
        assert!(err.to_string().contains("fortune exploded"));
    }

    #[test]
    fn settings_follow_config() {
        let cfg = FortuneConfig {
            binary: PathBuf::from("/usr/games/fortune"),
            timeout_secs: 3,
            output_limit_bytes: 128,
        };
        let settings = FortuneSettings::from(&cfg);
        assert_eq!(settings.binary, PathBuf::from("/usr/games/fortune"));
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.output_limit_bytes, 128);
    }

    #[test]
    fn missing_binary_is_an_error() {
        let command = FortuneCommand::new(FortuneSettings {
            binary: PathBuf::from("/nonexistent/fortune"),
            timeout: Duration::from_secs(1),
            output_limit_bytes: 1024,
        });
        let err = command.produce().expect_err("should fail");
        assert!(format!("{err:#}").contains("run fortune"));
    }
}
