//! Test doubles for the text and image seams, plus stub executables.

#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;

use crate::io::fortune::TextSource;
use crate::io::image::{CatImage, ImageError, ImageSource};

/// Text source returning the same text every time.
#[derive(Debug)]
pub struct StaticText {
    text: String,
    calls: AtomicUsize,
}

impl StaticText {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextSource for StaticText {
    fn produce(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.trim().to_string())
    }
}

/// Text source that always fails with `message`.
#[derive(Debug)]
pub struct FailingText {
    message: String,
}

impl FailingText {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl TextSource for FailingText {
    fn produce(&self) -> Result<String> {
        Err(anyhow!("{}", self.message))
    }
}

/// Image source that records captions and answers with a fixed image.
#[derive(Debug)]
pub struct RecordingImage {
    image: CatImage,
    captions: Mutex<Vec<String>>,
}

impl RecordingImage {
    pub fn new(status: u16, content_type: Option<&str>, bytes: &'static [u8]) -> Self {
        Self {
            image: CatImage {
                status,
                content_type: content_type.map(str::to_string),
                bytes: Bytes::from_static(bytes),
            },
            captions: Mutex::new(Vec::new()),
        }
    }

    pub fn captions(&self) -> Vec<String> {
        self.captions.lock().expect("captions lock").clone()
    }
}

#[async_trait]
impl ImageSource for RecordingImage {
    async fn fetch(&self, caption: &str) -> Result<CatImage, ImageError> {
        self.captions
            .lock()
            .expect("captions lock")
            .push(caption.to_string());
        Ok(self.image.clone())
    }
}

/// Write an executable shell script named `name` into `dir` and return its path.
///
/// The script is written under a temporary name and renamed into place, so
/// the final path is never open for writing.
#[cfg(unix)]
pub fn write_stub_executable(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let tmp_path = dir.join(format!(".{name}.tmp"));
    fs::write(&tmp_path, format!("#!/bin/sh\n{body}\n"))
        .with_context(|| format!("write {}", tmp_path.display()))?;
    fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(path)
}

/// Stub `fortune` that requires the `-s` flag and prints `text`.
#[cfg(unix)]
pub fn write_stub_fortune(dir: &Path, text: &str) -> Result<PathBuf> {
    let body = format!(
        "[ \"$1\" = \"-s\" ] || {{ echo \"expected -s, got $1\" >&2; exit 64; }}\nprintf '%s\\n' '{}'",
        text.replace('\'', "'\\''")
    );
    write_stub_executable(dir, "fortune", &body)
}

/// Stub `fortune` that writes `stderr` and exits with `code`.
#[cfg(unix)]
pub fn write_failing_fortune(dir: &Path, code: i32, stderr: &str) -> Result<PathBuf> {
    let body = format!(
        "printf '%s\\n' '{}' >&2\nexit {code}",
        stderr.replace('\'', "'\\''")
    );
    write_stub_executable(dir, "fortune", &body)
}

/// Fresh temporary directory for stub executables.
pub fn stub_dir() -> Result<tempfile::TempDir> {
    tempfile::tempdir().context("create stub dir")
}
