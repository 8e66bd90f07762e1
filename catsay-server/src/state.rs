//! Shared application state for the HTTP server.

use std::sync::Arc;

use anyhow::{Context, Result};
use catsay::config::ServiceConfig;
use catsay::io::fortune::{FortuneCommand, FortuneSettings, TextSource};
use catsay::io::image::{CataasClient, ImageSettings, ImageSource};

/// The two external capabilities a request needs. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub text: Arc<dyn TextSource>,
    pub image: Arc<dyn ImageSource>,
}

impl AppState {
    pub fn new(text: Arc<dyn TextSource>, image: Arc<dyn ImageSource>) -> Self {
        Self { text, image }
    }

    /// Wire the real `fortune` command and upstream client from `cfg`.
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let text = FortuneCommand::new(FortuneSettings::from(&cfg.fortune));
        let image = CataasClient::new(ImageSettings::from(&cfg.image))
            .context("create image client")?;
        Ok(Self::new(Arc::new(text), Arc::new(image)))
    }
}
