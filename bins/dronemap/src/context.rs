//! Shared command setup: configuration, zone catalogue, viewer and client.

use anyhow::{Context as _, Result};
use dronemap_api_client::{ClientConfig, DronemapClient};
use dronemap_cli::{OutputFormat, Status};
use dronemap_core::config::{Config, Language};
use dronemap_geo::NoFlyZones;
use dronemap_viewer::{Notice, NoticeLevel, Viewer, ViewerConfig, ViewerError};
use std::path::Path;
use tracing::debug;

/// Everything a command needs from the global flags.
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(path: Option<&Path>, format: OutputFormat, lang: Option<&str>) -> Result<Self> {
        let mut config = Config::load(path)?;
        if let Some(lang) = lang {
            config.schema.ui.language = lang.parse::<Language>()?;
        }
        debug!(path = ?config.path, language = ?config.schema.ui.language, "Configuration loaded");
        Ok(Self { config, format })
    }

    pub fn language(&self) -> Language {
        self.config.schema.ui.language
    }

    /// The configured catalogue, or the bundled one.
    pub fn zones(&self) -> Result<NoFlyZones> {
        match &self.config.schema.zones.path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read no-fly zones from {path}"))?;
                NoFlyZones::from_geojson_str(&text)
                    .with_context(|| format!("Invalid no-fly zone catalogue {path}"))
            }
            None => Ok(NoFlyZones::builtin()?),
        }
    }

    pub fn viewer(&self) -> Result<Viewer> {
        Ok(Viewer::new(ViewerConfig::from_schema(&self.config.schema), self.zones()?))
    }

    pub fn client(&self) -> Result<DronemapClient> {
        let config = ClientConfig::from_schema(&self.config.schema).with_env_overrides()?;
        Ok(DronemapClient::with_config(config)?)
    }

    /// Prints pending info notices in text mode and turns the first error
    /// notice into the command's error.
    pub fn report_notices(&self, viewer: &mut Viewer) -> Result<Vec<String>> {
        let mut messages = Vec::new();
        for notice in viewer.take_notices() {
            let message = viewer.notice_text(&notice);
            if notice.level() == NoticeLevel::Error {
                anyhow::bail!(message);
            }
            if !self.format.is_json() {
                match notice {
                    Notice::NoSearchResults => Status::warning(&message),
                    _ => Status::success(&message),
                }
            }
            messages.push(message);
        }
        Ok(messages)
    }
}

/// Wraps a viewer error under the notice it raised, if any.
pub fn notice_error(viewer: &mut Viewer, err: ViewerError) -> anyhow::Error {
    let notices = viewer.take_notices();
    match notices.last() {
        Some(notice) => anyhow::Error::new(err).context(viewer.notice_text(notice)),
        None => err.into(),
    }
}
