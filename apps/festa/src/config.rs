use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use ui_kit::DRAG_THRESHOLD;

pub const DEFAULT_CONFIG_FILE: &str = "festa.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub locale: String,
    pub drag_threshold: f64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            locale: "ko".into(),
            drag_threshold: DRAG_THRESHOLD,
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    locale: Option<String>,
    drag_threshold: Option<f64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `festa.toml` (or `path`), then the process environment.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file = match path {
        Some(path) => Some(read_file_settings(path)?),
        // The default file is optional; an explicit one is not.
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(read_file_settings(default_path)?)
            } else {
                None
            }
        }
    };

    if let Some(file_cfg) = file {
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.locale {
            settings.locale = v;
        }
        if let Some(v) = file_cfg.drag_threshold {
            settings.drag_threshold = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("FESTA_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("FESTA_LOCALE") {
        settings.locale = v;
    }
    if let Some(v) = env("APP__LOCALE") {
        settings.locale = v;
    }

    if let Some(v) = env("APP__DRAG_THRESHOLD") {
        match v.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => settings.drag_threshold = parsed,
            _ => tracing::warn!(value = %v, "ignoring invalid APP__DRAG_THRESHOLD"),
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
