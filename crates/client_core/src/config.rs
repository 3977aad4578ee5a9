use std::{collections::HashMap, fs, path::Path, time::Duration};

use tracing::warn;

use crate::cookie::DEFAULT_CSRF_COOKIE;

pub const SETTINGS_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub update_item_path: String,
    pub process_order_path: String,
    pub csrf_cookie_name: String,
    /// No timeout unless configured; the transport default applies.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            update_item_path: "/updateitem/".into(),
            process_order_path: "/checkout/process_order/".into(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.into(),
            request_timeout_secs: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Defaults, then `storefront.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_config(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, lookup);

    settings
}

pub(crate) fn apply_file_config(settings: &mut ClientSettings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable settings file");
            return;
        }
    };

    let string_value = |key: &str| {
        file_cfg
            .get(key)
            .and_then(toml::Value::as_str)
            .map(str::to_string)
    };

    if let Some(v) = string_value("base_url") {
        settings.base_url = v;
    }
    if let Some(v) = string_value("update_item_path") {
        settings.update_item_path = v;
    }
    if let Some(v) = string_value("process_order_path") {
        settings.process_order_path = v;
    }
    if let Some(v) = string_value("csrf_cookie_name") {
        settings.csrf_cookie_name = v;
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        match u64::try_from(v) {
            Ok(secs) => settings.request_timeout_secs = Some(secs),
            Err(_) => warn!(value = v, "ignoring negative request_timeout_secs"),
        }
    }
}

pub(crate) fn apply_env_overrides(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("STOREFRONT_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("APP__UPDATE_ITEM_PATH") {
        settings.update_item_path = v;
    }
    if let Some(v) = lookup("APP__PROCESS_ORDER_PATH") {
        settings.process_order_path = v;
    }

    if let Some(v) = lookup("CSRF_COOKIE_NAME") {
        settings.csrf_cookie_name = v;
    }
    if let Some(v) = lookup("APP__CSRF_COOKIE_NAME") {
        settings.csrf_cookie_name = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(secs) => settings.request_timeout_secs = Some(secs),
            Err(err) => warn!(value = %v, error = %err, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
