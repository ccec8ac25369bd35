//! XML configuration support (quick_xml + serde).
//!
//! ```xml
//! <config>
//!   <storage_dir>/home/me/.local/share/explorer_core</storage_dir>
//!   <log_level>normal</log_level>
//!   <log_file>/tmp/explorer.log</log_file>
//!   <collision_policy>sibling</collision_policy>
//!   <max_sibling_attempts>10000</max_sibling_attempts>
//!   <verify_before_delete>true</verify_before_delete>
//!   <check_free_space>true</check_free_space>
//!   <preserve_timestamps>true</preserve_timestamps>
//!   <history_limit>100</history_limit>
//! </config>
//! ```
//!
//! Every element is optional. Unknown elements are rejected so typos surface
//! instead of being silently ignored.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use crate::transfer::CollisionPolicy;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_dir: Option<String>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    log_level: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    collision_policy: Option<CollisionPolicy>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    max_sibling_attempts: Option<u32>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    verify_before_delete: Option<bool>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    check_free_space: Option<bool>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    preserve_timestamps: Option<bool>,
    #[serde(default, deserialize_with = "de_trimmed_opt", skip_serializing_if = "Option::is_none")]
    history_limit: Option<usize>,
}

impl Serialize for LogLevel {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl Serialize for CollisionPolicy {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

// Trim surrounding whitespace, treat empty text as absent, parse the rest.
fn de_trimmed_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim).filter(|t| !t.is_empty()).map(PathBuf::from)
}

// Overlay the values present in the file onto the defaults.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();
    if let Some(dir) = non_empty_path(parsed.storage_dir.as_deref()) {
        cfg.storage_dir = dir;
    }
    cfg.log_file = non_empty_path(parsed.log_file.as_deref());
    if let Some(level) = parsed.log_level {
        cfg.log_level = level;
    }
    if let Some(policy) = parsed.collision_policy {
        cfg.collision_policy = policy;
    }
    if let Some(n) = parsed.max_sibling_attempts {
        cfg.max_sibling_attempts = n;
    }
    if let Some(b) = parsed.verify_before_delete {
        cfg.verify_before_delete = b;
    }
    if let Some(b) = parsed.check_free_space {
        cfg.check_free_space = b;
    }
    if let Some(b) = parsed.preserve_timestamps {
        cfg.preserve_timestamps = b;
    }
    if let Some(n) = parsed.history_limit {
        cfg.history_limit = n;
    }
    cfg
}

/// Parse config XML text.
pub fn parse_config_xml(contents: &str) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(contents).context("parse config xml")?;
    Ok(xml_to_config(parsed))
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    parse_config_xml(&contents).with_context(|| format!("config file '{}'", path.display()))
}

/// Load the config from `$EXPLORER_CONFIG` or the default location.
/// Missing file means defaults; a malformed file is an error.
pub fn load_config() -> Result<Config> {
    let Some(path) = default_config_path() else {
        debug!("no config location available, using defaults");
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path)
}

/// Render `cfg` as a complete config file.
pub fn render_config_xml(cfg: &Config) -> Result<String> {
    let xml = XmlConfig {
        storage_dir: Some(cfg.storage_dir.display().to_string()),
        log_level: Some(cfg.log_level),
        log_file: cfg.log_file.as_ref().map(|p| p.display().to_string()),
        collision_policy: Some(cfg.collision_policy),
        max_sibling_attempts: Some(cfg.max_sibling_attempts),
        verify_before_delete: Some(cfg.verify_before_delete),
        check_free_space: Some(cfg.check_free_space),
        preserve_timestamps: Some(cfg.preserve_timestamps),
        history_limit: Some(cfg.history_limit),
    };
    quick_xml::se::to_string(&xml).context("render config xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_overlays_defaults() {
        let cfg = parse_config_xml(
            "<config><collision_policy> later </collision_policy><history_limit>5</history_limit></config>",
        )
        .unwrap();
        assert_eq!(cfg.collision_policy, CollisionPolicy::ResolveLater);
        assert_eq!(cfg.history_limit, 5);
        assert!(cfg.verify_before_delete);
    }

    #[test]
    fn unknown_element_is_rejected() {
        let err = parse_config_xml("<config><colour>red</colour></config>").unwrap_err();
        assert!(format!("{err:#}").contains("parse config xml"));
    }

    #[test]
    fn rendered_config_parses_back() {
        let cfg = Config { max_sibling_attempts: 17, log_level: LogLevel::Debug, ..Config::default() };
        let text = render_config_xml(&cfg).unwrap();
        assert_eq!(parse_config_xml(&text).unwrap(), cfg);
    }
}
