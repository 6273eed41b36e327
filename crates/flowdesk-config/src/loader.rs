// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./flowdesk.toml` > `~/.config/flowdesk/flowdesk.toml`
//! > `/etc/flowdesk/flowdesk.toml` with environment variable overrides via
//! `FLOWDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FlowdeskConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/flowdesk/flowdesk.toml` (system-wide)
/// 3. `~/.config/flowdesk/flowdesk.toml` (user XDG config)
/// 4. `./flowdesk.toml` (local directory)
/// 5. `FLOWDESK_*` environment variables
pub fn load_config() -> Result<FlowdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FlowdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FlowdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FlowdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FlowdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FlowdeskConfig::default()))
        .merge(Toml::file("/etc/flowdesk/flowdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("flowdesk/flowdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("flowdesk.toml"))
        .merge(env_provider())
}

/// The config file paths consulted by [`load_config`], in merge order.
pub fn search_paths() -> Vec<String> {
    let mut paths = vec!["/etc/flowdesk/flowdesk.toml".to_string()];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("flowdesk/flowdesk.toml").display().to_string());
    }
    paths.push("./flowdesk.toml".to_string());
    paths
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `FLOWDESK_STORAGE_DATABASE_PATH`
/// must map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("FLOWDESK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: FLOWDESK_PROVIDER_API_KEY -> "provider_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("provider_", "provider.", 1)
            .replacen("agent_", "agent.", 1)
            .replacen("orders_", "orders.", 1)
            .replacen("telegram_", "telegram.", 1);
        mapped.into()
    })
}
