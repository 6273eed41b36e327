// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Flowdesk backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Flowdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FlowdeskConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Completion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent session defaults and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Order flow settings: the service catalog and draft housekeeping.
    #[serde(default)]
    pub orders: OrdersConfig,

    /// Telegram channel settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the gateway to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the gateway to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("flowdesk").join("flowdesk.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("flowdesk.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Completion provider configuration.
///
/// The per-plan model and token cap override `default_model` and
/// `max_tokens` for agent replies; suggestion calls in the order flow use
/// these defaults directly.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider API key. `None` requires the environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model for requests without a plan override.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for all requests.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

/// Agent session defaults and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Plan assigned to new agent sessions that do not name one.
    #[serde(default = "default_plan")]
    pub default_plan: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_plan: default_plan(),
            log_level: default_log_level(),
        }
    }
}

fn default_plan() -> String {
    "free".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One orderable service in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    /// Display title, matched against visitor messages.
    pub title: String,

    /// Monthly hosting rate in integer cents.
    pub monthly_price_cents: i64,

    /// Shorthand keywords that also select this service (e.g. "rpa").
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Order flow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersConfig {
    /// The orderable service catalog, in match-priority order.
    #[serde(default = "default_services")]
    pub services: Vec<ServiceEntry>,

    /// Seconds of inactivity after which an order draft is discarded.
    #[serde(default = "default_draft_max_idle_secs")]
    pub draft_max_idle_secs: u64,

    /// Interval between draft expiry sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            services: default_services(),
            draft_max_idle_secs: default_draft_max_idle_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_services() -> Vec<ServiceEntry> {
    vec![
        ServiceEntry {
            title: "Workflow Automation".to_string(),
            monthly_price_cents: 29_900,
            aliases: vec![],
        },
        ServiceEntry {
            title: "Robotic Process Automation".to_string(),
            monthly_price_cents: 49_900,
            aliases: vec!["rpa".to_string()],
        },
        ServiceEntry {
            title: "AI Chatbot".to_string(),
            monthly_price_cents: 19_900,
            aliases: vec!["chatbot".to_string()],
        },
        ServiceEntry {
            title: "Predictive Analytics".to_string(),
            monthly_price_cents: 39_900,
            aliases: vec![],
        },
        ServiceEntry {
            title: "Workflow Design".to_string(),
            monthly_price_cents: 14_900,
            aliases: vec![],
        },
    ]
}

fn default_draft_max_idle_secs() -> u64 {
    86_400 // 24 hours
}

fn default_sweep_interval_secs() -> u64 {
    3_600 // hourly
}

/// Telegram channel configuration.
///
/// Bot tokens themselves are data, not config: each tenant binds a bot token
/// to an agent session through the API, and the adapter loads the bindings
/// at startup. This section only gates the channel.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Enable Telegram long polling for bound bots.
    #[serde(default)]
    pub enabled: bool,
}
