// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Flowdesk configuration system.

use flowdesk_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_flowdesk_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[provider]
api_key = "sk-test-123"
default_model = "gpt-4"
max_tokens = 700
temperature = 0.5

[agent]
default_plan = "starter"
log_level = "debug"

[orders]
draft_max_idle_secs = 7200
sweep_interval_secs = 600

[[orders.services]]
title = "AI Chatbot"
monthly_price_cents = 19900
aliases = ["chatbot"]

[telegram]
enabled = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.provider.api_key.as_deref(), Some("sk-test-123"));
    assert_eq!(config.provider.max_tokens, 700);
    assert_eq!(config.agent.default_plan, "starter");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.orders.draft_max_idle_secs, 7200);
    assert_eq!(config.orders.services.len(), 1);
    assert_eq!(config.orders.services[0].title, "AI Chatbot");
    assert_eq!(config.orders.services[0].aliases, vec!["chatbot"]);
    assert!(config.telegram.enabled);
}

/// Unknown field in [provider] section produces an error.
#[test]
fn unknown_field_in_provider_produces_error() {
    let toml = r#"
[provider]
api_kye = "oops"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("api_kye"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert!(config.storage.wal_mode);
    assert!(config.provider.api_key.is_none());
    assert_eq!(config.provider.default_model, "gpt-4");
    assert_eq!(config.provider.max_tokens, 500);
    assert_eq!(config.agent.default_plan, "free");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.orders.services.len(), 5);
    assert_eq!(config.orders.services[0].title, "Workflow Automation");
    assert!(!config.telegram.enabled);
}

/// The default catalog carries the shorthand aliases.
#[test]
fn default_catalog_includes_aliases() {
    let config = load_config_from_str("").expect("defaults");
    let rpa = config
        .orders
        .services
        .iter()
        .find(|s| s.title == "Robotic Process Automation")
        .expect("catalog should include RPA");
    assert_eq!(rpa.aliases, vec!["rpa"]);
}

/// Environment variable FLOWDESK_PROVIDER_API_KEY overrides provider.api_key.
#[test]
fn env_var_overrides_provider_api_key() {
    // Build the figment directly so the env override is controlled in-test
    // instead of mutating real process environment.
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[provider]
api_key = "from-file"
"#;

    let config: flowdesk_config::FlowdeskConfig = Figment::new()
        .merge(Serialized::defaults(flowdesk_config::FlowdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("provider.api_key", "from-env"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));
}

/// Validation failures surface through load_and_validate_str.
#[test]
fn load_and_validate_str_reports_semantic_errors() {
    let toml = r#"
[provider]
temperature = 9.0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(!errors.is_empty());
    let text = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(text.contains("temperature"), "got: {text}");
}
