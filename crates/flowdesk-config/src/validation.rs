// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty catalog entries, positive prices, and sane intervals.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::model::FlowdeskConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FlowdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let addr = config.server.host.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.provider.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "provider.base_url must not be empty".to_string(),
        });
    }

    if config.provider.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "provider.max_tokens must be positive".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.provider.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "provider.temperature must be between 0.0 and 2.0, got {}",
                config.provider.temperature
            ),
        });
    }

    if config.orders.services.is_empty() {
        errors.push(ConfigError::Validation {
            message: "orders.services must list at least one service".to_string(),
        });
    }

    let mut seen_titles = HashSet::new();
    for (i, service) in config.orders.services.iter().enumerate() {
        if service.title.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("orders.services[{i}].title must not be empty"),
            });
        }
        if !seen_titles.insert(service.title.to_lowercase()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate service title `{}` in orders.services",
                    service.title
                ),
            });
        }
        if service.monthly_price_cents <= 0 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "orders.services[{i}].monthly_price_cents must be positive, got {}",
                    service.monthly_price_cents
                ),
            });
        }
    }

    if config.orders.draft_max_idle_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "orders.draft_max_idle_secs must be positive".to_string(),
        });
    }

    if config.orders.sweep_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "orders.sweep_interval_secs must be positive".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
