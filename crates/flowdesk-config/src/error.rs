// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error type and console rendering.

use thiserror::Error;

/// A single configuration problem.
///
/// Loading collects every problem it finds rather than failing fast, so
/// operators fix one startup round, not one key per round.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML or environment input could not be parsed into the model.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The parsed value violates a semantic constraint.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Render collected configuration errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    eprintln!(
        "flowdesk: configuration invalid ({} error{})",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
    for err in errors {
        eprintln!("  - {err}");
    }
}

/// Convert a figment extraction failure into per-problem errors.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}
