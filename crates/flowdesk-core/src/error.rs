// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Flowdesk backend.

use thiserror::Error;

/// The primary error type used across all Flowdesk crates.
#[derive(Debug, Error)]
pub enum FlowdeskError {
    /// The inbound message or request payload is malformed or missing a field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced entity (session, order, plan, key) does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },

    /// A conversation has used up its plan's message allowance.
    #[error("message quota exceeded: {used} of {limit} messages used")]
    QuotaExceeded { used: i64, limit: i64 },

    /// An upstream dependency (completion provider, Telegram API) failed.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        service: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored data contradicts an invariant (unknown service at pricing time,
    /// unparseable persisted draft).
    #[error("data integrity error: {0}")]
    Integrity(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Channel adapter errors (bind failure, send failure, closed socket).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FlowdeskError {
    /// Shorthand for a provider outage carrying its underlying cause.
    pub fn unavailable(
        service: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Unavailable {
            service: service.into(),
            message: message.into(),
            source,
        }
    }

    /// Shorthand for a missing entity.
    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }
}
