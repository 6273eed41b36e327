// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Flowdesk integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`ScriptedProvider`] - mock completion provider with pre-configured replies
//! - [`RecordingNotifier`] - notifier that captures deliveries for assertions

pub mod recording_notifier;
pub mod scripted_provider;

pub use recording_notifier::RecordingNotifier;
pub use scripted_provider::ScriptedProvider;
