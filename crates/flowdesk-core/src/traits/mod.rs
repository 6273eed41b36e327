// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams between Flowdesk crates.

pub mod notify;
pub mod provider;
pub mod store;

pub use notify::Notifier;
pub use provider::CompletionProvider;
pub use store::Store;
