// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier trait for user-facing event delivery.

use async_trait::async_trait;

use crate::error::FlowdeskError;

/// Best-effort notification fan-out.
///
/// Callers treat delivery as fire-and-forget: a failed notify is logged by
/// the caller and never fails the operation that produced the event.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Records and delivers a notification for `user_id`.
    async fn notify(&self, user_id: &str, message: &str) -> Result<(), FlowdeskError>;
}
