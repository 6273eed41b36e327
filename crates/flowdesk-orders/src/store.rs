// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable draft storage with per-user turn serialization.
//!
//! Drafts live in the database so they survive restarts. Concurrent turns
//! from the same user are serialized by an in-process per-user mutex; a
//! read-modify-write against the draft must hold the user's lock for the
//! whole turn.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use flowdesk_core::{FlowdeskError, Store};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::draft::OrderDraft;

/// Draft persistence plus the per-user lock table.
pub struct DraftStore {
    store: Arc<dyn Store>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// The mutex serializing turns for one user. Entries persist for the
    /// process lifetime; the set of users is small compared to turns.
    pub fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Load the user's draft. Corrupt payloads are an integrity error.
    pub async fn load(&self, user_id: &str) -> Result<Option<OrderDraft>, FlowdeskError> {
        match self.store.load_draft(user_id).await? {
            None => Ok(None),
            Some(json) => {
                let draft = serde_json::from_str(&json).map_err(|e| {
                    FlowdeskError::Integrity(format!("unparseable draft for {user_id}: {e}"))
                })?;
                Ok(Some(draft))
            }
        }
    }

    /// Persist the user's draft.
    pub async fn save(&self, user_id: &str, draft: &OrderDraft) -> Result<(), FlowdeskError> {
        let json = serde_json::to_string(draft)
            .map_err(|e| FlowdeskError::Internal(format!("draft serialization failed: {e}")))?;
        self.store.save_draft(user_id, &json).await
    }

    /// Drop the user's draft (order submitted or cancelled).
    pub async fn clear(&self, user_id: &str) -> Result<(), FlowdeskError> {
        self.store.delete_draft(user_id).await
    }

    /// Delete drafts idle longer than `max_idle`. Returns the count removed.
    pub async fn expire_idle(&self, max_idle: Duration) -> Result<u64, FlowdeskError> {
        let cutoff = chrono::Utc::now()
            - chrono::Duration::from_std(max_idle).map_err(|e| {
                FlowdeskError::Internal(format!("idle window out of range: {e}"))
            })?;
        let removed = self.store.expire_drafts(&cutoff.to_rfc3339()).await?;
        if removed > 0 {
            debug!(removed, "expired idle order drafts");
        }
        Ok(removed)
    }

    /// Best-effort variant of [`expire_idle`](Self::expire_idle) for the
    /// periodic sweep task; failures are logged, not propagated.
    pub async fn sweep(&self, max_idle: Duration) {
        if let Err(e) = self.expire_idle(max_idle).await {
            warn!(error = %e, "draft expiry sweep failed");
        }
    }
}
