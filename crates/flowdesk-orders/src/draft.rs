// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The in-progress order draft and its derived stage.
//!
//! A draft is a bag of optional fields filled front to back; the current
//! stage is always derived from which fields are still missing, never stored.
//! Restarting the process therefore resumes every draft exactly where its
//! user left off.

use serde::{Deserialize, Serialize};

/// The visitor's answer to "do you want to attach a file?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentChoice {
    Accepted,
    Declined,
}

/// An order under construction, persisted between turns as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub service: Option<String>,
    pub industry: Option<String>,
    /// Canonical duration, e.g. `"3_months"`.
    pub host_duration: Option<String>,
    pub workflow_name: Option<String>,
    pub workflow_details: Option<String>,
    /// Pending name suggestions the visitor may pick from by number.
    pub workflow_name_choices: Vec<String>,
    /// Pending detail suggestions.
    pub workflow_details_choices: Vec<String>,
    pub attachment: Option<AttachmentChoice>,
    /// True once the attachment question is fully settled (declined, or
    /// accepted and the file received).
    pub attachment_checked: bool,
    /// Name of the received file, when one was uploaded.
    pub attachment_name: Option<String>,
}

/// What the draft still needs, front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStage {
    NeedService,
    NeedIndustry,
    NeedDuration,
    NeedWorkflowName,
    NeedWorkflowDetails,
    NeedAttachmentDecision,
    /// The visitor accepted the attachment question; the next upload settles it.
    AwaitingUpload,
    /// Everything collected; waiting for price / confirm / cancel.
    Ready,
}

impl OrderDraft {
    /// Derive the current stage from field completeness.
    pub fn stage(&self) -> DraftStage {
        if self.service.is_none() {
            DraftStage::NeedService
        } else if self.industry.is_none() {
            DraftStage::NeedIndustry
        } else if self.host_duration.is_none() {
            DraftStage::NeedDuration
        } else if self.workflow_name.is_none() {
            DraftStage::NeedWorkflowName
        } else if self.workflow_details.is_none() {
            DraftStage::NeedWorkflowDetails
        } else if !self.attachment_checked {
            match self.attachment {
                Some(AttachmentChoice::Accepted) => DraftStage::AwaitingUpload,
                _ => DraftStage::NeedAttachmentDecision,
            }
        } else {
            DraftStage::Ready
        }
    }
}
