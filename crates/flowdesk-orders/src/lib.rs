// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational order intake for Flowdesk.
//!
//! A guided chatbot walks a visitor from service selection to a submitted
//! order: service, industry, hosting duration, workflow name, workflow
//! details, an optional file attachment, then price and confirmation. The
//! draft lives in storage between turns and is destroyed on confirm or
//! cancel.
//!
//! # Components
//!
//! - [`OrderFlow`] - the per-turn state machine
//! - [`ServiceCatalog`] - the priced service list and input matching
//! - [`DraftStore`] - persisted drafts with per-user turn serialization
//! - [`Suggester`] - LLM-backed workflow name/details suggestions

pub mod catalog;
pub mod draft;
pub mod flow;
pub mod matcher;
pub mod pricing;
pub mod store;
pub mod suggest;

pub use catalog::{HostDuration, ServiceCatalog};
pub use draft::{AttachmentChoice, DraftStage, OrderDraft};
pub use flow::{GUEST_USER, OrderFlow, TurnOutcome};
pub use store::DraftStore;
pub use suggest::Suggester;
