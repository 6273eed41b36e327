// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, one module per table family.

pub mod bindings;
pub mod conversations;
pub mod drafts;
pub mod keys;
pub mod notifications;
pub mod orders;
pub mod plans;
pub mod sessions;
pub mod turns;
