// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic order pricing.
//!
//! Price is the service's monthly rate times the number of hosted months,
//! in integer cents. Industry is recorded on the order but does not change
//! the price.

use flowdesk_core::FlowdeskError;
use tracing::debug;

use crate::catalog::{HostDuration, ServiceCatalog};

/// Total price in cents for a service hosted for `duration`.
///
/// The service title must be a catalog title; drafts only ever hold titles
/// the catalog matched, so a miss here means corrupted state.
pub fn quote(
    catalog: &ServiceCatalog,
    service: &str,
    duration: HostDuration,
    industry: &str,
) -> Result<i64, FlowdeskError> {
    let entry = catalog
        .entry(service)
        .ok_or_else(|| FlowdeskError::Integrity(format!("unknown service in draft: {service}")))?;
    let total = entry.monthly_price_cents * duration.months();
    debug!(
        service,
        industry,
        months = duration.months(),
        total_cents = total,
        "priced order"
    );
    Ok(total)
}

/// Render cents as a dollar string, e.g. `150000` becomes `"$1500.00"`.
pub fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
