// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service catalog and hosting durations.
//!
//! The catalog is built from configuration at startup and is immutable at
//! runtime. Matching order: title containment, alias containment, then a
//! fuzzy pass over titles. Catalog order decides containment ties.

use flowdesk_config::model::ServiceEntry;

use crate::matcher::{contains_normalized, fuzzy_match};

/// One offered service.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub title: String,
    pub monthly_price_cents: i64,
    pub aliases: Vec<String>,
}

/// The configured set of services, in configuration order.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    entries: Vec<CatalogEntry>,
}

impl ServiceCatalog {
    pub fn from_config(services: &[ServiceEntry]) -> Self {
        let entries = services
            .iter()
            .map(|s| CatalogEntry {
                title: s.title.clone(),
                monthly_price_cents: s.monthly_price_cents,
                aliases: s.aliases.clone(),
            })
            .collect();
        Self { entries }
    }

    /// Titles in catalog order, for prompts.
    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.title.as_str()).collect()
    }

    /// Exact title lookup.
    pub fn entry(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    /// Resolve a free-text message to a service.
    ///
    /// Containment of the full title wins first, then containment of an
    /// alias ("rpa", "chatbot"), then the closest fuzzy title. Returns
    /// `None` when nothing clears the bar; the caller re-prompts.
    pub fn match_service(&self, message: &str) -> Option<&CatalogEntry> {
        for entry in &self.entries {
            if contains_normalized(message, &entry.title) {
                return Some(entry);
            }
        }
        for entry in &self.entries {
            if entry
                .aliases
                .iter()
                .any(|alias| contains_normalized(message, alias))
            {
                return Some(entry);
            }
        }
        let titles = self.titles();
        let matched = fuzzy_match(message, titles.iter().map(|t| *t))?;
        self.entry(matched)
    }
}

/// The four hosting durations offered at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl HostDuration {
    pub const ALL: [HostDuration; 4] = [
        HostDuration::OneMonth,
        HostDuration::ThreeMonths,
        HostDuration::SixMonths,
        HostDuration::TwelveMonths,
    ];

    /// Human label as offered in the prompt, e.g. `"3 months"`.
    pub fn label(self) -> &'static str {
        match self {
            HostDuration::OneMonth => "1 month",
            HostDuration::ThreeMonths => "3 months",
            HostDuration::SixMonths => "6 months",
            HostDuration::TwelveMonths => "12 months",
        }
    }

    /// Canonical stored form, e.g. `"3_months"`.
    pub fn canonical(self) -> &'static str {
        match self {
            HostDuration::OneMonth => "1_month",
            HostDuration::ThreeMonths => "3_months",
            HostDuration::SixMonths => "6_months",
            HostDuration::TwelveMonths => "12_months",
        }
    }

    pub fn months(self) -> i64 {
        match self {
            HostDuration::OneMonth => 1,
            HostDuration::ThreeMonths => 3,
            HostDuration::SixMonths => 6,
            HostDuration::TwelveMonths => 12,
        }
    }

    /// Parse the canonical stored form back.
    pub fn from_canonical(s: &str) -> Option<HostDuration> {
        Self::ALL.into_iter().find(|d| d.canonical() == s)
    }

    /// Fuzzy-match a free-text message against the duration labels.
    pub fn match_duration(message: &str) -> Option<HostDuration> {
        let labels: Vec<&str> = Self::ALL.iter().map(|d| d.label()).collect();
        let matched = fuzzy_match(message, labels.iter().map(|l| *l))?;
        Self::ALL.into_iter().find(|d| d.label() == matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::from_config(&flowdesk_config::model::OrdersConfig::default().services)
    }

    #[test]
    fn title_containment_wins() {
        let catalog = catalog();
        let entry = catalog.match_service("I want an AI Chatbot for my shop").unwrap();
        assert_eq!(entry.title, "AI Chatbot");
    }

    #[test]
    fn alias_resolves_to_full_title() {
        let catalog = catalog();
        let entry = catalog.match_service("do you offer rpa?").unwrap();
        assert_eq!(entry.title, "Robotic Process Automation");
    }

    #[test]
    fn fuzzy_catches_typos_in_titles() {
        let catalog = catalog();
        let entry = catalog.match_service("workflow automaton").unwrap();
        assert_eq!(entry.title, "Workflow Automation");
    }

    #[test]
    fn unrelated_text_matches_nothing() {
        let catalog = catalog();
        assert!(catalog.match_service("good morning").is_none());
        assert!(catalog.match_service("").is_none());
    }

    #[test]
    fn durations_round_trip_and_match() {
        for d in HostDuration::ALL {
            assert_eq!(HostDuration::from_canonical(d.canonical()), Some(d));
            assert_eq!(HostDuration::match_duration(d.label()), Some(d));
        }
        assert_eq!(
            HostDuration::match_duration("6 monhts"),
            Some(HostDuration::SixMonths)
        );
        assert_eq!(HostDuration::match_duration("forever"), None);
    }
}
