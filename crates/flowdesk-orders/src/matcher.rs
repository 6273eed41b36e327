// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant text matching for chatbot input.
//!
//! Visitors type freely; matching happens on an aggressively normalized form
//! (lowercase, alphanumerics only) so that "A.I. chat-bot!" and "ai chatbot"
//! are the same word.

use strsim::normalized_levenshtein;

/// Similarity threshold below which a fuzzy candidate is ignored.
const FUZZY_CUTOFF: f64 = 0.6;

/// Lowercase and strip everything but ASCII alphanumerics.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Whether the normalized needle occurs inside the normalized haystack.
///
/// Empty needles never match.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    !needle.is_empty() && normalize(haystack).contains(&needle)
}

/// The single closest option to `input`, if it clears the cutoff.
///
/// Both sides are normalized before scoring, so formatting and case never
/// count against a candidate. Ties keep the earlier option.
pub fn fuzzy_match<'a, I, S>(input: &str, options: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    let input = normalize(input);
    if input.is_empty() {
        return None;
    }
    let mut best: Option<(&'a str, f64)> = None;
    for option in options {
        let option = option.as_ref();
        let score = normalized_levenshtein(&input, &normalize(option));
        if score >= FUZZY_CUTOFF && best.map_or(true, |(_, b)| score > b) {
            best = Some((option, score));
        }
    }
    best.map(|(option, _)| option)
}

/// All decimal digits of the message, concatenated.
///
/// Used for choice selection: "option 2" yields "2", while "12" stays "12"
/// and is treated as free text rather than a pick.
pub fn extract_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
