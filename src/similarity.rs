//! Pairwise similarity scoring between formatted contacts.
//!
//! The combined score is a weighted average of two components:
//! token-overlap name similarity and normalized-address set overlap. Weights
//! come from [`DedupConfig`] and are renormalized over the components for
//! which both records actually carry evidence, so a record always scores 1.0
//! against itself as long as it is non-empty, and 0.0 against anything when
//! it has neither a name nor an address.

use crate::config::DedupConfig;
use crate::models::FormattedContact;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use strsim::jaro_winkler;

/// Jaro-Winkler floor for two normalized addresses to count as the same.
const NEAR_EXACT_ADDRESS: f64 = 0.95;

/// Postal abbreviations applied token-by-token during address
/// normalization. Long form on the left, canonical short form on the right.
const ADDRESS_ABBREVIATIONS: &[(&str, &str)] = &[
    ("STREET", "ST"),
    ("AVENUE", "AVE"),
    ("BOULEVARD", "BLVD"),
    ("ROAD", "RD"),
    ("DRIVE", "DR"),
    ("PLACE", "PL"),
    ("COURT", "CT"),
    ("LANE", "LN"),
    ("TERRACE", "TER"),
    ("PARKWAY", "PKWY"),
    ("HIGHWAY", "HWY"),
    ("SQUARE", "SQ"),
    ("FLOOR", "FL"),
    ("APARTMENT", "APT"),
    ("SUITE", "STE"),
    ("EAST", "E"),
    ("WEST", "W"),
    ("NORTH", "N"),
    ("SOUTH", "S"),
];

/// Normalizes an address for comparison: uppercase, punctuation stripped,
/// whitespace collapsed, and postal long forms abbreviated
/// ("123 Main Street, Fl 2" → "123 MAIN ST FL 2").
pub fn normalize_address(raw: &str) -> String {
    let punctuation = Regex::new(r"[^A-Z0-9]+").unwrap();
    let upper = raw.to_uppercase();
    let stripped = punctuation.replace_all(&upper, " ");
    stripped
        .split_whitespace()
        .map(|token| {
            ADDRESS_ABBREVIATIONS
                .iter()
                .find(|(long, _)| *long == token)
                .map(|(_, short)| *short)
                .unwrap_or(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a name into lowercased alphanumeric word tokens.
pub fn name_tokens(raw: &str) -> HashSet<String> {
    raw.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// The name a contact is compared under: the master name chosen by the
/// upstream aggregation, or the first business name when no master exists.
fn name_key(contact: &FormattedContact) -> Option<&str> {
    contact
        .owner_master_full_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| contact.owner_business_name.first().map(String::as_str))
}

/// Jaccard similarity over name tokens. `None` when either side carries no
/// name evidence; identical token sets score 1.0, disjoint sets 0.0.
pub fn name_similarity(a: &FormattedContact, b: &FormattedContact) -> Option<f64> {
    let tokens_a = name_tokens(name_key(a)?);
    let tokens_b = name_tokens(name_key(b)?);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return None;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    Some(intersection as f64 / union as f64)
}

/// Fraction of `from` with a near-exact counterpart in `to`.
fn matched_fraction(from: &HashSet<String>, to: &HashSet<String>) -> f64 {
    let matched = from
        .iter()
        .filter(|addr| {
            to.iter().any(|other| {
                addr.as_str() == other.as_str()
                    || jaro_winkler(addr.as_str(), other.as_str()) >= NEAR_EXACT_ADDRESS
            })
        })
        .count();
    matched as f64 / from.len() as f64
}

/// Fraction of the smaller normalized-address set with a near-exact
/// counterpart in the other set. Equal-sized sets take the better of the
/// two directions, keeping the score symmetric. `None` when either side
/// has no addresses.
pub fn address_similarity(a: &FormattedContact, b: &FormattedContact) -> Option<f64> {
    if a.owner_full_address.is_empty() || b.owner_full_address.is_empty() {
        return None;
    }
    let set_a: HashSet<String> = a.owner_full_address.iter().map(|s| normalize_address(s)).collect();
    let set_b: HashSet<String> = b.owner_full_address.iter().map(|s| normalize_address(s)).collect();

    Some(match set_a.len().cmp(&set_b.len()) {
        Ordering::Less => matched_fraction(&set_a, &set_b),
        Ordering::Greater => matched_fraction(&set_b, &set_a),
        Ordering::Equal => matched_fraction(&set_a, &set_b).max(matched_fraction(&set_b, &set_a)),
    })
}

/// Combined similarity in [0, 1].
///
/// Components for which either record lacks evidence drop out and the
/// remaining weights are renormalized; with no evidence on either component
/// the score is 0 (records are never merged on empty evidence).
pub fn similarity(a: &FormattedContact, b: &FormattedContact, config: &DedupConfig) -> f64 {
    let mut score_sum = 0.0;
    let mut weight_sum = 0.0;

    if let Some(name) = name_similarity(a, b) {
        score_sum += config.name_weight * name;
        weight_sum += config.name_weight;
    }
    if let Some(address) = address_similarity(a, b) {
        score_sum += config.address_weight * address;
        weight_sum += config.address_weight;
    }

    if weight_sum <= 0.0 {
        return 0.0;
    }
    (score_sum / weight_sum).clamp(0.0, 1.0)
}
