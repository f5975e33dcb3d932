//! End-to-end owner card construction.
//!
//! This module provides the single entry point consumed by the rendering
//! collaborator. The pipeline runs in three steps:
//! 1. Format raw observations into the uniform shape
//! 2. Deduplicate by similarity clustering
//! 3. Categorize each merged card from its agency/source metadata

use crate::categorizer::categorize;
use crate::config::DedupConfig;
use crate::dedup::deduplicate;
use crate::formatter::format_contacts;
use crate::models::{OwnerCard, RawContact};

/// Runs the full pipeline over one parcel's raw contact observations.
///
/// Empty input produces an empty output; nothing in this path errors. The
/// whole computation is synchronous and in-memory, so it is safe to call
/// concurrently from independent requests.
pub fn build_owner_cards(raw: Vec<RawContact>, config: &DedupConfig) -> Vec<OwnerCard> {
    if raw.is_empty() {
        return Vec::new();
    }

    let input_count = raw.len();
    tracing::info!("Building owner cards for {} raw contact(s)", input_count);

    let formatted = format_contacts(raw);
    let merged = deduplicate(formatted, config);
    tracing::info!(
        "Merged {} contact(s) into {} card(s) at threshold {}",
        input_count,
        merged.len(),
        config.threshold
    );

    merged
        .into_iter()
        .map(|contact| {
            let category = categorize(contact.agency.as_deref(), contact.source.as_deref());
            OwnerCard { contact, category }
        })
        .collect()
}
