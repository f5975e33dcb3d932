//! Owner Contact Normalization & Deduplication Library
//!
//! This library turns raw property owner/contact observations for a NYC
//! Borough-Block-Lot (BBL) parcel into display-ready owner cards: it
//! normalizes the inconsistent list-or-scalar fields delivered by municipal
//! open-data sources, clusters near-duplicate observations by name/address
//! similarity, merges each cluster into one card, and tags every card with a
//! display category derived from its agency and source.
//!
//! # Modules
//!
//! - `categorizer`: Agency/source classification against the precedence table.
//! - `config`: Similarity threshold and weight configuration.
//! - `dedup`: Similarity clustering and cluster merging.
//! - `formatter`: Raw contact normalization.
//! - `models`: Core data models.
//! - `obs`: Observability and logging setup.
//! - `pipeline`: The format → deduplicate → categorize entry point.
//! - `similarity`: Pairwise contact similarity scoring.

pub mod categorizer;
pub mod config;
pub mod dedup;
pub mod formatter;
pub mod models;
pub mod obs;
pub mod pipeline;
pub mod similarity;

pub use config::DedupConfig;
pub use models::{CategoryTag, FormattedContact, OwnerCard, RawContact};
pub use pipeline::build_owner_cards;
