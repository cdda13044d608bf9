//! Listing search: filter construction and query description.
//!
//! # Responsibility
//! - Build composable, injection-safe listing filters from optional inputs.
//!
//! # Invariants
//! - Only supplied parameters appear in a filter.
//! - Search ordering is deterministic (listing id ascending).

pub mod listing_query;
