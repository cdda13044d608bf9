//! Listing and inquiry use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations exposed upward.
//! - Enforce ownership before every listing mutation.
//!
//! # Invariants
//! - Services stay storage-agnostic; they only see repository traits.
//! - Failures surface immediately. Nothing is retried.

pub mod error;
pub mod inquiry_service;
pub mod listing_service;
pub mod ownership_guard;
