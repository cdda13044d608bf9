//! Domain records for listings, their images, people and inquiries.
//!
//! # Responsibility
//! - Define the plain data shapes shared by repositories and services.
//! - Own input validation helpers offered to the transport layer above.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - A listing's `realtor_id` has no update path anywhere in these types.

pub mod identity;
pub mod inquiry;
pub mod listing;
pub mod person;
