//! Inquiry message model.
//!
//! # Invariants
//! - `realtor_id`, `buyer_id` and `listing_id` are set once at creation.
//! - `realtor_id` equals the listing's owning realtor at creation time.

use crate::model::listing::ListingId;
use crate::model::person::{BuyerContact, PersonId};
use serde::{Deserialize, Serialize};

/// Store-assigned inquiry identifier.
pub type InquiryId = i64;

/// Persisted buyer-to-realtor message about one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryMessage {
    pub id: InquiryId,
    pub message: String,
    pub realtor_id: PersonId,
    pub buyer_id: PersonId,
    pub listing_id: ListingId,
}

/// Store payload for inserting an inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub message: String,
    pub realtor_id: PersonId,
    pub buyer_id: PersonId,
    pub listing_id: ListingId,
}

/// Realtor-facing read model: message text plus who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryRecord {
    pub message: String,
    pub buyer: BuyerContact,
}
