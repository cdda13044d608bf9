//! Buyer inquiry use-case service.
//!
//! # Invariants
//! - An inquiry's realtor is the listing's owner at the moment it is sent.
//! - Sending requires only that the listing exists.
//! - `list_inquiries` trusts its caller to have checked ownership;
//!   `list_inquiries_as_owner` checks it itself.

use crate::model::identity::CallerIdentity;
use crate::model::inquiry::{InquiryMessage, InquiryRecord, NewInquiry};
use crate::model::listing::ListingId;
use crate::repo::inquiry_repo::InquiryRepository;
use crate::repo::listing_repo::ListingRepository;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ownership_guard::OwnershipGuard;
use log::{debug, info};

/// Inquiry service over listing and inquiry repositories.
pub struct InquiryService<L: ListingRepository, Q: InquiryRepository> {
    listings: L,
    inquiries: Q,
}

impl<L: ListingRepository, Q: InquiryRepository> InquiryService<L, Q> {
    pub fn new(listings: L, inquiries: Q) -> Self {
        Self {
            listings,
            inquiries,
        }
    }

    /// Records `buyer`'s message to the realtor who owns `listing_id`.
    ///
    /// # Errors
    /// - `ListingNotFound` when the listing does not exist; nothing is written.
    pub fn inquire(
        &self,
        buyer: &CallerIdentity,
        listing_id: ListingId,
        message: &str,
    ) -> ServiceResult<InquiryMessage> {
        let realtor = self
            .listings
            .get_listing_owner(listing_id)?
            .ok_or(ServiceError::ListingNotFound(listing_id))?;

        let inquiry = self.inquiries.create_inquiry(&NewInquiry {
            message: message.to_string(),
            realtor_id: realtor.id,
            buyer_id: buyer.id,
            listing_id,
        })?;

        info!(
            "event=inquiry_create module=inquiry status=ok inquiry_id={} listing_id={listing_id} buyer_id={} realtor_id={}",
            inquiry.id, buyer.id, realtor.id
        );
        Ok(inquiry)
    }

    /// Lists every inquiry about a listing with the sender's contact.
    ///
    /// Performs no ownership check and returns an empty list for unknown
    /// listings.
    pub fn list_inquiries(&self, listing_id: ListingId) -> ServiceResult<Vec<InquiryRecord>> {
        let records = self.inquiries.list_inquiries(listing_id)?;
        debug!(
            "event=inquiry_list module=inquiry status=ok listing_id={listing_id} count={}",
            records.len()
        );
        Ok(records)
    }

    /// Lists inquiries after confirming `caller` owns the listing.
    pub fn list_inquiries_as_owner(
        &self,
        listing_id: ListingId,
        caller: &CallerIdentity,
    ) -> ServiceResult<Vec<InquiryRecord>> {
        OwnershipGuard::new(&self.listings).authorize(listing_id, caller)?;
        self.list_inquiries(listing_id)
    }
}
