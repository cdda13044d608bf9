//! Ownership authorization for listing mutations.
//!
//! # Invariants
//! - Existence is confirmed before ownership: a missing listing is NotFound,
//!   never Unauthorized.
//! - The guard itself never writes.

use crate::model::identity::CallerIdentity;
use crate::model::listing::ListingId;
use crate::model::person::RealtorContact;
use crate::repo::listing_repo::ListingRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::warn;

/// Decides whether `caller` may mutate a listing owned by `owner`.
pub fn check_owner(
    listing_id: ListingId,
    owner: &RealtorContact,
    caller: &CallerIdentity,
) -> ServiceResult<()> {
    if owner.id != caller.id {
        warn!(
            "event=ownership_check module=authz status=denied listing_id={listing_id} caller_id={}",
            caller.id
        );
        return Err(ServiceError::Unauthorized {
            listing_id,
            caller_id: caller.id,
        });
    }
    Ok(())
}

/// Resolves a listing's current owner and checks the caller against it.
pub struct OwnershipGuard<'repo, R: ListingRepository> {
    repo: &'repo R,
}

impl<'repo, R: ListingRepository> OwnershipGuard<'repo, R> {
    pub fn new(repo: &'repo R) -> Self {
        Self { repo }
    }

    /// Returns the owning realtor when `caller` is that realtor.
    ///
    /// # Errors
    /// - `ListingNotFound` when the listing does not exist.
    /// - `Unauthorized` when it exists but belongs to someone else.
    pub fn authorize(
        &self,
        listing_id: ListingId,
        caller: &CallerIdentity,
    ) -> ServiceResult<RealtorContact> {
        let owner = self
            .repo
            .get_listing_owner(listing_id)?
            .ok_or(ServiceError::ListingNotFound(listing_id))?;
        check_owner(listing_id, &owner, caller)?;
        Ok(owner)
    }
}
