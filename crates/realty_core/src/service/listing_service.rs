//! Listing lifecycle use-case service.
//!
//! # Responsibility
//! - Search listings, read one listing, create/update/delete listings.
//! - Keep images and inquiries consistent with their listing's lifecycle.
//!
//! # Invariants
//! - Update and delete pass through [`OwnershipGuard`] before any write.
//! - Create inserts the listing first and uses its assigned id for images.
//! - Delete removes images, then inquiries, then the listing.
//! - Multi-step writes run inside one repository unit.

use crate::model::identity::CallerIdentity;
use crate::model::listing::{
    CreateListingParams, Listing, ListingDetail, ListingId, ListingSummary,
    ListingValidationError, NewListing, NewListingImage, UpdateListingParams,
};
use crate::model::person::{PersonId, RealtorContact};
use crate::repo::listing_repo::ListingRepository;
use crate::search::listing_query::{build_listing_query, ListingSearchParams};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ownership_guard::OwnershipGuard;
use log::{debug, info};

/// Listing service facade over a repository implementation.
pub struct ListingService<R: ListingRepository> {
    repo: R,
}

impl<R: ListingRepository> ListingService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Searches listings; each result carries one cover image.
    ///
    /// # Errors
    /// - `NoListingsMatched` when nothing matches. An empty search is a
    ///   failure at this layer, not an empty success.
    pub fn search_listings(
        &self,
        params: &ListingSearchParams,
    ) -> ServiceResult<Vec<ListingSummary>> {
        let query = build_listing_query(params);
        let filter_keys = query.filter.present_keys().join(",");
        let listings = self.repo.find_listings(&query)?;

        if listings.is_empty() {
            debug!("event=listing_search module=listing status=empty filter_keys={filter_keys}");
            return Err(ServiceError::NoListingsMatched);
        }

        debug!(
            "event=listing_search module=listing status=ok filter_keys={filter_keys} count={}",
            listings.len()
        );
        Ok(listings)
    }

    /// Gets one listing with all images and the realtor's contact.
    pub fn get_listing(&self, id: ListingId) -> ServiceResult<ListingDetail> {
        self.repo
            .get_listing(id)?
            .ok_or(ServiceError::ListingNotFound(id))
    }

    /// Gets the owning realtor of a listing.
    pub fn get_listing_realtor(&self, id: ListingId) -> ServiceResult<RealtorContact> {
        self.repo
            .get_listing_owner(id)?
            .ok_or(ServiceError::ListingNotFound(id))
    }

    /// Creates a listing owned by `realtor_id` along with its images.
    ///
    /// # Contract
    /// - The listing row is written first; images reference its new id.
    /// - Both writes share one unit, so a failed image insert leaves no
    ///   listing behind.
    /// - At least one image is required.
    pub fn create_listing(
        &self,
        params: &CreateListingParams,
        realtor_id: PersonId,
    ) -> ServiceResult<Listing> {
        if params.images.is_empty() {
            return Err(ListingValidationError::MissingImages.into());
        }

        let new_listing = NewListing::from_params(params, realtor_id);
        let (listing, image_count) = self.repo.in_unit(|repo| {
            let listing = repo.create_listing(&new_listing)?;
            let images = params
                .images
                .iter()
                .map(|url| NewListingImage {
                    url: url.clone(),
                    listing_id: listing.id,
                })
                .collect::<Vec<_>>();
            let image_count = repo.create_images(&images)?;
            Ok((listing, image_count))
        })?;

        info!(
            "event=listing_create module=listing status=ok listing_id={} realtor_id={realtor_id} image_count={image_count}",
            listing.id
        );
        Ok(listing)
    }

    /// Applies a partial update as the listing's owning realtor.
    ///
    /// Fields absent from `changes` keep their stored values. An empty
    /// `changes` still checks existence and ownership, then writes nothing.
    pub fn update_listing(
        &self,
        id: ListingId,
        changes: &UpdateListingParams,
        caller: &CallerIdentity,
    ) -> ServiceResult<Listing> {
        OwnershipGuard::new(&self.repo).authorize(id, caller)?;
        let listing = self.repo.update_listing(id, changes)?;

        info!(
            "event=listing_update module=listing status=ok listing_id={id} caller_id={}",
            caller.id
        );
        Ok(listing)
    }

    /// Deletes a listing and its child records as its owning realtor.
    pub fn delete_listing(&self, id: ListingId, caller: &CallerIdentity) -> ServiceResult<()> {
        OwnershipGuard::new(&self.repo).authorize(id, caller)?;

        let (image_count, inquiry_count) = self.repo.in_unit(|repo| {
            let image_count = repo.delete_images(id)?;
            let inquiry_count = repo.delete_inquiries(id)?;
            repo.delete_listing(id)?;
            Ok((image_count, inquiry_count))
        })?;

        info!(
            "event=listing_delete module=listing status=ok listing_id={id} caller_id={} image_count={image_count} inquiry_count={inquiry_count}",
            caller.id
        );
        Ok(())
    }
}
