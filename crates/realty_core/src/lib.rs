//! Core domain logic for the property-listing backend.
//! This crate is the single source of truth for listing ownership, search
//! and child-record consistency invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, CoreConfig, LoggingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::identity::CallerIdentity;
pub use model::inquiry::{InquiryId, InquiryMessage, InquiryRecord, NewInquiry};
pub use model::listing::{
    CreateListingParams, ImageId, Listing, ListingDetail, ListingId, ListingImage,
    ListingSummary, ListingValidationError, NewListing, NewListingImage, PropertyType,
    UpdateListingParams,
};
pub use model::person::{BuyerContact, NewPerson, Person, PersonId, RealtorContact};
pub use repo::inquiry_repo::{InquiryRepository, SqliteInquiryRepository};
pub use repo::listing_repo::{ListingRepository, SqliteListingRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use search::listing_query::{
    build_listing_filter, build_listing_query, ListingFilter, ListingOrder, ListingQuery,
    ListingSearchParams, PriceRange, COVER_IMAGE_LIMIT,
};
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::inquiry_service::InquiryService;
pub use service::listing_service::ListingService;
pub use service::ownership_guard::{check_owner, OwnershipGuard};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
