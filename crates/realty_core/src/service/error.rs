//! Failure taxonomy shared by the listing and inquiry services.

use crate::model::listing::{ListingId, ListingValidationError};
use crate::model::person::PersonId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse failure class a transport layer maps to its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Referenced entity is absent, or a search matched nothing.
    NotFound,
    /// Entity exists but the caller is not its owning realtor.
    Unauthorized,
    /// Malformed or out-of-range input.
    Validation,
    /// Store failure.
    Storage,
}

#[derive(Debug)]
pub enum ServiceError {
    ListingNotFound(ListingId),
    /// A listing search matched zero rows.
    NoListingsMatched,
    Unauthorized {
        listing_id: ListingId,
        caller_id: PersonId,
    },
    Validation(ListingValidationError),
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ListingNotFound(_) | Self::NoListingsMatched => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ListingNotFound(_) => "listing_not_found",
            Self::NoListingsMatched => "no_listings_matched",
            Self::Unauthorized { .. } => "not_listing_owner",
            Self::Validation(_) => "invalid_input",
            Self::Repo(_) => "store_failure",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListingNotFound(id) => write!(f, "listing not found: {id}"),
            Self::NoListingsMatched => write!(f, "no listings match the search"),
            Self::Unauthorized {
                listing_id,
                caller_id,
            } => write!(
                f,
                "person {caller_id} is not the owning realtor of listing {listing_id}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "listing",
                id,
            } => Self::ListingNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ListingValidationError> for ServiceError {
    fn from(value: ListingValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::model::listing::ListingValidationError;
    use crate::repo::RepoError;

    #[test]
    fn not_found_and_unauthorized_stay_distinct() {
        let missing = ServiceError::ListingNotFound(7);
        let denied = ServiceError::Unauthorized {
            listing_id: 7,
            caller_id: 30,
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::NoListingsMatched.kind(), ErrorKind::NotFound);
        assert_eq!(denied.kind(), ErrorKind::Unauthorized);
        assert_ne!(missing.code(), denied.code());
    }

    #[test]
    fn repo_not_found_on_listing_maps_to_listing_not_found() {
        let err = ServiceError::from(RepoError::NotFound {
            entity: "listing",
            id: 3,
        });
        assert!(matches!(err, ServiceError::ListingNotFound(3)));

        let other = ServiceError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(other.kind(), ErrorKind::Storage);
    }

    #[test]
    fn validation_errors_keep_their_source() {
        let err = ServiceError::from(ListingValidationError::MissingImages);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(std::error::Error::source(&err).is_some());
    }
}
