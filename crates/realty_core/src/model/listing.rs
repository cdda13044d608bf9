//! Listing domain model.
//!
//! # Responsibility
//! - Define listing, image and read-projection records.
//! - Define create/update parameter shapes and their validation rules.
//!
//! # Invariants
//! - `price` is strictly positive; bedroom/bathroom counts and land size are
//!   non-negative.
//! - `property_type` is a closed set (`RESIDENTIAL | CONDO`).
//! - A listing is created with at least one image.

use crate::model::person::{PersonId, RealtorContact};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid image url regex"));

/// Store-assigned listing identifier.
pub type ListingId = i64;

/// Store-assigned listing image identifier.
pub type ImageId = i64;

/// Closed set of property kinds a listing may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Residential,
    Condo,
}

impl PropertyType {
    /// Stable string used in storage and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "RESIDENTIAL",
            Self::Condo => "CONDO",
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ListingValidationError;

    /// Accepts the stored spelling case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RESIDENTIAL" => Ok(Self::Residential),
            "CONDO" => Ok(Self::Condo),
            _ => Err(ListingValidationError::UnknownPropertyType(
                value.to_string(),
            )),
        }
    }
}

/// Canonical listing record as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub number_of_bedrooms: u32,
    /// Fractional values such as `2.5` are allowed.
    pub number_of_bathrooms: f64,
    pub land_size: f64,
    /// Owning realtor. Fixed at creation.
    pub realtor_id: PersonId,
}

/// One photo attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingImage {
    pub id: ImageId,
    pub url: String,
    pub listing_id: ListingId,
}

/// Search projection: core fields plus one denormalized cover image.
///
/// The raw image collection is deliberately absent from this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: ListingId,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub number_of_bedrooms: u32,
    pub number_of_bathrooms: f64,
    /// URL of the listing's first image by image id.
    pub cover_image: String,
}

/// Detail projection: the listing, every image and the realtor's contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetail {
    pub listing: Listing,
    /// Ordered by image id ascending.
    pub images: Vec<ListingImage>,
    pub realtor: RealtorContact,
}

/// Caller-supplied fields for a new listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingParams {
    pub address: String,
    pub city: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub number_of_bedrooms: u32,
    pub number_of_bathrooms: f64,
    pub land_size: f64,
    /// Image URLs, stored in the given order.
    pub images: Vec<String>,
}

impl CreateListingParams {
    /// Checks field ranges and image URLs.
    ///
    /// Intended for the transport layer; the lifecycle manager itself only
    /// rejects an empty image set.
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        require_text("address", &self.address)?;
        require_text("city", &self.city)?;
        require_positive_price(self.price)?;
        require_non_negative("numberOfBathrooms", self.number_of_bathrooms)?;
        require_non_negative("landSize", self.land_size)?;
        if self.images.is_empty() {
            return Err(ListingValidationError::MissingImages);
        }
        for url in &self.images {
            require_image_url(url)?;
        }
        Ok(())
    }
}

/// Partial listing update; `None` fields keep their stored value.
///
/// There is no realtor field: ownership never changes after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateListingParams {
    pub address: Option<String>,
    pub city: Option<String>,
    pub price: Option<f64>,
    pub property_type: Option<PropertyType>,
    pub number_of_bedrooms: Option<u32>,
    pub number_of_bathrooms: Option<f64>,
    pub land_size: Option<f64>,
}

impl UpdateListingParams {
    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.city.is_none()
            && self.price.is_none()
            && self.property_type.is_none()
            && self.number_of_bedrooms.is_none()
            && self.number_of_bathrooms.is_none()
            && self.land_size.is_none()
    }

    /// Checks the present fields with the same rules as creation.
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if let Some(address) = self.address.as_deref() {
            require_text("address", address)?;
        }
        if let Some(city) = self.city.as_deref() {
            require_text("city", city)?;
        }
        if let Some(price) = self.price {
            require_positive_price(price)?;
        }
        if let Some(bathrooms) = self.number_of_bathrooms {
            require_non_negative("numberOfBathrooms", bathrooms)?;
        }
        if let Some(land_size) = self.land_size {
            require_non_negative("landSize", land_size)?;
        }
        Ok(())
    }
}

/// Store payload for inserting a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub address: String,
    pub city: String,
    pub price: f64,
    pub property_type: PropertyType,
    pub number_of_bedrooms: u32,
    pub number_of_bathrooms: f64,
    pub land_size: f64,
    pub realtor_id: PersonId,
}

impl NewListing {
    /// Binds creation params to their owning realtor.
    pub fn from_params(params: &CreateListingParams, realtor_id: PersonId) -> Self {
        Self {
            address: params.address.clone(),
            city: params.city.clone(),
            price: params.price,
            property_type: params.property_type,
            number_of_bedrooms: params.number_of_bedrooms,
            number_of_bathrooms: params.number_of_bathrooms,
            land_size: params.land_size,
            realtor_id,
        }
    }
}

/// Store payload for inserting one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListingImage {
    pub url: String,
    pub listing_id: ListingId,
}

/// Malformed or out-of-range listing input.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingValidationError {
    BlankField(&'static str),
    NonPositivePrice(f64),
    NegativeValue { field: &'static str, value: f64 },
    NonFiniteValue(&'static str),
    MissingImages,
    InvalidImageUrl(String),
    UnknownPropertyType(String),
    InvalidNumber { field: &'static str, value: String },
    InvertedPriceRange { min: f64, max: f64 },
}

impl Display for ListingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::NonPositivePrice(price) => write!(f, "price must be positive, got {price}"),
            Self::NegativeValue { field, value } => {
                write!(f, "`{field}` must not be negative, got {value}")
            }
            Self::NonFiniteValue(field) => write!(f, "`{field}` must be a finite number"),
            Self::MissingImages => write!(f, "a listing needs at least one image"),
            Self::InvalidImageUrl(url) => write!(f, "invalid image url `{url}`"),
            Self::UnknownPropertyType(value) => write!(
                f,
                "unknown property type `{value}`; expected RESIDENTIAL|CONDO"
            ),
            Self::InvalidNumber { field, value } => {
                write!(f, "`{field}` is not a number: `{value}`")
            }
            Self::InvertedPriceRange { min, max } => {
                write!(f, "minimum price {min} exceeds maximum price {max}")
            }
        }
    }
}

impl Error for ListingValidationError {}

fn require_text(field: &'static str, value: &str) -> Result<(), ListingValidationError> {
    if value.trim().is_empty() {
        return Err(ListingValidationError::BlankField(field));
    }
    Ok(())
}

fn require_positive_price(price: f64) -> Result<(), ListingValidationError> {
    if !price.is_finite() {
        return Err(ListingValidationError::NonFiniteValue("price"));
    }
    if price <= 0.0 {
        return Err(ListingValidationError::NonPositivePrice(price));
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ListingValidationError> {
    if !value.is_finite() {
        return Err(ListingValidationError::NonFiniteValue(field));
    }
    if value < 0.0 {
        return Err(ListingValidationError::NegativeValue { field, value });
    }
    Ok(())
}

fn require_image_url(url: &str) -> Result<(), ListingValidationError> {
    if !IMAGE_URL_RE.is_match(url) {
        return Err(ListingValidationError::InvalidImageUrl(url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CreateListingParams, ListingValidationError, PropertyType, UpdateListingParams};

    fn params() -> CreateListingParams {
        CreateListingParams {
            address: "1111 Yellow Str".to_string(),
            city: "Vancouver".to_string(),
            price: 3_000_000.0,
            property_type: PropertyType::Residential,
            number_of_bedrooms: 2,
            number_of_bathrooms: 2.5,
            land_size: 4444.0,
            images: vec!["https://img.example.com/src1.jpg".to_string()],
        }
    }

    #[test]
    fn property_type_parses_case_insensitively() {
        assert_eq!("condo".parse::<PropertyType>(), Ok(PropertyType::Condo));
        assert_eq!(
            " RESIDENTIAL ".parse::<PropertyType>(),
            Ok(PropertyType::Residential)
        );
        assert!(matches!(
            "villa".parse::<PropertyType>(),
            Err(ListingValidationError::UnknownPropertyType(value)) if value == "villa"
        ));
    }

    #[test]
    fn create_params_reject_out_of_range_values() {
        assert_eq!(params().validate(), Ok(()));

        let mut free = params();
        free.price = 0.0;
        assert_eq!(
            free.validate(),
            Err(ListingValidationError::NonPositivePrice(0.0))
        );

        let mut negative_land = params();
        negative_land.land_size = -1.0;
        assert!(matches!(
            negative_land.validate(),
            Err(ListingValidationError::NegativeValue { field: "landSize", .. })
        ));

        let mut no_images = params();
        no_images.images.clear();
        assert_eq!(
            no_images.validate(),
            Err(ListingValidationError::MissingImages)
        );

        let mut bad_url = params();
        bad_url.images.push("ftp://img/1.png".to_string());
        assert!(matches!(
            bad_url.validate(),
            Err(ListingValidationError::InvalidImageUrl(_))
        ));
    }

    #[test]
    fn update_params_validate_only_present_fields() {
        let empty = UpdateListingParams::default();
        assert!(empty.is_empty());
        assert_eq!(empty.validate(), Ok(()));

        let blank_city = UpdateListingParams {
            city: Some("   ".to_string()),
            ..UpdateListingParams::default()
        };
        assert!(!blank_city.is_empty());
        assert_eq!(
            blank_city.validate(),
            Err(ListingValidationError::BlankField("city"))
        );
    }

    #[test]
    fn property_type_serializes_in_screaming_case() {
        let json = serde_json::to_string(&PropertyType::Residential).unwrap();
        assert_eq!(json, "\"RESIDENTIAL\"");
    }
}
