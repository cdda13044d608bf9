//! Listing search filter construction.
//!
//! # Responsibility
//! - Turn optional caller search parameters into a store filter.
//! - Describe the fixed projection/order every listing search uses.
//! - Render the filter as parameterized SQL for the SQLite store.
//!
//! # Invariants
//! - Absent parameters are omitted from the filter, never written as null.
//! - `price` appears only when at least one bound is supplied.
//! - Results are always ordered by listing id ascending.
//! - Caller values reach SQL only as bind parameters.

use crate::model::listing::{ListingValidationError, PropertyType};
use rusqlite::types::Value;
use serde::Serialize;

/// Number of images projected per listing in search results.
pub const COVER_IMAGE_LIMIT: u32 = 1;

/// Caller-facing search parameters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingSearchParams {
    /// Exact city match.
    pub city: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    pub property_type: Option<PropertyType>,
}

impl ListingSearchParams {
    /// Parses raw query-string values.
    ///
    /// Blank values count as absent. Unparsable prices, an unknown property
    /// type or `min > max` fail with a validation error.
    pub fn from_raw(
        city: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
        property_type: Option<&str>,
    ) -> Result<Self, ListingValidationError> {
        let city = non_blank(city).map(str::to_string);
        let min_price = non_blank(min_price)
            .map(|value| parse_price("minPrice", value))
            .transpose()?;
        let max_price = non_blank(max_price)
            .map(|value| parse_price("maxPrice", value))
            .transpose()?;
        let property_type = non_blank(property_type)
            .map(str::parse::<PropertyType>)
            .transpose()?;

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(ListingValidationError::InvertedPriceRange { min, max });
            }
        }

        Ok(Self {
            city,
            min_price,
            max_price,
            property_type,
        })
    }
}

/// Closed numeric range; each bound is independently optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

/// Store filter holding only the keys the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
}

impl ListingFilter {
    /// Names of the keys present in this filter, in serialization order.
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.city.is_some() {
            keys.push("city");
        }
        if self.price.is_some() {
            keys.push("price");
        }
        if self.property_type.is_some() {
            keys.push("propertyType");
        }
        keys
    }

    /// Renders the filter as a SQL predicate over `listings` plus binds.
    ///
    /// Returns `1 = 1` for an empty filter.
    pub fn to_sql_predicate(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut bind_values = Vec::new();

        if let Some(city) = self.city.as_ref() {
            clauses.push("listings.city = ?");
            bind_values.push(Value::Text(city.clone()));
        }
        if let Some(range) = self.price {
            if let Some(gte) = range.gte {
                clauses.push("listings.price >= ?");
                bind_values.push(Value::Real(gte));
            }
            if let Some(lte) = range.lte {
                clauses.push("listings.price <= ?");
                bind_values.push(Value::Real(lte));
            }
        }
        if let Some(property_type) = self.property_type {
            clauses.push("listings.property_type = ?");
            bind_values.push(Value::Text(property_type.as_str().to_string()));
        }

        if clauses.is_empty() {
            return ("1 = 1".to_string(), bind_values);
        }
        (clauses.join(" AND "), bind_values)
    }
}

/// Result ordering for listing searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    IdAscending,
}

impl ListingOrder {
    pub fn to_sql(self) -> &'static str {
        match self {
            Self::IdAscending => "listings.id ASC",
        }
    }
}

/// Complete search request handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    /// Images projected per listing; always [`COVER_IMAGE_LIMIT`].
    pub image_limit: u32,
    pub order: ListingOrder,
}

/// Builds the store filter from search parameters.
pub fn build_listing_filter(params: &ListingSearchParams) -> ListingFilter {
    let price = match (params.min_price, params.max_price) {
        (None, None) => None,
        (gte, lte) => Some(PriceRange { gte, lte }),
    };

    ListingFilter {
        city: params.city.clone(),
        price,
        property_type: params.property_type,
    }
}

/// Builds the full search request: filter, cover-image projection, id order.
pub fn build_listing_query(params: &ListingSearchParams) -> ListingQuery {
    ListingQuery {
        filter: build_listing_filter(params),
        image_limit: COVER_IMAGE_LIMIT,
        order: ListingOrder::IdAscending,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_price(field: &'static str, value: &str) -> Result<f64, ListingValidationError> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| ListingValidationError::InvalidNumber {
            field,
            value: value.to_string(),
        })?;
    if !parsed.is_finite() {
        return Err(ListingValidationError::NonFiniteValue(field));
    }
    if parsed < 0.0 {
        return Err(ListingValidationError::NegativeValue {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}
