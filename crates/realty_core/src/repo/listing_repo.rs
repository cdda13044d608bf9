//! Listing repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist listings together with their child images and inquiries.
//! - Serve the search projection (one cover image) and the detail projection
//!   (all images plus realtor contact).
//! - Run multi-step writes as one unit via [`ListingRepository::in_unit`].
//!
//! # Invariants
//! - Child rows reference an existing listing; the schema has no cascade, so a
//!   listing row can only be deleted after its children.
//! - `realtor_id` is written once by `create_listing` and never updated.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::listing::{
    Listing, ListingDetail, ListingId, ListingImage, ListingSummary, NewListing, NewListingImage,
    PropertyType, UpdateListingParams,
};
use crate::model::person::RealtorContact;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use crate::search::listing_query::ListingQuery;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rusqlite::{Transaction, TransactionBehavior};

const LISTING_SELECT_SQL: &str = "SELECT
    listings.id AS id,
    listings.address AS address,
    listings.city AS city,
    listings.price AS price,
    listings.property_type AS property_type,
    listings.number_of_bedrooms AS number_of_bedrooms,
    listings.number_of_bathrooms AS number_of_bathrooms,
    listings.land_size AS land_size,
    listings.realtor_id AS realtor_id
FROM listings";

const ENTITY: &str = "listing";

/// Repository interface for listings and their child records.
pub trait ListingRepository {
    /// Runs the search: filter, cover-image projection and ordering from `query`.
    fn find_listings(&self, query: &ListingQuery) -> RepoResult<Vec<ListingSummary>>;
    /// Loads one listing with every image and its realtor's contact.
    fn get_listing(&self, id: ListingId) -> RepoResult<Option<ListingDetail>>;
    /// Resolves the listing's current owning realtor.
    fn get_listing_owner(&self, id: ListingId) -> RepoResult<Option<RealtorContact>>;
    /// Inserts a listing and returns it with its store-assigned id.
    fn create_listing(&self, listing: &NewListing) -> RepoResult<Listing>;
    /// Bulk-inserts images; returns the number of rows written.
    fn create_images(&self, images: &[NewListingImage]) -> RepoResult<usize>;
    /// Overwrites only the fields present in `changes`.
    fn update_listing(&self, id: ListingId, changes: &UpdateListingParams) -> RepoResult<Listing>;
    /// Deletes every image of a listing; returns the number of rows removed.
    fn delete_images(&self, listing_id: ListingId) -> RepoResult<usize>;
    /// Deletes every inquiry about a listing; returns the number of rows removed.
    fn delete_inquiries(&self, listing_id: ListingId) -> RepoResult<usize>;
    /// Deletes the listing row itself.
    fn delete_listing(&self, id: ListingId) -> RepoResult<()>;
    /// Runs `work` as one atomic unit: all of its writes land or none do.
    fn in_unit<T, F>(&self, work: F) -> RepoResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> RepoResult<T>;
}

/// SQLite-backed listing repository.
pub struct SqliteListingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListingRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(
            conn,
            &["persons", "listings", "listing_images", "inquiry_messages"],
        )?;
        Ok(Self { conn })
    }
}

impl ListingRepository for SqliteListingRepository<'_> {
    fn find_listings(&self, query: &ListingQuery) -> RepoResult<Vec<ListingSummary>> {
        let (predicate, filter_values) = query.filter.to_sql_predicate();
        let sql = format!(
            "SELECT
                listings.id AS id,
                listings.address AS address,
                listings.city AS city,
                listings.price AS price,
                listings.property_type AS property_type,
                listings.number_of_bedrooms AS number_of_bedrooms,
                listings.number_of_bathrooms AS number_of_bathrooms,
                (
                    SELECT listing_images.url
                    FROM listing_images
                    WHERE listing_images.listing_id = listings.id
                    ORDER BY listing_images.id ASC
                    LIMIT ?
                ) AS cover_image
             FROM listings
             WHERE {predicate}
             ORDER BY {order}",
            order = query.order.to_sql()
        );

        let mut bind_values = vec![Value::Integer(i64::from(query.image_limit))];
        bind_values.extend(filter_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next()? {
            listings.push(parse_summary_row(row)?);
        }

        Ok(listings)
    }

    fn get_listing(&self, id: ListingId) -> RepoResult<Option<ListingDetail>> {
        let Some(listing) = load_listing(self.conn, id)? else {
            return Ok(None);
        };

        let realtor = load_realtor(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "listing {id} references missing realtor {}",
                listing.realtor_id
            ))
        })?;
        let images = load_images(self.conn, id)?;

        Ok(Some(ListingDetail {
            listing,
            images,
            realtor,
        }))
    }

    fn get_listing_owner(&self, id: ListingId) -> RepoResult<Option<RealtorContact>> {
        load_realtor(self.conn, id)
    }

    fn create_listing(&self, listing: &NewListing) -> RepoResult<Listing> {
        self.conn.execute(
            "INSERT INTO listings (
                address,
                city,
                price,
                property_type,
                number_of_bedrooms,
                number_of_bathrooms,
                land_size,
                realtor_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                listing.address.as_str(),
                listing.city.as_str(),
                listing.price,
                listing.property_type.as_str(),
                listing.number_of_bedrooms,
                listing.number_of_bathrooms,
                listing.land_size,
                listing.realtor_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        load_listing(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created listing {id} not found in read-back"))
        })
    }

    fn create_images(&self, images: &[NewListingImage]) -> RepoResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO listing_images (url, listing_id) VALUES (?1, ?2);")?;
        let mut written = 0;
        for image in images {
            written += stmt.execute(params![image.url.as_str(), image.listing_id])?;
        }
        Ok(written)
    }

    fn update_listing(&self, id: ListingId, changes: &UpdateListingParams) -> RepoResult<Listing> {
        if changes.is_empty() {
            return load_listing(self.conn, id)?
                .ok_or(RepoError::NotFound { entity: ENTITY, id });
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(address) = changes.address.as_ref() {
            assignments.push("address = ?");
            bind_values.push(Value::Text(address.clone()));
        }
        if let Some(city) = changes.city.as_ref() {
            assignments.push("city = ?");
            bind_values.push(Value::Text(city.clone()));
        }
        if let Some(price) = changes.price {
            assignments.push("price = ?");
            bind_values.push(Value::Real(price));
        }
        if let Some(property_type) = changes.property_type {
            assignments.push("property_type = ?");
            bind_values.push(Value::Text(property_type.as_str().to_string()));
        }
        if let Some(bedrooms) = changes.number_of_bedrooms {
            assignments.push("number_of_bedrooms = ?");
            bind_values.push(Value::Integer(i64::from(bedrooms)));
        }
        if let Some(bathrooms) = changes.number_of_bathrooms {
            assignments.push("number_of_bathrooms = ?");
            bind_values.push(Value::Real(bathrooms));
        }
        if let Some(land_size) = changes.land_size {
            assignments.push("land_size = ?");
            bind_values.push(Value::Real(land_size));
        }
        assignments.push("updated_at = (strftime('%s', 'now') * 1000)");
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE listings SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        load_listing(self.conn, id)?.ok_or(RepoError::NotFound { entity: ENTITY, id })
    }

    fn delete_images(&self, listing_id: ListingId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM listing_images WHERE listing_id = ?1;",
            [listing_id],
        )?;
        Ok(removed)
    }

    fn delete_inquiries(&self, listing_id: ListingId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM inquiry_messages WHERE listing_id = ?1;",
            [listing_id],
        )?;
        Ok(removed)
    }

    fn delete_listing(&self, id: ListingId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM listings WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }

    fn in_unit<T, F>(&self, work: F) -> RepoResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> RepoResult<T>,
    {
        // Dropping `tx` without commit rolls back every write made by `work`.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = work(self)?;
        tx.commit()?;
        Ok(value)
    }
}

fn load_listing(conn: &Connection, id: ListingId) -> RepoResult<Option<Listing>> {
    let mut stmt = conn.prepare(&format!("{LISTING_SELECT_SQL} WHERE listings.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_listing_row(row)?));
    }
    Ok(None)
}

fn load_realtor(conn: &Connection, listing_id: ListingId) -> RepoResult<Option<RealtorContact>> {
    let realtor = conn
        .query_row(
            "SELECT persons.id, persons.name, persons.email, persons.phone
             FROM listings
             INNER JOIN persons ON persons.id = listings.realtor_id
             WHERE listings.id = ?1;",
            [listing_id],
            |row| {
                Ok(RealtorContact {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(realtor)
}

fn load_images(conn: &Connection, listing_id: ListingId) -> RepoResult<Vec<ListingImage>> {
    let mut stmt = conn.prepare(
        "SELECT id, url, listing_id
         FROM listing_images
         WHERE listing_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([listing_id])?;
    let mut images = Vec::new();
    while let Some(row) = rows.next()? {
        images.push(ListingImage {
            id: row.get("id")?,
            url: row.get("url")?,
            listing_id: row.get("listing_id")?,
        });
    }
    Ok(images)
}

fn parse_listing_row(row: &Row<'_>) -> RepoResult<Listing> {
    Ok(Listing {
        id: row.get("id")?,
        address: row.get("address")?,
        city: row.get("city")?,
        price: row.get("price")?,
        property_type: parse_property_type(row)?,
        number_of_bedrooms: row.get("number_of_bedrooms")?,
        number_of_bathrooms: row.get("number_of_bathrooms")?,
        land_size: row.get("land_size")?,
        realtor_id: row.get("realtor_id")?,
    })
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<ListingSummary> {
    let id: ListingId = row.get("id")?;
    let cover_image = row
        .get::<_, Option<String>>("cover_image")?
        .ok_or_else(|| RepoError::InvalidData(format!("listing {id} has no images")))?;

    Ok(ListingSummary {
        id,
        address: row.get("address")?,
        city: row.get("city")?,
        price: row.get("price")?,
        property_type: parse_property_type(row)?,
        number_of_bedrooms: row.get("number_of_bedrooms")?,
        number_of_bathrooms: row.get("number_of_bathrooms")?,
        cover_image,
    })
}

fn parse_property_type(row: &Row<'_>) -> RepoResult<PropertyType> {
    let value: String = row.get("property_type")?;
    value.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid property type `{value}` in listings.property_type"
        ))
    })
}
