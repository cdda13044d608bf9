//! Inquiry repository contract and SQLite implementation.
//!
//! # Invariants
//! - Inquiry rows are insert-only; a schema trigger rejects updates.
//! - Listing reads return buyer contact details, never the buyer id.

use crate::model::inquiry::{InquiryMessage, InquiryRecord, NewInquiry};
use crate::model::listing::ListingId;
use crate::model::person::BuyerContact;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for buyer inquiries.
pub trait InquiryRepository {
    /// Inserts one inquiry and returns it with its store-assigned id.
    fn create_inquiry(&self, inquiry: &NewInquiry) -> RepoResult<InquiryMessage>;
    /// Lists every inquiry about a listing, oldest first.
    fn list_inquiries(&self, listing_id: ListingId) -> RepoResult<Vec<InquiryRecord>>;
}

/// SQLite-backed inquiry repository.
pub struct SqliteInquiryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInquiryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["persons", "listings", "inquiry_messages"])?;
        Ok(Self { conn })
    }
}

impl InquiryRepository for SqliteInquiryRepository<'_> {
    fn create_inquiry(&self, inquiry: &NewInquiry) -> RepoResult<InquiryMessage> {
        self.conn.execute(
            "INSERT INTO inquiry_messages (
                message,
                realtor_id,
                buyer_id,
                listing_id
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                inquiry.message.as_str(),
                inquiry.realtor_id,
                inquiry.buyer_id,
                inquiry.listing_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.conn
            .query_row(
                "SELECT id, message, realtor_id, buyer_id, listing_id
                 FROM inquiry_messages
                 WHERE id = ?1;",
                [id],
                |row| {
                    Ok(InquiryMessage {
                        id: row.get("id")?,
                        message: row.get("message")?,
                        realtor_id: row.get("realtor_id")?,
                        buyer_id: row.get("buyer_id")?,
                        listing_id: row.get("listing_id")?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| {
                RepoError::InvalidData(format!("created inquiry {id} not found in read-back"))
            })
    }

    fn list_inquiries(&self, listing_id: ListingId) -> RepoResult<Vec<InquiryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                inquiry_messages.message AS message,
                persons.name AS name,
                persons.email AS email,
                persons.phone AS phone
             FROM inquiry_messages
             INNER JOIN persons ON persons.id = inquiry_messages.buyer_id
             WHERE inquiry_messages.listing_id = ?1
             ORDER BY inquiry_messages.id ASC;",
        )?;
        let mut rows = stmt.query([listing_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(InquiryRecord {
                message: row.get("message")?,
                buyer: BuyerContact {
                    name: row.get("name")?,
                    email: row.get("email")?,
                    phone: row.get("phone")?,
                },
            });
        }
        Ok(records)
    }
}
