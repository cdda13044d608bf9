//! Person repository contract and SQLite implementation.
//!
//! Sign-up and credentials live outside this crate; this repository only
//! stores the contact record that listings and inquiries point at.

use crate::model::person::{NewPerson, Person, PersonId};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for people acting as realtors or buyers.
pub trait PersonRepository {
    fn create_person(&self, person: &NewPerson) -> RepoResult<Person>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["persons"])?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &NewPerson) -> RepoResult<Person> {
        self.conn.execute(
            "INSERT INTO persons (name, email, phone) VALUES (?1, ?2, ?3);",
            params![
                person.name.as_str(),
                person.email.as_str(),
                person.phone.as_str()
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_person(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created person {id} not found in read-back"))
        })
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let person = self
            .conn
            .query_row(
                "SELECT id, name, email, phone FROM persons WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Person {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        email: row.get("email")?,
                        phone: row.get("phone")?,
                    })
                },
            )
            .optional()?;
        Ok(person)
    }
}
