//! Person model.
//!
//! A person is a realtor through the listings they own and a buyer through the
//! inquiries they send. There is no separate type per role.

use serde::{Deserialize, Serialize};

/// Store-assigned person identifier.
pub type PersonId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Store payload for inserting a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Owning realtor of a listing, as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtorContact {
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Buyer contact shown to a realtor. Carries no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}
