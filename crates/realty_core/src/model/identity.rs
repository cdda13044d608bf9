//! Verified caller identity.
//!
//! Produced by the session-token layer after signature and expiry checks, then
//! passed by value into every operation that needs to know who is calling.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};

/// Claims of the authenticated person making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: PersonId,
    pub name: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl CallerIdentity {
    pub fn new(id: PersonId, name: impl Into<String>, iat: i64, exp: i64) -> Self {
        Self {
            id,
            name: name.into(),
            iat,
            exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CallerIdentity;

    #[test]
    fn deserializes_token_claims() {
        let caller: CallerIdentity =
            serde_json::from_str(r#"{"id":30,"name":"Laith","iat":1,"exp":2}"#).unwrap();
        assert_eq!(caller, CallerIdentity::new(30, "Laith", 1, 2));
    }
}
