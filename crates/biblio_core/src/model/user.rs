//! Patron record referenced by reservations.
//!
//! Users are created and managed outside this system; the catalog only
//! ever reads them through reservation joins.

use serde::{Deserialize, Serialize};

/// Stable storage-assigned identifier for a patron.
pub type UserId = i64;

/// Patron record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}
