//! Book domain model.
//!
//! # Responsibility
//! - Define the catalog entry record and its operation request shapes.
//!
//! # Invariants
//! - `id` is storage-assigned, unique and never reused for another book.
//! - `status` is a free-text label, not a closed enumeration.

use serde::{Deserialize, Serialize};

/// Stable storage-assigned identifier for a catalog book.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = i64;

/// Catalog entry with availability status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Free-text availability label, e.g. "available" or "checked out".
    pub status: String,
}

/// Insert request for a new book; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            status: status.into(),
        }
    }
}

/// Partial update for one book.
///
/// `None` fields are left untouched by the modify operation; a patch with
/// every field `None` performs no write at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub status: Option<String>,
}

impl BookPatch {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none() && self.status.is_none()
    }
}
