//! Reservation link between one book and one user.
//!
//! No catalog operation creates reservations; they are written by an
//! external system and only read here through joins. Deleting a book
//! removes its reservation rows with it.

use crate::model::book::BookId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Stable storage-assigned identifier for a reservation.
pub type ReservationId = i64;

/// Reservation row shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub book_id: BookId,
    pub user_id: UserId,
    /// Free-text reservation date.
    pub reserved_on: String,
    /// Mirrors the book status after a status-changing modify; external
    /// writers may leave it unset.
    pub status: Option<String>,
}
