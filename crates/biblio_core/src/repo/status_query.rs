//! Reservation status queries and their boundary parse.
//!
//! # Responsibility
//! - Parse the `LB`/`LU`/`LR` query string form into a typed lookup mode.
//! - Define the per-mode read models returned by status lookups.
//!
//! # Invariants
//! - Parsing happens exactly once, at the input boundary.
//! - Unknown prefixes and non-numeric ids never reach SQL.

use crate::model::book::BookId;
use crate::model::reservation::ReservationId;
use crate::model::user::UserId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static STATUS_QUERY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(LB|LU|LR)([0-9]+)$").expect("valid status query regex"));

/// Lookup mode for the reservation status operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusQuery {
    /// Status of one book, by book id.
    ByBook(BookId),
    /// Title and status of a book reserved by the given user.
    ByUser(UserId),
    /// Full reservation link, by reservation id.
    ByReservation(ReservationId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusQueryError {
    /// Input does not match the `LB<id>`/`LU<id>`/`LR<id>` form.
    Unrecognized(String),
    /// The numeric part does not fit a storage id.
    IdOutOfRange(String),
}

impl Display for StatusQueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(input) => write!(
                f,
                "unrecognized status query `{input}`; expected LB<id>, LU<id> or LR<id>"
            ),
            Self::IdOutOfRange(input) => {
                write!(f, "status query id out of range in `{input}`")
            }
        }
    }
}

impl Error for StatusQueryError {}

impl StatusQuery {
    /// Parses the two-letter prefixed query form, e.g. `LB12`.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, StatusQueryError> {
        let trimmed = input.trim();
        let captures = STATUS_QUERY_RE
            .captures(trimmed)
            .ok_or_else(|| StatusQueryError::Unrecognized(trimmed.to_string()))?;

        let id: i64 = captures[2]
            .parse()
            .map_err(|_| StatusQueryError::IdOutOfRange(trimmed.to_string()))?;

        match &captures[1] {
            "LB" => Ok(Self::ByBook(id)),
            "LU" => Ok(Self::ByUser(id)),
            "LR" => Ok(Self::ByReservation(id)),
            _ => Err(StatusQueryError::Unrecognized(trimmed.to_string())),
        }
    }
}

/// Read model returned by status lookups, one shape per lookup mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// `ByBook`: the book's own status label, unaffected by reservations.
    Book { status: String },
    /// `ByUser`: one of the books reserved by the queried user.
    UserLoan { title: String, status: String },
    /// `ByReservation`: the full link including the reserving user.
    Reservation {
        title: String,
        status: String,
        user_name: String,
        user_email: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{StatusQuery, StatusQueryError};

    #[test]
    fn parse_accepts_all_three_modes() {
        assert_eq!(StatusQuery::parse("LB1"), Ok(StatusQuery::ByBook(1)));
        assert_eq!(StatusQuery::parse("LU23"), Ok(StatusQuery::ByUser(23)));
        assert_eq!(
            StatusQuery::parse("LR456"),
            Ok(StatusQuery::ByReservation(456))
        );
    }

    #[test]
    fn parse_ignores_surrounding_whitespace() {
        assert_eq!(StatusQuery::parse("  LB7 "), Ok(StatusQuery::ByBook(7)));
    }

    #[test]
    fn parse_rejects_unknown_prefix_and_missing_id() {
        for input in ["XX1", "LB", "LBabc", "1LB", "lb1", ""] {
            assert!(matches!(
                StatusQuery::parse(input),
                Err(StatusQueryError::Unrecognized(_))
            ));
        }
    }

    #[test]
    fn parse_rejects_id_wider_than_storage_ids() {
        assert!(matches!(
            StatusQuery::parse("LB99999999999999999999"),
            Err(StatusQueryError::IdOutOfRange(_))
        ));
    }
}
