//! Catalog domain records.
//!
//! # Responsibility
//! - Define the canonical book/user/reservation shapes.
//! - Define the request shapes consumed by catalog operations.
//!
//! # Invariants
//! - Every record is identified by a stable storage-assigned integer id.
//! - Field values are free text; presence is the only validation level.

pub mod book;
pub mod reservation;
pub mod user;
