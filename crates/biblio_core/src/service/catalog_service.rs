//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide stable operation entry points for shell callers.
//! - Delegate persistence to the repository contract.
//!
//! # Invariants
//! - The empty-patch case never reaches storage.
//! - Service APIs stay storage-agnostic.

use crate::model::book::{BookId, BookPatch, NewBook};
use crate::repo::catalog_repo::{BookDetails, CatalogRepository, RepoResult};
use crate::repo::status_query::{StatusQuery, StatusReport};

/// Outcome of a modify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOutcome {
    /// The patch carried no fields; storage was not touched.
    NoFields,
    /// The supplied fields were written.
    Applied,
}

/// Use-case wrapper for catalog operations.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a book and returns its storage-assigned id.
    pub fn add_book(&self, book: &NewBook) -> RepoResult<BookId> {
        self.repo.add_book(book)
    }

    /// Gets one book with its reservation projection, if any.
    pub fn find_book_details(&self, id: BookId) -> RepoResult<Option<BookDetails>> {
        self.repo.get_book_details(id)
    }

    /// Runs one parsed status lookup.
    pub fn find_reservation_status(
        &self,
        query: &StatusQuery,
    ) -> RepoResult<Option<StatusReport>> {
        self.repo.lookup_status(query)
    }

    /// Lists every book in storage order.
    pub fn list_all_books(&self) -> RepoResult<Vec<BookDetails>> {
        self.repo.list_books()
    }

    /// Applies the supplied patch fields to one book.
    ///
    /// # Contract
    /// - An empty patch performs no write and reports `ModifyOutcome::NoFields`.
    /// - A status change propagates to every reservation of the book.
    /// - A missing id reports `Applied` with zero rows written.
    pub fn modify_book(&mut self, id: BookId, patch: &BookPatch) -> RepoResult<ModifyOutcome> {
        if patch.is_empty() {
            return Ok(ModifyOutcome::NoFields);
        }

        self.repo.update_book(id, patch)?;
        Ok(ModifyOutcome::Applied)
    }

    /// Deletes one book together with its reservations.
    pub fn delete_book(&mut self, id: BookId) -> RepoResult<()> {
        self.repo.delete_book(id)
    }
}
