//! Catalog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage-handle API for all catalog operations.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Construction validates schema readiness before any query runs.
//! - Join reads surface at most one reservation per book, in storage order.
//! - Multi-statement writes run inside one transaction.

use crate::db::{migrations, DbError};
use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::repo::status_query::{StatusQuery, StatusReport};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_DETAILS_SELECT_SQL: &str = "SELECT
    books.book_id,
    books.title,
    books.author,
    books.isbn,
    books.status,
    users.name,
    users.email,
    reservations.reserved_on
FROM books
LEFT JOIN reservations ON books.book_id = reservations.book_id
LEFT JOIN users ON reservations.user_id = users.user_id";

/// Tables and columns the repository refuses to run without.
const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("books", &["book_id", "title", "author", "isbn", "status"]),
    ("users", &["user_id", "name", "email"]),
    (
        "reservations",
        &["reservation_id", "book_id", "user_id", "reserved_on", "status"],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Reserving-user projection joined onto a book row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedBy {
    pub name: String,
    pub email: String,
    pub reserved_on: String,
}

/// Read model for the detail and list use-cases.
///
/// `reserved_by` is `None` when no reservation references the book; when
/// several do, the one surfaced is whichever the storage order yields
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub book: Book,
    pub reserved_by: Option<ReservedBy>,
}

/// Storage-handle interface for catalog operations.
///
/// The handle is owned by the shell for the process lifetime and released
/// on exit.
pub trait CatalogRepository {
    /// Inserts one book and returns its storage-assigned id.
    fn add_book(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Gets one book with its (at most one) reservation projection.
    fn get_book_details(&self, id: BookId) -> RepoResult<Option<BookDetails>>;
    /// Runs one parsed status lookup; first matching row only.
    fn lookup_status(&self, query: &StatusQuery) -> RepoResult<Option<StatusReport>>;
    /// Lists every book in storage order, same shape as the detail read.
    fn list_books(&self) -> RepoResult<Vec<BookDetails>>;
    /// Applies the supplied patch fields to one book.
    ///
    /// A status change is propagated to every reservation row referencing
    /// the book. A missing id affects zero rows and is not an error.
    fn update_book(&mut self, id: BookId, patch: &BookPatch) -> RepoResult<()>;
    /// Removes one book together with its reservation rows.
    ///
    /// Succeeds whether or not the id existed.
    fn delete_book(&mut self, id: BookId) -> RepoResult<()>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn add_book(&self, book: &NewBook) -> RepoResult<BookId> {
        self.conn.execute(
            "INSERT INTO books (title, author, isbn, status) VALUES (?1, ?2, ?3, ?4);",
            params![book.title, book.author, book.isbn, book.status],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=book_add module=repo status=ok book_id={id}");
        Ok(id)
    }

    fn get_book_details(&self, id: BookId) -> RepoResult<Option<BookDetails>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_DETAILS_SELECT_SQL}
             WHERE books.book_id = ?1
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_details_row(row)?));
        }

        Ok(None)
    }

    fn lookup_status(&self, query: &StatusQuery) -> RepoResult<Option<StatusReport>> {
        let report = match *query {
            StatusQuery::ByBook(book_id) => self
                .conn
                .query_row(
                    "SELECT status FROM books WHERE book_id = ?1;",
                    [book_id],
                    |row| row.get::<_, String>(0),
                )
                .optional()?
                .map(|status| StatusReport::Book { status }),
            StatusQuery::ByUser(user_id) => self
                .conn
                .query_row(
                    "SELECT books.title, books.status
                     FROM books
                     JOIN reservations ON books.book_id = reservations.book_id
                     WHERE reservations.user_id = ?1;",
                    [user_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?
                .map(|(title, status)| StatusReport::UserLoan { title, status }),
            StatusQuery::ByReservation(reservation_id) => self
                .conn
                .query_row(
                    "SELECT books.title, books.status, users.name, users.email
                     FROM books
                     JOIN reservations ON books.book_id = reservations.book_id
                     JOIN users ON reservations.user_id = users.user_id
                     WHERE reservations.reservation_id = ?1;",
                    [reservation_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
                .optional()?
                .map(
                    |(title, status, user_name, user_email)| StatusReport::Reservation {
                        title,
                        status,
                        user_name,
                        user_email,
                    },
                ),
        };

        Ok(report)
    }

    fn list_books(&self) -> RepoResult<Vec<BookDetails>> {
        let mut stmt = self.conn.prepare(&format!("{BOOK_DETAILS_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_details_row(row)?);
        }

        Ok(books)
    }

    fn update_book(&mut self, id: BookId, patch: &BookPatch) -> RepoResult<()> {
        let tx = self.conn.transaction()?;

        let changed = tx.execute(
            "UPDATE books
             SET
                title = COALESCE(?2, title),
                author = COALESCE(?3, author),
                isbn = COALESCE(?4, isbn),
                status = COALESCE(?5, status)
             WHERE book_id = ?1;",
            params![id, patch.title, patch.author, patch.isbn, patch.status],
        )?;

        let mut reservations_touched = 0;
        if let Some(status) = patch.status.as_deref() {
            reservations_touched = tx.execute(
                "UPDATE reservations SET status = ?1 WHERE book_id = ?2;",
                params![status, id],
            )?;
        }

        tx.commit()?;

        if changed == 0 {
            // Unknown ids still report success; the zero-row case only
            // shows up here.
            warn!("event=book_update module=repo status=ok rows=0 book_id={id}");
        } else {
            debug!(
                "event=book_update module=repo status=ok book_id={id} reservations={reservations_touched}"
            );
        }

        Ok(())
    }

    fn delete_book(&mut self, id: BookId) -> RepoResult<()> {
        let tx = self.conn.transaction()?;

        // Reservations go first to satisfy the enabled foreign keys.
        let reservations_removed =
            tx.execute("DELETE FROM reservations WHERE book_id = ?1;", [id])?;
        let books_removed = tx.execute("DELETE FROM books WHERE book_id = ?1;", [id])?;

        tx.commit()?;

        debug!(
            "event=book_delete module=repo status=ok book_id={id} books={books_removed} reservations={reservations_removed}"
        );
        Ok(())
    }
}

fn parse_details_row(row: &Row<'_>) -> RepoResult<BookDetails> {
    let book = Book {
        id: row.get("book_id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        isbn: row.get("isbn")?,
        status: row.get("status")?,
    };

    let reserved_by = match row.get::<_, Option<String>>("name")? {
        Some(name) => {
            let email: Option<String> = row.get("email")?;
            let reserved_on: Option<String> = row.get("reserved_on")?;
            match (email, reserved_on) {
                (Some(email), Some(reserved_on)) => Some(ReservedBy {
                    name,
                    email,
                    reserved_on,
                }),
                _ => {
                    return Err(RepoError::InvalidData(format!(
                        "reservation join for book {} yielded a user without email or date",
                        book.id
                    )));
                }
            }
        }
        None => None,
    };

    Ok(BookDetails { book, reserved_by })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_TABLES {
        ensure_table_ready(conn, table, columns)?;
    }

    Ok(())
}

fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>("name")?);
    }

    for &column in columns {
        if !present.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}
