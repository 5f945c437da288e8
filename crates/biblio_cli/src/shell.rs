//! Interactive catalog shell.
//!
//! # Responsibility
//! - Render the numbered menu and prompt for operation fields.
//! - Dispatch to catalog use-cases and print results line by line.
//!
//! # Invariants
//! - Not-found and invalid-input outcomes keep the loop running.
//! - Storage failures abort the loop and propagate to the caller.
//! - End of input ends the session like the exit choice does.

use biblio_core::{
    BookDetails, BookId, BookPatch, CatalogRepository, CatalogService, ModifyOutcome, NewBook,
    RepoError, StatusQuery, StatusReport,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};

pub type ShellResult<T> = Result<T, ShellError>;

/// Fatal shell error: console I/O failure or storage failure.
#[derive(Debug)]
pub enum ShellError {
    Io(std::io::Error),
    Repo(RepoError),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console i/o failed: {err}"),
            Self::Repo(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for ShellError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Menu-driven console shell over the catalog service.
///
/// Generic over its input/output streams so scripted transcripts can
/// drive it in tests.
pub struct Shell<In, Out, Repo>
where
    In: BufRead,
    Out: Write,
    Repo: CatalogRepository,
{
    input: In,
    output: Out,
    service: CatalogService<Repo>,
}

impl<In, Out, Repo> Shell<In, Out, Repo>
where
    In: BufRead,
    Out: Write,
    Repo: CatalogRepository,
{
    pub fn new(input: In, output: Out, service: CatalogService<Repo>) -> Self {
        Self {
            input,
            output,
            service,
        }
    }

    /// Runs the menu loop until the exit choice or end of input.
    pub fn run(&mut self) -> ShellResult<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.read_line("Enter your choice (1-7): ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.add_book()?,
                "2" => self.find_book_details()?,
                "3" => self.find_reservation_status()?,
                "4" => self.list_all_books()?,
                "5" => self.modify_book()?,
                "6" => self.delete_book()?,
                "7" => {
                    writeln!(self.output, "Exiting...")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }

        Ok(())
    }

    fn print_menu(&mut self) -> ShellResult<()> {
        writeln!(self.output, "Library Management System")?;
        writeln!(self.output, "-------------------------")?;
        writeln!(self.output, "1. Add a new book")?;
        writeln!(self.output, "2. Find a book's detail based on BookID")?;
        writeln!(self.output, "3. Find a book's reservation status")?;
        writeln!(self.output, "4. Find all the books in the database")?;
        writeln!(self.output, "5. Modify/update book details")?;
        writeln!(self.output, "6. Delete a book")?;
        writeln!(self.output, "7. Exit")?;
        Ok(())
    }

    fn add_book(&mut self) -> ShellResult<()> {
        let Some(title) = self.read_line("Enter book title: ")? else {
            return Ok(());
        };
        let Some(author) = self.read_line("Enter book author: ")? else {
            return Ok(());
        };
        let Some(isbn) = self.read_line("Enter book ISBN: ")? else {
            return Ok(());
        };
        let Some(status) = self.read_line("Enter book status: ")? else {
            return Ok(());
        };

        self.service
            .add_book(&NewBook::new(title, author, isbn, status))?;
        writeln!(self.output, "Book added successfully.")?;
        Ok(())
    }

    fn find_book_details(&mut self) -> ShellResult<()> {
        let Some(id) = self.read_book_id()? else {
            return Ok(());
        };

        match self.service.find_book_details(id)? {
            Some(details) => {
                writeln!(self.output, "Book Details:")?;
                self.print_book_fields(&details)?;
            }
            None => writeln!(self.output, "Book not found.")?,
        }
        Ok(())
    }

    fn find_reservation_status(&mut self) -> ShellResult<()> {
        let Some(raw) = self.read_line("Enter LB<BookID>, LU<UserID>, or LR<ReservationID>: ")?
        else {
            return Ok(());
        };

        let query = match StatusQuery::parse(&raw) {
            Ok(query) => query,
            Err(err) => {
                info!("event=status_query module=shell status=rejected error={err}");
                writeln!(self.output, "Invalid input.")?;
                return Ok(());
            }
        };

        match self.service.find_reservation_status(&query)? {
            Some(report) => self.print_status_report(&report)?,
            None => writeln!(self.output, "Book or Reservation not found.")?,
        }
        Ok(())
    }

    fn list_all_books(&mut self) -> ShellResult<()> {
        for details in self.service.list_all_books()? {
            writeln!(self.output, "Book ID: {}", details.book.id)?;
            self.print_book_fields(&details)?;
            writeln!(self.output, "---")?;
        }
        Ok(())
    }

    fn modify_book(&mut self) -> ShellResult<()> {
        let Some(id) = self.read_book_id()? else {
            return Ok(());
        };
        let Some(title) = self.read_line("Enter new title (leave empty to skip): ")? else {
            return Ok(());
        };
        let Some(author) = self.read_line("Enter new author (leave empty to skip): ")? else {
            return Ok(());
        };
        let Some(isbn) = self.read_line("Enter new ISBN (leave empty to skip): ")? else {
            return Ok(());
        };
        let Some(status) = self.read_line("Enter new status (leave empty to skip): ")? else {
            return Ok(());
        };

        let patch = BookPatch {
            title: optional_field(title),
            author: optional_field(author),
            isbn: optional_field(isbn),
            status: optional_field(status),
        };

        match self.service.modify_book(id, &patch)? {
            ModifyOutcome::NoFields => writeln!(self.output, "No modifications provided.")?,
            ModifyOutcome::Applied => {
                writeln!(self.output, "Book details updated successfully.")?
            }
        }
        Ok(())
    }

    fn delete_book(&mut self) -> ShellResult<()> {
        let Some(id) = self.read_book_id()? else {
            return Ok(());
        };

        self.service.delete_book(id)?;
        writeln!(self.output, "Book deleted successfully.")?;
        Ok(())
    }

    fn print_book_fields(&mut self, details: &BookDetails) -> ShellResult<()> {
        writeln!(self.output, "Title: {}", details.book.title)?;
        writeln!(self.output, "Author: {}", details.book.author)?;
        writeln!(self.output, "ISBN: {}", details.book.isbn)?;
        writeln!(self.output, "Status: {}", details.book.status)?;

        match &details.reserved_by {
            Some(reserved) => {
                writeln!(self.output, "Reserved by: {}", reserved.name)?;
                writeln!(self.output, "User email: {}", reserved.email)?;
                writeln!(self.output, "Reservation date: {}", reserved.reserved_on)?;
            }
            None => writeln!(self.output, "Not reserved by any user.")?,
        }
        Ok(())
    }

    fn print_status_report(&mut self, report: &StatusReport) -> ShellResult<()> {
        match report {
            StatusReport::Book { status } => {
                writeln!(self.output, "Book Status: {status}")?;
            }
            StatusReport::UserLoan { title, status } => {
                writeln!(self.output, "Book Title: {title}")?;
                writeln!(self.output, "Book Status: {status}")?;
            }
            StatusReport::Reservation {
                title,
                status,
                user_name,
                user_email,
            } => {
                writeln!(self.output, "Book Title: {title}")?;
                writeln!(self.output, "Book Status: {status}")?;
                writeln!(self.output, "Reserved by: {user_name}")?;
                writeln!(self.output, "User email: {user_email}")?;
            }
        }
        Ok(())
    }

    /// Prompts for a book id; reports invalid numeric input and yields
    /// `None` so the menu loop continues.
    fn read_book_id(&mut self) -> ShellResult<Option<BookId>> {
        let Some(raw) = self.read_line("Enter BookID: ")? else {
            return Ok(None);
        };

        match raw.parse() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid input.")?;
                Ok(None)
            }
        }
    }

    /// Writes a prompt and reads one trimmed line; `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> ShellResult<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn optional_field(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
