//! Biblio shell entry point.
//!
//! # Responsibility
//! - Wire logging, the database connection and the shell together.
//! - Hold the storage connection for the process lifetime.

use biblio_cli::shell::Shell;
use biblio_core::db::open_db;
use biblio_core::{default_log_level, init_logging, CatalogService, SqliteCatalogRepository};
use std::error::Error;
use std::io;

const DATABASE_FILE: &str = "library.db";
const LOG_DIR_NAME: &str = "logs";

fn main() {
    if let Err(err) = run() {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // Logging failure degrades to a console warning.
    match std::env::current_dir() {
        Ok(current_dir) => {
            if let Err(message) = init_logging(default_log_level(), &current_dir.join(LOG_DIR_NAME))
            {
                eprintln!("warning: logging disabled: {message}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let mut conn = open_db(DATABASE_FILE)?;
    let repo = SqliteCatalogRepository::try_new(&mut conn)?;
    let service = CatalogService::new(repo);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), service);
    shell.run()?;

    Ok(())
}
