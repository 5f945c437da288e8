use biblio_core::db::open_db_in_memory;
use biblio_core::{
    CatalogRepository, NewBook, SqliteCatalogRepository, StatusQuery, StatusReport,
};
use rusqlite::Connection;

fn seed_user(conn: &Connection, name: &str, email: &str) -> i64 {
    conn.execute(
        "INSERT INTO users (name, email) VALUES (?1, ?2);",
        [name, email],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn seed_reservation(conn: &Connection, book_id: i64, user_id: i64, reserved_on: &str) -> i64 {
    conn.execute(
        "INSERT INTO reservations (book_id, user_id, reserved_on) VALUES (?1, ?2, ?3);",
        rusqlite::params![book_id, user_id, reserved_on],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn by_book_returns_status_of_unreserved_book() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();

    let id = repo
        .add_book(&NewBook::new("Dune", "Herbert", "111", "available"))
        .unwrap();

    let report = repo.lookup_status(&StatusQuery::ByBook(id)).unwrap();
    assert_eq!(
        report,
        Some(StatusReport::Book {
            status: "available".to_string()
        })
    );
}

#[test]
fn by_book_status_is_unaffected_by_reservations() {
    let mut conn = open_db_in_memory().unwrap();
    let book_id = {
        let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
        repo.add_book(&NewBook::new("Dune", "Herbert", "111", "available"))
            .unwrap()
    };
    let user_id = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    seed_reservation(&conn, book_id, user_id, "2026-08-01");

    let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
    let report = repo.lookup_status(&StatusQuery::ByBook(book_id)).unwrap();
    assert_eq!(
        report,
        Some(StatusReport::Book {
            status: "available".to_string()
        })
    );
}

#[test]
fn by_user_returns_title_and_status_of_the_reserved_book() {
    let mut conn = open_db_in_memory().unwrap();
    let book_id = {
        let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
        repo.add_book(&NewBook::new("Dune", "Herbert", "111", "reserved"))
            .unwrap()
    };
    let user_id = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    seed_reservation(&conn, book_id, user_id, "2026-08-01");

    let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
    let report = repo.lookup_status(&StatusQuery::ByUser(user_id)).unwrap();
    assert_eq!(
        report,
        Some(StatusReport::UserLoan {
            title: "Dune".to_string(),
            status: "reserved".to_string()
        })
    );
}

#[test]
fn by_user_with_several_reservations_reports_one_of_them() {
    let mut conn = open_db_in_memory().unwrap();
    let (first, second) = {
        let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
        let first = repo
            .add_book(&NewBook::new("Dune", "Herbert", "111", "reserved"))
            .unwrap();
        let second = repo
            .add_book(&NewBook::new("Solaris", "Lem", "222", "reserved"))
            .unwrap();
        (first, second)
    };
    let user_id = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    seed_reservation(&conn, first, user_id, "2026-08-01");
    seed_reservation(&conn, second, user_id, "2026-08-02");

    let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
    let report = repo
        .lookup_status(&StatusQuery::ByUser(user_id))
        .unwrap()
        .unwrap();
    match report {
        StatusReport::UserLoan { title, .. } => {
            assert!(title == "Dune" || title == "Solaris");
        }
        other => panic!("unexpected report: {other:?}"),
    }
}

#[test]
fn by_reservation_returns_the_full_link() {
    let mut conn = open_db_in_memory().unwrap();
    let book_id = {
        let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
        repo.add_book(&NewBook::new("Dune", "Herbert", "111", "reserved"))
            .unwrap()
    };
    let user_id = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let reservation_id = seed_reservation(&conn, book_id, user_id, "2026-08-01");

    let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();
    let report = repo
        .lookup_status(&StatusQuery::ByReservation(reservation_id))
        .unwrap();
    assert_eq!(
        report,
        Some(StatusReport::Reservation {
            title: "Dune".to_string(),
            status: "reserved".to_string(),
            user_name: "Ada Lovelace".to_string(),
            user_email: "ada@example.com".to_string(),
        })
    );
}

#[test]
fn lookups_return_none_when_nothing_matches() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&mut conn).unwrap();

    assert!(repo.lookup_status(&StatusQuery::ByBook(1)).unwrap().is_none());
    assert!(repo.lookup_status(&StatusQuery::ByUser(1)).unwrap().is_none());
    assert!(repo
        .lookup_status(&StatusQuery::ByReservation(1))
        .unwrap()
        .is_none());
}
