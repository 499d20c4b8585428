//! Persistence module split across logical submodules: the store handle and
//! schema, then one file of row helpers per table. Row helpers take a plain
//! `&Connection` so they run equally well inside a `Transaction`.

mod connection;
pub mod hours;
pub mod projects;

pub use connection::Store;
pub use hours::{count_entries, delete_entries_for_project, entries_for_project, insert_entry};
pub use projects::{delete_project, find_project_by_name, insert_project, project_totals};

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::Connection;

    /// In-memory database with the production schema and foreign keys on.
    pub fn memory_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        super::connection::create_schema(&conn).unwrap();
        conn
    }
}
