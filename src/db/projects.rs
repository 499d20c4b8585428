use anyhow::{Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension, Row};

use crate::error::LedgerError;
use crate::models::{Project, ProjectTotal};

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        salary: row.get(2)?,
        allocated: row.get(3)?,
    })
}

/// Look up a project by its already normalized name.
pub fn find_project_by_name(conn: &Connection, name: &str) -> Result<Option<Project>> {
    conn.query_row(
        "SELECT id, name, salary, allocated FROM projects WHERE name = ?1",
        params![name],
        project_from_row,
    )
    .optional()
    .context("failed to look up project")
}

/// Insert a project row and echo it back with the id SQLite assigned.
pub fn insert_project(
    conn: &Connection,
    name: &str,
    salary: Option<f64>,
    allocated: Option<i64>,
) -> Result<Project> {
    conn.execute(
        "INSERT INTO projects (name, salary, allocated) VALUES (?1, ?2, ?3)",
        params![name, salary, allocated],
    )
    .map_err(|err| map_unique_constraint(err, name))
    .context("failed to insert project")?;

    Ok(Project {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        salary,
        allocated,
    })
}

/// Hard delete. Returns the number of rows removed (0 or 1).
pub fn delete_project(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
        .context("failed to delete project")
}

/// Every project with the sum of its entries, oldest project first. Projects
/// without entries are kept with a total of zero.
pub fn project_totals(conn: &Connection) -> Result<Vec<ProjectTotal>> {
    let mut stmt = conn
        .prepare(
            "SELECT projects.name, COALESCE(SUM(hours.amount), 0)
             FROM projects
             LEFT JOIN hours ON projects.id = hours.project_id
             GROUP BY projects.id, projects.name
             ORDER BY projects.id",
        )
        .context("failed to prepare project totals query")?;

    let totals = stmt
        .query_map([], |row| {
            Ok(ProjectTotal {
                name: row.get(0)?,
                total_hours: row.get(1)?,
            })
        })
        .context("failed to load project totals")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect project totals")?;

    Ok(totals)
}

/// Only the unique name index can fire here, so any constraint violation
/// means a duplicate name.
fn map_unique_constraint(err: SqlError, name: &str) -> anyhow::Error {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        LedgerError::AlreadyExists(name.to_string()).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_store;
    use crate::error::ledger_error;

    #[test]
    fn insert_then_find() {
        let conn = memory_store();
        let created = insert_project(&conn, "thesis", Some(50.0), Some(100)).unwrap();
        let found = find_project_by_name(&conn, "thesis").unwrap().unwrap();
        assert_eq!(created, found);
        assert!(find_project_by_name(&conn, "other").unwrap().is_none());
    }

    #[test]
    fn optional_fields_round_trip_as_null() {
        let conn = memory_store();
        insert_project(&conn, "bare", None, None).unwrap();
        let found = find_project_by_name(&conn, "bare").unwrap().unwrap();
        assert_eq!(found.salary, None);
        assert_eq!(found.allocated, None);
    }

    #[test]
    fn duplicate_name_maps_to_already_exists() {
        let conn = memory_store();
        insert_project(&conn, "thesis", None, None).unwrap();
        let err = insert_project(&conn, "thesis", None, None).unwrap_err();
        assert!(matches!(
            ledger_error(&err),
            Some(LedgerError::AlreadyExists(name)) if name == "thesis"
        ));
    }

    #[test]
    fn totals_keep_projects_without_entries() {
        let conn = memory_store();
        let a = insert_project(&conn, "a", None, None).unwrap();
        insert_project(&conn, "b", None, None).unwrap();
        conn.execute(
            "INSERT INTO hours (project_id, date, amount) VALUES (?1, '2024-01-01', 3), (?1, '2024-01-02', 5)",
            params![a.id],
        )
        .unwrap();

        let totals = project_totals(&conn).unwrap();
        assert_eq!(
            totals,
            vec![
                ProjectTotal { name: "a".into(), total_hours: 8 },
                ProjectTotal { name: "b".into(), total_hours: 0 },
            ]
        );
    }
}
