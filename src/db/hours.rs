use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::models::{HourEntry, DATE_FORMAT};

/// Insert one entry. The foreign key rejects ids with no matching project.
pub fn insert_entry(
    conn: &Connection,
    project_id: i64,
    date: NaiveDate,
    amount: i64,
) -> Result<HourEntry> {
    conn.execute(
        "INSERT INTO hours (project_id, date, amount) VALUES (?1, ?2, ?3)",
        params![project_id, date.format(DATE_FORMAT).to_string(), amount],
    )
    .context("failed to insert hour entry")?;

    Ok(HourEntry {
        id: conn.last_insert_rowid(),
        project_id,
        date,
        amount,
    })
}

/// All entries of a project ordered by date, ties broken by insertion order.
pub fn entries_for_project(conn: &Connection, project_id: i64) -> Result<Vec<HourEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, project_id, date, amount
             FROM hours
             WHERE project_id = ?1
             ORDER BY date, id",
        )
        .context("failed to prepare hour entries query")?;

    let mut rows = stmt
        .query(params![project_id])
        .context("failed to execute hour entries query")?;

    let mut entries = Vec::new();
    while let Some(row) = rows.next().context("failed to fetch hour entry row")? {
        let raw_date: String = row.get(2).context("failed to read entry date")?;
        let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
            .map_err(|err| anyhow!("stored date {raw_date:?} is not ISO formatted: {err}"))?;
        entries.push(HourEntry {
            id: row.get(0).context("failed to read entry id")?,
            project_id: row.get(1).context("failed to read entry project")?,
            date,
            amount: row.get(3).context("failed to read entry amount")?,
        });
    }

    Ok(entries)
}

pub fn count_entries(conn: &Connection, project_id: i64) -> Result<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM hours WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )
        .context("failed to count hour entries")?;
    Ok(count as usize)
}

pub fn delete_entries_for_project(conn: &Connection, project_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM hours WHERE project_id = ?1", params![project_id])
        .context("failed to delete hour entries")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::projects::insert_project;
    use crate::db::test_support::memory_store;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn entries_come_back_in_date_order() {
        let conn = memory_store();
        let project = insert_project(&conn, "thesis", None, None).unwrap();
        insert_entry(&conn, project.id, date(2024, 3, 2), 4).unwrap();
        insert_entry(&conn, project.id, date(2024, 1, 15), 2).unwrap();

        let entries = entries_for_project(&conn, project.id).unwrap();
        let dates: Vec<_> = entries.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 15), date(2024, 3, 2)]);
        assert_eq!(count_entries(&conn, project.id).unwrap(), 2);
    }

    #[test]
    fn foreign_key_rejects_unknown_project() {
        let conn = memory_store();
        assert!(insert_entry(&conn, 42, date(2024, 1, 1), 1).is_err());
    }

    #[test]
    fn delete_only_touches_one_project() {
        let conn = memory_store();
        let a = insert_project(&conn, "a", None, None).unwrap();
        let b = insert_project(&conn, "b", None, None).unwrap();
        insert_entry(&conn, a.id, date(2024, 1, 1), 1).unwrap();
        insert_entry(&conn, b.id, date(2024, 1, 1), 1).unwrap();

        assert_eq!(delete_entries_for_project(&conn, a.id).unwrap(), 1);
        assert_eq!(count_entries(&conn, a.id).unwrap(), 0);
        assert_eq!(count_entries(&conn, b.id).unwrap(), 1);
    }
}
