//! Plain-text rendering of ledger results. Everything writes to a generic
//! `io::Write` so the CLI can target stdout and tests can target a buffer.

use std::io::{self, Write};
use std::path::Path;

use crate::models::{DATE_FORMAT, HourEntry, InitStatus, Project, ProjectReport, ProjectTotal, RemovedProject};

const RULE: &str = "---------------------";

pub fn write_project_list(out: &mut impl Write, totals: &[ProjectTotal]) -> io::Result<()> {
    if totals.is_empty() {
        return writeln!(out, "no projects found");
    }
    writeln!(out, "project\t\thours")?;
    writeln!(out, "{RULE}")?;
    for total in totals {
        writeln!(out, "{}\t\t{}", total.name, total.total_hours)?;
    }
    Ok(())
}

/// Entry table (skipped when empty) followed by the hours summary and, when
/// known, the average rate.
pub fn write_project_report(
    out: &mut impl Write,
    report: &ProjectReport,
    currency: &str,
) -> io::Result<()> {
    if !report.entries.is_empty() {
        write_entries(out, &report.entries)?;
    }

    match report.project.allocated {
        Some(allocated) => writeln!(out, "hours: {}/{}", report.total_hours, allocated)?,
        None => writeln!(out, "hours: {}", report.total_hours)?,
    }
    if let Some(rate) = report.average_rate {
        writeln!(out, "avg {rate:.2} {currency}/hour")?;
    }
    Ok(())
}

fn write_entries(out: &mut impl Write, entries: &[HourEntry]) -> io::Result<()> {
    writeln!(out, "date\t\thours")?;
    writeln!(out, "{RULE}")?;
    for entry in entries {
        writeln!(out, "{}\t{}", entry.date.format(DATE_FORMAT), entry.amount)?;
    }
    writeln!(out, "{RULE}")
}

pub fn write_created(out: &mut impl Write, project: &Project) -> io::Result<()> {
    writeln!(out, "created project {project}")
}

pub fn write_removed(out: &mut impl Write, removed: &RemovedProject) -> io::Result<()> {
    match removed.entries_removed {
        0 => writeln!(out, "removed project {}", removed.name),
        n => writeln!(out, "removed project {} ({n} hour entries)", removed.name),
    }
}

pub fn write_added(out: &mut impl Write, project: &Project, entry: &HourEntry) -> io::Result<()> {
    writeln!(
        out,
        "added {} hours to {project} on {}",
        entry.amount,
        entry.date.format(DATE_FORMAT)
    )
}

pub fn write_init(out: &mut impl Write, status: InitStatus, path: &Path) -> io::Result<()> {
    match status {
        InitStatus::Created => writeln!(out, "initialized database {}", path.display()),
        InitStatus::AlreadyExists => writeln!(out, "database {} already exists", path.display()),
    }
}

pub fn write_backup(out: &mut impl Write, dest: &Path) -> io::Result<()> {
    writeln!(out, "backed up database to {}", dest.display())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn project(salary: Option<f64>, allocated: Option<i64>) -> Project {
        Project {
            id: 1,
            name: "thesis".into(),
            salary,
            allocated,
        }
    }

    fn entry(day: u32, amount: i64) -> HourEntry {
        HourEntry {
            id: day as i64,
            project_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            amount,
        }
    }

    #[test]
    fn empty_list_is_reported_distinctly() {
        assert_eq!(render(|out| write_project_list(out, &[])), "no projects found\n");
    }

    #[test]
    fn list_renders_table() {
        let totals = vec![
            ProjectTotal { name: "a".into(), total_hours: 8 },
            ProjectTotal { name: "b".into(), total_hours: 0 },
        ];
        assert_eq!(
            render(|out| write_project_list(out, &totals)),
            format!("project\t\thours\n{RULE}\na\t\t8\nb\t\t0\n")
        );
    }

    #[test]
    fn report_with_rate() {
        let report = ProjectReport::new(
            project(Some(50.0), Some(100)),
            vec![entry(1, 10), entry(2, 15)],
        )
        .unwrap();
        assert_eq!(
            render(|out| write_project_report(out, &report, "dkk")),
            format!(
                "date\t\thours\n{RULE}\n2024-01-01\t10\n2024-01-02\t15\n{RULE}\nhours: 25/100\navg 200.00 dkk/hour\n"
            )
        );
    }

    #[test]
    fn report_without_entries_keeps_summary() {
        let report = ProjectReport::new(project(Some(50.0), Some(100)), Vec::new()).unwrap();
        assert_eq!(
            render(|out| write_project_report(out, &report, "dkk")),
            "hours: 0/100\n"
        );
    }

    #[test]
    fn report_without_budget_shows_plain_total() {
        let report = ProjectReport::new(project(None, None), vec![entry(3, 4)]).unwrap();
        let text = render(|out| write_project_report(out, &report, "dkk"));
        assert!(text.ends_with("hours: 4\n"));
        assert!(!text.contains("avg"));
    }

    #[test]
    fn status_lines_use_the_stored_name() {
        let project = project(None, None);
        assert_eq!(
            render(|out| write_created(out, &project)),
            "created project thesis\n"
        );
        assert_eq!(
            render(|out| write_added(out, &project, &entry(5, 3))),
            "added 3 hours to thesis on 2024-01-05\n"
        );
    }

    #[test]
    fn init_messages() {
        let path = Path::new("/tmp/ledger.sqlite");
        assert_eq!(
            render(|out| write_init(out, InitStatus::AlreadyExists, path)),
            "database /tmp/ledger.sqlite already exists\n"
        );
    }
}
