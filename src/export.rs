//! CSV export of the student, professor, and course tables.
//!
//! Rows are streamed from the store one at a time, so an export never holds a
//! whole table in memory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use edumatrix_common::Error;
use edumatrix_db::{CourseFilter, ProfessorFilter, Store, StudentFilter};

pub const STUDENT_HEADERS: [&str; 7] = [
    "Student ID",
    "First Name",
    "Last Name",
    "Age",
    "Degree Program",
    "Completed Credits",
    "GPA",
];

pub const PROFESSOR_HEADERS: [&str; 5] = [
    "Professor ID",
    "First Name",
    "Last Name",
    "Department",
    "Achievement",
];

pub const COURSE_HEADERS: [&str; 6] = [
    "Course ID",
    "Name",
    "Start Date",
    "End Date",
    "Credit Hours",
    "Professor Name",
];

/// Which table to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Students,
    Professors,
    Courses,
}

impl ExportKind {
    /// File name used when no output path is given.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Students => "students.csv",
            Self::Professors => "professors.csv",
            Self::Courses => "courses.csv",
        }
    }
}

/// Append `.csv` unless the path already ends with it.
pub fn with_csv_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(".csv") {
        path.to_path_buf()
    } else {
        let mut s = path.as_os_str().to_owned();
        s.push(".csv");
        PathBuf::from(s)
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Io(e.into())
}

/// Write every student as CSV. Returns the number of data rows.
pub fn export_students<W: Write>(store: &Store, out: W) -> Result<usize> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(STUDENT_HEADERS)?;

    let rows = store.for_each_student(&StudentFilter::default(), |s| {
        writer
            .write_record([
                s.id.to_string(),
                s.first_name,
                s.last_name,
                s.age.to_string(),
                s.degree_program,
                s.completed_credits.to_string(),
                s.gpa.to_string(),
            ])
            .map_err(csv_error)
    })?;

    writer.flush()?;
    Ok(rows)
}

/// Write every professor as CSV. Returns the number of data rows.
pub fn export_professors<W: Write>(store: &Store, out: W) -> Result<usize> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(PROFESSOR_HEADERS)?;

    let rows = store.for_each_professor(&ProfessorFilter::default(), |p| {
        writer
            .write_record([
                p.id.to_string(),
                p.first_name,
                p.last_name,
                p.department,
                p.achievement,
            ])
            .map_err(csv_error)
    })?;

    writer.flush()?;
    Ok(rows)
}

/// Write every course as CSV, with the instructor's full name (empty when
/// unassigned). Returns the number of data rows.
pub fn export_courses<W: Write>(store: &Store, out: W) -> Result<usize> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(COURSE_HEADERS)?;

    let rows = store.for_each_course_listing(&CourseFilter::default(), |listing| {
        let c = listing.course;
        let instructor = listing.instructor.unwrap_or_default();
        writer
            .write_record([
                c.id.to_string(),
                c.name,
                c.start_date.to_string(),
                c.end_date.to_string(),
                c.credit_hours.to_string(),
                instructor,
            ])
            .map_err(csv_error)
    })?;

    writer.flush()?;
    Ok(rows)
}

/// Export one table to `path` (with `.csv` appended when missing).
///
/// Returns the path actually written and the number of data rows.
pub fn export_to_file(store: &Store, kind: ExportKind, path: &Path) -> Result<(PathBuf, usize)> {
    let path = with_csv_extension(path);
    let file =
        File::create(&path).with_context(|| format!("Failed to create CSV file {:?}", path))?;

    let rows = match kind {
        ExportKind::Students => export_students(store, file)?,
        ExportKind::Professors => export_professors(store, file)?,
        ExportKind::Courses => export_courses(store, file)?,
    };

    tracing::info!("Exported {} {:?} rows to {:?}", rows, kind, path);
    Ok((path, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use edumatrix_common::{NewCourse, NewProfessor, NewStudent};

    fn store_with_data() -> Store {
        let store = Store::open_in_memory().unwrap();
        store
            .create_student(&NewStudent {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                age: 25,
                degree_program: "Computer Science".into(),
                completed_credits: 30,
                gpa: 3.9,
            })
            .unwrap();
        let p = store
            .create_professor(&NewProfessor {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                department: "CS".into(),
                achievement: "PhD in CS".into(),
            })
            .unwrap();
        for (name, professor_id) in [("Algorithms", Some(p.id)), ("Seminar, Advanced", None)] {
            store
                .create_course(&NewCourse {
                    name: name.into(),
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    credit_hours: 4,
                    professor_id,
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_csv_extension() {
        assert_eq!(
            with_csv_extension(Path::new("out/students")),
            PathBuf::from("out/students.csv")
        );
        assert_eq!(
            with_csv_extension(Path::new("students.csv")),
            PathBuf::from("students.csv")
        );
        assert_eq!(
            with_csv_extension(Path::new("report.txt")),
            PathBuf::from("report.txt.csv")
        );
    }

    #[test]
    fn test_export_students() {
        let store = store_with_data();
        let mut out = Vec::new();
        let rows = export_students(&store, &mut out).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Student ID,First Name,Last Name,Age,Degree Program,Completed Credits,GPA")
        );
        assert_eq!(lines.next(), Some("1,Ada,Lovelace,25,Computer Science,30,3.9"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_professors() {
        let store = store_with_data();
        let mut out = Vec::new();
        export_professors(&store, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Professor ID,First Name,Last Name,Department,Achievement\n\
             1,Grace,Hopper,CS,PhD in CS\n"
        );
    }

    #[test]
    fn test_export_courses_quotes_and_instructor() {
        let store = store_with_data();
        let mut out = Vec::new();
        let rows = export_courses(&store, &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Course ID,Name,Start Date,End Date,Credit Hours,Professor Name"
        );
        assert_eq!(lines[1], "1,Algorithms,2024-01-10,2024-05-01,4,Grace Hopper");
        assert_eq!(lines[2], "2,\"Seminar, Advanced\",2024-01-10,2024-05-01,4,");
    }

    #[test]
    fn test_export_courses_after_instructor_deleted() {
        let store = store_with_data();
        store.delete_professor(edumatrix_common::ProfessorId::from(1)).unwrap();

        let mut out = Vec::new();
        assert_eq!(export_courses(&store, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("1,Algorithms,2024-01-10,2024-05-01,4,"));
    }

    #[test]
    fn test_export_empty_table_has_header_only() {
        let store = Store::open_in_memory().unwrap();
        let mut out = Vec::new();
        assert_eq!(export_students(&store, &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_export_to_file_appends_extension() {
        let store = store_with_data();
        let dir = tempfile::tempdir().unwrap();

        let (path, rows) =
            export_to_file(&store, ExportKind::Professors, &dir.path().join("faculty")).unwrap();
        assert_eq!(path, dir.path().join("faculty.csv"));
        assert_eq!(rows, 1);
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .starts_with("Professor ID,"));
    }
}
