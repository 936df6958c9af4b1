//! Rust structs mapping to database tables.
//!
//! Each row model implements `from_row` for constructing itself from a
//! `rusqlite::Row` whose columns are selected in the model's field order.

use chrono::NaiveDate;
use edumatrix_common::{
    CourseId, NewCourse, NewProfessor, NewStudent, ProfessorId, StudentId, DATE_FORMAT,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` text column.
fn parse_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Render a date the way it is stored.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub degree_program: String,
    pub completed_credits: u32,
    pub gpa: f64,
}

impl Student {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: StudentId::from(row.get::<_, i64>(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            degree_program: row.get(4)?,
            completed_credits: row.get(5)?,
            gpa: row.get(6)?,
        })
    }

    pub(crate) fn from_new(id: StudentId, new: &NewStudent) -> Self {
        Self {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            age: new.age,
            degree_program: new.degree_program.clone(),
            completed_credits: new.completed_credits,
            gpa: new.gpa,
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A student together with every enrollment they hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub enrollments: Vec<Enrollment>,
}

// ---------------------------------------------------------------------------
// Professor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub achievement: String,
}

impl Professor {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: ProfessorId::from(row.get::<_, i64>(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            department: row.get(3)?,
            achievement: row.get(4)?,
        })
    }

    pub(crate) fn from_new(id: ProfessorId, new: &NewProfessor) -> Self {
        Self {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            department: new.department.clone(),
            achievement: new.achievement.clone(),
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A professor together with the courses they are instructor of record for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessorDetail {
    #[serde(flatten)]
    pub professor: Professor,
    pub courses: Vec<Course>,
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub credit_hours: u32,
    pub professor_id: Option<ProfessorId>,
}

impl Course {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: CourseId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            start_date: parse_date(row, 2)?,
            end_date: parse_date(row, 3)?,
            credit_hours: row.get(4)?,
            professor_id: row.get::<_, Option<i64>>(5)?.map(ProfessorId::from),
        })
    }

    pub(crate) fn from_new(id: CourseId, new: &NewCourse) -> Self {
        Self {
            id,
            name: new.name.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            credit_hours: new.credit_hours,
            professor_id: new.professor_id,
        }
    }
}

/// A course together with its instructor and enrollments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: Option<Professor>,
    pub enrollments: Vec<Enrollment>,
}

/// A course row with its instructor's full name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseListing {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: Option<String>,
}

impl CourseListing {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            course: Course::from_row(row)?,
            instructor: row.get(6)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub grade: Option<String>,
}

impl Enrollment {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            student_id: StudentId::from(row.get::<_, i64>(0)?),
            course_id: CourseId::from(row.get::<_, i64>(1)?),
            grade: row.get(2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Relationship views
// ---------------------------------------------------------------------------

/// One course on a student's schedule, with the instructor's name and the
/// student's grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentCourse {
    pub course_id: CourseId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub credit_hours: u32,
    pub instructor: Option<String>,
    pub grade: Option<String>,
}

impl StudentCourse {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            course_id: CourseId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            start_date: parse_date(row, 2)?,
            end_date: parse_date(row, 3)?,
            credit_hours: row.get(4)?,
            instructor: row.get(5)?,
            grade: row.get(6)?,
        })
    }
}

/// One student on a course roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseStudent {
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<String>,
}

impl CourseStudent {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            student_id: StudentId::from(row.get::<_, i64>(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            grade: row.get(3)?,
        })
    }
}

/// Row counts of every table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub students: i64,
    pub professors: i64,
    pub courses: i64,
    pub enrollments: i64,
}
