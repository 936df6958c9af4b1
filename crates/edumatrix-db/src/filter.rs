//! Optional row filters for the `list` operations.
//!
//! Text fields match exactly. Numeric and date fields take inclusive
//! [`Bounds`]. An all-default filter matches every row.

use chrono::NaiveDate;
use edumatrix_common::{CourseId, ProfessorId, StudentId};
use rusqlite::types::ToSql;

use crate::models::format_date;

/// Inclusive lower/upper bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Bounds<T> {
    /// No bound on either side.
    pub fn any() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// `min..=max`
    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `min..`
    pub fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// `..=max`
    pub fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Exactly `value`.
    pub fn exactly(value: T) -> Self
    where
        T: Clone,
    {
        Self::between(value.clone(), value)
    }
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self::any()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub degree_program: Option<String>,
    pub age: Bounds<u32>,
    pub completed_credits: Bounds<u32>,
    pub gpa: Bounds<f64>,
}

impl StudentFilter {
    pub(crate) fn conditions(&self) -> Conditions {
        let mut c = Conditions::default();
        c.eq("first_name", self.first_name.clone());
        c.eq("last_name", self.last_name.clone());
        c.eq("degree_program", self.degree_program.clone());
        c.range("age", &self.age);
        c.range("completed_credits", &self.completed_credits);
        c.range("gpa", &self.gpa);
        c
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessorFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub achievement: Option<String>,
}

impl ProfessorFilter {
    pub(crate) fn conditions(&self) -> Conditions {
        let mut c = Conditions::default();
        c.eq("first_name", self.first_name.clone());
        c.eq("last_name", self.last_name.clone());
        c.eq("department", self.department.clone());
        c.eq("achievement", self.achievement.clone());
        c
    }
}

/// Which instructor a course must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instructor {
    /// Courses with no instructor of record.
    Unassigned,
    /// Courses taught by this professor.
    Professor(ProfessorId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFilter {
    pub name: Option<String>,
    pub instructor: Option<Instructor>,
    pub start_date: Bounds<NaiveDate>,
    pub end_date: Bounds<NaiveDate>,
    pub credit_hours: Bounds<u32>,
}

impl CourseFilter {
    pub(crate) fn conditions(&self) -> Conditions {
        let mut c = Conditions::default();
        c.eq("name", self.name.clone());
        match self.instructor {
            Some(Instructor::Unassigned) => c.raw("professor_id IS NULL"),
            Some(Instructor::Professor(id)) => c.eq("professor_id", Some(id.get())),
            None => {}
        }
        c.range("start_date", &date_bounds(&self.start_date));
        c.range("end_date", &date_bounds(&self.end_date));
        c.range("credit_hours", &self.credit_hours);
        c
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentFilter {
    pub student_id: Option<StudentId>,
    pub course_id: Option<CourseId>,
    pub grade: Option<String>,
    /// `Some(true)` keeps graded rows only, `Some(false)` ungraded only.
    pub graded: Option<bool>,
}

impl EnrollmentFilter {
    /// Every enrollment held by one student.
    pub fn for_student(id: StudentId) -> Self {
        Self {
            student_id: Some(id),
            ..Self::default()
        }
    }

    /// Every enrollment in one course.
    pub fn for_course(id: CourseId) -> Self {
        Self {
            course_id: Some(id),
            ..Self::default()
        }
    }

    pub(crate) fn conditions(&self) -> Conditions {
        let mut c = Conditions::default();
        c.eq("student_id", self.student_id.map(StudentId::get));
        c.eq("course_id", self.course_id.map(CourseId::get));
        c.eq("grade", self.grade.clone());
        match self.graded {
            Some(true) => c.raw("grade IS NOT NULL"),
            Some(false) => c.raw("grade IS NULL"),
            None => {}
        }
        c
    }
}

fn date_bounds(bounds: &Bounds<NaiveDate>) -> Bounds<String> {
    Bounds {
        min: bounds.min.map(format_date),
        max: bounds.max.map(format_date),
    }
}

/// Accumulates `WHERE` terms and their positional parameters.
#[derive(Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl Conditions {
    fn push(&mut self, column: &str, op: &str, value: Box<dyn ToSql>) {
        self.params.push(value);
        self.clauses
            .push(format!("{column} {op} ?{}", self.params.len()));
    }

    fn eq<T: ToSql + 'static>(&mut self, column: &str, value: Option<T>) {
        if let Some(v) = value {
            self.push(column, "=", Box::new(v));
        }
    }

    fn range<T: ToSql + Clone + 'static>(&mut self, column: &str, bounds: &Bounds<T>) {
        if let Some(min) = &bounds.min {
            self.push(column, ">=", Box::new(min.clone()));
        }
        if let Some(max) = &bounds.max {
            self.push(column, "<=", Box::new(max.clone()));
        }
    }

    fn raw(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    /// `""` or `" WHERE a AND b ..."`.
    pub(crate) fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where() {
        let c = StudentFilter::default().conditions();
        assert_eq!(c.where_clause(), "");
        assert!(c.params().is_empty());
    }

    #[test]
    fn test_student_filter_clauses() {
        let filter = StudentFilter {
            degree_program: Some("CS".into()),
            gpa: Bounds::between(3.0, 4.0),
            ..Default::default()
        };
        let c = filter.conditions();
        assert_eq!(
            c.where_clause(),
            " WHERE degree_program = ?1 AND gpa >= ?2 AND gpa <= ?3"
        );
        assert_eq!(c.params().len(), 3);
    }

    #[test]
    fn test_course_unassigned_clause() {
        let filter = CourseFilter {
            instructor: Some(Instructor::Unassigned),
            credit_hours: Bounds::at_least(3),
            ..Default::default()
        };
        let c = filter.conditions();
        assert_eq!(
            c.where_clause(),
            " WHERE professor_id IS NULL AND credit_hours >= ?1"
        );
    }

    #[test]
    fn test_enrollment_graded_clause() {
        let filter = EnrollmentFilter {
            graded: Some(false),
            ..EnrollmentFilter::for_course(CourseId::from(4))
        };
        assert_eq!(
            filter.conditions().where_clause(),
            " WHERE course_id = ?1 AND grade IS NULL"
        );
    }
}
