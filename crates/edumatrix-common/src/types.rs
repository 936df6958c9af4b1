//! Record inputs accepted by the store.
//!
//! A `New*` struct carries every writable field of a row. The same struct is
//! used for creation and for full-row replacement, and `validate` is the single
//! place where the record invariants are checked before anything reaches the
//! database.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::ProfessorId;

/// Lowest GPA on the 4.0 scale.
pub const MIN_GPA: f64 = 0.0;

/// Highest GPA on the 4.0 scale.
pub const MAX_GPA: f64 = 4.0;

/// Longest grade string accepted (e.g. "A", "B+", "NP", "INC").
pub const MAX_GRADE_LEN: usize = 8;

/// Format used to store and parse course dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years representable as four-digit `YYYY` text.
pub const DATE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Writable fields of a student row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub degree_program: String,
    pub completed_credits: u32,
    pub gpa: f64,
}

impl NewStudent {
    /// Check the student invariants.
    ///
    /// Names must be non-blank, age must be positive, and the GPA must be a
    /// finite value within `MIN_GPA..=MAX_GPA`. Completed credits are
    /// unsigned, so they cannot be negative.
    pub fn validate(&self) -> Result<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        if self.age == 0 {
            return Err(Error::validation("age", "must be a positive integer, got 0"));
        }
        validate_gpa(self.gpa)
    }
}

/// Writable fields of a professor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfessor {
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    /// Highest academic achievement and subject, e.g. "PhD in Mathematics".
    pub achievement: String,
}

impl NewProfessor {
    /// Check the professor invariants (non-blank names).
    pub fn validate(&self) -> Result<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)
    }
}

/// Writable fields of a course row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub credit_hours: u32,
    /// Instructor of record, `None` while the course is unassigned.
    pub professor_id: Option<ProfessorId>,
}

impl NewCourse {
    /// Check the course invariants.
    ///
    /// The instructor reference is not checked here; whether the professor
    /// exists is only known to the store.
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        check_year("start_date", self.start_date)?;
        check_year("end_date", self.end_date)?;
        if self.end_date < self.start_date {
            return Err(Error::validation(
                "end_date",
                format!(
                    "{} is before start date {}",
                    self.end_date.format(DATE_FORMAT),
                    self.start_date.format(DATE_FORMAT)
                ),
            ));
        }
        if self.credit_hours == 0 {
            return Err(Error::validation(
                "credit_hours",
                "must be a positive integer, got 0",
            ));
        }
        Ok(())
    }
}

/// Validate and normalize an optional grade.
///
/// Surrounding whitespace is trimmed. A present grade must be non-empty and at
/// most `MAX_GRADE_LEN` characters.
pub fn normalize_grade(grade: Option<&str>) -> Result<Option<String>> {
    let Some(grade) = grade else {
        return Ok(None);
    };
    let trimmed = grade.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("grade", "must not be blank"));
    }
    if trimmed.chars().count() > MAX_GRADE_LEN {
        return Err(Error::validation(
            "grade",
            format!("'{trimmed}' is longer than {MAX_GRADE_LEN} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Parse a `YYYY-MM-DD` date, reporting failures against `field`.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        Error::validation(field, format!("'{value}' is not a YYYY-MM-DD date ({e})"))
    })?;
    check_year(field, date)?;
    Ok(date)
}

/// Dates are stored as text, so only four-digit years keep their order.
fn check_year(field: &str, date: NaiveDate) -> Result<()> {
    if !DATE_YEARS.contains(&date.year()) {
        return Err(Error::validation(
            field,
            format!("year {} is outside 0000 to 9999", date.year()),
        ));
    }
    Ok(())
}

fn validate_gpa(gpa: f64) -> Result<()> {
    if !gpa.is_finite() || !(MIN_GPA..=MAX_GPA).contains(&gpa) {
        return Err(Error::validation(
            "gpa",
            format!("must be between {MIN_GPA:.1} and {MAX_GPA:.1}, got {gpa}"),
        ));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> NewStudent {
        NewStudent {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            age: 25,
            degree_program: "CS".into(),
            completed_credits: 30,
            gpa: 3.9,
        }
    }

    fn algorithms() -> NewCourse {
        NewCourse {
            name: "Algorithms".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            credit_hours: 4,
            professor_id: Some(ProfessorId::from(1)),
        }
    }

    #[test]
    fn test_valid_student() {
        assert!(ada().validate().is_ok());
    }

    #[test]
    fn test_gpa_bounds_inclusive() {
        let mut s = ada();
        s.gpa = 0.0;
        assert!(s.validate().is_ok());
        s.gpa = 4.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_gpa_out_of_range() {
        for gpa in [-0.1, 4.01, f64::NAN, f64::INFINITY] {
            let mut s = ada();
            s.gpa = gpa;
            let err = s.validate().unwrap_err();
            assert!(matches!(err, Error::Validation { ref field, .. } if field == "gpa"));
        }
    }

    #[test]
    fn test_zero_age_rejected() {
        let mut s = ada();
        s.age = 0;
        let err = s.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "age"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut s = ada();
        s.last_name = "   ".into();
        let err = s.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "last_name"));

        let p = NewProfessor {
            first_name: String::new(),
            last_name: "Hopper".into(),
            department: "CS".into(),
            achievement: "PhD in CS".into(),
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_course_dates() {
        let mut c = algorithms();
        assert!(c.validate().is_ok());

        c.end_date = c.start_date;
        assert!(c.validate().is_ok());

        c.end_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let err = c.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "end_date"));
    }

    #[test]
    fn test_course_years_outside_four_digits() {
        let mut c = algorithms();
        c.start_date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        c.end_date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let err = c.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "end_date"));

        c.start_date = NaiveDate::from_ymd_opt(-5, 1, 1).unwrap();
        c.end_date = NaiveDate::from_ymd_opt(-1, 1, 1).unwrap();
        let err = c.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "start_date"));

        c.start_date = NaiveDate::from_ymd_opt(0, 1, 1).unwrap();
        c.end_date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_course_zero_credit_hours() {
        let mut c = algorithms();
        c.credit_hours = 0;
        let err = c.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "credit_hours"));
    }

    #[test]
    fn test_normalize_grade() {
        assert_eq!(normalize_grade(None).unwrap(), None);
        assert_eq!(normalize_grade(Some(" A ")).unwrap(), Some("A".to_string()));
        assert!(normalize_grade(Some("")).is_err());
        assert!(normalize_grade(Some("ABCDEFGHI")).is_err());
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("start_date", "2024-01-10").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        let err = parse_date("start_date", "10/01/2024").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "start_date"));

        let err = parse_date("end_date", "+10000-01-01").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "end_date"));
    }
}
