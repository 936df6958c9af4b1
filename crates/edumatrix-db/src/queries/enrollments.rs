//! Enrollment operations and the student/course relationship views.

use edumatrix_common::{normalize_grade, CourseId, Error, Result, StudentId};
use rusqlite::Connection;

use crate::filter::EnrollmentFilter;
use crate::models::{CourseStudent, Enrollment, StudentCourse};
use crate::queries::courses::course_exists;
use crate::queries::students::student_exists;

const COLS: &str = "student_id, course_id, grade";

fn pair_key(student_id: StudentId, course_id: CourseId) -> String {
    format!("student {student_id} in course {course_id}")
}

/// Enroll a student in a course, optionally with a grade.
///
/// Both rows must exist and the pair must not already be enrolled.
pub fn enroll(
    conn: &Connection,
    student_id: StudentId,
    course_id: CourseId,
    grade: Option<&str>,
) -> Result<Enrollment> {
    let grade = normalize_grade(grade)?;

    if !student_exists(conn, student_id)? {
        return Err(Error::reference("student", student_id));
    }
    if !course_exists(conn, course_id)? {
        return Err(Error::reference("course", course_id));
    }
    if get_enrollment(conn, student_id, course_id)?.is_some() {
        return Err(Error::duplicate("enrollment", pair_key(student_id, course_id)));
    }

    conn.execute(
        "INSERT INTO enrollments (student_id, course_id, grade) VALUES (?1, ?2, ?3)",
        rusqlite::params![student_id.get(), course_id.get(), grade],
    )
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            Error::duplicate("enrollment", pair_key(student_id, course_id))
        } else {
            Error::storage(e)
        }
    })?;

    Ok(Enrollment {
        student_id,
        course_id,
        grade,
    })
}

/// Get one enrollment by its (student, course) pair.
pub fn get_enrollment(
    conn: &Connection,
    student_id: StudentId,
    course_id: CourseId,
) -> Result<Option<Enrollment>> {
    let q = format!("SELECT {COLS} FROM enrollments WHERE student_id = ?1 AND course_id = ?2");
    let result = conn.query_row(
        &q,
        [student_id.get(), course_id.get()],
        Enrollment::from_row,
    );
    match result {
        Ok(e) => Ok(Some(e)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::storage(e)),
    }
}

/// Set or clear the grade of an existing enrollment.
///
/// Returns `None` if the pair is not enrolled.
pub fn set_grade(
    conn: &Connection,
    student_id: StudentId,
    course_id: CourseId,
    grade: Option<&str>,
) -> Result<Option<Enrollment>> {
    let grade = normalize_grade(grade)?;

    let n = conn
        .execute(
            "UPDATE enrollments SET grade = ?1 WHERE student_id = ?2 AND course_id = ?3",
            rusqlite::params![grade, student_id.get(), course_id.get()],
        )
        .map_err(Error::storage)?;

    Ok((n > 0).then_some(Enrollment {
        student_id,
        course_id,
        grade,
    }))
}

/// Remove an enrollment. Returns true if a row was deleted.
pub fn unenroll(conn: &Connection, student_id: StudentId, course_id: CourseId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM enrollments WHERE student_id = ?1 AND course_id = ?2",
            [student_id.get(), course_id.get()],
        )
        .map_err(Error::storage)?;
    Ok(n > 0)
}

/// List matching enrollments ordered by student, then course.
pub fn list_enrollments(conn: &Connection, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>> {
    let conditions = filter.conditions();
    let q = format!(
        "SELECT {COLS} FROM enrollments{} ORDER BY student_id, course_id",
        conditions.where_clause()
    );
    let mut stmt = conn.prepare(&q).map_err(Error::storage)?;
    let rows = stmt
        .query_map(conditions.params().as_slice(), Enrollment::from_row)
        .map_err(Error::storage)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::storage)
}

/// A student's courses with instructor name and grade, ordered by course id.
///
/// The caller is expected to have checked that the student exists.
pub fn courses_for_student(conn: &Connection, student_id: StudentId) -> Result<Vec<StudentCourse>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.name, c.start_date, c.end_date, c.credit_hours,
                    p.first_name || ' ' || p.last_name, e.grade
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             LEFT JOIN professors p ON p.id = c.professor_id
             WHERE e.student_id = ?1
             ORDER BY c.id",
        )
        .map_err(Error::storage)?;
    let rows = stmt
        .query_map([student_id.get()], StudentCourse::from_row)
        .map_err(Error::storage)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::storage)
}

/// The roster of a course with each student's grade, ordered by student id.
pub fn students_for_course(conn: &Connection, course_id: CourseId) -> Result<Vec<CourseStudent>> {
    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.first_name, s.last_name, e.grade
             FROM enrollments e
             JOIN students s ON s.id = e.student_id
             WHERE e.course_id = ?1
             ORDER BY s.id",
        )
        .map_err(Error::storage)?;
    let rows = stmt
        .query_map([course_id.get()], CourseStudent::from_row)
        .map_err(Error::storage)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::storage)
}
