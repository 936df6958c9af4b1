//! Course CRUD operations.
//!
//! A course may name a professor as instructor of record. The reference is
//! checked before every insert or update so a dangling id is reported as
//! [`Error::Reference`] rather than a raw constraint failure.

use edumatrix_common::{CourseId, Error, NewCourse, ProfessorId, Result};
use rusqlite::Connection;

use crate::filter::CourseFilter;
use crate::models::{format_date, Course, CourseListing};
use crate::queries::professors::professor_exists;

const COLS: &str = "id, name, start_date, end_date, credit_hours, professor_id";

fn check_instructor(conn: &Connection, professor_id: Option<ProfessorId>) -> Result<()> {
    match professor_id {
        Some(id) if !professor_exists(conn, id)? => Err(Error::reference("professor", id)),
        _ => Ok(()),
    }
}

/// Validate and insert a new course.
pub fn create_course(conn: &Connection, new: &NewCourse) -> Result<Course> {
    new.validate()?;
    check_instructor(conn, new.professor_id)?;

    conn.execute(
        "INSERT INTO courses (name, start_date, end_date, credit_hours, professor_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            new.name,
            format_date(new.start_date),
            format_date(new.end_date),
            new.credit_hours,
            new.professor_id.map(ProfessorId::get)
        ],
    )
    .map_err(Error::storage)?;

    let id = CourseId::from(conn.last_insert_rowid());
    Ok(Course::from_new(id, new))
}

/// Get a course by primary key.
pub fn get_course(conn: &Connection, id: CourseId) -> Result<Option<Course>> {
    let q = format!("SELECT {COLS} FROM courses WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Course::from_row);
    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::storage(e)),
    }
}

pub fn course_exists(conn: &Connection, id: CourseId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)",
        [id.get()],
        |row| row.get(0),
    )
    .map_err(Error::storage)
}

/// Stream matching courses, in id order, into `f`.
pub fn for_each_course<F>(conn: &Connection, filter: &CourseFilter, mut f: F) -> Result<usize>
where
    F: FnMut(Course) -> Result<()>,
{
    let conditions = filter.conditions();
    let q = format!(
        "SELECT {COLS} FROM courses{} ORDER BY id",
        conditions.where_clause()
    );
    let mut stmt = conn.prepare(&q).map_err(Error::storage)?;
    let mut rows = stmt
        .query(conditions.params().as_slice())
        .map_err(Error::storage)?;

    let mut visited = 0;
    while let Some(row) = rows.next().map_err(Error::storage)? {
        f(Course::from_row(row).map_err(Error::storage)?)?;
        visited += 1;
    }
    Ok(visited)
}

/// Stream matching courses joined with their instructor's name, in id order.
pub fn for_each_course_listing<F>(
    conn: &Connection,
    filter: &CourseFilter,
    mut f: F,
) -> Result<usize>
where
    F: FnMut(CourseListing) -> Result<()>,
{
    let conditions = filter.conditions();
    let q = format!(
        "SELECT c.id, c.name, c.start_date, c.end_date, c.credit_hours, c.professor_id,
                p.first_name || ' ' || p.last_name
         FROM courses c
         LEFT JOIN professors p ON p.id = c.professor_id{}
         ORDER BY c.id",
        conditions.where_clause()
    );
    let mut stmt = conn.prepare(&q).map_err(Error::storage)?;
    let mut rows = stmt
        .query(conditions.params().as_slice())
        .map_err(Error::storage)?;

    let mut visited = 0;
    while let Some(row) = rows.next().map_err(Error::storage)? {
        f(CourseListing::from_row(row).map_err(Error::storage)?)?;
        visited += 1;
    }
    Ok(visited)
}

/// List matching courses in id order.
pub fn list_courses(conn: &Connection, filter: &CourseFilter) -> Result<Vec<Course>> {
    let mut courses = Vec::new();
    for_each_course(conn, filter, |c| {
        courses.push(c);
        Ok(())
    })?;
    Ok(courses)
}

/// Replace every writable field of a course, including its instructor.
pub fn update_course(conn: &Connection, id: CourseId, new: &NewCourse) -> Result<Option<Course>> {
    new.validate()?;
    if !course_exists(conn, id)? {
        return Ok(None);
    }
    check_instructor(conn, new.professor_id)?;

    conn.execute(
        "UPDATE courses
         SET name = ?1, start_date = ?2, end_date = ?3, credit_hours = ?4, professor_id = ?5
         WHERE id = ?6",
        rusqlite::params![
            new.name,
            format_date(new.start_date),
            format_date(new.end_date),
            new.credit_hours,
            new.professor_id.map(ProfessorId::get),
            id.get()
        ],
    )
    .map_err(Error::storage)?;

    Ok(Some(Course::from_new(id, new)))
}

/// Delete a course (cascades to enrollments).
pub fn delete_course(conn: &Connection, id: CourseId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM courses WHERE id = ?1", [id.get()])
        .map_err(Error::storage)?;
    Ok(n > 0)
}

/// Courses a professor is instructor of record for, in id order.
pub fn courses_for_professor(conn: &Connection, professor_id: ProfessorId) -> Result<Vec<Course>> {
    let filter = CourseFilter {
        instructor: Some(crate::filter::Instructor::Professor(professor_id)),
        ..Default::default()
    };
    list_courses(conn, &filter)
}
