//! Student CRUD operations.

use edumatrix_common::{Error, NewStudent, Result, StudentId};
use rusqlite::Connection;

use crate::filter::StudentFilter;
use crate::models::Student;

const COLS: &str = "id, first_name, last_name, age, degree_program, completed_credits, gpa";

/// Validate and insert a new student, returning it with its assigned id.
pub fn create_student(conn: &Connection, new: &NewStudent) -> Result<Student> {
    new.validate()?;

    conn.execute(
        "INSERT INTO students (first_name, last_name, age, degree_program, completed_credits, gpa)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            new.first_name,
            new.last_name,
            new.age,
            new.degree_program,
            new.completed_credits,
            new.gpa
        ],
    )
    .map_err(Error::storage)?;

    let id = StudentId::from(conn.last_insert_rowid());
    Ok(Student::from_new(id, new))
}

/// Get a student by primary key.
pub fn get_student(conn: &Connection, id: StudentId) -> Result<Option<Student>> {
    let q = format!("SELECT {COLS} FROM students WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Student::from_row);
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::storage(e)),
    }
}

/// Whether a student row with this id exists.
pub fn student_exists(conn: &Connection, id: StudentId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1)",
        [id.get()],
        |row| row.get(0),
    )
    .map_err(Error::storage)
}

/// Stream matching students, in id order, into `f` one row at a time.
///
/// Returns the number of rows visited. An error from `f` stops the scan and
/// is returned as-is.
pub fn for_each_student<F>(conn: &Connection, filter: &StudentFilter, mut f: F) -> Result<usize>
where
    F: FnMut(Student) -> Result<()>,
{
    let conditions = filter.conditions();
    let q = format!(
        "SELECT {COLS} FROM students{} ORDER BY id",
        conditions.where_clause()
    );
    let mut stmt = conn.prepare(&q).map_err(Error::storage)?;
    let mut rows = stmt
        .query(conditions.params().as_slice())
        .map_err(Error::storage)?;

    let mut visited = 0;
    while let Some(row) = rows.next().map_err(Error::storage)? {
        f(Student::from_row(row).map_err(Error::storage)?)?;
        visited += 1;
    }
    Ok(visited)
}

/// List matching students in id order.
pub fn list_students(conn: &Connection, filter: &StudentFilter) -> Result<Vec<Student>> {
    let mut students = Vec::new();
    for_each_student(conn, filter, |s| {
        students.push(s);
        Ok(())
    })?;
    Ok(students)
}

/// Replace every writable field of a student.
///
/// Returns `None` if no student has this id.
pub fn update_student(
    conn: &Connection,
    id: StudentId,
    new: &NewStudent,
) -> Result<Option<Student>> {
    new.validate()?;

    let n = conn
        .execute(
            "UPDATE students
             SET first_name = ?1, last_name = ?2, age = ?3, degree_program = ?4,
                 completed_credits = ?5, gpa = ?6
             WHERE id = ?7",
            rusqlite::params![
                new.first_name,
                new.last_name,
                new.age,
                new.degree_program,
                new.completed_credits,
                new.gpa,
                id.get()
            ],
        )
        .map_err(Error::storage)?;

    Ok((n > 0).then(|| Student::from_new(id, new)))
}

/// Delete a student (cascades to enrollments). Returns true if a row was deleted.
pub fn delete_student(conn: &Connection, id: StudentId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM students WHERE id = ?1", [id.get()])
        .map_err(Error::storage)?;
    Ok(n > 0)
}
