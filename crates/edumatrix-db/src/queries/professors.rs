//! Professor CRUD operations.

use edumatrix_common::{Error, NewProfessor, ProfessorId, Result};
use rusqlite::Connection;

use crate::filter::ProfessorFilter;
use crate::models::Professor;

const COLS: &str = "id, first_name, last_name, department, achievement";

/// Validate and insert a new professor.
pub fn create_professor(conn: &Connection, new: &NewProfessor) -> Result<Professor> {
    new.validate()?;

    conn.execute(
        "INSERT INTO professors (first_name, last_name, department, achievement)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            new.first_name,
            new.last_name,
            new.department,
            new.achievement
        ],
    )
    .map_err(Error::storage)?;

    let id = ProfessorId::from(conn.last_insert_rowid());
    Ok(Professor::from_new(id, new))
}

/// Get a professor by primary key.
pub fn get_professor(conn: &Connection, id: ProfessorId) -> Result<Option<Professor>> {
    let q = format!("SELECT {COLS} FROM professors WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Professor::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::storage(e)),
    }
}

pub fn professor_exists(conn: &Connection, id: ProfessorId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM professors WHERE id = ?1)",
        [id.get()],
        |row| row.get(0),
    )
    .map_err(Error::storage)
}

/// Stream matching professors, in id order, into `f`.
pub fn for_each_professor<F>(
    conn: &Connection,
    filter: &ProfessorFilter,
    mut f: F,
) -> Result<usize>
where
    F: FnMut(Professor) -> Result<()>,
{
    let conditions = filter.conditions();
    let q = format!(
        "SELECT {COLS} FROM professors{} ORDER BY id",
        conditions.where_clause()
    );
    let mut stmt = conn.prepare(&q).map_err(Error::storage)?;
    let mut rows = stmt
        .query(conditions.params().as_slice())
        .map_err(Error::storage)?;

    let mut visited = 0;
    while let Some(row) = rows.next().map_err(Error::storage)? {
        f(Professor::from_row(row).map_err(Error::storage)?)?;
        visited += 1;
    }
    Ok(visited)
}

/// List matching professors in id order.
pub fn list_professors(conn: &Connection, filter: &ProfessorFilter) -> Result<Vec<Professor>> {
    let mut professors = Vec::new();
    for_each_professor(conn, filter, |p| {
        professors.push(p);
        Ok(())
    })?;
    Ok(professors)
}

/// Replace every writable field of a professor. `None` if the id is unknown.
pub fn update_professor(
    conn: &Connection,
    id: ProfessorId,
    new: &NewProfessor,
) -> Result<Option<Professor>> {
    new.validate()?;

    let n = conn
        .execute(
            "UPDATE professors
             SET first_name = ?1, last_name = ?2, department = ?3, achievement = ?4
             WHERE id = ?5",
            rusqlite::params![
                new.first_name,
                new.last_name,
                new.department,
                new.achievement,
                id.get()
            ],
        )
        .map_err(Error::storage)?;

    Ok((n > 0).then(|| Professor::from_new(id, new)))
}

/// Delete a professor. Their courses stay, with `professor_id` set to NULL.
pub fn delete_professor(conn: &Connection, id: ProfessorId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM professors WHERE id = ?1", [id.get()])
        .map_err(Error::storage)?;
    Ok(n > 0)
}
