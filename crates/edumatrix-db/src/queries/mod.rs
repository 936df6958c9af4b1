//! Database query modules.
//!
//! Every function takes a plain `&Connection` and performs exactly the SQL
//! its name says. Transactions and locking belong to [`crate::Store`].
//!
//! - students: Student CRUD
//! - professors: Professor CRUD
//! - courses: Course CRUD and the instructor reference check
//! - enrollments: Enroll, grade, unenroll, and the relationship views

use edumatrix_common::{Error, Result};
use rusqlite::Connection;

use crate::models::Stats;

pub mod courses;
pub mod enrollments;
pub mod professors;
pub mod students;

/// Row count of every table.
pub fn stats(conn: &Connection) -> Result<Stats> {
    conn.query_row(
        "SELECT (SELECT COUNT(*) FROM students),
                (SELECT COUNT(*) FROM professors),
                (SELECT COUNT(*) FROM courses),
                (SELECT COUNT(*) FROM enrollments)",
        [],
        |row| {
            Ok(Stats {
                students: row.get(0)?,
                professors: row.get(1)?,
                courses: row.get(2)?,
                enrollments: row.get(3)?,
            })
        },
    )
    .map_err(Error::storage)
}
