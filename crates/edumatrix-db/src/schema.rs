//! Database schema definition and verification.
//!
//! A new database file gets the whole schema in one transaction. An existing
//! file is never altered: its tables, columns, and referential actions are
//! compared against what this crate expects, and any difference is reported as
//! a storage error.

use edumatrix_common::{Error, Result};
use rusqlite::Connection;

/// Version stamped into `PRAGMA user_version` when the schema is created.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE students (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name        TEXT NOT NULL,
    last_name         TEXT NOT NULL,
    age               INTEGER NOT NULL CHECK (age > 0),
    degree_program    TEXT NOT NULL,
    completed_credits INTEGER NOT NULL CHECK (completed_credits >= 0),
    gpa               REAL NOT NULL CHECK (gpa >= 0.0 AND gpa <= 4.0)
);

CREATE TABLE professors (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    department  TEXT NOT NULL,
    achievement TEXT NOT NULL
);

CREATE TABLE courses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    start_date   TEXT NOT NULL,
    end_date     TEXT NOT NULL,
    credit_hours INTEGER NOT NULL CHECK (credit_hours > 0),
    professor_id INTEGER REFERENCES professors(id) ON DELETE SET NULL,
    CHECK (end_date >= start_date)
);

CREATE INDEX idx_courses_professor ON courses(professor_id);

CREATE TABLE enrollments (
    student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    course_id  INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    grade      TEXT,
    PRIMARY KEY (student_id, course_id)
);

CREATE INDEX idx_enrollments_course ON enrollments(course_id);
"#;

/// Expected columns of every table.
const TABLES: &[(&str, &[&str])] = &[
    (
        "students",
        &[
            "id",
            "first_name",
            "last_name",
            "age",
            "degree_program",
            "completed_credits",
            "gpa",
        ],
    ),
    (
        "professors",
        &["id", "first_name", "last_name", "department", "achievement"],
    ),
    (
        "courses",
        &[
            "id",
            "name",
            "start_date",
            "end_date",
            "credit_hours",
            "professor_id",
        ],
    ),
    ("enrollments", &["student_id", "course_id", "grade"]),
];

/// Expected referential actions: (table, column, referenced table, on delete).
const FOREIGN_KEYS: &[(&str, &str, &str, &str)] = &[
    ("courses", "professor_id", "professors", "SET NULL"),
    ("enrollments", "student_id", "students", "CASCADE"),
    ("enrollments", "course_id", "courses", "CASCADE"),
];

/// Create every table and index on an empty database.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction().map_err(Error::storage)?;

    tx.execute_batch(SCHEMA)
        .map_err(|e| Error::storage(format!("Failed to create schema: {e}")))?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(Error::storage)?;

    tx.commit().map_err(Error::storage)?;
    Ok(())
}

/// Check that an existing database has the expected tables, columns,
/// referential actions and `user_version`.
pub fn verify_schema(conn: &Connection) -> Result<()> {
    for (table, expected) in TABLES {
        let columns = table_columns(conn, table)?;
        if columns.is_empty() {
            return Err(Error::storage(format!(
                "Schema mismatch: table '{table}' is missing"
            )));
        }
        for column in *expected {
            if !columns.iter().any(|c| c == column) {
                return Err(Error::storage(format!(
                    "Schema mismatch: table '{table}' has no column '{column}'"
                )));
            }
        }
    }

    for (table, column, target, on_delete) in FOREIGN_KEYS {
        let found: Option<String> = conn
            .query_row(
                "SELECT on_delete FROM pragma_foreign_key_list(?1)
                 WHERE \"from\" = ?2 AND \"table\" = ?3",
                rusqlite::params![table, column, target],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                e => Err(e),
            })
            .map_err(Error::storage)?;

        match found {
            Some(action) if action.eq_ignore_ascii_case(on_delete) => {}
            Some(action) => {
                return Err(Error::storage(format!(
                    "Schema mismatch: {table}.{column} uses ON DELETE {action}, expected {on_delete}"
                )));
            }
            None => {
                return Err(Error::storage(format!(
                    "Schema mismatch: {table}.{column} does not reference {target}"
                )));
            }
        }
    }

    let version = schema_version(conn)?;
    if version != SCHEMA_VERSION {
        return Err(Error::storage(format!(
            "Schema mismatch: user_version is {version}, expected {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

/// Read `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(Error::storage)
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(Error::storage)?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(Error::storage)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::storage)?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_apply_then_verify() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        verify_schema(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        for (table, _) in TABLES {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "table {table} should exist");
        }
    }

    #[test]
    fn test_verify_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert!(err.to_string().contains("students"));
    }

    #[test]
    fn test_verify_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute_batch(
            "DROP TABLE enrollments;
             CREATE TABLE enrollments (student_id INTEGER, course_id INTEGER);",
        )
        .unwrap();

        let err = verify_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("grade"));
    }

    #[test]
    fn test_verify_wrong_delete_action() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute_batch(
            "DROP TABLE enrollments;
             CREATE TABLE enrollments (
                 student_id INTEGER REFERENCES students(id),
                 course_id  INTEGER REFERENCES courses(id) ON DELETE CASCADE,
                 grade      TEXT,
                 PRIMARY KEY (student_id, course_id)
             );",
        )
        .unwrap();

        let err = verify_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("enrollments.student_id"));
    }

    #[test]
    fn test_verify_wrong_version() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1).unwrap();

        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
        assert!(err.to_string().contains("user_version is 2"));
    }

    #[test]
    fn test_check_constraints() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let bad_gpa = conn.execute(
            "INSERT INTO students (first_name, last_name, age, degree_program, completed_credits, gpa)
             VALUES ('A', 'B', 20, 'CS', 0, 4.5)",
            [],
        );
        assert!(bad_gpa.is_err());

        let bad_dates = conn.execute(
            "INSERT INTO courses (name, start_date, end_date, credit_hours)
             VALUES ('X', '2024-05-01', '2024-01-01', 3)",
            [],
        );
        assert!(bad_dates.is_err());
    }
}
