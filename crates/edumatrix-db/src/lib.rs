//! Edumatrix-DB: Database schema, query operations, and the records store
//!
//! This crate provides the persistence layer for edumatrix using SQLite with
//! rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `schema` - Schema creation and verification
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `filter` - Optional filters for the list operations
//! - `queries` - Database query operations on a plain connection
//! - `store` - The locked, transactional [`Store`] facade
//!
//! # Example
//!
//! ```no_run
//! use edumatrix_common::NewStudent;
//! use edumatrix_db::Store;
//!
//! let store = Store::open("edumatrix.db").unwrap();
//! let student = store
//!     .create_student(&NewStudent {
//!         first_name: "Ada".into(),
//!         last_name: "Lovelace".into(),
//!         age: 25,
//!         degree_program: "CS".into(),
//!         completed_credits: 30,
//!         gpa: 3.9,
//!     })
//!     .unwrap();
//! println!("Created student: {}", student.id);
//! ```

pub mod filter;
pub mod models;
pub mod pool;
pub mod queries;
pub mod schema;
pub mod store;

pub use filter::{
    Bounds, CourseFilter, EnrollmentFilter, Instructor, ProfessorFilter, StudentFilter,
};
pub use models::*;
pub use pool::OpenMode;
pub use store::Store;
