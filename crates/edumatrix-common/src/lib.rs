//! EduMatrix-Common: Shared types, identifiers, and errors.
//!
//! This crate provides the vocabulary shared by the store and its callers:
//!
//! - **Typed IDs**: Integer wrappers for students, professors, and courses
//! - **Record inputs**: Validated field sets used to create or replace rows
//! - **Error Handling**: The error kinds every store operation reports
//!
//! # Examples
//!
//! ```
//! use edumatrix_common::{NewStudent, StudentId, Error, Result};
//!
//! let id = StudentId::from(1);
//! assert_eq!(id.get(), 1);
//!
//! let ada = NewStudent {
//!     first_name: "Ada".into(),
//!     last_name: "Lovelace".into(),
//!     age: 25,
//!     degree_program: "CS".into(),
//!     completed_credits: 30,
//!     gpa: 3.9,
//! };
//! assert!(ada.validate().is_ok());
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("student", 42))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
