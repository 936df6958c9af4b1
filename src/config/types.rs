use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file holding every record (created on first use)
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("edumatrix.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Directory that relative `--output` paths are resolved against
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Default amounts of demo data generated by `seed`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_students")]
    pub students: u32,

    #[serde(default = "default_seed_professors")]
    pub professors: u32,

    #[serde(default = "default_seed_courses")]
    pub courses: u32,

    /// Each student is enrolled in between 1 and this many courses
    #[serde(default = "default_max_enrollments")]
    pub max_enrollments: u32,
}

fn default_seed_students() -> u32 {
    1000
}
fn default_seed_professors() -> u32 {
    100
}
fn default_seed_courses() -> u32 {
    75
}
fn default_max_enrollments() -> u32 {
    5
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: default_seed_students(),
            professors: default_seed_professors(),
            courses: default_seed_courses(),
            max_enrollments: default_max_enrollments(),
        }
    }
}
