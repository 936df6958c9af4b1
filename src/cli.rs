use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use edumatrix::export::ExportKind;
use edumatrix_common::{CourseId, ProfessorId, StudentId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edumatrix")]
#[command(author, version, about = "University records manager")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(short, long, global = true, env = "EDUMATRIX_DATABASE")]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Login name
    #[arg(short, long, global = true, env = "EDUMATRIX_USERNAME")]
    pub username: Option<String>,

    /// Login password
    #[arg(
        short,
        long,
        global = true,
        env = "EDUMATRIX_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database if needed and report whether it was new
    Init,

    /// Manage student records
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },

    /// Manage professor records
    Professor {
        #[command(subcommand)]
        action: ProfessorCommand,
    },

    /// Manage course records
    Course {
        #[command(subcommand)]
        action: CourseCommand,
    },

    /// Enroll a student in a course
    Enroll {
        student: StudentId,
        course: CourseId,

        /// Initial grade
        #[arg(long)]
        grade: Option<String>,
    },

    /// Set a grade, or clear it when no grade is given
    Grade {
        student: StudentId,
        course: CourseId,
        grade: Option<String>,
    },

    /// Remove a student from a course
    Unenroll { student: StudentId, course: CourseId },

    /// List enrollments
    Enrollments {
        /// Only enrollments of this student
        #[arg(long)]
        student: Option<StudentId>,

        /// Only enrollments in this course
        #[arg(long)]
        course: Option<CourseId>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a table to a CSV file
    Export {
        #[arg(value_enum)]
        kind: ExportKind,

        /// Output file (".csv" is appended when missing)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fill the database with random demo records
    Seed {
        #[arg(long)]
        students: Option<u32>,

        #[arg(long)]
        professors: Option<u32>,

        #[arg(long)]
        courses: Option<u32>,

        /// Upper bound of courses per student
        #[arg(long)]
        max_enrollments: Option<u32>,

        /// Seed for the random generator, for repeatable data
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Show row counts
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Add a student
    Add(NewStudentArgs),

    /// Show a student with their courses
    Show {
        id: StudentId,
        #[arg(long)]
        json: bool,
    },

    /// List students
    List {
        #[command(flatten)]
        filter: StudentFilterArgs,
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a student; omitted fields keep their value
    Update {
        id: StudentId,
        #[command(flatten)]
        fields: StudentFieldArgs,
    },

    /// Delete a student and their enrollments
    Delete { id: StudentId },
}

#[derive(Args)]
pub struct NewStudentArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub age: u32,
    #[arg(long)]
    pub degree_program: String,
    #[arg(long, default_value_t = 0)]
    pub completed_credits: u32,
    #[arg(long)]
    pub gpa: f64,
}

#[derive(Args)]
pub struct StudentFieldArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub degree_program: Option<String>,
    #[arg(long)]
    pub completed_credits: Option<u32>,
    #[arg(long)]
    pub gpa: Option<f64>,
}

#[derive(Args)]
pub struct StudentFilterArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub degree_program: Option<String>,
    #[arg(long)]
    pub min_age: Option<u32>,
    #[arg(long)]
    pub max_age: Option<u32>,
    #[arg(long)]
    pub min_credits: Option<u32>,
    #[arg(long)]
    pub max_credits: Option<u32>,
    #[arg(long)]
    pub min_gpa: Option<f64>,
    #[arg(long)]
    pub max_gpa: Option<f64>,
}

// ---------------------------------------------------------------------------
// Professors
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ProfessorCommand {
    /// Add a professor
    Add(NewProfessorArgs),

    /// Show a professor with the courses they teach
    Show {
        id: ProfessorId,
        #[arg(long)]
        json: bool,
    },

    /// List professors
    List {
        #[command(flatten)]
        filter: ProfessorFilterArgs,
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a professor; omitted fields keep their value
    Update {
        id: ProfessorId,
        #[command(flatten)]
        fields: ProfessorFieldArgs,
    },

    /// Delete a professor; their courses become unassigned
    Delete { id: ProfessorId },
}

#[derive(Args)]
pub struct NewProfessorArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub achievement: String,
}

#[derive(Args)]
pub struct ProfessorFieldArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub achievement: Option<String>,
}

#[derive(Args)]
pub struct ProfessorFilterArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub achievement: Option<String>,
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum CourseCommand {
    /// Add a course
    Add(NewCourseArgs),

    /// Show a course with its instructor and roster
    Show {
        id: CourseId,
        #[arg(long)]
        json: bool,
    },

    /// List courses
    List {
        #[command(flatten)]
        filter: CourseFilterArgs,
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a course; omitted fields keep their value
    Update {
        id: CourseId,
        #[command(flatten)]
        fields: CourseFieldArgs,
    },

    /// Delete a course and its enrollments
    Delete { id: CourseId },
}

#[derive(Args)]
pub struct NewCourseArgs {
    #[arg(long)]
    pub name: String,
    /// First day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: NaiveDate,
    /// Last day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: NaiveDate,
    #[arg(long)]
    pub credit_hours: u32,
    /// Instructor of record
    #[arg(long)]
    pub professor: Option<ProfessorId>,
}

#[derive(Args)]
pub struct CourseFieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub credit_hours: Option<u32>,
    /// New instructor of record
    #[arg(long, conflicts_with = "unassign")]
    pub professor: Option<ProfessorId>,
    /// Remove the instructor of record
    #[arg(long)]
    pub unassign: bool,
}

#[derive(Args)]
pub struct CourseFilterArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Only courses taught by this professor
    #[arg(long, conflicts_with = "unassigned")]
    pub professor: Option<ProfessorId>,
    /// Only courses without an instructor
    #[arg(long)]
    pub unassigned: bool,
    /// Only courses starting on or after this date
    #[arg(long, value_parser = parse_date_arg)]
    pub starts_after: Option<NaiveDate>,
    /// Only courses starting on or before this date
    #[arg(long, value_parser = parse_date_arg)]
    pub starts_before: Option<NaiveDate>,
    #[arg(long)]
    pub min_credits: Option<u32>,
    #[arg(long)]
    pub max_credits: Option<u32>,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    edumatrix_common::parse_date("date", s).map_err(|e| e.to_string())
}
