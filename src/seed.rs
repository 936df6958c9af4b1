//! Demo data generation.
//!
//! Fills the store with random professors, students, courses, and
//! enrollments drawn from fixed name pools. Every row goes through the normal
//! store operations, so seeded data obeys the same rules as hand-entered data.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use edumatrix_common::{NewCourse, NewProfessor, NewStudent};
use edumatrix_db::Store;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SeedConfig;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Wei", "Priya", "Mohammed", "Sofia", "Hiroshi", "Amara", "Lucas", "Olga",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Taylor", "Moore", "Jackson", "Martin",
    "Lee", "Thompson", "Chen", "Patel", "Nakamura", "Okafor", "Novak", "Rossi", "Kowalski",
];

const DEPARTMENTS: &[&str] = &[
    "Computer Science",
    "Biology",
    "Physics",
    "History",
    "Economics",
    "Mathematics",
    "Chemistry",
    "Engineering",
    "Psychology",
    "Political Science",
];

const ACHIEVEMENTS: &[&str] = &["MBA", "BS", "BA", "PHD"];

const DEGREE_PROGRAMS: &[&str] = &[
    "Computer Science",
    "Biology",
    "Physics",
    "History",
    "Economics",
    "Mathematics",
    "Chemistry",
    "Engineering",
    "Psychology",
    "Political Science",
    "Art",
    "Music",
    "Philosophy",
    "Sociology",
    "Environmental Science",
    "Law",
    "Medicine",
    "Business",
    "Literature",
    "Anthropology",
];

const COURSE_NAMES: &[&str] = &[
    "Intro to Computer Science",
    "Advanced Biology",
    "Quantum Physics",
    "World History",
    "Microeconomics",
    "Calculus",
    "Organic Chemistry",
    "Mechanical Engineering",
    "Cognitive Psychology",
    "Political Theory",
    "Painting 101",
    "Music Theory",
    "Ethics",
    "Social Theory",
    "Climate Change",
    "Constitutional Law",
    "Medical Ethics",
    "Business Management",
    "Shakespearean Literature",
    "Cultural Anthropology",
    "Astronomy",
    "Neuroscience",
    "Creative Writing",
    "Urban Studies",
    "Film Studies",
];

const GRADES: &[&str] = &["A", "B", "C", "D", "F", "P", "NP"];

/// How much data to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub students: u32,
    pub professors: u32,
    pub courses: u32,
    /// Each student takes between 1 and this many distinct courses.
    pub max_enrollments: u32,
}

impl From<&SeedConfig> for SeedPlan {
    fn from(config: &SeedConfig) -> Self {
        Self {
            students: config.students,
            professors: config.professors,
            courses: config.courses,
            max_enrollments: config.max_enrollments,
        }
    }
}

/// Rows actually inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub students: usize,
    pub professors: usize,
    pub courses: usize,
    pub enrollments: usize,
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// A date uniformly drawn from `from..=to`.
fn date_between<R: Rng>(rng: &mut R, from: NaiveDate, to: NaiveDate) -> NaiveDate {
    let span = (to - from).num_days().max(0);
    from + Duration::days(rng.gen_range(0..=span))
}

/// Insert random records according to `plan`.
///
/// Course dates fall within the two years before `today`. Courses are only
/// assigned to professors created by this run, and students only enroll in
/// courses created by this run.
pub fn seed<R: Rng>(
    store: &Store,
    plan: &SeedPlan,
    today: NaiveDate,
    rng: &mut R,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let mut professor_ids = Vec::with_capacity(plan.professors as usize);
    for _ in 0..plan.professors {
        let p = store.create_professor(&NewProfessor {
            first_name: pick(rng, FIRST_NAMES).to_string(),
            last_name: pick(rng, LAST_NAMES).to_string(),
            department: pick(rng, DEPARTMENTS).to_string(),
            achievement: pick(rng, ACHIEVEMENTS).to_string(),
        })?;
        professor_ids.push(p.id);
    }
    report.professors = professor_ids.len();
    tracing::info!("Seeded {} professors", report.professors);

    let mut student_ids = Vec::with_capacity(plan.students as usize);
    for _ in 0..plan.students {
        let gpa: f64 = rng.gen_range(2.0..=4.0);
        let s = store.create_student(&NewStudent {
            first_name: pick(rng, FIRST_NAMES).to_string(),
            last_name: pick(rng, LAST_NAMES).to_string(),
            age: rng.gen_range(18..=25),
            degree_program: pick(rng, DEGREE_PROGRAMS).to_string(),
            completed_credits: rng.gen_range(0..=120),
            gpa: (gpa * 100.0).round() / 100.0,
        })?;
        student_ids.push(s.id);
    }
    report.students = student_ids.len();
    tracing::info!("Seeded {} students", report.students);

    let earliest = today - Duration::days(2 * 365);
    let latest_start = today - Duration::days(365);
    let mut course_ids = Vec::with_capacity(plan.courses as usize);
    for _ in 0..plan.courses {
        let start_date = date_between(rng, earliest, latest_start);
        let end_date = date_between(rng, start_date, today);
        let c = store.create_course(&NewCourse {
            name: pick(rng, COURSE_NAMES).to_string(),
            start_date,
            end_date,
            credit_hours: rng.gen_range(1..=4),
            professor_id: professor_ids.choose(rng).copied(),
        })?;
        course_ids.push(c.id);
    }
    report.courses = course_ids.len();
    tracing::info!("Seeded {} courses", report.courses);

    if !course_ids.is_empty() {
        let max = plan.max_enrollments.max(1) as usize;
        for &student_id in &student_ids {
            let count = rng.gen_range(1..=max.min(course_ids.len()));
            let chosen: Vec<_> = course_ids.choose_multiple(rng, count).copied().collect();
            for course_id in chosen {
                store.enroll(student_id, course_id, Some(pick(rng, GRADES)))?;
                report.enrollments += 1;
            }
        }
    }
    tracing::info!("Seeded {} enrollments", report.enrollments);

    Ok(report)
}
