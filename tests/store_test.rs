//! Integration tests for the records store through its public API.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use edumatrix_common::{
    CourseId, Error, NewCourse, NewProfessor, NewStudent, ProfessorId, StudentId,
};
use edumatrix_db::{
    Bounds, CourseFilter, EnrollmentFilter, Instructor, OpenMode, Store, StudentFilter,
};

fn student(first: &str, last: &str, gpa: f64) -> NewStudent {
    NewStudent {
        first_name: first.into(),
        last_name: last.into(),
        age: 20,
        degree_program: "Physics".into(),
        completed_credits: 12,
        gpa,
    }
}

fn professor(last: &str) -> NewProfessor {
    NewProfessor {
        first_name: "Dr".into(),
        last_name: last.into(),
        department: "Physics".into(),
        achievement: "PHD".into(),
    }
}

fn course(name: &str, professor_id: Option<ProfessorId>) -> NewCourse {
    NewCourse {
        name: name.into(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
        credit_hours: 3,
        professor_id,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn gpa_bounds_are_inclusive() {
    let store = Store::open_in_memory().unwrap();
    assert!(store.create_student(&student("Zero", "Gpa", 0.0)).is_ok());
    assert!(store.create_student(&student("Four", "Gpa", 4.0)).is_ok());

    assert_matches!(
        store.create_student(&student("Over", "Gpa", 4.01)),
        Err(Error::Validation { ref field, .. }) if field == "gpa"
    );
    assert_matches!(
        store.create_student(&student("Nan", "Gpa", f64::NAN)),
        Err(Error::Validation { .. })
    );
    assert_eq!(store.stats().unwrap().students, 2);
}

#[test]
fn zero_age_and_credit_hours_are_rejected() {
    let store = Store::open_in_memory().unwrap();

    let mut s = student("Baby", "Student", 3.0);
    s.age = 0;
    assert_matches!(
        store.create_student(&s),
        Err(Error::Validation { ref field, .. }) if field == "age"
    );

    let mut c = course("Empty", None);
    c.credit_hours = 0;
    assert_matches!(
        store.create_course(&c),
        Err(Error::Validation { ref field, .. }) if field == "credit_hours"
    );
}

#[test]
fn course_years_beyond_four_digits_are_rejected() {
    let store = Store::open_in_memory().unwrap();

    let mut c = course("Far Future", None);
    c.start_date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
    c.end_date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    assert_matches!(
        store.create_course(&c),
        Err(Error::Validation { ref field, .. }) if field == "end_date"
    );

    c.start_date = NaiveDate::from_ymd_opt(-5, 1, 1).unwrap();
    c.end_date = NaiveDate::from_ymd_opt(-1, 1, 1).unwrap();
    assert_matches!(
        store.create_course(&c),
        Err(Error::Validation { ref field, .. }) if field == "start_date"
    );
    assert_eq!(store.stats().unwrap().courses, 0);
}

#[test]
fn blank_names_are_rejected() {
    let store = Store::open_in_memory().unwrap();
    assert_matches!(
        store.create_student(&student("  ", "Lovelace", 3.0)),
        Err(Error::Validation { ref field, .. }) if field == "first_name"
    );
    assert_matches!(
        store.create_course(&course("", None)),
        Err(Error::Validation { ref field, .. }) if field == "name"
    );
}

#[test]
fn long_grade_is_rejected() {
    let store = Store::open_in_memory().unwrap();
    let s = store.create_student(&student("Ada", "Lovelace", 3.0)).unwrap();
    let c = store.create_course(&course("Optics", None)).unwrap();

    assert_matches!(
        store.enroll(s.id, c.id, Some("EXCELLENT")),
        Err(Error::Validation { ref field, .. }) if field == "grade"
    );
    assert!(store
        .list_enrollments(&EnrollmentFilter::default())
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Referential integrity
// ---------------------------------------------------------------------------

#[test]
fn enroll_with_missing_rows() {
    let store = Store::open_in_memory().unwrap();
    let s = store.create_student(&student("Ada", "Lovelace", 3.0)).unwrap();

    assert_matches!(
        store.enroll(s.id, CourseId::from(5), None),
        Err(Error::Reference { ref entity, ref id }) if entity == "course" && id == "5"
    );
    assert_matches!(
        store.enroll(StudentId::from(5), CourseId::from(5), None),
        Err(Error::Reference { ref entity, .. }) if entity == "student"
    );
}

#[test]
fn professor_delete_keeps_courses_and_grades() {
    let store = Store::open_in_memory().unwrap();
    let p = store.create_professor(&professor("Curie")).unwrap();
    let s = store.create_student(&student("Ada", "Lovelace", 3.0)).unwrap();
    let c1 = store.create_course(&course("Radioactivity", Some(p.id))).unwrap();
    let c2 = store.create_course(&course("Chemistry", Some(p.id))).unwrap();
    store.enroll(s.id, c1.id, Some("A")).unwrap();

    assert_eq!(store.courses_for_professor(p.id).unwrap().len(), 2);
    store.delete_professor(p.id).unwrap();

    assert_matches!(store.courses_for_professor(p.id), Err(Error::NotFound { .. }));
    let unassigned = store
        .list_courses(&CourseFilter {
            instructor: Some(Instructor::Unassigned),
            ..Default::default()
        })
        .unwrap();
    let ids: Vec<_> = unassigned.iter().map(|c| c.id).collect();
    assert_eq!(ids, [c1.id, c2.id]);
    assert_eq!(
        store.get_enrollment(s.id, c1.id).unwrap().grade.as_deref(),
        Some("A")
    );
}

#[test]
fn roster_and_schedule_views() {
    let store = Store::open_in_memory().unwrap();
    let p = store.create_professor(&professor("Feynman")).unwrap();
    let c = store.create_course(&course("QED", Some(p.id))).unwrap();
    let a = store.create_student(&student("Ada", "Lovelace", 3.0)).unwrap();
    let b = store.create_student(&student("Alan", "Turing", 3.0)).unwrap();
    store.enroll(b.id, c.id, None).unwrap();
    store.enroll(a.id, c.id, Some("B")).unwrap();

    let roster = store.students_for_course(c.id).unwrap();
    let names: Vec<_> = roster.iter().map(|r| r.last_name.as_str()).collect();
    assert_eq!(names, ["Lovelace", "Turing"]);
    assert_eq!(roster[1].grade, None);

    let schedule = store.courses_for_student(a.id).unwrap();
    assert_eq!(schedule[0].instructor.as_deref(), Some("Dr Feynman"));

    assert_matches!(
        store.students_for_course(CourseId::from(99)),
        Err(Error::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn list_is_restartable_and_filterable() {
    let store = Store::open_in_memory().unwrap();
    for (i, gpa) in [2.0, 2.5, 3.0, 3.5, 4.0].into_iter().enumerate() {
        store
            .create_student(&student("S", &format!("N{i}"), gpa))
            .unwrap();
    }

    let filter = StudentFilter {
        gpa: Bounds::between(2.5, 3.5),
        ..Default::default()
    };
    let first = store.list_students(&filter).unwrap();
    let second = store.list_students(&filter).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);

    let none = store
        .list_students(&StudentFilter {
            degree_program: Some("Dance".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn reopen_preserves_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("university.db");

    {
        let store = Store::open(&path).unwrap();
        let p = store.create_professor(&professor("Noether")).unwrap();
        let s = store.create_student(&student("Emmy", "Student", 3.7)).unwrap();
        let c = store.create_course(&course("Algebra", Some(p.id))).unwrap();
        store.enroll(s.id, c.id, Some("A")).unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(store.mode(), OpenMode::Existing);
    let stats = store.stats().unwrap();
    assert_eq!(
        (stats.students, stats.professors, stats.courses, stats.enrollments),
        (1, 1, 1, 1)
    );

    let detail = store.get_course(CourseId::from(1)).unwrap();
    assert_eq!(detail.course.name, "Algebra");
    assert_eq!(
        detail.instructor.map(|p| p.last_name).as_deref(),
        Some("Noether")
    );

    // new ids continue after the existing ones
    let next = store.create_student(&student("Next", "One", 3.0)).unwrap();
    assert_eq!(next.id, StudentId::from(2));
}

#[test]
fn empty_file_is_treated_as_new() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    std::fs::write(&path, b"").unwrap();

    let store = Store::open(&path).unwrap();
    assert_eq!(store.mode(), OpenMode::Created);
    assert!(store.create_professor(&professor("Bohr")).is_ok());
}

#[test]
fn mismatched_schema_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE professors (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO students (name) VALUES ('Ada');",
        )
        .unwrap();
    }

    assert_matches!(Store::open(&path), Err(Error::Storage { .. }));

    // the file is left as it was
    let conn = rusqlite::Connection::open(&path).unwrap();
    let name: String = conn
        .query_row("SELECT name FROM students", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Ada");
}
