mod cli;

use edumatrix::{
    auth::{Authenticator, StaticCredentials},
    config, export, seed,
};
use edumatrix_common::{CourseId, NewCourse, NewProfessor, NewStudent, ProfessorId, StudentId};
use edumatrix_db::{
    Bounds, CourseFilter, EnrollmentFilter, Instructor, OpenMode, ProfessorFilter, Store,
    StudentFilter,
};

use anyhow::Result;
use clap::Parser;
use cli::{
    Cli, Commands, CourseCommand, CourseFilterArgs, ProfessorCommand, ProfessorFilterArgs,
    StudentCommand, StudentFilterArgs,
};
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "edumatrix=debug,edumatrix_db=debug,edumatrix_common=debug".to_string()
        } else {
            "edumatrix=warn,edumatrix_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("edumatrix {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = config::load_config_or_default(cli.config.as_deref())?;

    StaticCredentials::default().authenticate(
        cli.username.as_deref().unwrap_or_default(),
        cli.password.as_deref().unwrap_or_default(),
    )?;

    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database.path.clone());
    let store = Store::open(&db_path)?;

    match cli.command {
        Commands::Init => {
            match store.mode() {
                OpenMode::Created => println!("Created new database at {}", db_path.display()),
                OpenMode::Existing => {
                    println!("Opened existing database at {}", db_path.display())
                }
            }
            Ok(())
        }
        Commands::Student { action } => student_command(&store, action),
        Commands::Professor { action } => professor_command(&store, action),
        Commands::Course { action } => course_command(&store, action),
        Commands::Enroll {
            student,
            course,
            grade,
        } => {
            let e = store.enroll(student, course, grade.as_deref())?;
            println!("Enrolled student {} in course {}", e.student_id, e.course_id);
            Ok(())
        }
        Commands::Grade {
            student,
            course,
            grade,
        } => {
            let e = store.set_grade(student, course, grade.as_deref())?;
            match e.grade {
                Some(g) => println!("Set grade {} for student {} in course {}", g, student, course),
                None => println!("Cleared grade for student {} in course {}", student, course),
            }
            Ok(())
        }
        Commands::Unenroll { student, course } => {
            store.unenroll(student, course)?;
            println!("Removed student {} from course {}", student, course);
            Ok(())
        }
        Commands::Enrollments {
            student,
            course,
            json,
        } => list_enrollments(&store, student, course, json),
        Commands::Export { kind, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
            let output = match &config.export.dir {
                Some(dir) if output.is_relative() => dir.join(output),
                _ => output,
            };
            let (path, rows) = export::export_to_file(&store, kind, &output)?;
            println!("Exported {} rows to {}", rows, path.display());
            Ok(())
        }
        Commands::Seed {
            students,
            professors,
            courses,
            max_enrollments,
            rng_seed,
        } => {
            let defaults = seed::SeedPlan::from(&config.seed);
            let plan = seed::SeedPlan {
                students: students.unwrap_or(defaults.students),
                professors: professors.unwrap_or(defaults.professors),
                courses: courses.unwrap_or(defaults.courses),
                max_enrollments: max_enrollments.unwrap_or(defaults.max_enrollments),
            };
            run_seed(&store, plan, rng_seed)
        }
        Commands::Stats { json } => {
            let stats = store.stats()?;
            if json {
                print_json(&stats)?;
            } else {
                println!("Students:    {}", stats.students);
                println!("Professors:  {}", stats.professors);
                println!("Courses:     {}", stats.courses);
                println!("Enrollments: {}", stats.enrollments);
            }
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json_str = serde_json::to_string_pretty(value)?;
    println!("{}", json_str);
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

fn student_command(store: &Store, action: StudentCommand) -> Result<()> {
    match action {
        StudentCommand::Add(args) => {
            let s = store.create_student(&NewStudent {
                first_name: args.first_name,
                last_name: args.last_name,
                age: args.age,
                degree_program: args.degree_program,
                completed_credits: args.completed_credits,
                gpa: args.gpa,
            })?;
            println!("Created student {} ({})", s.id, s.full_name());
        }
        StudentCommand::Show { id, json } => show_student(store, id, json)?,
        StudentCommand::List { filter, json } => {
            let students = store.list_students(&student_filter(filter))?;
            if json {
                print_json(&students)?;
            } else {
                println!(
                    "{:>5}  {:<24} {:>3}  {:<24} {:>7}  {:>4}",
                    "ID", "Name", "Age", "Degree Program", "Credits", "GPA"
                );
                for s in &students {
                    println!(
                        "{:>5}  {:<24} {:>3}  {:<24} {:>7}  {:>4.2}",
                        s.id,
                        s.full_name(),
                        s.age,
                        s.degree_program,
                        s.completed_credits,
                        s.gpa
                    );
                }
            }
        }
        StudentCommand::Update { id, fields } => {
            let current = store.get_student(id)?.student;
            let s = store.update_student(
                id,
                &NewStudent {
                    first_name: fields.first_name.unwrap_or(current.first_name),
                    last_name: fields.last_name.unwrap_or(current.last_name),
                    age: fields.age.unwrap_or(current.age),
                    degree_program: fields.degree_program.unwrap_or(current.degree_program),
                    completed_credits: fields
                        .completed_credits
                        .unwrap_or(current.completed_credits),
                    gpa: fields.gpa.unwrap_or(current.gpa),
                },
            )?;
            println!("Updated student {} ({})", s.id, s.full_name());
        }
        StudentCommand::Delete { id } => {
            store.delete_student(id)?;
            println!("Deleted student {}", id);
        }
    }
    Ok(())
}

fn show_student(store: &Store, id: StudentId, json: bool) -> Result<()> {
    if json {
        return print_json(&store.get_student(id)?);
    }

    let s = store.get_student(id)?.student;
    println!("Student {}: {}", s.id, s.full_name());
    println!("  Age: {}", s.age);
    println!("  Degree program: {}", s.degree_program);
    println!("  Completed credits: {}", s.completed_credits);
    println!("  GPA: {:.2}", s.gpa);

    let courses = store.courses_for_student(id)?;
    println!("\nCourses: {}", courses.len());
    for c in &courses {
        println!(
            "  [{}] {} ({} to {}, {} credit hours) instructor: {}, grade: {}",
            c.course_id,
            c.name,
            c.start_date,
            c.end_date,
            c.credit_hours,
            or_dash(c.instructor.as_deref()),
            or_dash(c.grade.as_deref())
        );
    }
    Ok(())
}

fn student_filter(args: StudentFilterArgs) -> StudentFilter {
    StudentFilter {
        first_name: args.first_name,
        last_name: args.last_name,
        degree_program: args.degree_program,
        age: Bounds {
            min: args.min_age,
            max: args.max_age,
        },
        completed_credits: Bounds {
            min: args.min_credits,
            max: args.max_credits,
        },
        gpa: Bounds {
            min: args.min_gpa,
            max: args.max_gpa,
        },
    }
}

// ---------------------------------------------------------------------------
// Professors
// ---------------------------------------------------------------------------

fn professor_command(store: &Store, action: ProfessorCommand) -> Result<()> {
    match action {
        ProfessorCommand::Add(args) => {
            let p = store.create_professor(&NewProfessor {
                first_name: args.first_name,
                last_name: args.last_name,
                department: args.department,
                achievement: args.achievement,
            })?;
            println!("Created professor {} ({})", p.id, p.full_name());
        }
        ProfessorCommand::Show { id, json } => show_professor(store, id, json)?,
        ProfessorCommand::List { filter, json } => {
            let professors = store.list_professors(&professor_filter(filter))?;
            if json {
                print_json(&professors)?;
            } else {
                println!(
                    "{:>5}  {:<24} {:<20} {}",
                    "ID", "Name", "Department", "Achievement"
                );
                for p in &professors {
                    println!(
                        "{:>5}  {:<24} {:<20} {}",
                        p.id,
                        p.full_name(),
                        p.department,
                        p.achievement
                    );
                }
            }
        }
        ProfessorCommand::Update { id, fields } => {
            let current = store.get_professor(id)?.professor;
            let p = store.update_professor(
                id,
                &NewProfessor {
                    first_name: fields.first_name.unwrap_or(current.first_name),
                    last_name: fields.last_name.unwrap_or(current.last_name),
                    department: fields.department.unwrap_or(current.department),
                    achievement: fields.achievement.unwrap_or(current.achievement),
                },
            )?;
            println!("Updated professor {} ({})", p.id, p.full_name());
        }
        ProfessorCommand::Delete { id } => {
            store.delete_professor(id)?;
            println!("Deleted professor {}", id);
        }
    }
    Ok(())
}

fn show_professor(store: &Store, id: ProfessorId, json: bool) -> Result<()> {
    let detail = store.get_professor(id)?;
    if json {
        return print_json(&detail);
    }

    let p = &detail.professor;
    println!("Professor {}: {}", p.id, p.full_name());
    println!("  Department: {}", p.department);
    println!("  Achievement: {}", p.achievement);

    println!("\nCourses: {}", detail.courses.len());
    for c in &detail.courses {
        println!(
            "  [{}] {} ({} to {}, {} credit hours)",
            c.id, c.name, c.start_date, c.end_date, c.credit_hours
        );
    }
    Ok(())
}

fn professor_filter(args: ProfessorFilterArgs) -> ProfessorFilter {
    ProfessorFilter {
        first_name: args.first_name,
        last_name: args.last_name,
        department: args.department,
        achievement: args.achievement,
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

fn course_command(store: &Store, action: CourseCommand) -> Result<()> {
    match action {
        CourseCommand::Add(args) => {
            let c = store.create_course(&NewCourse {
                name: args.name,
                start_date: args.start,
                end_date: args.end,
                credit_hours: args.credit_hours,
                professor_id: args.professor,
            })?;
            println!("Created course {} ({})", c.id, c.name);
        }
        CourseCommand::Show { id, json } => show_course(store, id, json)?,
        CourseCommand::List { filter, json } => {
            let courses = store.list_courses(&course_filter(filter))?;
            if json {
                print_json(&courses)?;
            } else {
                println!(
                    "{:>5}  {:<28} {:<10} {:<10} {:>7}  {:>9}",
                    "ID", "Name", "Start", "End", "Credits", "Professor"
                );
                for c in &courses {
                    let professor = c
                        .professor_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:>5}  {:<28} {:<10} {:<10} {:>7}  {:>9}",
                        c.id, c.name, c.start_date, c.end_date, c.credit_hours, professor
                    );
                }
            }
        }
        CourseCommand::Update { id, fields } => {
            let current = store.get_course(id)?.course;
            let professor_id = if fields.unassign {
                None
            } else {
                fields.professor.or(current.professor_id)
            };
            let c = store.update_course(
                id,
                &NewCourse {
                    name: fields.name.unwrap_or(current.name),
                    start_date: fields.start.unwrap_or(current.start_date),
                    end_date: fields.end.unwrap_or(current.end_date),
                    credit_hours: fields.credit_hours.unwrap_or(current.credit_hours),
                    professor_id,
                },
            )?;
            println!("Updated course {} ({})", c.id, c.name);
        }
        CourseCommand::Delete { id } => {
            store.delete_course(id)?;
            println!("Deleted course {}", id);
        }
    }
    Ok(())
}

fn show_course(store: &Store, id: CourseId, json: bool) -> Result<()> {
    let detail = store.get_course(id)?;
    if json {
        return print_json(&detail);
    }

    let c = &detail.course;
    println!("Course {}: {}", c.id, c.name);
    println!("  Dates: {} to {}", c.start_date, c.end_date);
    println!("  Credit hours: {}", c.credit_hours);
    match &detail.instructor {
        Some(p) => println!("  Instructor: {} (professor {})", p.full_name(), p.id),
        None => println!("  Instructor: unassigned"),
    }

    let roster = store.students_for_course(id)?;
    println!("\nStudents: {}", roster.len());
    for s in &roster {
        println!(
            "  [{}] {} {}, grade: {}",
            s.student_id,
            s.first_name,
            s.last_name,
            or_dash(s.grade.as_deref())
        );
    }
    Ok(())
}

fn course_filter(args: CourseFilterArgs) -> CourseFilter {
    let instructor = match (args.unassigned, args.professor) {
        (true, _) => Some(Instructor::Unassigned),
        (false, Some(id)) => Some(Instructor::Professor(id)),
        (false, None) => None,
    };
    CourseFilter {
        name: args.name,
        instructor,
        start_date: Bounds {
            min: args.starts_after,
            max: args.starts_before,
        },
        end_date: Bounds::any(),
        credit_hours: Bounds {
            min: args.min_credits,
            max: args.max_credits,
        },
    }
}

// ---------------------------------------------------------------------------
// Enrollments, seeding
// ---------------------------------------------------------------------------

fn list_enrollments(
    store: &Store,
    student: Option<StudentId>,
    course: Option<CourseId>,
    json: bool,
) -> Result<()> {
    let enrollments = store.list_enrollments(&EnrollmentFilter {
        student_id: student,
        course_id: course,
        ..Default::default()
    })?;

    if json {
        return print_json(&enrollments);
    }

    println!("{:>7}  {:>6}  {}", "Student", "Course", "Grade");
    for e in &enrollments {
        println!(
            "{:>7}  {:>6}  {}",
            e.student_id,
            e.course_id,
            or_dash(e.grade.as_deref())
        );
    }
    Ok(())
}

fn run_seed(store: &Store, plan: seed::SeedPlan, rng_seed: Option<u64>) -> Result<()> {
    tracing::debug!("Seeding with {:?}", plan);

    let mut rng = match rng_seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_entropy(),
    };
    let today = chrono::Local::now().date_naive();

    let report = seed::seed(store, &plan, today, &mut rng)?;
    println!(
        "Seeded {} professors, {} students, {} courses, {} enrollments",
        report.professors, report.students, report.courses, report.enrollments
    );
    Ok(())
}
