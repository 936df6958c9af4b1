//! The records store: the single owner of the database file.
//!
//! [`Store`] wraps the connection pool and exposes the full set of record
//! operations. Every operation holds the store mutex for its whole duration,
//! and every write runs inside one SQLite transaction that is rolled back
//! when the operation returns an error.

use std::path::Path;

use edumatrix_common::{
    CourseId, Error, NewCourse, NewProfessor, NewStudent, ProfessorId, Result, StudentId,
};
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::filter::{CourseFilter, EnrollmentFilter, ProfessorFilter, StudentFilter};
use crate::models::{
    Course, CourseDetail, CourseListing, CourseStudent, Enrollment, Professor, ProfessorDetail,
    Stats, Student, StudentCourse, StudentDetail,
};
use crate::pool::{self, DbPool, OpenMode};
use crate::queries::{self, courses, enrollments, professors, students};

/// Thread-safe handle to the records database.
pub struct Store {
    pool: DbPool,
    lock: Mutex<()>,
    mode: OpenMode,
    location: String,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("location", &self.location)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open the database at `path`, creating it with the full schema if the
    /// file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (pool, mode) = pool::init_pool(path)?;
        match mode {
            OpenMode::Created => info!(path = %path.display(), "Created new records database"),
            OpenMode::Existing => info!(path = %path.display(), "Opened records database"),
        }
        Ok(Self {
            pool,
            lock: Mutex::new(()),
            mode,
            location: path.display().to_string(),
        })
    }

    /// A fresh private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            pool: pool::init_memory_pool()?,
            lock: Mutex::new(()),
            mode: OpenMode::Created,
            location: ":memory:".to_string(),
        })
    }

    /// Whether [`open`](Self::open) created the file or found it.
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock();
        let conn = pool::get_conn(&self.pool)?;
        f(&conn)
    }

    fn write<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock();
        let conn = pool::get_conn(&self.pool)?;
        let tx = conn.unchecked_transaction().map_err(Error::storage)?;
        let out = f(&tx)?;
        tx.commit().map_err(Error::storage)?;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Students
    // -----------------------------------------------------------------------

    pub fn create_student(&self, new: &NewStudent) -> Result<Student> {
        let student = self.write(|conn| students::create_student(conn, new))?;
        debug!(id = %student.id, "Created student");
        Ok(student)
    }

    /// A student with every enrollment they hold.
    pub fn get_student(&self, id: StudentId) -> Result<StudentDetail> {
        self.read(|conn| {
            let student =
                students::get_student(conn, id)?.ok_or_else(|| Error::not_found("student", id))?;
            let enrollments =
                enrollments::list_enrollments(conn, &EnrollmentFilter::for_student(id))?;
            Ok(StudentDetail {
                student,
                enrollments,
            })
        })
    }

    pub fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>> {
        self.read(|conn| students::list_students(conn, filter))
    }

    /// Visit matching students one row at a time.
    ///
    /// The store stays locked while `f` runs, so `f` must not call back into
    /// this store.
    pub fn for_each_student<F>(&self, filter: &StudentFilter, f: F) -> Result<usize>
    where
        F: FnMut(Student) -> Result<()>,
    {
        self.read(|conn| students::for_each_student(conn, filter, f))
    }

    pub fn update_student(&self, id: StudentId, new: &NewStudent) -> Result<Student> {
        let student = self
            .write(|conn| students::update_student(conn, id, new))?
            .ok_or_else(|| Error::not_found("student", id))?;
        debug!(id = %id, "Updated student");
        Ok(student)
    }

    /// Delete a student and, by cascade, their enrollments.
    pub fn delete_student(&self, id: StudentId) -> Result<()> {
        if !self.write(|conn| students::delete_student(conn, id))? {
            return Err(Error::not_found("student", id));
        }
        debug!(id = %id, "Deleted student");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Professors
    // -----------------------------------------------------------------------

    pub fn create_professor(&self, new: &NewProfessor) -> Result<Professor> {
        let professor = self.write(|conn| professors::create_professor(conn, new))?;
        debug!(id = %professor.id, "Created professor");
        Ok(professor)
    }

    /// A professor with the courses they teach.
    pub fn get_professor(&self, id: ProfessorId) -> Result<ProfessorDetail> {
        self.read(|conn| {
            let professor = professors::get_professor(conn, id)?
                .ok_or_else(|| Error::not_found("professor", id))?;
            let courses = courses::courses_for_professor(conn, id)?;
            Ok(ProfessorDetail { professor, courses })
        })
    }

    pub fn list_professors(&self, filter: &ProfessorFilter) -> Result<Vec<Professor>> {
        self.read(|conn| professors::list_professors(conn, filter))
    }

    /// See [`for_each_student`](Self::for_each_student).
    pub fn for_each_professor<F>(&self, filter: &ProfessorFilter, f: F) -> Result<usize>
    where
        F: FnMut(Professor) -> Result<()>,
    {
        self.read(|conn| professors::for_each_professor(conn, filter, f))
    }

    pub fn update_professor(&self, id: ProfessorId, new: &NewProfessor) -> Result<Professor> {
        let professor = self
            .write(|conn| professors::update_professor(conn, id, new))?
            .ok_or_else(|| Error::not_found("professor", id))?;
        debug!(id = %id, "Updated professor");
        Ok(professor)
    }

    /// Delete a professor. Their courses remain, unassigned.
    pub fn delete_professor(&self, id: ProfessorId) -> Result<()> {
        if !self.write(|conn| professors::delete_professor(conn, id))? {
            return Err(Error::not_found("professor", id));
        }
        debug!(id = %id, "Deleted professor");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Courses
    // -----------------------------------------------------------------------

    pub fn create_course(&self, new: &NewCourse) -> Result<Course> {
        let course = self.write(|conn| courses::create_course(conn, new))?;
        debug!(id = %course.id, "Created course");
        Ok(course)
    }

    /// A course with its instructor (if any) and enrollments.
    pub fn get_course(&self, id: CourseId) -> Result<CourseDetail> {
        self.read(|conn| {
            let course =
                courses::get_course(conn, id)?.ok_or_else(|| Error::not_found("course", id))?;
            let instructor = match course.professor_id {
                Some(pid) => professors::get_professor(conn, pid)?,
                None => None,
            };
            let enrollments =
                enrollments::list_enrollments(conn, &EnrollmentFilter::for_course(id))?;
            Ok(CourseDetail {
                course,
                instructor,
                enrollments,
            })
        })
    }

    pub fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        self.read(|conn| courses::list_courses(conn, filter))
    }

    /// See [`for_each_student`](Self::for_each_student).
    pub fn for_each_course<F>(&self, filter: &CourseFilter, f: F) -> Result<usize>
    where
        F: FnMut(Course) -> Result<()>,
    {
        self.read(|conn| courses::for_each_course(conn, filter, f))
    }

    /// Like [`for_each_course`](Self::for_each_course), with each course's
    /// instructor name resolved in the same query.
    pub fn for_each_course_listing<F>(&self, filter: &CourseFilter, f: F) -> Result<usize>
    where
        F: FnMut(CourseListing) -> Result<()>,
    {
        self.read(|conn| courses::for_each_course_listing(conn, filter, f))
    }

    pub fn update_course(&self, id: CourseId, new: &NewCourse) -> Result<Course> {
        let course = self
            .write(|conn| courses::update_course(conn, id, new))?
            .ok_or_else(|| Error::not_found("course", id))?;
        debug!(id = %id, "Updated course");
        Ok(course)
    }

    /// Delete a course and, by cascade, its enrollments.
    pub fn delete_course(&self, id: CourseId) -> Result<()> {
        if !self.write(|conn| courses::delete_course(conn, id))? {
            return Err(Error::not_found("course", id));
        }
        debug!(id = %id, "Deleted course");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Enrollments
    // -----------------------------------------------------------------------

    pub fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
        grade: Option<&str>,
    ) -> Result<Enrollment> {
        let enrollment =
            self.write(|conn| enrollments::enroll(conn, student_id, course_id, grade))?;
        debug!(student = %student_id, course = %course_id, "Enrolled");
        Ok(enrollment)
    }

    pub fn get_enrollment(&self, student_id: StudentId, course_id: CourseId) -> Result<Enrollment> {
        self.read(|conn| enrollments::get_enrollment(conn, student_id, course_id))?
            .ok_or_else(|| enrollment_not_found(student_id, course_id))
    }

    /// Set the grade of an existing enrollment; `None` clears it.
    pub fn set_grade(
        &self,
        student_id: StudentId,
        course_id: CourseId,
        grade: Option<&str>,
    ) -> Result<Enrollment> {
        let enrollment = self
            .write(|conn| enrollments::set_grade(conn, student_id, course_id, grade))?
            .ok_or_else(|| enrollment_not_found(student_id, course_id))?;
        debug!(student = %student_id, course = %course_id, grade = ?enrollment.grade, "Set grade");
        Ok(enrollment)
    }

    pub fn unenroll(&self, student_id: StudentId, course_id: CourseId) -> Result<()> {
        if !self.write(|conn| enrollments::unenroll(conn, student_id, course_id))? {
            return Err(enrollment_not_found(student_id, course_id));
        }
        debug!(student = %student_id, course = %course_id, "Unenrolled");
        Ok(())
    }

    pub fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>> {
        self.read(|conn| enrollments::list_enrollments(conn, filter))
    }

    // -----------------------------------------------------------------------
    // Relationship views
    // -----------------------------------------------------------------------

    /// The courses a student is enrolled in, with instructor names and grades.
    pub fn courses_for_student(&self, id: StudentId) -> Result<Vec<StudentCourse>> {
        self.read(|conn| {
            if !students::student_exists(conn, id)? {
                return Err(Error::not_found("student", id));
            }
            enrollments::courses_for_student(conn, id)
        })
    }

    pub fn courses_for_professor(&self, id: ProfessorId) -> Result<Vec<Course>> {
        self.read(|conn| {
            if !professors::professor_exists(conn, id)? {
                return Err(Error::not_found("professor", id));
            }
            courses::courses_for_professor(conn, id)
        })
    }

    pub fn students_for_course(&self, id: CourseId) -> Result<Vec<CourseStudent>> {
        self.read(|conn| {
            if !courses::course_exists(conn, id)? {
                return Err(Error::not_found("course", id));
            }
            enrollments::students_for_course(conn, id)
        })
    }

    pub fn stats(&self) -> Result<Stats> {
        self.read(queries::stats)
    }
}

fn enrollment_not_found(student_id: StudentId, course_id: CourseId) -> Error {
    Error::not_found(
        "enrollment",
        format!("student {student_id} in course {course_id}"),
    )
}
