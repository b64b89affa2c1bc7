//! Courses, students and TCC records.

pub mod course;
pub mod student;
pub mod tcc;

use acervo_auth::TccScope;
use acervo_entity::course::Course;

pub use course::CourseService;
pub use student::{NewStudent, StudentService, StudentUpdate};
pub use tcc::{NewTcc, TccQuery, TccService, TccUpdate};

/// Records under a course are scoped by the course's coordinator.
pub(crate) fn course_scope(course: &Course) -> TccScope {
    TccScope {
        organization_id: course.organization_id,
        coordinator_id: course.coordinator_id,
    }
}
