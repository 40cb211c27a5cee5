pub mod assignments;

pub mod auth;

pub mod careers;

pub mod enrollments;

pub mod faculties;

pub mod grades;

pub mod periods;

pub mod reports;

pub mod roles;

pub mod subjects;

pub mod submissions;

pub mod system;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use careers::configure_career_routes;
pub use enrollments::configure_enrollment_routes;
pub use faculties::configure_faculty_routes;
pub use grades::configure_grade_routes;
pub use periods::configure_period_routes;
pub use reports::configure_report_routes;
pub use roles::configure_role_routes;
pub use subjects::configure_subject_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
