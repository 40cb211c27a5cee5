//! 预导入模块，方便使用

pub use super::academic_periods::{
    ActiveModel as AcademicPeriodActiveModel, Entity as AcademicPeriods,
    Model as AcademicPeriodModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::career_subjects::{
    ActiveModel as CareerSubjectActiveModel, Entity as CareerSubjects, Model as CareerSubjectModel,
};
pub use super::careers::{ActiveModel as CareerActiveModel, Entity as Careers, Model as CareerModel};
pub use super::due_reminders::{
    ActiveModel as DueReminderActiveModel, Entity as DueReminders, Model as DueReminderModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::faculties::{
    ActiveModel as FacultyActiveModel, Entity as Faculties, Model as FacultyModel,
};
pub use super::monthly_reports::{
    ActiveModel as MonthlyReportActiveModel, Entity as MonthlyReports, Model as MonthlyReportModel,
};
pub use super::password_reset_tokens::{
    ActiveModel as PasswordResetTokenActiveModel, Entity as PasswordResetTokens,
    Model as PasswordResetTokenModel,
};
pub use super::permissions::{
    ActiveModel as PermissionActiveModel, Entity as Permissions, Model as PermissionModel,
};
pub use super::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Entity as RolePermissions,
    Model as RolePermissionModel,
};
pub use super::roles::{ActiveModel as RoleActiveModel, Entity as Roles, Model as RoleModel};
pub use super::subject_prerequisites::{
    ActiveModel as SubjectPrerequisiteActiveModel, Entity as SubjectPrerequisites,
    Model as SubjectPrerequisiteModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::teacher_subjects::{
    ActiveModel as TeacherSubjectActiveModel, Entity as TeacherSubjects,
    Model as TeacherSubjectModel,
};
pub use super::user_roles::{
    ActiveModel as UserRoleActiveModel, Entity as UserRoles, Model as UserRoleModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
