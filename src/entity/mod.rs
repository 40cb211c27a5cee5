//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_periods;
pub mod assignments;
pub mod career_subjects;
pub mod careers;
pub mod due_reminders;
pub mod enrollments;
pub mod faculties;
pub mod monthly_reports;
pub mod password_reset_tokens;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod subject_prerequisites;
pub mod subjects;
pub mod submissions;
pub mod teacher_subjects;
pub mod user_roles;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒 -> UTC 时间
pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
