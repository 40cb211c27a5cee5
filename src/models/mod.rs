pub mod access;
pub mod assignments;
pub mod auth;
pub mod careers;
pub mod common;
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

pub use common::{ApiResponse, FieldErrors, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 服务启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1007,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    PasswordPolicyViolation = 2003,
    ResetTokenInvalid = 2004,

    // 院系 / 专业 / 学期 / 课程
    FacultyNotFound = 3000,
    CareerNotFound = 3001,
    PeriodNotFound = 3002,
    SubjectNotFound = 3003,
    NoActivePeriod = 3004,
    PrerequisiteCycle = 3005,

    // 选课
    EnrollmentNotFound = 4000,
    AlreadyEnrolled = 4001,
    EnrollmentNotAllowed = 4002,

    // 作业与提交
    AssignmentNotFound = 5000,
    WeightBudgetExceeded = 5001,
    InvalidStateTransition = 5002,
    SubmissionNotFound = 5003,
    SubmissionClosed = 5004,
    AlreadyGraded = 5005,

    // 导入
    ImportFileMissingColumn = 6000,
    ImportFileParseFailed = 6001,
    ImportFileDataInvalid = 6002,
    FileUploadFailed = 6003,

    // 报表
    ReportNotFound = 7000,
    ExportFailed = 7001,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values_are_stable() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::ValidationFailed as i32, 1001);
        assert_eq!(ErrorCode::AlreadyEnrolled as i32, 4001);
        assert_eq!(ErrorCode::WeightBudgetExceeded as i32, 5001);
        assert_eq!(ErrorCode::ExportFailed as i32, 7001);
    }
}
