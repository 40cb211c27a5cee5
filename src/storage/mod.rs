use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{
    PaginatedResponse,
    access::AccessScope,
    assignments::{
        entities::{Assignment, AssignmentStatus},
        reminders::{DueReminder, ReminderKind},
        requests::AssignmentListQuery,
    },
    careers::{
        entities::Career,
        requests::{CareerListQuery, CreateCareerRequest, UpdateCareerRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentDetail},
        requests::EnrollmentListQuery,
    },
    faculties::{
        entities::Faculty,
        requests::{CreateFacultyRequest, FacultyListQuery, UpdateFacultyRequest},
    },
    grades::entities::GradeItem,
    periods::{
        entities::{AcademicPeriod, PeriodCloneResult},
        requests::{CreatePeriodRequest, PeriodListQuery, UpdatePeriodRequest},
    },
    reports::entities::{
        MonthWindow, MonthlyReport, MonthlyReportData, MonthlyReportSummary, ReportRow,
        TeacherLink,
    },
    roles::entities::{Permission, Role, RoleCode},
    subjects::{
        entities::{Subject, SubjectDetail},
        requests::{PlanEntryInput, SubjectListQuery, UpdateSubjectRequest},
    },
    submissions::{
        entities::{Submission, SubmissionView},
        requests::SubmissionListQuery,
    },
    users::{
        entities::User,
        requests::{NewUser, UpdateUserRequest, UserListQuery},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 新建课程（存储层）
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: i32,
    pub period_id: i64,
}

/// 新建作业（存储层，字段已校验）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub weight: Decimal,
    pub publish_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub allow_late_submission: bool,
    pub created_by: i64,
}

/// 作业修改（合并后的最终值）
#[derive(Debug, Clone)]
pub struct AssignmentChanges {
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub weight: Decimal,
    pub publish_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub allow_late_submission: bool,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 数据库连通性检查
    async fn ping(&self) -> Result<()>;

    /// 用户管理方法
    // 创建用户（同时写入角色）
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过证件号获取用户信息
    async fn get_user_by_document(&self, document_number: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新密码哈希
    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 替换用户角色
    async fn set_user_roles(&self, id: i64, roles: &[RoleCode]) -> Result<Option<User>>;
    // 统计拥有某角色的用户
    async fn count_users_with_role(&self, role: RoleCode) -> Result<u64>;
    // 通过任一角色拥有某权限的活跃用户
    async fn list_users_with_permission(&self, permission: &str) -> Result<Vec<User>>;

    /// 角色与权限
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn list_permissions(&self) -> Result<Vec<Permission>>;
    // 替换角色的权限集合，返回 None 表示角色不存在
    async fn set_role_permissions(
        &self,
        role: RoleCode,
        permissions: &[String],
    ) -> Result<Option<Role>>;

    /// 密码重置令牌
    async fn create_password_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<()>;
    // 消费令牌，成功时返回用户ID
    async fn consume_password_reset_token(&self, token: &str, now: i64) -> Result<Option<i64>>;

    /// 院系
    async fn create_faculty(&self, req: CreateFacultyRequest) -> Result<Faculty>;
    async fn get_faculty_by_id(&self, id: i64) -> Result<Option<Faculty>>;
    async fn list_faculties_with_pagination(
        &self,
        query: FacultyListQuery,
    ) -> Result<PaginatedResponse<Faculty>>;
    async fn update_faculty(&self, id: i64, update: UpdateFacultyRequest)
    -> Result<Option<Faculty>>;
    async fn delete_faculty(&self, id: i64) -> Result<bool>;

    /// 专业
    async fn create_career(&self, req: CreateCareerRequest) -> Result<Career>;
    async fn get_career_by_id(&self, id: i64) -> Result<Option<Career>>;
    // 按代码或名称查找（不区分大小写）
    async fn find_career(&self, code_or_name: &str) -> Result<Option<Career>>;
    async fn list_careers_with_pagination(
        &self,
        query: CareerListQuery,
    ) -> Result<PaginatedResponse<Career>>;
    async fn update_career(&self, id: i64, update: UpdateCareerRequest) -> Result<Option<Career>>;
    async fn delete_career(&self, id: i64) -> Result<bool>;

    /// 学期
    async fn create_period(&self, req: CreatePeriodRequest) -> Result<AcademicPeriod>;
    async fn get_period_by_id(&self, id: i64) -> Result<Option<AcademicPeriod>>;
    async fn get_active_period(&self) -> Result<Option<AcademicPeriod>>;
    async fn list_periods_with_pagination(
        &self,
        query: PeriodListQuery,
    ) -> Result<PaginatedResponse<AcademicPeriod>>;
    async fn update_period(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
    ) -> Result<Option<AcademicPeriod>>;
    async fn delete_period(&self, id: i64) -> Result<bool>;
    // 在一个事务内清除所有激活标记后激活指定学期
    async fn activate_period(&self, id: i64) -> Result<Option<AcademicPeriod>>;
    // 复制学期课程（按代码 get-or-create）及培养方案关联
    async fn clone_period_subjects(&self, source: i64, target: i64) -> Result<PeriodCloneResult>;

    /// 课程
    async fn create_subject(&self, subject: NewSubject, plan: &[PlanEntryInput])
    -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_code(&self, code: &str, period_id: i64) -> Result<Option<Subject>>;
    async fn get_subject_detail(&self, id: i64) -> Result<Option<SubjectDetail>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<Subject>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    // 替换课程的培养方案条目
    async fn set_subject_careers(&self, id: i64, entries: &[PlanEntryInput]) -> Result<()>;
    // 把课程加入专业（已存在时更新学期），返回是否新建
    async fn link_subject_career(&self, subject_id: i64, entry: &PlanEntryInput) -> Result<bool>;
    // 课程所属专业的院系
    async fn subject_faculty_ids(&self, subject_id: i64) -> Result<Vec<i64>>;
    // 某学期内全部先修关联
    async fn list_prerequisite_edges(&self, period_id: i64) -> Result<Vec<(i64, i64)>>;
    async fn set_subject_prerequisites(&self, id: i64, prerequisite_ids: &[i64]) -> Result<()>;
    async fn list_subject_teachers(&self, subject_id: i64) -> Result<Vec<User>>;
    // 返回是否新建
    async fn assign_teacher(&self, subject_id: i64, teacher_id: i64) -> Result<bool>;
    async fn unassign_teacher(&self, subject_id: i64, teacher_id: i64) -> Result<bool>;
    // 访问范围内可见的课程，None 表示不限制
    async fn visible_subject_ids(&self, scope: AccessScope) -> Result<Option<Vec<i64>>>;
    async fn subject_in_scope(&self, scope: AccessScope, subject_id: i64) -> Result<bool>;

    /// 选课
    // 已退选的 (学生, 课程, 学期) 会被重新激活
    async fn create_enrollment(
        &self,
        student_id: i64,
        subject_id: i64,
        period_id: i64,
        schedule: &str,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<EnrollmentDetail>>;
    async fn find_enrollment(
        &self,
        student_id: i64,
        subject_id: i64,
        period_id: i64,
    ) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<EnrollmentDetail>>;
    // 退选：记录保留，状态改为 withdrawn
    async fn withdraw_enrollment(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    // 学生所在专业、当前学期尚未选的课程
    async fn list_available_subjects(
        &self,
        student_id: i64,
        career_id: i64,
        period_id: i64,
    ) -> Result<Vec<Subject>>;
    async fn is_student_enrolled(&self, student_id: i64, subject_id: i64) -> Result<bool>;
    // 课程的在读学生
    async fn list_subject_students(&self, subject_id: i64) -> Result<Vec<User>>;

    /// 作业
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    async fn set_assignment_status(
        &self,
        id: i64,
        status: AssignmentStatus,
    ) -> Result<Option<Assignment>>;
    // 课程作业权重合计（可排除某个作业）
    async fn subject_weight_total(&self, subject_id: i64, exclude: Option<i64>)
    -> Result<Decimal>;
    // 同课程下标题是否重复（不区分大小写）
    async fn assignment_title_exists(
        &self,
        subject_id: i64,
        title: &str,
        exclude: Option<i64>,
    ) -> Result<bool>;

    /// 截止提醒
    // 重新安排未发送的提醒，已发送的保持不变
    async fn schedule_reminders(
        &self,
        assignment_id: i64,
        plan: &[(ReminderKind, DateTime<Utc>)],
    ) -> Result<usize>;
    // 取出到期未发送的提醒
    async fn claim_due_reminders(&self, now: i64, limit: u64) -> Result<Vec<DueReminder>>;
    async fn get_reminder(&self, id: i64) -> Result<Option<DueReminder>>;
    // 条件更新：只有 sent_at 为空时才会成功
    async fn mark_reminder_sent(&self, id: i64, now: i64) -> Result<bool>;

    /// 提交
    // 新建或替换未评分的提交
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        attachment_url: Option<String>,
    ) -> Result<Submission>;
    async fn get_submission_view(&self, id: i64) -> Result<Option<SubmissionView>>;
    async fn find_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<SubmissionView>>;
    // 不分页，供分组视图使用
    async fn list_submission_views(
        &self,
        visible_ids: Option<Vec<i64>>,
        subject_id: Option<i64>,
        assignment_id: Option<i64>,
    ) -> Result<Vec<SubmissionView>>;
    async fn grade_submission(
        &self,
        id: i64,
        grade: Decimal,
        feedback: Option<String>,
        grader_id: i64,
    ) -> Result<Option<Submission>>;

    /// 成绩
    // 已发布/已关闭作业及该学生的成绩
    async fn list_grade_items(&self, subject_id: i64, student_id: i64) -> Result<Vec<GradeItem>>;

    /// 月度报告
    async fn fetch_report_rows(
        &self,
        window: MonthWindow,
    ) -> Result<(Vec<ReportRow>, Vec<TeacherLink>)>;
    async fn get_monthly_report(&self, year: i32, month: u32) -> Result<Option<MonthlyReport>>;
    // 按 (year, month) 写入或覆盖报告内容
    async fn save_monthly_report(&self, data: &MonthlyReportData) -> Result<MonthlyReport>;
    async fn mark_report_sent(&self, id: i64, now: i64) -> Result<bool>;
    async fn list_monthly_reports(&self, year: Option<i32>) -> Result<Vec<MonthlyReportSummary>>;
}

pub async fn create_storage() -> Result<std::sync::Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(std::sync::Arc::new(storage))
}
