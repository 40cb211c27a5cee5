//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod careers;
mod enrollments;
mod faculties;
mod grades;
mod periods;
mod reminders;
mod reports;
mod roles;
mod subjects;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{AcademiaError, Result};
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
use crate::storage::{AssignmentChanges, NewAssignment, NewSubject, Storage};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademiaError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", Self::redact_url(&db_url));

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademiaError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AcademiaError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AcademiaError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 日志中隐藏连接串里的密码
    fn redact_url(url: &str) -> String {
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme), Some(at)) if at > scheme => {
                format!("{}://***{}", &url[..scheme], &url[at..])
            }
            _ => url.to_string(),
        }
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AcademiaError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

#[async_trait::async_trait]
impl Storage for SeaOrmStorage {
    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| AcademiaError::database_connection(format!("数据库连接检查失败: {e}")))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_document(&self, document_number: &str) -> Result<Option<User>> {
        self.get_user_by_document_impl(document_number).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_user_password_impl(id, password_hash).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn set_user_roles(&self, id: i64, roles: &[RoleCode]) -> Result<Option<User>> {
        self.set_user_roles_impl(id, roles).await
    }

    async fn count_users_with_role(&self, role: RoleCode) -> Result<u64> {
        self.count_users_with_role_impl(role).await
    }

    async fn list_users_with_permission(&self, permission: &str) -> Result<Vec<User>> {
        self.list_users_with_permission_impl(permission).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>> {
        self.list_permissions_impl().await
    }

    async fn set_role_permissions(
        &self,
        role: RoleCode,
        permissions: &[String],
    ) -> Result<Option<Role>> {
        self.set_role_permissions_impl(role, permissions).await
    }

    async fn create_password_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<()> {
        self.create_password_reset_token_impl(user_id, token, expires_at).await
    }

    async fn consume_password_reset_token(&self, token: &str, now: i64) -> Result<Option<i64>> {
        self.consume_password_reset_token_impl(token, now).await
    }

    async fn create_faculty(&self, req: CreateFacultyRequest) -> Result<Faculty> {
        self.create_faculty_impl(req).await
    }

    async fn get_faculty_by_id(&self, id: i64) -> Result<Option<Faculty>> {
        self.get_faculty_by_id_impl(id).await
    }

    async fn list_faculties_with_pagination(
        &self,
        query: FacultyListQuery,
    ) -> Result<PaginatedResponse<Faculty>> {
        self.list_faculties_with_pagination_impl(query).await
    }

    async fn update_faculty(
        &self,
        id: i64,
        update: UpdateFacultyRequest,
    ) -> Result<Option<Faculty>> {
        self.update_faculty_impl(id, update).await
    }

    async fn delete_faculty(&self, id: i64) -> Result<bool> {
        self.delete_faculty_impl(id).await
    }

    async fn create_career(&self, req: CreateCareerRequest) -> Result<Career> {
        self.create_career_impl(req).await
    }

    async fn get_career_by_id(&self, id: i64) -> Result<Option<Career>> {
        self.get_career_by_id_impl(id).await
    }

    async fn find_career(&self, code_or_name: &str) -> Result<Option<Career>> {
        self.find_career_impl(code_or_name).await
    }

    async fn list_careers_with_pagination(
        &self,
        query: CareerListQuery,
    ) -> Result<PaginatedResponse<Career>> {
        self.list_careers_with_pagination_impl(query).await
    }

    async fn update_career(&self, id: i64, update: UpdateCareerRequest) -> Result<Option<Career>> {
        self.update_career_impl(id, update).await
    }

    async fn delete_career(&self, id: i64) -> Result<bool> {
        self.delete_career_impl(id).await
    }

    async fn create_period(&self, req: CreatePeriodRequest) -> Result<AcademicPeriod> {
        self.create_period_impl(req).await
    }

    async fn get_period_by_id(&self, id: i64) -> Result<Option<AcademicPeriod>> {
        self.get_period_by_id_impl(id).await
    }

    async fn get_active_period(&self) -> Result<Option<AcademicPeriod>> {
        self.get_active_period_impl().await
    }

    async fn list_periods_with_pagination(
        &self,
        query: PeriodListQuery,
    ) -> Result<PaginatedResponse<AcademicPeriod>> {
        self.list_periods_with_pagination_impl(query).await
    }

    async fn update_period(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
    ) -> Result<Option<AcademicPeriod>> {
        self.update_period_impl(id, update).await
    }

    async fn delete_period(&self, id: i64) -> Result<bool> {
        self.delete_period_impl(id).await
    }

    async fn activate_period(&self, id: i64) -> Result<Option<AcademicPeriod>> {
        self.activate_period_impl(id).await
    }

    async fn clone_period_subjects(&self, source: i64, target: i64) -> Result<PeriodCloneResult> {
        self.clone_period_subjects_impl(source, target).await
    }

    async fn create_subject(
        &self,
        subject: NewSubject,
        plan: &[PlanEntryInput],
    ) -> Result<Subject> {
        self.create_subject_impl(subject, plan).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_by_code(&self, code: &str, period_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code, period_id).await
    }

    async fn get_subject_detail(&self, id: i64) -> Result<Option<SubjectDetail>> {
        self.get_subject_detail_impl(id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<Subject>> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn set_subject_careers(&self, id: i64, entries: &[PlanEntryInput]) -> Result<()> {
        self.set_subject_careers_impl(id, entries).await
    }

    async fn link_subject_career(&self, subject_id: i64, entry: &PlanEntryInput) -> Result<bool> {
        self.link_subject_career_impl(subject_id, entry).await
    }

    async fn subject_faculty_ids(&self, subject_id: i64) -> Result<Vec<i64>> {
        self.subject_faculty_ids_impl(subject_id).await
    }

    async fn list_prerequisite_edges(&self, period_id: i64) -> Result<Vec<(i64, i64)>> {
        self.list_prerequisite_edges_impl(period_id).await
    }

    async fn set_subject_prerequisites(&self, id: i64, prerequisite_ids: &[i64]) -> Result<()> {
        self.set_subject_prerequisites_impl(id, prerequisite_ids).await
    }

    async fn list_subject_teachers(&self, subject_id: i64) -> Result<Vec<User>> {
        self.list_subject_teachers_impl(subject_id).await
    }

    async fn assign_teacher(&self, subject_id: i64, teacher_id: i64) -> Result<bool> {
        self.assign_teacher_impl(subject_id, teacher_id).await
    }

    async fn unassign_teacher(&self, subject_id: i64, teacher_id: i64) -> Result<bool> {
        self.unassign_teacher_impl(subject_id, teacher_id).await
    }

    async fn visible_subject_ids(&self, scope: AccessScope) -> Result<Option<Vec<i64>>> {
        self.visible_subject_ids_impl(scope).await
    }

    async fn subject_in_scope(&self, scope: AccessScope, subject_id: i64) -> Result<bool> {
        self.subject_in_scope_impl(scope, subject_id).await
    }

    async fn create_enrollment(
        &self,
        student_id: i64,
        subject_id: i64,
        period_id: i64,
        schedule: &str,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, subject_id, period_id, schedule).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn find_enrollment(
        &self,
        student_id: i64,
        subject_id: i64,
        period_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.find_enrollment_impl(student_id, subject_id, period_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<EnrollmentDetail>> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn withdraw_enrollment(&self, id: i64) -> Result<Option<Enrollment>> {
        self.withdraw_enrollment_impl(id).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn list_available_subjects(
        &self,
        student_id: i64,
        career_id: i64,
        period_id: i64,
    ) -> Result<Vec<Subject>> {
        self.list_available_subjects_impl(student_id, career_id, period_id).await
    }

    async fn is_student_enrolled(&self, student_id: i64, subject_id: i64) -> Result<bool> {
        self.is_student_enrolled_impl(student_id, subject_id).await
    }

    async fn list_subject_students(&self, subject_id: i64) -> Result<Vec<User>> {
        self.list_subject_students_impl(subject_id).await
    }

    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, changes).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn set_assignment_status(
        &self,
        id: i64,
        status: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        self.set_assignment_status_impl(id, status).await
    }

    async fn subject_weight_total(&self, subject_id: i64, exclude: Option<i64>) -> Result<Decimal> {
        self.subject_weight_total_impl(subject_id, exclude).await
    }

    async fn assignment_title_exists(
        &self,
        subject_id: i64,
        title: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        self.assignment_title_exists_impl(subject_id, title, exclude).await
    }

    async fn schedule_reminders(
        &self,
        assignment_id: i64,
        plan: &[(ReminderKind, DateTime<Utc>)],
    ) -> Result<usize> {
        self.schedule_reminders_impl(assignment_id, plan).await
    }

    async fn claim_due_reminders(&self, now: i64, limit: u64) -> Result<Vec<DueReminder>> {
        self.claim_due_reminders_impl(now, limit).await
    }

    async fn get_reminder(&self, id: i64) -> Result<Option<DueReminder>> {
        self.get_reminder_impl(id).await
    }

    async fn mark_reminder_sent(&self, id: i64, now: i64) -> Result<bool> {
        self.mark_reminder_sent_impl(id, now).await
    }

    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        attachment_url: Option<String>,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment_id, student_id, content, attachment_url).await
    }

    async fn get_submission_view(&self, id: i64) -> Result<Option<SubmissionView>> {
        self.get_submission_view_impl(id).await
    }

    async fn find_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.find_submission_impl(assignment_id, student_id).await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<SubmissionView>> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn list_submission_views(
        &self,
        visible_ids: Option<Vec<i64>>,
        subject_id: Option<i64>,
        assignment_id: Option<i64>,
    ) -> Result<Vec<SubmissionView>> {
        self.list_submission_views_impl(visible_ids, subject_id, assignment_id).await
    }

    async fn grade_submission(
        &self,
        id: i64,
        grade: Decimal,
        feedback: Option<String>,
        grader_id: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, grade, feedback, grader_id).await
    }

    async fn list_grade_items(&self, subject_id: i64, student_id: i64) -> Result<Vec<GradeItem>> {
        self.list_grade_items_impl(subject_id, student_id).await
    }

    async fn fetch_report_rows(
        &self,
        window: MonthWindow,
    ) -> Result<(Vec<ReportRow>, Vec<TeacherLink>)> {
        self.fetch_report_rows_impl(window).await
    }

    async fn get_monthly_report(&self, year: i32, month: u32) -> Result<Option<MonthlyReport>> {
        self.get_monthly_report_impl(year, month).await
    }

    async fn save_monthly_report(&self, data: &MonthlyReportData) -> Result<MonthlyReport> {
        self.save_monthly_report_impl(data).await
    }

    async fn mark_report_sent(&self, id: i64, now: i64) -> Result<bool> {
        self.mark_report_sent_impl(id, now).await
    }

    async fn list_monthly_reports(&self, year: Option<i32>) -> Result<Vec<MonthlyReportSummary>> {
        self.list_monthly_reports_impl(year).await
    }
}

/// 写操作的错误转换：唯一约束冲突映射为 409
pub(crate) fn write_err(context: &'static str) -> impl Fn(DbErr) -> AcademiaError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AcademiaError::conflict(format!("{context}: 记录已存在"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AcademiaError::conflict(format!("{context}: 存在关联数据"))
        }
        _ => AcademiaError::database_operation(format!("{context}: {e}")),
    }
}

/// 读操作的错误转换
pub(crate) fn read_err(context: &'static str) -> impl Fn(DbErr) -> AcademiaError {
    move |e| AcademiaError::database_operation(format!("{context}: {e}"))
}

/// 规范化分页参数，返回 (page, size)
pub(crate) fn page_params(page: i64, size: i64) -> (u64, u64) {
    (page.max(1) as u64, size.clamp(1, 100) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::reminders::plan_reminders;
    use crate::models::careers::entities::{CareerLevel, CareerModality};
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::grades::entities::GradeSummary;
    use chrono::NaiveDate;
    use rust_decimal::dec;

    /// 内存 SQLite，只保留一个连接，否则每个连接各是一个空库
    async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmStorage { db }
    }

    struct Campus {
        student: i64,
        teacher: i64,
        faculty: i64,
        period: i64,
        subject: i64,
    }

    fn new_user(username: &str, career_id: Option<i64>, role: RoleCode) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@uni.edu"),
            password_hash: "hash".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Rojas".to_string(),
            document_number: None,
            faculty_id: None,
            career_id,
            roles: vec![role],
        }
    }

    /// 院系 FCT、专业 ING-SIS、学期 2025-I、课程 ALG101，以及一名学生和一名教师
    async fn seed(storage: &SeaOrmStorage) -> Campus {
        let faculty = storage
            .create_faculty(CreateFacultyRequest {
                name: "Ciencias y Tecnologia".to_string(),
                code: "FCT".to_string(),
                description: None,
                coordinator_id: None,
            })
            .await
            .unwrap();
        let career = storage
            .create_career(CreateCareerRequest {
                name: "Ingenieria de Sistemas".to_string(),
                code: "ING-SIS".to_string(),
                description: None,
                level: CareerLevel::Undergraduate,
                modality: CareerModality::InPerson,
                faculty_id: faculty.id,
            })
            .await
            .unwrap();
        let period = storage
            .create_period(CreatePeriodRequest {
                name: "2025-I".to_string(),
                description: None,
                start_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
                is_active: true,
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject(
                NewSubject {
                    name: "Algebra I".to_string(),
                    code: "ALG101".to_string(),
                    description: None,
                    credits: 4,
                    period_id: period.id,
                },
                &[PlanEntryInput {
                    career_id: career.id,
                    semester: 1,
                    is_mandatory: true,
                    credits_override: None,
                }],
            )
            .await
            .unwrap();
        let student = storage
            .create_user(new_user("ana", Some(career.id), RoleCode::Student))
            .await
            .unwrap();
        let teacher = storage
            .create_user(new_user("prof", None, RoleCode::Teacher))
            .await
            .unwrap();

        Campus {
            student: student.id,
            teacher: teacher.id,
            faculty: faculty.id,
            period: period.id,
            subject: subject.id,
        }
    }

    fn new_assignment(c: &Campus, title: &str, weight: Decimal) -> NewAssignment {
        let now = Utc::now();
        NewAssignment {
            subject_id: c.subject,
            title: title.to_string(),
            description: None,
            kind: "exam".to_string(),
            weight,
            publish_at: now,
            due_at: now + chrono::Duration::days(7),
            allow_late_submission: false,
            created_by: c.teacher,
        }
    }

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("academia.db").unwrap(),
            "sqlite://academia.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            SeaOrmStorage::redact_url("postgres://user:secret@db:5432/app"),
            "postgres://***@db:5432/app"
        );
        assert_eq!(
            SeaOrmStorage::redact_url("sqlite://academia.db?mode=rwc"),
            "sqlite://academia.db?mode=rwc"
        );
    }

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(0, 0), (1, 1));
        assert_eq!(page_params(3, 500), (3, 100));
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let storage = memory_storage().await;
        let c = seed(&storage).await;

        storage
            .create_enrollment(c.student, c.subject, c.period, "Lu-Mi 08:00")
            .await
            .unwrap();
        let err = storage
            .create_enrollment(c.student, c.subject, c.period, "Ma-Ju 10:00")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");
        assert_eq!(
            actix_web::ResponseError::status_code(&err),
            actix_web::http::StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_withdraw_then_reenroll() {
        let storage = memory_storage().await;
        let c = seed(&storage).await;
        let enrollment = storage
            .create_enrollment(c.student, c.subject, c.period, "Lu-Mi 08:00")
            .await
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);

        let withdrawn = storage
            .withdraw_enrollment(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(withdrawn.status, EnrollmentStatus::Withdrawn);
        assert!(!storage.is_student_enrolled(c.student, c.subject).await.unwrap());
        assert_eq!(
            storage
                .visible_subject_ids(AccessScope::Enrolled(c.student))
                .await
                .unwrap(),
            Some(vec![])
        );
        assert!(storage.withdraw_enrollment(9999).await.unwrap().is_none());

        // 同一条记录重新激活
        let again = storage
            .create_enrollment(c.student, c.subject, c.period, "Ma-Ju 10:00")
            .await
            .unwrap();
        assert_eq!(again.id, enrollment.id);
        assert_eq!(again.status, EnrollmentStatus::Active);
        assert_eq!(again.schedule, "Ma-Ju 10:00");
        assert!(storage.is_student_enrolled(c.student, c.subject).await.unwrap());
    }

    #[tokio::test]
    async fn test_faculty_scope_without_faculty_sees_nothing() {
        let storage = memory_storage().await;
        let c = seed(&storage).await;

        assert_eq!(
            storage
                .visible_subject_ids(AccessScope::Faculty(None))
                .await
                .unwrap(),
            Some(vec![])
        );
        assert_eq!(
            storage
                .visible_subject_ids(AccessScope::Faculty(Some(c.faculty)))
                .await
                .unwrap(),
            Some(vec![c.subject])
        );

        let query = |scope_faculty| CareerListQuery {
            page: 1,
            size: 20,
            faculty_id: None,
            scope_faculty,
            level: None,
            search: None,
        };
        let page = storage
            .list_careers_with_pagination(query(Some(None)))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 0);
        let page = storage
            .list_careers_with_pagination(query(Some(Some(c.faculty))))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_find_career_ignores_case() {
        let storage = memory_storage().await;
        seed(&storage).await;

        let by_code = storage.find_career(" ing-sis ").await.unwrap().unwrap();
        assert_eq!(by_code.code, "ING-SIS");
        let by_name = storage
            .find_career("INGENIERIA DE SISTEMAS")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, by_code.id);
        assert!(storage.find_career("MED").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_weights_keep_decimals_and_titles_unique() {
        let storage = memory_storage().await;
        let c = seed(&storage).await;

        let first = storage
            .create_assignment(new_assignment(&c, "Parcial 1", dec!(40)))
            .await
            .unwrap();
        storage
            .create_assignment(new_assignment(&c, "Proyecto final", dec!(60.5)))
            .await
            .unwrap();

        assert_eq!(
            storage.subject_weight_total(c.subject, None).await.unwrap(),
            dec!(100.5)
        );
        assert_eq!(
            storage
                .subject_weight_total(c.subject, Some(first.id))
                .await
                .unwrap(),
            dec!(60.5)
        );

        assert!(
            storage
                .assignment_title_exists(c.subject, "  PARCIAL 1 ", None)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .assignment_title_exists(c.subject, "parcial 1", Some(first.id))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_weighted_grade_from_published_assignments() {
        let storage = memory_storage().await;
        let c = seed(&storage).await;
        storage
            .create_enrollment(c.student, c.subject, c.period, "Lu-Mi 08:00")
            .await
            .unwrap();

        let plan = [
            ("Parcial 1", dec!(40), dec!(80)),
            ("Parcial 2", dec!(60), dec!(70)),
        ];
        for (title, weight, grade) in plan {
            let assignment = storage
                .create_assignment(new_assignment(&c, title, weight))
                .await
                .unwrap();
            storage
                .set_assignment_status(assignment.id, AssignmentStatus::Published)
                .await
                .unwrap();
            let submission = storage
                .upsert_submission(assignment.id, c.student, Some("respuesta".to_string()), None)
                .await
                .unwrap();
            storage
                .grade_submission(submission.id, grade, None, c.teacher)
                .await
                .unwrap();
        }
        // 草稿不计入成绩
        storage
            .create_assignment(new_assignment(&c, "Borrador extra", dec!(10)))
            .await
            .unwrap();

        let items = storage.list_grade_items(c.subject, c.student).await.unwrap();
        assert_eq!(items.len(), 2);
        let summary = GradeSummary::compute(c.student, c.subject, items, dec!(60));
        assert_eq!(summary.current_grade, dec!(74));
        assert_eq!(summary.remaining_weight, Decimal::ZERO);
        assert!(summary.attainable);
    }

    #[tokio::test]
    async fn test_reschedule_keeps_sent_reminders() {
        let storage = memory_storage().await;
        let c = seed(&storage).await;
        let assignment = storage
            .create_assignment(new_assignment(&c, "Parcial 1", dec!(40)))
            .await
            .unwrap();

        let now = Utc::now();
        let plan = plan_reminders(assignment.due_at, now);
        assert_eq!(plan.len(), 3);
        assert_eq!(storage.schedule_reminders(assignment.id, &plan).await.unwrap(), 3);
        // 重新安排不会重复
        assert_eq!(storage.schedule_reminders(assignment.id, &plan).await.unwrap(), 3);

        let due = storage
            .claim_due_reminders(assignment.due_at.timestamp(), 10)
            .await
            .unwrap();
        assert_eq!(due.len(), 3);
        assert_eq!(due[0].kind, ReminderKind::D3Student);
        assert!(storage.mark_reminder_sent(due[0].id, now.timestamp()).await.unwrap());
        assert!(!storage.mark_reminder_sent(due[0].id, now.timestamp()).await.unwrap());

        assert_eq!(storage.schedule_reminders(assignment.id, &plan).await.unwrap(), 2);
    }
}
