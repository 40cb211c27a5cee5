use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 自增主键列
fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Users::DocumentNumber)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::FacultyId).big_integer().null())
                    .col(ColumnDef::new(Users::CareerId).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 角色表
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(pk(Roles::Id))
                    .col(ColumnDef::new(Roles::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Roles::Name).string().not_null())
                    .col(ColumnDef::new(Roles::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // 权限表
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(pk(Permissions::Id))
                    .col(
                        ColumnDef::new(Permissions::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Permissions::Name).string().not_null())
                    .col(ColumnDef::new(Permissions::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // 角色-权限关联表
        manager
            .create_table(
                Table::create()
                    .table(RolePermissions::Table)
                    .if_not_exists()
                    .col(pk(RolePermissions::Id))
                    .col(
                        ColumnDef::new(RolePermissions::RoleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RolePermissions::PermissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RolePermissions::Table, RolePermissions::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RolePermissions::Table, RolePermissions::PermissionId)
                            .to(Permissions::Table, Permissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户-角色关联表
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(pk(UserRoles::Id))
                    .col(ColumnDef::new(UserRoles::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserRoles::RoleId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserRoles::Table, UserRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 院系表
        manager
            .create_table(
                Table::create()
                    .table(Faculties::Table)
                    .if_not_exists()
                    .col(pk(Faculties::Id))
                    .col(
                        ColumnDef::new(Faculties::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Faculties::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Faculties::Description).text().null())
                    .col(ColumnDef::new(Faculties::CoordinatorId).big_integer().null())
                    .col(ColumnDef::new(Faculties::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Faculties::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Faculties::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Faculties::Table, Faculties::CoordinatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 专业表
        manager
            .create_table(
                Table::create()
                    .table(Careers::Table)
                    .if_not_exists()
                    .col(pk(Careers::Id))
                    .col(ColumnDef::new(Careers::Name).string().not_null())
                    .col(ColumnDef::new(Careers::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Careers::Description).text().null())
                    .col(ColumnDef::new(Careers::Level).string().not_null())
                    .col(ColumnDef::new(Careers::Modality).string().not_null())
                    .col(ColumnDef::new(Careers::FacultyId).big_integer().not_null())
                    .col(ColumnDef::new(Careers::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Careers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Careers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Careers::Table, Careers::FacultyId)
                            .to(Faculties::Table, Faculties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学期表
        manager
            .create_table(
                Table::create()
                    .table(AcademicPeriods::Table)
                    .if_not_exists()
                    .col(pk(AcademicPeriods::Id))
                    .col(
                        ColumnDef::new(AcademicPeriods::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AcademicPeriods::Description).text().null())
                    .col(ColumnDef::new(AcademicPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(AcademicPeriods::EndDate).date().not_null())
                    .col(ColumnDef::new(AcademicPeriods::IsActive).boolean().not_null())
                    .col(
                        ColumnDef::new(AcademicPeriods::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicPeriods::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(pk(Subjects::Id))
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(ColumnDef::new(Subjects::Credits).integer().not_null())
                    .col(ColumnDef::new(Subjects::PeriodId).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::PeriodId)
                            .to(AcademicPeriods::Table, AcademicPeriods::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 培养计划（专业-课程）
        manager
            .create_table(
                Table::create()
                    .table(CareerSubjects::Table)
                    .if_not_exists()
                    .col(pk(CareerSubjects::Id))
                    .col(
                        ColumnDef::new(CareerSubjects::CareerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareerSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CareerSubjects::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(CareerSubjects::IsMandatory)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareerSubjects::CreditsOverride)
                            .integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CareerSubjects::Table, CareerSubjects::CareerId)
                            .to(Careers::Table, Careers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CareerSubjects::Table, CareerSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 先修课程
        manager
            .create_table(
                Table::create()
                    .table(SubjectPrerequisites::Table)
                    .if_not_exists()
                    .col(pk(SubjectPrerequisites::Id))
                    .col(
                        ColumnDef::new(SubjectPrerequisites::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectPrerequisites::PrerequisiteId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubjectPrerequisites::Table, SubjectPrerequisites::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                SubjectPrerequisites::Table,
                                SubjectPrerequisites::PrerequisiteId,
                            )
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师-课程分配
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(pk(TeacherSubjects::Id))
                    .col(
                        ColumnDef::new(TeacherSubjects::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 选课表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(pk(Enrollments::Id))
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::PeriodId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::Schedule).string().not_null())
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::PeriodId)
                            .to(AcademicPeriods::Table, AcademicPeriods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(pk(Assignments::Id))
                    .col(ColumnDef::new(Assignments::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::Weight)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::PublishAt).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::DueAt).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::AllowLateSubmission)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Assignments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(pk(Submissions::Id))
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::AttachmentUrl).string().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Grade).decimal_len(5, 2).null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 截止提醒
        manager
            .create_table(
                Table::create()
                    .table(DueReminders::Table)
                    .if_not_exists()
                    .col(pk(DueReminders::Id))
                    .col(
                        ColumnDef::new(DueReminders::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DueReminders::Kind).string().not_null())
                    .col(
                        ColumnDef::new(DueReminders::ScheduledFor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DueReminders::SentAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(DueReminders::Table, DueReminders::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 月度报告
        manager
            .create_table(
                Table::create()
                    .table(MonthlyReports::Table)
                    .if_not_exists()
                    .col(pk(MonthlyReports::Id))
                    .col(ColumnDef::new(MonthlyReports::Year).integer().not_null())
                    .col(ColumnDef::new(MonthlyReports::Month).integer().not_null())
                    .col(ColumnDef::new(MonthlyReports::Data).json().not_null())
                    .col(
                        ColumnDef::new(MonthlyReports::GeneratedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyReports::SentAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // 密码重置令牌
        manager
            .create_table(
                Table::create()
                    .table(PasswordResetTokens::Table)
                    .if_not_exists()
                    .col(pk(PasswordResetTokens::Id))
                    .col(
                        ColumnDef::new(PasswordResetTokens::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetTokens::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PasswordResetTokens::UsedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PasswordResetTokens::Table, PasswordResetTokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束（复合）
        let unique_indexes = [
            Index::create()
                .if_not_exists()
                .name("uq_role_permissions_pair")
                .table(RolePermissions::Table)
                .col(RolePermissions::RoleId)
                .col(RolePermissions::PermissionId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_user_roles_pair")
                .table(UserRoles::Table)
                .col(UserRoles::UserId)
                .col(UserRoles::RoleId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_subjects_code_period")
                .table(Subjects::Table)
                .col(Subjects::Code)
                .col(Subjects::PeriodId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_career_subjects_pair")
                .table(CareerSubjects::Table)
                .col(CareerSubjects::CareerId)
                .col(CareerSubjects::SubjectId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_subject_prerequisites_pair")
                .table(SubjectPrerequisites::Table)
                .col(SubjectPrerequisites::SubjectId)
                .col(SubjectPrerequisites::PrerequisiteId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_teacher_subjects_pair")
                .table(TeacherSubjects::Table)
                .col(TeacherSubjects::TeacherId)
                .col(TeacherSubjects::SubjectId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_enrollments_triple")
                .table(Enrollments::Table)
                .col(Enrollments::StudentId)
                .col(Enrollments::SubjectId)
                .col(Enrollments::PeriodId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_submissions_pair")
                .table(Submissions::Table)
                .col(Submissions::AssignmentId)
                .col(Submissions::StudentId)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_due_reminders_kind")
                .table(DueReminders::Table)
                .col(DueReminders::AssignmentId)
                .col(DueReminders::Kind)
                .unique()
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("uq_monthly_reports_month")
                .table(MonthlyReports::Table)
                .col(MonthlyReports::Year)
                .col(MonthlyReports::Month)
                .unique()
                .to_owned(),
        ];
        for index in unique_indexes {
            manager.create_index(index).await?;
        }

        // 查询索引
        let lookup_indexes = [
            Index::create()
                .if_not_exists()
                .name("idx_careers_faculty_id")
                .table(Careers::Table)
                .col(Careers::FacultyId)
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("idx_subjects_period_id")
                .table(Subjects::Table)
                .col(Subjects::PeriodId)
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("idx_assignments_subject_id")
                .table(Assignments::Table)
                .col(Assignments::SubjectId)
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("idx_assignments_due_at")
                .table(Assignments::Table)
                .col(Assignments::DueAt)
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("idx_due_reminders_pending")
                .table(DueReminders::Table)
                .col(DueReminders::SentAt)
                .col(DueReminders::ScheduledFor)
                .to_owned(),
        ];
        for index in lookup_indexes {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按依赖倒序删除
        manager
            .drop_table(Table::drop().table(PasswordResetTokens::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyReports::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DueReminders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectPrerequisites::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CareerSubjects::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicPeriods::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Careers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faculties::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermissions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    DocumentNumber,
    Status,
    FacultyId,
    CareerId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Roles {
    #[sea_orm(iden = "roles")]
    Table,
    Id,
    Code,
    Name,
    Description,
}

#[derive(DeriveIden)]
pub(crate) enum Permissions {
    #[sea_orm(iden = "permissions")]
    Table,
    Id,
    Code,
    Name,
    Description,
}

#[derive(DeriveIden)]
pub(crate) enum RolePermissions {
    #[sea_orm(iden = "role_permissions")]
    Table,
    Id,
    RoleId,
    PermissionId,
}

#[derive(DeriveIden)]
enum UserRoles {
    #[sea_orm(iden = "user_roles")]
    Table,
    Id,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum Faculties {
    #[sea_orm(iden = "faculties")]
    Table,
    Id,
    Name,
    Code,
    Description,
    CoordinatorId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Careers {
    #[sea_orm(iden = "careers")]
    Table,
    Id,
    Name,
    Code,
    Description,
    Level,
    Modality,
    FacultyId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AcademicPeriods {
    #[sea_orm(iden = "academic_periods")]
    Table,
    Id,
    Name,
    Description,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Code,
    Description,
    Credits,
    PeriodId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CareerSubjects {
    #[sea_orm(iden = "career_subjects")]
    Table,
    Id,
    CareerId,
    SubjectId,
    Semester,
    IsMandatory,
    CreditsOverride,
}

#[derive(DeriveIden)]
enum SubjectPrerequisites {
    #[sea_orm(iden = "subject_prerequisites")]
    Table,
    Id,
    SubjectId,
    PrerequisiteId,
}

#[derive(DeriveIden)]
enum TeacherSubjects {
    #[sea_orm(iden = "teacher_subjects")]
    Table,
    Id,
    TeacherId,
    SubjectId,
    AssignedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    SubjectId,
    PeriodId,
    Schedule,
    Status,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    SubjectId,
    Title,
    Description,
    Kind,
    Weight,
    PublishAt,
    DueAt,
    Status,
    AllowLateSubmission,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    AttachmentUrl,
    SubmittedAt,
    Grade,
    Feedback,
    GradedBy,
    GradedAt,
}

#[derive(DeriveIden)]
enum DueReminders {
    #[sea_orm(iden = "due_reminders")]
    Table,
    Id,
    AssignmentId,
    Kind,
    ScheduledFor,
    SentAt,
}

#[derive(DeriveIden)]
enum MonthlyReports {
    #[sea_orm(iden = "monthly_reports")]
    Table,
    Id,
    Year,
    Month,
    Data,
    GeneratedAt,
    SentAt,
}

#[derive(DeriveIden)]
enum PasswordResetTokens {
    #[sea_orm(iden = "password_reset_tokens")]
    Table,
    Id,
    UserId,
    Token,
    ExpiresAt,
    UsedAt,
}
