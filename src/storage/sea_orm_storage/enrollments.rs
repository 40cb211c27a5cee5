//! 选课存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::career_subjects::{Column as PlanColumn, Entity as CareerSubjects};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments, Model};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    enrollments::{
        entities::{Enrollment, EnrollmentDetail, EnrollmentStatus},
        requests::EnrollmentListQuery,
    },
    subjects::entities::Subject,
    users::entities::User,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 批量填充课程与学生信息
    async fn enrollment_details(&self, models: Vec<Model>) -> Result<Vec<EnrollmentDetail>> {
        let subject_ids: Vec<i64> = models.iter().map(|m| m.subject_id).collect();
        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();

        let subjects = Self::subjects_by_ids(&self.db, subject_ids).await?;
        let students: HashMap<i64, crate::entity::users::Model> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(read_err("查询学生失败"))?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|m| {
                let (subject_code, subject_name) = subjects
                    .get(&m.subject_id)
                    .map(|s| (s.code.clone(), s.name.clone()))
                    .unwrap_or_default();
                let (student_name, student_username) = students
                    .get(&m.student_id)
                    .map(|u| (u.full_name(), u.username.clone()))
                    .unwrap_or_default();
                EnrollmentDetail {
                    enrollment: m.into_enrollment(),
                    subject_code,
                    subject_name,
                    student_name,
                    student_username,
                }
            })
            .collect())
    }

    pub async fn create_enrollment_impl(
        &self,
        student_id: i64,
        subject_id: i64,
        period_id: i64,
        schedule: &str,
    ) -> Result<Enrollment> {
        // 已退选的记录重新激活
        let withdrawn = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::PeriodId.eq(period_id))
            .filter(Column::Status.eq(EnrollmentStatus::Withdrawn.to_string()))
            .one(&self.db)
            .await
            .map_err(read_err("查询选课失败"))?;
        if let Some(existing) = withdrawn {
            let mut model: ActiveModel = existing.into();
            model.schedule = Set(schedule.trim().to_string());
            model.status = Set(EnrollmentStatus::Active.to_string());
            model.enrolled_at = Set(chrono::Utc::now().timestamp());
            let result = model
                .update(&self.db)
                .await
                .map_err(write_err("重新选课失败"))?;
            return Ok(result.into_enrollment());
        }

        let model = ActiveModel {
            student_id: Set(student_id),
            subject_id: Set(subject_id),
            period_id: Set(period_id),
            schedule: Set(schedule.trim().to_string()),
            status: Set(EnrollmentStatus::Active.to_string()),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        // 唯一约束 (student, subject, period) 冲突时返回 409
        let result = model
            .insert(&self.db)
            .await
            .map_err(write_err("选课失败"))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        let Some(model) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询选课失败"))?
        else {
            return Ok(None);
        };

        Ok(self.enrollment_details(vec![model]).await?.pop())
    }

    pub async fn find_enrollment_impl(
        &self,
        student_id: i64,
        subject_id: i64,
        period_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::PeriodId.eq(period_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询选课失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<PaginatedResponse<EnrollmentDetail>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Enrollments::find();
        if let Some(ids) = query.visible_ids {
            select = select.filter(Column::SubjectId.is_in(ids));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(period_id) = query.period_id {
            select = select.filter(Column::PeriodId.eq(period_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::EnrolledAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询选课总数失败"))?;

        let enrollments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询选课列表失败"))?;

        Ok(PaginatedResponse {
            items: self.enrollment_details(enrollments).await?,
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 退选：保留记录，状态改为 withdrawn
    pub async fn withdraw_enrollment_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let Some(existing) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询选课失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(EnrollmentStatus::Withdrawn.to_string());
        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("退选失败"))?;

        Ok(Some(result.into_enrollment()))
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除选课失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生所在专业、指定学期内尚未选（或已退选）的启用课程
    pub async fn list_available_subjects_impl(
        &self,
        student_id: i64,
        career_id: i64,
        period_id: i64,
    ) -> Result<Vec<Subject>> {
        let plan_ids = CareerSubjects::find()
            .select_only()
            .column(PlanColumn::SubjectId)
            .filter(PlanColumn::CareerId.eq(career_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询培养方案失败"))?;

        if plan_ids.is_empty() {
            return Ok(Vec::new());
        }

        let enrolled = Enrollments::find()
            .select_only()
            .column(Column::SubjectId)
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::PeriodId.eq(period_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询已选课程失败"))?;

        let subjects = Subjects::find()
            .filter(SubjectColumn::Id.is_in(plan_ids))
            .filter(SubjectColumn::Id.is_not_in(enrolled))
            .filter(SubjectColumn::PeriodId.eq(period_id))
            .filter(SubjectColumn::IsActive.eq(true))
            .order_by_asc(SubjectColumn::Code)
            .all(&self.db)
            .await
            .map_err(read_err("查询可选课程失败"))?;

        Ok(subjects.into_iter().map(|s| s.into_subject()).collect())
    }

    pub async fn is_student_enrolled_impl(&self, student_id: i64, subject_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(read_err("查询选课失败"))?;

        Ok(count > 0)
    }

    /// 课程的在读学生
    pub async fn list_subject_students_impl(&self, subject_id: i64) -> Result<Vec<User>> {
        let student_ids = Enrollments::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询课程学生失败"))?;

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .order_by_asc(UserColumn::LastName)
            .order_by_asc(UserColumn::FirstName)
            .all(&self.db)
            .await
            .map_err(read_err("查询学生失败"))?;

        Self::hydrate_users(&self.db, users).await
    }
}
