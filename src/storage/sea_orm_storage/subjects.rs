//! 课程存储操作：培养方案、先修课、任课关系和可见范围

use std::collections::{BTreeSet, HashMap};

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::career_subjects::{
    ActiveModel as PlanActiveModel, Column as PlanColumn, Entity as CareerSubjects,
};
use crate::entity::careers::{Column as CareerColumn, Entity as Careers};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::subject_prerequisites::{
    ActiveModel as PrerequisiteActiveModel, Column as PrerequisiteColumn,
    Entity as SubjectPrerequisites,
};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::entity::teacher_subjects::{
    ActiveModel as TeachingActiveModel, Column as TeachingColumn, Entity as TeacherSubjects,
};
use crate::entity::users::Entity as Users;
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    access::AccessScope,
    enrollments::entities::EnrollmentStatus,
    subjects::{
        entities::{PlanEntry, Subject, SubjectDetail, SubjectTeacher},
        requests::{PlanEntryInput, SubjectListQuery, UpdateSubjectRequest},
    },
    users::entities::User,
};
use crate::storage::NewSubject;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入培养方案条目（先删除旧的）
    async fn replace_plan<C: ConnectionTrait>(
        db: &C,
        subject_id: i64,
        entries: &[PlanEntryInput],
    ) -> Result<()> {
        CareerSubjects::delete_many()
            .filter(PlanColumn::SubjectId.eq(subject_id))
            .exec(db)
            .await
            .map_err(write_err("清除培养方案失败"))?;

        for entry in entries {
            PlanActiveModel {
                career_id: Set(entry.career_id),
                subject_id: Set(subject_id),
                semester: Set(entry.semester),
                is_mandatory: Set(entry.is_mandatory),
                credits_override: Set(entry.credits_override),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(write_err("写入培养方案失败"))?;
        }
        Ok(())
    }

    pub async fn create_subject_impl(
        &self,
        subject: NewSubject,
        plan: &[PlanEntryInput],
    ) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        let model = ActiveModel {
            name: Set(subject.name.trim().to_string()),
            code: Set(subject.code.trim().to_uppercase()),
            description: Set(subject.description),
            credits: Set(subject.credits),
            period_id: Set(subject.period_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(write_err("创建课程失败"))?;

        if !plan.is_empty() {
            Self::replace_plan(&txn, model.id, plan).await?;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(model.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_code_impl(
        &self,
        code: &str,
        period_id: i64,
    ) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::Code.eq(code.trim().to_uppercase()))
            .filter(Column::PeriodId.eq(period_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 课程详情：培养方案、先修课、任课教师
    pub async fn get_subject_detail_impl(&self, id: i64) -> Result<Option<SubjectDetail>> {
        let Some(subject) = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?
        else {
            return Ok(None);
        };

        let careers = CareerSubjects::find()
            .filter(PlanColumn::SubjectId.eq(id))
            .find_also_related(Careers)
            .all(&self.db)
            .await
            .map_err(read_err("查询培养方案失败"))?
            .into_iter()
            .filter_map(|(plan, career)| {
                let career = career?;
                Some(PlanEntry {
                    career_id: career.id,
                    career_code: career.code,
                    career_name: career.name,
                    faculty_id: career.faculty_id,
                    semester: plan.semester,
                    is_mandatory: plan.is_mandatory,
                    credits_override: plan.credits_override,
                })
            })
            .collect();

        let prerequisite_ids: Vec<i64> = SubjectPrerequisites::find()
            .filter(PrerequisiteColumn::SubjectId.eq(id))
            .all(&self.db)
            .await
            .map_err(read_err("查询先修课失败"))?
            .into_iter()
            .map(|p| p.prerequisite_id)
            .collect();

        let prerequisites = if prerequisite_ids.is_empty() {
            Vec::new()
        } else {
            Subjects::find()
                .filter(Column::Id.is_in(prerequisite_ids))
                .order_by_asc(Column::Code)
                .all(&self.db)
                .await
                .map_err(read_err("查询先修课失败"))?
                .iter()
                .map(|s| s.as_ref_entry())
                .collect()
        };

        let teachers = TeacherSubjects::find()
            .filter(TeachingColumn::SubjectId.eq(id))
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(read_err("查询任课教师失败"))?
            .into_iter()
            .filter_map(|(link, user)| {
                let user = user?;
                Some(SubjectTeacher {
                    teacher_id: user.id,
                    full_name: user.full_name(),
                    username: user.username,
                    email: user.email,
                    assigned_at: crate::entity::ts(link.assigned_at),
                })
            })
            .collect();

        Ok(Some(SubjectDetail {
            subject: subject.into_subject(),
            careers,
            prerequisites,
            teachers,
        }))
    }

    pub async fn list_subjects_with_pagination_impl(
        &self,
        query: SubjectListQuery,
    ) -> Result<PaginatedResponse<Subject>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Subjects::find();

        if let Some(ids) = query.visible_ids {
            select = select.filter(Column::Id.is_in(ids));
        }
        if let Some(period_id) = query.period_id {
            select = select.filter(Column::PeriodId.eq(period_id));
        }
        if let Some(career_id) = query.career_id {
            let subject_ids = CareerSubjects::find()
                .select_only()
                .column(PlanColumn::SubjectId)
                .filter(PlanColumn::CareerId.eq(career_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(read_err("查询培养方案失败"))?;
            select = select.filter(Column::Id.is_in(subject_ids));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Code.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询课程总数失败"))?;

        let subjects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询课程列表失败"))?;

        Ok(PaginatedResponse {
            items: subjects.into_iter().map(|m| m.into_subject()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let Some(existing) = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("更新课程失败"))?;

        Ok(Some(result.into_subject()))
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除课程失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn set_subject_careers_impl(
        &self,
        id: i64,
        entries: &[PlanEntryInput],
    ) -> Result<()> {
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;
        Self::replace_plan(&txn, id, entries).await?;
        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(())
    }

    /// 加入专业培养方案；已存在时更新学期等字段
    pub async fn link_subject_career_impl(
        &self,
        subject_id: i64,
        entry: &PlanEntryInput,
    ) -> Result<bool> {
        let existing = CareerSubjects::find()
            .filter(PlanColumn::SubjectId.eq(subject_id))
            .filter(PlanColumn::CareerId.eq(entry.career_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询培养方案失败"))?;

        match existing {
            Some(found) => {
                let mut model: PlanActiveModel = found.into();
                model.semester = Set(entry.semester);
                model.is_mandatory = Set(entry.is_mandatory);
                model.credits_override = Set(entry.credits_override);
                model
                    .update(&self.db)
                    .await
                    .map_err(write_err("更新培养方案失败"))?;
                Ok(false)
            }
            None => {
                PlanActiveModel {
                    career_id: Set(entry.career_id),
                    subject_id: Set(subject_id),
                    semester: Set(entry.semester),
                    is_mandatory: Set(entry.is_mandatory),
                    credits_override: Set(entry.credits_override),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(write_err("写入培养方案失败"))?;
                Ok(true)
            }
        }
    }

    pub async fn subject_faculty_ids_impl(&self, subject_id: i64) -> Result<Vec<i64>> {
        let faculties: BTreeSet<i64> = CareerSubjects::find()
            .filter(PlanColumn::SubjectId.eq(subject_id))
            .find_also_related(Careers)
            .all(&self.db)
            .await
            .map_err(read_err("查询课程院系失败"))?
            .into_iter()
            .filter_map(|(_, career)| career.map(|c| c.faculty_id))
            .collect();

        Ok(faculties.into_iter().collect())
    }

    /// 学期内所有 (课程, 先修课) 关联
    pub async fn list_prerequisite_edges_impl(&self, period_id: i64) -> Result<Vec<(i64, i64)>> {
        let subject_ids = Subjects::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::PeriodId.eq(period_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询学期课程失败"))?;

        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let edges = SubjectPrerequisites::find()
            .filter(PrerequisiteColumn::SubjectId.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询先修课失败"))?
            .into_iter()
            .map(|p| (p.subject_id, p.prerequisite_id))
            .collect();

        Ok(edges)
    }

    pub async fn set_subject_prerequisites_impl(
        &self,
        id: i64,
        prerequisite_ids: &[i64],
    ) -> Result<()> {
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        SubjectPrerequisites::delete_many()
            .filter(PrerequisiteColumn::SubjectId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_err("清除先修课失败"))?;

        let unique: BTreeSet<i64> = prerequisite_ids.iter().copied().collect();
        for prerequisite_id in unique {
            PrerequisiteActiveModel {
                subject_id: Set(id),
                prerequisite_id: Set(prerequisite_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(write_err("写入先修课失败"))?;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(())
    }

    pub async fn list_subject_teachers_impl(&self, subject_id: i64) -> Result<Vec<User>> {
        let models = TeacherSubjects::find()
            .filter(TeachingColumn::SubjectId.eq(subject_id))
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(read_err("查询任课教师失败"))?
            .into_iter()
            .filter_map(|(_, user)| user)
            .collect();

        Self::hydrate_users(&self.db, models).await
    }

    /// 分配教师，已分配时返回 false
    pub async fn assign_teacher_impl(&self, subject_id: i64, teacher_id: i64) -> Result<bool> {
        let existing = TeacherSubjects::find()
            .filter(TeachingColumn::SubjectId.eq(subject_id))
            .filter(TeachingColumn::TeacherId.eq(teacher_id))
            .count(&self.db)
            .await
            .map_err(read_err("查询任课关系失败"))?;

        if existing > 0 {
            return Ok(false);
        }

        TeachingActiveModel {
            teacher_id: Set(teacher_id),
            subject_id: Set(subject_id),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(write_err("分配教师失败"))?;

        Ok(true)
    }

    pub async fn unassign_teacher_impl(&self, subject_id: i64, teacher_id: i64) -> Result<bool> {
        let result = TeacherSubjects::delete_many()
            .filter(TeachingColumn::SubjectId.eq(subject_id))
            .filter(TeachingColumn::TeacherId.eq(teacher_id))
            .exec(&self.db)
            .await
            .map_err(write_err("取消分配教师失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 访问范围内的课程 ID
    pub async fn visible_subject_ids_impl(&self, scope: AccessScope) -> Result<Option<Vec<i64>>> {
        let ids = match scope {
            AccessScope::Everything => return Ok(None),
            AccessScope::Faculty(None) => Vec::new(),
            AccessScope::Faculty(Some(faculty_id)) => {
                let career_ids = Careers::find()
                    .select_only()
                    .column(CareerColumn::Id)
                    .filter(CareerColumn::FacultyId.eq(faculty_id))
                    .into_tuple::<i64>()
                    .all(&self.db)
                    .await
                    .map_err(read_err("查询院系专业失败"))?;
                if career_ids.is_empty() {
                    Vec::new()
                } else {
                    CareerSubjects::find()
                        .select_only()
                        .column(PlanColumn::SubjectId)
                        .filter(PlanColumn::CareerId.is_in(career_ids))
                        .into_tuple::<i64>()
                        .all(&self.db)
                        .await
                        .map_err(read_err("查询培养方案失败"))?
                }
            }
            AccessScope::Teaching(teacher_id) => TeacherSubjects::find()
                .select_only()
                .column(TeachingColumn::SubjectId)
                .filter(TeachingColumn::TeacherId.eq(teacher_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(read_err("查询任课关系失败"))?,
            AccessScope::Enrolled(student_id) => Enrollments::find()
                .select_only()
                .column(EnrollmentColumn::SubjectId)
                .filter(EnrollmentColumn::StudentId.eq(student_id))
                .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(read_err("查询选课失败"))?,
        };

        let unique: BTreeSet<i64> = ids.into_iter().collect();
        Ok(Some(unique.into_iter().collect()))
    }

    pub async fn subject_in_scope_impl(&self, scope: AccessScope, subject_id: i64) -> Result<bool> {
        Ok(match self.visible_subject_ids_impl(scope).await? {
            None => true,
            Some(ids) => ids.contains(&subject_id),
        })
    }

    /// 课程 ID -> 课程，供列表视图批量填充
    pub(crate) async fn subjects_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<i64>,
    ) -> Result<HashMap<i64, crate::entity::subjects::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let subjects = Subjects::find()
            .filter(Column::Id.is_in(ids))
            .all(db)
            .await
            .map_err(read_err("查询课程失败"))?;
        Ok(subjects.into_iter().map(|s| (s.id, s)).collect())
    }
}
