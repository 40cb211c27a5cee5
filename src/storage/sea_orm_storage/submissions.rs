//! 提交存储操作

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::assignments::{
    Column as AssignmentColumn, Entity as Assignments, Model as AssignmentModel,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{AcademiaError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    submissions::{
        entities::{Submission, SubmissionView},
        requests::SubmissionListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

/// 提交列表的筛选条件
struct SubmissionFilter {
    visible_ids: Option<Vec<i64>>,
    subject_id: Option<i64>,
    assignment_id: Option<i64>,
    student_id: Option<i64>,
    ungraded: bool,
}

impl SeaOrmStorage {
    async fn assignments_by_ids(&self, ids: Vec<i64>) -> Result<HashMap<i64, AssignmentModel>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let assignments = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?;
        Ok(assignments.into_iter().map(|a| (a.id, a)).collect())
    }

    /// 提交所属作业的截止时间（Unix 秒）
    async fn assignment_due_at(&self, assignment_id: i64) -> Result<i64> {
        Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?
            .map(|a| a.due_at)
            .ok_or_else(|| AcademiaError::not_found("作业不存在"))
    }

    /// 批量填充作业、课程和学生信息
    async fn submission_views(&self, models: Vec<Model>) -> Result<Vec<SubmissionView>> {
        let assignments = self
            .assignments_by_ids(models.iter().map(|m| m.assignment_id).collect())
            .await?;
        let subjects =
            Self::subjects_by_ids(&self.db, assignments.values().map(|a| a.subject_id).collect())
                .await?;

        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        let students: HashMap<i64, String> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(read_err("查询学生失败"))?
                .into_iter()
                .map(|u| (u.id, u.full_name()))
                .collect()
        };

        Ok(models
            .into_iter()
            .filter_map(|m| {
                let assignment = assignments.get(&m.assignment_id)?;
                let subject = subjects.get(&assignment.subject_id)?;
                let student_name = students.get(&m.student_id).cloned().unwrap_or_default();
                Some(SubmissionView {
                    submission: m.into_submission(assignment.due_at),
                    assignment_title: assignment.title.clone(),
                    subject_id: subject.id,
                    subject_code: subject.code.clone(),
                    subject_name: subject.name.clone(),
                    student_name,
                })
            })
            .collect())
    }

    /// 课程条件转换为作业 ID 条件
    async fn filtered_select(&self, filter: SubmissionFilter) -> Result<Select<Submissions>> {
        let mut select = Submissions::find();

        if filter.visible_ids.is_some() || filter.subject_id.is_some() {
            let mut assignments = Assignments::find()
                .select_only()
                .column(AssignmentColumn::Id);
            if let Some(ids) = filter.visible_ids {
                assignments = assignments.filter(AssignmentColumn::SubjectId.is_in(ids));
            }
            if let Some(subject_id) = filter.subject_id {
                assignments = assignments.filter(AssignmentColumn::SubjectId.eq(subject_id));
            }
            let assignment_ids = assignments
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(read_err("查询课程作业失败"))?;
            select = select.filter(Column::AssignmentId.is_in(assignment_ids));
        }

        if let Some(assignment_id) = filter.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if filter.ungraded {
            select = select.filter(Column::Grade.is_null());
        }

        Ok(select.order_by_desc(Column::SubmittedAt))
    }

    /// 新建或替换未评分的提交，已评分时返回冲突
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        attachment_url: Option<String>,
    ) -> Result<Submission> {
        let Some(assignment) = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?
        else {
            return Err(AcademiaError::not_found("作业不存在"));
        };

        let now = chrono::Utc::now().timestamp();
        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询提交失败"))?;

        let result = match existing {
            Some(found) if found.grade.is_some() => {
                return Err(AcademiaError::conflict("提交已评分，不能再次提交"));
            }
            Some(found) => {
                let mut model: ActiveModel = found.into();
                model.content = Set(content);
                model.attachment_url = Set(attachment_url);
                model.submitted_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(write_err("更新提交失败"))?
            }
            None => ActiveModel {
                assignment_id: Set(assignment_id),
                student_id: Set(student_id),
                content: Set(content),
                attachment_url: Set(attachment_url),
                submitted_at: Set(now),
                grade: Set(None),
                feedback: Set(None),
                graded_by: Set(None),
                graded_at: Set(None),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(write_err("创建提交失败"))?,
        };

        Ok(result.into_submission(assignment.due_at))
    }

    pub async fn get_submission_view_impl(&self, id: i64) -> Result<Option<SubmissionView>> {
        let Some(model) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询提交失败"))?
        else {
            return Ok(None);
        };

        Ok(self.submission_views(vec![model]).await?.pop())
    }

    pub async fn find_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let Some(model) = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询提交失败"))?
        else {
            return Ok(None);
        };

        let due_at = self.assignment_due_at(assignment_id).await?;

        Ok(Some(model.into_submission(due_at)))
    }

    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<SubmissionView>> {
        let (page, size) = page_params(query.page, query.size);

        let select = self
            .filtered_select(SubmissionFilter {
                visible_ids: query.visible_ids,
                subject_id: query.subject_id,
                assignment_id: query.assignment_id,
                student_id: query.student_id,
                ungraded: query.ungraded.unwrap_or(false),
            })
            .await?;

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询提交总数失败"))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询提交列表失败"))?;

        Ok(PaginatedResponse {
            items: self.submission_views(submissions).await?,
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn list_submission_views_impl(
        &self,
        visible_ids: Option<Vec<i64>>,
        subject_id: Option<i64>,
        assignment_id: Option<i64>,
    ) -> Result<Vec<SubmissionView>> {
        let submissions = self
            .filtered_select(SubmissionFilter {
                visible_ids,
                subject_id,
                assignment_id,
                student_id: None,
                ungraded: false,
            })
            .await?
            .all(&self.db)
            .await
            .map_err(read_err("查询提交列表失败"))?;

        self.submission_views(submissions).await
    }

    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grade: Decimal,
        feedback: Option<String>,
        grader_id: i64,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询提交失败"))?
        else {
            return Ok(None);
        };

        let due_at = self.assignment_due_at(existing.assignment_id).await?;

        let mut model: ActiveModel = existing.into();
        model.grade = Set(Some(grade));
        model.feedback = Set(feedback);
        model.graded_by = Set(Some(grader_id));
        model.graded_at = Set(Some(chrono::Utc::now().timestamp()));

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("评分失败"))?;

        Ok(Some(result.into_submission(due_at)))
    }
}
