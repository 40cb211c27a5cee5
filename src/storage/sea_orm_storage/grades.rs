//! 成绩汇总所需数据

use std::collections::HashMap;

use super::{SeaOrmStorage, read_err};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::Result;
use crate::models::{assignments::entities::AssignmentStatus, grades::entities::GradeItem};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 已发布/已关闭作业及该学生的成绩，草稿不计入
    pub async fn list_grade_items_impl(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Vec<GradeItem>> {
        let assignments = Assignments::find()
            .filter(AssignmentColumn::SubjectId.eq(subject_id))
            .filter(AssignmentColumn::Status.is_in([
                AssignmentStatus::Published.to_string(),
                AssignmentStatus::Closed.to_string(),
            ]))
            .order_by_asc(AssignmentColumn::DueAt)
            .all(&self.db)
            .await
            .map_err(read_err("查询课程作业失败"))?;

        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let grades: HashMap<i64, _> = Submissions::find()
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .filter(SubmissionColumn::AssignmentId.is_in(assignments.iter().map(|a| a.id)))
            .all(&self.db)
            .await
            .map_err(read_err("查询学生成绩失败"))?
            .into_iter()
            .map(|s| (s.assignment_id, s.grade))
            .collect();

        Ok(assignments
            .into_iter()
            .map(|a| GradeItem {
                assignment_id: a.id,
                grade: grades.get(&a.id).copied().flatten(),
                title: a.title,
                weight: a.weight,
            })
            .collect())
    }
}
