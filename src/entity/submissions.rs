//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub submitted_at: i64,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub grade: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 迟交状态依赖作业截止时间（Unix 秒）
    pub fn into_submission(self, due_at: i64) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, derive_status, is_late};

        let late = is_late(super::ts(self.submitted_at), super::ts(due_at));
        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            attachment_url: self.attachment_url,
            submitted_at: super::ts(self.submitted_at),
            grade: self.grade,
            feedback: self.feedback,
            graded_by: self.graded_by,
            graded_at: self.graded_at.map(super::ts),
            late,
            status: derive_status(self.grade, late),
        }
    }
}
