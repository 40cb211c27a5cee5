//! 截止提醒

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "due_reminders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub kind: String,
    pub scheduled_for: i64,
    pub sent_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 未知提醒类型返回 None
    pub fn into_reminder(self) -> Option<crate::models::assignments::reminders::DueReminder> {
        Some(crate::models::assignments::reminders::DueReminder {
            id: self.id,
            assignment_id: self.assignment_id,
            kind: self.kind.parse().ok()?,
            scheduled_for: super::ts(self.scheduled_for),
            sent_at: self.sent_at.map(super::ts),
        })
    }
}
