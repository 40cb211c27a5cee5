//! 培养方案：专业-课程关联

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "career_subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub career_id: i64,
    pub subject_id: i64,
    pub semester: i32,
    pub is_mandatory: bool,
    pub credits_override: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::careers::Entity",
        from = "Column::CareerId",
        to = "super::careers::Column::Id"
    )]
    Career,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::careers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Career.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
