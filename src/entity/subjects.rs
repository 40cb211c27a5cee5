//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub credits: i32,
    pub period_id: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_periods::Entity",
        from = "Column::PeriodId",
        to = "super::academic_periods::Column::Id"
    )]
    Period,
    #[sea_orm(has_many = "super::career_subjects::Entity")]
    CareerSubjects,
    #[sea_orm(has_many = "super::teacher_subjects::Entity")]
    TeacherSubjects,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::academic_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl Related<super::career_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CareerSubjects.def()
    }
}

impl Related<super::teacher_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherSubjects.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::subjects::entities::Subject {
        crate::models::subjects::entities::Subject {
            id: self.id,
            name: self.name,
            code: self.code,
            description: self.description,
            credits: self.credits,
            period_id: self.period_id,
            is_active: self.is_active,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }

    pub fn as_ref_entry(&self) -> crate::models::subjects::entities::SubjectRef {
        crate::models::subjects::entities::SubjectRef {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }
}
