//! 专业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "careers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub level: String,
    pub modality: String,
    pub faculty_id: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::faculties::Entity",
        from = "Column::FacultyId",
        to = "super::faculties::Column::Id"
    )]
    Faculty,
    #[sea_orm(has_many = "super::career_subjects::Entity")]
    CareerSubjects,
}

impl Related<super::faculties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::career_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CareerSubjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_career(self) -> crate::models::careers::entities::Career {
        use crate::models::careers::entities::{Career, CareerLevel, CareerModality};

        Career {
            id: self.id,
            name: self.name,
            code: self.code,
            description: self.description,
            level: self
                .level
                .parse::<CareerLevel>()
                .unwrap_or(CareerLevel::Undergraduate),
            modality: self
                .modality
                .parse::<CareerModality>()
                .unwrap_or(CareerModality::InPerson),
            faculty_id: self.faculty_id,
            is_active: self.is_active,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
