//! 院系实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "faculties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub coordinator_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::careers::Entity")]
    Careers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CoordinatorId",
        to = "super::users::Column::Id"
    )]
    Coordinator,
}

impl Related<super::careers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Careers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_faculty(self) -> crate::models::faculties::entities::Faculty {
        crate::models::faculties::entities::Faculty {
            id: self.id,
            name: self.name,
            code: self.code,
            description: self.description,
            coordinator_id: self.coordinator_id,
            is_active: self.is_active,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
