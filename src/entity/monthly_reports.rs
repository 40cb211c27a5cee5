//! 月度报告

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "monthly_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub year: i32,
    pub month: i32,
    #[sea_orm(column_type = "Json")]
    pub data: Json,
    pub generated_at: i64,
    pub sent_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_report(
        self,
    ) -> Result<crate::models::reports::entities::MonthlyReport, serde_json::Error> {
        use crate::models::reports::entities::MonthlyReport;

        Ok(MonthlyReport {
            id: self.id,
            year: self.year,
            month: self.month.max(1) as u32,
            data: serde_json::from_value(self.data)?,
            generated_at: super::ts(self.generated_at),
            sent_at: self.sent_at.map(super::ts),
        })
    }
}
