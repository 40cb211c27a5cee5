//! 学期存储操作
//!
//! 同一时间最多一个激活学期：先全部取消激活，再激活目标，在同一事务中完成。

use std::collections::HashSet;

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::academic_periods::{ActiveModel, Column, Entity as Periods};
use crate::entity::career_subjects::{
    ActiveModel as PlanActiveModel, Column as PlanColumn, Entity as CareerSubjects,
};
use crate::entity::subjects::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as Subjects,
};
use crate::errors::{AcademiaError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    periods::{
        entities::{AcademicPeriod, PeriodCloneResult},
        requests::{CreatePeriodRequest, PeriodListQuery, UpdatePeriodRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 取消所有学期的激活标记
    async fn deactivate_all<C: ConnectionTrait>(db: &C) -> Result<()> {
        Periods::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .filter(Column::IsActive.eq(true))
            .exec(db)
            .await
            .map_err(write_err("取消激活学期失败"))?;
        Ok(())
    }

    pub async fn create_period_impl(&self, req: CreatePeriodRequest) -> Result<AcademicPeriod> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        if req.is_active {
            Self::deactivate_all(&txn).await?;
        }

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(write_err("创建学期失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(model.into_period())
    }

    pub async fn get_period_by_id_impl(&self, id: i64) -> Result<Option<AcademicPeriod>> {
        let result = Periods::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询学期失败"))?;

        Ok(result.map(|m| m.into_period()))
    }

    pub async fn get_active_period_impl(&self) -> Result<Option<AcademicPeriod>> {
        let result = Periods::find()
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::StartDate)
            .one(&self.db)
            .await
            .map_err(read_err("查询当前学期失败"))?;

        Ok(result.map(|m| m.into_period()))
    }

    pub async fn list_periods_with_pagination_impl(
        &self,
        query: PeriodListQuery,
    ) -> Result<PaginatedResponse<AcademicPeriod>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Periods::find();
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.contains(escape_like_pattern(search.trim())));
        }

        let paginator = select
            .order_by_desc(Column::StartDate)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询学期总数失败"))?;

        let periods = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询学期列表失败"))?;

        Ok(PaginatedResponse {
            items: periods.into_iter().map(|m| m.into_period()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn update_period_impl(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
    ) -> Result<Option<AcademicPeriod>> {
        let Some(existing) = Periods::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询学期失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("更新学期失败"))?;

        Ok(Some(result.into_period()))
    }

    /// 删除学期；仍有课程时返回冲突
    pub async fn delete_period_impl(&self, id: i64) -> Result<bool> {
        let subjects = Subjects::find()
            .filter(SubjectColumn::PeriodId.eq(id))
            .count(&self.db)
            .await
            .map_err(read_err("查询学期课程失败"))?;

        if subjects > 0 {
            return Err(AcademiaError::conflict(format!(
                "学期下仍有 {subjects} 门课程，无法删除"
            )));
        }

        let result = Periods::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除学期失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn activate_period_impl(&self, id: i64) -> Result<Option<AcademicPeriod>> {
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        let Some(existing) = Periods::find_by_id(id)
            .one(&txn)
            .await
            .map_err(read_err("查询学期失败"))?
        else {
            return Ok(None);
        };

        Self::deactivate_all(&txn).await?;

        let mut model: ActiveModel = existing.into();
        model.is_active = Set(true);
        model.updated_at = Set(chrono::Utc::now().timestamp());
        let result = model
            .update(&txn)
            .await
            .map_err(write_err("激活学期失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(Some(result.into_period()))
    }

    /// 把源学期的课程复制到目标学期
    ///
    /// 目标学期已有同代码课程时复用，只补齐缺失的培养方案关联。
    pub async fn clone_period_subjects_impl(
        &self,
        source: i64,
        target: i64,
    ) -> Result<PeriodCloneResult> {
        let mut result = PeriodCloneResult {
            source_period_id: source,
            target_period_id: target,
            ..Default::default()
        };

        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        let subjects = Subjects::find()
            .filter(SubjectColumn::PeriodId.eq(source))
            .order_by_asc(SubjectColumn::Code)
            .all(&txn)
            .await
            .map_err(read_err("查询源学期课程失败"))?;

        let now = chrono::Utc::now().timestamp();
        for subject in subjects {
            let existing = Subjects::find()
                .filter(SubjectColumn::PeriodId.eq(target))
                .filter(SubjectColumn::Code.eq(subject.code.clone()))
                .one(&txn)
                .await
                .map_err(read_err("查询目标学期课程失败"))?;

            let target_subject = match existing {
                Some(found) => {
                    result.reused += 1;
                    found
                }
                None => {
                    result.created += 1;
                    SubjectActiveModel {
                        name: Set(subject.name.clone()),
                        code: Set(subject.code.clone()),
                        description: Set(subject.description.clone()),
                        credits: Set(subject.credits),
                        period_id: Set(target),
                        is_active: Set(subject.is_active),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(write_err("复制课程失败"))?
                }
            };

            let linked: HashSet<i64> = CareerSubjects::find()
                .filter(PlanColumn::SubjectId.eq(target_subject.id))
                .all(&txn)
                .await
                .map_err(read_err("查询培养方案失败"))?
                .into_iter()
                .map(|p| p.career_id)
                .collect();

            let source_links = CareerSubjects::find()
                .filter(PlanColumn::SubjectId.eq(subject.id))
                .all(&txn)
                .await
                .map_err(read_err("查询培养方案失败"))?;

            for link in source_links {
                if linked.contains(&link.career_id) {
                    continue;
                }
                PlanActiveModel {
                    career_id: Set(link.career_id),
                    subject_id: Set(target_subject.id),
                    semester: Set(link.semester),
                    is_mandatory: Set(link.is_mandatory),
                    credits_override: Set(link.credits_override),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(write_err("复制培养方案失败"))?;
                result.plan_links += 1;
            }
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(result)
    }
}
