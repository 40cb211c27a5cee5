//! 作业存储操作

use rust_decimal::Decimal;

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::AssignmentListQuery,
    },
};
use crate::storage::{AssignmentChanges, NewAssignment};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, ExprTrait, Func},
};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(assignment.subject_id),
            title: Set(assignment.title.trim().to_string()),
            description: Set(assignment.description),
            kind: Set(assignment.kind),
            weight: Set(assignment.weight),
            publish_at: Set(assignment.publish_at.timestamp()),
            due_at: Set(assignment.due_at.timestamp()),
            status: Set(AssignmentStatus::Draft.to_string()),
            allow_late_submission: Set(assignment.allow_late_submission),
            created_by: Set(Some(assignment.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(write_err("创建作业失败"))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Assignments::find();
        if let Some(ids) = query.visible_ids {
            select = select.filter(Column::SubjectId.is_in(ids));
        }
        if query.hide_drafts {
            select = select.filter(Column::Status.ne(AssignmentStatus::Draft.to_string()));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(kind) = query.kind {
            select = select.filter(Column::Kind.eq(kind.to_string()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Title.contains(escape_like_pattern(search.trim())));
        }

        let paginator = select.order_by_asc(Column::DueAt).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询作业总数失败"))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询作业列表失败"))?;

        Ok(PaginatedResponse {
            items: assignments.into_iter().map(|m| m.into_assignment()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.title = Set(changes.title.trim().to_string());
        model.description = Set(changes.description);
        model.kind = Set(changes.kind);
        model.weight = Set(changes.weight);
        model.publish_at = Set(changes.publish_at.timestamp());
        model.due_at = Set(changes.due_at.timestamp());
        model.allow_late_submission = Set(changes.allow_late_submission);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("更新作业失败"))?;

        Ok(Some(result.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除作业失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn set_assignment_status_impl(
        &self,
        id: i64,
        status: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("更新作业状态失败"))?;

        Ok(Some(result.into_assignment()))
    }

    /// 课程全部作业（含草稿）的权重合计
    pub async fn subject_weight_total_impl(
        &self,
        subject_id: i64,
        exclude: Option<i64>,
    ) -> Result<Decimal> {
        let mut select = Assignments::find()
            .select_only()
            .column(Column::Weight)
            .filter(Column::SubjectId.eq(subject_id));
        if let Some(exclude) = exclude {
            select = select.filter(Column::Id.ne(exclude));
        }

        // 在应用层求和，SUM(DECIMAL) 的返回类型随数据库而变
        let weights = select
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await
            .map_err(read_err("查询作业权重失败"))?;

        Ok(weights.into_iter().sum())
    }

    pub async fn assignment_title_exists_impl(
        &self,
        subject_id: i64,
        title: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        let mut select = Assignments::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::Title))).eq(title.trim().to_lowercase()),
            );
        if let Some(exclude) = exclude {
            select = select.filter(Column::Id.ne(exclude));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(read_err("查询作业标题失败"))?;

        Ok(count > 0)
    }
}
