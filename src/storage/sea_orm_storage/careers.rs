//! 专业存储操作

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::careers::{ActiveModel, Column, Entity as Careers};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    careers::{
        entities::Career,
        requests::{CareerListQuery, CreateCareerRequest, UpdateCareerRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{Expr, ExprTrait, Func},
};

impl SeaOrmStorage {
    pub async fn create_career_impl(&self, req: CreateCareerRequest) -> Result<Career> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            description: Set(req.description),
            level: Set(req.level.to_string()),
            modality: Set(req.modality.to_string()),
            faculty_id: Set(req.faculty_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(write_err("创建专业失败"))?;

        Ok(result.into_career())
    }

    pub async fn get_career_by_id_impl(&self, id: i64) -> Result<Option<Career>> {
        let result = Careers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询专业失败"))?;

        Ok(result.map(|m| m.into_career()))
    }

    /// 导入时按代码或名称匹配专业（不区分大小写）
    pub async fn find_career_impl(&self, code_or_name: &str) -> Result<Option<Career>> {
        let needle = code_or_name.trim().to_lowercase();
        let result = Careers::find()
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::Code))).eq(needle.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(needle)),
            )
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(read_err("查询专业失败"))?;

        Ok(result.map(|m| m.into_career()))
    }

    pub async fn list_careers_with_pagination_impl(
        &self,
        query: CareerListQuery,
    ) -> Result<PaginatedResponse<Career>> {
        let (page, size) = page_params(query.page, query.size);

        // 范围内没有院系时直接返回空页
        if let Some(None) = query.scope_faculty {
            return Ok(PaginatedResponse {
                items: Vec::new(),
                pagination: PaginationInfo::new(page as i64, size as i64, 0),
            });
        }

        let mut select = Careers::find();

        if let Some(Some(faculty_id)) = query.scope_faculty {
            select = select.filter(Column::FacultyId.eq(faculty_id));
        }
        if let Some(faculty_id) = query.faculty_id {
            select = select.filter(Column::FacultyId.eq(faculty_id));
        }
        if let Some(level) = query.level {
            select = select.filter(Column::Level.eq(level.to_string()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Code.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询专业总数失败"))?;

        let careers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询专业列表失败"))?;

        Ok(PaginatedResponse {
            items: careers.into_iter().map(|m| m.into_career()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn update_career_impl(
        &self,
        id: i64,
        update: UpdateCareerRequest,
    ) -> Result<Option<Career>> {
        let Some(existing) = Careers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询专业失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(level) = update.level {
            model.level = Set(level.to_string());
        }
        if let Some(modality) = update.modality {
            model.modality = Set(modality.to_string());
        }
        if let Some(faculty_id) = update.faculty_id {
            model.faculty_id = Set(faculty_id);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("更新专业失败"))?;

        Ok(Some(result.into_career()))
    }

    pub async fn delete_career_impl(&self, id: i64) -> Result<bool> {
        let result = Careers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除专业失败"))?;

        Ok(result.rows_affected > 0)
    }
}
