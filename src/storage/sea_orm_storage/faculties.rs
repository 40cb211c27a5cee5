//! 院系存储操作

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::faculties::{ActiveModel, Column, Entity as Faculties};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    faculties::{
        entities::Faculty,
        requests::{CreateFacultyRequest, FacultyListQuery, UpdateFacultyRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_faculty_impl(&self, req: CreateFacultyRequest) -> Result<Faculty> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            description: Set(req.description),
            coordinator_id: Set(req.coordinator_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(write_err("创建院系失败"))?;

        Ok(result.into_faculty())
    }

    pub async fn get_faculty_by_id_impl(&self, id: i64) -> Result<Option<Faculty>> {
        let result = Faculties::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询院系失败"))?;

        Ok(result.map(|m| m.into_faculty()))
    }

    pub async fn list_faculties_with_pagination_impl(
        &self,
        query: FacultyListQuery,
    ) -> Result<PaginatedResponse<Faculty>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Faculties::find();

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

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询院系总数失败"))?;

        let faculties = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询院系列表失败"))?;

        Ok(PaginatedResponse {
            items: faculties.into_iter().map(|m| m.into_faculty()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    pub async fn update_faculty_impl(
        &self,
        id: i64,
        update: UpdateFacultyRequest,
    ) -> Result<Option<Faculty>> {
        let Some(existing) = Faculties::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询院系失败"))?
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
        if let Some(coordinator_id) = update.coordinator_id {
            model.coordinator_id = Set(Some(coordinator_id));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(write_err("更新院系失败"))?;

        Ok(Some(result.into_faculty()))
    }

    /// 删除院系，下属专业级联删除
    pub async fn delete_faculty_impl(&self, id: i64) -> Result<bool> {
        let result = Faculties::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除院系失败"))?;

        Ok(result.rows_affected > 0)
    }
}
