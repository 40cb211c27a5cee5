//! 用户存储操作
//!
//! 角色只来自 user_roles 表，读取用户时批量填充角色和权限。

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, page_params, read_err, write_err};
use crate::entity::careers::{Column as CareerColumn, Entity as Careers};
use crate::entity::password_reset_tokens::{
    ActiveModel as ResetTokenActiveModel, Column as ResetTokenColumn, Entity as ResetTokens,
};
use crate::entity::permissions::{Column as PermissionColumn, Entity as Permissions};
use crate::entity::role_permissions::{Column as RolePermissionColumn, Entity as RolePermissions};
use crate::entity::roles::{Column as RoleColumn, Entity as Roles};
use crate::entity::user_roles::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRoles,
};
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel};
use crate::errors::{AcademiaError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    roles::entities::RoleCode,
    users::{
        entities::{User, UserStatus},
        requests::{NewUser, UpdateUserRequest, UserListQuery},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

type AccessMap = HashMap<i64, (Vec<RoleCode>, Vec<String>)>;

impl SeaOrmStorage {
    /// 批量加载用户的角色和权限
    async fn load_access<C: ConnectionTrait>(db: &C, user_ids: &[i64]) -> Result<AccessMap> {
        let mut access: AccessMap = HashMap::new();
        if user_ids.is_empty() {
            return Ok(access);
        }

        let links = UserRoles::find()
            .filter(UserRoleColumn::UserId.is_in(user_ids.to_vec()))
            .find_also_related(Roles)
            .all(db)
            .await
            .map_err(read_err("查询用户角色失败"))?;

        let mut user_role_ids: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut role_ids = HashSet::new();
        for (link, role) in links {
            let Some(role) = role else { continue };
            let Ok(code) = role.code.parse::<RoleCode>() else {
                continue;
            };
            access.entry(link.user_id).or_default().0.push(code);
            user_role_ids.entry(link.user_id).or_default().push(role.id);
            role_ids.insert(role.id);
        }

        if role_ids.is_empty() {
            return Ok(access);
        }

        let grants = RolePermissions::find()
            .filter(RolePermissionColumn::RoleId.is_in(role_ids))
            .find_also_related(Permissions)
            .all(db)
            .await
            .map_err(read_err("查询角色权限失败"))?;

        let mut role_perms: HashMap<i64, Vec<String>> = HashMap::new();
        for (grant, permission) in grants {
            if let Some(permission) = permission {
                role_perms
                    .entry(grant.role_id)
                    .or_default()
                    .push(permission.code);
            }
        }

        for (user_id, roles) in user_role_ids {
            if let Some(entry) = access.get_mut(&user_id) {
                let mut perms: Vec<String> = roles
                    .iter()
                    .filter_map(|r| role_perms.get(r))
                    .flatten()
                    .cloned()
                    .collect();
                perms.sort();
                perms.dedup();
                entry.1 = perms;
                entry.0.sort_by_key(|r| std::cmp::Reverse(r.rank()));
            }
        }

        Ok(access)
    }

    /// 数据库模型 -> 业务模型（含角色权限）
    pub(crate) async fn hydrate_users<C: ConnectionTrait>(
        db: &C,
        models: Vec<UserModel>,
    ) -> Result<Vec<User>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut access = Self::load_access(db, &ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let (roles, permissions) = access.remove(&m.id).unwrap_or_default();
                m.into_user(roles, permissions)
            })
            .collect())
    }

    async fn hydrate_user(&self, model: Option<UserModel>) -> Result<Option<User>> {
        match model {
            Some(model) => Ok(Self::hydrate_users(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 写入用户角色（先删除旧的）
    async fn replace_roles<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        roles: &[RoleCode],
    ) -> Result<()> {
        UserRoles::delete_many()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .exec(db)
            .await
            .map_err(write_err("清除用户角色失败"))?;

        if roles.is_empty() {
            return Ok(());
        }

        let codes: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        let role_models = Roles::find()
            .filter(RoleColumn::Code.is_in(codes))
            .all(db)
            .await
            .map_err(read_err("查询角色失败"))?;

        if role_models.len() != roles.len() {
            return Err(AcademiaError::database_operation(
                "角色目录不完整，请检查迁移数据",
            ));
        }

        for role in role_models {
            UserRoleActiveModel {
                user_id: Set(user_id),
                role_id: Set(role.id),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(write_err("写入用户角色失败"))?;
        }
        Ok(())
    }

    /// 拥有某角色的用户 ID
    async fn user_ids_with_role(&self, role: RoleCode) -> Result<Vec<i64>> {
        let Some(role) = Roles::find()
            .filter(RoleColumn::Code.eq(role.as_str()))
            .one(&self.db)
            .await
            .map_err(read_err("查询角色失败"))?
        else {
            return Ok(Vec::new());
        };

        let ids = UserRoles::find()
            .select_only()
            .column(UserRoleColumn::UserId)
            .filter(UserRoleColumn::RoleId.eq(role.id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询角色用户失败"))?;
        Ok(ids)
    }

    /// 创建用户
    pub async fn create_user_impl(&self, req: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            document_number: Set(req.document_number),
            status: Set(UserStatus::Active.to_string()),
            faculty_id: Set(req.faculty_id),
            career_id: Set(req.career_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(write_err("创建用户失败"))?;

        Self::replace_roles(&txn, model.id, &req.roles).await?;
        txn.commit().await.map_err(write_err("提交事务失败"))?;

        self.hydrate_user(Some(model))
            .await?
            .ok_or_else(|| AcademiaError::database_operation("创建用户后读取失败"))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?;

        self.hydrate_user(result).await
    }

    /// 按单列精确查找
    async fn get_user_by_column(&self, column: Column, value: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?;

        self.hydrate_user(result).await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_column(Column::Username, username).await
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_column(Column::Email, email).await
    }

    pub async fn get_user_by_document_impl(&self, document: &str) -> Result<Option<User>> {
        self.get_user_by_column(Column::DocumentNumber, document).await
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?;

        self.hydrate_user(result).await
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped))
                    .add(Column::DocumentNumber.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Id.is_in(self.user_ids_with_role(role).await?));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 院系范围：直接归属院系，或所属专业在该院系下
        if let Some(faculty_id) = query.faculty_id {
            let career_ids = Careers::find()
                .select_only()
                .column(CareerColumn::Id)
                .filter(CareerColumn::FacultyId.eq(faculty_id))
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(read_err("查询院系专业失败"))?;
            select = select.filter(
                Condition::any()
                    .add(Column::FacultyId.eq(faculty_id))
                    .add(Column::CareerId.is_in(career_ids)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询用户总数失败"))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询用户列表失败"))?;

        Ok(PaginatedResponse {
            items: Self::hydrate_users(&self.db, users).await?,
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(write_err("更新最后登录时间失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(document_number) = update.document_number {
            model.document_number = Set(Some(document_number).filter(|d| !d.is_empty()));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(faculty_id) = update.faculty_id {
            model.faculty_id = Set(Some(faculty_id));
        }
        if let Some(career_id) = update.career_id {
            model.career_id = Set(Some(career_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(write_err("更新用户失败"))?;

        self.get_user_by_id_impl(id).await
    }

    pub async fn update_user_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(write_err("更新密码失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除用户失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 替换用户角色
    pub async fn set_user_roles_impl(&self, id: i64, roles: &[RoleCode]) -> Result<Option<User>> {
        if Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?
            .is_none()
        {
            return Ok(None);
        }

        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;
        Self::replace_roles(&txn, id, roles).await?;
        txn.commit().await.map_err(write_err("提交事务失败"))?;

        self.get_user_by_id_impl(id).await
    }

    pub async fn count_users_with_role_impl(&self, role: RoleCode) -> Result<u64> {
        Ok(self.user_ids_with_role(role).await?.len() as u64)
    }

    /// 通过任一角色拥有某权限的活跃用户
    pub async fn list_users_with_permission_impl(&self, permission: &str) -> Result<Vec<User>> {
        let Some(permission) = Permissions::find()
            .filter(PermissionColumn::Code.eq(permission))
            .one(&self.db)
            .await
            .map_err(read_err("查询权限失败"))?
        else {
            return Ok(Vec::new());
        };

        let role_ids = RolePermissions::find()
            .select_only()
            .column(RolePermissionColumn::RoleId)
            .filter(RolePermissionColumn::PermissionId.eq(permission.id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询权限角色失败"))?;
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: HashSet<i64> = UserRoles::find()
            .select_only()
            .column(UserRoleColumn::UserId)
            .filter(UserRoleColumn::RoleId.is_in(role_ids))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(read_err("查询角色用户失败"))?
            .into_iter()
            .collect();
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(user_ids))
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err("查询用户失败"))?;

        Self::hydrate_users(&self.db, users).await
    }

    /// 保存密码重置令牌
    pub async fn create_password_reset_token_impl(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<()> {
        ResetTokenActiveModel {
            user_id: Set(user_id),
            token: Set(token.to_string()),
            expires_at: Set(expires_at),
            used_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(write_err("保存重置令牌失败"))?;
        Ok(())
    }

    /// 一次性消费重置令牌
    pub async fn consume_password_reset_token_impl(
        &self,
        token: &str,
        now: i64,
    ) -> Result<Option<i64>> {
        let Some(record) = ResetTokens::find()
            .filter(ResetTokenColumn::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(read_err("查询重置令牌失败"))?
        else {
            return Ok(None);
        };

        if !record.is_usable(now) {
            return Ok(None);
        }

        // 条件更新保证并发下只有一次成功
        let result = ResetTokens::update_many()
            .col_expr(
                ResetTokenColumn::UsedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(ResetTokenColumn::Id.eq(record.id))
            .filter(ResetTokenColumn::UsedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(write_err("更新重置令牌失败"))?;

        Ok((result.rows_affected == 1).then_some(record.user_id))
    }
}
