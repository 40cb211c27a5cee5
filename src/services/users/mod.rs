pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod roles;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::roles::requests::SetUserRolesRequest;
use crate::models::users::entities::User;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    // 替换用户角色
    pub async fn set_user_roles(
        &self,
        user_id: i64,
        roles_request: SetUserRolesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roles::set_user_roles(self, user_id, roles_request, request).await
    }
}

/// 非超级管理员只能管理学生和教师账号
pub(crate) fn can_manage(actor: &User, target: &User) -> bool {
    actor.is_super_admin() || target.roles.iter().all(|r| r.is_managed_by_admin())
}

pub(crate) fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::UserNotFound,
        "User not found",
    ))
}

/// 用户名、邮箱、证件号唯一性检查，冲突时返回 409 响应
pub(crate) async fn check_account_conflicts(
    storage: &Arc<dyn Storage>,
    username: &str,
    email: &str,
    document_number: Option<&str>,
) -> Result<Option<HttpResponse>> {
    let mut conflicts = FieldErrors::new();
    if storage.get_user_by_username(username).await?.is_some() {
        conflicts.insert("username".to_string(), "用户名已存在".to_string());
    }
    if storage.get_user_by_email(email).await?.is_some() {
        conflicts.insert("email".to_string(), "邮箱已被使用".to_string());
    }
    if let Some(document) = document_number
        && storage.get_user_by_document(document).await?.is_some()
    {
        conflicts.insert("document_number".to_string(), "证件号已被使用".to_string());
    }

    if conflicts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(HttpResponse::Conflict().json(ApiResponse::error(
            ErrorCode::UserAlreadyExists,
            conflicts,
            "User already exists",
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::entities::RoleCode;
    use crate::models::users::entities::fixtures::user;

    #[test]
    fn test_admin_manages_only_students_and_teachers() {
        let admin = user(1, &[RoleCode::Admin]);
        assert!(can_manage(&admin, &user(2, &[RoleCode::Student])));
        assert!(can_manage(&admin, &user(3, &[RoleCode::Teacher, RoleCode::Student])));
        assert!(!can_manage(&admin, &user(4, &[RoleCode::Coordinator])));
        assert!(!can_manage(&admin, &user(5, &[RoleCode::Admin])));

        let root = user(6, &[RoleCode::SuperAdmin]);
        assert!(can_manage(&root, &user(7, &[RoleCode::Admin])));
    }
}
