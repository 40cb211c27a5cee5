//! 角色与权限管理

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::roles::entities::{Permission, RoleCode};
use crate::models::roles::requests::SetRolePermissionsRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, field_error, object_cache};
use crate::storage::Storage;

pub struct RoleService {
    storage: Option<Arc<dyn Storage>>,
}

/// 返回目录中不存在的权限代码
fn unknown_permissions<'a>(requested: &'a [String], catalogue: &[Permission]) -> Vec<&'a str> {
    let known: HashSet<&str> = catalogue.iter().map(|p| p.code.as_str()).collect();
    requested
        .iter()
        .map(String::as_str)
        .filter(|code| !known.contains(code))
        .collect()
}

impl RoleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let roles = self.get_storage(request)?.list_roles().await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(roles, "查询成功")))
    }

    pub async fn list_permissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let permissions = self.get_storage(request)?.list_permissions().await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(permissions, "查询成功")))
    }

    // 替换角色权限，所有已缓存的用户随之失效
    pub async fn set_role_permissions(
        &self,
        role: RoleCode,
        permissions_request: SetRolePermissionsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let actor = current_user(request)?;

        if role == RoleCode::SuperAdmin {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "超级管理员拥有全部权限，不能修改",
            )));
        }

        let mut requested = permissions_request.permissions;
        requested.sort();
        requested.dedup();

        let catalogue = storage.list_permissions().await?;
        let unknown = unknown_permissions(&requested, &catalogue);
        if !unknown.is_empty() {
            return Ok(field_error(
                "permissions",
                format!("未知的权限: {}", unknown.join(", ")),
            ));
        }

        match storage.set_role_permissions(role, &requested).await? {
            Some(updated) => {
                if let Some(cache) = object_cache(request) {
                    cache.invalidate_all().await;
                }
                tracing::info!(
                    "Permissions of role {} replaced by {} ({} codes)",
                    role,
                    actor.username,
                    requested.len()
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "权限已更新")))
            }
            None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "角色不存在",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(code: &str) -> Permission {
        Permission {
            id: 1,
            code: code.to_string(),
            name: code.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_unknown_permissions() {
        let catalogue = vec![perm("view_grades"), perm("edit_grades")];
        let requested = vec!["view_grades".to_string(), "fly".to_string()];
        assert_eq!(unknown_permissions(&requested, &catalogue), vec!["fly"]);
        assert!(unknown_permissions(&[], &catalogue).is_empty());
    }
}
