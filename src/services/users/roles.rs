use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_not_found};
use crate::models::roles::entities::{RoleCode, perms};
use crate::models::roles::requests::SetUserRolesRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, field_error, invalidate_user, require_permission};

pub async fn set_user_roles(
    service: &UserService,
    user_id: i64,
    roles_request: SetUserRolesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = current_user(request)?;
    require_permission(&actor, perms::ASSIGN_ROLES)?;

    let mut roles = roles_request.roles;
    roles.sort();
    roles.dedup();
    if roles.is_empty() {
        return Ok(field_error("roles", "至少需要一个角色"));
    }
    if roles.contains(&RoleCode::SuperAdmin) && !actor.is_super_admin() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只有超级管理员可以授予超级管理员角色",
        )));
    }

    let Some(target) = storage.get_user_by_id(user_id).await? else {
        return Ok(user_not_found());
    };

    // 保留至少一个超级管理员
    if target.has_role(RoleCode::SuperAdmin)
        && !roles.contains(&RoleCode::SuperAdmin)
        && storage.count_users_with_role(RoleCode::SuperAdmin).await? <= 1
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "不能移除最后一个超级管理员",
        )));
    }

    match storage.set_user_roles(user_id, &roles).await? {
        Some(user) => {
            invalidate_user(request, user_id).await;
            tracing::info!(
                "Roles of user {} set to {:?} by {}",
                user.username,
                roles,
                actor.username
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "角色已更新")))
        }
        None => Ok(user_not_found()),
    }
}
