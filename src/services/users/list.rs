use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::access::AccessScope;
use crate::models::roles::entities::perms;
use crate::models::users::requests::{UserListParams, UserListQuery};
use crate::models::{ApiResponse, PaginatedResponse, PaginationInfo};
use crate::services::{current_scope, current_user, require_permission};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::VIEW_USERS)?;

    let (page, size) = query.pagination.normalized();

    // 院系范围内的调用者只能看到本院系的用户
    let faculty_id = match current_scope(request)? {
        AccessScope::Faculty(Some(own)) => Some(own),
        AccessScope::Faculty(None) => {
            return Ok(HttpResponse::Ok().json(ApiResponse::success(
                PaginatedResponse::<crate::models::users::entities::User> {
                    items: Vec::new(),
                    pagination: PaginationInfo::new(page, size, 0),
                },
                "查询成功",
            )));
        }
        _ => query.faculty_id,
    };

    let users = storage
        .list_users_with_pagination(UserListQuery {
            page,
            size,
            role: query.role,
            status: query.status,
            faculty_id,
            search: query.search.filter(|s| !s.trim().is_empty()),
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(users, "查询成功")))
}
