use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_not_found};
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::services::{current_user, require_permission};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;
    if current.id != user_id {
        require_permission(&current, perms::VIEW_USERS)?;
    }

    let storage = service.get_storage(request)?;
    match storage.get_user_by_id(user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user, "查询成功"))),
        None => Ok(user_not_found()),
    }
}
