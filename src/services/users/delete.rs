use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, can_manage, user_not_found};
use crate::models::roles::entities::perms;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, invalidate_user, require_permission};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = current_user(request)?;
    require_permission(&actor, perms::DELETE_USER)?;

    if actor.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "不能删除自己的账号",
        )));
    }

    let Some(target) = storage.get_user_by_id(user_id).await? else {
        return Ok(user_not_found());
    };
    if !can_manage(&actor, &target) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能删除学生或教师账号",
        )));
    }

    if storage.delete_user(user_id).await? {
        invalidate_user(request, user_id).await;
        tracing::info!("User {} deleted by {}", target.username, actor.username);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("用户已删除")))
    } else {
        Ok(user_not_found())
    }
}
