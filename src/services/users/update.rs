use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, can_manage, user_not_found};
use crate::models::roles::entities::perms;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::services::{current_user, invalidate_user, validation_response};
use crate::utils::validate::{validate_document, validate_email};

/// 本人只能修改的资料字段之外是否还有其他字段
fn touches_admin_fields(update: &UpdateUserRequest) -> bool {
    update.status.is_some() || update.faculty_id.is_some() || update.career_id.is_some()
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = current_user(request)?;

    let Some(target) = storage.get_user_by_id(user_id).await? else {
        return Ok(user_not_found());
    };

    let is_self = actor.id == target.id;
    let is_admin_edit = actor.has_permission(perms::EDIT_USER) && can_manage(&actor, &target);
    if !is_admin_edit && (!is_self || touches_admin_fields(&update_data)) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "没有修改该用户的权限",
        )));
    }

    // 校验与规范化
    let mut errors = FieldErrors::new();
    if let Some(email) = update_data.email.as_mut() {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            errors.insert("email".to_string(), msg.to_string());
        } else if storage
            .get_user_by_email(email)
            .await?
            .is_some_and(|other| other.id != user_id)
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "邮箱已被使用",
            )));
        }
    }
    if let Some(document) = update_data.document_number.as_mut() {
        *document = document.trim().to_string();
        if let Err(msg) = validate_document(document) {
            errors.insert("document_number".to_string(), msg.to_string());
        } else if storage
            .get_user_by_document(document)
            .await?
            .is_some_and(|other| other.id != user_id)
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "证件号已被使用",
            )));
        }
    }
    for (field, value) in [
        ("first_name", update_data.first_name.as_deref()),
        ("last_name", update_data.last_name.as_deref()),
    ] {
        if value.is_some_and(|v| v.trim().is_empty()) {
            errors.insert(field.to_string(), "不能为空".to_string());
        }
    }
    if let Some(faculty_id) = update_data.faculty_id
        && storage.get_faculty_by_id(faculty_id).await?.is_none()
    {
        errors.insert("faculty_id".to_string(), "院系不存在".to_string());
    }
    if let Some(career_id) = update_data.career_id
        && storage.get_career_by_id(career_id).await?.is_none()
    {
        errors.insert("career_id".to_string(), "专业不存在".to_string());
    }
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }

    match storage.update_user(user_id, update_data).await? {
        Some(user) => {
            invalidate_user(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "User information updated successfully",
            )))
        }
        None => Ok(user_not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn empty_update() -> UpdateUserRequest {
        UpdateUserRequest {
            email: None,
            first_name: Some("Ana".to_string()),
            last_name: None,
            document_number: None,
            status: None,
            faculty_id: None,
            career_id: None,
        }
    }

    #[test]
    fn test_profile_fields_are_not_admin_fields() {
        assert!(!touches_admin_fields(&empty_update()));
        let mut update = empty_update();
        update.status = Some(UserStatus::Suspended);
        assert!(touches_admin_fields(&update));
    }
}
