//! 修改密码与找回密码

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};

use crate::models::auth::requests::{
    ChangePasswordRequest, PasswordResetConfirmRequest, PasswordResetRequest,
};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::services::{current_user, dispatch_job, invalidate_user, validation_response};
use crate::tasks::Job;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::random_code::generate_reset_token;
use crate::utils::validate::validate_password;

use super::AuthService;

/// 新密码校验：策略 + 两次输入一致
fn check_new_password(password: &str, confirm: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Err(msg) = validate_password(password) {
        errors.insert("new_password".to_string(), msg);
    }
    if password != confirm {
        errors.insert(
            "new_password_confirm".to_string(),
            "两次输入的密码不一致".to_string(),
        );
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    if !verify_password(&change_request.current_password, &user.password_hash) {
        let mut errors = FieldErrors::new();
        errors.insert("current_password".to_string(), "当前密码不正确".to_string());
        return Ok(validation_response(errors));
    }
    if let Err(errors) = check_new_password(
        &change_request.new_password,
        &change_request.new_password_confirm,
    ) {
        return Ok(validation_response(errors));
    }

    storage
        .update_user_password(user.id, &hash_password(&change_request.new_password)?)
        .await?;
    invalidate_user(request, user.id).await;
    dispatch_job(request, Job::PasswordChanged { user_id: user.id });

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("密码已修改")))
}

/// 无论邮箱是否存在都返回 200
pub async fn handle_reset_request(
    service: &AuthService,
    reset_request: PasswordResetRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let email = reset_request.email.trim().to_lowercase();

    if let Some(user) = storage.get_user_by_email(&email).await?
        && user.status == UserStatus::Active
    {
        let token = generate_reset_token();
        let ttl = Duration::minutes(service.get_config().auth.reset_token_ttl_minutes);
        storage
            .create_password_reset_token(user.id, &token, (Utc::now() + ttl).timestamp())
            .await?;
        dispatch_job(
            request,
            Job::PasswordReset {
                user_id: user.id,
                token,
            },
        );
        tracing::info!("Password reset requested for user {}", user.id);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "如果该邮箱已注册，重置链接将发送到邮箱",
    )))
}

pub async fn handle_reset_confirm(
    service: &AuthService,
    confirm_request: PasswordResetConfirmRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(errors) = check_new_password(
        &confirm_request.new_password,
        &confirm_request.new_password_confirm,
    ) {
        return Ok(validation_response(errors));
    }

    let Some(user_id) = storage
        .consume_password_reset_token(confirm_request.token.trim(), Utc::now().timestamp())
        .await?
    else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ResetTokenInvalid,
            "重置令牌无效或已过期",
        )));
    };

    storage
        .update_user_password(user_id, &hash_password(&confirm_request.new_password)?)
        .await?;
    invalidate_user(request, user_id).await;
    dispatch_job(request, Job::PasswordChanged { user_id });

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("密码已重置")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_password_checks() {
        assert!(check_new_password("Str0ngPass", "Str0ngPass").is_ok());
        let errors = check_new_password("weak", "other").unwrap_err();
        assert!(errors.contains_key("new_password"));
        assert!(errors.contains_key("new_password_confirm"));
    }
}
