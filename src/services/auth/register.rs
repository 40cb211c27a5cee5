use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::RegisterRequest;
use crate::models::roles::entities::RoleCode;
use crate::models::users::requests::NewUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::check_account_conflicts;
use crate::services::{dispatch_job, field_error, validation_response};
use crate::tasks::Job;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_account_fields;

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !service.get_config().auth.allow_self_registration {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "自助注册已关闭",
        )));
    }

    let storage = service.get_storage(request)?;
    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();
    let document_number = register_request
        .document_number
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    // 1. 字段校验
    if let Err(mut errors) = validate_account_fields(
        &username,
        &email,
        &register_request.password,
        document_number.as_deref(),
    ) {
        if register_request.password != register_request.password_confirm {
            errors.insert("password_confirm".to_string(), "两次输入的密码不一致".to_string());
        }
        return Ok(validation_response(errors));
    }
    if register_request.password != register_request.password_confirm {
        return Ok(field_error("password_confirm", "两次输入的密码不一致"));
    }

    // 2. 专业必须存在
    if let Some(career_id) = register_request.career_id
        && storage.get_career_by_id(career_id).await?.is_none()
    {
        return Ok(field_error("career_id", "专业不存在"));
    }

    // 3. 唯一性
    if let Some(response) =
        check_account_conflicts(&storage, &username, &email, document_number.as_deref()).await?
    {
        return Ok(response);
    }

    // 4. 创建用户（学生角色）
    let user = storage
        .create_user(NewUser {
            username,
            email,
            password_hash: hash_password(&register_request.password)?,
            first_name: register_request.first_name.trim().to_string(),
            last_name: register_request.last_name.trim().to_string(),
            document_number,
            faculty_id: None,
            career_id: register_request.career_id,
            roles: vec![RoleCode::Student],
        })
        .await?;

    tracing::info!("Student {} registered", user.username);
    dispatch_job(
        request,
        Job::WelcomeEmail {
            user_id: user.id,
            initial_password: None,
        },
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(user, "注册成功")))
}
