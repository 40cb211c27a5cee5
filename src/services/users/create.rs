use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, check_account_conflicts};
use crate::models::roles::entities::{RoleCode, perms};
use crate::models::users::requests::{CreateUserRequest, NewUser};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, dispatch_job, require_permission, validation_response};
use crate::tasks::Job;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use crate::utils::validate::validate_account_fields;

const GENERATED_PASSWORD_LEN: usize = 12;

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let actor = current_user(request)?;
    require_permission(&actor, perms::CREATE_USER)?;

    let mut roles = user_data.roles;
    if roles.is_empty() {
        roles.push(RoleCode::Student);
    }
    roles.sort();
    roles.dedup();
    if !actor.is_super_admin() && !roles.iter().all(|r| r.is_managed_by_admin()) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能创建学生或教师账号",
        )));
    }

    let username = user_data.username.trim().to_string();
    let email = user_data.email.trim().to_lowercase();
    let document_number = user_data
        .document_number
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    // 未提供密码时生成随机密码并通过邮件告知
    let (password, generated) = match user_data.password {
        Some(password) => (password, false),
        None => (generate_password(GENERATED_PASSWORD_LEN), true),
    };

    let mut errors =
        validate_account_fields(&username, &email, &password, document_number.as_deref())
            .err()
            .unwrap_or_default();
    if let Some(faculty_id) = user_data.faculty_id
        && storage.get_faculty_by_id(faculty_id).await?.is_none()
    {
        errors.insert("faculty_id".to_string(), "院系不存在".to_string());
    }
    if let Some(career_id) = user_data.career_id
        && storage.get_career_by_id(career_id).await?.is_none()
    {
        errors.insert("career_id".to_string(), "专业不存在".to_string());
    }
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }

    if let Some(response) =
        check_account_conflicts(&storage, &username, &email, document_number.as_deref()).await?
    {
        return Ok(response);
    }

    let user = storage
        .create_user(NewUser {
            username,
            email,
            password_hash: hash_password(&password)?,
            first_name: user_data.first_name.trim().to_string(),
            last_name: user_data.last_name.trim().to_string(),
            document_number,
            faculty_id: user_data.faculty_id,
            career_id: user_data.career_id,
            roles,
        })
        .await?;

    tracing::info!("User {} created by {}", user.username, actor.username);
    dispatch_job(
        request,
        Job::WelcomeEmail {
            user_id: user.id,
            initial_password: generated.then_some(password),
        },
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(user, "用户创建成功")))
}
