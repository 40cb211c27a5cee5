use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, check_plan_careers, target_period};
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::models::subjects::requests::{CreateSubjectRequest, validate_subject_fields};
use crate::services::{
    current_scope, current_user, dispatch_job, require_permission, validation_response,
};
use crate::storage::NewSubject;
use crate::tasks::Job;

pub async fn create_subject(
    service: &SubjectService,
    subject_data: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::CREATE_SUBJECT)?;
    let scope = current_scope(request)?;

    if let Err(errors) = validate_subject_fields(
        Some(&subject_data.name),
        Some(&subject_data.code),
        Some(subject_data.credits),
    ) {
        return Ok(validation_response(errors));
    }
    let period = match target_period(&storage, subject_data.period_id).await? {
        Ok(period) => period,
        Err(resp) => return Ok(resp),
    };
    if let Some(resp) = check_plan_careers(&storage, &scope, &subject_data.careers).await? {
        return Ok(resp);
    }

    // 同一学期内代码重复由存储层返回 409
    let subject = storage
        .create_subject(
            NewSubject {
                name: subject_data.name,
                code: subject_data.code,
                description: subject_data.description,
                credits: subject_data.credits,
                period_id: period.id,
            },
            &subject_data.careers,
        )
        .await?;

    tracing::info!(
        "Subject {} created in period {} by {}",
        subject.code,
        period.name,
        user.username
    );
    dispatch_job(
        request,
        Job::SubjectSaved {
            subject_id: subject.id,
            created: true,
        },
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(subject, "课程创建成功")))
}
