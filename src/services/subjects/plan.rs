use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeSet;

use super::{SubjectService, check_plan_careers, ensure_subject_writable, subject_not_found};
use crate::models::roles::entities::perms;
use crate::models::subjects::prerequisites::find_cycle;
use crate::models::subjects::requests::{SetPrerequisitesRequest, SetSubjectCareersRequest};
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::services::{
    current_scope, current_user, dispatch_job, require_permission, validation_response,
};
use crate::tasks::Job;

/// 替换课程所在的专业及学期序号
pub async fn set_careers(
    service: &SubjectService,
    subject_id: i64,
    plan_data: SetSubjectCareersRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_SUBJECT)?;
    let scope = current_scope(request)?;

    if storage.get_subject_by_id(subject_id).await?.is_none() {
        return Ok(subject_not_found());
    }
    ensure_subject_writable(&storage, &scope, subject_id).await?;
    if let Some(resp) = check_plan_careers(&storage, &scope, &plan_data.careers).await? {
        return Ok(resp);
    }

    storage
        .set_subject_careers(subject_id, &plan_data.careers)
        .await?;
    dispatch_job(
        request,
        Job::SubjectSaved {
            subject_id,
            created: false,
        },
    );

    match storage.get_subject_detail(subject_id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "培养方案已更新"))),
        None => Ok(subject_not_found()),
    }
}

/// 替换先修课，先修课必须在同一学期且不能形成环
pub async fn set_prerequisites(
    service: &SubjectService,
    subject_id: i64,
    prerequisite_data: SetPrerequisitesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_SUBJECT)?;

    let Some(subject) = storage.get_subject_by_id(subject_id).await? else {
        return Ok(subject_not_found());
    };
    ensure_subject_writable(&storage, &current_scope(request)?, subject_id).await?;

    let proposed: Vec<i64> = prerequisite_data
        .prerequisite_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut errors = FieldErrors::new();
    for (idx, prerequisite_id) in proposed.iter().enumerate() {
        match storage.get_subject_by_id(*prerequisite_id).await? {
            None => {
                errors.insert(
                    format!("prerequisite_ids[{idx}]"),
                    format!("课程 {prerequisite_id} 不存在"),
                );
            }
            Some(other) if other.period_id != subject.period_id => {
                errors.insert(
                    format!("prerequisite_ids[{idx}]"),
                    format!("先修课 {} 不在同一学期", other.code),
                );
            }
            Some(_) => {}
        }
    }
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }

    let edges = storage.list_prerequisite_edges(subject.period_id).await?;
    if let Some(offending) = find_cycle(subject_id, &proposed, &edges) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PrerequisiteCycle,
            format!("先修课 {offending} 会形成循环依赖"),
        )));
    }

    storage
        .set_subject_prerequisites(subject_id, &proposed)
        .await?;

    match storage.get_subject_detail(subject_id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "先修课已更新"))),
        None => Ok(subject_not_found()),
    }
}
