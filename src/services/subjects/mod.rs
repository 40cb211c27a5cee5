pub mod create;
pub mod delete;
pub mod get;
pub mod import;
pub mod list;
pub mod plan;
pub mod teachers;
pub mod template;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AcademiaError, Result};
use crate::models::access::AccessScope;
use crate::models::periods::entities::AcademicPeriod;
use crate::models::subjects::requests::{
    AssignTeacherRequest, CreateSubjectRequest, PlanEntryInput, SetPrerequisitesRequest,
    SetSubjectCareersRequest, SubjectImportParams, SubjectListParams, TemplateParams,
    UpdateSubjectRequest, validate_plan_entries,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

use super::{field_error, validation_response};

pub struct SubjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_subjects(
        &self,
        query: SubjectListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_subjects(self, query, request).await
    }

    pub async fn create_subject(
        &self,
        subject_data: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_subject(self, subject_data, request).await
    }

    pub async fn get_subject(
        &self,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_subject(self, subject_id, request).await
    }

    pub async fn update_subject(
        &self,
        subject_id: i64,
        update_data: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_subject(self, subject_id, update_data, request).await
    }

    pub async fn delete_subject(
        &self,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_subject(self, subject_id, request).await
    }

    pub async fn set_careers(
        &self,
        subject_id: i64,
        plan_data: SetSubjectCareersRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        plan::set_careers(self, subject_id, plan_data, request).await
    }

    pub async fn set_prerequisites(
        &self,
        subject_id: i64,
        prerequisite_data: SetPrerequisitesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        plan::set_prerequisites(self, subject_id, prerequisite_data, request).await
    }

    pub async fn assign_teacher(
        &self,
        subject_id: i64,
        teacher_data: AssignTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::assign_teacher(self, subject_id, teacher_data.teacher_id, request).await
    }

    pub async fn unassign_teacher(
        &self,
        subject_id: i64,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        teachers::unassign_teacher(self, subject_id, teacher_id, request).await
    }

    pub async fn import_subjects(
        &self,
        params: SubjectImportParams,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_subjects(self, params, payload, request).await
    }

    pub async fn download_template(&self, params: TemplateParams) -> ActixResult<HttpResponse> {
        template::download_template(params.format.as_deref())
    }
}

pub(crate) fn subject_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubjectNotFound,
        "课程不存在",
    ))
}

/// 课程写操作：课程至少属于一个范围内院系的专业
pub(crate) async fn ensure_subject_writable(
    storage: &Arc<dyn Storage>,
    scope: &AccessScope,
    subject_id: i64,
) -> Result<()> {
    if scope.is_everything() {
        return Ok(());
    }
    let faculties = storage.subject_faculty_ids(subject_id).await?;
    if faculties.iter().any(|f| scope.covers_faculty(*f)) {
        Ok(())
    } else {
        Err(AcademiaError::authorization("课程不在管理范围内"))
    }
}

/// 校验培养方案条目，专业必须存在并且属于范围内院系
///
/// 返回 `Some` 时直接作为响应返回
pub(crate) async fn check_plan_careers(
    storage: &Arc<dyn Storage>,
    scope: &AccessScope,
    entries: &[PlanEntryInput],
) -> Result<Option<HttpResponse>> {
    if let Err(errors) = validate_plan_entries(entries) {
        return Ok(Some(validation_response(errors)));
    }
    if entries.is_empty() && !scope.is_everything() {
        return Ok(Some(field_error("careers", "至少需要关联一个管理范围内的专业")));
    }

    let mut errors = crate::models::FieldErrors::new();
    for (idx, entry) in entries.iter().enumerate() {
        match storage.get_career_by_id(entry.career_id).await? {
            None => {
                errors.insert(format!("careers[{idx}].career_id"), "专业不存在".to_string());
            }
            Some(career) if !scope.covers_faculty(career.faculty_id) => {
                return Err(AcademiaError::authorization(format!(
                    "专业 {} 不在管理范围内",
                    career.code
                )));
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(None)
    } else {
        Ok(Some(validation_response(errors)))
    }
}

/// 请求指定的学期，未指定时取当前激活学期
pub(crate) async fn target_period(
    storage: &Arc<dyn Storage>,
    period_id: Option<i64>,
) -> Result<std::result::Result<AcademicPeriod, HttpResponse>> {
    match period_id {
        Some(id) => Ok(storage
            .get_period_by_id(id)
            .await?
            .ok_or_else(|| field_error("period_id", "学期不存在"))),
        None => Ok(storage.get_active_period().await?.ok_or_else(|| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::NoActivePeriod,
                "当前没有激活的学期，请指定 period_id",
            ))
        })),
    }
}
