use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::requests::WeightsParams;
use crate::models::assignments::weights::WeightSummary;
use crate::services::current_scope;
use crate::services::subjects::subject_not_found;

/// 课程权重使用情况（包括草稿）
pub async fn get_weights(
    service: &AssignmentService,
    query: WeightsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    if storage.get_subject_by_id(query.subject_id).await?.is_none()
        || !storage.subject_in_scope(scope, query.subject_id).await?
    {
        return Ok(subject_not_found());
    }

    let total = storage.subject_weight_total(query.subject_id, None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        WeightSummary::new(query.subject_id, total),
        "查询成功",
    )))
}
