use utoipa::OpenApi;

use crate::dto::{
    CalculateRequest, CalculateResponse, CompleteTaskRequest, CompleteTaskResponse,
    ExpressionDto, ExpressionListResponse, ExpressionResponse, HealthResponse, TaskResponseDto,
};
use crate::http_error::ErrorBody;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::calculate::calculate,
        routes::expressions::list,
        routes::expressions::get_by_id,
        routes::internal_task::pull,
        routes::internal_task::post_result,
        routes::health::health,
    ),
    components(schemas(
        CalculateRequest,
        CalculateResponse,
        ExpressionDto,
        ExpressionListResponse,
        ExpressionResponse,
        TaskResponseDto,
        CompleteTaskRequest,
        CompleteTaskResponse,
        HealthResponse,
        ErrorBody,
    )),
    tags((name = "exprsched", description = "Distributed arithmetic expression scheduler"))
)]
pub struct ApiDoc;
