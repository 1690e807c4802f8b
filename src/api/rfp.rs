//! REST API endpoint for processing an RFP into a proposal

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::RunResult;
use crate::service::RfpService;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Id of an RFP in the data directory, e.g. `rfp1`
    pub rfp_id: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        process_rfp,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(ProcessRequest, RunResult, ErrorResponse)),
    tags(
        (name = "rfp", description = "RFP evaluation and proposal generation"),
        (name = "health", description = "Health checks")
    ),
    info(
        title = "RFP Proposal Agent",
        description = "Matches RFP requirements against the product catalog, classifies suitability, prices the winning product and runs proposal analysis"
    )
)]
pub struct ApiDoc;

/// Run the full workflow for one RFP
///
/// A `not_suitable` verdict is a successful response with no pricing and no analyses.
#[utoipa::path(
    post,
    path = "/v1/rfp/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "RFP processed", body = RunResult),
        (status = 400, description = "Invalid RFP", body = ErrorResponse),
        (status = 404, description = "RFP not found", body = ErrorResponse),
        (status = 422, description = "No proposal can be built", body = ErrorResponse),
        (status = 504, description = "Processing timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "rfp"
)]
#[post("/v1/rfp/process")]
pub async fn process_rfp(
    service: web::Data<RfpService>,
    body: web::Json<ProcessRequest>,
) -> Result<HttpResponse, ApiError> {
    let rfp_id = body.into_inner().rfp_id;
    if rfp_id.trim().is_empty() {
        return Err(ApiError::BadRequest("rfp_id must not be empty".to_string()));
    }

    tracing::info!(rfp = %rfp_id, "Processing RFP");
    let result = service.process(&rfp_id).await?;

    Ok(HttpResponse::Ok().json(result))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(process_rfp);
}
