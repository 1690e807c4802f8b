//! Unified API error handling
//!
//! Every endpoint answers failures with the same JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::catalog::CatalogError;
use crate::service::orchestrator::RunError;
use crate::service::proposal::ProcessError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// RFP not found (404)
    #[error("RFP not found: {0}")]
    RfpNotFound(String),

    /// Malformed request or RFP content (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The RFP was processed but no proposal can be built (422)
    #[error("Cannot build proposal: {0}")]
    Unprocessable(String),

    /// The run was cancelled before it finished (504)
    #[error("Processing timed out: {0}")]
    Timeout(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RfpNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::RfpNotFound(_) => "rfp_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unprocessable(_) => "unprocessable",
            ApiError::Timeout(_) => "timeout",
            ApiError::Internal(_) => "internal_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Catalog(CatalogError::RfpNotFound(id)) => ApiError::RfpNotFound(id),
            ProcessError::Catalog(
                e @ (CatalogError::InvalidRfpId(_) | CatalogError::InvalidRfp { .. }),
            ) => ApiError::BadRequest(e.to_string()),
            ProcessError::Catalog(e) => ApiError::Internal(e.to_string()),
            ProcessError::Run(e @ RunError::InvalidInput(_)) => ApiError::BadRequest(e.to_string()),
            ProcessError::Run(e @ (RunError::NoCandidate(_) | RunError::UnknownTest(_))) => {
                ApiError::Unprocessable(e.to_string())
            }
            ProcessError::Run(e @ RunError::Cancelled(_)) => ApiError::Timeout(e.to_string()),
        }
    }
}
