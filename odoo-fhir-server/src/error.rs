use axum::{Json, http::StatusCode};
use odoo_fhir_core::{CoreError, IssueType, OperationOutcome};
use odoo_fhir_store::StoreError;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{resource_type}/{id} not found")]
    NotFound { resource_type: String, id: String },

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Resource type {0} is not supported")]
    UnknownResourceType(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        ServiceError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } | ServiceError::UnknownResourceType(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::InvalidRequest(_) | ServiceError::Core(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Store(StoreError::MultipleResults { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Store(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn outcome(&self) -> OperationOutcome {
        match self {
            ServiceError::NotFound { resource_type, id } => {
                OperationOutcome::not_found(resource_type, id)
            }
            ServiceError::Unprocessable(msg) => OperationOutcome::processing(msg.clone()),
            ServiceError::InvalidRequest(msg) => OperationOutcome::invalid_resource(msg.clone()),
            ServiceError::Core(e) => OperationOutcome::invalid_resource(e.to_string()),
            ServiceError::NotSupported(msg) => OperationOutcome::not_supported(msg.clone()),
            ServiceError::Unauthorized(msg) => OperationOutcome::unauthorized(msg.clone()),
            ServiceError::UnknownResourceType(_) => OperationOutcome::not_supported(self.to_string()),
            ServiceError::Config(_) => OperationOutcome::error(IssueType::Exception, self.to_string()),
            ServiceError::Store(StoreError::MultipleResults { .. }) => {
                OperationOutcome::processing(self.to_string())
            }
            ServiceError::Store(e) => OperationOutcome::storage_error(e.to_string()),
        }
    }

    pub fn to_response(&self) -> (StatusCode, Json<Value>) {
        (self.status(), Json(json!(self.outcome())))
    }
}
