use axum::{
    extract::{Path, RawQuery, Request, State},
    http::StatusCode,
    response::{Json, Response},
};
use odoo_fhir_core::{Bundle, TokenAndListParam};
use odoo_fhir_store::Operation;
use serde_json::Value;
use std::sync::Arc;

use super::{ResourceKind, fhir_response, service_context};
use crate::AppState;
use crate::audit::{self, AuditContext};
use crate::error::ServiceError;
use crate::services::{
    ChargeItemDefinitionService, InventoryItemService, MedicationService, ServiceContext,
};

/// `code` tokens of the query, flattened across AND and OR.
fn requested_codes(query: Option<&str>) -> Result<Vec<String>, ServiceError> {
    let codes = TokenAndListParam::parse(query.unwrap_or_default(), "code")
        .map_err(ServiceError::InvalidRequest)?;
    Ok(codes.codes())
}

async fn search_resources(
    ctx: ServiceContext,
    kind: ResourceKind,
    query: Option<&str>,
) -> Result<Bundle, ServiceError> {
    match kind {
        ResourceKind::Medication => MedicationService::new(ctx).get_all_medications().await,
        ResourceKind::InventoryItem => {
            let codes = requested_codes(query)?;
            InventoryItemService::new(ctx).search(&codes).await
        }
        ResourceKind::ChargeItemDefinition => {
            let codes = requested_codes(query)?;
            ChargeItemDefinitionService::new(ctx).search(&codes).await
        }
        ResourceKind::Patient | ResourceKind::ServiceRequest => Err(ServiceError::NotSupported(
            format!("search is not supported for {}", kind.as_str()),
        )),
    }
}

/// Search (GET /{resource_type}?...)
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(resource_type): Path<String>,
    RawQuery(query): RawQuery,
    request: Request,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let audit_ctx = AuditContext::from_request(&request);

    let result = match ResourceKind::parse(&resource_type) {
        Ok(kind) => match service_context(&state, &request) {
            Ok(ctx) => search_resources(ctx, kind, query.as_deref()).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(bundle) => {
            tracing::debug!(resource_type = %resource_type, total = bundle.len(), "Search completed");
            audit::log_operation_success(&audit_ctx, Operation::Search, &resource_type, None, &state.audit);
            Ok(fhir_response(StatusCode::OK, &bundle))
        }
        Err(e) => {
            audit::log_operation_error(&audit_ctx, Operation::Search, &resource_type, None, &e.to_string(), &state.audit);
            Err(e.to_response())
        }
    }
}
