use axum::{
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use http_body_util::BodyExt;
use odoo_fhir_core::{CoreError, FhirResource};
use odoo_fhir_store::Operation;
use serde_json::Value;
use std::sync::Arc;

use super::{ResourceKind, fhir_response, service_context};
use crate::AppState;
use crate::audit::{self, AuditContext};
use crate::error::ServiceError;
use crate::services::{
    ChargeItemDefinitionService, FhirService, InventoryItemService, MedicationService,
    PatientService, ServiceContext, ServiceRequestService,
};

async fn read_with<S>(service: S, id: &str) -> Result<FhirResource, ServiceError>
where
    S: FhirService,
    S::Resource: Into<FhirResource>,
{
    service
        .get_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::not_found(S::RESOURCE_TYPE, id))
}

async fn read_resource(ctx: ServiceContext, kind: ResourceKind, id: &str) -> Result<FhirResource, ServiceError> {
    match kind {
        ResourceKind::Medication => read_with(MedicationService::new(ctx), id).await,
        ResourceKind::InventoryItem => read_with(InventoryItemService::new(ctx), id).await,
        ResourceKind::ChargeItemDefinition => {
            read_with(ChargeItemDefinitionService::new(ctx), id).await
        }
        ResourceKind::Patient => read_with(PatientService::new(ctx), id).await,
        ResourceKind::ServiceRequest => Err(ServiceError::NotSupported(format!(
            "read is not supported for {}",
            kind.as_str()
        ))),
    }
}

/// Read resource (GET /{resource_type}/{id})
pub async fn read(
    State(state): State<Arc<AppState>>,
    Path((resource_type, id)): Path<(String, String)>,
    request: Request,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let audit_ctx = AuditContext::from_request(&request);

    let result = match ResourceKind::parse(&resource_type) {
        Ok(kind) => match service_context(&state, &request) {
            Ok(ctx) => read_resource(ctx, kind, &id).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(resource) => {
            audit::log_operation_success(&audit_ctx, Operation::Read, &resource_type, Some(&id), &state.audit);
            Ok(fhir_response(StatusCode::OK, &resource))
        }
        Err(e) => {
            audit::log_operation_error(&audit_ctx, Operation::Read, &resource_type, Some(&id), &e.to_string(), &state.audit);
            Err(e.to_response())
        }
    }
}

/// Parse a request body as the resource type named in the path.
async fn extract_resource(request: Request, kind: ResourceKind) -> Result<FhirResource, ServiceError> {
    let bytes = request
        .into_body()
        .collect()
        .await
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?
        .to_bytes();

    let body: Value = serde_json::from_slice(&bytes).map_err(CoreError::from)?;
    match body.get("resourceType").and_then(Value::as_str) {
        Some(found) if found == kind.as_str() => {}
        Some(found) => {
            return Err(ServiceError::InvalidRequest(format!(
                "resourceType mismatch: expected {}, got {}",
                kind.as_str(),
                found
            )));
        }
        None => return Err(ServiceError::InvalidRequest("resourceType is missing".to_string())),
    }

    Ok(serde_json::from_value(body).map_err(CoreError::from)?)
}

async fn create_resource(ctx: ServiceContext, resource: FhirResource) -> Result<FhirResource, ServiceError> {
    match resource {
        FhirResource::Patient(patient) => Ok(PatientService::new(ctx).create(patient).await?.into()),
        FhirResource::ServiceRequest(service_request) => Ok(ServiceRequestService::new(ctx)
            .create(service_request)
            .await?
            .into()),
        other => Err(ServiceError::NotSupported(format!(
            "create is not supported for {}",
            other.resource_type()
        ))),
    }
}

/// Create resource (POST /{resource_type})
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(resource_type): Path<String>,
    request: Request,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let audit_ctx = AuditContext::from_request(&request);

    let result = match ResourceKind::parse(&resource_type) {
        Ok(kind) if !kind.supports_create() => Err(ServiceError::NotSupported(format!(
            "create is not supported for {}",
            kind.as_str()
        ))),
        Ok(kind) => match service_context(&state, &request) {
            Ok(ctx) => match extract_resource(request, kind).await {
                Ok(resource) => create_resource(ctx, resource).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(resource) => {
            let id = resource.id().map(str::to_string);
            audit::log_operation_success(&audit_ctx, Operation::Create, &resource_type, id.as_deref(), &state.audit);

            let mut response = fhir_response(StatusCode::CREATED, &resource);
            if let Some(id) = id {
                let location = format!("{}/{}/{}", state.config.base_path(), resource_type, id);
                if let Ok(value) = HeaderValue::from_str(&location) {
                    response.headers_mut().insert(header::LOCATION, value);
                }
            }
            Ok(response.into_response())
        }
        Err(e) => {
            audit::log_operation_error(&audit_ctx, Operation::Create, &resource_type, None, &e.to_string(), &state.audit);
            Err(e.to_response())
        }
    }
}
