pub mod crud;
pub mod metadata;
pub mod search;

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::AppState;
use crate::auth::ErpSession;
use crate::error::ServiceError;
use crate::services::ServiceContext;

pub const FHIR_JSON: &str = "application/fhir+json; charset=utf-8";

/// Resource types this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Medication,
    InventoryItem,
    ChargeItemDefinition,
    Patient,
    ServiceRequest,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Medication,
        ResourceKind::InventoryItem,
        ResourceKind::ChargeItemDefinition,
        ResourceKind::Patient,
        ResourceKind::ServiceRequest,
    ];

    pub fn parse(resource_type: &str) -> Result<Self, ServiceError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == resource_type)
            .ok_or_else(|| ServiceError::UnknownResourceType(resource_type.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Medication => "Medication",
            ResourceKind::InventoryItem => "InventoryItem",
            ResourceKind::ChargeItemDefinition => "ChargeItemDefinition",
            ResourceKind::Patient => "Patient",
            ResourceKind::ServiceRequest => "ServiceRequest",
        }
    }

    pub fn supports_read(&self) -> bool {
        !matches!(self, ResourceKind::ServiceRequest)
    }

    pub fn supports_search(&self) -> bool {
        matches!(
            self,
            ResourceKind::Medication | ResourceKind::InventoryItem | ResourceKind::ChargeItemDefinition
        )
    }

    pub fn supports_create(&self) -> bool {
        matches!(self, ResourceKind::Patient | ResourceKind::ServiceRequest)
    }
}

/// JSON body with the FHIR media type.
pub fn fhir_response(status: StatusCode, body: &impl Serialize) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(FHIR_JSON))],
        Json(json!(body)),
    )
        .into_response()
}

/// Services bound to the session the auth middleware opened for this request.
pub fn service_context(state: &Arc<AppState>, request: &Request) -> Result<ServiceContext, ServiceError> {
    let Some(ErpSession(store)) = request.extensions().get::<ErpSession>().cloned() else {
        return Err(ServiceError::Unauthorized("No Odoo session".to_string()));
    };
    Ok(ServiceContext::new(store, state.shared.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_parse() {
        assert_eq!(ResourceKind::parse("Patient").unwrap(), ResourceKind::Patient);
        assert!(matches!(
            ResourceKind::parse("Observation"),
            Err(ServiceError::UnknownResourceType(_))
        ));
        assert!(ResourceKind::parse("patient").is_err());
    }

    #[test]
    fn test_interactions() {
        assert!(!ResourceKind::ServiceRequest.supports_read());
        assert!(ResourceKind::ServiceRequest.supports_create());
        assert!(!ResourceKind::Medication.supports_create());
        assert!(!ResourceKind::Patient.supports_search());
    }

    #[test]
    fn test_fhir_response_content_type() {
        let response = fhir_response(StatusCode::OK, &json!({"resourceType": "Bundle"}));
        assert_eq!(response.headers()[header::CONTENT_TYPE], FHIR_JSON);
    }
}
