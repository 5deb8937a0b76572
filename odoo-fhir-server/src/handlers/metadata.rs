use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{ResourceKind, fhir_response};
use crate::AppState;

/// Health check (GET /health)
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "fhirVersion": "4.0.1"
    }))
}

fn resource_entry(kind: ResourceKind) -> Value {
    let mut interactions = Vec::new();
    if kind.supports_read() {
        interactions.push(json!({"code": "read"}));
    }
    if kind.supports_search() {
        interactions.push(json!({"code": "search-type"}));
    }
    if kind.supports_create() {
        interactions.push(json!({"code": "create"}));
    }

    let search_params: Vec<Value> = match kind {
        ResourceKind::InventoryItem | ResourceKind::ChargeItemDefinition => vec![json!({
            "name": "code",
            "type": "token",
            "documentation": "External identifier of the Odoo product",
        })],
        _ => Vec::new(),
    };

    json!({
        "type": kind.as_str(),
        "interaction": interactions,
        "searchParam": search_params,
    })
}

/// CapabilityStatement (GET /metadata)
pub async fn capability_statement(State(state): State<Arc<AppState>>) -> Response {
    let resources: Vec<Value> = ResourceKind::ALL.into_iter().map(resource_entry).collect();

    let statement = json!({
        "resourceType": "CapabilityStatement",
        "status": "active",
        "date": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        "kind": "instance",
        "fhirVersion": "4.0.1",
        "format": ["json"],
        "software": {
            "name": "odoo-fhir",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "implementation": {
            "description": "FHIR R4 facade over Odoo",
            "url": format!(
                "http://{}:{}{}",
                state.config.server.host,
                state.config.server.port,
                state.config.base_path()
            ),
        },
        "rest": [{
            "mode": "server",
            "security": {
                "service": [{
                    "coding": [{
                        "system": "http://terminology.hl7.org/CodeSystem/restful-security-service",
                        "code": "Basic",
                    }]
                }],
                "description": "HTTP Basic authentication with Odoo credentials",
            },
            "resource": resources,
        }]
    });

    fhir_response(StatusCode::OK, &statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_entries() {
        let service_request = resource_entry(ResourceKind::ServiceRequest);
        assert_eq!(service_request["interaction"], json!([{"code": "create"}]));

        let inventory = resource_entry(ResourceKind::InventoryItem);
        assert_eq!(inventory["interaction"].as_array().unwrap().len(), 2);
        assert_eq!(inventory["searchParam"][0]["name"], "code");

        let medication = resource_entry(ResourceKind::Medication);
        assert!(medication["searchParam"].as_array().unwrap().is_empty());
    }
}
