use axum::extract::{ConnectInfo, Request};
use odoo_fhir_store::{AuditLog, Operation};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::AuthUser;

/// Audit context extracted from HTTP request
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub user_id: Option<String>,
    pub client_ip: String,
}

impl AuditContext {
    pub fn new(user_id: Option<String>, client_ip: String) -> Self {
        Self { user_id, client_ip }
    }

    pub fn from_request(request: &Request) -> Self {
        let user_id = request
            .extensions()
            .get::<AuthUser>()
            .map(|u| u.user_id.clone());

        Self {
            user_id,
            client_ip: client_ip(request),
        }
    }
}

pub fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

struct PendingEntry {
    operation: Operation,
    resource_type: Option<String>,
    resource_id: Option<String>,
    user_id: Option<String>,
    client_ip: String,
    error: Option<String>,
}

/// Write to the database in a spawned task so requests never wait on SQLite.
fn persist(audit_log: &Arc<Mutex<AuditLog>>, entry: PendingEntry) {
    let audit_log = Arc::clone(audit_log);
    tokio::spawn(async move {
        let audit = audit_log.lock().await;
        let result = audit.log(
            entry.operation,
            entry.resource_type.as_deref(),
            entry.resource_id.as_deref(),
            None,
            entry.user_id.as_deref(),
            Some(&entry.client_ip),
            entry.error.as_deref(),
        );
        if let Err(e) = result {
            tracing::error!("Failed to write audit log to database: {}", e);
        }
    });
}

pub fn log_operation_success(
    context: &AuditContext,
    operation: Operation,
    resource_type: &str,
    resource_id: Option<&str>,
    audit_log: &Arc<Mutex<AuditLog>>,
) {
    tracing::info!(
        user_id = context.user_id.as_deref().unwrap_or("anonymous"),
        client_ip = %context.client_ip,
        operation = operation.as_str(),
        resource_type = resource_type,
        resource_id = resource_id.unwrap_or("-"),
        status = "success",
        "Audit: {} {}",
        operation.as_str(),
        resource_type
    );

    persist(
        audit_log,
        PendingEntry {
            operation,
            resource_type: Some(resource_type.to_string()),
            resource_id: resource_id.map(str::to_string),
            user_id: context.user_id.clone(),
            client_ip: context.client_ip.clone(),
            error: None,
        },
    );
}

pub fn log_operation_error(
    context: &AuditContext,
    operation: Operation,
    resource_type: &str,
    resource_id: Option<&str>,
    error: &str,
    audit_log: &Arc<Mutex<AuditLog>>,
) {
    tracing::warn!(
        user_id = context.user_id.as_deref().unwrap_or("anonymous"),
        client_ip = %context.client_ip,
        operation = operation.as_str(),
        resource_type = resource_type,
        resource_id = resource_id.unwrap_or("-"),
        status = "error",
        error = error,
        "Audit: {} {} failed: {}",
        operation.as_str(),
        resource_type,
        error
    );

    persist(
        audit_log,
        PendingEntry {
            operation,
            resource_type: Some(resource_type.to_string()),
            resource_id: resource_id.map(str::to_string),
            user_id: context.user_id.clone(),
            client_ip: context.client_ip.clone(),
            error: Some(error.to_string()),
        },
    );
}

pub fn log_auth_attempt(
    audit_log: &Arc<Mutex<AuditLog>>,
    client_ip: &str,
    user_id: Option<&str>,
    error: Option<&str>,
) {
    match error {
        None => tracing::info!(
            user_id = user_id.unwrap_or("unknown"),
            client_ip = %client_ip,
            status = "success",
            "Audit: Authentication successful"
        ),
        Some(error) => tracing::warn!(
            user_id = user_id.unwrap_or("unknown"),
            client_ip = %client_ip,
            status = "failed",
            error = error,
            "Audit: Authentication failed"
        ),
    }

    persist(
        audit_log,
        PendingEntry {
            operation: Operation::Login,
            resource_type: None,
            resource_id: None,
            user_id: user_id.map(str::to_string),
            client_ip: client_ip.to_string(),
            error: error.map(str::to_string),
        },
    );
}
