use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use odoo_fhir_core::OperationOutcome;
use odoo_fhir_store::{RowStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::{AppState, audit};

/// Odoo sessions opened by Basic-auth logins, keyed by username.
pub struct SessionCache {
    sessions: HashMap<String, CachedSession>,
    ttl: Duration,
}

struct CachedSession {
    password: String,
    store: Arc<dyn RowStore>,
    established_at: Instant,
}

impl CachedSession {
    fn is_valid_for(&self, password: &str, ttl: Duration) -> bool {
        self.password == password && self.established_at.elapsed() < ttl
    }
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Live session for `username`, only if it was opened with `password`.
    pub fn lookup(&self, username: &str, password: &str) -> Option<Arc<dyn RowStore>> {
        self.sessions
            .get(username)
            .filter(|session| session.is_valid_for(password, self.ttl))
            .map(|session| session.store.clone())
    }

    pub fn insert(&mut self, username: &str, password: &str, store: Arc<dyn RowStore>) {
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.established_at.elapsed() < ttl);
        self.sessions.insert(
            username.to_string(),
            CachedSession {
                password: password.to_string(),
                store,
                established_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Cached session, or a fresh Odoo login when none is usable.
///
/// Logins for the same username are serialised; the cache lock is never held
/// across the Odoo call, so cached users are not kept waiting.
async fn get_session(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<Arc<dyn RowStore>, StoreError> {
    if let Some(store) = state.sessions.read().await.lookup(username, password) {
        return Ok(store);
    }

    let _login = state.shared.locks.lock(&format!("login:{}", username)).await;
    // Another request may have logged in while we waited
    if let Some(store) = state.sessions.read().await.lookup(username, password) {
        return Ok(store);
    }

    let store = state.connector.login(username, password).await?;
    state
        .sessions
        .write()
        .await
        .insert(username, password, store.clone());
    tracing::debug!(username = username, "Opened Odoo session");
    Ok(store)
}

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// The caller's Odoo session, available to handlers behind the middleware.
#[derive(Clone)]
pub struct ErpSession(pub Arc<dyn RowStore>);

fn is_public(path: &str) -> bool {
    path == "/health" || path == "/metadata" || path.starts_with("/.well-known/")
}

fn unauthorized(diagnostics: &str) -> Response {
    let outcome = OperationOutcome::unauthorized(diagnostics);
    (StatusCode::UNAUTHORIZED, axum::Json(outcome)).into_response()
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    if is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let client_ip = audit::client_ip(&request);

    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        audit::log_auth_attempt(&state.audit, &client_ip, None, Some("Missing Authorization header"));
        return Err(unauthorized("Missing Authorization header"));
    };

    let (username, password) = match parse_basic(auth_header) {
        Ok(credentials) => credentials,
        Err(reason) => {
            audit::log_auth_attempt(&state.audit, &client_ip, None, Some(reason));
            return Err(unauthorized(reason));
        }
    };

    let store = match get_session(&state, &username, &password).await {
        Ok(store) => store,
        Err(StoreError::AuthenticationFailed(_)) => {
            audit::log_auth_attempt(&state.audit, &client_ip, Some(&username), Some("Invalid username or password"));
            return Err(unauthorized("Invalid username or password"));
        }
        Err(e) => {
            tracing::error!(username = %username, error = %e, "Odoo login failed");
            audit::log_auth_attempt(&state.audit, &client_ip, Some(&username), Some(&e.to_string()));
            let outcome = OperationOutcome::storage_error(format!("Unable to reach Odoo: {}", e));
            return Err((StatusCode::BAD_GATEWAY, axum::Json(outcome)).into_response());
        }
    };

    audit::log_auth_attempt(&state.audit, &client_ip, Some(&username), None);

    request.extensions_mut().insert(AuthUser { user_id: username });
    request.extensions_mut().insert(ErpSession(store));

    Ok(next.run(request).await)
}

/// Split a `Basic` header into username and password.
fn parse_basic(auth_header: &str) -> Result<(String, String), &'static str> {
    let Some(credentials) = auth_header.strip_prefix("Basic ") else {
        return Err("Invalid Authorization header format. Use 'Basic <credentials>'");
    };

    let decoded = STANDARD
        .decode(credentials.trim())
        .map_err(|_| "Invalid Base64 encoding in Basic auth")?;
    let credentials =
        String::from_utf8(decoded).map_err(|_| "Invalid UTF-8 in Basic auth credentials")?;

    match credentials.split_once(':') {
        Some((username, password)) if !username.is_empty() => {
            Ok((username.to_string(), password.to_string()))
        }
        _ => Err("Invalid Basic auth format. Expected 'username:password'"),
    }
}
