use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::codec::{decode_response, encode_call};
use crate::error::{Result, StoreError};
use crate::row::{Connector, Domain, Row, RowStore};

/// Connection settings for one Odoo database, shared by every session.
#[derive(Debug, Clone)]
pub struct OdooConnector {
    base_url: String,
    database: String,
    http: reqwest::Client,
}

impl OdooConnector {
    pub fn new(url: &str, database: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            database: database.to_string(),
            http,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    async fn call(&self, service: &str, method: &str, params: &[Value]) -> Result<Value> {
        let url = format!("{}/xmlrpc/2/{}", self.base_url, service);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "text/xml")
            .body(encode_call(method, params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Protocol(format!(
                "{} answered HTTP {}",
                url, status
            )));
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}

#[async_trait]
impl Connector for OdooConnector {
    async fn login(&self, username: &str, password: &str) -> Result<Arc<dyn RowStore>> {
        let uid = self
            .call(
                "common",
                "authenticate",
                &[json!(self.database), json!(username), json!(password), json!({})],
            )
            .await?;

        match uid.as_i64() {
            Some(uid) if uid > 0 => {
                info!(user = %username, uid, database = %self.database, "Authenticated with Odoo");
                Ok(Arc::new(OdooSession {
                    connector: self.clone(),
                    uid,
                    username: username.to_string(),
                    password: password.to_string(),
                }))
            }
            _ => {
                warn!(user = %username, database = %self.database, "Odoo rejected credentials");
                Err(StoreError::AuthenticationFailed(username.to_string()))
            }
        }
    }
}

/// An authenticated Odoo user; every call goes through `execute_kw`.
pub struct OdooSession {
    connector: OdooConnector,
    uid: i64,
    username: String,
    password: String,
}

impl OdooSession {
    pub fn uid(&self) -> i64 {
        self.uid
    }

    async fn execute_kw(&self, model: &str, method: &str, args: Vec<Value>, kwargs: Value) -> Result<Value> {
        debug!(model = %model, method = %method, "execute_kw");
        self.connector
            .call(
                "object",
                "execute_kw",
                &[
                    json!(self.connector.database),
                    json!(self.uid),
                    json!(self.password),
                    json!(model),
                    json!(method),
                    Value::Array(args),
                    kwargs,
                ],
            )
            .await
    }
}

#[async_trait]
impl RowStore for OdooSession {
    async fn search_read(&self, model: &str, domain: &Domain, fields: &[String]) -> Result<Vec<Row>> {
        let result = self
            .execute_kw(model, "search_read", vec![domain.to_value()], json!({ "fields": fields }))
            .await?;

        match result {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(row) => Ok(row),
                    other => Err(StoreError::Protocol(format!(
                        "search_read on {} returned a non-record item: {}",
                        model, other
                    ))),
                })
                .collect(),
            other => Err(StoreError::Protocol(format!(
                "search_read on {} returned {}",
                model, other
            ))),
        }
    }

    async fn create(&self, model: &str, values: Row) -> Result<i64> {
        let result = self
            .execute_kw(model, "create", vec![Value::Object(values)], json!({}))
            .await?;

        // Odoo 17 answers a list of ids when given a list of values.
        let id = match &result {
            Value::Array(ids) => ids.first().and_then(Value::as_i64),
            other => other.as_i64(),
        };
        id.ok_or_else(|| StoreError::Protocol(format!("create on {} returned {}", model, result)))
    }

    fn username(&self) -> &str {
        &self.username
    }
}
