//! In-process row store that evaluates domains the way Odoo does for the
//! operators the adapter issues.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::row::{Connector, Domain, Operator, Row, RowStore, Term};

pub struct MemoryRowStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    next_id: AtomicI64,
    username: String,
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        Self::new("admin")
    }
}

impl MemoryRowStore {
    pub fn new(username: &str) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            username: username.to_string(),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<Row>>>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Other("memory row store lock poisoned".to_string()))
    }

    /// Store `row` under a fresh id unless it carries one already.
    pub fn insert(&self, model: &str, mut row: Row) -> Result<i64> {
        let id = match row.get("id").and_then(Value::as_i64) {
            Some(id) => {
                self.next_id.fetch_max(id + 1, Ordering::SeqCst);
                id
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                row.insert("id".to_string(), id.into());
                id
            }
        };
        self.lock()?.entry(model.to_string()).or_default().push(row);
        Ok(id)
    }

    pub fn rows(&self, model: &str) -> Result<Vec<Row>> {
        Ok(self.lock()?.get(model).cloned().unwrap_or_default())
    }

    pub fn count(&self, model: &str) -> Result<usize> {
        Ok(self.lock()?.get(model).map_or(0, Vec::len))
    }
}

/// Many2one columns hold `[id, "label"]`; compare on the id.
fn normalise(value: &Value) -> &Value {
    match value {
        Value::Array(items) if items.len() == 2 && items[0].is_i64() && items[1].is_string() => {
            &items[0]
        }
        other => other,
    }
}

static ODOO_FALSE: Value = Value::Bool(false);

fn values_equal(column: Option<&Value>, expected: &Value) -> bool {
    let column = column.map(normalise).unwrap_or(&ODOO_FALSE);
    match (column, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Null, Value::Bool(false)) | (Value::Bool(false), Value::Null) => true,
        (a, b) => a == b,
    }
}

fn text_contains(column: Option<&Value>, pattern: &Value, case_insensitive: bool) -> bool {
    let (Some(Value::String(column)), Value::String(pattern)) = (column, pattern) else {
        return false;
    };
    let pattern = pattern.trim_matches('%');
    if case_insensitive {
        column.to_lowercase().contains(&pattern.to_lowercase())
    } else {
        column.contains(pattern)
    }
}

fn matches(row: &Row, term: &Term) -> bool {
    let column = row.get(&term.field);
    match term.operator {
        Operator::Eq => values_equal(column, &term.value),
        Operator::Ne => !values_equal(column, &term.value),
        Operator::In => match &term.value {
            Value::Array(candidates) => candidates.iter().any(|c| values_equal(column, c)),
            other => values_equal(column, other),
        },
        Operator::Like => text_contains(column, &term.value, false),
        Operator::Ilike => text_contains(column, &term.value, true),
    }
}

/// Odoo hides archived records unless the domain mentions `active`.
fn visible(row: &Row, domain: &Domain) -> bool {
    let filters_active = domain.terms().iter().any(|term| term.field == "active");
    filters_active || row.get("active") != Some(&Value::Bool(false))
}

fn project(row: &Row, fields: &[String]) -> Row {
    if fields.is_empty() {
        return row.clone();
    }
    let mut projected = Row::new();
    for field in fields.iter().map(String::as_str).chain(std::iter::once("id")) {
        if let Some(value) = row.get(field) {
            projected.insert(field.to_string(), value.clone());
        }
    }
    projected
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn search_read(&self, model: &str, domain: &Domain, fields: &[String]) -> Result<Vec<Row>> {
        let tables = self.lock()?;
        let Some(rows) = tables.get(model) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter(|row| visible(row, domain))
            .filter(|row| domain.terms().iter().all(|term| matches(row, term)))
            .map(|row| project(row, fields))
            .collect())
    }

    async fn create(&self, model: &str, mut values: Row) -> Result<i64> {
        values.remove("id");
        self.insert(model, values)
    }

    fn username(&self) -> &str {
        &self.username
    }
}

/// Accepts a single configured login and hands out the shared store.
pub struct MemoryConnector {
    store: Arc<MemoryRowStore>,
    username: String,
    password: String,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryRowStore>, username: &str, password: &str) -> Self {
        Self {
            store,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn store(&self) -> Arc<MemoryRowStore> {
        self.store.clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn login(&self, username: &str, password: &str) -> Result<Arc<dyn RowStore>> {
        if username == self.username && password == self.password {
            Ok(self.store.clone())
        } else {
            Err(StoreError::AuthenticationFailed(username.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn seeded() -> MemoryRowStore {
        let store = MemoryRowStore::default();
        store
            .insert("product.product", row(json!({"name": "Paracetamol", "categ_id": [4, "Drugs"], "active": true})))
            .unwrap();
        store
            .insert("product.product", row(json!({"name": "Gauze", "categ_id": [5, "Supplies"], "active": true})))
            .unwrap();
        store
            .insert("product.product", row(json!({"name": "Old syrup", "categ_id": [4, "Drugs"], "active": false})))
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_many2one_equality_and_archived_rows() {
        let store = seeded();
        let rows = store
            .search_read("product.product", &Domain::new().eq("categ_id", 4), &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Paracetamol");

        let rows = store
            .search_read(
                "product.product",
                &Domain::new().eq("categ_id", 4).eq("active", false),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Old syrup");
    }

    #[tokio::test]
    async fn test_in_ilike_and_projection() {
        let store = seeded();
        let rows = store
            .search_read(
                "product.product",
                &Domain::new().is_in("name", ["Gauze", "Paracetamol"]),
                &["name".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].contains_key("id"));

        let rows = store
            .search_read("product.product", &Domain::new().ilike("name", "gau"), &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryRowStore::default();
        store.insert("res.partner", row(json!({"id": 10, "name": "Seeded"}))).unwrap();
        let first = store.create("res.partner", row(json!({"name": "A"}))).await.unwrap();
        let second = store.create("res.partner", row(json!({"name": "B"}))).await.unwrap();
        assert_eq!(first, 11);
        assert_eq!(second, 12);
        assert_eq!(store.count("res.partner").unwrap(), 3);

        let found = store
            .read_by_id("res.partner", 11, &["name".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], "A");
    }

    #[tokio::test]
    async fn test_missing_column_equals_false() {
        let store = MemoryRowStore::default();
        store.insert("res.partner", row(json!({"name": "No ref"}))).unwrap();
        let rows = store
            .search_read("res.partner", &Domain::new().eq("ref", "abc"), &[])
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_connector_checks_credentials() {
        let connector = MemoryConnector::new(Arc::new(MemoryRowStore::default()), "admin", "secret");
        assert!(connector.login("admin", "secret").await.is_ok());
        assert!(matches!(
            connector.login("admin", "wrong").await,
            Err(StoreError::AuthenticationFailed(_))
        ));
    }
}
