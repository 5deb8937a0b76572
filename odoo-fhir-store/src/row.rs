//! The row store seam: filtered search and create against named Odoo models.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
pub use odoo_fhir_core::odoo::row::{
    Row, get_bool, get_datetime, get_f64, get_i64, get_many2one, get_str,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    In,
    Like,
    Ilike,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::In => "in",
            Operator::Like => "like",
            Operator::Ilike => "ilike",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

/// An Odoo search domain; terms are implicitly AND-ed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    terms: Vec<Term>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, field: &str, operator: Operator, value: impl Into<Value>) -> Self {
        self.terms.push(Term {
            field: field.to_string(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.term(field, Operator::Eq, value)
    }

    pub fn ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.term(field, Operator::Ne, value)
    }

    pub fn is_in<V: Into<Value>>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.term(field, Operator::In, Value::Array(values))
    }

    pub fn ilike(self, field: &str, value: impl Into<Value>) -> Self {
        self.term(field, Operator::Ilike, value)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// `[[field, operator, value], ...]`, the form `search_read` expects.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.terms
                .iter()
                .map(|term| {
                    Value::Array(vec![
                        Value::String(term.field.clone()),
                        Value::String(term.operator.as_str().to_string()),
                        term.value.clone(),
                    ])
                })
                .collect(),
        )
    }
}

/// An authenticated handle on an Odoo database.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn search_read(&self, model: &str, domain: &Domain, fields: &[String]) -> Result<Vec<Row>>;

    /// Create one record and return its id.
    async fn create(&self, model: &str, values: Row) -> Result<i64>;

    async fn read_by_id(&self, model: &str, id: i64, fields: &[String]) -> Result<Option<Row>> {
        let rows = self
            .search_read(model, &Domain::new().eq("id", id), fields)
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Login the handle was opened for.
    fn username(&self) -> &str;
}

/// Opens row store sessions from user credentials.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Arc<dyn RowStore>>;
}
