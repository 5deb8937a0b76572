//! Column-keyed ERP rows and tolerant accessors.
//!
//! Odoo answers `false` for every empty column regardless of its type, so all
//! accessors except [`get_bool`] treat `false` like a missing value.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::date::parse_odoo_datetime;

pub type Row = serde_json::Map<String, Value>;

fn present<'a>(row: &'a Row, key: &str) -> Option<&'a Value> {
    match row.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(value) => Some(value),
    }
}

pub fn get_str(row: &Row, key: &str) -> Option<String> {
    match present(row, key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer column; a many2one `[id, "label"]` pair yields its id.
pub fn get_i64(row: &Row, key: &str) -> Option<i64> {
    match present(row, key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Array(items) => items.first().and_then(Value::as_i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn get_f64(row: &Row, key: &str) -> Option<f64> {
    match present(row, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn get_bool(row: &Row, key: &str) -> Option<bool> {
    row.get(key).and_then(Value::as_bool)
}

pub fn get_many2one(row: &Row, key: &str) -> Option<(i64, Option<String>)> {
    match present(row, key)? {
        Value::Array(items) => {
            let id = items.first().and_then(Value::as_i64)?;
            let label = items.get(1).and_then(Value::as_str).map(str::to_string);
            Some((id, label))
        }
        Value::Number(n) => n.as_i64().map(|id| (id, None)),
        _ => None,
    }
}

pub fn get_datetime(row: &Row, key: &str) -> Option<DateTime<Utc>> {
    get_str(row, key).and_then(|value| parse_odoo_datetime(&value))
}

/// Insert `value` under `key` when it is present.
pub fn put<T: Into<Value>>(row: &mut Row, key: &str, value: Option<T>) {
    if let Some(value) = value {
        row.insert(key.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_false_and_null_are_absent() {
        let r = row(json!({"name": false, "city": null, "zip": "256"}));
        assert_eq!(get_str(&r, "name"), None);
        assert_eq!(get_str(&r, "city"), None);
        assert_eq!(get_str(&r, "missing"), None);
        assert_eq!(get_str(&r, "zip"), Some("256".to_string()));
    }

    #[test]
    fn test_many2one_yields_id() {
        let r = row(json!({"country_id": [226, "Uganda"], "categ_id": 5, "uom": false}));
        assert_eq!(get_i64(&r, "country_id"), Some(226));
        assert_eq!(get_i64(&r, "categ_id"), Some(5));
        assert_eq!(get_i64(&r, "uom"), None);
        assert_eq!(
            get_many2one(&r, "country_id"),
            Some((226, Some("Uganda".to_string())))
        );
    }

    #[test]
    fn test_bool_keeps_false() {
        let r = row(json!({"active": false, "noupdate": true}));
        assert_eq!(get_bool(&r, "active"), Some(false));
        assert_eq!(get_bool(&r, "noupdate"), Some(true));
        assert_eq!(get_bool(&r, "missing"), None);
    }

    #[test]
    fn test_numbers() {
        let r = row(json!({"price": 12.5, "qty": 3, "text": "7.25"}));
        assert_eq!(get_f64(&r, "price"), Some(12.5));
        assert_eq!(get_f64(&r, "qty"), Some(3.0));
        assert_eq!(get_f64(&r, "text"), Some(7.25));
    }

    #[test]
    fn test_put_skips_none() {
        let mut r = Row::new();
        put(&mut r, "name", Some("x"));
        put::<String>(&mut r, "city", None);
        assert_eq!(r.len(), 1);
    }
}
