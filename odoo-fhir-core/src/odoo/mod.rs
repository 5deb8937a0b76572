//! Typed Odoo models and their row conversions.

mod country;
mod currency;
mod ext_id;
mod partner;
mod product;
pub mod row;
mod sale_order;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::to_odoo_datetime;
pub use country::{Country, CountryState};
pub use currency::Currency;
pub use ext_id::ExtId;
pub use partner::Partner;
pub use product::Product;
pub use row::Row;
pub use sale_order::{SaleOrder, SaleOrderLine};

/// Names of the site-specific custom columns on partners and sale orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFields {
    pub partner_birth_date: String,
    pub partner_external_id: String,
    pub order_partner_weight: String,
    pub order_partner_birth_date: String,
    pub order_partner_external_id: String,
}

impl Default for CustomFields {
    fn default() -> Self {
        Self {
            partner_birth_date: "x_dob".to_string(),
            partner_external_id: "x_external_id".to_string(),
            order_partner_weight: "x_customer_weight".to_string(),
            order_partner_birth_date: "x_customer_dob".to_string(),
            order_partner_external_id: "x_external_identifier".to_string(),
        }
    }
}

/// Columns every Odoo model carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OdooRecord {
    pub id: i64,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
    pub last_updated_on: Option<DateTime<Utc>>,
    pub last_updated_by: Option<i64>,
    pub last_modified_on: Option<DateTime<Utc>>,
}

impl OdooRecord {
    pub const FIELDS: [&'static str; 7] = [
        "id",
        "name",
        "display_name",
        "create_date",
        "create_uid",
        "write_date",
        "write_uid",
    ];

    /// Columns Odoo maintains itself and that must never be sent on create.
    pub const MAGIC_COLUMNS: [&'static str; 7] = [
        "id",
        "display_name",
        "create_date",
        "create_uid",
        "write_date",
        "write_uid",
        "__last_update",
    ];

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row::get_i64(row, "id").unwrap_or_default(),
            name: row::get_str(row, "name"),
            display_name: row::get_str(row, "display_name"),
            created_on: row::get_datetime(row, "create_date"),
            created_by: row::get_i64(row, "create_uid"),
            last_updated_on: row::get_datetime(row, "write_date"),
            last_updated_by: row::get_i64(row, "write_uid"),
            last_modified_on: row::get_datetime(row, "__last_update"),
        }
    }

    pub fn write_into(&self, row: &mut Row) {
        if self.id != 0 {
            row.insert("id".to_string(), self.id.into());
        }
        row::put(row, "name", self.name.clone());
        row::put(row, "display_name", self.display_name.clone());
        row::put(row, "create_date", self.created_on.as_ref().map(to_odoo_datetime));
        row::put(row, "create_uid", self.created_by);
        row::put(row, "write_date", self.last_updated_on.as_ref().map(to_odoo_datetime));
        row::put(row, "write_uid", self.last_updated_by);
    }

    /// Display name, falling back to the plain name.
    pub fn label(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.name.as_deref())
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified_on.or(self.last_updated_on)
    }
}

/// A typed view over one Odoo model.
pub trait OdooModel: Sized + Send + Sync + 'static {
    const MODEL: &'static str;

    /// Columns requested from Odoo on reads.
    fn fields(custom: &CustomFields) -> Vec<String>;

    fn from_row(row: &Row, custom: &CustomFields) -> Self;

    fn to_row(&self, custom: &CustomFields) -> Row;

    fn record(&self) -> &OdooRecord;

    fn id(&self) -> i64 {
        self.record().id
    }
}

pub(crate) fn field_list(specific: &[&str]) -> Vec<String> {
    OdooRecord::FIELDS
        .iter()
        .chain(specific.iter())
        .map(|field| field.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_row_reads_audit_header() {
        let row = json!({
            "id": 7,
            "name": "Paracetamol",
            "display_name": "[P01] Paracetamol",
            "create_uid": [2, "Admin"],
            "write_date": "2024-05-01 10:00:00",
            "write_uid": false
        });
        let record = OdooRecord::from_row(row.as_object().unwrap());
        assert_eq!(record.id, 7);
        assert_eq!(record.created_by, Some(2));
        assert_eq!(record.last_updated_by, None);
        assert_eq!(record.label(), Some("[P01] Paracetamol"));
        assert!(record.last_modified().is_some());
    }

    #[test]
    fn test_record_write_into_skips_unset() {
        let mut row = Row::new();
        OdooRecord::named("Kampala").write_into(&mut row);
        assert_eq!(row.len(), 1);
        assert_eq!(row["name"], "Kampala");
    }

    #[test]
    fn test_custom_fields_defaults_and_partial_yaml() {
        let fields: CustomFields =
            serde_json::from_value(json!({"partner_birth_date": "x_birthdate"})).unwrap();
        assert_eq!(fields.partner_birth_date, "x_birthdate");
        assert_eq!(fields.partner_external_id, "x_external_id");
        assert_eq!(fields.order_partner_external_id, "x_external_identifier");
    }
}
