use super::row::{self, Row};
use super::{CustomFields, OdooModel, OdooRecord, field_list};
use crate::constants::MODEL_PRODUCT;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub record: OdooRecord,
    pub description: Option<String>,
    pub uom_name: Option<String>,
    pub quantity_available: Option<f64>,
    pub list_price: Option<f64>,
    pub public_price: Option<f64>,
    pub standard_price: Option<f64>,
    pub active: bool,
    pub code: Option<String>,
    pub currency_id: Option<i64>,
    pub product_type: Option<String>,
    pub concept_source: Option<String>,
    pub concept_code: Option<String>,
    pub category_id: Option<i64>,
}

impl OdooModel for Product {
    const MODEL: &'static str = MODEL_PRODUCT;

    fn fields(_custom: &CustomFields) -> Vec<String> {
        field_list(&[
            "description",
            "uom_name",
            "qty_available",
            "list_price",
            "lst_price",
            "standard_price",
            "active",
            "code",
            "default_code",
            "currency_id",
            "type",
            "x_concept_source",
            "x_concept_code",
            "categ_id",
        ])
    }

    fn from_row(row: &Row, _custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            description: row::get_str(row, "description"),
            uom_name: row::get_str(row, "uom_name"),
            quantity_available: row::get_f64(row, "qty_available"),
            list_price: row::get_f64(row, "list_price"),
            public_price: row::get_f64(row, "lst_price"),
            standard_price: row::get_f64(row, "standard_price"),
            active: row::get_bool(row, "active").unwrap_or(true),
            code: row::get_str(row, "code").or_else(|| row::get_str(row, "default_code")),
            currency_id: row::get_i64(row, "currency_id"),
            product_type: row::get_str(row, "type"),
            concept_source: row::get_str(row, "x_concept_source"),
            concept_code: row::get_str(row, "x_concept_code"),
            category_id: row::get_i64(row, "categ_id"),
        }
    }

    fn to_row(&self, _custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "description", self.description.clone());
        row::put(&mut row, "list_price", self.list_price);
        row::put(&mut row, "standard_price", self.standard_price);
        row.insert("active".to_string(), self.active.into());
        row::put(&mut row, "default_code", self.code.clone());
        row::put(&mut row, "currency_id", self.currency_id);
        row::put(&mut row, "type", self.product_type.clone());
        row::put(&mut row, "x_concept_source", self.concept_source.clone());
        row::put(&mut row, "x_concept_code", self.concept_code.clone());
        row::put(&mut row, "categ_id", self.category_id);
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}
