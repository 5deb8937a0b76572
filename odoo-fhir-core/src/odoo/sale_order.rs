use super::row::{self, Row};
use super::{CustomFields, OdooModel, OdooRecord, field_list};
use crate::constants::{MODEL_SALE_ORDER, MODEL_SALE_ORDER_LINE};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleOrder {
    pub record: OdooRecord,
    /// Customer reference; holds the ServiceRequest requisition.
    pub client_order_ref: Option<String>,
    pub state: Option<String>,
    pub partner_id: i64,
    pub type_name: Option<String>,
    pub partner_weight: Option<String>,
    pub partner_birth_date: Option<String>,
    pub partner_external_id: Option<String>,
}

impl OdooModel for SaleOrder {
    const MODEL: &'static str = MODEL_SALE_ORDER;

    fn fields(custom: &CustomFields) -> Vec<String> {
        let mut fields = field_list(&["client_order_ref", "state", "partner_id", "type_name"]);
        fields.push(custom.order_partner_weight.clone());
        fields.push(custom.order_partner_birth_date.clone());
        fields.push(custom.order_partner_external_id.clone());
        fields
    }

    fn from_row(row: &Row, custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            client_order_ref: row::get_str(row, "client_order_ref"),
            state: row::get_str(row, "state"),
            partner_id: row::get_i64(row, "partner_id").unwrap_or_default(),
            type_name: row::get_str(row, "type_name"),
            partner_weight: row::get_str(row, &custom.order_partner_weight),
            partner_birth_date: row::get_str(row, &custom.order_partner_birth_date),
            partner_external_id: row::get_str(row, &custom.order_partner_external_id),
        }
    }

    fn to_row(&self, custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "client_order_ref", self.client_order_ref.clone());
        row::put(&mut row, "state", self.state.clone());
        if self.partner_id != 0 {
            row.insert("partner_id".to_string(), self.partner_id.into());
        }
        row::put(&mut row, "type_name", self.type_name.clone());
        row::put(&mut row, &custom.order_partner_weight, self.partner_weight.clone());
        row::put(&mut row, &custom.order_partner_birth_date, self.partner_birth_date.clone());
        row::put(&mut row, &custom.order_partner_external_id, self.partner_external_id.clone());
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleOrderLine {
    pub record: OdooRecord,
    pub order_id: Option<i64>,
    pub product_id: Option<i64>,
    pub product_uom_qty: Option<f64>,
    pub product_uom: Option<i64>,
}

impl OdooModel for SaleOrderLine {
    const MODEL: &'static str = MODEL_SALE_ORDER_LINE;

    fn fields(_custom: &CustomFields) -> Vec<String> {
        field_list(&["order_id", "product_id", "product_uom_qty", "product_uom"])
    }

    fn from_row(row: &Row, _custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            order_id: row::get_i64(row, "order_id"),
            product_id: row::get_i64(row, "product_id"),
            product_uom_qty: row::get_f64(row, "product_uom_qty"),
            product_uom: row::get_i64(row, "product_uom"),
        }
    }

    fn to_row(&self, _custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "order_id", self.order_id);
        row::put(&mut row, "product_id", self.product_id);
        row::put(&mut row, "product_uom_qty", self.product_uom_qty);
        row::put(&mut row, "product_uom", self.product_uom);
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}
