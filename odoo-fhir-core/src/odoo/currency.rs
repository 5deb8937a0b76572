use super::row::{self, Row};
use super::{CustomFields, OdooModel, OdooRecord, field_list};
use crate::constants::MODEL_CURRENCY;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Currency {
    pub record: OdooRecord,
    pub symbol: Option<String>,
    pub active: Option<bool>,
    pub currency_unit_label: Option<String>,
    pub currency_subunit_label: Option<String>,
    pub decimal_places: Option<i64>,
}

impl OdooModel for Currency {
    const MODEL: &'static str = MODEL_CURRENCY;

    fn fields(_custom: &CustomFields) -> Vec<String> {
        field_list(&[
            "symbol",
            "active",
            "currency_unit_label",
            "currency_subunit_label",
            "decimal_places",
        ])
    }

    fn from_row(row: &Row, _custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            symbol: row::get_str(row, "symbol"),
            active: row::get_bool(row, "active"),
            currency_unit_label: row::get_str(row, "currency_unit_label"),
            currency_subunit_label: row::get_str(row, "currency_subunit_label"),
            decimal_places: row::get_i64(row, "decimal_places"),
        }
    }

    fn to_row(&self, _custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "symbol", self.symbol.clone());
        row::put(&mut row, "active", self.active);
        row::put(&mut row, "currency_unit_label", self.currency_unit_label.clone());
        row::put(&mut row, "currency_subunit_label", self.currency_subunit_label.clone());
        row::put(&mut row, "decimal_places", self.decimal_places);
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}
