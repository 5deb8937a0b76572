use super::row::{self, Row};
use super::{CustomFields, OdooModel, OdooRecord, field_list};
use crate::constants::{MODEL_COUNTRY, MODEL_COUNTRY_STATE};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    pub record: OdooRecord,
    pub code: Option<String>,
}

impl OdooModel for Country {
    const MODEL: &'static str = MODEL_COUNTRY;

    fn fields(_custom: &CustomFields) -> Vec<String> {
        field_list(&["code"])
    }

    fn from_row(row: &Row, _custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            code: row::get_str(row, "code"),
        }
    }

    fn to_row(&self, _custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "code", self.code.clone());
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryState {
    pub record: OdooRecord,
    pub code: Option<String>,
    pub country_id: Option<i64>,
}

impl OdooModel for CountryState {
    const MODEL: &'static str = MODEL_COUNTRY_STATE;

    fn fields(_custom: &CustomFields) -> Vec<String> {
        field_list(&["code", "country_id"])
    }

    fn from_row(row: &Row, _custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            code: row::get_str(row, "code"),
            country_id: row::get_i64(row, "country_id"),
        }
    }

    fn to_row(&self, _custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "code", self.code.clone());
        row::put(&mut row, "country_id", self.country_id);
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}
