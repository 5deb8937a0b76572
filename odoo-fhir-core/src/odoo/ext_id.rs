use super::row::{self, Row};
use super::{CustomFields, OdooModel, OdooRecord, field_list};
use crate::constants::MODEL_EXTERNAL_IDENTIFIER;

/// An `ir.model.data` row: a named, module-scoped pointer at another record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtId {
    pub record: OdooRecord,
    pub complete_name: Option<String>,
    pub model: Option<String>,
    pub module: Option<String>,
    pub res_id: i64,
    pub noupdate: bool,
    pub reference: Option<String>,
}

impl ExtId {
    pub fn new(module: &str, model: &str, res_id: i64, name: impl Into<String>) -> Self {
        Self {
            record: OdooRecord::named(name),
            model: Some(model.to_string()),
            module: Some(module.to_string()),
            res_id,
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }
}

impl OdooModel for ExtId {
    const MODEL: &'static str = MODEL_EXTERNAL_IDENTIFIER;

    fn fields(_custom: &CustomFields) -> Vec<String> {
        field_list(&["complete_name", "model", "module", "res_id", "noupdate", "reference"])
    }

    fn from_row(row: &Row, _custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            complete_name: row::get_str(row, "complete_name"),
            model: row::get_str(row, "model"),
            module: row::get_str(row, "module"),
            res_id: row::get_i64(row, "res_id").unwrap_or_default(),
            noupdate: row::get_bool(row, "noupdate").unwrap_or(false),
            reference: row::get_str(row, "reference"),
        }
    }

    fn to_row(&self, _custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "model", self.model.clone());
        row::put(&mut row, "module", self.module.clone());
        row.insert("res_id".to_string(), self.res_id.into());
        row.insert("noupdate".to_string(), self.noupdate.into());
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}
