use super::row::{self, Row};
use super::{CustomFields, OdooModel, OdooRecord, field_list};
use crate::constants::MODEL_PARTNER;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partner {
    pub record: OdooRecord,
    /// The clinical system's patient id, stored in `ref`.
    pub reference: Option<String>,
    pub partner_type: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country_id: Option<i64>,
    pub state_id: Option<i64>,
    pub active: Option<bool>,
    pub comment: Option<String>,
    pub birth_date: Option<String>,
    pub external_id: Option<String>,
}

impl OdooModel for Partner {
    const MODEL: &'static str = MODEL_PARTNER;

    fn fields(custom: &CustomFields) -> Vec<String> {
        let mut fields = field_list(&[
            "ref",
            "type",
            "street",
            "street2",
            "city",
            "zip",
            "country_id",
            "state_id",
            "active",
            "comment",
        ]);
        fields.push(custom.partner_birth_date.clone());
        fields.push(custom.partner_external_id.clone());
        fields
    }

    fn from_row(row: &Row, custom: &CustomFields) -> Self {
        Self {
            record: OdooRecord::from_row(row),
            reference: row::get_str(row, "ref"),
            partner_type: row::get_str(row, "type"),
            street: row::get_str(row, "street"),
            street2: row::get_str(row, "street2"),
            city: row::get_str(row, "city"),
            zip: row::get_str(row, "zip"),
            country_id: row::get_i64(row, "country_id"),
            state_id: row::get_i64(row, "state_id"),
            active: row::get_bool(row, "active"),
            comment: row::get_str(row, "comment"),
            birth_date: row::get_str(row, &custom.partner_birth_date),
            external_id: row::get_str(row, &custom.partner_external_id),
        }
    }

    fn to_row(&self, custom: &CustomFields) -> Row {
        let mut row = Row::new();
        self.record.write_into(&mut row);
        row::put(&mut row, "ref", self.reference.clone());
        row::put(&mut row, "type", self.partner_type.clone());
        row::put(&mut row, "street", self.street.clone());
        row::put(&mut row, "street2", self.street2.clone());
        row::put(&mut row, "city", self.city.clone());
        row::put(&mut row, "zip", self.zip.clone());
        row::put(&mut row, "country_id", self.country_id);
        row::put(&mut row, "state_id", self.state_id);
        row::put(&mut row, "active", self.active);
        row::put(&mut row, "comment", self.comment.clone());
        row::put(&mut row, &custom.partner_birth_date, self.birth_date.clone());
        row::put(&mut row, &custom.partner_external_id, self.external_id.clone());
        row
    }

    fn record(&self) -> &OdooRecord {
        &self.record
    }
}
