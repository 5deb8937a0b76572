use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::error;

const ODOO_DATE_FORMAT: &str = "%Y-%m-%d";
const ODOO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a FHIR `date` / `dateTime` to Odoo's `YYYY-MM-DD`.
///
/// Partial dates (`1990`, `1990-04`) carry no day and are dropped.
pub fn fhir_date_to_odoo(value: &str) -> Option<String> {
    let value = value.trim();
    let date_part = value.split('T').next().unwrap_or(value);
    match NaiveDate::parse_from_str(date_part, ODOO_DATE_FORMAT) {
        Ok(date) => Some(date.format(ODOO_DATE_FORMAT).to_string()),
        Err(e) => {
            error!(value = %value, error = %e, "Unable to convert FHIR date to Odoo format");
            None
        }
    }
}

/// Parse an Odoo datetime column (UTC, `YYYY-MM-DD HH:MM:SS[.ffffff]`) or an RFC 3339 string.
pub fn parse_odoo_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let without_fraction = value.split('.').next().unwrap_or(value);
    if let Ok(naive) = NaiveDateTime::parse_from_str(without_fraction, ODOO_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn to_odoo_datetime(value: &DateTime<Utc>) -> String {
    value.format(ODOO_DATETIME_FORMAT).to_string()
}

pub fn to_fhir_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
