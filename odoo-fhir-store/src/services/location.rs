use odoo_fhir_core::odoo::{Country, CountryState, Currency};

use super::{CountryService, CountryStateService, CurrencyService};
use crate::error::Result;

impl CountryService {
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Country>> {
        self.find_unique("name", name).await
    }
}

impl CountryStateService {
    pub async fn get_by_name(&self, name: &str) -> Result<Option<CountryState>> {
        self.find_unique("name", name).await
    }
}

impl CurrencyService {
    /// Currency of a product, when it has one.
    pub async fn get_for(&self, currency_id: Option<i64>) -> Result<Option<Currency>> {
        match currency_id {
            Some(id) => self.get_by_id(id).await,
            None => Ok(None),
        }
    }
}
