//! One service per Odoo model: typed reads, creates and model-specific lookups.

mod ext_id;
mod location;
mod partner;
mod product;
mod sale_order;

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use odoo_fhir_core::odoo::{
    Country, CountryState, Currency, CustomFields, ExtId, OdooModel, OdooRecord, Partner, Product,
    SaleOrder, SaleOrderLine,
};

use crate::error::{Result, StoreError};
use crate::row::{Domain, Row, RowStore};

pub type ExtIdService = OdooService<ExtId>;
pub type ProductService = OdooService<Product>;
pub type PartnerService = OdooService<Partner>;
pub type CurrencyService = OdooService<Currency>;
pub type CountryService = OdooService<Country>;
pub type CountryStateService = OdooService<CountryState>;
pub type SaleOrderService = OdooService<SaleOrder>;
pub type SaleOrderLineService = OdooService<SaleOrderLine>;

pub struct OdooService<M> {
    store: Arc<dyn RowStore>,
    custom_fields: Arc<CustomFields>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for OdooService<M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            custom_fields: self.custom_fields.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: OdooModel> OdooService<M> {
    pub fn new(store: Arc<dyn RowStore>, custom_fields: Arc<CustomFields>) -> Self {
        Self {
            store,
            custom_fields,
            _model: PhantomData,
        }
    }

    pub fn model_name(&self) -> &'static str {
        M::MODEL
    }

    pub fn fields(&self) -> Vec<String> {
        M::fields(&self.custom_fields)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<M>> {
        let row = self.store.read_by_id(M::MODEL, id, &self.fields()).await?;
        Ok(row.map(|row| M::from_row(&row, &self.custom_fields)))
    }

    pub async fn search(&self, domain: &Domain) -> Result<Vec<M>> {
        let rows = self.store.search_read(M::MODEL, domain, &self.fields()).await?;
        debug!(model = M::MODEL, count = rows.len(), "search_read");
        Ok(rows
            .iter()
            .map(|row| M::from_row(row, &self.custom_fields))
            .collect())
    }

    pub fn to_row(&self, model: &M) -> Row {
        model.to_row(&self.custom_fields)
    }

    /// Create `model` in Odoo; server-maintained columns are never sent.
    pub async fn create(&self, model: &M) -> Result<i64> {
        let mut row = self.to_row(model);
        for column in OdooRecord::MAGIC_COLUMNS {
            row.remove(column);
        }

        let id = self.store.create(M::MODEL, row).await?;
        if id == 0 {
            return Err(StoreError::CreateFailed {
                model: M::MODEL.to_string(),
            });
        }
        debug!(model = M::MODEL, id, "Created record");
        Ok(id)
    }

    /// First match; more than one is logged and tolerated.
    async fn find_first(&self, domain: &Domain) -> Result<Option<M>> {
        let mut results = self.search(domain).await?;
        if results.len() > 1 {
            warn!(model = M::MODEL, count = results.len(), domain = %domain.to_value(), "Multiple records found, using the first");
        }
        Ok((!results.is_empty()).then(|| results.swap_remove(0)))
    }

    /// Single match by `field = value`; more than one is an error.
    async fn find_unique(&self, field: &str, value: impl Into<Value>) -> Result<Option<M>> {
        let value = value.into();
        let mut results = self.search(&Domain::new().eq(field, value.clone())).await?;
        match results.len() {
            0 => Ok(None),
            1 => Ok(results.pop()),
            _ => Err(StoreError::MultipleResults {
                model: M::MODEL.to_string(),
                field: field.to_string(),
                value: value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()),
            }),
        }
    }
}
