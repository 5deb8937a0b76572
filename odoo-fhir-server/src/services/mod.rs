//! FHIR-facing services: compose Odoo lookups and mappers per resource type.
//!
//! Services are cheap request-scoped values built from the caller's Odoo
//! session and the process-wide [`Shared`] state.

mod charge_item_definition;
mod inventory_item;
mod medication;
mod patient;
mod service_request;

use async_trait::async_trait;
use odoo_fhir_core::CustomFields;
use odoo_fhir_core::constants::MODEL_PRODUCT;
use odoo_fhir_core::odoo::{ExtId, OdooModel, Product};
use odoo_fhir_store::{OdooService, RowStore};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::locks::KeyedLocks;

pub use charge_item_definition::ChargeItemDefinitionService;
pub use inventory_item::InventoryItemService;
pub use medication::MedicationService;
pub use patient::PatientService;
pub use service_request::ServiceRequestService;

/// State shared by every request regardless of the logged-in user.
pub struct Shared {
    pub custom_fields: Arc<CustomFields>,
    pub drugs_category_ext_id: Option<String>,
    pub locks: KeyedLocks,
    drugs_category_id: OnceCell<i64>,
}

impl Shared {
    pub fn new(custom_fields: CustomFields, drugs_category_ext_id: Option<String>) -> Self {
        Self {
            custom_fields: Arc::new(custom_fields),
            drugs_category_ext_id,
            locks: KeyedLocks::new(),
            drugs_category_id: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.odoo.fields.clone(),
            config.odoo.drugs_category_ext_id.clone(),
        )
    }
}

/// One user's Odoo session plus the shared state.
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn RowStore>,
    shared: Arc<Shared>,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn RowStore>, shared: Arc<Shared>) -> Self {
        Self { store, shared }
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Typed access to one Odoo model.
    pub fn odoo<M: OdooModel>(&self) -> OdooService<M> {
        OdooService::new(self.store.clone(), self.shared.custom_fields.clone())
    }

    /// The product registered under external id `name`, with that id.
    async fn product_by_ext_id(&self, name: &str, resource_type: &str) -> Result<Option<(ExtId, Product)>> {
        let Some(ext_id) = self
            .odoo::<ExtId>()
            .get_by_name_and_model(name, MODEL_PRODUCT)
            .await?
        else {
            warn!(resource_type, id = name, "Missing an external id");
            return Ok(None);
        };

        let Some(product) = self.odoo::<Product>().get_by_id(ext_id.res_id).await? else {
            warn!(resource_type, id = name, res_id = ext_id.res_id, "Missing a product");
            return Ok(None);
        };

        Ok(Some((ext_id, product)))
    }

    /// Active products whose external id is one of `codes`.
    async fn active_products_by_ext_ids(&self, codes: &[String]) -> Result<Vec<(ExtId, Product)>> {
        let ext_ids = self
            .odoo::<ExtId>()
            .get_by_names_and_model(codes, MODEL_PRODUCT)
            .await?;

        let products = self.odoo::<Product>();
        let mut found = Vec::with_capacity(ext_ids.len());
        for ext_id in ext_ids {
            match products.get_by_id(ext_id.res_id).await? {
                Some(product) if product.active => found.push((ext_id, product)),
                _ => debug!(res_id = ext_id.res_id, "Skipping missing or archived product"),
            }
        }
        Ok(found)
    }
}

/// Read access shared by the resource services.
#[async_trait]
pub trait FhirService: Send + Sync {
    type Resource: Send;

    const RESOURCE_TYPE: &'static str;

    async fn get_by_id(&self, id: &str) -> Result<Option<Self::Resource>>;
}
