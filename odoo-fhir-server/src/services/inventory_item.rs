use async_trait::async_trait;
use odoo_fhir_core::fhir::InventoryItem;
use odoo_fhir_core::mapper::InventoryItemMapper;
use odoo_fhir_core::{Bundle, OdooSources, ToFhirMapping};

use super::{FhirService, ServiceContext};
use crate::error::Result;

pub struct InventoryItemService {
    ctx: ServiceContext,
}

impl InventoryItemService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn search(&self, codes: &[String]) -> Result<Bundle> {
        let mut bundle = Bundle::searchset();
        if codes.is_empty() {
            return Ok(bundle);
        }

        for (ext_id, product) in self.ctx.active_products_by_ext_ids(codes).await? {
            let sources = OdooSources::new().with_product(&product).with_ext_id(&ext_id);
            if let Some(item) = InventoryItemMapper.to_fhir(&sources) {
                bundle.push_match(item);
            }
        }
        Ok(bundle)
    }
}

#[async_trait]
impl FhirService for InventoryItemService {
    type Resource = InventoryItem;

    const RESOURCE_TYPE: &'static str = "InventoryItem";

    async fn get_by_id(&self, id: &str) -> Result<Option<InventoryItem>> {
        let Some((ext_id, product)) = self.ctx.product_by_ext_id(id, Self::RESOURCE_TYPE).await? else {
            return Ok(None);
        };
        Ok(InventoryItemMapper.to_fhir(&OdooSources::new().with_product(&product).with_ext_id(&ext_id)))
    }
}
