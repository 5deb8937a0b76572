use async_trait::async_trait;
use odoo_fhir_core::fhir::ChargeItemDefinition;
use odoo_fhir_core::mapper::ChargeItemDefinitionMapper;
use odoo_fhir_core::odoo::{Currency, ExtId, Product};
use odoo_fhir_core::{Bundle, OdooSources, ToFhirMapping};

use super::{FhirService, ServiceContext};
use crate::error::Result;

pub struct ChargeItemDefinitionService {
    ctx: ServiceContext,
}

impl ChargeItemDefinitionService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn search(&self, codes: &[String]) -> Result<Bundle> {
        let mut bundle = Bundle::searchset();
        if codes.is_empty() {
            return Ok(bundle);
        }

        for (ext_id, product) in self.ctx.active_products_by_ext_ids(codes).await? {
            if let Some(definition) = self.map(&ext_id, &product).await? {
                bundle.push_match(definition);
            }
        }
        Ok(bundle)
    }

    /// Maps with the product's currency when it resolves.
    async fn map(&self, ext_id: &ExtId, product: &Product) -> Result<Option<ChargeItemDefinition>> {
        let currency = self
            .ctx
            .odoo::<Currency>()
            .get_for(product.currency_id)
            .await?;
        let sources = OdooSources::new()
            .with_product(product)
            .with_ext_id(ext_id)
            .with_currency(currency.as_ref());
        Ok(ChargeItemDefinitionMapper.to_fhir(&sources))
    }
}

#[async_trait]
impl FhirService for ChargeItemDefinitionService {
    type Resource = ChargeItemDefinition;

    const RESOURCE_TYPE: &'static str = "ChargeItemDefinition";

    async fn get_by_id(&self, id: &str) -> Result<Option<ChargeItemDefinition>> {
        let Some((ext_id, product)) = self.ctx.product_by_ext_id(id, Self::RESOURCE_TYPE).await? else {
            return Ok(None);
        };
        self.map(&ext_id, &product).await
    }
}
