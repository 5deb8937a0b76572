use async_trait::async_trait;
use odoo_fhir_core::constants::{MODEL_PRODUCT, MODEL_PRODUCT_CATEGORY};
use odoo_fhir_core::fhir::Medication;
use odoo_fhir_core::mapper::MedicationMapper;
use odoo_fhir_core::odoo::{ExtId, OdooModel, Product};
use odoo_fhir_core::{Bundle, OdooSources, ToFhirMapping};
use odoo_fhir_store::Domain;
use tracing::{debug, info, warn};

use super::{FhirService, ServiceContext};
use crate::error::{Result, ServiceError};

pub struct MedicationService {
    ctx: ServiceContext,
}

impl MedicationService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every product of the drugs category, registering external ids as needed.
    pub async fn get_all_medications(&self) -> Result<Bundle> {
        let category_id = self.drugs_category_id().await?;
        debug!(category_id, "Fetching all drug products from Odoo");

        let products = self.ctx.odoo::<Product>().search_by_category(category_id).await?;

        let mut bundle = Bundle::searchset();
        for product in &products {
            let ext_id = self.ensure_external_id(product).await?;
            let sources = OdooSources::new().with_product(product).with_ext_id(&ext_id);
            if let Some(medication) = MedicationMapper.to_fhir(&sources) {
                bundle.push_match(medication);
            }
        }
        Ok(bundle)
    }

    /// Resolved once per process from the configured category external id.
    async fn drugs_category_id(&self) -> Result<i64> {
        let id = self
            .ctx
            .shared()
            .drugs_category_id
            .get_or_try_init(|| self.resolve_drugs_category())
            .await?;
        Ok(*id)
    }

    async fn resolve_drugs_category(&self) -> Result<i64> {
        let configured = self
            .ctx
            .shared()
            .drugs_category_ext_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ServiceError::Config("odoo.drugs_category_ext_id is not defined".to_string())
            })?;

        // `module.name` or a bare name
        let domain = Domain::new().eq("model", MODEL_PRODUCT_CATEGORY);
        let domain = match configured.rsplit_once('.') {
            Some((module, name)) => domain.eq("module", module).eq("name", name),
            None => domain.eq("name", configured),
        };

        let ext_ids = self.ctx.odoo::<ExtId>().search(&domain).await?;
        ext_ids.first().map(|ext_id| ext_id.res_id).ok_or_else(|| {
            ServiceError::Config(format!(
                "No product category found with external id {}",
                configured
            ))
        })
    }

    async fn ensure_external_id(&self, product: &Product) -> Result<ExtId> {
        let ext_ids = self.ctx.odoo::<ExtId>();
        if let Some(ext_id) = ext_ids.get_by_res_id_and_model(product.id(), MODEL_PRODUCT).await? {
            return Ok(ext_id);
        }

        let key = format!("{}:{}", MODEL_PRODUCT, product.id());
        let _guard = self.ctx.shared().locks.lock(&key).await;
        if let Some(ext_id) = ext_ids.get_by_res_id_and_model(product.id(), MODEL_PRODUCT).await? {
            return Ok(ext_id);
        }

        let name = uuid::Uuid::new_v4().to_string();
        info!(product_id = product.id(), ext_id = %name, "Adding new external id for product");
        Ok(ext_ids.create_external_id(MODEL_PRODUCT, product.id(), &name).await?)
    }
}

#[async_trait]
impl FhirService for MedicationService {
    type Resource = Medication;

    const RESOURCE_TYPE: &'static str = "Medication";

    async fn get_by_id(&self, id: &str) -> Result<Option<Medication>> {
        let Some(ext_id) = self
            .ctx
            .odoo::<ExtId>()
            .get_by_name_and_model(id, MODEL_PRODUCT)
            .await?
        else {
            warn!(id, "Medication has no external id");
            return Ok(None);
        };

        let Some(product) = self.ctx.odoo::<Product>().get_by_id(ext_id.res_id).await? else {
            warn!(id, res_id = ext_id.res_id, "Medication missing a product");
            return Ok(None);
        };

        Ok(MedicationMapper.to_fhir(&OdooSources::new().with_product(&product).with_ext_id(&ext_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::services::{ServiceContext, Shared};
    use odoo_fhir_core::CustomFields;
    use odoo_fhir_core::fhir::MedicationStatus;
    use odoo_fhir_store::MemoryRowStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_all_medications_registers_missing_ext_ids() {
        let store = Arc::new(MemoryRowStore::default());
        let drugs = seed_drugs_category(&store);
        let other = seed(&store, "product.category", json!({"name": "Services"}));
        seed_product(&store, "Paracetamol", Some("pcm-uuid"), json!({"categ_id": drugs, "code": "PCM"}));
        seed_product(&store, "Amoxicillin", None, json!({"categ_id": drugs}));
        seed_product(&store, "Consultation", None, json!({"categ_id": other}));

        let service = MedicationService::new(context(&store));
        let bundle = service.get_all_medications().await.unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(store.count("ir.model.data").unwrap(), 3);

        // ext ids created on the first pass are reused
        let again = service.get_all_medications().await.unwrap();
        assert_eq!(again.len(), 2);
        assert_eq!(store.count("ir.model.data").unwrap(), 3);

        let ids: Vec<_> = bundle
            .entry
            .iter()
            .filter_map(|entry| entry.resource.id().map(str::to_string))
            .collect();
        assert!(ids.contains(&"pcm-uuid".to_string()));
    }

    #[tokio::test]
    async fn test_missing_category_config() {
        let store = Arc::new(MemoryRowStore::default());
        let ctx = ServiceContext::new(
            store.clone(),
            Arc::new(Shared::new(CustomFields::default(), Some("  ".to_string()))),
        );
        let err = MedicationService::new(ctx).get_all_medications().await.unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[tokio::test]
    async fn test_unknown_category_ext_id() {
        let store = Arc::new(MemoryRowStore::default());
        let err = MedicationService::new(context(&store))
            .get_all_medications()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No product category found"));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = Arc::new(MemoryRowStore::default());
        seed_product(&store, "Paracetamol", Some("pcm-uuid"), json!({"code": "PCM"}));

        let service = MedicationService::new(context(&store));
        let medication = service.get_by_id("pcm-uuid").await.unwrap().unwrap();
        assert_eq!(medication.status, Some(MedicationStatus::Active));
        assert!(service.get_by_id("unknown").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_listings_register_one_ext_id_per_product() {
        let store = Arc::new(MemoryRowStore::default());
        let drugs = seed_drugs_category(&store);
        let products: Vec<i64> = (0..5)
            .map(|i| seed_product(&store, &format!("Drug {}", i), None, json!({"categ_id": drugs})))
            .collect();
        let ctx = context(&store);

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let service = MedicationService::new(ctx.clone());
                tokio::spawn(async move { service.get_all_medications().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 5);
        }

        let ext_ids = store.rows("ir.model.data").unwrap();
        for product in products {
            let registered = ext_ids
                .iter()
                .filter(|row| row["model"] == "product.product" && row["res_id"] == json!(product))
                .count();
            assert_eq!(registered, 1, "product {}", product);
        }
    }
}
