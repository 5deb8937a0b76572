use odoo_fhir_core::constants::EXTERNAL_ID_MODULE;
use odoo_fhir_core::odoo::{ExtId, OdooRecord};

use super::ExtIdService;
use crate::error::Result;
use crate::row::Domain;

impl ExtIdService {
    pub async fn get_by_name_and_model(&self, name: &str, model: &str) -> Result<Option<ExtId>> {
        self.find_first(&Domain::new().eq("name", name).eq("model", model))
            .await
    }

    /// External ids of `model` whose name is any of `names`.
    pub async fn get_by_names_and_model(&self, names: &[String], model: &str) -> Result<Vec<ExtId>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.search(
            &Domain::new()
                .is_in("name", names.iter().cloned())
                .eq("model", model),
        )
        .await
    }

    pub async fn get_by_res_id_and_model(&self, res_id: i64, model: &str) -> Result<Option<ExtId>> {
        self.find_first(&Domain::new().eq("res_id", res_id).eq("model", model))
            .await
    }

    /// Register `name` as the external id of record `res_id` of `model`.
    pub async fn create_external_id(&self, model: &str, res_id: i64, name: &str) -> Result<ExtId> {
        let mut ext_id = ExtId::new(EXTERNAL_ID_MODULE, model, res_id, name);
        let id = self.create(&ext_id).await?;
        ext_id.record = OdooRecord {
            id,
            ..ext_id.record
        };
        ext_id.complete_name = Some(format!("{}.{}", EXTERNAL_ID_MODULE, name));
        Ok(ext_id)
    }
}
