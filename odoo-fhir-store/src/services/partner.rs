use odoo_fhir_core::odoo::Partner;

use super::PartnerService;
use crate::error::Result;
use crate::row::Domain;

impl PartnerService {
    /// The partner created for a clinical patient id.
    pub async fn get_by_ref(&self, reference: &str) -> Result<Option<Partner>> {
        self.find_first(&Domain::new().eq("ref", reference)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_by_ref() {
        let store = store();
        seed(&store, "res.partner", json!({"name": "Jane Doe", "ref": "pat-1", "x_dob": "1990-04-02"}));
        seed(&store, "res.partner", json!({"name": "John Roe", "ref": false}));

        let partners = PartnerService::new(dyn_store(&store), fields());
        let jane = partners.get_by_ref("pat-1").await.unwrap().unwrap();
        assert_eq!(jane.record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(jane.birth_date.as_deref(), Some("1990-04-02"));
        assert!(partners.get_by_ref("pat-2").await.unwrap().is_none());
    }
}
