use odoo_fhir_core::odoo::Product;

use super::ProductService;
use crate::error::Result;
use crate::row::Domain;

impl ProductService {
    /// First active product with exactly this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Product>> {
        self.find_first(&Domain::new().eq("name", name).eq("active", true))
            .await
    }

    pub async fn search_by_category(&self, category_id: i64) -> Result<Vec<Product>> {
        self.search(&Domain::new().eq("categ_id", category_id)).await
    }
}
