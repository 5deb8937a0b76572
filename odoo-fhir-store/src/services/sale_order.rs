use odoo_fhir_core::odoo::{SaleOrder, SaleOrderLine};

use super::{SaleOrderLineService, SaleOrderService};
use crate::error::Result;
use crate::row::Domain;

impl SaleOrderService {
    /// The quotation carrying this customer reference.
    pub async fn get_by_order_ref(&self, order_ref: &str) -> Result<Option<SaleOrder>> {
        self.find_unique("client_order_ref", order_ref).await
    }
}

impl SaleOrderLineService {
    pub async fn get_by_order_id_and_product_id(
        &self,
        order_id: i64,
        product_id: i64,
    ) -> Result<Option<SaleOrderLine>> {
        self.find_first(&Domain::new().eq("order_id", order_id).eq("product_id", product_id))
            .await
    }
}
