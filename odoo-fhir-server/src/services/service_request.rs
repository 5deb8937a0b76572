use odoo_fhir_core::constants::MODEL_SALE_ORDER;
use odoo_fhir_core::fhir::ServiceRequest;
use odoo_fhir_core::mapper::{SaleOrderLineMapper, SaleOrderMapper};
use odoo_fhir_core::odoo::{OdooModel, Partner, Product, SaleOrder, SaleOrderLine};
use odoo_fhir_core::{FhirSources, ToOdooMapping};
use tracing::{debug, info};

use super::ServiceContext;
use crate::error::{Result, ServiceError};

pub struct ServiceRequestService {
    ctx: ServiceContext,
}

fn missing_fields() -> ServiceError {
    ServiceError::Unprocessable("Fields missing in ServiceRequest payload".to_string())
}

impl ServiceRequestService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Adds one quotation line for the request to the sale order of its requisition.
    pub async fn create(&self, mut service_request: ServiceRequest) -> Result<ServiceRequest> {
        let Some(requisition) = service_request
            .requisition
            .as_ref()
            .and_then(|identifier| identifier.value.clone())
            .filter(|value| !value.trim().is_empty())
        else {
            debug!("ServiceRequest has no requisition, nothing to order");
            return Ok(service_request);
        };

        service_request
            .id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string());

        let key = format!("{}:{}", MODEL_SALE_ORDER, requisition);
        let _guard = self.ctx.shared().locks.lock(&key).await;

        // Resolved before any write so a bad code leaves no empty quotation behind
        let product = self.product_for(&service_request).await?;

        let sale_order = match self.ctx.odoo::<SaleOrder>().get_by_order_ref(&requisition).await? {
            Some(sale_order) => {
                info!(sale_order_id = sale_order.id(), requisition = %requisition, "Sale order already exists");
                self.ensure_no_line(&sale_order, &product).await?;
                sale_order
            }
            None => {
                let sale_order = self.create_sale_order(&service_request).await?;
                info!(sale_order_id = sale_order.id(), requisition = %requisition, "Created sale order");
                sale_order
            }
        };

        let line_id = self
            .create_sale_order_line(&service_request, &product, &sale_order)
            .await?;
        info!(sale_order_line_id = line_id, sale_order_id = sale_order.id(), "Created sale order line");

        Ok(service_request)
    }

    async fn product_for(&self, service_request: &ServiceRequest) -> Result<Product> {
        let product_name = service_request
            .code
            .as_ref()
            .and_then(|code| code.first_display())
            .ok_or_else(|| {
                ServiceError::Unprocessable("ServiceRequest code has no display".to_string())
            })?;

        self.ctx
            .odoo::<Product>()
            .get_by_name(product_name)
            .await?
            .ok_or_else(|| {
                ServiceError::Unprocessable(format!(
                    "Product with name {} doesn't exist in Odoo",
                    product_name
                ))
            })
    }

    async fn ensure_no_line(&self, sale_order: &SaleOrder, product: &Product) -> Result<()> {
        let existing = self
            .ctx
            .odoo::<SaleOrderLine>()
            .get_by_order_id_and_product_id(sale_order.id(), product.id())
            .await?;
        match existing {
            Some(_) => Err(ServiceError::Unprocessable(format!(
                "Sale order line already exists for product {} in Odoo",
                product.record.name.as_deref().unwrap_or_default()
            ))),
            None => Ok(()),
        }
    }

    async fn create_sale_order(&self, service_request: &ServiceRequest) -> Result<SaleOrder> {
        let patient_id = service_request
            .subject
            .as_ref()
            .and_then(|subject| subject.id_part())
            .ok_or_else(|| {
                ServiceError::Unprocessable("ServiceRequest subject is missing".to_string())
            })?;

        let partner = self
            .ctx
            .odoo::<Partner>()
            .get_by_ref(patient_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unprocessable(format!(
                    "Partner with id {} doesn't exist in Odoo",
                    patient_id
                ))
            })?;

        let sources = FhirSources::new()
            .with_service_request(service_request)
            .with_partner(&partner);
        let mut sale_order = SaleOrderMapper.to_odoo(&sources)?.ok_or_else(missing_fields)?;

        sale_order.record.id = self.ctx.odoo::<SaleOrder>().create(&sale_order).await?;
        Ok(sale_order)
    }

    async fn create_sale_order_line(
        &self,
        service_request: &ServiceRequest,
        product: &Product,
        sale_order: &SaleOrder,
    ) -> Result<i64> {
        let sources = FhirSources::new()
            .with_service_request(service_request)
            .with_product(product)
            .with_sale_order(sale_order);
        let line = SaleOrderLineMapper.to_odoo(&sources)?.ok_or_else(missing_fields)?;

        Ok(self.ctx.odoo::<SaleOrderLine>().create(&line).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use odoo_fhir_core::fhir::{CodeableConcept, Coding, Identifier, Reference};
    use odoo_fhir_store::MemoryRowStore;
    use serde_json::json;
    use std::sync::Arc;

    fn service_request(requisition: Option<&str>, subject: &str, test: &str) -> ServiceRequest {
        ServiceRequest {
            requisition: requisition.map(|value| Identifier {
                value: Some(value.to_string()),
                ..Default::default()
            }),
            code: Some(CodeableConcept {
                coding: vec![Coding {
                    display: Some(test.to_string()),
                    ..Default::default()
                }],
                text: None,
            }),
            subject: Some(Reference {
                reference: Some(subject.to_string()),
                display: None,
            }),
            requester: Some(Reference {
                reference: Some("Practitioner/9".to_string()),
                display: Some("Dr. Okello".to_string()),
            }),
            ..Default::default()
        }
    }

    fn seeded() -> Arc<MemoryRowStore> {
        let store = Arc::new(MemoryRowStore::default());
        seed(&store, "res.partner", json!({"name": "Jane Doe", "ref": "p-1", "active": true}));
        seed_product(&store, "Complete blood count", None, json!({}));
        seed_product(&store, "Malaria smear", None, json!({}));
        store
    }

    #[tokio::test]
    async fn test_create_reuses_order_per_requisition() {
        let store = seeded();
        let service = ServiceRequestService::new(context(&store));

        let created = service
            .create(service_request(Some("REQ-1"), "Patient/p-1", "Complete blood count"))
            .await
            .unwrap();
        assert!(created.id.is_some());
        service
            .create(service_request(Some("REQ-1"), "Patient/p-1", "Malaria smear"))
            .await
            .unwrap();

        let orders = store.rows("sale.order").unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["client_order_ref"], "REQ-1");
        assert_eq!(orders[0]["state"], "draft");

        let lines = store.rows("sale.order.line").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["name"], "Complete blood count | Orderer: Dr. Okello");
    }

    #[tokio::test]
    async fn test_duplicate_line_is_rejected() {
        let store = seeded();
        let service = ServiceRequestService::new(context(&store));
        let request = service_request(Some("REQ-2"), "Patient/p-1", "Complete blood count");

        service.create(request.clone()).await.unwrap();
        let err = service.create(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unprocessable(ref msg) if msg.contains("already exists")));
        assert_eq!(store.count("sale.order.line").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_partner_and_product() {
        let store = seeded();
        let service = ServiceRequestService::new(context(&store));

        let err = service
            .create(service_request(Some("REQ-3"), "Patient/nobody", "Complete blood count"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Partner with id nobody doesn't exist in Odoo");

        let err = service
            .create(service_request(Some("REQ-4"), "Patient/p-1", "Unknown test"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Product with name Unknown test"));
        assert_eq!(store.count("sale.order").unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_requests_share_one_order() {
        let store = seeded();
        let tests: Vec<String> = (0..6).map(|i| format!("Panel {}", i)).collect();
        for test in &tests {
            seed_product(&store, test, None, json!({}));
        }
        let ctx = context(&store);

        // two requests per product: one line each, the rest are duplicates
        let handles: Vec<_> = tests
            .iter()
            .chain(tests.iter())
            .map(|test| {
                let service = ServiceRequestService::new(ctx.clone());
                let request = service_request(Some("REQ-P"), "Patient/p-1", test);
                tokio::spawn(async move { service.create(request).await.is_ok() })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 6);
        assert_eq!(store.count("sale.order").unwrap(), 1);
        assert_eq!(store.count("sale.order.line").unwrap(), 6);
    }

    #[tokio::test]
    async fn test_without_requisition_is_returned_unchanged() {
        let store = seeded();
        let request = service_request(None, "Patient/p-1", "Complete blood count");
        let returned = ServiceRequestService::new(context(&store))
            .create(request.clone())
            .await
            .unwrap();
        assert_eq!(returned, request);
        assert_eq!(store.count("sale.order").unwrap(), 0);
    }
}
