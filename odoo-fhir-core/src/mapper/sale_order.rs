use std::sync::LazyLock;

use regex::Regex;

use super::{FhirSources, ToOdooMapping};
use crate::constants::{DEFAULT_UOM_ID, SALE_ORDER_STATE_DRAFT, SALE_ORDER_TYPE_NAME};
use crate::error::{CoreError, Result};
use crate::odoo::{OdooModel, OdooRecord, SaleOrder, SaleOrderLine};

static PARAGRAPH_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?p>").unwrap());

/// ServiceRequest + Partner → draft quotation keyed by the requisition.
///
/// The order name is left to Odoo's sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaleOrderMapper;

impl ToOdooMapping for SaleOrderMapper {
    type Odoo = SaleOrder;

    fn to_odoo(&self, sources: &FhirSources<'_>) -> Result<Option<SaleOrder>> {
        let (Some(service_request), Some(partner)) = (sources.service_request, sources.partner)
        else {
            return Ok(None);
        };

        let requisition = service_request
            .requisition
            .as_ref()
            .and_then(|identifier| identifier.value.clone())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                CoreError::InvalidArgument(
                    "The ServiceRequest does not have a requisition value. Cannot map to Sale Order."
                        .to_string(),
                )
            })?;

        Ok(Some(SaleOrder {
            record: OdooRecord::default(),
            client_order_ref: Some(requisition),
            state: Some(SALE_ORDER_STATE_DRAFT.to_string()),
            partner_id: partner.id(),
            type_name: Some(SALE_ORDER_TYPE_NAME.to_string()),
            partner_weight: None,
            partner_birth_date: partner.birth_date.clone(),
            partner_external_id: partner
                .external_id
                .as_deref()
                .map(|value| PARAGRAPH_TAGS.replace_all(value, "").into_owned()),
        }))
    }
}

/// ServiceRequest + Product + SaleOrder → one quotation line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaleOrderLineMapper;

impl ToOdooMapping for SaleOrderLineMapper {
    type Odoo = SaleOrderLine;

    fn to_odoo(&self, sources: &FhirSources<'_>) -> Result<Option<SaleOrderLine>> {
        let (Some(service_request), Some(product), Some(sale_order)) = (
            sources.service_request,
            sources.product,
            sources.sale_order,
        ) else {
            return Ok(None);
        };

        let service_display = service_request.code.as_ref().and_then(|code| {
            code.text
                .clone()
                .or_else(|| code.first_display().map(str::to_string))
        });
        let requester_display = service_request
            .requester
            .as_ref()
            .and_then(|requester| requester.display.as_deref());
        let name = match (service_display, requester_display) {
            (Some(service), Some(requester)) => Some(format!("{service} | Orderer: {requester}")),
            (Some(service), None) => Some(service),
            (None, Some(requester)) => Some(format!("Orderer: {requester}")),
            (None, None) => None,
        };

        Ok(Some(SaleOrderLine {
            record: OdooRecord {
                name,
                ..Default::default()
            },
            order_id: Some(sale_order.id()),
            product_id: Some(product.id()),
            product_uom_qty: Some(1.0),
            product_uom: Some(DEFAULT_UOM_ID),
        }))
    }
}
