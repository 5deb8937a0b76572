use super::{OdooSources, ToFhirMapping};
use crate::constants::{ODOO_CODING_SYSTEM, OPENMRS_CODING_SYSTEM};
use crate::date::to_fhir_datetime;
use crate::fhir::{
    CodeableConcept, Coding, InventoryItem, InventoryItemDescription, InventoryItemName,
    InventoryItemStatus, Meta, Quantity,
};

/// Product + external id → InventoryItem.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryItemMapper;

impl ToFhirMapping for InventoryItemMapper {
    type Fhir = InventoryItem;

    fn to_fhir(&self, sources: &OdooSources<'_>) -> Option<InventoryItem> {
        let product = sources.product?;
        let ext_id = sources.ext_id?;
        let display = product.record.label().map(str::to_string);

        let status = if product.active {
            InventoryItemStatus::Active
        } else {
            InventoryItemStatus::Inactive
        };

        let odoo_coding = Coding {
            system: Some(ODOO_CODING_SYSTEM.to_string()),
            code: product.code.clone(),
            display: display.clone(),
        };
        let openmrs_coding = Coding {
            system: Some(OPENMRS_CODING_SYSTEM.to_string()),
            code: ext_id.name().map(str::to_string),
            display: display.clone(),
        };

        Some(InventoryItem {
            id: ext_id.name().map(str::to_string),
            meta: Meta::last_updated(product.record.last_modified().map(|dt| to_fhir_datetime(&dt))),
            status: Some(status),
            code: vec![CodeableConcept {
                coding: vec![odoo_coding, openmrs_coding],
                text: display,
            }],
            name: product
                .record
                .name
                .clone()
                .map(|name| vec![InventoryItemName { language: None, name }])
                .unwrap_or_default(),
            description: Some(InventoryItemDescription {
                language: None,
                description: product.description.clone(),
            }),
            net_content: Some(Quantity {
                value: product.quantity_available,
                unit: product.uom_name.clone(),
            }),
        })
    }
}
