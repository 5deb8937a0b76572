use super::{OdooSources, ToFhirMapping};
use crate::constants::ODOO_CODING_SYSTEM;
use crate::date::to_fhir_datetime;
use crate::fhir::{CodeableConcept, Coding, Medication, MedicationStatus, Meta};

/// Product + external id → Medication.
#[derive(Debug, Default, Clone, Copy)]
pub struct MedicationMapper;

impl ToFhirMapping for MedicationMapper {
    type Fhir = Medication;

    fn to_fhir(&self, sources: &OdooSources<'_>) -> Option<Medication> {
        let product = sources.product?;
        let ext_id = sources.ext_id?;

        let status = if product.active {
            MedicationStatus::Active
        } else {
            MedicationStatus::Inactive
        };

        Some(Medication {
            id: ext_id.name().map(str::to_string),
            meta: Meta::last_updated(product.record.last_modified().map(|dt| to_fhir_datetime(&dt))),
            code: Some(CodeableConcept {
                coding: vec![Coding::new(ODOO_CODING_SYSTEM, product.code.clone())],
                text: product.record.label().map(str::to_string),
            }),
            status: Some(status),
        })
    }
}
