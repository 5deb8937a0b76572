//! Translations between Odoo models and FHIR resources.
//!
//! A mapper receives every record it may need as a typed bundle of optional
//! borrowed parts and answers `None` when a required part is missing.

mod charge_item_definition;
mod inventory_item;
mod medication;
mod partner;
mod patient;
mod sale_order;

use crate::error::Result;
use crate::fhir::{Patient, ServiceRequest};
use crate::odoo::{Country, CountryState, Currency, ExtId, Partner, Product, SaleOrder};

pub use charge_item_definition::ChargeItemDefinitionMapper;
pub use inventory_item::InventoryItemMapper;
pub use medication::MedicationMapper;
pub use partner::PartnerMapper;
pub use patient::PatientMapper;
pub use sale_order::{SaleOrderLineMapper, SaleOrderMapper};

/// Odoo records feeding a `to_fhir` mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct OdooSources<'a> {
    pub product: Option<&'a Product>,
    pub ext_id: Option<&'a ExtId>,
    pub currency: Option<&'a Currency>,
    pub partner: Option<&'a Partner>,
    pub country: Option<&'a Country>,
    pub country_state: Option<&'a CountryState>,
}

impl<'a> OdooSources<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: &'a Product) -> Self {
        self.product = Some(product);
        self
    }

    pub fn with_ext_id(mut self, ext_id: &'a ExtId) -> Self {
        self.ext_id = Some(ext_id);
        self
    }

    pub fn with_currency(mut self, currency: Option<&'a Currency>) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_partner(mut self, partner: &'a Partner) -> Self {
        self.partner = Some(partner);
        self
    }

    pub fn with_country(mut self, country: Option<&'a Country>) -> Self {
        self.country = country;
        self
    }

    pub fn with_country_state(mut self, country_state: Option<&'a CountryState>) -> Self {
        self.country_state = country_state;
        self
    }
}

/// FHIR resources and already-resolved Odoo records feeding a `to_odoo` mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct FhirSources<'a> {
    pub patient: Option<&'a Patient>,
    pub service_request: Option<&'a ServiceRequest>,
    pub partner: Option<&'a Partner>,
    pub product: Option<&'a Product>,
    pub sale_order: Option<&'a SaleOrder>,
    pub country: Option<&'a Country>,
    pub country_state: Option<&'a CountryState>,
}

impl<'a> FhirSources<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient(mut self, patient: &'a Patient) -> Self {
        self.patient = Some(patient);
        self
    }

    pub fn with_service_request(mut self, service_request: &'a ServiceRequest) -> Self {
        self.service_request = Some(service_request);
        self
    }

    pub fn with_partner(mut self, partner: &'a Partner) -> Self {
        self.partner = Some(partner);
        self
    }

    pub fn with_product(mut self, product: &'a Product) -> Self {
        self.product = Some(product);
        self
    }

    pub fn with_sale_order(mut self, sale_order: &'a SaleOrder) -> Self {
        self.sale_order = Some(sale_order);
        self
    }

    pub fn with_country(mut self, country: Option<&'a Country>) -> Self {
        self.country = country;
        self
    }

    pub fn with_country_state(mut self, country_state: Option<&'a CountryState>) -> Self {
        self.country_state = country_state;
        self
    }
}

pub trait ToFhirMapping {
    type Fhir;

    fn to_fhir(&self, sources: &OdooSources<'_>) -> Option<Self::Fhir>;
}

pub trait ToOdooMapping {
    type Odoo;

    fn to_odoo(&self, sources: &FhirSources<'_>) -> Result<Option<Self::Odoo>>;
}
