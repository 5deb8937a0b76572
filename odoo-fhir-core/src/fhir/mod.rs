//! FHIR R4 resources and data types exchanged with clinical clients.

mod bundle;
mod datatypes;
mod resources;

use serde::{Deserialize, Serialize};

pub use bundle::{Bundle, BundleEntry, BundleEntrySearch, BundleType, SearchEntryMode};
pub use datatypes::{
    Address, AddressType, CodeableConcept, Coding, Extension, HumanName, Identifier,
    IdentifierUse, Money, Quantity, Reference,
};
pub use resources::{
    ChargeItemDefinition, InventoryItem, InventoryItemDescription, InventoryItemName,
    InventoryItemStatus, Medication, MedicationStatus, Patient, PriceComponent,
    PriceComponentType, PropertyGroup, PublicationStatus, ServiceRequest,
};

/// FHIR resource metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "versionId", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Meta {
    pub fn last_updated(last_updated: Option<String>) -> Option<Self> {
        last_updated.map(|last_updated| Self {
            version_id: None,
            last_updated: Some(last_updated),
        })
    }
}

/// Any resource the adapter reads or writes, discriminated by `resourceType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum FhirResource {
    Patient(Patient),
    ServiceRequest(ServiceRequest),
    Medication(Medication),
    InventoryItem(InventoryItem),
    ChargeItemDefinition(ChargeItemDefinition),
    Bundle(Bundle),
}

impl FhirResource {
    pub fn resource_type(&self) -> &'static str {
        match self {
            FhirResource::Patient(_) => "Patient",
            FhirResource::ServiceRequest(_) => "ServiceRequest",
            FhirResource::Medication(_) => "Medication",
            FhirResource::InventoryItem(_) => "InventoryItem",
            FhirResource::ChargeItemDefinition(_) => "ChargeItemDefinition",
            FhirResource::Bundle(_) => "Bundle",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            FhirResource::Patient(r) => r.id.as_deref(),
            FhirResource::ServiceRequest(r) => r.id.as_deref(),
            FhirResource::Medication(r) => r.id.as_deref(),
            FhirResource::InventoryItem(r) => r.id.as_deref(),
            FhirResource::ChargeItemDefinition(r) => r.id.as_deref(),
            FhirResource::Bundle(_) => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

macro_rules! impl_from_resource {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for FhirResource {
                fn from(resource: $variant) -> Self {
                    FhirResource::$variant(resource)
                }
            }
        )*
    };
}

impl_from_resource!(
    Patient,
    ServiceRequest,
    Medication,
    InventoryItem,
    ChargeItemDefinition,
    Bundle,
);
