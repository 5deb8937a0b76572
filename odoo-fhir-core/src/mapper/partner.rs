use tracing::debug;

use super::{FhirSources, ToOdooMapping};
use crate::constants::{
    OPENMRS_ADDRESS1_EXTENSION, OPENMRS_ADDRESS2_EXTENSION, OPENMRS_ADDRESS_EXTENSION,
};
use crate::date::fhir_date_to_odoo;
use crate::error::Result;
use crate::fhir::{Address, IdentifierUse, Patient};
use crate::odoo::{Country, CountryState, OdooModel, OdooRecord, Partner};

/// Patient (+ resolved country and state) → Partner.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartnerMapper;

impl ToOdooMapping for PartnerMapper {
    type Odoo = Partner;

    fn to_odoo(&self, sources: &FhirSources<'_>) -> Result<Option<Partner>> {
        let Some(patient) = sources.patient else {
            return Ok(None);
        };

        let identifier = official_identifier(patient).unwrap_or_default();
        let mut partner = Partner {
            record: OdooRecord::named(patient_name(patient).unwrap_or_default()),
            reference: patient.id.clone(),
            active: Some(patient.active.unwrap_or(true)),
            comment: Some(identifier.clone()),
            external_id: Some(identifier),
            birth_date: patient.birth_date.as_deref().and_then(fhir_date_to_odoo),
            ..Default::default()
        };

        if let Some(address) = patient.address.first() {
            apply_address(&mut partner, address, sources.country, sources.country_state);
        }

        Ok(Some(partner))
    }
}

fn official_identifier(patient: &Patient) -> Option<String> {
    patient
        .identifier
        .iter()
        .find(|identifier| identifier.use_ == Some(IdentifierUse::Official))
        .and_then(|identifier| identifier.value.clone())
}

/// `"<first given> <family>"` of the first name.
fn patient_name(patient: &Patient) -> Option<String> {
    let name = patient.name.first()?;
    let parts: Vec<&str> = name
        .given
        .first()
        .map(String::as_str)
        .into_iter()
        .chain(name.family.as_deref())
        .filter(|part| !part.trim().is_empty())
        .collect();
    if parts.is_empty() {
        return name.text.clone();
    }
    Some(parts.join(" "))
}

fn apply_address(
    partner: &mut Partner,
    address: &Address,
    country: Option<&Country>,
    country_state: Option<&CountryState>,
) {
    partner.city = address.city.clone();
    partner.zip = address.postal_code.clone();
    partner.country_id = country.map(|country| country.id());
    partner.state_id = country_state.map(|state| state.id());
    partner.partner_type = address.address_type.map(|t| t.display().to_string());

    match address.extension_by_url(OPENMRS_ADDRESS_EXTENSION) {
        Some(extension) => {
            partner.street = extension
                .extension_by_url(OPENMRS_ADDRESS1_EXTENSION)
                .and_then(|ext| ext.value_string.clone());
            partner.street2 = extension
                .extension_by_url(OPENMRS_ADDRESS2_EXTENSION)
                .and_then(|ext| ext.value_string.clone());
        }
        None => debug!("Patient address has no OpenMRS address extension"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fhir::{AddressType, Extension, HumanName, Identifier};

    fn patient() -> Patient {
        Patient {
            id: Some("pat-uuid".to_string()),
            active: Some(true),
            identifier: vec![
                Identifier {
                    use_: Some(IdentifierUse::Usual),
                    system: None,
                    value: Some("OLD-1".to_string()),
                },
                Identifier::official("10001V"),
            ],
            name: vec![HumanName {
                text: None,
                family: Some("Doe".to_string()),
                given: vec!["Jane".to_string(), "Mary".to_string()],
            }],
            birth_date: Some("1990-04-02".to_string()),
            address: vec![Address {
                address_type: Some(AddressType::Both),
                city: Some("Kampala".to_string()),
                postal_code: Some("256".to_string()),
                country: Some("Uganda".to_string()),
                state: Some("Central".to_string()),
                extension: vec![Extension {
                    url: OPENMRS_ADDRESS_EXTENSION.to_string(),
                    extension: vec![
                        Extension {
                            url: OPENMRS_ADDRESS1_EXTENSION.to_string(),
                            value_string: Some("Plot 7".to_string()),
                            ..Default::default()
                        },
                        Extension {
                            url: OPENMRS_ADDRESS2_EXTENSION.to_string(),
                            value_string: Some("Kololo".to_string()),
                            ..Default::default()
                        },
                    ],
                    value_string: None,
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_to_odoo() {
        let country = Country {
            record: OdooRecord {
                id: 226,
                ..Default::default()
            },
            code: Some("UG".to_string()),
        };
        let state = CountryState {
            record: OdooRecord {
                id: 31,
                ..Default::default()
            },
            ..Default::default()
        };
        let patient = patient();

        let partner = PartnerMapper
            .to_odoo(
                &FhirSources::new()
                    .with_patient(&patient)
                    .with_country(Some(&country))
                    .with_country_state(Some(&state)),
            )
            .unwrap()
            .unwrap();

        assert_eq!(partner.reference.as_deref(), Some("pat-uuid"));
        assert_eq!(partner.record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(partner.comment.as_deref(), Some("10001V"));
        assert_eq!(partner.external_id.as_deref(), Some("10001V"));
        assert_eq!(partner.birth_date.as_deref(), Some("1990-04-02"));
        assert_eq!(partner.active, Some(true));
        assert_eq!(partner.city.as_deref(), Some("Kampala"));
        assert_eq!(partner.zip.as_deref(), Some("256"));
        assert_eq!(partner.country_id, Some(226));
        assert_eq!(partner.state_id, Some(31));
        assert_eq!(partner.partner_type.as_deref(), Some("Postal & Physical"));
        assert_eq!(partner.street.as_deref(), Some("Plot 7"));
        assert_eq!(partner.street2.as_deref(), Some("Kololo"));
    }

    #[test]
    fn test_sparse_patient() {
        let patient = Patient {
            id: Some("p2".to_string()),
            birth_date: Some("1990".to_string()),
            ..Default::default()
        };
        let partner = PartnerMapper
            .to_odoo(&FhirSources::new().with_patient(&patient))
            .unwrap()
            .unwrap();
        assert_eq!(partner.record.name.as_deref(), Some(""));
        assert_eq!(partner.external_id.as_deref(), Some(""));
        assert_eq!(partner.birth_date, None);
        assert_eq!(partner.active, Some(true));
        assert_eq!(partner.country_id, None);
    }

    #[test]
    fn test_address_without_resolved_country() {
        let patient = patient();
        let partner = PartnerMapper
            .to_odoo(&FhirSources::new().with_patient(&patient))
            .unwrap()
            .unwrap();
        assert_eq!(partner.city.as_deref(), Some("Kampala"));
        assert_eq!(partner.country_id, None);
        assert_eq!(partner.state_id, None);
    }

    #[test]
    fn test_missing_patient_yields_none() {
        assert!(PartnerMapper.to_odoo(&FhirSources::new()).unwrap().is_none());
    }
}
