use super::{OdooSources, ToFhirMapping};
use crate::date::{fhir_date_to_odoo, to_fhir_datetime};
use crate::fhir::{Address, HumanName, Identifier, Meta, Patient};
use crate::odoo::Partner;

/// Partner (+ optional country and state) → Patient.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatientMapper;

impl ToFhirMapping for PatientMapper {
    type Fhir = Patient;

    fn to_fhir(&self, sources: &OdooSources<'_>) -> Option<Patient> {
        let partner = sources.partner?;

        let identifier = partner
            .external_id
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| vec![Identifier::official(value)])
            .unwrap_or_default();

        let address = partner_address(
            partner,
            sources.country.and_then(|country| country.record.name.clone()),
            sources.country_state.and_then(|state| state.record.name.clone()),
        );

        Some(Patient {
            id: partner
                .reference
                .clone()
                .or_else(|| Some(partner.record.id.to_string())),
            meta: Meta::last_updated(partner.record.last_modified().map(|dt| to_fhir_datetime(&dt))),
            identifier,
            active: partner.active,
            name: partner.record.name.as_deref().map(split_name).into_iter().collect(),
            gender: None,
            birth_date: partner.birth_date.as_deref().and_then(fhir_date_to_odoo),
            address: address.into_iter().collect(),
        })
    }
}

fn split_name(full_name: &str) -> HumanName {
    let mut words: Vec<String> = full_name.split_whitespace().map(str::to_string).collect();
    let family = if words.len() > 1 { words.pop() } else { None };
    HumanName {
        text: Some(full_name.to_string()),
        family,
        given: words,
    }
}

fn partner_address(
    partner: &Partner,
    country: Option<String>,
    state: Option<String>,
) -> Option<Address> {
    let line: Vec<String> = [&partner.street, &partner.street2]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if line.is_empty()
        && partner.city.is_none()
        && partner.zip.is_none()
        && country.is_none()
        && state.is_none()
    {
        return None;
    }
    Some(Address {
        line,
        city: partner.city.clone(),
        postal_code: partner.zip.clone(),
        country,
        state,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fhir::IdentifierUse;
    use crate::odoo::{Country, OdooRecord};

    #[test]
    fn test_to_fhir() {
        let partner = Partner {
            record: OdooRecord {
                id: 14,
                name: Some("Jane Mary Doe".to_string()),
                ..Default::default()
            },
            reference: Some("pat-uuid".to_string()),
            active: Some(true),
            external_id: Some("10001V".to_string()),
            birth_date: Some("1990-04-02".to_string()),
            street: Some("Plot 7".to_string()),
            city: Some("Kampala".to_string()),
            ..Default::default()
        };
        let country = Country {
            record: OdooRecord::named("Uganda"),
            code: Some("UG".to_string()),
        };

        let patient = PatientMapper
            .to_fhir(
                &OdooSources::new()
                    .with_partner(&partner)
                    .with_country(Some(&country)),
            )
            .unwrap();

        assert_eq!(patient.id.as_deref(), Some("pat-uuid"));
        assert_eq!(patient.identifier[0].use_, Some(IdentifierUse::Official));
        assert_eq!(patient.identifier[0].value.as_deref(), Some("10001V"));
        assert_eq!(patient.name[0].family.as_deref(), Some("Doe"));
        assert_eq!(patient.name[0].given, vec!["Jane", "Mary"]);
        assert_eq!(patient.birth_date.as_deref(), Some("1990-04-02"));
        assert_eq!(patient.address[0].line, vec!["Plot 7"]);
        assert_eq!(patient.address[0].country.as_deref(), Some("Uganda"));
    }

    #[test]
    fn test_partner_without_reference_or_address() {
        let partner = Partner {
            record: OdooRecord {
                id: 3,
                name: Some("Cher".to_string()),
                ..Default::default()
            },
            external_id: Some(String::new()),
            ..Default::default()
        };
        let patient = PatientMapper
            .to_fhir(&OdooSources::new().with_partner(&partner))
            .unwrap();
        assert_eq!(patient.id.as_deref(), Some("3"));
        assert!(patient.identifier.is_empty());
        assert!(patient.address.is_empty());
        assert_eq!(patient.name[0].family, None);
        assert_eq!(patient.name[0].given, vec!["Cher"]);
    }
}
