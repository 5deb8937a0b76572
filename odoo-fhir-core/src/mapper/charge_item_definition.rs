use super::{OdooSources, ToFhirMapping};
use crate::date::to_fhir_datetime;
use crate::fhir::{
    ChargeItemDefinition, Money, PriceComponent, PriceComponentType, PropertyGroup,
    PublicationStatus,
};

/// Product + external id (+ currency) → ChargeItemDefinition carrying the base price.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChargeItemDefinitionMapper;

impl ToFhirMapping for ChargeItemDefinitionMapper {
    type Fhir = ChargeItemDefinition;

    fn to_fhir(&self, sources: &OdooSources<'_>) -> Option<ChargeItemDefinition> {
        let product = sources.product?;
        let ext_id = sources.ext_id?;

        let status = if product.active {
            PublicationStatus::Active
        } else {
            PublicationStatus::Retired
        };

        let base_price = PriceComponent {
            component_type: PriceComponentType::Base,
            code: None,
            factor: None,
            amount: Some(Money {
                value: product.standard_price,
                currency: sources.currency.and_then(|currency| currency.symbol.clone()),
            }),
        };

        Some(ChargeItemDefinition {
            id: ext_id.name().map(str::to_string),
            meta: None,
            name: product.record.name.clone(),
            description: product.description.clone(),
            date: product.record.last_modified().map(|dt| to_fhir_datetime(&dt)),
            status: Some(status),
            property_group: vec![PropertyGroup {
                price_component: vec![base_price],
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odoo::{Currency, ExtId, OdooRecord, Product};
    use chrono::{TimeZone, Utc};

    fn product() -> Product {
        Product {
            record: OdooRecord {
                id: 3,
                name: Some("X-Ray".to_string()),
                last_updated_on: Some(Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()),
                ..Default::default()
            },
            description: Some("Chest X-Ray".to_string()),
            standard_price: Some(45.0),
            active: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_to_fhir_with_currency() {
        let product = product();
        let ext_id = ExtId::new("__export__", "product.product", 3, "xray-uuid");
        let currency = Currency {
            symbol: Some("$".to_string()),
            ..Default::default()
        };

        let cid = ChargeItemDefinitionMapper
            .to_fhir(
                &OdooSources::new()
                    .with_product(&product)
                    .with_ext_id(&ext_id)
                    .with_currency(Some(&currency)),
            )
            .unwrap();

        assert_eq!(cid.id.as_deref(), Some("xray-uuid"));
        assert_eq!(cid.name.as_deref(), Some("X-Ray"));
        assert_eq!(cid.description.as_deref(), Some("Chest X-Ray"));
        assert_eq!(cid.date.as_deref(), Some("2024-02-10T09:00:00Z"));
        assert_eq!(cid.status, Some(PublicationStatus::Retired));

        let component = &cid.property_group[0].price_component[0];
        assert_eq!(component.component_type, PriceComponentType::Base);
        let amount = component.amount.as_ref().unwrap();
        assert_eq!(amount.value, Some(45.0));
        assert_eq!(amount.currency.as_deref(), Some("$"));
    }

    #[test]
    fn test_to_fhir_without_currency() {
        let product = product();
        let ext_id = ExtId::new("__export__", "product.product", 3, "xray-uuid");
        let cid = ChargeItemDefinitionMapper
            .to_fhir(&OdooSources::new().with_product(&product).with_ext_id(&ext_id))
            .unwrap();
        let amount = cid.property_group[0].price_component[0].amount.clone().unwrap();
        assert_eq!(amount.currency, None);
    }
}
