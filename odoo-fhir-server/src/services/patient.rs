use async_trait::async_trait;
use odoo_fhir_core::constants::MODEL_PARTNER;
use odoo_fhir_core::fhir::Patient;
use odoo_fhir_core::mapper::{PartnerMapper, PatientMapper};
use odoo_fhir_core::odoo::{Country, CountryState, OdooModel, Partner};
use odoo_fhir_core::{FhirSources, OdooSources, ToFhirMapping, ToOdooMapping};
use tracing::{error, info};

use super::{FhirService, ServiceContext};
use crate::error::{Result, ServiceError};

pub struct PatientService {
    ctx: ServiceContext,
}

impl PatientService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Registers the patient as a partner keyed by the patient id.
    ///
    /// A partner already carrying that id as `ref` is left untouched.
    pub async fn create(&self, mut patient: Patient) -> Result<Patient> {
        let patient_id = patient
            .id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone();

        let address = patient.address.first();
        let country = match address.and_then(|address| address.country.as_deref()) {
            Some(name) => self.ctx.odoo::<Country>().get_by_name(name).await?,
            None => None,
        };
        let country_state = match address.and_then(|address| address.state.as_deref()) {
            Some(name) => self.ctx.odoo::<CountryState>().get_by_name(name).await?,
            None => None,
        };

        let sources = FhirSources::new()
            .with_patient(&patient)
            .with_country(country.as_ref())
            .with_country_state(country_state.as_ref());
        let Some(partner) = PartnerMapper.to_odoo(&sources)? else {
            error!(patient_id = %patient_id, "Unable to create partner in Odoo because required patient data is missing");
            return Err(ServiceError::Unprocessable(
                "Fields missing in Patient payload".to_string(),
            ));
        };

        let partners = self.ctx.odoo::<Partner>();
        let key = format!("{}:{}", MODEL_PARTNER, patient_id);
        let _guard = self.ctx.shared().locks.lock(&key).await;

        if let Some(existing) = partners.get_by_ref(&patient_id).await? {
            info!(patient_id = %patient_id, partner_id = existing.id(), "Partner already exists");
            return Ok(patient);
        }

        let partner_id = partners.create(&partner).await?;
        info!(patient_id = %patient_id, partner_id, "Created partner");
        Ok(patient)
    }
}

#[async_trait]
impl FhirService for PatientService {
    type Resource = Patient;

    const RESOURCE_TYPE: &'static str = "Patient";

    async fn get_by_id(&self, id: &str) -> Result<Option<Patient>> {
        let Some(partner) = self.ctx.odoo::<Partner>().get_by_ref(id).await? else {
            return Ok(None);
        };

        let country = match partner.country_id {
            Some(country_id) => self.ctx.odoo::<Country>().get_by_id(country_id).await?,
            None => None,
        };
        let country_state = match partner.state_id {
            Some(state_id) => self.ctx.odoo::<CountryState>().get_by_id(state_id).await?,
            None => None,
        };

        let sources = OdooSources::new()
            .with_partner(&partner)
            .with_country(country.as_ref())
            .with_country_state(country_state.as_ref());
        Ok(PatientMapper.to_fhir(&sources))
    }
}
