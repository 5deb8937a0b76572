pub mod constants;
pub mod date;
pub mod error;
pub mod fhir;
pub mod mapper;
pub mod odoo;
pub mod operation_outcome;
pub mod search_param;

pub use error::{CoreError, Result};
pub use fhir::{Bundle, FhirResource};
pub use mapper::{FhirSources, OdooSources, ToFhirMapping, ToOdooMapping};
pub use odoo::{CustomFields, OdooModel, OdooRecord, Row};
pub use operation_outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use search_param::{TokenAndListParam, TokenOrListParam, TokenParam};
