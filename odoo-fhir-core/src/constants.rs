//! Coding systems, extension URLs and Odoo model names shared across the adapter.

pub const ODOO_CODING_SYSTEM: &str = "https://odoo.com";
pub const OPENMRS_CODING_SYSTEM: &str = "https://fhir.openmrs.org";

pub const OPENMRS_ADDRESS_EXTENSION: &str = "http://fhir.openmrs.org/ext/address";
pub const OPENMRS_ADDRESS1_EXTENSION: &str = "http://fhir.openmrs.org/ext/address#address1";
pub const OPENMRS_ADDRESS2_EXTENSION: &str = "http://fhir.openmrs.org/ext/address#address2";

pub const MODEL_PRODUCT: &str = "product.product";
pub const MODEL_PRODUCT_CATEGORY: &str = "product.category";
pub const MODEL_EXTERNAL_IDENTIFIER: &str = "ir.model.data";
pub const MODEL_PARTNER: &str = "res.partner";
pub const MODEL_CURRENCY: &str = "res.currency";
pub const MODEL_COUNTRY: &str = "res.country";
pub const MODEL_COUNTRY_STATE: &str = "res.country.state";
pub const MODEL_SALE_ORDER: &str = "sale.order";
pub const MODEL_SALE_ORDER_LINE: &str = "sale.order.line";

/// Module under which adapter-generated external ids are registered.
pub const EXTERNAL_ID_MODULE: &str = "__export__";

pub const SALE_ORDER_TYPE_NAME: &str = "Sales Order";
pub const SALE_ORDER_STATE_DRAFT: &str = "draft";
/// Odoo's default "Units" unit of measure.
pub const DEFAULT_UOM_ID: i64 = 1;
