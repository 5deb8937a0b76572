pub mod error;
pub mod memory;
pub mod row;
pub mod services;
pub mod sqlite_audit;
pub mod xmlrpc;

pub use error::{Result, StoreError};
pub use memory::{MemoryConnector, MemoryRowStore};
pub use row::{Connector, Domain, Operator, Row, RowStore};
pub use services::{
    CountryService, CountryStateService, CurrencyService, ExtIdService, OdooService,
    PartnerService, ProductService, SaleOrderLineService, SaleOrderService,
};
pub use sqlite_audit::{AuditEntry, AuditLog, Operation};
pub use xmlrpc::{OdooConnector, OdooSession};
