//! Odoo's external API over XML-RPC (`/xmlrpc/2/common`, `/xmlrpc/2/object`).

pub mod codec;
mod client;

pub use client::{OdooConnector, OdooSession};
