//! Resource abstraction layer
//!
//! One generic resource manager, parametrized by entity schemas instead of
//! per-entity code. Schemas are loaded from JSON embedded at compile time.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`client`] - Issues the REST calls for one collection
//! - [`record`] - Reads raw records and builds form drafts
//! - [`validation`] - Declarative field rules evaluated on submit
//!
//! # Example
//!
//! ```ignore
//! use mediadesk::api::CatalogClient;
//! use mediadesk::resource::{get_resource, ResourceClient};
//!
//! async fn list_directors(api: &CatalogClient) -> anyhow::Result<Vec<serde_json::Value>> {
//!     let def = get_resource("directores").unwrap();
//!     Ok(ResourceClient::new(api, def).list().await?)
//! }
//! ```

mod client;
mod record;
mod registry;
mod validation;

pub use client::{Operation, ResourceClient, ResourceError};
pub use record::{
    column_value, extract_json_value, filter_by_status, format_date, record_id, Draft, Status,
    STATUS_FIELD,
};
pub use registry::*;
pub use validation::{check_rules, validate, FieldErrors, Rule};
