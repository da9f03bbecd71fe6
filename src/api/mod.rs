//! Catalog API interaction module
//!
//! This module provides the HTTP plumbing used to talk to the catalog REST
//! backend. It knows nothing about individual entities; collection paths
//! come from the resource registry.
//!
//! # Module Structure
//!
//! - [`client`] - Catalog client holding the base URL and building endpoint URLs
//! - [`http`] - HTTP utilities for JSON REST calls and the [`ApiError`] type
//!
//! # Example
//!
//! ```ignore
//! use mediadesk::api::CatalogClient;
//!
//! async fn example() -> Result<(), mediadesk::api::ApiError> {
//!     let client = CatalogClient::new("http://localhost:4000/api/")?;
//!     let directors = client.get(&client.collection_url("directores")?).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;

pub use client::CatalogClient;
pub use http::{ApiError, ApiHttpClient};
