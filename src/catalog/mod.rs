//! catalog
//!
//! Abstraction for the remote listing and type-descriptor service.
//!
//! # Architecture
//!
//! The `Catalog` trait defines everything the core needs from the outside
//! world: entity listings, entity types, type descriptors and parameter
//! values. Commands use [`create_catalog`] rather than constructing a
//! specific implementation directly.
//!
//! # Modules
//!
//! - `traits`: Core `Catalog` trait and its error and selector types
//! - [`http`]: rosapi-style HTTP/JSON bridge client
//! - [`mock`]: Mock implementation for deterministic testing

pub mod http;
pub mod mock;
mod traits;

pub use traits::*;

use std::time::Duration;

/// Create the catalog client for a bridge endpoint.
///
/// # Errors
///
/// Returns `NetworkError` if the endpoint is not an `http://` or `https://`
/// URL or the client cannot be built.
///
/// # Example
///
/// ```
/// use rosdesk::catalog::create_catalog;
/// use std::time::Duration;
///
/// let catalog = create_catalog("http://localhost:9090", Duration::from_secs(5)).unwrap();
/// assert_eq!(catalog.name(), "http");
/// assert!(create_catalog("ws://localhost:9090", Duration::from_secs(5)).is_err());
/// ```
pub fn create_catalog(endpoint: &str, timeout: Duration) -> Result<Box<dyn Catalog>, CatalogError> {
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(CatalogError::NetworkError(format!(
            "unsupported endpoint '{}' (expected http:// or https://)",
            endpoint
        )));
    }
    Ok(Box::new(http::HttpCatalog::new(endpoint, timeout)?))
}
