//! catalog::traits
//!
//! Catalog trait definition for the remote listing and descriptor service.
//!
//! # Design
//!
//! The `Catalog` trait is async because every lookup is a round trip to the
//! bridge. All methods return `Result` so a failed or unanswered request is
//! reported to the caller instead of leaving it waiting.
//!
//! The core never talks to the network itself: the resolver and the panels
//! receive a `&dyn Catalog` from whoever owns the transport.
//!
//! # Example
//!
//! ```ignore
//! use rosdesk::catalog::{Catalog, EntityKind};
//!
//! async fn show_topics(catalog: &dyn Catalog) -> Result<(), CatalogError> {
//!     for name in catalog.list_names(EntityKind::Topics).await? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::schema::TypeDescriptor;
use crate::core::types::TypeName;
use crate::core::value::Value;

/// Errors from catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The requested entity or type does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The bridge answered with an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the bridge
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// No answer arrived within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The answer could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The bridge answered, but reported that the call failed.
    #[error("call rejected: {0}")]
    Rejected(String),
}

/// Kinds of addressable entities the catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Data streams.
    Topics,
    /// Remote calls.
    Services,
    /// Configuration entries.
    Params,
    /// Running processes.
    Nodes,
}

impl EntityKind {
    /// Every kind, in menu order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Topics,
        EntityKind::Services,
        EntityKind::Params,
        EntityKind::Nodes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Topics => "topics",
            EntityKind::Services => "services",
            EntityKind::Params => "params",
            EntityKind::Nodes => "nodes",
        }
    }

    /// Parse a kind name (singular or plural).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "topics" | "topic" => Some(EntityKind::Topics),
            "services" | "service" => Some(EntityKind::Services),
            "params" | "param" => Some(EntityKind::Params),
            "nodes" | "node" => Some(EntityKind::Nodes),
            _ => None,
        }
    }

    /// Whether entities of this kind have a type the descriptor service knows.
    pub fn is_typed(&self) -> bool {
        matches!(self, EntityKind::Topics | EntityKind::Services)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which description of a type to fetch.
///
/// Service types have separate request and response descriptions; every
/// nested field type is described as a plain message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DescriptorRole {
    #[default]
    Message,
    ServiceRequest,
    ServiceResponse,
}

impl std::fmt::Display for DescriptorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorRole::Message => write!(f, "message"),
            DescriptorRole::ServiceRequest => write!(f, "request"),
            DescriptorRole::ServiceResponse => write!(f, "response"),
        }
    }
}

/// The Catalog trait for the remote listing and descriptor service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, CatalogError>`. No method retries; callers
/// decide whether to try again.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Get the catalog name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// List the hierarchical names of every entity of a kind.
    async fn list_names(&self, kind: EntityKind) -> Result<Vec<String>, CatalogError>;

    /// Look up the type of a topic or service.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the entity doesn't exist or `kind` is untyped
    async fn entity_type(&self, kind: EntityKind, name: &str) -> Result<TypeName, CatalogError>;

    /// Fetch the field descriptor of a type.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the service does not know the type
    async fn type_descriptor(
        &self,
        type_name: &TypeName,
        role: DescriptorRole,
    ) -> Result<TypeDescriptor, CatalogError>;

    /// Read a parameter value.
    async fn get_param(&self, name: &str) -> Result<Value, CatalogError>;

    /// Write a parameter value.
    async fn set_param(&self, name: &str, value: &Value) -> Result<(), CatalogError>;

    /// Remove a parameter.
    ///
    /// # Errors
    ///
    /// - `Rejected` if the bridge refuses the deletion
    async fn delete_param(&self, name: &str) -> Result<(), CatalogError>;

    /// Call a service with a collected request and return its reply.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the service doesn't exist
    /// - `Rejected` if the service ran and reported failure
    async fn call_service(&self, name: &str, request: &Value) -> Result<Value, CatalogError>;
}
