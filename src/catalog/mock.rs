//! catalog::mock
//!
//! Mock catalog implementation for deterministic testing.
//!
//! # Design
//!
//! The mock catalog keeps names, entity types, descriptors and parameters in
//! memory, allows configuring failure scenarios, and records every call so
//! tests can count descriptor fetches and check their order.
//!
//! # Example
//!
//! ```
//! use rosdesk::catalog::mock::MockCatalog;
//! use rosdesk::catalog::{Catalog, DescriptorRole, EntityKind};
//! use rosdesk::core::types::TypeName;
//!
//! # tokio_test::block_on(async {
//! let catalog = MockCatalog::new()
//!     .with_names(EntityKind::Topics, ["/chatter", "/robot/odom"])
//!     .with_type("geometry_msgs/Point", &[("x", "float64", -1), ("y", "float64", -1)]);
//!
//! let names = catalog.list_names(EntityKind::Topics).await.unwrap();
//! assert_eq!(names.len(), 2);
//!
//! let point = TypeName::new("geometry_msgs/Point").unwrap();
//! let descriptor = catalog.type_descriptor(&point, DescriptorRole::Message).await.unwrap();
//! assert_eq!(descriptor.fieldnames, vec!["x", "y"]);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{Catalog, CatalogError, DescriptorRole, EntityKind};
use crate::core::schema::TypeDescriptor;
use crate::core::types::TypeName;
use crate::core::value::Value;

/// Mock catalog for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockCatalogInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockCatalogInner {
    /// Listings by kind.
    names: HashMap<EntityKind, Vec<String>>,
    /// Entity types by (kind, name).
    entity_types: HashMap<(EntityKind, String), String>,
    /// Descriptors by (type, role).
    descriptors: HashMap<(String, DescriptorRole), TypeDescriptor>,
    /// Parameter values.
    params: HashMap<String, Value>,
    /// Canned service replies by service name.
    services: HashMap<String, Value>,
    /// Delay before every descriptor answer.
    descriptor_delay: Option<Duration>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_names with the given error.
    ListNames(CatalogError),
    /// Fail entity_type with the given error.
    EntityType(CatalogError),
    /// Fail type_descriptor for one type with the given error.
    Descriptor(String, CatalogError),
    /// Fail every type_descriptor call with the given error.
    AnyDescriptor(CatalogError),
    /// Fail get_param / set_param / delete_param with the given error.
    Param(CatalogError),
    /// Fail call_service with the given error.
    CallService(CatalogError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    ListNames {
        kind: EntityKind,
    },
    EntityType {
        kind: EntityKind,
        name: String,
    },
    TypeDescriptor {
        type_name: String,
        role: DescriptorRole,
    },
    GetParam {
        name: String,
    },
    SetParam {
        name: String,
        value: Value,
    },
    DeleteParam {
        name: String,
    },
    CallService {
        name: String,
        request: Value,
    },
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listing for a kind.
    pub fn with_names<I, S>(self, kind: EntityKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .names
                .entry(kind)
                .or_default()
                .extend(names.into_iter().map(Into::into));
        }
        self
    }

    /// Register the type of a topic or service.
    pub fn with_entity(self, kind: EntityKind, name: &str, type_name: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .entity_types
                .insert((kind, name.to_string()), type_name.to_string());
        }
        self
    }

    /// Register a message type from `(name, tag, array-length indicator)` triples.
    pub fn with_type(self, type_name: &str, fields: &[(&str, &str, i64)]) -> Self {
        self.with_descriptor(type_name, DescriptorRole::Message, fields)
    }

    /// Register a descriptor for a specific role.
    pub fn with_descriptor(
        self,
        type_name: &str,
        role: DescriptorRole,
        fields: &[(&str, &str, i64)],
    ) -> Self {
        let descriptor = TypeDescriptor {
            type_name: type_name.to_string(),
            fieldnames: fields.iter().map(|f| f.0.to_string()).collect(),
            fieldtypes: fields.iter().map(|f| f.1.to_string()).collect(),
            fieldarraylen: fields.iter().map(|f| f.2).collect(),
        };
        self.with_raw_descriptor(type_name, role, descriptor)
    }

    /// Register a descriptor verbatim, including malformed ones.
    pub fn with_raw_descriptor(
        self,
        type_name: &str,
        role: DescriptorRole,
        descriptor: TypeDescriptor,
    ) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .descriptors
                .insert((type_name.to_string(), role), descriptor);
        }
        self
    }

    /// Seed a parameter.
    pub fn with_param(self, name: &str, value: Value) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.params.insert(name.to_string(), value);
        }
        self
    }

    /// Answer calls to `service` with `reply`.
    pub fn with_service_reply(self, service: &str, reply: Value) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.services.insert(service.to_string(), reply);
        }
        self
    }

    /// Hold every descriptor answer back for `delay`.
    pub fn with_descriptor_delay(self, delay: Duration) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.descriptor_delay = Some(delay);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use rosdesk::catalog::mock::{FailOn, MockCatalog};
    /// use rosdesk::catalog::CatalogError;
    ///
    /// let catalog = MockCatalog::new()
    ///     .fail_on(FailOn::AnyDescriptor(CatalogError::NetworkError("down".into())));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Type names of every descriptor fetch, in call order.
    pub fn descriptor_fetches(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::TypeDescriptor { type_name, .. } => Some(type_name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Current value of a parameter (for test verification).
    pub fn param_sync(&self, name: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap();
        inner.params.get(name).cloned()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str, subject: &str) -> Option<CatalogError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::ListNames(e)) if expected == "list_names" => Some(e.clone()),
            Some(FailOn::EntityType(e)) if expected == "entity_type" => Some(e.clone()),
            Some(FailOn::Descriptor(t, e)) if expected == "type_descriptor" && t == subject => {
                Some(e.clone())
            }
            Some(FailOn::AnyDescriptor(e)) if expected == "type_descriptor" => Some(e.clone()),
            Some(FailOn::Param(e)) if expected == "param" => Some(e.clone()),
            Some(FailOn::CallService(e)) if expected == "call_service" => Some(e.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_names(&self, kind: EntityKind) -> Result<Vec<String>, CatalogError> {
        self.record(MockOperation::ListNames { kind });

        if let Some(e) = self.check_fail("list_names", "") {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.names.get(&kind).cloned().unwrap_or_default())
    }

    async fn entity_type(&self, kind: EntityKind, name: &str) -> Result<TypeName, CatalogError> {
        self.record(MockOperation::EntityType {
            kind,
            name: name.to_string(),
        });

        if let Some(e) = self.check_fail("entity_type", name) {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        let raw = inner
            .entity_types
            .get(&(kind, name.to_string()))
            .ok_or_else(|| CatalogError::NotFound(format!("{} {}", kind, name)))?;
        TypeName::new(raw.as_str()).map_err(|e| CatalogError::Malformed(e.to_string()))
    }

    async fn type_descriptor(
        &self,
        type_name: &TypeName,
        role: DescriptorRole,
    ) -> Result<TypeDescriptor, CatalogError> {
        self.record(MockOperation::TypeDescriptor {
            type_name: type_name.to_string(),
            role,
        });

        let delay = self.inner.lock().unwrap().descriptor_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(e) = self.check_fail("type_descriptor", type_name.as_str()) {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .descriptors
            .get(&(type_name.to_string(), role))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("type {} ({})", type_name, role)))
    }

    async fn get_param(&self, name: &str) -> Result<Value, CatalogError> {
        self.record(MockOperation::GetParam {
            name: name.to_string(),
        });

        if let Some(e) = self.check_fail("param", name) {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .params
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("param {}", name)))
    }

    async fn set_param(&self, name: &str, value: &Value) -> Result<(), CatalogError> {
        self.record(MockOperation::SetParam {
            name: name.to_string(),
            value: value.clone(),
        });

        if let Some(e) = self.check_fail("param", name) {
            return Err(e);
        }

        let mut inner = self.inner.lock().unwrap();
        inner.params.insert(name.to_string(), value.clone());
        Ok(())
    }

    async fn delete_param(&self, name: &str) -> Result<(), CatalogError> {
        self.record(MockOperation::DeleteParam {
            name: name.to_string(),
        });

        if let Some(e) = self.check_fail("param", name) {
            return Err(e);
        }

        let mut inner = self.inner.lock().unwrap();
        inner
            .params
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(format!("param {}", name)))
    }

    async fn call_service(&self, name: &str, request: &Value) -> Result<Value, CatalogError> {
        self.record(MockOperation::CallService {
            name: name.to_string(),
            request: request.clone(),
        });

        if let Some(e) = self.check_fail("call_service", name) {
            return Err(e);
        }

        let inner = self.inner.lock().unwrap();
        inner
            .services
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("service {}", name)))
    }
}
