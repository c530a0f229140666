//! core::resolver
//!
//! Recursive resolution of a type name into a complete field schema.
//!
//! # Design
//!
//! Resolution is depth-first and sequential: the parent's descriptor is
//! fetched first, then each composite field is resolved in field order before
//! the next field is looked at. The future returned by
//! [`SchemaResolver::resolve`] completes only once every nested field has
//! been resolved, so callers never observe a partially resolved schema.
//!
//! Self-referential types are reported as [`ResolveError::Cycle`], and a
//! configurable depth limit bounds pathological nesting. Every failure is
//! returned to the caller; nothing is retried.
//!
//! By default each occurrence of a type triggers its own fetch. With
//! `cache_descriptors` enabled, descriptors are memoised for the lifetime of
//! the resolver.
//!
//! # Example
//!
//! ```
//! use rosdesk::catalog::mock::MockCatalog;
//! use rosdesk::core::resolver::{ResolverOptions, SchemaResolver};
//! use rosdesk::core::types::TypeName;
//!
//! # tokio_test::block_on(async {
//! let catalog = MockCatalog::new()
//!     .with_type("geometry_msgs/Point", &[("x", "float64", -1), ("y", "float64", -1)]);
//! let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
//!
//! let schema = resolver
//!     .resolve(&TypeName::new("geometry_msgs/Point").unwrap())
//!     .await
//!     .unwrap();
//! assert_eq!(schema.fields.len(), 2);
//! assert_eq!(schema.fetches, 1);
//! # });
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;

use super::schema::{FieldSchema, TagClass, TypeDescriptor};
use super::types::TypeName;
use crate::catalog::{Catalog, CatalogError, DescriptorRole};

/// Default limit on composite nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Errors from schema resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The descriptor service failed or did not answer.
    #[error("failed to fetch descriptor for '{type_name}': {source}")]
    Fetch {
        type_name: String,
        #[source]
        source: CatalogError,
    },

    /// The descriptor could not be interpreted.
    #[error("malformed descriptor for '{type_name}': {message}")]
    MalformedDescriptor { type_name: String, message: String },

    /// A type references itself, directly or transitively.
    #[error("type cycle: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    /// Composite nesting exceeded the configured limit.
    #[error("nesting deeper than {max_depth} levels at '{type_name}'")]
    DepthExceeded { type_name: String, max_depth: usize },
}

/// Resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Maximum composite nesting below the root.
    pub max_depth: usize,
    /// Memoise descriptors per resolver instance.
    pub cache_descriptors: bool,
    /// Upper bound on each descriptor fetch.
    pub fetch_timeout: Option<Duration>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache_descriptors: false,
            fetch_timeout: None,
        }
    }
}

/// A fully resolved schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// The type that was resolved.
    pub root: TypeName,
    /// Descriptor role used for the root.
    pub role: DescriptorRole,
    /// Top-level fields, with every composite populated.
    pub fields: Vec<FieldSchema>,
    /// Descriptor fetches issued to the catalog.
    pub fetches: usize,
}

type ResolveFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<FieldSchema>, ResolveError>> + Send + 'a>>;

/// State threaded through one resolution.
#[derive(Debug, Default)]
struct Walk {
    /// Composite types from the root to the current field.
    chain: Vec<TypeName>,
    fetches: usize,
}

/// Resolves type names against a catalog.
pub struct SchemaResolver<'a> {
    catalog: &'a dyn Catalog,
    options: ResolverOptions,
    cache: Mutex<DescriptorCache>,
}

type DescriptorCache = HashMap<(TypeName, DescriptorRole), TypeDescriptor>;

impl<'a> SchemaResolver<'a> {
    pub fn new(catalog: &'a dyn Catalog, options: ResolverOptions) -> Self {
        Self {
            catalog,
            options,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve a message type.
    pub async fn resolve(&self, type_name: &TypeName) -> Result<ResolvedSchema, ResolveError> {
        self.resolve_with(type_name, DescriptorRole::Message).await
    }

    /// Resolve a type, fetching the root descriptor with `role`.
    ///
    /// Nested composite fields are always fetched as plain messages.
    pub async fn resolve_with(
        &self,
        type_name: &TypeName,
        role: DescriptorRole,
    ) -> Result<ResolvedSchema, ResolveError> {
        let mut walk = Walk::default();
        let fields = self.resolve_fields(type_name.clone(), role, &mut walk).await?;

        tracing::debug!(
            type_name = %type_name,
            %role,
            fetches = walk.fetches,
            "resolved schema"
        );

        Ok(ResolvedSchema {
            root: type_name.clone(),
            role,
            fields,
            fetches: walk.fetches,
        })
    }

    fn resolve_fields<'s>(
        &'s self,
        type_name: TypeName,
        role: DescriptorRole,
        walk: &'s mut Walk,
    ) -> ResolveFuture<'s> {
        Box::pin(async move {
            if walk.chain.contains(&type_name) {
                let mut chain: Vec<String> = walk.chain.iter().map(TypeName::to_string).collect();
                chain.push(type_name.to_string());
                return Err(ResolveError::Cycle { chain });
            }
            // The root sits at depth 0.
            if walk.chain.len() > self.options.max_depth {
                return Err(ResolveError::DepthExceeded {
                    type_name: type_name.to_string(),
                    max_depth: self.options.max_depth,
                });
            }

            let descriptor = self.descriptor(&type_name, role, walk).await?;
            let raw = descriptor
                .fields()
                .map_err(|message| ResolveError::MalformedDescriptor {
                    type_name: type_name.to_string(),
                    message,
                })?;

            walk.chain.push(type_name.clone());
            let mut fields = Vec::with_capacity(raw.len());
            for field in raw {
                let class =
                    TagClass::classify(field.tag).map_err(|e| ResolveError::MalformedDescriptor {
                        type_name: type_name.to_string(),
                        message: format!("field '{}': {}", field.name, e),
                    })?;

                let mut schema = match class {
                    TagClass::Primitive(tag) => FieldSchema::primitive(field.name, tag),
                    TagClass::Time => FieldSchema::time(field.name),
                    TagClass::Composite(nested) => {
                        let children = self
                            .resolve_fields(nested.clone(), DescriptorRole::Message, walk)
                            .await?;
                        FieldSchema::composite(field.name, nested, children)
                    }
                };
                schema.arity = field.arity;
                fields.push(schema);
            }
            walk.chain.pop();

            Ok(fields)
        })
    }

    async fn descriptor(
        &self,
        type_name: &TypeName,
        role: DescriptorRole,
        walk: &mut Walk,
    ) -> Result<TypeDescriptor, ResolveError> {
        let key = (type_name.clone(), role);
        if self.options.cache_descriptors {
            if let Some(hit) = self.cached(&key) {
                tracing::trace!(type_name = %type_name, "descriptor cache hit");
                return Ok(hit);
            }
        }

        tracing::debug!(
            type_name = %type_name,
            %role,
            depth = walk.chain.len(),
            "fetching descriptor"
        );
        walk.fetches += 1;

        let fetch = self.catalog.type_descriptor(type_name, role);
        let result = match self.options.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => Err(CatalogError::Timeout(limit)),
            },
            None => fetch.await,
        };

        let descriptor = result.map_err(|source| {
            tracing::warn!(type_name = %type_name, error = %source, "descriptor fetch failed");
            ResolveError::Fetch {
                type_name: type_name.to_string(),
                source,
            }
        })?;

        if self.options.cache_descriptors {
            self.cache_lock().insert(key, descriptor.clone());
        }
        Ok(descriptor)
    }

    fn cached(&self, key: &(TypeName, DescriptorRole)) -> Option<TypeDescriptor> {
        self.cache_lock().get(key).cloned()
    }

    /// Lock the cache, recovering it if a holder panicked.
    ///
    /// Entries are inserted whole, so a poisoned map is still consistent.
    fn cache_lock(&self) -> MutexGuard<'_, DescriptorCache> {
        self.cache.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("descriptor cache lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}
