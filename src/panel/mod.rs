//! panel
//!
//! Consumers of the core: panels that bind a catalog entity to a value tree.
//!
//! # Architecture
//!
//! Each panel targets one entity (a topic, a service or a parameter). On
//! [`Panel::attach`] it looks up the entity's type, resolves the schema and
//! binds it to placeholders. Until then every value operation fails with
//! `NotReady`; after [`Panel::teardown`] every operation fails with
//! `Detached` and late resolutions are discarded.
//!
//! Panels are created through an explicit [`PanelRegistry`], which maps kind
//! names to constructors.
//!
//! # Modules
//!
//! - [`monitor`]: display incoming messages of a topic
//! - [`publisher`]: compose messages for a topic
//! - [`service`]: compose requests and display responses of a service
//! - [`param`]: read and write a parameter
//! - [`registry`]: kind name to constructor mapping

pub mod monitor;
pub mod param;
pub mod publisher;
pub mod registry;
pub mod service;

pub use monitor::MonitorPanel;
pub use param::ParamPanel;
pub use publisher::PublisherPanel;
pub use registry::{PanelRegistry, PanelSpec, RegistryError};
pub use service::ServicePanel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, DescriptorRole};
use crate::core::config::Config;
use crate::core::format::NumberFormat;
use crate::core::resolver::{ResolveError, ResolverOptions, SchemaResolver};
use crate::core::types::TypeName;
use crate::core::value::Value;
use crate::core::value_tree::{BoundTree, TextFactory, ValueTree, ValueTreeError};

/// Errors from panel operations.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Tree(#[from] ValueTreeError),

    #[error("saved state is for a {found} panel, not {expected}")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },
}

/// Settings shared by every panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSettings {
    pub resolver: ResolverOptions,
    pub number_format: NumberFormat,
    pub strict_input: bool,
}

impl PanelSettings {
    /// Settings taken from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            resolver: config.resolver_options(),
            number_format: config.number_format(),
            strict_input: config.strict_input(),
        }
    }
}

/// Persisted panel state.
///
/// `values` is whatever the panel collected; handing it back on restore
/// reproduces the displayed state (time fields are regenerated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPanel {
    pub kind: String,
    pub target: String,
    #[serde(default)]
    pub values: Value,
}

/// Resolve `type_name` and bind the result into `bound`.
pub(crate) async fn bind_tree(
    bound: &mut BoundTree<TextFactory>,
    catalog: &dyn Catalog,
    settings: &PanelSettings,
    type_name: &TypeName,
    role: DescriptorRole,
    saved: Option<&Value>,
) -> Result<(), PanelError> {
    let resolver = SchemaResolver::new(catalog, settings.resolver);
    let format = settings.number_format;
    let strict = settings.strict_input;

    bound
        .bind(resolver.resolve_with(type_name, role), |fields| {
            ValueTree::build(fields, saved, TextFactory)
                .with_format(format)
                .with_strict(strict)
        })
        .await?;
    Ok(())
}

/// A consumer bound to one catalog entity.
#[async_trait]
pub trait Panel: Send {
    /// Registry name of this panel kind.
    fn kind(&self) -> &'static str;

    /// The entity this panel targets.
    fn target(&self) -> &str;

    /// Resolve the target's schema and bind placeholders.
    ///
    /// # Errors
    ///
    /// Catalog and resolution failures are returned; nothing is retried.
    async fn attach(&mut self, catalog: &dyn Catalog) -> Result<(), PanelError>;

    /// Whether [`attach`](Panel::attach) completed successfully.
    fn is_attached(&self) -> bool;

    /// Every displayed placeholder as `(path, text)`.
    fn entries(&self) -> Result<Vec<(String, String)>, PanelError>;

    /// Release placeholders and stop any further writes.
    fn teardown(&mut self);
}
