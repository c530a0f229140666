//! panel::registry
//!
//! Explicit registry of panel kinds.
//!
//! # Design
//!
//! The registry is an ordinary value built at startup and passed to whoever
//! creates panels. Kinds are looked up by name in a closed map; an unknown
//! name is an error, never a dynamic lookup.
//!
//! # Example
//!
//! ```
//! use rosdesk::panel::{PanelRegistry, PanelSettings};
//!
//! let registry = PanelRegistry::with_defaults();
//! let panel = registry
//!     .create("monitor", "/odom", &PanelSettings::default())
//!     .unwrap();
//! assert_eq!(panel.kind(), "monitor");
//! assert!(registry.create("plot", "/odom", &PanelSettings::default()).is_err());
//! ```

use indexmap::IndexMap;
use thiserror::Error;

use super::{MonitorPanel, Panel, PanelSettings, ParamPanel, PublisherPanel, ServicePanel};
use crate::catalog::EntityKind;

/// Errors from registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown panel kind '{name}', must be one of: {}", .known.join(", "))]
    UnknownKind { name: String, known: Vec<String> },

    #[error("panel kind '{0}' is already registered")]
    Duplicate(String),
}

/// Constructor for one panel kind.
pub type PanelConstructor = fn(&str, &PanelSettings) -> Box<dyn Panel>;

/// A registered panel kind.
#[derive(Clone, Copy)]
pub struct PanelSpec {
    pub name: &'static str,
    /// Which catalog listing this kind's targets come from.
    pub entity: EntityKind,
    pub description: &'static str,
    pub construct: PanelConstructor,
}

impl std::fmt::Debug for PanelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelSpec")
            .field("name", &self.name)
            .field("entity", &self.entity)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Name to constructor mapping, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    specs: IndexMap<&'static str, PanelSpec>,
}

impl PanelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in panel kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let builtin = [
            PanelSpec {
                name: MonitorPanel::KIND,
                entity: EntityKind::Topics,
                description: "display incoming messages of a topic",
                construct: |target, settings| Box::new(MonitorPanel::new(target, *settings)),
            },
            PanelSpec {
                name: PublisherPanel::KIND,
                entity: EntityKind::Topics,
                description: "compose and save messages for a topic",
                construct: |target, settings| Box::new(PublisherPanel::new(target, *settings)),
            },
            PanelSpec {
                name: ServicePanel::KIND,
                entity: EntityKind::Services,
                description: "compose service requests and show responses",
                construct: |target, settings| Box::new(ServicePanel::new(target, *settings)),
            },
            PanelSpec {
                name: ParamPanel::KIND,
                entity: EntityKind::Params,
                description: "read and write a parameter",
                construct: |target, settings| Box::new(ParamPanel::new(target, *settings)),
            },
        ];
        for spec in builtin {
            registry.specs.insert(spec.name, spec);
        }
        registry
    }

    /// Add a panel kind.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the name is taken.
    pub fn register(&mut self, spec: PanelSpec) -> Result<(), RegistryError> {
        if self.specs.contains_key(spec.name) {
            return Err(RegistryError::Duplicate(spec.name.to_string()));
        }
        self.specs.insert(spec.name, spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PanelSpec> {
        self.specs.get(name)
    }

    /// Registered kinds, in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &PanelSpec> {
        self.specs.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.keys().copied().collect()
    }

    /// Create a panel of kind `name` targeting `target`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKind` if `name` is not registered.
    pub fn create(
        &self,
        name: &str,
        target: &str,
        settings: &PanelSettings,
    ) -> Result<Box<dyn Panel>, RegistryError> {
        let spec = self.get(name).ok_or_else(|| RegistryError::UnknownKind {
            name: name.to_string(),
            known: self.names().into_iter().map(String::from).collect(),
        })?;
        Ok((spec.construct)(target, settings))
    }
}
