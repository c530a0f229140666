//! core
//!
//! Core domain types, schemas, and marshalling for rosdesk.
//!
//! # Modules
//!
//! - [`types`] - Strong types: TypeName, ScalarTag
//! - [`names`] - Hierarchical name forests for navigation
//! - [`schema`] - Type descriptors and resolved field schemas
//! - [`resolver`] - Recursive schema resolution against a catalog
//! - [`value`] - Plain nested values exchanged with the transport
//! - [`value_tree`] - Placeholder binding, collect and refresh
//! - [`format`] - Number display formats
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Field kinds are classified once, during resolution
//! - Every remote failure is returned, never swallowed
//! - No I/O apart from config files; the transport belongs to the caller

pub mod config;
pub mod format;
pub mod names;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod value;
pub mod value_tree;
