//! rosdesk - catalog browser and runtime-schema form engine
//!
//! rosdesk talks to a robot middleware bridge, lists its topics, services,
//! parameters and nodes, and turns type descriptors fetched at runtime into
//! editable forms: text placeholders that collect into structured values and
//! refresh from incoming ones.
//!
//! # Architecture
//!
//! - [`catalog`] - The remote catalog service (HTTP bridge client and a mock)
//! - [`core`] - Name forests, schema resolution, value trees, configuration
//! - [`panel`] - Consumers that bind one catalog entity to a value tree
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Output formatting
//!
//! # Invariants
//!
//! 1. A resolved schema mirrors its descriptors field for field, in order
//! 2. Collecting a tree refreshed from a value yields that value again,
//!    up to the display precision of numbers and excepting time fields
//! 3. A torn-down panel never writes to its placeholders

pub mod catalog;
pub mod cli;
pub mod core;
pub mod panel;
pub mod ui;
