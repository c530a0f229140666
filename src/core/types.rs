//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`TypeName`] - Validated message/service type identifier
//! - [`ScalarTag`] - The closed set of scalar field type tags
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use rosdesk::core::types::{ScalarTag, TypeName};
//!
//! let point = TypeName::new("geometry_msgs/Point").unwrap();
//! assert_eq!(point.as_str(), "geometry_msgs/Point");
//!
//! assert_eq!(ScalarTag::parse("float64"), Some(ScalarTag::Float64));
//! assert_eq!(ScalarTag::parse("geometry_msgs/Point"), None);
//!
//! assert!(TypeName::new("").is_err());
//! assert!(TypeName::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The reserved type tag for wall-clock time fields.
pub const TIME_TAG: &str = "time";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid type name: {0}")]
    InvalidTypeName(String),
}

/// A validated type identifier as reported by the descriptor service.
///
/// Type names must:
/// - Not be empty
/// - Not contain whitespace or ASCII control characters
///
/// Both the package-qualified form (`std_msgs/Header`) and the bare form
/// (`Header`) are accepted; the service decides which one resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    /// Create a new validated type name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTypeName` if the name is empty or contains
    /// whitespace or control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidTypeName(
                "type name cannot be empty".into(),
            ));
        }
        if let Some(c) = name
            .chars()
            .find(|c| c.is_whitespace() || c.is_ascii_control())
        {
            return Err(TypeError::InvalidTypeName(format!(
                "type name '{}' contains invalid character {:?}",
                name.escape_debug(),
                c
            )));
        }
        Ok(Self(name))
    }

    /// Get the type name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TypeName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeName> for String {
    fn from(name: TypeName) -> Self {
        name.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scalar field type tags.
///
/// Anything outside this set (and not [`TIME_TAG`]) is treated as the name of
/// a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarTag {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Duration,
    Char,
    Byte,
    String,
}

impl ScalarTag {
    /// Every scalar tag, in declaration order.
    pub const ALL: [ScalarTag; 15] = [
        ScalarTag::Bool,
        ScalarTag::Int8,
        ScalarTag::Uint8,
        ScalarTag::Int16,
        ScalarTag::Uint16,
        ScalarTag::Int32,
        ScalarTag::Uint32,
        ScalarTag::Int64,
        ScalarTag::Uint64,
        ScalarTag::Float32,
        ScalarTag::Float64,
        ScalarTag::Duration,
        ScalarTag::Char,
        ScalarTag::Byte,
        ScalarTag::String,
    ];

    /// Parse a wire tag. Returns `None` for anything outside the scalar set.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == tag)
    }

    /// The wire spelling of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarTag::Bool => "bool",
            ScalarTag::Int8 => "int8",
            ScalarTag::Uint8 => "uint8",
            ScalarTag::Int16 => "int16",
            ScalarTag::Uint16 => "uint16",
            ScalarTag::Int32 => "int32",
            ScalarTag::Uint32 => "uint32",
            ScalarTag::Int64 => "int64",
            ScalarTag::Uint64 => "uint64",
            ScalarTag::Float32 => "float32",
            ScalarTag::Float64 => "float64",
            ScalarTag::Duration => "duration",
            ScalarTag::Char => "char",
            ScalarTag::Byte => "byte",
            ScalarTag::String => "string",
        }
    }

    /// Whether values of this tag are expected to be numeric.
    ///
    /// Only consulted in strict input mode.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ScalarTag::String | ScalarTag::Bool)
    }
}

impl std::fmt::Display for ScalarTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod type_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(TypeName::new("std_msgs/Header").is_ok());
            assert!(TypeName::new("Point").is_ok());
            assert!(TypeName::new("pkg/Sub_Type2").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(TypeName::new("").is_err());
        }

        #[test]
        fn whitespace_rejected() {
            assert!(TypeName::new("std_msgs/ Header").is_err());
            assert!(TypeName::new("Header\n").is_err());
            assert!(TypeName::new("\tHeader").is_err());
        }

        #[test]
        fn display() {
            let name = TypeName::new("geometry_msgs/Pose").unwrap();
            assert_eq!(format!("{}", name), "geometry_msgs/Pose");
        }

        #[test]
        fn serde_roundtrip() {
            let name = TypeName::new("geometry_msgs/Pose").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"geometry_msgs/Pose\"");
            let parsed: TypeName = serde_json::from_str(&json).unwrap();
            assert_eq!(name, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<TypeName, _> = serde_json::from_str("\"\"");
            assert!(result.is_err());
        }
    }

    mod scalar_tag {
        use super::*;

        #[test]
        fn parse_every_tag() {
            for tag in ScalarTag::ALL {
                assert_eq!(ScalarTag::parse(tag.as_str()), Some(tag));
            }
        }

        #[test]
        fn time_is_not_scalar() {
            assert_eq!(ScalarTag::parse(TIME_TAG), None);
        }

        #[test]
        fn composite_names_are_not_scalar() {
            assert_eq!(ScalarTag::parse("std_msgs/Header"), None);
            assert_eq!(ScalarTag::parse("Float64"), None);
        }

        #[test]
        fn numeric_tags() {
            assert!(ScalarTag::Float32.is_numeric());
            assert!(ScalarTag::Uint8.is_numeric());
            assert!(!ScalarTag::String.is_numeric());
            assert!(!ScalarTag::Bool.is_numeric());
        }
    }
}
