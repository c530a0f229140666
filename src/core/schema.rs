//! core::schema
//!
//! Field schemas discovered at runtime from the descriptor service.
//!
//! # Wire Format
//!
//! The service describes a type as three parallel arrays:
//!
//! ```json
//! {
//!   "type": "geometry_msgs/Point",
//!   "fieldnames": ["x", "y", "z"],
//!   "fieldtypes": ["float64", "float64", "float64"],
//!   "fieldarraylen": [-1, -1, -1]
//! }
//! ```
//!
//! Index `i` across all three arrays describes field `i`. The array-length
//! indicator is `0` for a variable-length array, a positive count for a
//! fixed-size array (treated as scalar), and negative for a plain scalar.
//!
//! # Classification
//!
//! Each type tag is classified exactly once, during resolution, into a
//! [`FieldKind`]: a scalar from the closed [`ScalarTag`] set, the reserved
//! time tag, or otherwise a composite type to be resolved recursively.

use serde::{Deserialize, Serialize};

use super::types::{ScalarTag, TypeError, TypeName, TIME_TAG};

/// Raw type description as returned by the descriptor service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// The described type (informational).
    #[serde(rename = "type", default)]
    pub type_name: String,
    /// Field names, positionally aligned.
    pub fieldnames: Vec<String>,
    /// Field type tags, positionally aligned.
    pub fieldtypes: Vec<String>,
    /// Array-length indicators, positionally aligned.
    pub fieldarraylen: Vec<i64>,
}

impl TypeDescriptor {
    /// Zip the three parallel arrays into raw fields.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch if the arrays differ in length.
    pub fn fields(&self) -> Result<Vec<RawField<'_>>, String> {
        let n = self.fieldnames.len();
        if self.fieldtypes.len() != n || self.fieldarraylen.len() != n {
            return Err(format!(
                "descriptor arrays differ in length: {} names, {} types, {} array lengths",
                n,
                self.fieldtypes.len(),
                self.fieldarraylen.len()
            ));
        }

        Ok(self
            .fieldnames
            .iter()
            .zip(&self.fieldtypes)
            .zip(&self.fieldarraylen)
            .map(|((name, tag), &len)| RawField {
                name,
                tag,
                arity: Arity::from_indicator(len),
            })
            .collect())
    }
}

/// One positionally zipped field before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    pub name: &'a str,
    pub tag: &'a str,
    pub arity: Arity,
}

/// Array shape of a field, derived from the array-length indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Not an array.
    Scalar,
    /// Variable-length array of the element type (indicator `0`).
    Variable,
    /// Fixed-size array; displayed and collected as a scalar.
    Fixed(usize),
}

impl Arity {
    /// Interpret a wire array-length indicator.
    pub fn from_indicator(len: i64) -> Self {
        match len {
            0 => Arity::Variable,
            n if n > 0 => Arity::Fixed(n as usize),
            _ => Arity::Scalar,
        }
    }

    /// Only variable-length arrays get array semantics.
    pub fn is_array(&self) -> bool {
        matches!(self, Arity::Variable)
    }
}

/// Classification of a raw type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagClass {
    Primitive(ScalarTag),
    Time,
    Composite(TypeName),
}

impl TagClass {
    /// Classify a type tag: scalar set first, then the time tag, and
    /// everything else as a composite type name.
    ///
    /// # Errors
    ///
    /// Fails only if the tag cannot be a type name at all (e.g. empty).
    pub fn classify(tag: &str) -> Result<Self, TypeError> {
        if let Some(scalar) = ScalarTag::parse(tag) {
            Ok(TagClass::Primitive(scalar))
        } else if tag == TIME_TAG {
            Ok(TagClass::Time)
        } else {
            TypeName::new(tag).map(TagClass::Composite)
        }
    }
}

/// Resolved kind of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Scalar value shown in a single placeholder.
    Primitive { tag: ScalarTag },
    /// Wall-clock time, always shown as `secs`/`nsecs`.
    Time,
    /// Nested type with its resolved fields.
    Composite {
        type_name: TypeName,
        fields: Vec<FieldSchema>,
    },
}

/// Descriptor of one field of a composite type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    pub arity: Arity,
}

impl FieldSchema {
    /// A scalar primitive field.
    pub fn primitive(name: impl Into<String>, tag: ScalarTag) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Primitive { tag },
            arity: Arity::Scalar,
        }
    }

    /// A time field.
    pub fn time(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Time,
            arity: Arity::Scalar,
        }
    }

    /// A resolved composite field.
    pub fn composite(
        name: impl Into<String>,
        type_name: TypeName,
        fields: Vec<FieldSchema>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Composite { type_name, fields },
            arity: Arity::Scalar,
        }
    }

    /// Turn this field into a variable-length array of its type.
    pub fn into_array(mut self) -> Self {
        self.arity = Arity::Variable;
        self
    }

    /// Whether the field has array semantics.
    pub fn is_array(&self) -> bool {
        self.arity.is_array()
    }

    /// The nested schema of a composite field.
    pub fn children(&self) -> Option<&[FieldSchema]> {
        match &self.kind {
            FieldKind::Composite { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// The wire type tag, with `[]` appended for variable-length arrays.
    pub fn display_type(&self) -> String {
        let base = match &self.kind {
            FieldKind::Primitive { tag } => tag.as_str().to_string(),
            FieldKind::Time => TIME_TAG.to_string(),
            FieldKind::Composite { type_name, .. } => type_name.to_string(),
        };
        if self.is_array() {
            format!("{}[]", base)
        } else {
            base
        }
    }
}
