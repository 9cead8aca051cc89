use core::fmt;

use crate::record::ValueShape;
use crate::schema::RecordSchema;

// -----------------------------------------------------------------------------
// ScalarKind

/// The declared kind of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    /// Signed integers up to `i64`.
    Int,
    /// Unsigned integers up to `u64`.
    UInt,
    Float,
    /// Encoded as a one-character string.
    Char,
    Str,
}

impl ScalarKind {
    /// The document shape values of this kind arrive as.
    pub const fn shape(self) -> ValueShape {
        match self {
            ScalarKind::Bool => ValueShape::Bool,
            ScalarKind::Int | ScalarKind::UInt | ScalarKind::Float => ValueShape::Number,
            ScalarKind::Char | ScalarKind::Str => ValueShape::String,
        }
    }
}

// -----------------------------------------------------------------------------
// FieldKind

/// The declared shape of a field, down to its leaves.
///
/// The decoder walks document nodes against this description: it is what
/// tells the graph builder whether a JSON object is a nested record (with
/// `$id`/`$ref` identity semantics) or a plain string-keyed map, and which
/// record type to allocate for it.
#[derive(Clone)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// A nullable wrapper: `null` is accepted and encodes the absent case.
    Optional(Box<FieldKind>),
    /// A homogeneous sequence of the inner kind.
    List(Box<FieldKind>),
    /// A string-keyed mapping to the inner kind. No identity semantics.
    Map(Box<FieldKind>),
    /// A nested record. The schema link is a function pointer so that
    /// self-referential types can describe themselves without recursing at
    /// schema-build time.
    Record(fn() -> &'static RecordSchema),
}

impl FieldKind {
    /// The document shape values of this kind arrive as.
    pub fn shape(&self) -> ValueShape {
        match self {
            FieldKind::Scalar(scalar) => scalar.shape(),
            FieldKind::Optional(inner) => inner.shape(),
            FieldKind::List(_) => ValueShape::List,
            FieldKind::Map(_) => ValueShape::Map,
            FieldKind::Record(_) => ValueShape::Record,
        }
    }

    /// The nested record schema, if this kind (or its nullable wrapper)
    /// describes a record.
    pub fn record_schema(&self) -> Option<&'static RecordSchema> {
        match self {
            FieldKind::Record(schema) => Some(schema()),
            FieldKind::Optional(inner) => inner.record_schema(),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(scalar) => write!(f, "Scalar({scalar:?})"),
            FieldKind::Optional(inner) => write!(f, "Optional({inner:?})"),
            FieldKind::List(inner) => write!(f, "List({inner:?})"),
            FieldKind::Map(inner) => write!(f, "Map({inner:?})"),
            // Calling through would recurse on self-referential types.
            FieldKind::Record(_) => f.write_str("Record(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FieldKind, ScalarKind};
    use crate::record::ValueShape;

    #[test]
    fn shapes_see_through_optional() {
        let kind = FieldKind::Optional(Box::new(FieldKind::Scalar(ScalarKind::Int)));
        assert_eq!(kind.shape(), ValueShape::Number);

        let kind = FieldKind::List(Box::new(FieldKind::Scalar(ScalarKind::Str)));
        assert_eq!(kind.shape(), ValueShape::List);
    }
}
