use thiserror::Error;

use crate::record::ShapeError;

// -----------------------------------------------------------------------------
// SchemaError

/// Registry-level misconfiguration discovered while resolving a target type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("document embeds no `$type` field and no target type was given")]
    MissingTypeTag,

    #[error("type name `{name}` matches multiple registered record types")]
    AmbiguousTypeName { name: String },
}

// -----------------------------------------------------------------------------
// EncodeError

/// An encode pass failed. The pass-scoped tracker is discarded; the input
/// graph is never mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// Strict mode only: a value on the active expansion path was revisited.
    /// The default mode compacts such revisits to `$ref` markers instead.
    #[error("circular reference through `{type_name}`")]
    CircularReference { type_name: &'static str },

    #[error("value is a `{found}` record, not the requested `{expected}`")]
    WrongType {
        expected: String,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// DecodeError

/// A decode pass failed. The pass-scoped reference table and any partially
/// built instances are discarded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Malformed document syntax. `line` and `column` locate the offending
    /// token (1-based).
    #[error("parse error: {reason}")]
    Parse {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("unknown type name `{name}`")]
    UnknownType { name: String },

    #[error("missing required field `{field}` of `{type_name}`")]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
    },

    /// A document node's shape does not match the field's declared kind.
    #[error("field `{field}` of `{type_name}`: {source}")]
    TypeMismatch {
        type_name: &'static str,
        field: &'static str,
        source: ShapeError,
    },

    /// A `$ref` pointed at an id that no `$id` in the document defines.
    #[error("dangling reference: id {id} is never defined")]
    DanglingReference { id: u64 },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::DecodeError;
    use crate::record::{ShapeError, ValueShape};

    #[test]
    fn mismatch_reports_field_context() {
        let err = DecodeError::TypeMismatch {
            type_name: "Node",
            field: "label",
            source: ShapeError::shape(ValueShape::String, ValueShape::List),
        };
        assert_eq!(
            err.to_string(),
            "field `label` of `Node`: expected a string, found a list"
        );
    }
}
