use crate::record::{ShapeError, Value};
use crate::schema::FieldKind;

// -----------------------------------------------------------------------------
// FieldType

/// A type that can live in a record field.
///
/// `FieldType` is the bridge the derive-generated accessors go through:
/// [`to_value`](FieldType::to_value) reads a field into a [`Value`] for the
/// encoder, [`from_value`](FieldType::from_value) converts a decoded
/// [`Value`] back, and [`kind`](FieldType::kind) describes the declared
/// shape so the decoder knows how to interpret document nodes before any
/// instance exists.
///
/// Implementations are provided for the scalar types, `String`, `char`,
/// `Option<T>`, `Vec<T>`, `BTreeMap<String, T>`, and
/// [`Link<T>`](crate::Link) — see [`impls`](crate::impls).
pub trait FieldType: Sized + 'static {
    /// The declared shape of this field type.
    fn kind() -> FieldKind;

    /// Reads this field into a [`Value`].
    ///
    /// Scalars are copied; records are aliased (the returned value shares
    /// identity with the field).
    fn to_value(&self) -> Value;

    /// Converts a decoded [`Value`] into this field type.
    fn from_value(value: Value) -> Result<Self, ShapeError>;
}
