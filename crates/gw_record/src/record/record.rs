use core::any::Any;

use crate::record::{ShapeError, Value};
use crate::schema::RecordSchema;

// -----------------------------------------------------------------------------
// Record

/// The object-safe trait implemented by every serializable record type.
///
/// Implemented by [`#[derive(Record)]`](crate::derive::Record); the derive
/// generates field accessors that agree with the type's cached
/// [`RecordSchema`], so `get_at`/`set_at` indices are always the
/// [`FieldSchema::index`](crate::schema::FieldSchema::index) values of that
/// schema. Ignored fields have no index and are unreachable through this
/// trait.
///
/// # Examples
///
/// ```
/// use gw_record::{Record, Value, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Reading {
///     sensor: String,
///     celsius: f64,
/// }
///
/// let reading = Reading { sensor: "kitchen".into(), celsius: 21.5 };
/// let dynamic: &dyn Record = &reading;
///
/// assert_eq!(dynamic.record_schema().field_len(), 2);
/// assert!(matches!(dynamic.get_at(0), Some(Value::Str(_))));
/// assert!(dynamic.get_at(2).is_none());
/// ```
pub trait Record: Any {
    /// The schema describing this record's serializable fields.
    fn record_schema(&self) -> &'static RecordSchema;

    /// Reads the field at the given schema index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn get_at(&self, index: usize) -> Option<Value>;

    /// Writes the field at the given schema index.
    ///
    /// Fails with [`ShapeError`] if the value does not convert to the
    /// field's type, or if the index is out of bounds.
    fn set_at(&mut self, index: usize, value: Value) -> Result<(), ShapeError>;
}

// -----------------------------------------------------------------------------
// Schematic

/// The static companion of [`Record`]: access to the schema without an
/// instance.
///
/// The schema is built once per type on first use and cached for the process
/// lifetime; the derive stores it in a `OnceLock`, so concurrent first
/// callers race safely and observe the same immutable descriptor.
///
/// # Examples
///
/// ```
/// use gw_record::{Schematic, derive::Record};
///
/// #[derive(Record, Default)]
/// #[record(name = "Temp")]
/// struct Reading {
///     celsius: f64,
/// }
///
/// assert_eq!(Reading::schema().name(), "Temp");
/// // Resolution is idempotent: always the same cached descriptor.
/// assert!(core::ptr::eq(Reading::schema(), Reading::schema()));
/// ```
pub trait Schematic: Record + Sized {
    /// The cached [`RecordSchema`] of this type.
    fn schema() -> &'static RecordSchema;
}
