//! The record object model.
//!
//! ## Menu
//!
//! - [`Record`]: The object-safe trait giving schema-indexed field access.
//! - [`Schematic`]: The static side — every record type owns one cached
//!   [`RecordSchema`](crate::schema::RecordSchema).
//! - [`FieldType`]: Conversion between typed field values and [`Value`].
//! - [`Link`] / [`Handle`]: Shared record handles, typed and type-erased.
//! - [`Value`] / [`ValueShape`] / [`ShapeError`]: The field-value variant
//!   and its mismatch error.

// -----------------------------------------------------------------------------
// Modules

mod field_type;
mod link;
mod record;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use field_type::FieldType;
pub use link::{Handle, Link};
pub use record::{Record, Schematic};
pub use value::{ShapeError, Value, ValueShape};
