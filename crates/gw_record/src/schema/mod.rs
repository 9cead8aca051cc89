//! Schema descriptors: the cached, ordered description of a record type's
//! serializable fields.
//!
//! ## Menu
//!
//! - [`RecordSchema`]: One record type — name, null policy, ordered fields,
//!   constructor.
//! - [`FieldSchema`]: One field — document key, required flag, emission
//!   order, declared [`FieldKind`].
//! - [`FieldKind`] / [`ScalarKind`]: The declared value shapes driving the
//!   decoder.
//!
//! Schemas are built lazily by [`Schematic::schema`](crate::Schematic::schema)
//! and never change after first build; everything here is plain immutable
//! data safe to share across passes and threads.

// -----------------------------------------------------------------------------
// Modules

mod field_kind;
mod field_schema;
mod record_schema;

// -----------------------------------------------------------------------------
// Exports

pub use field_kind::{FieldKind, ScalarKind};
pub use field_schema::FieldSchema;
pub use record_schema::RecordSchema;
