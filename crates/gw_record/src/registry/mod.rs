//! Provide the schema registry for name-driven decoding.
//!
//! ## Menu
//!
//! - [`SchemaRegistry`]: Maps `TypeId`s and registered type names to
//!   [`RecordSchema`](crate::schema::RecordSchema)s.
//! - [`SchemaRegistryArc`]: A shared, lock-guarded registry for use across
//!   threads.
//!
//! ## auto_register
//!
//! See [`SchemaRegistry::auto_register`].
//!
//! Static registration uses the [`inventory`] crate; not every platform
//! supports it (although the major ones do). When unsupported,
//! `auto_register` simply returns `false` without registering anything.

// -----------------------------------------------------------------------------
// Modules

mod schema_registry;

// -----------------------------------------------------------------------------
// Exports

pub use schema_registry::{SchemaRegistry, SchemaRegistryArc};
