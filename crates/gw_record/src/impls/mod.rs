//! [`FieldType`](crate::FieldType) implementations for the types records
//! may declare as fields.
//!
//! - Scalars: `bool`, the signed and unsigned integers, `f32`/`f64`,
//!   `char`, `String`.
//! - Containers: `Option<T>`, `Vec<T>`, `BTreeMap<String, T>`.
//! - Records: [`Link<T>`](crate::Link).

// -----------------------------------------------------------------------------
// Modules

mod container;
mod link;
mod scalar;
