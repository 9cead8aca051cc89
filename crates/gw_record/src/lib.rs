#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `gw_record` in
// doc testing and derive-generated code. An `extern self` keeps `gw_record`
// valid as an alias for `crate` in both places.
extern crate self as gw_record;

// -----------------------------------------------------------------------------
// Modules

mod record;

pub mod codec;
pub mod impls;
pub mod registry;
pub mod schema;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use record::{FieldType, Handle, Link, Record, Schematic};
pub use record::{ShapeError, Value, ValueShape};

pub use codec::{DecodeError, EncodeError, SchemaError};
pub use codec::{Deserializer, Serializer, TrackerStats};
pub use codec::{from_str, to_string, to_string_pretty};

pub use gw_record_derive as derive;
