//! The JSON codec: record graphs to documents and back.
//!
//! ## Menu
//!
//! - [`Serializer`]: Walks a graph once per composite, emitting `$id`s on
//!   first visits and `{"$ref": id}` markers on repeats.
//! - [`Deserializer`]: Parses a document and rebuilds the graph, restoring
//!   shared identity through a pass-scoped reference table and a back-patch
//!   queue for forward references.
//! - [`ReferenceTracker`] / [`TrackerStats`]: Encode-side identity
//!   bookkeeping and its statistics snapshot.
//! - [`SchemaError`] / [`EncodeError`] / [`DecodeError`]: The error
//!   taxonomy. All failures surface synchronously to the calling pass and
//!   leave no state behind.
//!
//! The document format is plain JSON; identity is carried in-band:
//!
//! ```json
//! {
//!   "$id": 1,
//!   "label": "root",
//!   "next": { "$id": 2, "label": "leaf", "next": { "$ref": 1 } }
//! }
//! ```
//!
//! For the common static-type round trip, use the top-level helpers:
//!
//! ```
//! use gw_record::{Link, from_str, to_string, derive::Record};
//!
//! #[derive(Record, Default)]
//! struct Pixel {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let pixel = Link::new(Pixel { x: 3, y: 4 });
//! let text = to_string(&pixel).unwrap();
//! let back: Link<Pixel> = from_str(&text).unwrap();
//! assert_eq!(back.borrow().x, 3);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod decode;
mod encode;
mod error;
mod tracker;

// -----------------------------------------------------------------------------
// Exports

pub use decode::{Deserializer, from_str};
pub use encode::Serializer;
pub use error::{DecodeError, EncodeError, SchemaError};
pub use tracker::{ReferenceTracker, TrackerStats, Visit};

use crate::record::{Link, Record};

/// Encodes a record graph with the default [`Serializer`].
#[inline]
pub fn to_string<T: Record>(root: &Link<T>) -> Result<String, EncodeError> {
    Serializer::new().serialize(root)
}

/// Encodes a record graph with the default [`Serializer`], pretty-printed.
///
/// Pretty-printing only changes whitespace, never the value model.
#[inline]
pub fn to_string_pretty<T: Record>(root: &Link<T>) -> Result<String, EncodeError> {
    Serializer::new().pretty(true).serialize(root)
}
