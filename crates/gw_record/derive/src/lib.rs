//! Derive macro for GraphWire records.
//!
//! See [`Record`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod generate;
mod parse;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements `Record` and `Schematic` for a struct with
/// named fields, generating the field accessors together with the cached
/// schema that describes them. The type must also implement `Default` —
/// decoding allocates empty instances before populating fields.
///
/// ```rust, ignore
/// #[derive(Record, Default)]
/// struct Employee {
///     #[record(alias = "full_name", required)]
///     name: String,
///     #[record(ignore)]
///     session_token: String,
///     manager: Option<Link<Employee>>,
/// }
/// ```
///
/// ## Type-level attributes
///
/// - `#[record(name = "...")]` — the registered type name; defaults to the
///   type identifier. This is what `$type` tags and by-name decoding use.
/// - `#[record(include_nulls = false)]` — omit null-valued fields from
///   encoded documents (they decode back to the `Default` value).
/// - `#[record(auto_register)]` — submit the type for collection by
///   `SchemaRegistry::auto_register`. Requires the `auto_register` feature;
///   without it the attribute is accepted and does nothing.
///
/// ## Field-level attributes
///
/// - `#[record(ignore)]` — the field is invisible to encode and decode.
///   Cannot be combined with the other field attributes.
/// - `#[record(alias = "...")]` — the document key; defaults to the field
///   name. Keys starting with `$` are reserved and rejected, as are
///   duplicate keys.
/// - `#[record(required)]` — decoding fails when the key is absent from the
///   document.
/// - `#[record(order = N)]` — emission sort key (`i32`, default 0). Equal
///   keys keep declaration order. Ordering affects encode output only.
///
/// ## Limitations
///
/// Generic records, enums, tuple structs, and unit structs are not
/// supported; the object model is named-field records, matching what the
/// codec can describe.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    generate::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
