//! Attribute parsing for `#[derive(Record)]`.

use syn::{Attribute, Error, LitBool, LitInt, LitStr, Result};

use crate::RECORD_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Container attributes

/// Parsed `#[record(...)]` attributes of the type itself.
pub struct ContainerAttrs {
    /// Registered type name; defaults to the type identifier.
    pub name: Option<String>,
    /// Whether null-valued fields are emitted. Defaults to `true`.
    pub include_nulls: bool,
    /// Whether to submit the type for static registration.
    pub auto_register: bool,
}

pub fn container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut parsed = ContainerAttrs {
        name: None,
        include_nulls: true,
        auto_register: false,
    };

    for attr in record_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("include_nulls") {
                let lit: LitBool = meta.value()?.parse()?;
                parsed.include_nulls = lit.value;
                Ok(())
            } else if meta.path.is_ident("auto_register") {
                parsed.auto_register = true;
                Ok(())
            } else {
                Err(meta.error("unknown `record` attribute for a type"))
            }
        })?;
    }

    Ok(parsed)
}

// -----------------------------------------------------------------------------
// Field attributes

/// Parsed `#[record(...)]` attributes of one field.
pub struct FieldAttrs {
    /// Excluded from both encode and decode.
    pub ignore: bool,
    /// Document key override.
    pub alias: Option<String>,
    /// Decoding fails when the key is absent.
    pub required: bool,
    /// Emission sort key.
    pub order: i32,
}

pub fn field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut parsed = FieldAttrs {
        ignore: false,
        alias: None,
        required: false,
        order: 0,
    };

    for attr in record_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                parsed.ignore = true;
                Ok(())
            } else if meta.path.is_ident("alias") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.alias = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("required") {
                parsed.required = true;
                Ok(())
            } else if meta.path.is_ident("order") {
                let lit: LitInt = meta.value()?.parse()?;
                parsed.order = lit.base10_parse()?;
                Ok(())
            } else {
                Err(meta.error("unknown `record` attribute for a field"))
            }
        })?;
    }

    if parsed.ignore && (parsed.alias.is_some() || parsed.required || parsed.order != 0) {
        let attr = record_attrs(attrs).next().unwrap(); // `ignore` came from one
        return Err(Error::new_spanned(
            attr,
            "an ignored field cannot carry other `record` attributes",
        ));
    }

    Ok(parsed)
}

fn record_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(RECORD_ATTRIBUTE_NAME))
}
