use crate::record::FieldType;
use crate::schema::FieldKind;

// -----------------------------------------------------------------------------
// FieldSchema

/// Information for one serializable field of a record.
///
/// Built by the derive; carries everything the codec needs to know about the
/// field without touching an instance: the document key, the accessor index,
/// required-ness, the emission sort key, and the declared [`FieldKind`].
///
/// # Examples
///
/// ```
/// use gw_record::{Schematic, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Account {
///     #[record(alias = "account_id", required)]
///     id: u64,
/// }
///
/// let field = Account::schema().field_by_key("account_id").unwrap();
/// assert_eq!(field.name(), "id");
/// assert!(field.required());
/// ```
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: &'static str,
    key: &'static str,
    index: usize,
    required: bool,
    order: i32,
    kind: FieldKind,
}

impl FieldSchema {
    /// Creates a new [`FieldSchema`] for a field named `name` of type `F`,
    /// reachable through accessor index `index`.
    ///
    /// The document key defaults to the field name.
    pub fn new<F: FieldType>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            key: name,
            index,
            required: false,
            order: 0,
            kind: F::kind(),
        }
    }

    /// Sets the document key (the `alias` configuration).
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Marks the field as required on decode.
    pub fn required_on_decode(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the emission sort key. Lower orders are emitted first; ties keep
    /// declaration order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// The field name in the host record.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The key this field uses in documents.
    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// The accessor index for [`Record::get_at`](crate::Record::get_at) and
    /// [`Record::set_at`](crate::Record::set_at).
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether decoding fails when the key is absent from the document.
    #[inline]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// The emission sort key.
    #[inline]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// The declared shape of the field.
    #[inline]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }
}
