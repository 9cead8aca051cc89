use core::any::{Any, TypeId};

use gw_utils::hash::HashMap;

use crate::record::{Handle, Record};
use crate::schema::FieldSchema;

// -----------------------------------------------------------------------------
// RecordSchema

/// The resolved, cached description of one record type.
///
/// Built once per type by the derive (inside a `OnceLock`), immutable
/// afterwards. Fields are stored pre-sorted by `(order, declaration index)`
/// — a stable sort, so equal orders keep declaration order — which is the
/// order the encoder emits them in. Decoding matches fields by document key
/// and is indifferent to order.
///
/// # Examples
///
/// ```
/// use gw_record::{Schematic, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Device {
///     #[record(order = 2)]
///     watts: u32,
///     #[record(order = 1)]
///     name: String,
/// }
///
/// let schema = Device::schema();
/// assert_eq!(schema.name(), "Device");
/// let keys: Vec<_> = schema.fields().iter().map(|f| f.key()).collect();
/// assert_eq!(keys, ["name", "watts"]);
/// ```
#[derive(Debug)]
pub struct RecordSchema {
    name: &'static str,
    ty_id: TypeId,
    include_nulls: bool,
    fields: Box<[FieldSchema]>,
    key_to_position: HashMap<&'static str, usize>,
    create: fn() -> Handle,
}

impl RecordSchema {
    /// Creates a new [`RecordSchema`] for `T` from its fields in declaration
    /// order.
    ///
    /// `T::default()` is what decode passes allocate before populating
    /// fields.
    pub fn new<T: Record + Default>(name: &'static str, mut fields: Vec<FieldSchema>) -> Self {
        // Stable: equal orders keep declaration order.
        fields.sort_by_key(FieldSchema::order);
        let key_to_position = fields
            .iter()
            .enumerate()
            .map(|(position, field)| (field.key(), position))
            .collect();

        Self {
            name,
            ty_id: TypeId::of::<T>(),
            include_nulls: true,
            fields: fields.into_boxed_slice(),
            key_to_position,
            create: create_default::<T>,
        }
    }

    /// Sets whether null-valued fields are emitted (default `true`).
    pub fn with_include_nulls(mut self, include_nulls: bool) -> Self {
        self.include_nulls = include_nulls;
        self
    }

    /// The registered type name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The `TypeId` of the described record type.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches this schema.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Whether null-valued fields appear in encoded documents.
    #[inline]
    pub const fn include_nulls(&self) -> bool {
        self.include_nulls
    }

    /// The fields in emission order.
    #[inline]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the [`FieldSchema`] with the given document key, if present.
    pub fn field_by_key(&self, key: &str) -> Option<&FieldSchema> {
        self.key_to_position
            .get(key)
            .map(|position| &self.fields[*position])
    }

    /// The number of serializable fields.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Allocates a fresh default instance of the described type.
    #[inline]
    pub fn create_instance(&self) -> Handle {
        (self.create)()
    }
}

fn create_default<T: Record + Default>() -> Handle {
    Handle::new(T::default())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Schematic;
    use crate::derive::Record;

    #[derive(Record, Default)]
    struct Tied {
        #[record(order = 1)]
        b: i32,
        a: i32,
        #[record(order = 1)]
        c: i32,
    }

    #[test]
    fn equal_orders_keep_declaration_order() {
        let keys: Vec<_> = Tied::schema().fields().iter().map(|f| f.key()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn key_lookup_and_instance_creation() {
        let schema = Tied::schema();
        assert_eq!(schema.field_by_key("b").unwrap().name(), "b");
        assert!(schema.field_by_key("missing").is_none());
        assert!(schema.type_is::<Tied>());

        let fresh = schema.create_instance();
        assert!(fresh.downcast::<Tied>().is_some());
    }
}
