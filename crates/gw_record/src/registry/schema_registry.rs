use core::any::TypeId;

use gw_utils::TypeIdMap;
use gw_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::record::Schematic;
use crate::schema::RecordSchema;

// -----------------------------------------------------------------------------
// SchemaRegistry

/// A registry of record schemas, keyed by `TypeId` and by registered name.
///
/// This is what lets a decode pass pick a concrete type from a `$type` tag
/// or an explicit type name instead of a statically known target. Types
/// [register](Self::register) explicitly at startup, or flow in through
/// [`auto_register`](Self::auto_register) when the `auto_register` feature
/// is enabled.
///
/// Name lookups are only served while the name is unique: registering two
/// types under the same name retires that name from by-name lookup (a
/// warning is logged) while both remain reachable by `TypeId`.
///
/// # Examples
///
/// ```
/// use gw_record::{registry::SchemaRegistry, derive::Record};
///
/// #[derive(Record, Default)]
/// struct Lamp {
///     lumen: u32,
/// }
///
/// let mut registry = SchemaRegistry::new();
/// registry.register::<Lamp>();
///
/// let schema = registry.get_by_name("Lamp").unwrap();
/// assert!(schema.type_is::<Lamp>());
/// ```
pub struct SchemaRegistry {
    schema_table: TypeIdMap<&'static RecordSchema>,
    name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl SchemaRegistry {
    /// Creates an empty [`SchemaRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            schema_table: TypeIdMap::new(),
            name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    /// Registers the type `T` if it has not been registered already.
    ///
    /// Repeat registrations are cheap no-ops.
    pub fn register<T: Schematic>(&mut self) {
        self.register_schema(T::schema());
    }

    /// Registers an already-resolved schema.
    pub fn register_schema(&mut self, schema: &'static RecordSchema) {
        if !self.schema_table.try_insert(schema.ty_id(), || schema) {
            return;
        }

        let name = schema.name();
        if self.ambiguous_names.contains(name) {
            return;
        }
        if self.name_to_id.contains_key(name) {
            self.name_to_id.remove(name);
            self.ambiguous_names.insert(name);
            log::warn!(
                "type name `{name}` is registered by multiple record types; \
                 by-name lookup is disabled for it"
            );
        } else {
            self.name_to_id.insert(name, schema.ty_id());
        }
    }

    /// Registers every type submitted with `#[record(auto_register)]`.
    ///
    /// Equivalent to calling [`register`](Self::register) for each submitted
    /// type; repeated calls will not insert duplicates.
    ///
    /// Returns `true` if static registration is supported on the current
    /// platform (and therefore ran), `false` otherwise — also `false`
    /// whenever the `auto_register` feature is disabled.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        crate::__macro_exports::auto_register::register_all(self)
    }

    /// Registers every type submitted with `#[record(auto_register)]`.
    ///
    /// The `auto_register` feature is disabled, so this is a no-op returning
    /// `false`.
    #[cfg(not(feature = "auto_register"))]
    #[inline(always)]
    pub fn auto_register(&mut self) -> bool {
        false
    }

    /// Whether the type with the given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.schema_table.contains(&type_id)
    }

    /// Returns the schema registered for the given [`TypeId`], if present.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static RecordSchema> {
        self.schema_table.get(&type_id).copied()
    }

    /// Returns the schema registered under the given name.
    ///
    /// Returns `None` if the name is unregistered or
    /// [ambiguous](Self::is_ambiguous).
    pub fn get_by_name(&self, name: &str) -> Option<&'static RecordSchema> {
        match self.name_to_id.get(name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given name matches multiple registered types.
    #[inline]
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous_names.contains(name)
    }

    /// The number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.schema_table.len()
    }

    /// Whether the registry holds no types.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schema_table.is_empty()
    }

    /// Returns an iterator over the registered schemas.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static RecordSchema> {
        self.schema_table.values().copied()
    }
}

impl Default for SchemaRegistry {
    /// See [`SchemaRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// SchemaRegistryArc

use std::sync::{Arc, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, lock-guarded [`SchemaRegistry`].
#[derive(Clone, Default)]
pub struct SchemaRegistryArc {
    /// The wrapped [`SchemaRegistry`].
    pub internal: Arc<RwLock<SchemaRegistry>>,
}

impl SchemaRegistryArc {
    /// Takes a read lock on the underlying [`SchemaRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SchemaRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SchemaRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SchemaRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for SchemaRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.read().iter().map(RecordSchema::name))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SchemaRegistry;
    use crate::derive::Record;

    mod kitchen {
        use crate::derive::Record;

        #[derive(Record, Default)]
        pub struct Meter {
            pub reading: f64,
        }
    }

    mod garage {
        use crate::derive::Record;

        #[derive(Record, Default)]
        pub struct Meter {
            pub reading: f64,
        }
    }

    #[derive(Record, Default)]
    struct Unique {
        value: i32,
    }

    #[test]
    fn duplicate_names_retire_by_name_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register::<kitchen::Meter>();
        assert!(registry.get_by_name("Meter").is_some());

        registry.register::<garage::Meter>();
        assert!(registry.is_ambiguous("Meter"));
        assert!(registry.get_by_name("Meter").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn repeat_registration_is_a_no_op() {
        let mut registry = SchemaRegistry::new();
        registry.register::<Unique>();
        registry.register::<Unique>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(core::any::TypeId::of::<Unique>()));
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register_collects_submitted_types() {
        #[derive(Record, Default)]
        #[record(auto_register, name = "AutoMeter")]
        struct AutoMeter {
            reading: f64,
        }

        let mut registry = SchemaRegistry::new();
        assert!(registry.auto_register());
        assert!(
            registry
                .get_by_name("AutoMeter")
                .is_some_and(|schema| schema.type_is::<AutoMeter>())
        );
    }
}
