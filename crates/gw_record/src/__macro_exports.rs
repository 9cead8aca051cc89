//! Implementation details used by derive-generated code. Not public API —
//! anything in here may change without notice.

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::record::Schematic;
    use crate::registry::SchemaRegistry;

    /// One statically-submitted record type.
    pub struct RegistryEntry {
        register: fn(&mut SchemaRegistry),
    }

    impl RegistryEntry {
        /// The entry registering `T`. Emitted by `#[record(auto_register)]`.
        pub const fn of<T: Schematic>() -> Self {
            Self {
                register: register_one::<T>,
            }
        }
    }

    fn register_one<T: Schematic>(registry: &mut SchemaRegistry) {
        registry.register::<T>();
    }

    inventory::collect!(RegistryEntry);

    // Availability probe: when the platform supports static registration at
    // all, at least this entry is collected.
    inventory::submit! {
        RegistryEntry { register: register_probe }
    }

    fn register_probe(_: &mut SchemaRegistry) {}

    /// Registers every submitted entry into `registry`.
    ///
    /// Returns whether any entry was collected (the platform-support
    /// signal).
    pub fn register_all(registry: &mut SchemaRegistry) -> bool {
        let mut supported = false;
        for entry in inventory::iter::<RegistryEntry> {
            supported = true;
            (entry.register)(registry);
        }
        supported
    }
}
