//! Shared container utilities for the GraphWire workspace.
//!
//! Currently this is the hash layer: seeded-but-stable hash state aliases
//! over *hashbrown*/*foldhash*, and a [`TypeIdMap`] for `TypeId`-keyed
//! lookups.

// -----------------------------------------------------------------------------
// Modules

pub mod hash;

mod typeid_map;

// -----------------------------------------------------------------------------
// Exports

pub use typeid_map::TypeIdMap;
