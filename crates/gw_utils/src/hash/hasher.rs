//! Provide `FixedHasher` and `NoOpHasher`.
//!
//! `FixedHasher` is *foldhash* with a fixed seed, so hash results depend
//! only on the input. `NoOpHasher` passes `u64` keys through untouched.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

/// The workspace-wide fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x7A3D_90B1_5C24_E68F);

/// A hasher whose results depend only on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`], created through
/// [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state with a random but fixed seed.
///
/// Iteration order of containers built on this state is unspecified but
/// reproducible across runs, which keeps log output and test failures
/// stable.
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use gw_utils::hash::FixedHashState;
///
/// let mut hasher = FixedHashState.build_hasher();
/// 3.hash(&mut hasher);
/// let first = hasher.finish();
///
/// let mut hasher = FixedHashState.build_hasher();
/// 3.hash(&mut hasher);
/// assert_eq!(first, hasher.finish());
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A pass-through hasher storing a single `u64`.
///
/// Intended for keys that are already well-distributed hashes themselves,
/// such as `TypeId`. Created through [`NoOpHashState::build_hasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `write_u64` is the intended entry point; this fold only exists so
        // multi-write keys still produce *some* stable value.
        for byte in bytes {
            self.hash = self.hash.rotate_left(8) ^ (*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Hash state producing [`NoOpHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::{Hasher, BuildHasher};
/// use gw_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// hasher.write_u64(3);
/// assert_eq!(hasher.finish(), 3_u64);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}
