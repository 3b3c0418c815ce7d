/// Packed 32-bit identity: slot index in the low bits, generation counter
/// in the high bits.
///
/// The all-ones bit pattern is reserved as [`GenerationalId::INVALID`] and
/// is never produced by [`GenerationalId::new`]: the all-index-bits pattern
/// is rejected as an index, so no generation can complete it.
///
/// The generation counter wraps modulo `2^GENERATION_BITS`. After 256 reuses
/// of the same slot a stale id aliases a live one again; callers that need
/// stronger guarantees must widen `GENERATION_BITS`.
///
/// # Example
///
/// ```
/// use galaxy_3d_content::galaxy3d::utils::GenerationalId;
///
/// let id = GenerationalId::new(42, 3);
/// assert_eq!(id.index(), 42);
/// assert_eq!(id.generation(), 3);
/// assert!(id.is_valid());
/// assert!(!GenerationalId::INVALID.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct GenerationalId(u32);

impl GenerationalId {
    /// Number of high bits holding the generation
    pub const GENERATION_BITS: u32 = 8;
    /// Number of low bits holding the slot index
    pub const INDEX_BITS: u32 = u32::BITS - Self::GENERATION_BITS;
    /// Mask selecting the index bits
    pub const INDEX_MASK: u32 = (1 << Self::INDEX_BITS) - 1;
    /// Mask selecting the generation bits (after shifting down)
    pub const GENERATION_MASK: u32 = (1 << Self::GENERATION_BITS) - 1;
    /// Largest generation value before wrapping to 0
    pub const MAX_GENERATION: u32 = Self::GENERATION_MASK;
    /// "No id" sentinel (all bits set)
    pub const INVALID: Self = Self(u32::MAX);

    /// Pack an index and a generation into one id.
    ///
    /// # Panics
    ///
    /// Panics if `index` uses the reserved all-index-bits pattern (or does not
    /// fit in `INDEX_BITS`), or if `generation` exceeds `MAX_GENERATION`.
    pub fn new(index: u32, generation: u32) -> Self {
        assert!(
            index < Self::INDEX_MASK,
            "generational id index {} out of range (max {})",
            index,
            Self::INDEX_MASK - 1
        );
        assert!(
            generation <= Self::MAX_GENERATION,
            "generational id generation {} out of range (max {})",
            generation,
            Self::MAX_GENERATION
        );
        Self((generation << Self::INDEX_BITS) | index)
    }

    /// Reinterpret a raw packed value (e.g. read back from a blob)
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw packed value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot index (low bits)
    pub const fn index(self) -> u32 {
        self.0 & Self::INDEX_MASK
    }

    /// Generation counter (high bits)
    pub const fn generation(self) -> u32 {
        (self.0 >> Self::INDEX_BITS) & Self::GENERATION_MASK
    }

    /// `false` only for the INVALID sentinel
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Same index, generation + 1 (wrapping modulo `2^GENERATION_BITS`)
    pub fn next_generation(self) -> Self {
        debug_assert!(self.is_valid(), "next_generation() on an invalid id");
        let generation = (self.generation() + 1) & Self::GENERATION_MASK;
        Self::new(self.index(), generation)
    }
}

impl Default for GenerationalId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for GenerationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}v{}", self.index(), self.generation())
        } else {
            write!(f, "invalid")
        }
    }
}

/// Define a strongly-typed id wrapping a [`GenerationalId`].
///
/// Each kind of resource gets its own id type so a texture id cannot be
/// handed to a material function by mistake.
///
/// # Example
///
/// ```
/// use galaxy_3d_content::typed_id;
/// use galaxy_3d_content::galaxy3d::utils::GenerationalId;
///
/// typed_id! {
///     /// Id of a light in the light free list
///     pub struct LightId;
/// }
///
/// let id = LightId::from(GenerationalId::new(7, 0));
/// assert_eq!(id.id().index(), 7);
/// assert!(!LightId::default().is_valid());
/// ```
#[macro_export]
macro_rules! typed_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        $vis struct $name($crate::utils::GenerationalId);

        impl $name {
            /// "No id" sentinel
            pub const INVALID: Self = Self($crate::utils::GenerationalId::INVALID);

            /// Untyped id
            pub const fn id(self) -> $crate::utils::GenerationalId {
                self.0
            }

            /// `false` only for the INVALID sentinel
            pub const fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$crate::utils::GenerationalId> for $name {
            fn from(id: $crate::utils::GenerationalId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::utils::GenerationalId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "generational_id_tests.rs"]
mod tests;
