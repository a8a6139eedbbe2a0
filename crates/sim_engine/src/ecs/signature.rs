//! Component type identifiers and signatures
//!
//! A [`Signature`] is a fixed-width bit set with one bit per registered
//! component type. The width is [`MAX_COMPONENTS`]; raising it is a
//! recompilation decision.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Maximum number of distinct component types a catalog can register
pub const MAX_COMPONENTS: usize = u64::BITS as usize;

/// Dense per-catalog identifier of a component type
///
/// Doubles as the bit position inside a [`Signature`] and as the index of the
/// type's backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Wrap a raw identifier, e.g. one read back from an editor menu
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }
    
    /// Raw identifier value
    pub const fn raw(self) -> u8 {
        self.0
    }
    
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// Set of component types carried by an entity or required by a system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    /// The all-zero signature
    pub const EMPTY: Self = Self(0);
    
    /// Copy of this signature with `id` set
    #[must_use]
    pub const fn with(self, id: ComponentTypeId) -> Self {
        Self(self.0 | Self::bit(id))
    }
    
    /// Copy of this signature with `id` cleared
    #[must_use]
    pub const fn without(self, id: ComponentTypeId) -> Self {
        Self(self.0 & !Self::bit(id))
    }
    
    /// Set the bit for `id`
    pub fn insert(&mut self, id: ComponentTypeId) {
        self.0 |= Self::bit(id);
    }
    
    /// Clear the bit for `id`
    pub fn remove(&mut self, id: ComponentTypeId) {
        self.0 &= !Self::bit(id);
    }
    
    /// Whether the bit for `id` is set
    pub const fn contains(self, id: ComponentTypeId) -> bool {
        self.0 & Self::bit(id) != 0
    }
    
    /// Superset test: `(self & query) == query`
    pub const fn matches(self, query: Self) -> bool {
        self.0 & query.0 == query.0
    }
    
    /// Whether no bit is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
    
    /// Number of component types in the set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    
    /// Raw bit pattern
    pub const fn bits(self) -> u64 {
        self.0
    }
    
    /// Component types in the set, lowest identifier first
    pub fn iter(self) -> impl Iterator<Item = ComponentTypeId> {
        (0..MAX_COMPONENTS)
            .filter(move |&bit| self.0 & (1u64 << bit) != 0)
            .map(|bit| ComponentTypeId(bit as u8))
    }
    
    // ids at or past MAX_COMPONENTS have no bit
    const fn bit(id: ComponentTypeId) -> u64 {
        match 1u64.checked_shl(id.0 as u32) {
            Some(bit) => bit,
            None => 0,
        }
    }
}

impl BitAnd for Signature {
    type Output = Self;
    
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Self;
    
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}
