//! Bit vector of component kinds.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use smallvec::{smallvec, SmallVec};

use super::component::ComponentKind;

const WORD_BITS: usize = u64::BITS as usize;

/// Set of component kinds, one bit per [`ComponentKind`].
///
/// Width of the signature is fixed on creation and equals
/// [`component_max`](crate::config::Config::component_max) of the registry.
/// Signatures up to 128 bits wide never allocate.
///
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    words: SmallVec<[u64; 2]>,
    width: usize,
}

impl Signature {
    /// Creates an empty signature able to hold `width` component kinds.
    pub fn new(width: usize) -> Self {
        let len = (width + WORD_BITS - 1) / WORD_BITS;
        Self {
            words: smallvec![0; len],
            width,
        }
    }

    /// Creates a signature of given width with all `kinds` set.
    pub fn with_kinds<I>(width: usize, kinds: I) -> Self
    where
        I: IntoIterator<Item = ComponentKind>,
    {
        let mut signature = Self::new(width);
        for kind in kinds {
            signature.insert(kind);
        }
        signature
    }

    /// Count of bits in this signature.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sets bit of the kind to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the kind does not fit into the width of the signature.
    ///
    pub fn set(&mut self, kind: ComponentKind, value: bool) {
        let (word, mask) = self.locate(kind);
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
    }

    pub fn insert(&mut self, kind: ComponentKind) {
        self.set(kind, true)
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.set(kind, false)
    }

    /// Returns `true` if bit of the kind is set.
    pub fn contains(&self, kind: ComponentKind) -> bool {
        let index = kind.index();
        if index >= self.width {
            return false;
        }
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Returns `true` if every bit set in `required` is also set in `self`.
    ///
    /// This is the test deciding whether an entity belongs to a system.
    ///
    pub fn contains_all(&self, required: &Signature) -> bool {
        required.words.iter().enumerate().all(|(i, &bits)| {
            let own = self.words.get(i).copied().unwrap_or(0);
            own & bits == bits
        })
    }

    /// Clears all bits.
    pub fn reset(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Count of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns iterator over all kinds set in this signature, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        (0..self.width)
            .map(ComponentKind::from_index)
            .filter(move |&kind| self.contains(kind))
    }

    fn locate(&self, kind: ComponentKind) -> (usize, u64) {
        let index = kind.index();
        assert!(
            index < self.width,
            "{} does not fit into signature of width {}",
            kind,
            self.width,
        );
        (index / WORD_BITS, 1 << (index % WORD_BITS))
    }

    fn zip_with(&self, other: &Signature, op: impl Fn(u64, u64) -> u64) -> Signature {
        let width = self.width.max(other.width);
        let mut result = Signature::new(width);
        for (i, word) in result.words.iter_mut().enumerate() {
            let lhs = self.words.get(i).copied().unwrap_or(0);
            let rhs = other.words.get(i).copied().unwrap_or(0);
            *word = op(lhs, rhs);
        }
        result
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_COMPONENT_MAX)
    }
}

impl BitAnd for &Signature {
    type Output = Signature;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |lhs, rhs| lhs & rhs)
    }
}

impl BitOr for &Signature {
    type Output = Signature;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |lhs, rhs| lhs | rhs)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Signature(")?;
        for index in (0..self.width).rev() {
            let bit = self.contains(ComponentKind::from_index(index));
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(index: usize) -> ComponentKind {
        ComponentKind::from_index(index)
    }

    #[test]
    fn test_set_and_clear() {
        let mut signature = Signature::new(32);
        assert!(signature.is_empty());

        signature.insert(kind(3));
        signature.insert(kind(31));
        assert!(signature.contains(kind(3)));
        assert!(signature.contains(kind(31)));
        assert!(!signature.contains(kind(4)));
        assert_eq!(signature.count(), 2);

        signature.remove(kind(3));
        assert!(!signature.contains(kind(3)));
        signature.reset();
        assert!(signature.is_empty());
    }

    #[test]
    fn test_wide_signature() {
        let mut signature = Signature::new(200);
        signature.insert(kind(0));
        signature.insert(kind(64));
        signature.insert(kind(199));
        let kinds: Vec<_> = signature.iter().map(ComponentKind::index).collect();
        assert_eq!(kinds, [0, 64, 199]);
    }

    #[test]
    fn test_contains_all() {
        let required = Signature::with_kinds(32, [kind(0), kind(1)]);
        let mut entity = Signature::with_kinds(32, [kind(0)]);
        assert!(!entity.contains_all(&required));

        entity.insert(kind(1));
        entity.insert(kind(7));
        assert!(entity.contains_all(&required));
        assert_eq!(&entity & &required, required);

        // empty requirement is matched by everything
        assert!(Signature::new(32).contains_all(&Signature::new(32)));
    }

    #[test]
    fn test_bit_or() {
        let lhs = Signature::with_kinds(8, [kind(1)]);
        let rhs = Signature::with_kinds(8, [kind(2)]);
        assert_eq!(&lhs | &rhs, Signature::with_kinds(8, [kind(1), kind(2)]));
    }

    #[test]
    fn test_debug() {
        let signature = Signature::with_kinds(4, [kind(0), kind(2)]);
        assert_eq!(format!("{:?}", signature), "Signature(0101)");
    }

    #[test]
    #[should_panic]
    fn test_out_of_width() {
        let mut signature = Signature::new(8);
        signature.insert(kind(8));
    }
}
