//! A typed, applicative set over a fixed enumerated domain, layered on
//! [`BitVec`].
//!
//! Two bitsets are *compatible* iff they share the same domain **by
//! identity**, not by value — two independently constructed bitsets over an
//! identical element list are not compatible. This is checked in O(1) via
//! `Rc::ptr_eq` on the shared domain (see the "origin-tag identity" design
//! note in DESIGN.md).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::bitvec::BitVec;
use crate::error::{Error, Result};

/// The forward/reverse maps and origin tag shared by every bitset minted
/// from one [`Bitset::make`] call. Never mutated after construction.
struct Domain<T> {
    forward: HashMap<T, usize>,
    reverse: Vec<T>,
}

/// A set over domain `T`, applicative: every "mutating" operation returns a
/// fresh `Bitset` sharing the forward/reverse maps and origin tag but with
/// an independently owned bit payload.
pub struct Bitset<T> {
    bits: BitVec,
    domain: Rc<Domain<T>>,
}

impl<T> Clone for Bitset<T> {
    fn clone(&self) -> Self {
        Bitset { bits: self.bits.clone(), domain: Rc::clone(&self.domain) }
    }
}

impl<T> std::fmt::Debug for Bitset<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Eq + Hash + Clone> Bitset<T> {
    /// Fixes the domain (deduplicating `elements`) and mints a fresh origin
    /// tag. The domain must be non-empty.
    pub fn make(elements: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut forward = HashMap::new();
        let mut reverse = Vec::new();
        for e in elements {
            if !forward.contains_key(&e) {
                forward.insert(e.clone(), reverse.len());
                reverse.push(e);
            }
        }
        if reverse.is_empty() {
            return Err(Error::EmptyDomain);
        }
        let bits = BitVec::new(reverse.len())?;
        Ok(Bitset { bits, domain: Rc::new(Domain { forward, reverse }) })
    }

    fn empty_like(domain: &Rc<Domain<T>>) -> Self {
        Bitset { bits: BitVec::new(domain.reverse.len()).expect("non-empty domain"), domain: Rc::clone(domain) }
    }

    /// The full domain, as a bitset sharing this bitset's origin.
    pub fn full(&self) -> Self {
        let mut out = Self::empty_like(&self.domain);
        out.bits.fill();
        out
    }

    /// The empty set sharing this bitset's origin.
    pub fn empty(&self) -> Self {
        Self::empty_like(&self.domain)
    }

    /// Size of the whole domain (not the set's cardinality).
    pub fn domain_size(&self) -> usize {
        self.domain.reverse.len()
    }

    /// Domain index of `element`. Checked: errors if not in the domain.
    pub fn index(&self, element: &T) -> Result<usize> {
        self.domain.forward.get(element).copied().ok_or(Error::Domain {
            index: usize::MAX,
            size: self.domain.reverse.len(),
        })
    }

    /// Element at domain index `i`, or `None` if out of range.
    pub fn member(&self, i: usize) -> Option<&T> {
        self.domain.reverse.get(i)
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if Rc::ptr_eq(&self.domain, &other.domain) {
            Ok(())
        } else {
            Err(Error::Compatibility)
        }
    }

    /// Fresh bitset with `element` added.
    pub fn add(&self, element: &T) -> Result<Self> {
        let i = self.index(element)?;
        let mut out = self.clone();
        out.bits.put(i, true)?;
        Ok(out)
    }

    /// Fresh bitset with `element` removed.
    pub fn remove(&self, element: &T) -> Result<Self> {
        let i = self.index(element)?;
        let mut out = self.clone();
        out.bits.put(i, false)?;
        Ok(out)
    }

    /// Whether `element` is a member. Checked: errors if not in the domain.
    pub fn ismember(&self, element: &T) -> Result<bool> {
        let i = self.index(element)?;
        Ok(self.bits.get(i).expect("index within bitvec bounds"))
    }

    pub fn count(&self) -> usize {
        self.bits.count()
    }

    pub fn isempty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Cardinality of the domain (same as [`Bitset::domain_size`]).
    pub fn size(&self) -> usize {
        self.domain_size()
    }

    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let mut out = self.clone();
        out.bits.union(&other.bits)?;
        Ok(out)
    }

    pub fn intersect(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let mut out = self.clone();
        out.bits.inter(&other.bits)?;
        Ok(out)
    }

    /// `self \ other`.
    pub fn minus(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let mut out = self.clone();
        out.bits.minus(&other.bits)?;
        Ok(out)
    }

    /// Symmetric difference.
    pub fn difference(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let mut out = self.clone();
        out.bits.diff(&other.bits)?;
        Ok(out)
    }

    pub fn subset(&self, other: &Self) -> Result<bool> {
        self.check_compatible(other)?;
        self.bits.lt(&other.bits)
    }

    pub fn subseteq(&self, other: &Self) -> Result<bool> {
        self.check_compatible(other)?;
        self.bits.le(&other.bits)
    }

    pub fn equal(&self, other: &Self) -> Result<bool> {
        self.check_compatible(other)?;
        self.bits.eq_bits(&other.bits)
    }

    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        self.check_compatible(other)?;
        self.bits.compare(&other.bits)
    }

    /// Folds a list of compatible bitsets with `union`, mutating a single
    /// working payload rather than chaining binary ops.
    pub fn unions(sets: &[Self]) -> Result<Self> {
        let first = sets.first().ok_or(Error::EmptyDomain)?;
        let mut acc = first.empty();
        for s in sets {
            first.check_compatible(s)?;
            acc.bits.union(&s.bits)?;
        }
        Ok(acc)
    }

    /// Folds a list of compatible bitsets with `intersect`. An empty list
    /// returns the full domain — the identity of intersection, and the
    /// mechanism by which `top`/`bottom` are derived from an empty Galois
    /// operand.
    pub fn intersects(sets: &[Self], domain_like: &Self) -> Result<Self> {
        match sets.first() {
            None => Ok(domain_like.full()),
            Some(first) => {
                let mut acc = first.full();
                for s in sets {
                    first.check_compatible(s)?;
                    acc.bits.inter(&s.bits)?;
                }
                Ok(acc)
            }
        }
    }

    /// Visits set members in ascending domain-index order, invoking
    /// `f(self, index, acc) -> acc`.
    pub fn fold<A>(&self, mut f: impl FnMut(&Self, usize, A) -> A, init: A) -> A {
        let mut acc = init;
        for i in self.bits.members() {
            acc = f(self, i, acc);
        }
        acc
    }

    /// Ordered indices of set members.
    pub fn member_indices(&self) -> Vec<usize> {
        self.bits.members()
    }

    /// Ordered iterator over set members (by element, not index).
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.bits.members().into_iter().map(move |i| &self.domain.reverse[i])
    }
}

impl<T: Eq + Hash + Clone> PartialEq for Bitset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other).unwrap_or(false)
    }
}

impl<T: Eq + Hash + Clone> Eq for Bitset<T> {}
