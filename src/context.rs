//! The binary relation `R ⊆ X × Y` and its Galois operators.

use std::hash::Hash;

use crate::bitset::Bitset;
use crate::error::Result;

/// `R ⊆ X × Y`, represented as per-object and per-attribute adjacency
/// bitsets. Applicative: `relate`/`unrelate` return a new context sharing
/// both domain tags.
#[derive(Clone)]
pub struct Context<X, Y> {
    /// `fwd[i]` is the set of attributes related to object `i`.
    fwd: Vec<Bitset<Y>>,
    /// `rev[j]` is the set of objects related to attribute `j`.
    rev: Vec<Bitset<X>>,
    /// Template bitsets used only to mint fresh empty/full sets sharing the
    /// right origin tag.
    object_template: Bitset<X>,
    attribute_template: Bitset<Y>,
}

impl<X, Y> Context<X, Y>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    /// Builds an empty relation over the given objects and attributes.
    pub fn make(objects: impl IntoIterator<Item = X>, attributes: impl IntoIterator<Item = Y>) -> Result<Self> {
        let object_template = Bitset::make(objects)?;
        let attribute_template = Bitset::make(attributes)?;
        let fwd = vec![attribute_template.empty(); object_template.domain_size()];
        let rev = vec![object_template.empty(); attribute_template.domain_size()];
        Ok(Context { fwd, rev, object_template, attribute_template })
    }

    /// Builds a context from `(object, attributes)` pairs, taking the
    /// distinct objects and attributes in order of first appearance. This
    /// is the hand-off point from an external parser: the parser owns
    /// tokenizing the textual form, and calls this constructor with the
    /// parsed pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (X, Vec<Y>)>) -> Result<Self> {
        let pairs: Vec<(X, Vec<Y>)> = pairs.into_iter().collect();
        let mut objects = Vec::new();
        let mut attributes = Vec::new();
        for (x, ys) in &pairs {
            if !objects.contains(x) {
                objects.push(x.clone());
            }
            for y in ys {
                if !attributes.contains(y) {
                    attributes.push(y.clone());
                }
            }
        }
        let mut ctx = Context::make(objects, attributes)?;
        for (x, ys) in pairs {
            for y in ys {
                ctx = ctx.relate(&x, &y)?;
            }
        }
        Ok(ctx)
    }

    pub fn objects(&self) -> impl Iterator<Item = &X> + '_ {
        (0..self.fwd.len()).map(move |i| self.object_template.member(i).expect("valid object index"))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Y> + '_ {
        (0..self.rev.len()).map(move |j| self.attribute_template.member(j).expect("valid attribute index"))
    }

    /// A fresh empty object set sharing this context's object origin.
    pub fn empty_objects(&self) -> Bitset<X> {
        self.object_template.empty()
    }

    /// A fresh empty attribute set sharing this context's attribute origin.
    pub fn empty_attributes(&self) -> Bitset<Y> {
        self.attribute_template.empty()
    }

    /// Returns a new context with `x` and `y` related. Both `fwd[ix(x)]`
    /// and `rev[iy(y)]` are updated consistently.
    pub fn relate(&self, x: &X, y: &Y) -> Result<Self> {
        let i = self.object_template.index(x)?;
        let j = self.attribute_template.index(y)?;
        let mut out = self.clone();
        out.fwd[i] = out.fwd[i].add(y)?;
        out.rev[j] = out.rev[j].add(x)?;
        Ok(out)
    }

    /// Returns a new context with `x` and `y` unrelated.
    pub fn unrelate(&self, x: &X, y: &Y) -> Result<Self> {
        let i = self.object_template.index(x)?;
        let j = self.attribute_template.index(y)?;
        let mut out = self.clone();
        out.fwd[i] = out.fwd[i].remove(y)?;
        out.rev[j] = out.rev[j].remove(x)?;
        Ok(out)
    }

    /// `common(O)`: attributes shared by every object in `O`. The empty set
    /// maps to the full attribute domain — this is how `bottom` is derived.
    pub fn common(&self, objects: &Bitset<X>) -> Result<Bitset<Y>> {
        let rows: Vec<Bitset<Y>> = objects.member_indices().into_iter().map(|i| self.fwd[i].clone()).collect();
        Bitset::intersects(&rows, &self.attribute_template)
    }

    /// `common'(A)`: objects sharing every attribute in `A`. The empty set
    /// maps to the full object domain — this is how `top` is derived.
    pub fn common_prime(&self, attributes: &Bitset<Y>) -> Result<Bitset<X>> {
        let rows: Vec<Bitset<X>> = attributes.member_indices().into_iter().map(|j| self.rev[j].clone()).collect();
        Bitset::intersects(&rows, &self.object_template)
    }

    /// The dual view, swapping the roles of objects and attributes. Used
    /// to implement lower-neighbor enumeration as upper-neighbor
    /// enumeration over the dual — the two are exactly dual.
    pub fn dual(&self) -> Context<Y, X> {
        Context {
            fwd: self.rev.clone(),
            rev: self.fwd.clone(),
            object_template: self.attribute_template.clone(),
            attribute_template: self.object_template.clone(),
        }
    }
}
