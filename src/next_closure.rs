//! Ganter's Next-Closure algorithm: a second, independently-implemented
//! concept enumerator kept as an oracle to cross-check the Lindig-based
//! traversals in [`crate::concept`], generalized from raw word-packed
//! bitsets to this crate's typed [`Bitset`].

use std::hash::Hash;

use crate::bitset::Bitset;
use crate::concept::{closure_prime, Concept};
use crate::context::Context;
use crate::error::Result;

/// Finds the lectically-next closed attribute set after `intent`, by
/// descending attribute indices from highest to lowest and testing, at
/// each index not already present, whether closing `working ∪ {i}`
/// introduces no attribute with an index smaller than `i`.
fn next_concept<X, Y>(ctx: &Context<X, Y>, intent: &Bitset<Y>) -> Result<Option<Concept<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let n = intent.domain_size();
    let mut working = intent.clone();
    for i in (0..n).rev() {
        let elem = intent.member(i).expect("valid attribute index").clone();
        if working.ismember(&elem)? {
            working = working.remove(&elem)?;
        } else {
            let candidate = working.add(&elem)?;
            let next = closure_prime(ctx, &candidate)?;
            let new_members = next.intent.minus(&working)?;
            if new_members.member_indices().into_iter().all(|j| j >= i) {
                return Ok(Some(next));
            }
        }
    }
    Ok(None)
}

/// All concepts, in lectic order of their intent, starting from `top`.
pub fn concepts<X, Y>(ctx: &Context<X, Y>) -> Result<Vec<Concept<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let mut out = Vec::new();
    let mut current = Some(closure_prime(ctx, &ctx.empty_attributes())?);
    while let Some(c) = current {
        current = next_concept(ctx, &c.intent)?;
        out.push(c);
    }
    Ok(out)
}
