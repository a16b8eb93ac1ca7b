//! The canonical (Duquenne–Guigues) basis of implications.
//!
//! Ganter's `canonical_basis` algorithm, generalized from raw word-packed
//! bitsets to this crate's typed [`Bitset`]. Supplements the rule miner's
//! statistical rules with exact implications.

use std::hash::Hash;

use crate::bitset::Bitset;
use crate::context::Context;
use crate::error::Result;

/// `premise -> conclusion`: every object carrying `premise` also carries
/// `conclusion`.
#[derive(Clone)]
pub struct Implication<Y> {
    pub premise: Bitset<Y>,
    pub conclusion: Bitset<Y>,
}

/// Closes `input` under a list of implications: repeatedly unions in the
/// conclusion of any implication whose premise is already satisfied, until
/// a fixed point is reached.
fn implication_closure<Y: Eq + Hash + Clone>(implications: &[Implication<Y>], input: &Bitset<Y>) -> Result<Bitset<Y>> {
    let mut output = input.clone();
    loop {
        let mut changed = false;
        for imp in implications {
            if imp.premise.subseteq(&output)? {
                let next = output.union(&imp.conclusion)?;
                if !next.equal(&output)? {
                    output = next;
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok(output);
        }
    }
}

/// Ganter's `next_preclosure` algorithm (the engine that drives
/// [`canonical_basis`]): given the current implications and a preclosed
/// set, computes the lectically-next preclosure. Descends attribute
/// indices from highest to lowest; at each index not already in `input`,
/// tests whether adding it and closing under the current implications
/// only pulls in attributes at that index or higher (the canonicity test
/// that makes the generated sets strictly lectically increasing).
fn next_preclosure<Y: Eq + Hash + Clone>(implications: &[Implication<Y>], input: &Bitset<Y>) -> Result<Bitset<Y>> {
    let n = input.domain_size();
    let mut working = input.clone();
    for i in (0..n).rev() {
        let elem = input.member(i).expect("valid attribute index").clone();
        if working.ismember(&elem)? {
            working = working.remove(&elem)?;
        } else {
            let candidate = working.add(&elem)?;
            let output = implication_closure(implications, &candidate)?;
            let new_members = output.minus(&working)?;
            if new_members.member_indices().into_iter().all(|j| j >= i) {
                return Ok(output);
            }
        }
    }
    Ok(input.full())
}

/// Computes the Duquenne–Guigues basis: the minimal set of implications
/// whose closure operator coincides with the context's attribute closure
/// (`A -> common(common'(A))`).
pub fn canonical_basis<X, Y>(ctx: &Context<X, Y>) -> Result<Vec<Implication<Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let mut implications = Vec::new();
    let mut current = ctx.empty_attributes();
    let top = current.full();
    while !current.equal(&top)? {
        let hull = ctx.common(&ctx.common_prime(&current)?)?;
        if !current.equal(&hull)? {
            implications.push(Implication { premise: current.clone(), conclusion: hull });
        }
        current = next_preclosure(&implications, &current)?;
    }
    Ok(implications)
}
