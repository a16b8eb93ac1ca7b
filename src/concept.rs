//! The concept-enumeration engine: closures, Lindig's neighbor algorithm,
//! and the whole-lattice worklist traversals built on top of it.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::Hash;

use crate::bitset::Bitset;
use crate::context::Context;
use crate::error::Result;

/// A formal concept `(O, A)`. Compared by `extent` only — `intent` is
/// uniquely determined by `extent` within a given context.
#[derive(Clone)]
pub struct Concept<X, Y> {
    pub extent: Bitset<X>,
    pub intent: Bitset<Y>,
}

impl<X, Y> Concept<X, Y> {
    pub fn new(extent: Bitset<X>, intent: Bitset<Y>) -> Self {
        Concept { extent, intent }
    }
}

impl<X: Eq + Hash + Clone, Y> PartialEq for Concept<X, Y> {
    fn eq(&self, other: &Self) -> bool {
        self.extent.equal(&other.extent).unwrap_or(false)
    }
}
impl<X: Eq + Hash + Clone, Y> Eq for Concept<X, Y> {}

impl<X: Eq + Hash + Clone, Y> PartialOrd for Concept<X, Y> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<X: Eq + Hash + Clone, Y> Ord for Concept<X, Y> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.extent.compare(&other.extent).expect("concepts compared within one traversal share a domain")
    }
}

/// `closure(O) = let A = common(O), O' = common'(A) in (O', A)`.
pub fn closure<X, Y>(ctx: &Context<X, Y>, objects: &Bitset<X>) -> Result<Concept<X, Y>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let intent = ctx.common(objects)?;
    let extent = ctx.common_prime(&intent)?;
    Ok(Concept::new(extent, intent))
}

/// `closure'(A) = let O = common'(A), A' = common(O) in (O, A')`.
pub fn closure_prime<X, Y>(ctx: &Context<X, Y>, attributes: &Bitset<Y>) -> Result<Concept<X, Y>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let extent = ctx.common_prime(attributes)?;
    let intent = ctx.common(&extent)?;
    Ok(Concept::new(extent, intent))
}

pub fn top<X, Y>(ctx: &Context<X, Y>) -> Result<Concept<X, Y>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    closure_prime(ctx, &ctx.empty_attributes())
}

pub fn bottom<X, Y>(ctx: &Context<X, Y>) -> Result<Concept<X, Y>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    closure(ctx, &ctx.empty_objects())
}

/// Lindig's online minimality test for upper-neighbor enumeration.
/// Threads `acc` through `f(cover, acc)` for each cover, in deterministic
/// ascending-candidate-index discovery order.
pub fn fold_upper<X, Y, A>(
    ctx: &Context<X, Y>,
    c: &Concept<X, Y>,
    mut f: impl FnMut(Concept<X, Y>, A) -> A,
    init: A,
) -> Result<A>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let candidates = c.extent.full().minus(&c.extent)?; // X \ O
    let mut min = candidates.clone();
    let mut acc = init;
    for i in candidates.member_indices() {
        let elem = c.extent.member(i).expect("candidate index is within the object domain").clone();
        let singleton = c.extent.empty().add(&elem)?;
        let next_extent = c.extent.union(&singleton)?;
        let next = closure(ctx, &next_extent)?;
        let delta = next.extent.minus(&c.extent)?.minus(&singleton)?;
        if min.intersect(&delta)?.isempty() {
            acc = f(next, acc);
        } else {
            min = min.minus(&singleton)?;
        }
    }
    Ok(acc)
}

/// `upper` is `fold_upper` accumulating into a `Vec`.
pub fn upper<X, Y>(ctx: &Context<X, Y>, c: &Concept<X, Y>) -> Result<Vec<Concept<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    fold_upper(
        ctx,
        c,
        |cover, mut acc| {
            acc.push(cover);
            acc
        },
        Vec::new(),
    )
}

/// Lower-neighbor enumeration, implemented as upper-neighbor enumeration
/// over the dual context (swap object/attribute roles) — the two are
/// exactly dual.
pub fn fold_lower<X, Y, A>(
    ctx: &Context<X, Y>,
    c: &Concept<X, Y>,
    mut f: impl FnMut(Concept<X, Y>, A) -> A,
    init: A,
) -> Result<A>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let dual_ctx = ctx.dual();
    let dual_concept = Concept::new(c.intent.clone(), c.extent.clone());
    fold_upper(
        &dual_ctx,
        &dual_concept,
        |u, acc| f(Concept::new(u.intent, u.extent), acc),
        init,
    )
}

pub fn lower<X, Y>(ctx: &Context<X, Y>, c: &Concept<X, Y>) -> Result<Vec<Concept<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    fold_lower(
        ctx,
        c,
        |cover, mut acc| {
            acc.push(cover);
            acc
        },
        Vec::new(),
    )
}

/// All concepts of the context. Worklist seeded with `top`, pulling the
/// minimum unvisited concept and pushing its lower neighbors.
pub fn concepts<X, Y>(ctx: &Context<X, Y>) -> Result<BTreeSet<Concept<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let mut worklist = BTreeSet::new();
    worklist.insert(top(ctx)?);
    let mut visited = BTreeSet::new();
    while let Some(c) = worklist.iter().next().cloned() {
        worklist.remove(&c);
        if visited.contains(&c) {
            continue;
        }
        for l in lower(ctx, &c)? {
            if !visited.contains(&l) {
                worklist.insert(l);
            }
        }
        visited.insert(c);
    }
    Ok(visited)
}

/// Bottom-up fold over every cover-edge. Worklist seeded with `bottom`,
/// pulling the minimum unvisited concept at each step; `f` receives the
/// concept and all of its upper covers.
pub fn fold_concepts<X, Y, A>(
    ctx: &Context<X, Y>,
    mut f: impl FnMut(&Concept<X, Y>, &[Concept<X, Y>], A) -> A,
    init: A,
) -> Result<A>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let mut worklist = BTreeSet::new();
    worklist.insert(bottom(ctx)?);
    let mut visited = BTreeSet::new();
    let mut acc = init;
    while let Some(c) = worklist.iter().next().cloned() {
        worklist.remove(&c);
        if visited.contains(&c) {
            continue;
        }
        let uppers = upper(ctx, &c)?;
        acc = f(&c, &uppers, acc);
        for u in &uppers {
            if !visited.contains(u) {
                worklist.insert(u.clone());
            }
        }
        visited.insert(c);
    }
    Ok(acc)
}

/// Top-down dual of [`fold_concepts`]. Worklist seeded with `top`, pulling
/// the *maximum* unvisited concept; `f` receives the concept and all of
/// its lower covers.
pub fn fold_concepts_top_down<X, Y, A>(
    ctx: &Context<X, Y>,
    mut f: impl FnMut(&Concept<X, Y>, &[Concept<X, Y>], A) -> A,
    init: A,
) -> Result<A>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let mut worklist = BTreeSet::new();
    worklist.insert(top(ctx)?);
    let mut visited = BTreeSet::new();
    let mut acc = init;
    while let Some(c) = worklist.iter().next_back().cloned() {
        worklist.remove(&c);
        if visited.contains(&c) {
            continue;
        }
        let lowers = lower(ctx, &c)?;
        acc = f(&c, &lowers, acc);
        for l in &lowers {
            if !visited.contains(l) {
                worklist.insert(l.clone());
            }
        }
        visited.insert(c);
    }
    Ok(acc)
}

/// Pruned top-down fold: only lower neighbors passing `p` are pushed onto
/// the worklist as further expansion frontiers. `f` still receives every
/// immediate lower neighbor regardless of `p`, passing or not — this is
/// the contract the rule miner depends on (a flaw's weaker side need not
/// itself clear the support threshold). This is the engine's primary
/// entry point for rule mining (`p` prunes on minimum support).
pub fn fold_concepts_topdown<X, Y, A>(
    ctx: &Context<X, Y>,
    p: impl Fn(&Concept<X, Y>) -> bool,
    mut f: impl FnMut(&Concept<X, Y>, &[Concept<X, Y>], A) -> A,
    init: A,
) -> Result<A>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    let mut worklist = BTreeSet::new();
    worklist.insert(top(ctx)?);
    let mut visited = BTreeSet::new();
    let mut acc = init;
    while let Some(c) = worklist.iter().next_back().cloned() {
        worklist.remove(&c);
        if visited.contains(&c) {
            continue;
        }
        let lowers = lower(ctx, &c)?;
        acc = f(&c, &lowers, acc);
        for l in &lowers {
            if p(l) && !visited.contains(l) {
                worklist.insert(l.clone());
            }
        }
        visited.insert(c);
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::collections::HashSet;

    fn system_calls_context() -> Context<&'static str, &'static str> {
        Context::from_pairs(vec![
            ("chmod", vec!["change", "file", "mode", "permission"]),
            ("chown", vec!["change", "file", "group", "owner"]),
            ("fstat", vec!["get", "file", "status"]),
            ("fork", vec!["create", "new", "process"]),
            ("chdir", vec!["change", "directory"]),
            ("mkdir", vec!["create", "directory", "new"]),
            ("open", vec!["create", "file", "open", "read", "write"]),
            ("read", vec!["file", "input", "read"]),
            ("rmdir", vec!["directory", "file", "remove"]),
            ("write", vec!["file", "output", "write"]),
            ("creat", vec!["create", "file", "new"]),
            ("access", vec!["access", "check", "file"]),
        ])
        .unwrap()
    }

    fn brute_force_concepts<X, Y>(ctx: &Context<X, Y>) -> HashSet<Vec<usize>>
    where
        X: Eq + Hash + Clone,
        Y: Eq + Hash + Clone,
    {
        let n = ctx.attributes().count();
        let mut out = HashSet::new();
        for attrs in (0..n).powerset() {
            let mut set = ctx.empty_attributes();
            for i in attrs {
                let elem = set.member(i).unwrap().clone();
                set = set.add(&elem).unwrap();
            }
            let c = closure_prime(ctx, &set).unwrap();
            out.insert(c.extent.member_indices());
        }
        out
    }

    #[test]
    fn s1_empty_relation() {
        let ctx: Context<&str, &str> = Context::make(["o1", "o2"], ["a1"]).unwrap();
        let cs = concepts(&ctx).unwrap();
        assert_eq!(cs.len(), 2);
        let top_c = top(&ctx).unwrap();
        assert_eq!(top_c.extent.count(), 2);
        assert_eq!(top_c.intent.count(), 0);
        let bottom_c = bottom(&ctx).unwrap();
        assert_eq!(bottom_c.extent.count(), 0);
        assert_eq!(bottom_c.intent.count(), 1);
        let uppers_of_bottom = upper(&ctx, &bottom_c).unwrap();
        assert_eq!(uppers_of_bottom.len(), 1);
        assert!(uppers_of_bottom[0].extent.equal(&top_c.extent).unwrap());
    }

    #[test]
    fn s2_full_relation() {
        let ctx: Context<&str, &str> = Context::from_pairs(vec![("o1", vec!["a1"])]).unwrap();
        let cs = concepts(&ctx).unwrap();
        assert_eq!(cs.len(), 1);
    }

    #[test]
    fn s3_system_calls_has_23_concepts() {
        let ctx = system_calls_context();
        let cs = concepts(&ctx).unwrap();
        assert_eq!(cs.len(), 23);

        let file_objects: Vec<&str> =
            ["access", "creat", "write", "rmdir", "read", "open", "fstat", "chown", "chmod"].to_vec();
        let mut extent = ctx.empty_objects();
        for o in &file_objects {
            extent = extent.add(o).unwrap();
        }
        let c = closure(&ctx, &extent).unwrap();
        assert!(c.intent.ismember(&"file").unwrap());
        assert_eq!(c.intent.count(), 1);
        assert!(cs.contains(&c));

        let create_objects: Vec<&str> = vec!["creat", "open", "mkdir", "fork"];
        let mut extent2 = ctx.empty_objects();
        for o in &create_objects {
            extent2 = extent2.add(o).unwrap();
        }
        let c2 = closure(&ctx, &extent2).unwrap();
        assert!(c2.intent.ismember(&"create").unwrap());
        assert_eq!(c2.intent.count(), 1);
        assert!(cs.contains(&c2));
    }

    #[test]
    fn full_two_by_two_relation_has_a_single_concept() {
        // Every object shares every attribute here, so top and bottom
        // coincide: exactly one concept, not two. See DESIGN.md.
        let ctx: Context<&str, &str> = Context::from_pairs(vec![
            ("o1", vec!["a1", "a2"]),
            ("o2", vec!["a1", "a2"]),
        ])
        .unwrap();
        assert_eq!(concepts(&ctx).unwrap().len(), 1);
    }

    #[test]
    fn s5_chain_of_four() {
        let ctx: Context<&str, &str> = Context::from_pairs(vec![
            ("o1", vec!["a1"]),
            ("o2", vec!["a1", "a2"]),
            ("o3", vec!["a1", "a2", "a3"]),
        ])
        .unwrap();
        assert_eq!(concepts(&ctx).unwrap().len(), 4);
    }

    #[test]
    fn galois_idempotence() {
        let ctx = system_calls_context();
        let o = ctx.empty_objects().add(&"open").unwrap().add(&"creat").unwrap();
        let once = closure(&ctx, &o).unwrap();
        let twice = closure(&ctx, &once.extent).unwrap();
        assert!(once.extent.equal(&twice.extent).unwrap());
        assert!(once.intent.equal(&twice.intent).unwrap());
    }

    #[test]
    fn concept_invariant_holds_for_every_enumerated_concept() {
        let ctx = system_calls_context();
        for c in concepts(&ctx).unwrap() {
            let a = ctx.common(&c.extent).unwrap();
            let o = ctx.common_prime(&c.intent).unwrap();
            assert!(a.equal(&c.intent).unwrap());
            assert!(o.equal(&c.extent).unwrap());
        }
    }

    #[test]
    fn no_strict_upper_neighbor_of_top_and_lower_of_bottom() {
        let ctx = system_calls_context();
        assert!(upper(&ctx, &top(&ctx).unwrap()).unwrap().is_empty());
        assert!(lower(&ctx, &bottom(&ctx).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn cover_coverage_matches_between_bottom_up_and_top_down_folds() {
        let ctx = system_calls_context();
        let up_edges = fold_concepts(&ctx, |_, uppers, mut acc| {
            acc += uppers.len();
            acc
        }, 0usize)
        .unwrap();
        let down_edges = fold_concepts_top_down(&ctx, |_, lowers, mut acc| {
            acc += lowers.len();
            acc
        }, 0usize)
        .unwrap();
        assert_eq!(up_edges, down_edges);
    }

    #[test]
    fn visit_once_across_whole_lattice_traversal() {
        let ctx = system_calls_context();
        let mut calls = 0usize;
        fold_concepts(&ctx, |_, _, mut acc| {
            acc += 1;
            calls += 1;
            acc
        }, 0usize)
        .unwrap();
        assert_eq!(calls, 23);
    }

    #[test]
    fn size_consistency_against_brute_force_powerset_oracle() {
        let ctx: Context<&str, &str> = Context::from_pairs(vec![
            ("o1", vec!["a1", "a2"]),
            ("o2", vec!["a1"]),
            ("o3", vec!["a2", "a3"]),
        ])
        .unwrap();
        let via_engine = concepts(&ctx).unwrap().len();
        let via_brute_force = brute_force_concepts(&ctx).len();
        assert_eq!(via_engine, via_brute_force);
    }

    #[test]
    fn pruned_topdown_still_reports_low_support_lower_neighbors() {
        let ctx = system_calls_context();
        let mut saw_pruned_neighbor = false;
        fold_concepts_topdown(
            &ctx,
            |c| c.extent.count() >= 4,
            |_, lowers, acc| {
                if lowers.iter().any(|l| l.extent.count() < 4) {
                    saw_pruned_neighbor = true;
                }
                acc
            },
            (),
        )
        .unwrap();
        assert!(saw_pruned_neighbor);
    }
}
