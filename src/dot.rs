//! A minimal DOT emitter for the lattice graph.
//!
//! A thin external shell: it has no access to `Context`/`Concept`
//! internals beyond their public API.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::io::{self, Write};

use crate::concept::fold_concepts;
use crate::context::Context;

/// Writes the lattice of `ctx` as a DOT digraph: one node per concept,
/// labeled with its object and attribute names, one edge per cover
/// relation (lower concept -> upper concept).
pub fn write_lattice<X, Y, W: Write>(w: &mut W, ctx: &Context<X, Y>) -> io::Result<()>
where
    X: Eq + Hash + Clone + Display,
    Y: Eq + Hash + Clone + Display,
{
    let mut ids: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    let mut edges: Vec<(usize, usize)> = Vec::new();

    let mut node_id = |extent_indices: Vec<usize>, objs: Vec<String>, attrs: Vec<String>| -> usize {
        *ids.entry(extent_indices).or_insert_with(|| {
            let id = labels.len();
            labels.push(format!("{{{}}}\\n{{{}}}", objs.join(","), attrs.join(",")));
            id
        })
    };

    fold_concepts(
        ctx,
        |c, uppers, _acc: ()| {
            let id = node_id(
                c.extent.member_indices(),
                c.extent.iter().map(|o| o.to_string()).collect(),
                c.intent.iter().map(|a| a.to_string()).collect(),
            );
            for u in uppers {
                let uid = node_id(
                    u.extent.member_indices(),
                    u.extent.iter().map(|o| o.to_string()).collect(),
                    u.intent.iter().map(|a| a.to_string()).collect(),
                );
                edges.push((id, uid));
            }
        },
        (),
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    writeln!(w, "digraph lattice {{")?;
    writeln!(w, "  node [shape=box];")?;
    for (id, label) in labels.iter().enumerate() {
        writeln!(w, "  n{id} [label=\"{label}\"];")?;
    }
    for (from, to) in edges {
        writeln!(w, "  n{from} -> n{to};")?;
    }
    writeln!(w, "}}")?;
    Ok(())
}
