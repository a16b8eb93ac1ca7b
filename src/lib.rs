//! A formal concept analysis engine: contexts, concept lattices, the
//! Duquenne–Guigues implication basis, and statistical rule/violation
//! mining over lattice cover-edges.
//!
//! The core ([`bitvec`], [`bitset`], [`context`], [`concept`], [`basis`],
//! [`next_closure`]) is pure and in-memory; [`parse`] and [`dot`] are thin
//! text-format shells built on top of it.

pub mod basis;
pub mod bitset;
pub mod bitvec;
pub mod concept;
pub mod context;
pub mod dot;
pub mod error;
pub mod next_closure;
pub mod parse;
pub mod rules;

pub use basis::{canonical_basis, Implication};
pub use bitset::Bitset;
pub use bitvec::BitVec;
pub use concept::Concept;
pub use context::Context;
pub use error::{Error, Result};
pub use rules::{flaws, indep_rules, render_violation, rules, Rule, Violation};
