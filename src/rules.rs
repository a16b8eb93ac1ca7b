//! Frequent-set mining and violation (rule-exception) reporting over
//! lattice cover-edges.

use std::hash::Hash;

use crate::concept::{fold_concepts_topdown, Concept};
use crate::context::Context;
use crate::error::Result;

/// `{rhs, support}`: `support` objects all carry the attributes in `rhs`.
#[derive(Clone)]
pub struct Rule<X, Y> {
    pub rhs: crate::bitset::Bitset<Y>,
    pub support: crate::bitset::Bitset<X>,
}

impl<X, Y> Rule<X, Y> {
    fn from_concept(c: &Concept<X, Y>) -> Self {
        Rule { rhs: c.intent.clone(), support: c.extent.clone() }
    }
}

/// `{rule, flaw}`: `flaw.support ⊋ rule.support` and `flaw.rhs ⊊ rule.rhs`.
/// Objects in `flaw.support \ rule.support` are the exceptions.
#[derive(Clone)]
pub struct Violation<X, Y> {
    pub rule: Rule<X, Y>,
    pub flaw: Rule<X, Y>,
}

impl<X: Eq + Hash + Clone, Y: Eq + Hash + Clone> Violation<X, Y> {
    /// Objects that satisfy the weaker `flaw` rule but fail to extend it to
    /// the stronger `rule`.
    pub fn exceptions(&self) -> Result<crate::bitset::Bitset<X>> {
        self.flaw.support.minus(&self.rule.support)
    }
}

/// Emit every visited concept `(O, A)` with `|O| >= min_support` and
/// `|A| >= min_rhs` as a rule, driven by `fold_concepts_topdown` pruned on
/// `min_support`.
pub fn rules<X, Y>(ctx: &Context<X, Y>, min_support: usize, min_rhs: usize) -> Result<Vec<Rule<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    fold_concepts_topdown(
        ctx,
        |c| c.extent.count() >= min_support,
        |c, _lowers, mut acc: Vec<Rule<X, Y>>| {
            if c.extent.count() >= min_support && c.intent.count() >= min_rhs {
                acc.push(Rule::from_concept(c));
            }
            acc
        },
        Vec::new(),
    )
}

/// For every cover-edge `(sub, sup)` visited during the top-down fold (sub
/// is a lower neighbor of sup), evaluate support/confidence/gap and emit a
/// violation when all three thresholds hold.
pub fn flaws<X, Y>(
    ctx: &Context<X, Y>,
    min_support: usize,
    min_confidence: f64,
    max_diff: usize,
) -> Result<Vec<Violation<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    fold_concepts_topdown(
        ctx,
        |c| c.extent.count() >= min_support,
        |sup, lowers, mut acc: Vec<Violation<X, Y>>| {
            for sub in lowers {
                let s = sub.extent.count();
                let sup_count = sup.extent.count();
                if sup_count == 0 {
                    continue;
                }
                let confidence = s as f64 / sup_count as f64;
                let gap = sub.intent.count() as i64 - sup.intent.count() as i64;
                if s >= min_support && confidence >= min_confidence && gap <= max_diff as i64 {
                    acc.push(Violation {
                        rule: Rule::from_concept(sub),
                        flaw: Rule::from_concept(sup),
                    });
                }
            }
            acc
        },
        Vec::new(),
    )
}

/// Same edge walk as [`flaws`] with an inverted predicate: emit when
/// `s >= min_support && confidence <= max_confidence && |A_sup| >=
/// min_width`. Used to find independent feature groups (low-confidence
/// transitions).
pub fn indep_rules<X, Y>(
    ctx: &Context<X, Y>,
    min_support: usize,
    max_confidence: f64,
    min_width: usize,
) -> Result<Vec<Violation<X, Y>>>
where
    X: Eq + Hash + Clone,
    Y: Eq + Hash + Clone,
{
    fold_concepts_topdown(
        ctx,
        |c| c.extent.count() >= min_support,
        |sup, lowers, mut acc: Vec<Violation<X, Y>>| {
            for sub in lowers {
                let s = sub.extent.count();
                let sup_count = sup.extent.count();
                if sup_count == 0 {
                    continue;
                }
                let confidence = s as f64 / sup_count as f64;
                if s >= min_support && confidence <= max_confidence && sup.intent.count() >= min_width {
                    acc.push(Violation {
                        rule: Rule::from_concept(sub),
                        flaw: Rule::from_concept(sup),
                    });
                }
            }
            acc
        },
        Vec::new(),
    )
}

/// Renders a violation as a textual record:
///
/// ```text
/// violation (confidence C.CC support SSS gap GGG flaws FFF)
///   flaws (FFF)       : <object names space-separated>
///   rule (support S1): <attribute names>
///   rule (support S2): <attribute names>
/// ```
pub fn render_violation<X, Y>(v: &Violation<X, Y>) -> Result<String>
where
    X: Eq + Hash + Clone + std::fmt::Display,
    Y: Eq + Hash + Clone + std::fmt::Display,
{
    let exceptions = v.exceptions()?;
    let support = v.rule.support.count();
    let sup_support = v.flaw.support.count();
    let confidence = support as f64 / sup_support as f64;
    let gap = v.rule.rhs.count() as i64 - v.flaw.rhs.count() as i64;
    let flaw_count = exceptions.count();

    let object_names: Vec<String> = exceptions.iter().map(|o| o.to_string()).collect();
    let rule_attrs: Vec<String> = v.rule.rhs.iter().map(|a| a.to_string()).collect();
    let flaw_attrs: Vec<String> = v.flaw.rhs.iter().map(|a| a.to_string()).collect();

    Ok(format!(
        "violation (confidence {:.2} support {} gap {} flaws {})\n  flaws ({})       : {}\n  rule (support {}): {}\n  rule (support {}): {}",
        confidence,
        support,
        gap,
        flaw_count,
        flaw_count,
        object_names.join(" "),
        support,
        rule_attrs.join(" "),
        sup_support,
        flaw_attrs.join(" "),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn s6_creat_open_mkdir_fork_edge_yields_the_documented_violation() {
        let ctx = system_calls_context();
        let violations = flaws(&ctx, 2, 0.5, 2).unwrap();

        let found = violations.iter().find(|v| {
            v.flaw.support.count() == 4
                && v.flaw.support.ismember(&"mkdir").unwrap()
                && v.flaw.support.ismember(&"fork").unwrap()
                && v.rule.support.count() == 2
                && v.rule.support.ismember(&"creat").unwrap()
                && v.rule.support.ismember(&"open").unwrap()
        });
        let v = found.expect("the creat/open/mkdir/fork -> creat/open edge must be reported");

        let exceptions = v.exceptions().unwrap();
        assert!(exceptions.ismember(&"mkdir").unwrap());
        assert!(exceptions.ismember(&"fork").unwrap());
        assert_eq!(exceptions.count(), 2);

        let confidence = v.rule.support.count() as f64 / v.flaw.support.count() as f64;
        assert!((confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rules_respect_support_and_rhs_thresholds() {
        let ctx = system_calls_context();
        let rs = rules(&ctx, 2, 1).unwrap();
        for r in &rs {
            assert!(r.support.count() >= 2);
            assert!(r.rhs.count() >= 1);
        }
        assert!(!rs.is_empty());
    }

    #[test]
    fn indep_rules_finds_low_confidence_edges() {
        let ctx = system_calls_context();
        let vs = indep_rules(&ctx, 1, 0.5, 1).unwrap();
        for v in &vs {
            let confidence = v.rule.support.count() as f64 / v.flaw.support.count() as f64;
            assert!(confidence <= 0.5 + 1e-9);
            assert!(v.flaw.rhs.count() >= 1);
        }
    }

    #[test]
    fn render_violation_matches_documented_record_shape() {
        let ctx = system_calls_context();
        let v = flaws(&ctx, 2, 0.5, 2)
            .unwrap()
            .into_iter()
            .find(|v| v.rule.support.count() == 2 && v.flaw.support.count() == 4)
            .unwrap();
        let text = render_violation(&v).unwrap();
        assert!(text.starts_with("violation (confidence"));
        assert!(text.contains("flaws ("));
        assert!(text.contains("rule (support"));
    }
}
