//! Unscoped rewrite rules.

use super::term::{Arg, Term};

/// Rewrite rules with
/// optionally annotated identifiers as context and
/// preterms as left- and right-hand sides.
///
/// This is a vast overapproximation of rules, because
/// not every preterm is a valid rule left-hand side.
/// Scoping takes care to separate the wheat from the chaff.
#[derive(Clone, Debug)]
pub struct Rule {
    /// context (pattern variables)
    pub ctx: Vec<Arg>,
    /// left-hand side (pattern to match with)
    pub lhs: Term,
    /// right-hand side (term to replace with)
    pub rhs: Term,
}
