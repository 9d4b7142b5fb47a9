//! Rewrite rules.

use crate::fmt::application as fmt_appl;
use crate::symbol::Symbol;
use crate::term::{Arg, RTerm, Term};
use core::fmt::{self, Display};

/// Left-hand side of a rewrite rule.
///
/// The top pattern of a rule must be an application of arguments to a symbol.
/// This is to exclude rules matching any term, such as `[X] X --> f`.
#[derive(Clone, Debug)]
pub struct TopPattern {
    pub symbol: Symbol,
    pub args: Vec<RTerm>,
}

/// Rewrite rule.
///
/// The rule context binds the pattern variables occurring in
/// the arguments of the left-hand side and in the right-hand side;
/// both are terms under the context telescope, where
/// the first context entry is the outermost bound variable.
/// Context entries may carry a type annotation.
///
/// Rules may be nonlinear; e.g. `[x] eq x x --> true` is a valid rule.
#[derive(Clone, Debug)]
pub struct Rule {
    /// context (pattern variables)
    pub ctx: Vec<Arg>,
    /// left-hand side (pattern to match with)
    pub lhs: TopPattern,
    /// right-hand side (term to replace with)
    pub rhs: RTerm,
}

impl Rule {
    /// Minimal number of stack arguments for the rule to fire.
    pub fn arity(&self) -> usize {
        self.lhs.args.len()
    }
}

impl From<Symbol> for TopPattern {
    fn from(symbol: Symbol) -> Self {
        let args = Vec::new();
        Self { symbol, args }
    }
}

impl From<&TopPattern> for RTerm {
    fn from(pat: &TopPattern) -> Self {
        RTerm::new(Term::Symb(pat.symbol.clone())).apply(pat.args.iter().cloned())
    }
}

impl Display for TopPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_appl(&self.symbol, &self.args, f)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs, self.rhs)
    }
}
