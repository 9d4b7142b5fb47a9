//! Map from symbols to their types and associated rewrite rules.

use crate::error::SignatureError as Error;
use crate::rule::{Rule, TopPattern};
use crate::symbol::Symbol;
use crate::term::{RTerm, Term};
use crate::typing::Typing;
use fnv::FnvHashMap;

/// Map from symbols to their types and associated rewrite rules.
///
/// A symbol is static if it has no entry in the rules map;
/// static symbols can never be rewritten.
#[derive(Default)]
pub struct Signature {
    pub types: FnvHashMap<Symbol, RTerm>,
    pub rules: FnvHashMap<Symbol, Vec<Rule>>,
}

impl Signature {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return the type of a symbol.
    pub fn get_type(&self, sym: &Symbol) -> Option<&RTerm> {
        self.types.get(sym)
    }

    /// Return the rewrite rules whose left-hand side head is the given symbol.
    pub fn get_rules(&self, sym: &Symbol) -> Option<&Vec<Rule>> {
        self.rules.get(sym)
    }

    fn intro_type(&mut self, sym: Symbol, typ: RTerm) -> Result<(), Error> {
        if self.types.insert(sym, typ).is_some() {
            return Err(Error::Reintroduction);
        }
        Ok(())
    }

    fn intro_rules(&mut self, sym: Symbol, rules: Vec<Rule>) -> Result<(), Error> {
        if self.rules.insert(sym, rules).is_some() {
            return Err(Error::Reintroduction);
        }
        Ok(())
    }

    /// Add a rewrite rule to an existing definable symbol.
    ///
    /// Rules are tried in the order they were added.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), Error> {
        if !rule.lhs.args.iter().all(pattern_ok) {
            return Err(Error::PatternIllFormed);
        }
        self.rules
            .get_mut(&rule.lhs.symbol)
            .ok_or(Error::NonRewritable)?
            .push(rule);
        Ok(())
    }

    /// Introduce a new symbol with the given typing.
    ///
    /// A definition `def f := t` registers the rule `f ⟶ t`,
    /// so that `f` unfolds to its definiens during reduction.
    pub fn insert(&mut self, sym: &Symbol, typing: Typing) -> Result<(), Error> {
        self.intro_type(sym.clone(), typing.typ)?;
        if typing.rewritable {
            let rules = match typing.term {
                None => Vec::new(),
                Some((tm, _check)) => Vec::from([Rule {
                    ctx: Vec::new(),
                    lhs: TopPattern::from(sym.clone()),
                    rhs: tm,
                }]),
            };
            self.intro_rules(sym.clone(), rules)?;
        }
        Ok(())
    }
}

/// Return false if the term may not occur inside a rule left-hand side.
///
/// Metavariables have no matching semantics, and
/// pattern slots are reserved for the matcher itself.
fn pattern_ok(tm: &RTerm) -> bool {
    match &**tm {
        Term::Meta(_, _) | Term::Patt(_) => false,
        Term::Appl(f, x) => pattern_ok(f) && pattern_ok(x),
        Term::Abst(arg, b) | Term::Prod(arg, b) => {
            arg.ty.as_ref().map_or(true, |ty| pattern_ok(ty)) && pattern_ok(b)
        }
        _ => true,
    }
}
