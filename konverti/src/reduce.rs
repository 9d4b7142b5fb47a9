//! Reduction to weak head normal form (WHNF), including rewriting.

use crate::signature::Signature;
use crate::stack::Stack;
use crate::term::{RTerm, Term};
use core::cell::RefCell;
use std::rc::Rc;

/// A shared mutable holder of an argument term.
///
/// All consumers of an argument share its holder, so once
/// one of them normalizes the argument (see [`ArgCell::force`]),
/// all others see the normalized term.
#[derive(Clone)]
pub struct ArgCell(Rc<RefCell<Held>>);

struct Held {
    term: RTerm,
    whnfed: bool,
}

impl ArgCell {
    pub fn new(term: RTerm) -> Self {
        let whnfed = false;
        Self(Rc::new(RefCell::new(Held { term, whnfed })))
    }

    /// Obtain the held term without evaluating it.
    pub fn get(&self) -> RTerm {
        self.0.borrow().term.clone()
    }

    /// Replace the held term with its WHNF, if not done before, and return it.
    ///
    /// The replacement is invisible to consumers of the cell,
    /// because the new term is convertible with the old one.
    pub fn force(&self, sig: &Signature) -> RTerm {
        let (term, whnfed) = {
            let held = self.0.borrow();
            (held.term.clone(), held.whnfed)
        };
        if whnfed {
            return term;
        }
        let term = term.whnf(sig);
        let mut held = self.0.borrow_mut();
        held.term = term.clone();
        held.whnfed = true;
        term
    }
}

/// An abstract machine representing arguments applied to a term.
///
/// This representation allows for the shared evaluation of arguments.
///
/// See section 5.1 of the following reference:
/// Asperti, A.; Ricciotti, W.; Sacerdoti Coen, C.; Tassi, E. (2009).
/// "A compact kernel for the calculus of inductive constructions".
/// *Sadhana*. **34**: 71–144.
/// doi: [10.1007/s12046-009-0003-3](https://doi.org/10.1007%2Fs12046-009-0003-3).
#[derive(Clone)]
pub struct State {
    pub term: RTerm,
    pub stack: Stack<ArgCell>,
}

impl State {
    /// Construct a new state from a term. This does not yet evaluate anything.
    pub fn new(term: RTerm) -> Self {
        Self {
            term,
            stack: Stack::new(),
        }
    }

    /// Evaluate the state to its weak head normal form.
    ///
    /// Transitions are tried in the following order until none applies:
    /// unfold a solved metavariable at the head,
    /// push an application argument,
    /// contract a β-redex against the stack, and
    /// fire the first matching rewrite rule (in the order rules were added).
    pub fn whnf(&mut self, sig: &Signature) {
        loop {
            trace!("whnf: {}", self.term);
            let term = self.term.clone();
            match &*term {
                Term::Meta(m, env) => match m.solution() {
                    Some(sol) => self.term = sol.subst(env),
                    None => break,
                },
                Term::Appl(f, x) => {
                    self.stack.push(ArgCell::new(x.clone()));
                    self.term = f.clone();
                }
                Term::Abst(_, body) => match self.stack.pop() {
                    Some(cell) => self.term = body.clone().subst(&cell.get()),
                    None => break,
                },
                Term::Symb(s) => {
                    let rules = match sig.get_rules(s) {
                        None => break,
                        Some(rules) => rules,
                    };
                    let matched = rules
                        .iter()
                        .find_map(|r| Some((self.stack.match_rule(r, sig)?, r)));
                    match matched {
                        None => break,
                        Some(((rhs, arity), rule)) => {
                            trace!("rewrite: {} ... ⟶ {}", s, rule);
                            self.term = rhs;
                            self.stack.pop_many(arity);
                        }
                    }
                }
                _ => break,
            }
        }
    }
}

impl From<State> for RTerm {
    fn from(state: State) -> Self {
        let args = state.stack.into_iter().map(|cell| cell.get());
        state.term.apply(args)
    }
}

impl RTerm {
    /// Return the weak head normal form of the term.
    pub fn whnf(self, sig: &Signature) -> Self {
        trace!("whnf of {}", self);
        let mut state = State::new(self);
        state.whnf(sig);
        Self::from(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rule, Symbols};

    #[test]
    fn beta() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["bool", "p"].into_iter().collect();
        let sig = Signature::new();

        let tm = RTerm::parse("(x : bool => x) p", &syms)?;
        let expected = RTerm::parse("p", &syms)?;
        assert_eq!(tm.whnf(&sig), expected);
        Ok(())
    }

    #[test]
    fn rule_fires() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["prop", "imp", "proof", "a", "b"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "proof").unwrap(), Vec::new());

        let rule = Rule::parse("[x: prop, y: prop] proof (imp x y) --> proof x -> proof y", &syms)?;
        sig.add_rule(rule)?;

        let tm = RTerm::parse("proof (imp a b)", &syms)?;
        match &*tm.whnf(&sig) {
            Term::Prod(arg, body) => {
                assert_eq!(arg.ty.as_ref().unwrap(), &RTerm::parse("proof a", &syms)?);
                assert_eq!(body, &RTerm::parse("proof b", &syms)?);
            }
            _ => panic!("product expected"),
        }
        Ok(())
    }

    #[test]
    fn partial_application() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["type", "arr", "term", "bool"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "term").unwrap(), Vec::new());

        let rule = Rule::parse("[a: type, b: type] term (arr a b) --> term a -> term b", &syms)?;
        sig.add_rule(rule)?;

        // the rule consumes one stack argument, matching two pattern variables
        let tm = RTerm::parse("term (arr bool bool)", &syms)?;
        let whnf = tm.whnf(&sig);
        let expected = RTerm::parse("term bool -> term bool", &syms)?;
        assert!(RTerm::convertible(whnf.clone(), expected, &sig));

        // whnf is idempotent up to sharing
        assert_eq!(whnf.clone().whnf(&sig), whnf);
        Ok(())
    }

    #[test]
    fn whnf_of_stuck_term() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["f", "a"].into_iter().collect();
        let sig = Signature::new();

        // no rules for f, so the application is rigid
        let tm = RTerm::parse("f a", &syms)?;
        assert_eq!(tm.clone().whnf(&sig), tm);
        Ok(())
    }
}
