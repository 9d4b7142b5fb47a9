//! Convertibility checking.

use crate::bind::unbind2;
use crate::reduce::State;
use crate::signature::Signature;
use crate::term::{RTerm, Term};
use crate::unify::unify;

pub type Constraint = (RTerm, RTerm);

/// Collector for postponed convertibility constraints.
///
/// When the collector is active, a pair of terms that
/// can neither be decided equal nor taken apart any further
/// is recorded instead of failing the conversion.
/// The typechecker activates the collector while checking rewrite rules,
/// whose pattern variables render some comparisons undecidable.
pub struct Constraints(Option<Vec<Constraint>>);

impl Constraints {
    pub fn inactive() -> Self {
        Self(None)
    }

    pub fn active() -> Self {
        Self(Some(Vec::new()))
    }

    /// Record a constraint, returning true iff the collector is active.
    fn add(&mut self, cn1: RTerm, cn2: RTerm) -> bool {
        match &mut self.0 {
            Some(cns) => {
                trace!("postponing: {} ~? {}", cn1, cn2);
                cns.push((cn1, cn2));
                true
            }
            None => false,
        }
    }

    pub fn take(self) -> Vec<Constraint> {
        self.0.unwrap_or_default()
    }
}

/// Return true if two terms are syntactically equal up to
/// α-equivalence and the unfolding of solved metavariables.
///
/// An unsolved metavariable on one side triggers unification with the other.
pub fn eq_syntax(tm1: &RTerm, tm2: &RTerm) -> bool {
    let tm1 = tm1.unfold();
    let tm2 = tm2.unfold();
    if tm1.ptr_eq(&tm2) {
        return true;
    }
    match (&*tm1, &*tm2) {
        (Term::Kind, Term::Kind) | (Term::Type, Term::Type) => true,
        (Term::Symb(s1), Term::Symb(s2)) => s1 == s2,
        (Term::BVar(n1), Term::BVar(n2)) => n1 == n2,
        (Term::FVar(v1), Term::FVar(v2)) => v1 == v2,
        (Term::Appl(f1, x1), Term::Appl(f2, x2)) => eq_syntax(f1, f2) && eq_syntax(x1, x2),
        (Term::Abst(arg1, b1), Term::Abst(arg2, b2))
        | (Term::Prod(arg1, b1), Term::Prod(arg2, b2)) => {
            let doms = match (&arg1.ty, &arg2.ty) {
                (None, None) => true,
                (Some(ty1), Some(ty2)) => eq_syntax(ty1, ty2),
                _ => false,
            };
            doms && eq_syntax(b1, b2)
        }
        (Term::Meta(m1, env1), Term::Meta(m2, env2)) if m1 == m2 => {
            env1.len() == env2.len() && env1.iter().zip(env2).all(|(e1, e2)| eq_syntax(e1, e2))
        }
        (Term::Meta(m, env), _) => unify(m, env, &tm2),
        (_, Term::Meta(m, env)) => unify(m, env, &tm1),
        _ => false,
    }
}

/// Weak-head-normalize both sides of a constraint and compare their heads,
/// possibly pushing new constraints.
fn step(
    cn1: RTerm,
    cn2: RTerm,
    cns: &mut Vec<Constraint>,
    sig: &Signature,
    defer: &mut Constraints,
) -> bool {
    let mut st1 = State::new(cn1);
    st1.whnf(sig);
    let mut st2 = State::new(cn2);
    st2.whnf(sig);

    let mut args1: Vec<RTerm> = st1.stack.into_iter().map(|cell| cell.get()).collect();
    let mut args2: Vec<RTerm> = st2.stack.into_iter().map(|cell| cell.get()).collect();

    // align the outermost arguments of both sides;
    // surplus arguments of the longer side belong to its head
    // (this covers partially applied definable symbols)
    let k = core::cmp::min(args1.len(), args2.len());
    let h1 = st1.term.apply(args1.drain(..args1.len() - k));
    let h2 = st2.term.apply(args2.drain(..args2.len() - k));
    cns.extend(args1.into_iter().zip(args2));

    match (&*h1, &*h2) {
        (Term::Abst(arg1, b1), Term::Abst(arg2, b2))
        | (Term::Prod(arg1, b1), Term::Prod(arg2, b2)) => {
            if let (Some(ty1), Some(ty2)) = (&arg1.ty, &arg2.ty) {
                cns.push((ty1.clone(), ty2.clone()));
            }
            let (_, b1, b2) = unbind2(&arg1.id, b1, b2);
            cns.push((b1, b2));
            true
        }
        _ if eq_syntax(&h1, &h2) => true,
        _ => defer.add(h1.clone(), h2.clone()),
    }
}

/// Decide whether two terms are convertible,
/// deferring undecidable head pairs to the given collector.
pub(crate) fn convert(tm1: RTerm, tm2: RTerm, sig: &Signature, defer: &mut Constraints) -> bool {
    let mut cns = Vec::from([(tm1, tm2)]);
    loop {
        match cns.pop() {
            Some((cn1, cn2)) => {
                trace!("convertible: {} ~? {}", cn1, cn2);
                if !eq_syntax(&cn1, &cn2) && !step(cn1, cn2, &mut cns, sig, defer) {
                    break false;
                }
            }
            None => break true,
        }
    }
}

impl RTerm {
    /// Return true if the given terms are equal modulo β-reduction and rewriting.
    pub fn convertible(tm1: Self, tm2: Self, sig: &Signature) -> bool {
        convert(tm1, tm2, sig, &mut Constraints::inactive())
    }
}

/// Compare two terms modulo β-reduction and rewriting,
/// recording each undecidable subproblem instead of failing on it.
pub fn constraints(tm1: RTerm, tm2: RTerm, sig: &Signature) -> Vec<Constraint> {
    let mut defer = Constraints::active();
    convert(tm1, tm2, sig, &mut defer);
    defer.take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rule, Symbols};

    #[test]
    fn unfold_definition() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["bool", "forall", "imp", "true"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "true").unwrap(), Vec::new());

        // definition true := forall bool (p : bool => imp p p)
        let rule = Rule::parse("[] true --> forall bool (p : bool => imp p p)", &syms)?;
        sig.add_rule(rule)?;

        let lhs = RTerm::parse("true", &syms)?;
        let rhs = RTerm::parse("forall bool (p : bool => imp p p)", &syms)?;
        assert!(RTerm::convertible(lhs, rhs, &sig));
        Ok(())
    }

    #[test]
    fn alpha_equivalence() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["bool"].into_iter().collect();
        let sig = Signature::new();

        let tm1 = RTerm::parse("x : bool => x", &syms)?;
        let tm2 = RTerm::parse("y : bool => y", &syms)?;
        assert!(eq_syntax(&tm1, &tm2));
        assert!(RTerm::convertible(tm1, tm2, &sig));
        Ok(())
    }

    #[test]
    fn whnf_is_convertible() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["type", "arr", "term", "bool"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "term").unwrap(), Vec::new());

        let rule = Rule::parse("[a: type, b: type] term (arr a b) --> term a -> term b", &syms)?;
        sig.add_rule(rule)?;

        let tm = RTerm::parse("term (arr bool bool)", &syms)?;
        assert!(RTerm::convertible(tm.clone(), tm.clone().whnf(&sig), &sig));
        assert!(RTerm::convertible(
            tm,
            RTerm::parse("term bool -> term bool", &syms)?,
            &sig
        ));
        Ok(())
    }

    #[test]
    fn distinct_rigid_heads() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["a", "b", "f"].into_iter().collect();
        let sig = Signature::new();

        let tm1 = RTerm::parse("f a", &syms)?;
        let tm2 = RTerm::parse("f b", &syms)?;
        assert!(!RTerm::convertible(tm1.clone(), tm2.clone(), &sig));

        // in constraint mode, the mismatch is recorded instead
        assert_eq!(constraints(tm1, tm2, &sig).len(), 1);
        Ok(())
    }

    #[test]
    fn unapplied_versus_applied() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["f", "a"].into_iter().collect();
        let sig = Signature::new();

        let tm1 = RTerm::parse("f a", &syms)?;
        let tm2 = RTerm::parse("f", &syms)?;
        assert!(!RTerm::convertible(tm1, tm2, &sig));
        Ok(())
    }
}
