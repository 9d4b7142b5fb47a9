//! Instantiation of metavariables.

use crate::bind::bind_many;
use crate::meta::Meta;
use crate::term::{RTerm, Term, Var};

/// Try to solve `meta[env] = tm`.
///
/// This succeeds only if
/// the metavariable does not occur in the term,
/// the environment is a list of distinct variables
/// (the pattern fragment due to Miller), and
/// every free variable of the term occurs in the environment.
/// On success, the solution of the metavariable is set; it is final.
///
/// Reference:
/// Dale Miller:
/// A Logic Programming Language with Lambda-Abstraction,
/// Function Variables, and Simple Unification.
/// J. Log. Comput. 1(4): 497-536 (1991).
/// doi: [10.1093/logcom/1.4.497](https://doi.org/10.1093/logcom/1.4.497)
pub fn unify(meta: &Meta, env: &[RTerm], tm: &RTerm) -> bool {
    assert!(!meta.is_solved(), "instantiation of a solved metavariable");
    trace!("unify: {} =? {}", meta, tm);

    if occurs(meta, tm) {
        trace!("unify: {} occurs in the solution", meta);
        return false;
    }

    let mut vars: Vec<Var> = Vec::with_capacity(env.len());
    for e in env {
        match &*e.unfold() {
            Term::FVar(v) if !vars.contains(v) => vars.push(v.clone()),
            _ => return false,
        }
    }

    let (sol, closed) = bind_many(&vars, tm);
    if !closed {
        trace!("unify: a free variable of the solution escapes {}", meta);
        return false;
    }

    meta.solve(sol);
    true
}

/// Return true if the metavariable occurs in the term,
/// looking through the solutions of other metavariables.
fn occurs(meta: &Meta, tm: &RTerm) -> bool {
    match &**tm {
        Term::Meta(m, env) => {
            m == meta
                || m.solution().map_or(false, |sol| occurs(meta, &sol.body))
                || env.iter().any(|e| occurs(meta, e))
        }
        Term::Appl(f, x) => occurs(meta, f) || occurs(meta, x),
        Term::Abst(arg, b) | Term::Prod(arg, b) => {
            arg.ty.as_ref().map_or(false, |ty| occurs(meta, ty)) || occurs(meta, b)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;
    use crate::Symbols;

    fn fvar(name: &str) -> (Var, RTerm) {
        let v = Var::fresh(name.into());
        let tm = RTerm::new(Term::FVar(v.clone()));
        (v, tm)
    }

    #[test]
    fn solve_under_environment() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["eq", "a", "b"].into_iter().collect();
        let sig = Signature::new();

        let (_, x) = fvar("x");
        let (_, y) = fvar("y");
        let u = Meta::fresh();
        let eq = RTerm::parse("eq", &syms)?;
        let a = RTerm::parse("a", &syms)?;
        let b = RTerm::parse("b", &syms)?;

        // u[x, y] = eq a x y
        let env = [x.clone(), y.clone()];
        let sol = eq.clone().apply([a.clone(), x, y]);
        assert!(unify(&u, &env, &sol));

        // afterwards, u[a, b] unfolds to eq a a b
        let inst = RTerm::new(Term::Meta(u, Vec::from([a.clone(), b.clone()])));
        assert_eq!(inst.whnf(&sig), eq.apply([a.clone(), a, b]));
        Ok(())
    }

    #[test]
    fn occurs_check() {
        let (_, f) = fvar("f");
        let u = Meta::fresh();
        let inner = RTerm::new(Term::Meta(u.clone(), Vec::new()));
        let tm = RTerm::new(Term::Appl(f, inner));
        assert!(!unify(&u, &[], &tm));
        assert!(!u.is_solved());
    }

    #[test]
    fn environment_must_be_variables() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["a"].into_iter().collect();
        let a = RTerm::parse("a", &syms)?;
        let u = Meta::fresh();
        assert!(!unify(&u, &[a.clone()], &a));
        assert!(!u.is_solved());
        Ok(())
    }

    #[test]
    fn scope_check() {
        let (_, x) = fvar("x");
        let (_, y) = fvar("y");
        let u = Meta::fresh();
        // y is not in the environment of u
        assert!(!unify(&u, &[x], &y));
        assert!(!u.is_solved());
    }

    #[test]
    fn syntactic_equality_solves() -> Result<(), crate::Error> {
        use crate::convertible::eq_syntax;
        let syms: Symbols = vec!["a"].into_iter().collect();
        let a = RTerm::parse("a", &syms)?;
        let u = Meta::fresh();
        let inst = RTerm::new(Term::Meta(u.clone(), Vec::new()));
        assert!(eq_syntax(&inst, &a));
        assert!(u.is_solved());
        assert!(eq_syntax(&inst, &a));
        Ok(())
    }
}
