//! Opening and closing of binders.
//!
//! Bound variables are de Bruijn indices.
//! Whenever reduction or conversion has to look under a binder,
//! it opens the binder by substituting a fresh free variable,
//! so indices never leak out of their scope.

use crate::meta::Solution;
use crate::term::{Arg, RTerm, Term, Var};
use std::rc::Rc;

/// Open a binder body, substituting its bound variable with a fresh variable.
pub fn unbind(id: &Rc<str>, tm: &RTerm) -> (Var, RTerm) {
    let v = Var::fresh(id.clone());
    let body = tm.clone().subst(&RTerm::new(Term::FVar(v.clone())));
    (v, body)
}

/// Open two binder bodies with one shared fresh variable.
///
/// This is the workhorse of structural comparison under binders.
pub fn unbind2(id: &Rc<str>, tm1: &RTerm, tm2: &RTerm) -> (Var, RTerm, RTerm) {
    let v = Var::fresh(id.clone());
    let fv = RTerm::new(Term::FVar(v.clone()));
    let body1 = tm1.clone().subst(&fv);
    let body2 = tm2.clone().subst(&fv);
    (v, body1, body2)
}

/// Bind the given free variables in a term, yielding a multiple binder
/// in which `vars[0]` becomes the outermost bound variable.
///
/// The second component tells whether the result is closed, i.e. whether
/// the term contains no free variables beside the given ones.
pub fn bind_many(vars: &[Var], tm: &RTerm) -> (Solution, bool) {
    let mut closed = true;
    let body = bind(vars, tm, 0, &mut closed);
    let arity = vars.len();
    (Solution { arity, body }, closed)
}

fn bind(vars: &[Var], tm: &RTerm, k: usize, closed: &mut bool) -> RTerm {
    match &**tm {
        Term::FVar(v) => match vars.iter().position(|w| w == v) {
            Some(j) => RTerm::new(Term::BVar(k + vars.len() - 1 - j)),
            None => {
                *closed = false;
                tm.clone()
            }
        },
        Term::Appl(f, x) => {
            let f = bind(vars, f, k, closed);
            let x = bind(vars, x, k, closed);
            RTerm::new(Term::Appl(f, x))
        }
        Term::Abst(arg, b) => {
            let ty = arg.ty.as_ref().map(|ty| bind(vars, ty, k, closed));
            let b = bind(vars, b, k + 1, closed);
            RTerm::new(Term::Abst(Arg::new(arg.id.clone(), ty), b))
        }
        Term::Prod(arg, b) => {
            let ty = arg.ty.as_ref().map(|ty| bind(vars, ty, k, closed));
            let b = bind(vars, b, k + 1, closed);
            RTerm::new(Term::Prod(Arg::new(arg.id.clone(), ty), b))
        }
        Term::Meta(m, env) => {
            let env = env.iter().map(|t| bind(vars, t, k, closed)).collect();
            RTerm::new(Term::Meta(m.clone(), env))
        }
        _ => tm.clone(),
    }
}

impl RTerm {
    /// Return true if the term contains no free variables.
    pub fn is_closed(&self) -> bool {
        match &**self {
            Term::FVar(_) => false,
            Term::Appl(f, x) => f.is_closed() && x.is_closed(),
            Term::Abst(arg, b) | Term::Prod(arg, b) => {
                arg.ty.as_ref().map_or(true, Self::is_closed) && b.is_closed()
            }
            Term::Meta(_, env) => env.iter().all(Self::is_closed),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbind_bind() {
        let id: Rc<str> = "x".into();
        // body of λ x. Type x
        let c = RTerm::new(Term::Type);
        let body = RTerm::new(Term::Appl(c, RTerm::new(Term::BVar(0))));
        let (v, opened) = unbind(&id, &body);
        assert!(!opened.is_closed());

        let (sol, closed) = bind_many(&[v], &opened);
        assert!(closed);
        assert_eq!(sol.arity, 1);
        assert_eq!(sol.body, body);
    }

    #[test]
    fn escaping_variable() {
        let id: Rc<str> = "x".into();
        let (v, _) = unbind(&id, &RTerm::new(Term::BVar(0)));
        let (w, _) = unbind(&id, &RTerm::new(Term::BVar(0)));
        let tm = RTerm::new(Term::FVar(w));
        let (_, closed) = bind_many(&[v], &tm);
        assert!(!closed);
    }
}
