//! Substitution and shifting for terms.

use crate::term::{Arg, DeBruijn, RTerm, Term};

impl RTerm {
    /// Apply a substitution to all variables under at least `k` binders.
    pub fn apply_subst<S>(self, subst: &S, k: usize) -> Self
    where
        S: Fn(DeBruijn, usize) -> RTerm,
    {
        let sub = |tm: RTerm| tm.apply_subst(subst, k);
        match &*self {
            Term::BVar(n) if *n >= k => return subst(*n, k),
            Term::Appl(f, x) => {
                let f2 = sub(f.clone());
                let x2 = sub(x.clone());
                if !f.ptr_eq(&f2) || !x.ptr_eq(&x2) {
                    return Self::new(Term::Appl(f2, x2));
                }
            }
            Term::Abst(arg, tm) => {
                let arg2 = Arg::new(arg.id.clone(), arg.ty.clone().map(&sub));
                let tm2 = tm.clone().apply_subst(subst, k + 1);
                if !arg.ptr_eq(&arg2) || !tm.ptr_eq(&tm2) {
                    return Self::new(Term::Abst(arg2, tm2));
                }
            }
            Term::Prod(arg, tm) => {
                let arg2 = Arg::new(arg.id.clone(), arg.ty.clone().map(&sub));
                let tm2 = tm.clone().apply_subst(subst, k + 1);
                if !arg.ptr_eq(&arg2) || !tm.ptr_eq(&tm2) {
                    return Self::new(Term::Prod(arg2, tm2));
                }
            }
            Term::Meta(m, env) => {
                let env2: Vec<_> = env.iter().cloned().map(&sub).collect();
                if !env.iter().zip(env2.iter()).all(|(t, t2)| t.ptr_eq(t2)) {
                    return Self::new(Term::Meta(m.clone(), env2));
                }
            }
            _ => (),
        };
        self
    }

    /// Substitute the variable bound directly over the term.
    pub fn subst(self, u: &RTerm) -> Self {
        self.apply_subst(&psubst_single(u), 0)
    }

    /// Substitute the `args.len()` variables bound directly over the term,
    /// where `args[0]` replaces the outermost bound variable.
    pub fn subst_many(self, args: &[RTerm]) -> Self {
        if args.is_empty() {
            self
        } else {
            self.apply_subst(&psubst_many(args), 0)
        }
    }
}

fn psubst_single<'a>(u: &'a RTerm) -> impl Fn(DeBruijn, usize) -> RTerm + 'a {
    move |n, k| {
        if n == k {
            u.clone() << k
        } else {
            RTerm::new(Term::BVar(n - 1))
        }
    }
}

fn psubst_many<'a>(args: &'a [RTerm]) -> impl Fn(DeBruijn, usize) -> RTerm + 'a {
    let arity = args.len();
    move |n, k| {
        let i = n - k;
        if i < arity {
            args[arity - 1 - i].clone() << k
        } else {
            RTerm::new(Term::BVar(n - arity))
        }
    }
}

/// Definition of `<<` for terms.
#[allow(clippy::suspicious_arithmetic_impl)]
impl core::ops::Shl<usize> for RTerm {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        if rhs == 0 {
            self
        } else {
            self.apply_subst(&|n, _k| RTerm::new(Term::BVar(n + rhs)), 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::term::{RTerm, Term};

    fn bvar(n: usize) -> RTerm {
        RTerm::new(Term::BVar(n))
    }

    #[test]
    fn beta() {
        // (λ x. x x) y ~ y y
        let body = RTerm::new(Term::Appl(bvar(0), bvar(0)));
        let reduct = body.subst(&bvar(7));
        assert_eq!(reduct, RTerm::new(Term::Appl(bvar(7), bvar(7))));
    }

    #[test]
    fn shift_under_binder() {
        // substituting under a binder shifts the substituted term
        let arg = crate::term::Arg::new("x".into(), None);
        let body = RTerm::new(Term::Abst(arg, bvar(1)));
        let reduct = body.subst(&bvar(3));
        match &*reduct {
            Term::Abst(_, tm) => assert_eq!(*tm, bvar(4)),
            _ => panic!("abstraction expected"),
        }
    }

    #[test]
    fn telescope() {
        // the first argument replaces the outermost bound variable
        let tm = RTerm::new(Term::Appl(bvar(1), bvar(0)));
        let args = [bvar(10), bvar(20)];
        let out = tm.subst_many(&args);
        assert_eq!(out, RTerm::new(Term::Appl(bvar(10), bvar(20))));
    }
}
