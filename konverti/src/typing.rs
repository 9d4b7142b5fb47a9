//! Type inference and type checking.

use crate::command::IntroType;
use crate::convertible::{convert, Constraint, Constraints};
use crate::error::TypingError as Error;
use crate::meta::Meta;
use crate::rule::Rule;
use crate::signature::Signature;
use crate::stack::Stack;
use crate::term::{RTerm, Term};

/// Typing of a newly introduced name.
pub struct Typing {
    pub typ: RTerm,
    pub term: Option<(RTerm, Check)>,
    pub rewritable: bool,
}

/// Have we assured that the term matches its type?
pub enum Check {
    Checked,
    Unchecked,
}

/// Map from de Bruijn indices to the types of the variables they denote.
pub type Context = Stack<RTerm>;

impl Context {
    fn get_type(&self, n: usize) -> Option<RTerm> {
        Some(self.get(n)?.clone() << (n + 1))
    }

    fn bind<A, F>(&mut self, arg: RTerm, f: F) -> Result<A, Error>
    where
        F: FnOnce(&mut Context) -> Result<A, Error>,
    {
        self.with_pushed(arg, f)
    }

    fn bind_of_type<A, F>(
        &mut self,
        sig: &Signature,
        cns: &mut Constraints,
        arg: RTerm,
        f: F,
    ) -> Result<A, Error>
    where
        F: FnOnce(&mut Context, &mut Constraints) -> Result<A, Error>,
    {
        let sort = arg.clone().infern(sig, self, cns)?;
        if convert(sort, RTerm::new(Term::Type), sig, cns) {
            self.with_pushed(arg, |ctx| f(ctx, cns))
        } else {
            Err(Error::BindNoType)
        }
    }
}

impl RTerm {
    /// Infer the type of a closed term.
    pub fn infer(&self, sig: &Signature) -> Result<RTerm, Error> {
        self.infern(sig, &mut Context::new(), &mut Constraints::inactive())
    }

    /// Check whether a closed term has the given type.
    pub fn check(&self, sig: &Signature, ty_exp: RTerm) -> Result<bool, Error> {
        self.checkn(sig, &mut Context::new(), ty_exp, &mut Constraints::inactive())
    }

    /// Infer the type of an open term using supplied types of bound variables.
    fn infern(
        &self,
        sig: &Signature,
        ctx: &mut Context,
        cns: &mut Constraints,
    ) -> Result<RTerm, Error> {
        debug!("infer type of {}", self);
        match &**self {
            Term::Kind => Err(Error::KindNotTypable),
            Term::Type => Ok(RTerm::new(Term::Kind)),
            Term::Symb(s) => sig.get_type(s).cloned().ok_or(Error::TypeNotFound),
            Term::BVar(x) => ctx.get_type(*x).ok_or(Error::TypeNotFound),
            // the type of an unknown is a fresh unknown
            Term::Meta(_, env) => Ok(RTerm::new(Term::Meta(Meta::fresh(), env.clone()))),
            Term::Appl(f, x) => {
                let ty = f.infern(sig, ctx, cns)?;
                match &*ty.whnf(sig) {
                    Term::Prod(arg, body) => {
                        let a = arg.ty.clone().ok_or(Error::ProductExpected)?;
                        if x.checkn(sig, ctx, a, cns)? {
                            Ok(body.clone().subst(x))
                        } else {
                            Err(Error::Unconvertible)
                        }
                    }
                    _ => Err(Error::ProductExpected),
                }
            }
            Term::Abst(arg, tm) => {
                let ty = arg.ty.clone().ok_or(Error::DomainFreeAbstraction)?;
                let tm_ty =
                    ctx.bind_of_type(sig, cns, ty, |ctx, cns| tm.infern(sig, ctx, cns))?;
                match &*tm_ty {
                    Term::Kind => Err(Error::UnexpectedKind),
                    _ => Ok(RTerm::new(Term::Prod(arg.clone(), tm_ty))),
                }
            }
            Term::Prod(arg, tm) => {
                let ty = arg.ty.clone().ok_or(Error::DomainFreeAbstraction)?;
                let tm_ty =
                    ctx.bind_of_type(sig, cns, ty, |ctx, cns| tm.infern(sig, ctx, cns))?;
                match &*tm_ty.clone().whnf(sig) {
                    Term::Kind | Term::Type => Ok(tm_ty),
                    _ => Err(Error::SortExpected),
                }
            }
            Term::FVar(_) | Term::Patt(_) | Term::Wild => Err(Error::TypeNotFound),
        }
    }

    /// Check whether an open term has the given type,
    /// using supplied types of bound variables.
    fn checkn(
        &self,
        sig: &Signature,
        ctx: &mut Context,
        ty_exp: RTerm,
        cns: &mut Constraints,
    ) -> Result<bool, Error> {
        debug!("check {} is of type {}", self, ty_exp);
        match &**self {
            // a joker checks against any type
            Term::Wild => Ok(true),
            Term::Abst(arg, tm) => match &*ty_exp.whnf(sig) {
                Term::Prod(ty_arg, ty_b) => {
                    let ty_a = ty_arg.ty.clone().ok_or(Error::ProductExpected)?;
                    // the domain annotation of the abstraction, if any, has to match
                    let ann = match &arg.ty {
                        None => true,
                        Some(ty) => {
                            let _ = ty.infern(sig, ctx, cns)?;
                            convert(ty.clone(), ty_a.clone(), sig, cns)
                        }
                    };
                    Ok(ann
                        && ctx.bind(ty_a, |ctx| tm.checkn(sig, ctx, ty_b.clone(), cns))?)
                }
                _ => Err(Error::ProductExpected),
            },
            _ => {
                let ty_inf = self.infern(sig, ctx, cns)?;
                debug!("checking convertibility: {} ~ {}", ty_inf, ty_exp);
                Ok(convert(ty_inf, ty_exp, sig, cns))
            }
        }
    }
}

impl Typing {
    pub fn declare(typ: RTerm, rewritable: bool, sig: &Signature) -> Result<Self, Error> {
        match &*typ.infer(sig)? {
            Term::Kind | Term::Type => Ok(Self {
                rewritable,
                typ,
                term: None,
            }),
            _ => Err(Error::SortExpected),
        }
    }

    pub fn define(
        oty: Option<RTerm>,
        term: RTerm,
        rewritable: bool,
        sig: &Signature,
    ) -> Result<Self, Error> {
        let (typ, check) = match oty {
            None => (term.infer(sig)?, Check::Checked),
            Some(ty) => {
                let _ = ty.infer(sig)?;
                (ty, Check::Unchecked)
            }
        };
        match &*typ {
            Term::Kind => Err(Error::UnexpectedKind),
            _ => Ok(Self {
                typ,
                term: Some((term, check)),
                rewritable,
            }),
        }
    }

    /// Verify, if not done before, that the term matches its type.
    pub fn check(mut self, sig: &Signature) -> Result<Self, Error> {
        match self.term.take() {
            Some((term, Check::Unchecked)) => {
                if term.check(sig, self.typ.clone())? {
                    self.term = Some((term, Check::Checked));
                    Ok(self)
                } else {
                    Err(Error::Unconvertible)
                }
            }
            term => {
                self.term = term;
                Ok(self)
            }
        }
    }

    pub fn intro(it: IntroType, sig: &Signature) -> Result<Self, Error> {
        match it {
            IntroType::Declaration(ty) => Self::declare(ty, false, sig),
            IntroType::Definition(oty, otm) => match (oty, otm) {
                (Some(ty), None) => Self::declare(ty, true, sig),
                (oty, Some(tm)) => Self::define(oty, tm, true, sig),
                (None, None) => Err(Error::TypeAndTermEmpty),
            },
            IntroType::Theorem(ty, tm) => Self::define(Some(ty), tm, false, sig),
        }
    }

    /// Check that a rewrite rule preserves typing.
    ///
    /// Context entries without type annotation receive
    /// a fresh metavariable as type, to be solved during checking.
    /// Comparisons that cannot be decided in the presence of
    /// pattern variables are postponed and returned to the caller.
    pub fn rewrite(rule: &Rule, sig: &Signature) -> Result<Vec<Constraint>, Error> {
        let mut cns = Constraints::active();
        let mut ctx = Context::new();
        for arg in &rule.ctx {
            let ty = match &arg.ty {
                Some(ty) => ty.clone(),
                None => RTerm::new(Term::Meta(Meta::fresh(), Vec::new())),
            };
            // pattern variables may also range over types, as in `[a: Type]`
            let sort = ty.infern(sig, &mut ctx, &mut cns)?;
            match &*sort.clone().whnf(sig) {
                Term::Kind | Term::Type => (),
                _ => {
                    if !convert(sort, RTerm::new(Term::Type), sig, &mut cns) {
                        return Err(Error::BindNoType);
                    }
                }
            }
            ctx.push(ty);
        }

        let lhs = RTerm::from(&rule.lhs);
        let lhs_ty = lhs.infern(sig, &mut ctx, &mut cns)?;
        debug!("check {} preserves type {}", rule, lhs_ty);
        if !rule.rhs.checkn(sig, &mut ctx, lhs_ty, &mut cns)? {
            return Err(Error::Unconvertible);
        }
        Ok(cns.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre::parse::Phrases;
    use crate::{Command, Symbols};

    fn load(cmds: &str, syms: &mut Symbols, sig: &mut Signature) -> Result<(), crate::Error> {
        for cmd in Phrases::new(cmds) {
            match Command::scope(cmd.unwrap(), syms)? {
                Command::Intro(id, it) => {
                    let typing = Typing::intro(it, sig)?.check(sig)?;
                    let sym = syms.insert(id)?;
                    sig.insert(&sym, typing)?;
                }
                Command::Rule(rule) => {
                    Typing::rewrite(&rule, sig)?;
                    sig.add_rule(rule)?;
                }
            }
        }
        Ok(())
    }

    const HOL: &str = r#"
        prop : Type.
        imp : prop -> prop -> prop.
        def proof : prop -> Type.
        [x: prop, y: prop] proof (imp x y) --> proof x -> proof y.
    "#;

    #[test]
    fn hol_theory() -> Result<(), crate::Error> {
        let mut syms = Symbols::new();
        let mut sig = Signature::new();
        load(HOL, &mut syms, &mut sig)?;
        let thm = "thm imp_refl (x : prop) : proof (imp x x) := p : proof x => p.";
        load(thm, &mut syms, &mut sig)
    }

    #[test]
    fn ill_typed_theorem() -> Result<(), crate::Error> {
        let mut syms = Symbols::new();
        let mut sig = Signature::new();
        load(HOL, &mut syms, &mut sig)?;
        let thm = "thm bad (x : prop) (y : prop) : proof (imp x y) := p : proof x => p.";
        assert!(load(thm, &mut syms, &mut sig).is_err());
        Ok(())
    }

    #[test]
    fn definition_unfolds() -> Result<(), crate::Error> {
        let mut syms = Symbols::new();
        let mut sig = Signature::new();
        load(HOL, &mut syms, &mut sig)?;
        load("a : prop.", &mut syms, &mut sig)?;
        load("def pp (x : prop) : prop := imp x x.", &mut syms, &mut sig)?;

        let tm1 = RTerm::parse("pp a", &syms)?;
        let tm2 = RTerm::parse("imp a a", &syms)?;
        assert!(RTerm::convertible(tm1, tm2, &sig));
        Ok(())
    }

    #[test]
    fn unannotated_rule_context() -> Result<(), crate::Error> {
        let mut syms = Symbols::new();
        let mut sig = Signature::new();
        load(
            r#"
            prop : Type.
            imp : prop -> prop -> prop.
            def proof : prop -> Type.
            "#,
            &mut syms,
            &mut sig,
        )?;

        // the types of x and y start out as metavariables and
        // are solved against the type of imp during checking
        let rule = crate::Rule::parse("[x, y] proof (imp x y) --> proof x -> proof y", &syms)?;
        let postponed = Typing::rewrite(&rule, &sig)?;
        assert!(postponed.is_empty());
        Ok(sig.add_rule(rule)?)
    }

    #[test]
    fn type_mismatch_is_postponed() -> Result<(), crate::Error> {
        let mut syms = Symbols::new();
        let mut sig = Signature::new();
        load(
            r#"
            nat : Type.
            bool : Type.
            def f : nat -> nat.
            g : bool -> bool.
            "#,
            &mut syms,
            &mut sig,
        )?;

        // the right-hand side does not preserve the type of the left-hand side;
        // in constraint mode, the mismatches are recorded rather than fatal
        let rule = crate::Rule::parse("[x: nat] f x --> g x", &syms)?;
        let postponed = Typing::rewrite(&rule, &sig)?;
        assert!(!postponed.is_empty());
        Ok(())
    }
}
