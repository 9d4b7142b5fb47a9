//! Unscoped signature-changing commands.

use super::term::{Arg, BTerm, Term};
use super::Rule;

/// Generalised way of introducing a new name.
#[derive(Clone, Debug)]
pub enum GIntroType<Ty, Tm> {
    Declaration(Ty),
    Definition(Option<Ty>, Option<Tm>),
    Theorem(Ty, Tm),
}

pub type IntroType = GIntroType<BTerm, BTerm>;

impl<Ty, Tm> GIntroType<Ty, Tm> {
    /// Does the introduction admit the later addition of rewrite rules?
    pub fn rewritable(&self) -> bool {
        matches!(self, Self::Definition(_, _))
    }

    pub fn map_type_err<F, Ty2, E>(self, f: F) -> Result<GIntroType<Ty2, Tm>, E>
    where
        F: FnOnce(Ty) -> Result<Ty2, E>,
    {
        use GIntroType::*;
        match self {
            Declaration(ty) => Ok(Declaration(f(ty)?)),
            Definition(ty, tm) => Ok(Definition(ty.map(f).transpose()?, tm)),
            Theorem(ty, tm) => Ok(Theorem(f(ty)?, tm)),
        }
    }

    pub fn map_term_err<F, Tm2, E>(self, f: F) -> Result<GIntroType<Ty, Tm2>, E>
    where
        F: FnOnce(Tm) -> Result<Tm2, E>,
    {
        use GIntroType::*;
        match self {
            Declaration(ty) => Ok(Declaration(ty)),
            Definition(ty, tm) => Ok(Definition(ty, tm.map(f).transpose()?)),
            Theorem(ty, tm) => Ok(Theorem(ty, f(tm)?)),
        }
    }
}

impl IntroType {
    /// Distribute the arguments of an introduction over its types and terms.
    ///
    /// For example, in the definition `f (x : A) : B := t`,
    /// the argument `(x : A)` turns the definition into
    /// `f : ! x : A -> B := x : A => t`.
    pub fn parametrise(self, args: Vec<Arg>) -> Self {
        use GIntroType::*;
        let prods = |ty: BTerm, args: Vec<Arg>| Box::new(Term::prods(*ty, args));
        let absts = |tm: BTerm, args: Vec<Arg>| Box::new(Term::absts(*tm, args));
        match self {
            Declaration(ty) => Declaration(prods(ty, args)),
            Definition(ty, tm) => Definition(
                ty.map(|ty| prods(ty, args.clone())),
                tm.map(|tm| absts(tm, args)),
            ),
            Theorem(ty, tm) => Theorem(prods(ty, args.clone()), absts(tm, args)),
        }
    }
}

/// Unscoped signature-changing command.
///
/// In contrast to its scoped counterpart,
/// a `pre::Command` holds arguments for definitions and declarations.
#[derive(Clone, Debug)]
pub enum Command {
    /// Introduce a new name
    Intro(String, Vec<Arg>, IntroType),
    /// Add a rewrite rule
    Rule(Rule),
}
