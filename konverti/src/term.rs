//! Terms for the lambda-Pi calculus.

use crate::fmt::application as fmt_appl;
use crate::meta::Meta;
use crate::symbol::Symbol;
use core::fmt::{self, Display};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::rc::Rc;

/// De Bruijn variable.
pub type DeBruijn = usize;

/// Pattern slot of a rewrite rule, instantiated during matching.
pub type Tag = usize;

/// Free variable minted by opening a binder.
///
/// Every variable carries a globally unique identifier;
/// the name serves only for printing.
#[derive(Clone, Debug)]
pub struct Var {
    id: usize,
    name: Rc<str>,
}

static VAR_ID: AtomicUsize = AtomicUsize::new(0);

impl Var {
    /// Create a variable distinct from all previously created ones.
    pub fn fresh(name: Rc<str>) -> Self {
        let id = VAR_ID.fetch_add(1, Ordering::Relaxed);
        Self { id, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

/// Argument of a binder.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub id: Rc<str>,
    pub ty: Option<RTerm>,
}

impl Arg {
    pub fn new(id: Rc<str>, ty: Option<RTerm>) -> Self {
        Self { id, ty }
    }

    /// Compare the memory addresses of the argument types.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self.ty.as_ref(), other.ty.as_ref()) {
            (None, None) => true,
            (Some(ty1), Some(ty2)) => RTerm::ptr_eq(ty1, ty2),
            _ => false,
        }
    }
}

/// Term for the lambda-Pi calculus.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Kind,
    Type,
    Symb(Symbol),
    BVar(DeBruijn),
    FVar(Var),
    Appl(RTerm, RTerm),
    Abst(Arg, RTerm),
    Prod(Arg, RTerm),
    Meta(Meta, Vec<RTerm>),
    Patt(Tag),
    Wild,
}

/// Pointer to a shared term.
#[derive(Clone, Debug, PartialEq)]
pub struct RTerm(Rc<Term>);

impl RTerm {
    /// Create a term pointer from a term.
    pub fn new(t: Term) -> Self {
        Self(Rc::new(t))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Apply some terms to the term, from left to right.
    pub fn apply<I>(self, args: I) -> Self
    where
        I: IntoIterator<Item = RTerm>,
    {
        args.into_iter()
            .fold(self, |acc, arg| Self::new(Term::Appl(acc, arg)))
    }
}

impl core::ops::Deref for RTerm {
    type Target = Term;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Term> for RTerm {
    fn from(t: Term) -> Self {
        Self::new(t)
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ty.as_ref() {
            None => write!(f, "{}", self.id),
            Some(ty) => write!(f, "{} : {}", self.id, ty),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Kind => write!(f, "Kind"),
            Self::Type => write!(f, "Type"),
            Self::Symb(s) => s.fmt(f),
            Self::BVar(x) => write!(f, "β{}", x),
            Self::FVar(v) => v.fmt(f),
            Self::Appl(_, _) => {
                let mut head = self;
                let mut args = Vec::new();
                while let Self::Appl(fun, arg) = head {
                    args.push(arg);
                    head = &**fun;
                }
                args.reverse();
                fmt_appl(&head, &args, f)
            }
            Self::Abst(arg, tm) => write!(f, "(λ {}. {})", arg, tm),
            Self::Prod(arg, tm) => write!(f, "(Π {}. {})", arg, tm),
            Self::Meta(m, env) => {
                write!(f, "{}", m)?;
                if !env.is_empty() {
                    write!(f, "[")?;
                    for (i, t) in env.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        t.fmt(f)?;
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            Self::Patt(m) => write!(f, "μ{}", m),
            Self::Wild => write!(f, "_"),
        }
    }
}

impl Display for RTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (**self).fmt(f)
    }
}
