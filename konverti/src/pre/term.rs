//! Unscoped terms, not distinguishing bound variables and symbols.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binder {
    Lam,
    Pi,
}

/// Argument of a binder.
/// For example, the `x` and `A` in the term `x : A => t`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg {
    pub id: String,
    pub ty: Option<BTerm>,
}

/// Possibly qualified identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symb {
    pub path: Vec<String>,
    pub name: String,
}

impl Symb {
    pub fn local(name: String) -> Self {
        let path = Vec::new();
        Self { path, name }
    }
}

pub type BTerm = Box<Term>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Symb(Symb),
    Appl(BTerm, Vec<Term>),
    Bind(Binder, Arg, BTerm),
}

impl Term {
    fn bind_many(self, binders: Vec<(Binder, Arg)>) -> Self {
        binders.into_iter().rev().fold(self, |acc, (binder, arg)| {
            Self::Bind(binder, arg, Box::new(acc))
        })
    }

    pub fn absts(self, args: Vec<Arg>) -> Self {
        self.bind_many(args.into_iter().map(|arg| (Binder::Lam, arg)).collect())
    }

    pub fn prods(self, args: Vec<Arg>) -> Self {
        self.bind_many(args.into_iter().map(|arg| (Binder::Pi, arg)).collect())
    }

    pub fn apply(mut self, mut args: Vec<Self>) -> Self {
        if args.is_empty() {
            self
        } else {
            match self {
                Self::Appl(_, ref mut args1) => {
                    args1.append(&mut args);
                    self
                }
                _ => Self::Appl(Box::new(self), args),
            }
        }
    }
}
