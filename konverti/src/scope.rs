//! Conversion from preterms to terms, from prerules to rules etc.

use crate::command::{Command, IntroType};
use crate::error::ScopeError as Error;
use crate::pre;
use crate::rule::{Rule, TopPattern};
use crate::stack::Stack;
use crate::symbols::Symbols;
use crate::term::{Arg, RTerm, Term};

type Bound = Stack<String>;

impl RTerm {
    /// Scope an open preterm using supplied bound variables.
    fn scopen(tm: pre::Term, syms: &Symbols, bnd: &mut Bound) -> Result<Self, Error> {
        match tm {
            pre::Term::Symb(s) => {
                if s.path.is_empty() {
                    if s.name == "_" {
                        return Err(Error::Underscore);
                    }
                    if s.name == "Type" {
                        return Ok(Self::new(Term::Type));
                    }
                    if let Some(idx) = bnd.iter().position(|id| *id == s.name) {
                        return Ok(Self::new(Term::BVar(idx)));
                    }
                }
                let sym = syms
                    .get(&s.path, &s.name)
                    .ok_or(Error::UndeclaredSymbol(s.name))?;
                Ok(Self::new(Term::Symb(sym)))
            }
            pre::Term::Appl(head, tail) => {
                let head = Self::scopen(*head, syms, bnd)?;
                let tail: Result<Vec<_>, _> = tail
                    .into_iter()
                    .map(|tm| Self::scopen(tm, syms, bnd))
                    .collect();
                Ok(head.apply(tail?))
            }
            pre::Term::Bind(binder, arg, tm) => {
                let ty = arg.ty.map(|ty| Self::scopen(*ty, syms, bnd)).transpose()?;
                let arg2 = Arg::new(arg.id.as_str().into(), ty);
                bnd.with_pushed(arg.id, |bnd| {
                    let tm = Self::scopen(*tm, syms, bnd)?;
                    match binder {
                        pre::Binder::Lam => Ok(Self::new(Term::Abst(arg2, tm))),
                        pre::Binder::Pi => Ok(Self::new(Term::Prod(arg2, tm))),
                    }
                })
            }
        }
    }

    /// Scope an open preterm occurring in a rule left-hand side.
    ///
    /// In contrast to ordinary terms, an underscore is accepted here;
    /// it matches any argument without recording a binding.
    fn scopen_pattern(tm: pre::Term, syms: &Symbols, bnd: &mut Bound) -> Result<Self, Error> {
        match tm {
            pre::Term::Symb(s) if s.path.is_empty() && s.name == "_" => {
                Ok(Self::new(Term::Wild))
            }
            pre::Term::Appl(head, tail) => {
                let head = Self::scopen_pattern(*head, syms, bnd)?;
                let tail: Result<Vec<_>, _> = tail
                    .into_iter()
                    .map(|tm| Self::scopen_pattern(tm, syms, bnd))
                    .collect();
                Ok(head.apply(tail?))
            }
            pre::Term::Bind(binder, arg, tm) => {
                let ty = arg
                    .ty
                    .map(|ty| Self::scopen_pattern(*ty, syms, bnd))
                    .transpose()?;
                let arg2 = Arg::new(arg.id.as_str().into(), ty);
                bnd.with_pushed(arg.id, |bnd| {
                    let tm = Self::scopen_pattern(*tm, syms, bnd)?;
                    match binder {
                        pre::Binder::Lam => Ok(Self::new(Term::Abst(arg2, tm))),
                        pre::Binder::Pi => Ok(Self::new(Term::Prod(arg2, tm))),
                    }
                })
            }
            _ => Self::scopen(tm, syms, bnd),
        }
    }

    /// Scope a closed term.
    pub fn scope(tm: pre::Term, syms: &Symbols) -> Result<Self, Error> {
        Self::scopen(tm, syms, &mut Bound::new())
    }
}

/// Decompose a term into a symbol applied to arguments.
fn top_pattern(tm: RTerm) -> Result<TopPattern, Error> {
    let mut args = Vec::new();
    let mut head = tm;
    loop {
        head = match &*head {
            Term::Appl(f, x) => {
                args.push(x.clone());
                f.clone()
            }
            Term::Symb(s) => {
                args.reverse();
                let symbol = s.clone();
                return Ok(TopPattern { symbol, args });
            }
            _ => return Err(Error::NoTopPattern),
        };
    }
}

impl Rule {
    pub fn scope(rule: pre::Rule, syms: &Symbols) -> Result<Self, Error> {
        let mut bnd = Bound::new();
        let mut ctx = Vec::new();
        for arg in rule.ctx {
            // a context annotation may mention the variables bound before it
            let ty = arg.ty.map(|ty| RTerm::scopen(*ty, syms, &mut bnd)).transpose()?;
            ctx.push(Arg::new(arg.id.as_str().into(), ty));
            bnd.push(arg.id);
        }
        let lhs = top_pattern(RTerm::scopen_pattern(rule.lhs, syms, &mut bnd)?)?;
        let rhs = RTerm::scopen(rule.rhs, syms, &mut bnd)?;
        Ok(Self { ctx, lhs, rhs })
    }
}

impl IntroType {
    pub fn scope(it: pre::IntroType, syms: &Symbols) -> Result<Self, Error> {
        it.map_type_err(|tm| RTerm::scope(*tm, syms))?
            .map_term_err(|tm| RTerm::scope(*tm, syms))
    }
}

impl Command {
    pub fn scope(cmd: pre::Command, syms: &Symbols) -> Result<Self, Error> {
        match cmd {
            pre::Command::Intro(id, args, it) => {
                let it = IntroType::scope(it.parametrise(args), syms)?;
                Ok(Self::Intro(id, it))
            }
            pre::Command::Rule(prerule) => Ok(Self::Rule(Rule::scope(prerule, syms)?)),
        }
    }
}
