#![forbid(unsafe_code)]

//! Type checking for the lambda-Pi calculus modulo rewriting.
//!
//! This library provides a kernel that
//! represents terms with explicit binders,
//! computes weak head normal forms under β-reduction and
//! a user-extensible set of rewrite rules,
//! decides convertibility of terms modulo that rewrite relation, and
//! instantiates metavariables by pattern unification.
//!
//! # Usage
//!
//! Users communicate with the kernel using *commands*.
//! A command either
//! introduces a new name (by declaration, definition, or theorem), or
//! adds a rewrite rule.
//! The state of a typechecking session consists of
//! a [`Symbols`] table, keeping track of all previously introduced names, and
//! a [`Signature`], recording types and rewrite rules attached to symbols.
//!
//! How is a user command processed?
//! A command is parsed from a string to yield a [`pre::Command`], then
//! scoped against the [`Symbols`] table to yield a [`Command`],
//! replacing names by shared symbols and bound variables by indices.
//! In case of a name introduction,
//! we verify that the given types and terms are valid, yielding a [`Typing`],
//! and record the typing in the signature.
//! In case of a rewrite rule,
//! we check that the rule preserves types and add it to the signature.
//!
//! The following example parses a few commands and executes them.
//! (By the way, this example, just as all other code examples in this library,
//! can be executed by running `cargo test`.)
//!
//! ~~~
//! use konverti::{pre, Command, Error, Signature, Symbols, Typing};
//!
//! let cmds = r#"
//!     (; declarations ;)
//!     prop : Type.
//!     imp : prop -> prop -> prop.
//!
//!     (; definition with a rewrite rule ;)
//!     def proof : prop -> Type.
//!     [x: prop, y: prop] proof (imp x y) --> proof x -> proof y.
//!
//!     (; theorem ;)
//!     thm imp_refl (x : prop) : proof (imp x x) := p : proof x => p.
//! "#;
//!
//! let mut syms = Symbols::new();
//! let mut sig = Signature::new();
//!
//! for cmd in pre::parse::Phrases::new(cmds) {
//!     // match constants in the command to previously introduced constants
//!     match Command::scope(cmd.unwrap(), &syms)? {
//!         // introduction of a new name
//!         Command::Intro(id, it) => {
//!             // verify types and terms, then register the symbol
//!             let typing = Typing::intro(it, &sig)?.check(&sig)?;
//!             let sym = syms.insert(id)?;
//!             sig.insert(&sym, typing)?;
//!         }
//!         // addition of a rewrite rule
//!         Command::Rule(rule) => {
//!             let _postponed = Typing::rewrite(&rule, &sig)?;
//!             sig.add_rule(rule)?;
//!         }
//!     }
//! }
//! # Ok::<_, Error>(())
//! ~~~

#[macro_use]
extern crate log;

pub mod bind;
mod command;
pub mod convertible;
pub mod error;
mod fmt;
mod matching;
pub mod meta;
pub mod pre;
pub mod reduce;
mod rule;
mod scope;
mod signature;
pub mod stack;
mod subst;
mod symbol;
mod symbols;
mod term;
pub mod typing;
pub mod unify;

pub use command::{Command, IntroType};
pub use error::Error;
pub use meta::Meta;
pub use rule::{Rule, TopPattern};
pub use signature::Signature;
pub use symbol::Symbol;
pub use symbols::Symbols;
pub use term::{Arg, RTerm, Term, Var};
pub use typing::Typing;

use pre::parse::parse;

impl RTerm {
    /// Parse a term and scope it. Used for testing.
    ///
    /// ~~~
    /// # use konverti::{Error, RTerm, Symbols};
    /// let syms: Symbols = vec!["A"].into_iter().collect();
    /// let tm = RTerm::parse("x : A => x", &syms)?;
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn parse(i: &str, syms: &Symbols) -> Result<Self, Error> {
        Ok(Self::scope(parse::<pre::Term>(i)?, syms)?)
    }
}

impl Rule {
    /// Parse a rule and scope it. Used for testing.
    pub fn parse(i: &str, syms: &Symbols) -> Result<Self, Error> {
        Ok(Self::scope(parse::<pre::Rule>(i)?, syms)?)
    }
}

impl Command {
    /// Parse a command and scope it. Used for testing.
    pub fn parse(i: &str, syms: &Symbols) -> Result<Self, Error> {
        Ok(Self::scope(parse::<pre::Command>(i)?, syms)?)
    }
}
