//! Unscoped structures, as produced by the parser.

pub mod command;
pub mod parse;
pub mod rule;
pub mod term;

pub use command::{Command, GIntroType, IntroType};
pub use rule::Rule;
pub use term::{Arg, Binder, Symb, Term};
