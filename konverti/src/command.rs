//! Scoped signature-changing commands.

use crate::rule::Rule;
use crate::term::RTerm;

/// The way a new name is introduced.
pub type IntroType = crate::pre::GIntroType<RTerm, RTerm>;

/// Scoped signature-changing command.
#[derive(Clone)]
pub enum Command {
    /// Introduce a new name
    Intro(String, IntroType),
    /// Add a rewrite rule
    Rule(Rule),
}
