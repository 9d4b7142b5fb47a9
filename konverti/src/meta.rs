//! Metavariables and their solutions.

use crate::term::{RTerm, Term};
use core::cell::RefCell;
use core::fmt::{self, Display};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::rc::Rc;

/// Solution of a metavariable.
///
/// This is a binder over as many variables as
/// the environment of the metavariable instance has entries;
/// unfolding an instance substitutes the environment into the body.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub arity: usize,
    pub body: RTerm,
}

#[derive(Debug)]
struct Slot {
    key: usize,
    solution: RefCell<Option<Solution>>,
}

/// Shared metavariable with a stable key and a write-once solution.
#[derive(Clone, Debug)]
pub struct Meta(Rc<Slot>);

static META_KEY: AtomicUsize = AtomicUsize::new(0);

impl Meta {
    /// Create an unsolved metavariable with a key distinct from all previous ones.
    pub fn fresh() -> Self {
        let key = META_KEY.fetch_add(1, Ordering::Relaxed);
        let solution = RefCell::new(None);
        Self(Rc::new(Slot { key, solution }))
    }

    pub fn key(&self) -> usize {
        self.0.key
    }

    pub fn solution(&self) -> Option<Solution> {
        self.0.solution.borrow().clone()
    }

    pub fn is_solved(&self) -> bool {
        self.0.solution.borrow().is_some()
    }

    /// Write the solution of the metavariable. The solution is final.
    pub fn solve(&self, sol: Solution) {
        let mut slot = self.0.solution.borrow_mut();
        assert!(slot.is_none(), "metavariable {} solved twice", self);
        *slot = Some(sol);
    }
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Meta {}

impl Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "?{}", self.key())
    }
}

impl RTerm {
    /// Replace a solved metavariable instance at the root
    /// by the instantiation of its solution, repeatedly.
    pub fn unfold(&self) -> RTerm {
        let mut tm = self.clone();
        loop {
            let next = match &*tm {
                Term::Meta(m, env) => match m.solution() {
                    Some(sol) => sol.subst(env),
                    None => break,
                },
                _ => break,
            };
            tm = next;
        }
        tm
    }
}

impl Solution {
    /// Instantiate the solution with the environment of a metavariable instance.
    pub fn subst(&self, env: &[RTerm]) -> RTerm {
        assert_eq!(self.arity, env.len());
        self.body.clone().subst_many(env)
    }
}
