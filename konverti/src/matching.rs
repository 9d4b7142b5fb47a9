//! Pattern matching of rule left-hand sides against evaluator stacks.

use crate::bind::unbind2;
use crate::reduce::ArgCell;
use crate::rule::Rule;
use crate::signature::Signature;
use crate::stack::Stack;
use crate::term::{RTerm, Term};

/// Assignment of pattern slots to matched terms.
type Env = Vec<Option<RTerm>>;

impl Stack<ArgCell> {
    /// Determine whether the stack matches the rule's left-hand side.
    ///
    /// Return the instantiated right-hand side and
    /// the number of consumed stack arguments in case of a match.
    pub fn match_rule(&self, rule: &Rule, sig: &Signature) -> Option<(RTerm, usize)> {
        let arity = rule.arity();
        if self.len() < arity {
            // we do not have enough arguments on the stack to match against
            return None;
        }

        let slots = rule.ctx.len();
        let tags: Vec<RTerm> = (0..slots).map(|i| RTerm::new(Term::Patt(i))).collect();
        let mut env: Env = vec![None; slots];

        for (pat, cell) in rule.lhs.args.iter().zip(self.iter()) {
            let pat = pat.clone().subst_many(&tags);
            if !matching_arg(&mut env, &pat, cell, sig) {
                return None;
            }
        }

        // a slot matched by no pattern position makes the rule inapplicable
        let env: Option<Vec<RTerm>> = env.into_iter().collect();
        let rhs = rule.rhs.clone().subst_many(&env?);
        Some((rhs, arity))
    }
}

/// Match a pattern against a stack argument.
///
/// A fresh pattern slot captures the cell contents without evaluating them.
/// Any other pattern forces the cell, sharing the normalization
/// with all other consumers of the argument.
fn matching_arg(env: &mut Env, pat: &RTerm, cell: &ArgCell, sig: &Signature) -> bool {
    match &**pat {
        Term::Patt(i) if env[*i].is_none() => {
            env[*i] = Some(cell.get());
            true
        }
        Term::Wild => true,
        _ => {
            let tm = cell.force(sig);
            matching(env, pat, &tm, sig)
        }
    }
}

/// Match a pattern against a term in weak head normal form.
fn matching(env: &mut Env, pat: &RTerm, tm: &RTerm, sig: &Signature) -> bool {
    trace!("matching: {} ≟ {}", pat, tm);
    match (&**pat, &**tm) {
        (Term::Patt(i), _) => match &env[*i] {
            // a slot bound before has to be convertible with the new term
            Some(bound) => RTerm::convertible(bound.clone(), tm.clone(), sig),
            None => {
                env[*i] = Some(tm.clone());
                true
            }
        },
        (Term::Wild, _) => true,
        // an unsolved metavariable is matched by no rigid pattern
        (Term::Meta(_, _), _) | (_, Term::Meta(_, _)) => false,
        (Term::Appl(f1, x1), Term::Appl(f2, x2)) => {
            matching_sub(env, f1, f2, sig) && matching_sub(env, x1, x2, sig)
        }
        (Term::Abst(arg1, b1), Term::Abst(arg2, b2))
        | (Term::Prod(arg1, b1), Term::Prod(arg2, b2)) => {
            let doms = match (&arg1.ty, &arg2.ty) {
                (None, _) => true,
                (Some(ty1), Some(ty2)) => matching_sub(env, ty1, ty2, sig),
                (Some(_), None) => false,
            };
            let (_, b1, b2) = unbind2(&arg1.id, b1, b2);
            doms && matching_sub(env, &b1, &b2, sig)
        }
        (Term::Kind, Term::Kind) | (Term::Type, Term::Type) => true,
        (Term::FVar(v1), Term::FVar(v2)) => v1 == v2,
        (Term::Symb(s1), Term::Symb(s2)) => s1 == s2,
        _ => false,
    }
}

/// Match a pattern against a subterm that is not yet in weak head normal form.
fn matching_sub(env: &mut Env, pat: &RTerm, tm: &RTerm, sig: &Signature) -> bool {
    match &**pat {
        Term::Patt(i) if env[*i].is_none() => {
            env[*i] = Some(tm.clone());
            true
        }
        Term::Wild => true,
        _ => matching(env, pat, &tm.clone().whnf(sig), sig),
    }
}

#[cfg(test)]
mod tests {
    use crate::signature::Signature;
    use crate::term::{RTerm, Term};
    use crate::{Rule, Symbols};

    fn contains_tag(tm: &RTerm) -> bool {
        match &**tm {
            Term::Patt(_) => true,
            Term::Appl(f, x) => contains_tag(f) || contains_tag(x),
            Term::Abst(arg, b) | Term::Prod(arg, b) => {
                arg.ty.as_ref().map_or(false, contains_tag) || contains_tag(b)
            }
            Term::Meta(_, env) => env.iter().any(contains_tag),
            _ => false,
        }
    }

    #[test]
    fn nonlinear() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["bool", "eq", "yes", "a", "b"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "eq").unwrap(), Vec::new());

        let rule = Rule::parse("[x: bool] eq x x --> yes", &syms)?;
        sig.add_rule(rule)?;

        let same = RTerm::parse("eq a a", &syms)?;
        assert_eq!(same.whnf(&sig), RTerm::parse("yes", &syms)?);

        // distinct arguments leave the application stuck
        let diff = RTerm::parse("eq a b", &syms)?;
        assert_eq!(diff.clone().whnf(&sig), diff);
        Ok(())
    }

    #[test]
    fn joker() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["fst", "a", "b"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "fst").unwrap(), Vec::new());

        let rule = Rule::parse("[x] fst x _ --> x", &syms)?;
        sig.add_rule(rule)?;

        let tm = RTerm::parse("fst a b", &syms)?;
        assert_eq!(tm.whnf(&sig), RTerm::parse("a", &syms)?);
        Ok(())
    }

    #[test]
    fn tags_do_not_escape() -> Result<(), crate::Error> {
        let syms: Symbols = vec!["prop", "imp", "proof", "a", "b"].into_iter().collect();
        let mut sig = Signature::new();
        sig.rules.insert(syms.get(&[], "proof").unwrap(), Vec::new());

        let rule = Rule::parse("[x: prop, y: prop] proof (imp x y) --> proof x -> proof y", &syms)?;
        sig.add_rule(rule)?;

        let tm = RTerm::parse("proof (imp a b)", &syms)?;
        assert!(!contains_tag(&tm.whnf(&sig)));
        Ok(())
    }
}
