//! Parsers for prestructures.
//!
//! All basic parsers operate on byte slices (`&[u8]`) instead of strings.
//!
//! The parsers for all primitives in this file assume that
//! they are being given input that has been lexed;
//! that is, leading whitespace has been removed.
//! This has a few practical implications:
//!
//! * If a parser consists of a sequence of other parsers,
//!   then it has to lex every parser in that sequence except the first.
//! * If a parser consists of an alternative of parsers `alt(p1, ..., pn)`,
//!   then its lexed version should be
//!   the lexed alternative of parsers `lexeme(alt(p1, ..., pn))` instead of
//!   the alternative of lexed parsers `alt(lexeme(p1), ..., lexeme(pn))`.
//!   This avoids redoing the lexing for all alternatives.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while1},
    character::complete::{char, multispace0, multispace1, one_of},
    character::is_alphanumeric,
    combinator::{map, opt, recognize},
    error::VerboseError,
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use super::command::{Command, GIntroType};
use super::term::{Arg, BTerm, Binder, Symb, Term};
use super::Rule;

/// Result of a parser.
pub type Parse<'a, A> = IResult<&'a [u8], A, VerboseError<&'a [u8]>>;

/// A trait similar to `FromStr`, but for byte slices instead of strings.
pub trait Parser: Sized {
    fn parse(i: &[u8]) -> Parse<Self>;
}

/// Parse a string and discard remaining input.
///
/// ~~~
/// # use konverti::pre::parse::parse;
/// # use konverti::pre::Term;
/// assert!(parse::<Term>("fst x y").is_ok());
/// assert!(parse::<Term>(" (;lexed;) fst x y").is_ok());
/// ~~~
pub fn parse<'a, P: Parser>(i: &'a str) -> Result<P, nom::Err<VerboseError<&'a [u8]>>> {
    lexeme(P::parse)(i.as_bytes()).map(|(_i, o)| o)
}

/// Parse arbitrary nesting of strings delimited by non-empty start and end tags.
pub fn nested<'a>(start: &'a [u8], end: &'a [u8]) -> impl Fn(&'a [u8]) -> Parse<'a, &'a [u8]> {
    move |i| recognize(pair(tag(start), nested_post(start, end)))(i)
}

fn nested_post<'a>(start: &'a [u8], end: &'a [u8]) -> impl Fn(&'a [u8]) -> Parse<'a, &'a [u8]> {
    move |i: &'a [u8]| {
        let begins = [start[0], end[0]];
        let result = recognize(pair(
            // first, we read until we see either the begin of start or end
            opt(is_not(&begins[..])),
            alt((
                // if we then recognize the end, we are done
                tag(end),
                // otherwise, we assume that we got either
                // a new nesting or a stray character corresponding to a beginning
                recognize(pair(
                    alt((nested(start, end), recognize(one_of(&begins[..])))),
                    nested_post(start, end),
                )),
            )),
        ))(i);
        result
    }
}

/// Parse a (potentially nested) comment.
///
/// ~~~
/// # use konverti::pre::parse::comment;
/// assert!(comment(b"(; ;)").is_ok());
/// assert!(comment(b"(; a (; nested ;) comment ;)").is_ok());
/// assert!(comment(b"(; ").is_err());
/// ~~~
pub fn comment(i: &[u8]) -> Parse<&[u8]> {
    nested(b"(;", b";)")(i)
}

fn space(i: &[u8]) -> Parse<Vec<&[u8]>> {
    preceded(multispace0, many0(terminated(comment, multispace0)))(i)
}

/// Strip away space before parsing with the given function.
fn lexeme<'a, O1, F>(inner: F) -> impl FnMut(&'a [u8]) -> Parse<'a, O1>
where
    F: FnMut(&'a [u8]) -> Parse<'a, O1>,
{
    preceded(space, inner)
}

fn parens<'a, O1, F>(inner: F) -> impl FnMut(&'a [u8]) -> Parse<'a, O1>
where
    F: FnMut(&'a [u8]) -> Parse<'a, O1>,
{
    delimited(char('('), lexeme(inner), lexeme(char(')')))
}

/// Parse a phrase, i.e. a given function terminated by a dot.
pub fn phrase<'a, O1, F>(inner: F) -> impl FnMut(&'a [u8]) -> Parse<'a, O1>
where
    F: FnMut(&'a [u8]) -> Parse<'a, O1>,
{
    terminated(inner, lexeme(char('.')))
}

/// Parse bracket-surrounded identifier, like `{| anything \o/ goes |}`.
fn bracket_ident(i: &[u8]) -> Parse<&[u8]> {
    recognize(delimited(tag("{|"), take_until("|}"), tag("|}")))(i)
}

fn normal_ident(i: &[u8]) -> Parse<&[u8]> {
    take_while1(|c| is_alphanumeric(c) || c == b'_' || c == b'\'')(i)
}

fn ident(i: &[u8]) -> Parse<String> {
    map(alt((bracket_ident, normal_ident)), |i: &[u8]| {
        String::from_utf8_lossy(i).into_owned()
    })(i)
}

/// Parse a possibly qualified identifier, like `x` or `hol.prop`.
fn qualified(i: &[u8]) -> Parse<Symb> {
    map(
        pair(ident, many0(preceded(char('.'), ident))),
        |(first, mut rest)| match rest.pop() {
            None => Symb::local(first),
            Some(name) => {
                let mut path = Vec::from([first]);
                path.append(&mut rest);
                Symb { path, name }
            }
        },
    )(i)
}

impl Parser for Arg {
    fn parse(i: &[u8]) -> Parse<Self> {
        map(pair(ident, opt(lexeme(Term::of))), |(id, ty)| Self {
            id,
            ty,
        })(i)
    }
}

impl Term {
    fn of(i: &[u8]) -> Parse<BTerm> {
        preceded(char(':'), map(lexeme(Self::parse), Box::new))(i)
    }

    fn is(i: &[u8]) -> Parse<BTerm> {
        preceded(tag(":="), map(lexeme(Self::parse), Box::new))(i)
    }

    fn sterm(i: &[u8]) -> Parse<Self> {
        alt((parens(Self::parse), map(qualified, Self::Symb)))(i)
    }

    fn appl(i: &[u8]) -> Parse<Self> {
        map(
            pair(Self::sterm, many0(lexeme(Self::sterm))),
            |(head, tail)| head.apply(tail),
        )(i)
    }

    /// Abstraction, like `x => t` or `x : a => t`.
    fn bind_lam(i: &[u8]) -> Parse<Self> {
        map(
            tuple((
                ident,
                opt(preceded(lexeme(char(':')), lexeme(Self::appl))),
                lexeme(tag("=>")),
                lexeme(Self::parse),
            )),
            |(id, ty, _, tm)| {
                let ty = ty.map(Box::new);
                Self::Bind(Binder::Lam, Arg { id, ty }, Box::new(tm))
            },
        )(i)
    }

    /// Named product, like `x : a -> b x`.
    fn bind_prod(i: &[u8]) -> Parse<Self> {
        map(
            tuple((
                ident,
                lexeme(char(':')),
                lexeme(Self::appl),
                lexeme(tag("->")),
                lexeme(Self::parse),
            )),
            |(id, _, ty, _, tm)| {
                let ty = Some(Box::new(ty));
                Self::Bind(Binder::Pi, Arg { id, ty }, Box::new(tm))
            },
        )(i)
    }

    /// Application or unnamed product, like `a b` or `a -> b`.
    fn arrow(i: &[u8]) -> Parse<Self> {
        map(
            pair(
                Self::appl,
                opt(preceded(lexeme(tag("->")), lexeme(Self::parse))),
            ),
            |(dom, cod)| match cod {
                None => dom,
                Some(cod) => {
                    let id = "$".to_string();
                    let ty = Some(Box::new(dom));
                    Self::Bind(Binder::Pi, Arg { id, ty }, Box::new(cod))
                }
            },
        )(i)
    }
}

impl Parser for Term {
    /// ~~~
    /// # use konverti::pre::parse::{phrase, Parser};
    /// # use konverti::pre::Term;
    /// fn pt(i: &[u8]) -> konverti::pre::parse::Parse<konverti::pre::Term> { phrase(Term::parse)(i) }
    /// assert!(pt(b"x.").is_ok());
    /// assert!(pt(b"prop -> prop -> prop.").is_ok());
    /// assert!(pt(b"x : prop -> proof (imp x x).").is_ok());
    /// assert!(pt(b"p : proof x => p.").is_ok());
    /// ~~~
    fn parse(i: &[u8]) -> Parse<Self> {
        alt((Self::bind_lam, Self::bind_prod, Self::arrow))(i)
    }
}

impl Parser for Rule {
    fn parse(i: &[u8]) -> Parse<Self> {
        map(
            tuple((
                preceded(
                    char('['),
                    terminated(
                        separated_list0(lexeme(char(',')), lexeme(Arg::parse)),
                        lexeme(char(']')),
                    ),
                ),
                lexeme(Term::parse),
                lexeme(tag("-->")),
                lexeme(Term::parse),
            )),
            |(ctx, lhs, _, rhs)| Rule { ctx, lhs, rhs },
        )(i)
    }
}

impl Command {
    fn definition(i: &[u8]) -> Parse<Self> {
        preceded(
            pair(tag("def"), multispace1),
            map(
                tuple((
                    lexeme(ident),
                    many0(lexeme(parens(Arg::parse))),
                    opt(lexeme(Term::of)),
                    opt(lexeme(Term::is)),
                )),
                |(id, params, ty, tm)| Self::Intro(id, params, GIntroType::Definition(ty, tm)),
            ),
        )(i)
    }

    fn theorem(i: &[u8]) -> Parse<Self> {
        preceded(
            pair(tag("thm"), multispace1),
            map(
                tuple((
                    lexeme(ident),
                    many0(lexeme(parens(Arg::parse))),
                    lexeme(Term::of),
                    lexeme(Term::is),
                )),
                |(id, params, ty, tm)| Self::Intro(id, params, GIntroType::Theorem(ty, tm)),
            ),
        )(i)
    }

    fn declaration(i: &[u8]) -> Parse<Self> {
        map(
            tuple((ident, many0(lexeme(parens(Arg::parse))), lexeme(Term::of))),
            |(id, params, ty)| Self::Intro(id, params, GIntroType::Declaration(ty)),
        )(i)
    }

    fn intro(i: &[u8]) -> Parse<Self> {
        alt((Self::definition, Self::theorem, Self::declaration))(i)
    }
}

impl Parser for Command {
    /// ~~~
    /// # use konverti::pre::parse::{phrase, Parser};
    /// # use konverti::pre::Command;
    /// fn pc(i: &[u8]) -> konverti::pre::parse::Parse<konverti::pre::Command> { phrase(Command::parse)(i) }
    /// assert!(pc(b"prop : Type.").is_ok());
    /// assert!(pc(b"def proof : prop -> Type.").is_ok());
    /// assert!(pc(b"[x: prop, y: prop] proof (imp x y) --> proof x -> proof y.").is_ok());
    /// ~~~
    fn parse(i: &[u8]) -> Parse<Self> {
        alt((Self::intro, map(Rule::parse, Self::Rule)))(i)
    }
}

/// Iterator over the commands of a string, until the first parse error.
pub struct Phrases<'a> {
    input: &'a [u8],
}

impl<'a> Phrases<'a> {
    pub fn new(i: &'a str) -> Self {
        Self {
            input: i.as_bytes(),
        }
    }
}

impl<'a> Iterator for Phrases<'a> {
    type Item = Result<Command, nom::Err<VerboseError<&'a [u8]>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Ok((rest, _)) = space(self.input) {
            self.input = rest;
        }
        if self.input.is_empty() {
            return None;
        }
        match phrase(Command::parse)(self.input) {
            Ok((rest, cmd)) => {
                self.input = rest;
                Some(Ok(cmd))
            }
            Err(e) => {
                self.input = b"";
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms() {
        fn pt(i: &[u8]) -> Parse<Term> {
            phrase(Term::parse)(i)
        }
        assert!(pt(b"x.").is_ok());
        assert!(pt(b"f x y.").is_ok());
        assert!(pt(b"hol.prop.").is_ok());
        assert!(pt(b"prop -> prop -> prop.").is_ok());
        assert!(pt(b"(a -> b) -> a -> b.").is_ok());
        assert!(pt(b"x : prop -> proof (imp x x).").is_ok());
        assert!(pt(b"p : proof x => p.").is_ok());
        assert!(pt(b"x => x.").is_ok());
        assert!(pt("f (;💖;) x.".as_bytes()).is_ok());
    }

    #[test]
    fn commands() {
        fn pc(i: &[u8]) -> Parse<Command> {
            phrase(Command::parse)(i)
        }
        assert!(pc(b"prop : Type.").is_ok());
        assert!(pc(b"imp : prop -> prop -> prop.").is_ok());
        assert!(pc(b"def proof : prop -> Type.").is_ok());
        assert!(pc(b"def true := forall bool (p : bool => imp p p).").is_ok());
        assert!(pc(b"thm imp_refl (x : prop) : proof (imp x x) := p : proof x => p.").is_ok());
        assert!(pc(b"[x: prop, y: prop] proof (imp x y) --> proof x -> proof y.").is_ok());
        assert!(pc(b"[] true --> forall bool (p : bool => imp p p).").is_ok());
    }

    #[test]
    fn phrases() {
        let cmds = "a : Type. (;c;) b : a -> Type.";
        let cmds: Vec<_> = Phrases::new(cmds).collect();
        assert_eq!(cmds.len(), 2);
        assert!(cmds.iter().all(|cmd| cmd.is_ok()));
    }
}
