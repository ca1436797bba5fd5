//! Parser for the formula text form.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! implies  := or ( "->" implies )?
//! or       := and ( "|" and )*
//! and      := temporal ( "&" temporal )*
//! temporal := unary ( ("U" | "S") temporal )?
//! unary    := "!" unary
//!           | ("X" | "F" | "G" | "Y" | "O" | "H") unary
//!           | "(" implies ")"
//!           | atom
//! atom     := ident | "\"" chars "\""
//! ```
//!
//! The single uppercase letters above are keywords and never atoms. Anything
//! `Formula`'s `Display` produces is accepted here.

use crate::atom::Atom;
use crate::formula::Formula;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char as pchar, multispace0, satisfy},
    combinator::{all_consuming, map, map_res, not, opt, recognize, value, verify},
    error::{Error as NomError, ErrorKind},
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaParseError {
    #[error("formula text is empty")]
    Empty,
    #[error("invalid formula at offset {offset}: `{fragment}`")]
    Syntax { offset: usize, fragment: String },
}

const RESERVED: [&str; 8] = ["X", "F", "G", "U", "Y", "O", "H", "S"];

pub(crate) fn is_reserved_word(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Parse a formula from its text form.
pub fn parse_formula(text: &str) -> Result<Formula, FormulaParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormulaParseError::Empty);
    }

    match all_consuming(terminated(implies_expr, multispace0))(trimmed) {
        Ok((_, formula)) => Ok(formula),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(FormulaParseError::Syntax {
            offset: trimmed.len() - e.input.len(),
            fragment: e.input.chars().take(24).collect(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(FormulaParseError::Syntax {
            offset: trimmed.len(),
            fragment: String::new(),
        }),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(multispace0, inner)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), not(satisfy(is_ident_continue)))
}

fn implies_expr(input: &str) -> IResult<&str, Formula> {
    let (input, left) = or_expr(input)?;
    let (input, right) = opt(preceded(ws(tag("->")), implies_expr))(input)?;
    let formula = match right {
        Some(right) => Formula::implies(left, right),
        None => left,
    };
    Ok((input, formula))
}

fn or_expr(input: &str) -> IResult<&str, Formula> {
    let (mut input, mut acc) = and_expr(input)?;
    loop {
        match preceded(ws(pchar('|')), and_expr)(input) {
            Ok((rest, right)) => {
                acc = Formula::or(acc, right);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}

fn and_expr(input: &str) -> IResult<&str, Formula> {
    let (mut input, mut acc) = temporal_expr(input)?;
    loop {
        match preceded(ws(pchar('&')), temporal_expr)(input) {
            Ok((rest, right)) => {
                acc = Formula::and(acc, right);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}

fn temporal_expr(input: &str) -> IResult<&str, Formula> {
    let (input, left) = unary_expr(input)?;
    let binary_op = alt((
        value(Formula::until as fn(Formula, Formula) -> Formula, keyword("U")),
        value(Formula::since as fn(Formula, Formula) -> Formula, keyword("S")),
    ));
    let (input, rest) = opt(tuple((ws(binary_op), temporal_expr)))(input)?;
    let formula = match rest {
        Some((op, right)) => op(left, right),
        None => left,
    };
    Ok((input, formula))
}

fn unary_expr(input: &str) -> IResult<&str, Formula> {
    ws(alt((not_expr, temporal_unary_expr, paren_expr, quoted_atom, plain_atom)))(input)
}

fn not_expr(input: &str) -> IResult<&str, Formula> {
    let (input, _) = pchar('!')(input)?;
    let (input, arg) = unary_expr(input)?;
    Ok((input, Formula::not(arg)))
}

fn temporal_unary_expr(input: &str) -> IResult<&str, Formula> {
    let (input, op) = alt((
        value(Formula::next as fn(Formula) -> Formula, keyword("X")),
        value(Formula::eventually as fn(Formula) -> Formula, keyword("F")),
        value(Formula::always as fn(Formula) -> Formula, keyword("G")),
        value(Formula::before as fn(Formula) -> Formula, keyword("Y")),
        value(Formula::once as fn(Formula) -> Formula, keyword("O")),
        value(Formula::historically as fn(Formula) -> Formula, keyword("H")),
    ))(input)?;
    let (input, arg) = unary_expr(input)?;
    Ok((input, op(arg)))
}

fn paren_expr(input: &str) -> IResult<&str, Formula> {
    delimited(pchar('('), implies_expr, ws(pchar(')')))(input)
}

fn plain_atom(input: &str) -> IResult<&str, Formula> {
    let ident = verify(
        recognize(tuple((take_while1(is_ident_start), take_while(is_ident_continue)))),
        |s: &str| !is_reserved_word(s),
    );
    map(map_res(ident, Atom::new), Formula::atom)(input)
}

fn quoted_atom(input: &str) -> IResult<&str, Formula> {
    let (body, _) = pchar('"')(input)?;
    let mut name = String::new();
    let mut chars = body.char_indices();
    let rest = loop {
        match chars.next() {
            None => return Err(nom::Err::Error(NomError::new(input, ErrorKind::Char))),
            Some((i, '"')) => break &body[i + 1..],
            Some((_, '\\')) => match chars.next() {
                Some((_, c)) => name.push(c),
                None => return Err(nom::Err::Error(NomError::new(input, ErrorKind::Escaped))),
            },
            Some((_, c)) => name.push(c),
        }
    };
    let atom = Atom::new(name)
        .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Verify)))?;
    Ok((rest, Formula::atom(atom)))
}
