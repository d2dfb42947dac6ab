use std::str::FromStr;

use nom::character::complete::{char, digit1};
use nom::combinator::{map_res, opt, recognize};
use nom::sequence::pair;
use nom::{Finish, IResult, Parser};

use crate::error::Result;

/// Parses an optionally negative decimal number.
pub fn base10_numeric<N>(input: &str) -> IResult<&str, N>
where
    N: FromStr,
{
    map_res(recognize(pair(opt(char('-')), digit1)), |s| N::from_str(s)).parse(input)
}

pub fn nom_error_to_owned<I>(e: nom::error::Error<&I>) -> nom::error::Error<I::Owned>
where
    I: ToOwned + ?Sized,
    I::Owned: 'static,
{
    let nom::error::Error { input, code } = e;
    nom::error::Error {
        input: input.to_owned(),
        code,
    }
}

// The output may borrow from `input`, so zero-copy grammars can hand back slices of the buffer
// the caller keeps alive.
pub fn parse_all<'i, O, P>(mut parser: P, input: &'i str) -> Result<O>
where
    P: Parser<&'i str, O, nom::error::Error<&'i str>>,
{
    match parser.parse(input).finish() {
        Ok((_i, o)) => Ok(o),
        Err(e) => Err(nom_error_to_owned(e).into()),
    }
}
