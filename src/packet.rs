//! Distress signal packets: nested integer lists with their own ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use rayon::slice::ParallelSliceMut;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};

/// Deepest list nesting the parser accepts.
pub const MAX_NESTING: usize = 64;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Value {
    List(Vec<Value>),
    Integer(i64),
}

use Value::*;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Pair {
    pub left: Value,
    pub right: Value,
}

impl Pair {
    pub fn is_ordered(&self) -> bool {
        compare(&self.left, &self.right) == Ordering::Less
    }
}

/// The two divider packets, `[[2]]` and `[[6]]`.
pub fn dividers() -> [Value; 2] {
    [
        List(vec![List(vec![Integer(2)])]),
        List(vec![List(vec![Integer(6)])]),
    ]
}

// An integer compared against a list behaves as a list holding just that integer.
fn as_items(value: &Value) -> &[Value] {
    match value {
        List(items) => items,
        integer @ Integer(_) => std::slice::from_ref(integer),
    }
}

/// Orders two packets.
///
/// Lists compare element by element and the first difference decides. When one list runs out
/// first it sorts before the other. Integers compare numerically and an integer meeting a list is
/// promoted to a one element list.
///
/// Nested lists are walked with an explicit stack, so nesting depth is only limited by memory.
///
/// This is deliberately not `Ord`: `2` and `[2]` compare `Equal` but are different packets.
pub fn compare(left: &Value, right: &Value) -> Ordering {
    if let (Integer(l), Integer(r)) = (left, right) {
        return l.cmp(r);
    }

    let mut stack = vec![(as_items(left).iter(), as_items(right).iter())];
    while let Some((lefts, rights)) = stack.last_mut() {
        match (lefts.next(), rights.next()) {
            (None, None) => {
                stack.pop();
            }
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Integer(l)), Some(Integer(r))) => match l.cmp(r) {
                Ordering::Equal => {}
                ordering => return ordering,
            },
            (Some(l), Some(r)) => stack.push((as_items(l).iter(), as_items(r).iter())),
        }
    }

    Ordering::Equal
}

/// Sum of the 1-based indices of the pairs that are already in order.
pub fn count_ordered(pairs: &[Pair]) -> usize {
    let sum: usize = pairs
        .iter()
        .positions(|pair| {
            let ordering = compare(&pair.left, &pair.right);
            trace!(left = %pair.left, right = %pair.right, ?ordering, "compared pair");
            ordering == Ordering::Less
        })
        .map(|i| i + 1)
        .sum();

    info!(pairs = pairs.len(), sum, "counted ordered pairs");
    sum
}

/// 1-based position of `needle` in `sorted`, matched by structural equality.
pub fn locate(sorted: &[Value], needle: &Value) -> Result<usize> {
    sorted
        .iter()
        .position(|v| v == needle)
        .map(|i| i + 1)
        .ok_or_else(|| Error::NotFound(needle.to_string()))
}

/// Adds `sentinels` to `values`, sorts everything with [`compare`] and multiplies the 1-based
/// positions the sentinels end up at.
///
/// The sort is stable: packets that compare `Equal` keep their input order.
pub fn sort_and_locate<I>(values: I, sentinels: &[Value]) -> Result<usize>
where
    I: IntoIterator<Item = Value>,
{
    let mut packets: Vec<Value> = values.into_iter().chain(sentinels.iter().cloned()).collect();
    packets.par_sort_by(compare);

    let mut product = 1;
    for sentinel in sentinels {
        let position = locate(&packets, sentinel)?;
        debug!(%sentinel, position, "located sentinel");
        product *= position;
    }
    Ok(product)
}

/// Product of the sorted positions of the two divider packets.
pub fn decoder_key<I>(values: I) -> Result<usize>
where
    I: IntoIterator<Item = Value>,
{
    let key = sort_and_locate(values, &dividers())?;
    info!(key, "computed decoder key");
    Ok(key)
}

/// Every packet of the input, left then right, in input order.
pub fn flatten(pairs: Vec<Pair>) -> impl Iterator<Item = Value> {
    pairs
        .into_iter()
        .flat_map(|Pair { left, right }| [left, right])
}

impl fmt::Display for Value {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Integer(n) => write!(fmt, "{}", n),
            List(items) => {
                fmt.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        fmt.write_str(",")?;
                    }
                    write!(fmt, "{}", item)?;
                }
                fmt.write_str("]")
            }
        }
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Value> {
        crate::parser::parse_all(parser::packet, s.trim())
    }
}

pub mod parser {
    use super::*;

    use crate::parser::base10_numeric;

    use nom::branch::alt;
    use nom::bytes::complete::tag;
    use nom::character::complete::line_ending;
    use nom::combinator::{all_consuming, eof};
    use nom::error::{Error, ErrorKind};
    use nom::multi::{many0, many1, separated_list0, separated_list1};
    use nom::sequence::{delimited, separated_pair, terminated, tuple};
    use nom::{IResult, Parser};

    fn packet_data(input: &str, depth: usize) -> IResult<&str, Value> {
        if depth > MAX_NESTING {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
        }

        alt((
            delimited(
                tag("["),
                separated_list0(tag(","), |i| packet_data(i, depth + 1)),
                tag("]"),
            )
            .map(List),
            base10_numeric.map(Integer),
        ))
        .parse(input)
    }

    /// A single packet, with nothing after it.
    pub fn packet(input: &str) -> IResult<&str, Value> {
        all_consuming(|i| packet_data(i, 0)).parse(input)
    }

    fn pair(input: &str) -> IResult<&str, Pair> {
        separated_pair(
            |i| packet_data(i, 0),
            line_ending,
            |i| packet_data(i, 0),
        )
        .map(|(left, right)| Pair { left, right })
        .parse(input)
    }

    pub fn parse_input(input: &str) -> IResult<&str, Vec<Pair>> {
        terminated(
            separated_list1(many1(line_ending), pair),
            tuple((many0(line_ending), eof)),
        )
        .parse(input)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_input() {
            let input = "\
                [[1],[2,3,4]]\n\
                [[1],2]\n\
                \n\
                [1,2,3,4,5]\n\
                [5,4,3,2,[1]]\n";

            let (_input, pairs) = parse_input(input).unwrap();

            assert_eq!(
                pairs,
                vec![
                    Pair {
                        left: List(vec![
                            List(vec![Integer(1)]),
                            List(vec![Integer(2), Integer(3), Integer(4)])
                        ]),
                        right: List(vec![List(vec![Integer(1)]), Integer(2)]),
                    },
                    Pair {
                        left: List(vec![
                            Integer(1),
                            Integer(2),
                            Integer(3),
                            Integer(4),
                            Integer(5)
                        ]),
                        right: List(vec![
                            Integer(5),
                            Integer(4),
                            Integer(3),
                            Integer(2),
                            List(vec![Integer(1)])
                        ]),
                    },
                ]
            );
        }

        #[test]
        fn test_negative_and_empty() {
            let (_, value) = packet("[[],-3,[[]]]").unwrap();
            assert_eq!(
                value,
                List(vec![List(vec![]), Integer(-3), List(vec![List(vec![])])])
            );
        }

        #[test]
        fn test_unpaired_packet_is_rejected() {
            assert!(parse_input("[1]\n[2]\n\n[3]\n").is_err());
        }

        #[test]
        fn test_nesting_limit() {
            let ok = format!("{}{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
            assert!(packet(&ok).is_ok());

            let deep = format!("{}{}", "[".repeat(MAX_NESTING + 2), "]".repeat(MAX_NESTING + 2));
            assert!(matches!(packet(&deep), Err(nom::Err::Failure(_))));
        }
    }
}
