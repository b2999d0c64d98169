//! Rank keys for ordering tasks inside a column using fractional indexing.
//!
//! A rank is a non-empty string over a 62-symbol alphabet (`0-9`, `A-Z`,
//! `a-z`). Ranks compare symbol by symbol using each symbol's index in the
//! alphabet, and a strict prefix sorts before any longer rank it starts.
//! New ranks are derived from their neighbours so inserting or moving one
//! task never renumbers the rest of the column.

use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Symbols in ascending order
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of symbols in the alphabet
pub const BASE: usize = ALPHABET.len();

/// Lowest symbol
pub const MIN_CHAR: char = ALPHABET[0] as char;

/// Middle symbol, used for the first rank in an empty column
pub const MID_CHAR: char = ALPHABET[BASE / 2] as char;

/// Highest symbol
pub const MAX_CHAR: char = ALPHABET[BASE - 1] as char;

/// How many symbol positions `between` descends before giving up
pub const DEFAULT_MAX_DEPTH: usize = 64;

fn digit_of(byte: u8) -> Option<usize> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as usize),
        b'A'..=b'Z' => Some((byte - b'A') as usize + 10),
        b'a'..=b'z' => Some((byte - b'a') as usize + 36),
        _ => None,
    }
}

fn symbol(digit: usize) -> char {
    ALPHABET[digit] as char
}

/// An ordering key, comparable only with ranks from the same column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rank(String);

impl Rank {
    /// Validate and wrap a rank string
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(BoardError::invalid_rank(value, "rank must not be empty"));
        }
        let invalid = value.bytes().find(|b| digit_of(*b).is_none());
        if let Some(bad) = invalid {
            let message = format!("invalid rank character: {:?}", bad as char);
            return Err(BoardError::invalid_rank(value, message));
        }
        Ok(Self(value))
    }

    /// The middle rank, `V`
    pub fn mid() -> Self {
        Self(MID_CHAR.to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; ranks are never empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Alphabet index of the symbol at `position`
    fn digit(&self, position: usize) -> Option<usize> {
        self.0.as_bytes().get(position).and_then(|b| digit_of(*b))
    }

    fn from_digits(prefix: &str, digit: usize) -> Self {
        let mut value = String::with_capacity(prefix.len() + 1);
        value.push_str(prefix);
        value.push(symbol(digit));
        Self(value)
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        RankCodec::compare(self, other)
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Rank {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rank {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

/// Rank arithmetic over the alphabet.
///
/// Only [`RankCodec::between`] depends on configuration (the search depth);
/// every other operation is an associated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankCodec {
    max_depth: usize,
}

impl Default for RankCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl RankCodec {
    /// Codec whose `between` search stops after `max_depth` positions
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Compare two ranks by symbol index. Past the end of the shorter rank
    /// its positions sort below every symbol.
    pub fn compare(a: &Rank, b: &Rank) -> Ordering {
        let len = a.len().max(b.len());
        for i in 0..len {
            match (a.digit(i), b.digit(i)) {
                (Some(left), Some(right)) if left != right => return left.cmp(&right),
                (Some(_), Some(_)) => {}
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (None, None) => break,
            }
        }
        Ordering::Equal
    }

    /// Smallest convenient rank above `a`; `MID` when `a` is absent.
    ///
    /// Increments the last symbol that is not `MAX` and drops everything
    /// after it. A rank made only of `MAX` symbols gets `MID` appended.
    pub fn after(a: Option<&Rank>) -> Rank {
        let Some(a) = a else {
            return Rank::mid();
        };

        for i in (0..a.len()).rev() {
            if let Some(current) = a.digit(i) {
                if current < BASE - 1 {
                    return Rank::from_digits(&a.0[..i], current + 1);
                }
            }
        }

        Rank(format!("{}{}", a.0, MID_CHAR))
    }

    /// Rank just below `b`; `MID` when `b` is absent.
    ///
    /// Decrements the last symbol that is not `MIN`, drops everything after
    /// it and appends `MAX`. Returns `None` when every symbol is `MIN`, since
    /// nothing finite sorts below such a rank.
    pub fn before(b: Option<&Rank>) -> Option<Rank> {
        let Some(b) = b else {
            return Some(Rank::mid());
        };

        for i in (0..b.len()).rev() {
            if let Some(current) = b.digit(i) {
                if current > 0 {
                    let mut value = String::with_capacity(i + 2);
                    value.push_str(&b.0[..i]);
                    value.push(symbol(current - 1));
                    value.push(MAX_CHAR);
                    return Some(Rank(value));
                }
            }
        }

        None
    }

    /// A rank strictly between `a` and `b`.
    ///
    /// A missing bound delegates to [`RankCodec::before`] or
    /// [`RankCodec::after`]; two missing bounds give `MID`. Returns `None`
    /// when `a >= b`, or when no midpoint turns up within `max_depth`
    /// positions.
    pub fn between(&self, a: Option<&Rank>, b: Option<&Rank>) -> Option<Rank> {
        match (a, b) {
            (None, None) => Some(Rank::mid()),
            (None, Some(b)) => Self::before(Some(b)),
            (Some(a), None) => Some(Self::after(Some(a))),
            (Some(a), Some(b)) => {
                if Self::compare(a, b) != Ordering::Less {
                    return None;
                }
                self.descend(a, b)
            }
        }
    }

    /// Walk both ranks position by position, treating `a` as padded with
    /// `MIN` and `b` as padded with `MAX`, until a midpoint symbol fits.
    fn descend(&self, a: &Rank, b: &Rank) -> Option<Rank> {
        let mut prefix = String::new();

        for i in 0..self.max_depth {
            let left = a.digit(i).unwrap_or(0);
            let right = b.digit(i).unwrap_or(BASE - 1);

            if right > left + 1 {
                let candidate = Rank::from_digits(&prefix, (left + right) / 2);
                if Self::compare(a, &candidate) == Ordering::Less
                    && Self::compare(&candidate, b) == Ordering::Less
                {
                    return Some(candidate);
                }
            }

            prefix.push(symbol(left));
        }

        tracing::trace!(lower = %a, upper = %b, depth = self.max_depth, "no rank between bounds");
        None
    }

    /// `n` strictly increasing ranks for rewriting a whole column: `MID`,
    /// then `after` of the previous one.
    pub fn sequential(n: usize) -> Vec<Rank> {
        let mut ranks: Vec<Rank> = Vec::with_capacity(n);
        for _ in 0..n {
            let next = match ranks.last() {
                None => Rank::mid(),
                Some(previous) => Self::after(Some(previous)),
            };
            ranks.push(next);
        }
        ranks
    }
}
