use std::fmt;
use std::ops::Index;
use std::slice;
use std::str::FromStr;

use thiserror::Error;

use crate::direction::Direction;

/// The smallest grid the pattern model accepts.
pub const MIN_SIZE: usize = 2;

const WILDCARD: u8 = b'*';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid pattern length {len}{}", expected_length(.size))]
    InvalidLength { len: usize, size: Option<usize> },
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
}

fn expected_length(size: &Option<usize>) -> String {
    match size {
        Some(n) => match n.checked_mul(*n) {
            Some(cells) => format!(", a {n}x{n} grid needs {}", cells.saturating_sub(1)),
            None => format!(", a {n}x{n} grid is too large"),
        },
        None => String::new(),
    }
}

/// What a single step of the pattern allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveConstraint {
    Force(Direction),
    Any,
}

impl MoveConstraint {
    /// Directions to try at this step, in enumeration order.
    #[inline(always)]
    pub fn candidates(&self) -> &[Direction] {
        match self {
            MoveConstraint::Force(dir) => slice::from_ref(dir),
            MoveConstraint::Any => &Direction::ALL,
        }
    }
}

impl fmt::Display for MoveConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveConstraint::Force(dir) => write!(f, "{}", dir),
            MoveConstraint::Any => f.write_str("*"),
        }
    }
}

/// A validated move pattern: exactly `size * size - 1` constraints, one per
/// step of the path. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    size: usize,
    moves: Vec<MoveConstraint>,
}

impl Pattern {
    /// Parses a pattern and derives the grid size from its length.
    pub fn parse(pattern: &str) -> Result<Pattern, ParseError> {
        let len = pattern.len();
        let size = grid_size_for(len).ok_or(ParseError::InvalidLength { len, size: None })?;
        Self::parse_checked(pattern, size)
    }

    /// Parses a pattern for a grid size fixed by the caller.
    pub fn parse_sized(pattern: &str, size: usize) -> Result<Pattern, ParseError> {
        let len = pattern.len();
        if size < MIN_SIZE || size.checked_mul(size) != Some(len + 1) {
            return Err(ParseError::InvalidLength {
                len,
                size: Some(size),
            });
        }
        Self::parse_checked(pattern, size)
    }

    fn parse_checked(pattern: &str, size: usize) -> Result<Pattern, ParseError> {
        let moves = pattern
            .char_indices()
            .map(|(position, ch)| match u8::try_from(ch) {
                Ok(WILDCARD) => Ok(MoveConstraint::Any),
                Ok(letter) => Direction::from_letter(letter)
                    .map(MoveConstraint::Force)
                    .ok_or(ParseError::InvalidCharacter { ch, position }),
                Err(_) => Err(ParseError::InvalidCharacter { ch, position }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pattern { size, moves })
    }

    /// Side length N of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of moves, always `N * N - 1`.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, MoveConstraint> {
        self.moves.iter()
    }

    /// Count of steps pinned to a single direction.
    pub fn forced_moves(&self) -> usize {
        self.iter()
            .filter(|m| matches!(m, MoveConstraint::Force(_)))
            .count()
    }
}

/// N such that `len == N * N - 1` and `N >= 2`.
fn grid_size_for(len: usize) -> Option<usize> {
    let cells = len.checked_add(1)?;
    let n = cells.isqrt();
    (n >= MIN_SIZE && n * n == cells).then_some(n)
}

impl Index<usize> for Pattern {
    type Output = MoveConstraint;

    fn index(&self, step: usize) -> &MoveConstraint {
        &self.moves[step]
    }
}

impl FromStr for Pattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|m| write!(f, "{}", m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_grid_size() {
        let test_cases = vec![(3, 2), (8, 3), (15, 4), (24, 5), (48, 7), (63, 8)];

        for (len, expected) in test_cases {
            let pattern = Pattern::parse(&"*".repeat(len)).unwrap();
            assert_eq!(pattern.size(), expected, "Failed for length: {}", len);
            assert_eq!(pattern.len(), len);
        }
    }

    #[test]
    fn test_rejects_lengths_without_a_grid() {
        // 0 would be a 1x1 grid, which is below the minimum size.
        for len in [0, 1, 2, 4, 7, 9, 62, 64] {
            let err = Pattern::parse(&"*".repeat(len)).unwrap_err();
            assert_eq!(err, ParseError::InvalidLength { len, size: None });
        }
    }

    #[test]
    fn test_sized_parse_checks_length() {
        assert!(Pattern::parse_sized(&"*".repeat(63), 8).is_ok());

        let err = Pattern::parse_sized(&"*".repeat(48), 8).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidLength {
                len: 48,
                size: Some(8)
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid pattern length 48, a 8x8 grid needs 63"
        );

        assert!(Pattern::parse_sized("", 1).is_err());
        assert!(Pattern::parse_sized("", 0).is_err());
    }

    #[test]
    fn test_sized_parse_error_for_huge_size() {
        let size = 1usize << 33;
        let err = Pattern::parse_sized("***", size).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidLength {
                len: 3,
                size: Some(size)
            }
        );
        assert_eq!(
            err.to_string(),
            format!("invalid pattern length 3, a {size}x{size} grid is too large")
        );
    }

    #[test]
    fn test_rejects_characters_outside_alphabet() {
        assert_eq!(
            Pattern::parse("****d***").unwrap_err(),
            ParseError::InvalidCharacter {
                ch: 'd',
                position: 4
            }
        );
        assert_eq!(
            Pattern::parse("???").unwrap_err(),
            ParseError::InvalidCharacter {
                ch: '?',
                position: 0
            }
        );
        // length counts bytes, so this is an 8 byte pattern for a 3x3 grid
        assert_eq!(
            Pattern::parse("é******").unwrap_err(),
            ParseError::InvalidCharacter {
                ch: 'é',
                position: 0
            }
        );
    }

    #[test]
    fn test_length_is_checked_before_alphabet() {
        assert_eq!(
            Pattern::parse("xy").unwrap_err(),
            ParseError::InvalidLength { len: 2, size: None }
        );
    }

    #[test]
    fn test_constraints() {
        let pattern: Pattern = "RD*LU*U*".parse().unwrap();
        assert_eq!(pattern[0], MoveConstraint::Force(Direction::Right));
        assert_eq!(pattern[1], MoveConstraint::Force(Direction::Down));
        assert_eq!(pattern[2], MoveConstraint::Any);
        assert_eq!(pattern[2].candidates(), &Direction::ALL);
        assert_eq!(pattern[3].candidates(), &[Direction::Left]);
        assert_eq!(pattern.forced_moves(), 5);
        assert_eq!(pattern.to_string(), "RD*LU*U*");

        let letters: String = pattern.iter().map(|m| m.to_string()).collect();
        assert_eq!(letters, "RD*LU*U*");
        assert_eq!(pattern.iter().len(), pattern.len());
    }
}
