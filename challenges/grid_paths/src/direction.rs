use std::fmt;

/// A unit move on the grid.
///
/// The discriminants are the fixed enumeration order used when a step allows
/// any direction, and `opposite` relies on them: a direction and its reverse
/// are always two apart modulo four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Direction {
    /// All four directions in enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn from_index(index: usize) -> Direction {
        Self::ALL[index % 4]
    }

    /// The direction that would undo this move.
    #[inline(always)]
    pub fn opposite(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    /// Unit offset as (row delta, col delta). Rows grow downwards.
    #[inline(always)]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
        }
    }

    pub fn from_letter(letter: u8) -> Option<Direction> {
        match letter {
            b'R' => Some(Direction::Right),
            b'D' => Some(Direction::Down),
            b'L' => Some(Direction::Left),
            b'U' => Some(Direction::Up),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Up => 'U',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
