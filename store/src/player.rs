use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// One of the two sides of a backgammon game.
///
/// The direction convention is fixed once and used everywhere: white advances
/// toward increasing point numbers (1 -> 24), its home board is points 19-24
/// and it bears off past 24; black advances toward decreasing point numbers
/// (24 -> 1), its home board is points 1-6 and it bears off past 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Returns the other color.
    pub fn opponent(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The six points of this color's home board.
    pub fn home_range(&self) -> RangeInclusive<i8> {
        match self {
            Color::White => 19..=24,
            Color::Black => 1..=6,
        }
    }

    /// The six points on which this color re-enters from the bar.
    pub fn entry_range(&self) -> RangeInclusive<i8> {
        match self {
            Color::White => 1..=6,
            Color::Black => 19..=24,
        }
    }

    /// The sentinel destination representing a borne-off checker.
    pub fn bear_off_target(&self) -> i8 {
        match self {
            Color::White => 25,
            Color::Black => 0,
        }
    }

    /// The virtual position a checker on the bar moves from.
    pub fn bar_position(&self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 25,
        }
    }
}

// implement Display trait
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
    }

    #[test]
    fn test_directions() {
        assert!(Color::White.home_range().contains(&24));
        assert!(Color::Black.home_range().contains(&1));
        assert!(Color::White.entry_range().contains(&3));
        assert!(Color::Black.entry_range().contains(&22));
        assert_eq!(Color::White.bear_off_target(), 25);
        assert_eq!(Color::Black.bear_off_target(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(format!("{}", Color::Black), "Black");
    }
}
