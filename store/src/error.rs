/// This module contains the error definition for the backgammon game.
use std::fmt;

/// Holds all possible errors that can occur during a backgammon game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Game has already ended
    GameEnded,
    /// Field blocked
    FieldBlocked,
    /// Invalid field
    FieldInvalid,
    /// Invalid move
    MoveInvalid,
    /// Checkers on the bar must enter first
    MoveFirst,
    /// Roll first
    RollFirst,
    /// Dice Invalid
    DiceInvalid,
    /// Both dice can be played, the chosen move strands one of them
    MustUseBothDice,
    /// The move-choosing agent failed or answered outside the candidate set
    AgentFailed,
}

// implement Error trait
impl std::error::Error for Error {}

// implement Display trait
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::GameEnded => write!(f, "Game has already ended"),
            Error::FieldBlocked => write!(f, "Field blocked"),
            Error::FieldInvalid => write!(f, "Invalid field"),
            Error::MoveInvalid => write!(f, "Invalid move"),
            Error::MoveFirst => write!(f, "Checkers on the bar must enter first"),
            Error::RollFirst => write!(f, "Roll first"),
            Error::DiceInvalid => write!(f, "Invalid dice"),
            Error::MustUseBothDice => write!(f, "Both dice must be played"),
            Error::AgentFailed => write!(f, "Move agent failed"),
        }
    }
}
