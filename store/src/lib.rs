mod game;
pub use game::{move_in_candidates, GameEvent, GamePhase, GameState};

mod game_rules_moves;
pub use game_rules_moves::MoveRules;

mod player;
pub use player::Color;

mod error;
pub use error::Error;

mod board;
pub use board::{Board, CheckerMove, BAR};

mod dice;
pub use dice::{Dice, DiceRoller};
