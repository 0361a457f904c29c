//! Move-choosing agent for the black side.
//!
//! The game core never trusts an agent: it hands over a [`MoveRequest`]
//! holding a description of the board and the complete candidate-move map,
//! and whatever comes back is membership-checked against that exact map
//! before being applied. Any failure forfeits the agent's turn.
mod strategy;
pub use strategy::{BotStrategy, ErroneousStrategy, FirstMoveStrategy, RandomStrategy};

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use store::{Color, GameState};

/// Outbound payload for a move-choosing agent: a plain-text board
/// description plus every origin with at least one legal move
/// (origins stringified, `"-1"` for the bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub description: String,
    pub moves: BTreeMap<String, Vec<i8>>,
}

impl MoveRequest {
    pub fn from_state(state: &GameState, color: Color) -> Self {
        Self {
            description: describe_state(state, color),
            moves: state.possible_moves_map(),
        }
    }
}

/// An agent's answer: one `(from, to)` pair, expected to be a member of the
/// request's candidate map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChosenMove {
    pub from: i8,
    pub to: i8,
}

/// The agent playing one side, delegating choices to a strategy.
pub struct Bot {
    pub color: Color,
    strategy: Box<dyn BotStrategy>,
}

impl Bot {
    pub fn new(color: Color, strategy: Box<dyn BotStrategy>) -> Self {
        Self { color, strategy }
    }

    /// Ask the strategy for a move. `None` is an agent failure; the caller
    /// is expected to forfeit the turn.
    pub fn choose_move(&mut self, state: &GameState) -> Option<ChosenMove> {
        let request = MoveRequest::from_state(state, self.color);
        if request.moves.is_empty() {
            debug!("no candidate moves to offer the agent");
            return None;
        }
        self.strategy.choose_move(&request)
    }
}

fn describe_state(state: &GameState, color: Color) -> String {
    let opponent = color.opponent();
    format!(
        "Your pieces ({}): {}\n\
         Opponent pieces ({}): {}\n\
         Pieces on bar: {} yours, {} opponent\n\
         Pieces borne off: {} yours, {} opponent\n\
         Dice values available: {:?}",
        color,
        describe_positions(state, color),
        opponent,
        describe_positions(state, opponent),
        state.board.bar(color),
        state.board.bar(opponent),
        state.board.home(color),
        state.board.home(opponent),
        state.available,
    )
}

fn describe_positions(state: &GameState, color: Color) -> String {
    let positions: Vec<String> = state
        .board
        .color_points(color)
        .iter()
        .map(|(field, count)| format!("{} on point {}", count, field))
        .collect();
    if positions.is_empty() {
        "none".to_string()
    } else {
        positions.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{Dice, GameEvent};

    fn moving_state() -> GameState {
        let mut state = GameState::new();
        state.consume(&GameEvent::Roll {
            dice: Dice { values: (6, 5) },
        });
        // white played its turn already in this scenario: flip to black
        state.consume(&GameEvent::Pass);
        state.consume(&GameEvent::Roll {
            dice: Dice { values: (6, 5) },
        });
        state
    }

    #[test]
    fn request_carries_candidates() {
        let state = moving_state();
        let request = MoveRequest::from_state(&state, Color::Black);
        assert!(request.moves.contains_key("24"));
        assert!(request.description.contains("Dice values available"));
    }

    #[test]
    fn first_move_strategy_answers_from_the_map() {
        let state = moving_state();
        let mut bot = Bot::new(Color::Black, Box::new(FirstMoveStrategy::default()));
        let chosen = bot.choose_move(&state).unwrap();
        assert!(store::move_in_candidates(
            &state.possible_moves_map(),
            chosen.from,
            chosen.to
        ));
    }

    #[test]
    fn random_strategy_answers_from_the_map() {
        let state = moving_state();
        let mut bot = Bot::new(Color::Black, Box::new(RandomStrategy::default()));
        for _ in 0..20 {
            let chosen = bot.choose_move(&state).unwrap();
            assert!(store::move_in_candidates(
                &state.possible_moves_map(),
                chosen.from,
                chosen.to
            ));
        }
    }

    #[test]
    fn erroneous_strategy_answers_outside_the_map() {
        let state = moving_state();
        let mut bot = Bot::new(Color::Black, Box::new(ErroneousStrategy));
        let chosen = bot.choose_move(&state).unwrap();
        assert!(!store::move_in_candidates(
            &state.possible_moves_map(),
            chosen.from,
            chosen.to
        ));
    }

    #[test]
    fn no_candidates_is_a_failure() {
        let state = GameState::new(); // still rolling: empty map
        let mut bot = Bot::new(Color::Black, Box::new(FirstMoveStrategy::default()));
        assert!(bot.choose_move(&state).is_none());
    }
}
