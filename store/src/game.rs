//! # Play a backgammon game
use crate::board::{Board, CheckerMove};
use crate::dice::Dice;
use crate::game_rules_moves::MoveRules;
use crate::player::Color;
use log::{debug, warn};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str};

use base64::{engine::general_purpose, Engine as _};

/// The different phases a game turn can be in. (not to be confused with the
/// entire "GameState")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Waiting for the current player to roll
    #[default]
    Rolling,
    /// Dice rolled, the current player is moving checkers
    Moving,
    /// Terminal: a player has borne off all fifteen checkers
    GameOver,
}

/// An event that progresses the GameState forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Roll { dice: Dice },
    Move { cmove: CheckerMove },
    Pass,
    PlayAgain,
}

/// Represents a backgammon game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameState {
    pub phase: GamePhase,
    pub board: Board,
    pub current_player: Color,
    /// last dice pair rolled
    pub dice: Dice,
    /// dice values not yet consumed this turn (four entries on a double)
    pub available: Vec<u8>,
    pub winner: Option<Color>,
    pub history: Vec<GameEvent>,
}

// implement Display trait
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        s.push_str(&format!(
            "Phase: {:?} / to play: {}\n",
            self.phase, self.current_player
        ));
        s.push_str(&format!(
            "Dice: {} (left: {:?})\n",
            self.dice.to_display_string(),
            self.available
        ));
        s.push_str(&format!("Board: {}\n", self.board));
        write!(f, "{}", s)
    }
}

impl GameState {
    /// Create a new game with the opening layout, white to roll
    pub fn new() -> Self {
        GameState::default()
    }

    /// Rules view of the current player's turn
    pub fn rules(&self) -> MoveRules {
        MoveRules::new(self.current_player, &self.board, &self.available)
    }

    // -------------------------------------------------------------------------
    //                        accessors
    // -------------------------------------------------------------------------

    /// Legal destinations from `origin` for the current player
    pub fn possible_moves(&self, origin: i8) -> Vec<i8> {
        if self.phase != GamePhase::Moving {
            return Vec::new();
        }
        self.rules().possible_destinations(origin)
    }

    /// The candidate map sent to a move-choosing agent: every origin with a
    /// legal move, keyed by its stringified position (`"-1"` for the bar).
    pub fn possible_moves_map(&self) -> BTreeMap<String, Vec<i8>> {
        if self.phase != GamePhase::Moving {
            return BTreeMap::new();
        }
        self.rules()
            .all_moves()
            .into_iter()
            .map(|(origin, destinations)| (origin.to_string(), destinations))
            .collect()
    }

    /// Determines if someone has won the game
    pub fn determine_winner(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| self.board.home(*color) == 15)
    }

    /// Calculate a compact game state id: board placement bits, side to
    /// move, phase and dice, base64 encoded.
    pub fn to_string_id(&self) -> String {
        let mut pos_bits = self.board.to_position_bits();

        // side to move -> 1 bit
        pos_bits.push(match self.current_player {
            Color::White => '0',
            Color::Black => '1',
        });

        // phase -> 2 bits
        pos_bits.push_str(match self.phase {
            GamePhase::Rolling => "00",
            GamePhase::Moving => "01",
            GamePhase::GameOver => "10",
        });

        // dice roll -> 6 bits
        pos_bits.push_str(&self.dice.to_bits_string());

        let pos_bits = format!("{:0<96}", pos_bits);
        let pos_u8 = pos_bits
            .as_bytes()
            .chunks(8)
            .map(|chunk| str::from_utf8(chunk).unwrap())
            .map(|chunk| u8::from_str_radix(chunk, 2).unwrap())
            .collect::<Vec<u8>>();
        general_purpose::STANDARD.encode(pos_u8)
    }

    // ----------------------------------------------------------------------------------
    //                          Rules checks
    // ----------------------------------------------------------------------------------

    /// Determines whether an event is valid considering the current GameState
    pub fn validate(&self, event: &GameEvent) -> bool {
        use GameEvent::*;
        match event {
            Roll { dice } => {
                if self.phase != GamePhase::Rolling {
                    return false;
                }
                let (die1, die2) = dice.values;
                if !(1..=6).contains(&die1) || !(1..=6).contains(&die2) {
                    return false;
                }
            }
            Move { cmove } => {
                if self.phase != GamePhase::Moving {
                    return false;
                }
                // the origin must hold a checker of the side to move
                if !cmove.is_enter() {
                    match self.board.checkers_at(cmove.get_from()) {
                        Ok((_, Some(color))) if color == self.current_player => {}
                        _ => return false,
                    }
                }
                let rules = self.rules();
                if !rules.checker_move_allowed(cmove) {
                    return false;
                }
                if rules.strands_second_die(cmove) {
                    debug!(
                        "move {:?} would strand the second die, rejecting",
                        cmove
                    );
                    return false;
                }
            }
            Pass => {
                if self.phase != GamePhase::Moving {
                    return false;
                }
            }
            PlayAgain => {}
        }

        // We couldn't find anything wrong with the event so it must be good
        true
    }

    // ----------------------------------------------------------------------------------
    //                   State updates
    // ----------------------------------------------------------------------------------

    /// Consumes an event, modifying the GameState and adding the event to its history
    /// NOTE: consume assumes the event to have already been validated and will accept *any* event passed to it
    pub fn consume(&mut self, valid_event: &GameEvent) {
        use GameEvent::*;
        match valid_event {
            Roll { dice } => {
                self.dice = *dice;
                self.available = dice.rolled_values();
                self.phase = GamePhase::Moving;
                if !self.rules().has_any_move() {
                    debug!(
                        "no legal move for {} with {:?}, turn passes",
                        self.current_player, self.available
                    );
                    self.end_turn();
                }
            }
            Move { cmove } => {
                let consumed = self.rules().die_for_move(cmove);
                if self
                    .board
                    .apply_move(self.current_player, cmove)
                    .is_err()
                {
                    warn!("unvalidated move {:?} could not be applied", cmove);
                    return;
                }
                if let Some(die) = consumed {
                    if let Some(index) = self.available.iter().position(|d| *d == die) {
                        self.available.remove(index);
                    }
                }
                debug_assert_eq!(self.board.count(Color::White), 15);
                debug_assert_eq!(self.board.count(Color::Black), 15);
                if let Some(winner) = self.determine_winner() {
                    self.winner = Some(winner);
                    self.phase = GamePhase::GameOver;
                } else if self.available.is_empty() {
                    self.end_turn();
                } else if !self.rules().has_any_move() {
                    debug!(
                        "no legal move left for {} with {:?}, turn passes",
                        self.current_player, self.available
                    );
                    self.end_turn();
                }
            }
            Pass => self.end_turn(),
            PlayAgain => {
                // a fresh game starts with an empty history
                *self = GameState::default();
                return;
            }
        }

        self.history.push(valid_event.clone());
    }

    fn end_turn(&mut self) {
        self.available.clear();
        self.dice = Dice::default();
        self.current_player = self.current_player.opponent();
        self.phase = GamePhase::Rolling;
    }
}

/// Exact-membership test of an agent's answer against the candidate map it
/// was sent. Never re-derives legality: a move outside the map is an agent
/// failure even if it would have been legal.
pub fn move_in_candidates(moves: &BTreeMap<String, Vec<i8>>, from: i8, to: i8) -> bool {
    moves
        .get(&from.to_string())
        .map_or(false, |destinations| destinations.contains(&to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BAR;

    fn roll(state: &mut GameState, values: (u8, u8)) {
        let event = GameEvent::Roll {
            dice: Dice { values },
        };
        assert!(state.validate(&event));
        state.consume(&event);
    }

    fn play(state: &mut GameState, from: i8, to: i8) {
        let event = GameEvent::Move {
            cmove: CheckerMove::new(from, to).unwrap(),
        };
        assert!(state.validate(&event), "move {} -> {} rejected", from, to);
        state.consume(&event);
    }

    #[test]
    fn opening_turn_six_five() {
        let mut state = GameState::new();
        roll(&mut state, (6, 5));
        assert_eq!(state.phase, GamePhase::Moving);
        assert_eq!(state.available, vec![6, 5]);

        // white runs one checker 1 -> 7 -> 12
        play(&mut state, 1, 7);
        assert_eq!(state.available, vec![5]);
        play(&mut state, 7, 12);

        assert_eq!(state.board.checkers_at(1), Ok((1, Some(Color::White))));
        assert_eq!(state.board.checkers_at(12), Ok((6, Some(Color::White))));
        assert!(state.available.is_empty());
        assert_eq!(state.current_player, Color::Black);
        assert_eq!(state.phase, GamePhase::Rolling);
    }

    #[test]
    fn doubles_yield_four_dice() {
        let mut state = GameState::new();
        roll(&mut state, (4, 4));
        assert_eq!(state.available, vec![4, 4, 4, 4]);
    }

    #[test]
    fn hit_sends_blot_to_bar() {
        let mut state = GameState::new();
        let mut points = [0i8; 24];
        points[0] = 2; // white on 1
        points[4] = -1; // black blot on 5
        points[23] = -14;
        state.board.set_positions(points);
        state.board.set_home(Color::White, 13);
        roll(&mut state, (4, 2));
        play(&mut state, 1, 5);
        assert_eq!(state.board.checkers_at(5), Ok((1, Some(Color::White))));
        assert_eq!(state.board.bar(Color::Black), 1);
    }

    #[test]
    fn bar_move_required_and_entry() {
        let mut state = GameState::new();
        state.board.set_bar(Color::White, 1);
        let mut points = [0i8; 24];
        points[11] = 14; // rest of white on 12
        points[23] = -15;
        state.board.set_positions(points);
        roll(&mut state, (3, 5));
        // normal origins are rejected while the bar is occupied
        let event = GameEvent::Move {
            cmove: CheckerMove::new(12, 15).unwrap(),
        };
        assert!(!state.validate(&event));
        play(&mut state, BAR, 3);
        assert_eq!(state.board.bar(Color::White), 0);
    }

    #[test]
    fn blocked_entry_passes_turn() {
        let mut state = GameState::new();
        state.board.set_bar(Color::White, 1);
        let mut points = [0i8; 24];
        // black owns the whole entry quadrant
        for index in 0..6 {
            points[index] = -2;
        }
        points[23] = -3;
        points[11] = 14;
        state.board.set_positions(points);
        let board_before = state.board.clone();
        roll(&mut state, (2, 5));
        // no entry was possible: the turn passed without moving anything
        assert_eq!(state.phase, GamePhase::Rolling);
        assert_eq!(state.current_player, Color::Black);
        assert!(state.available.is_empty());
        assert_eq!(state.board, board_before);
    }

    #[test]
    fn partial_turn_passes_when_stuck() {
        // white can play one die, then has nothing for the second
        let mut state = GameState::new();
        let mut points = [0i8; 24];
        points[0] = 1; // lone white on 1
        points[3] = -2; // wall on 4
        points[5] = -2; // wall on 6 (blocks 3 after 1->3 and 5 direct)
        points[23] = -11;
        state.board.set_positions(points);
        state.board.set_home(Color::White, 14);
        roll(&mut state, (2, 3));
        play(&mut state, 1, 3);
        // the 3 had no continuation: turn passed without consuming it
        assert_eq!(state.current_player, Color::Black);
        assert_eq!(state.phase, GamePhase::Rolling);
    }

    #[test]
    fn stranding_move_rejected_by_validate() {
        let mut state = GameState::new();
        let mut points = [0i8; 24];
        points[0] = 1; // white on 1
        points[9] = 1; // white on 10
        points[3] = -2;
        points[12] = -2;
        points[14] = -2;
        points[23] = -9;
        state.board.set_positions(points);
        state.board.set_home(Color::White, 13);
        roll(&mut state, (2, 3));
        let stranding = GameEvent::Move {
            cmove: CheckerMove::new(10, 12).unwrap(),
        };
        assert!(!state.validate(&stranding));
        // the chained ordering is accepted
        play(&mut state, 1, 3);
        play(&mut state, 3, 6);
    }

    #[test]
    fn bear_off_wins_the_game() {
        let mut state = GameState::new();
        let mut points = [0i8; 24];
        points[23] = 1; // last white checker on 24
        points[0] = -15;
        state.board.set_positions(points);
        state.board.set_home(Color::White, 14);
        roll(&mut state, (1, 4));
        play(&mut state, 24, 25);
        assert_eq!(state.board.home(Color::White), 15);
        assert_eq!(state.winner, Some(Color::White));
        assert_eq!(state.phase, GamePhase::GameOver);
        // terminal: nothing is accepted anymore
        assert!(!state.validate(&GameEvent::Roll {
            dice: Dice { values: (1, 2) }
        }));
        assert!(!state.validate(&GameEvent::Move {
            cmove: CheckerMove::new(1, 2).unwrap()
        }));
    }

    #[test]
    fn pass_forfeits_the_turn() {
        let mut state = GameState::new();
        roll(&mut state, (6, 5));
        state.consume(&GameEvent::Pass);
        assert_eq!(state.current_player, Color::Black);
        assert_eq!(state.phase, GamePhase::Rolling);
        assert!(state.available.is_empty());
    }

    #[test]
    fn play_again_resets() {
        let mut state = GameState::new();
        roll(&mut state, (6, 5));
        play(&mut state, 1, 7);
        state.consume(&GameEvent::PlayAgain);
        assert_eq!(state.board, Board::default());
        assert_eq!(state.phase, GamePhase::Rolling);
        assert_eq!(state.current_player, Color::White);
    }

    #[test]
    fn checker_counts_invariant() {
        let mut state = GameState::new();
        roll(&mut state, (6, 5));
        play(&mut state, 1, 7);
        play(&mut state, 12, 17);
        assert_eq!(state.board.count(Color::White), 15);
        assert_eq!(state.board.count(Color::Black), 15);
    }

    #[test]
    fn candidate_map_and_membership() {
        let mut state = GameState::new();
        roll(&mut state, (6, 5));
        let moves = state.possible_moves_map();
        assert!(moves.contains_key("1"));
        assert!(move_in_candidates(&moves, 1, 7));
        assert!(!move_in_candidates(&moves, 1, 6));
        assert!(!move_in_candidates(&moves, 3, 8));
        // membership only, no legality re-derivation
        assert!(!move_in_candidates(&BTreeMap::new(), 1, 7));
    }

    #[test]
    fn possible_moves_empty_outside_moving_phase() {
        let state = GameState::new();
        assert!(state.possible_moves(1).is_empty());
        assert!(state.possible_moves_map().is_empty());
    }

    #[test]
    fn to_string_id() {
        let state = GameState::default();
        let string_id = state.to_string_id();
        assert_eq!(string_id, state.to_string_id());

        let mut moved = GameState::default();
        moved.consume(&GameEvent::Roll {
            dice: Dice { values: (6, 5) },
        });
        assert_ne!(moved.to_string_id(), string_id);
    }
}
