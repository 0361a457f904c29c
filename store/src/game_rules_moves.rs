//! Move legality, move enumeration and the forced-dice policy.
use crate::board::{Board, CheckerMove, BAR};
use crate::player::Color;
use std::cmp;
use std::collections::BTreeMap;

/// Rules engine for one side's turn: borrows the board and the dice values
/// not yet consumed this turn. All checks are pure reads.
#[derive(Debug)]
pub struct MoveRules<'a> {
    pub color: Color,
    pub board: &'a Board,
    pub available: &'a [u8],
}

impl<'a> MoveRules<'a> {
    pub fn new(color: Color, board: &'a Board, available: &'a [u8]) -> Self {
        Self {
            color,
            board,
            available,
        }
    }

    /// Whether moving a checker from `from` to `to` is legal for this side.
    ///
    /// Checks, in order: bar priority, bar entry range, bear-off rules,
    /// destination range, direction, destination occupancy and die distance.
    pub fn move_allowed(&self, from: i8, to: i8) -> bool {
        match CheckerMove::new(from, to) {
            Ok(cmove) => self.checker_move_allowed(&cmove),
            Err(_) => false,
        }
    }

    pub fn checker_move_allowed(&self, cmove: &CheckerMove) -> bool {
        let color = self.color;

        // checkers on the bar must enter first, and only they may enter
        if self.board.bar(color) > 0 && !cmove.is_enter() {
            return false;
        }
        if cmove.is_enter() && self.board.bar(color) == 0 {
            return false;
        }

        // entry from the bar is restricted to the entry quadrant
        if cmove.is_enter() && !color.entry_range().contains(&cmove.get_to()) {
            return false;
        }

        if cmove.is_bear_off(color) {
            return self.bear_off_allowed(cmove);
        }

        // anything else outside the track is not a destination
        if !(1..=24).contains(&cmove.get_to()) {
            return false;
        }

        // checkers only move toward their home board
        let dist = cmove.pip_distance(color);
        if dist < 1 {
            return false;
        }

        // two or more opposing checkers block the point
        if self.board.blocked(color, cmove.get_to()).unwrap_or(true) {
            return false;
        }

        // the travelled distance must match an unconsumed die
        self.available.contains(&(dist as u8))
    }

    /// True when the side may bear off at all: empty bar and every checker
    /// in the home board.
    pub fn can_bear_off(&self) -> bool {
        self.board.bar(self.color) == 0 && self.board.all_in_home(self.color)
    }

    fn bear_off_allowed(&self, cmove: &CheckerMove) -> bool {
        if cmove.is_enter() || !self.can_bear_off() {
            return false;
        }
        let dist = cmove.pip_distance(self.color);
        if dist < 1 {
            return false;
        }
        if self.available.contains(&(dist as u8)) {
            return true;
        }
        // a larger die may bear off only the rearmost checkers
        if !self.available.iter().any(|die| *die > dist as u8) {
            return false;
        }
        match self.board.rearmost(self.color) {
            Some(rear) => match self.color {
                Color::White => rear >= cmove.get_from(),
                Color::Black => rear <= cmove.get_from(),
            },
            None => false,
        }
    }

    /// All legal destinations from `origin` (`BAR` for the bar).
    ///
    /// Probes every point and the bear-off sentinel through the legality
    /// check; empty for any non-bar origin while the bar is occupied.
    pub fn possible_destinations(&self, origin: i8) -> Vec<i8> {
        if self.board.bar(self.color) > 0 && origin != BAR {
            return Vec::new();
        }
        let mut destinations: Vec<i8> = (1..=24)
            .filter(|to| self.move_allowed(origin, *to))
            .collect();
        if origin != BAR && self.move_allowed(origin, self.color.bear_off_target()) {
            destinations.push(self.color.bear_off_target());
        }
        destinations
    }

    /// Every origin holding at least one legal move, with its destinations.
    /// This is the candidate map handed to a move-choosing agent.
    pub fn all_moves(&self) -> BTreeMap<i8, Vec<i8>> {
        let mut moves = BTreeMap::new();
        for origin in self.origins() {
            let destinations = self.possible_destinations(origin);
            if !destinations.is_empty() {
                moves.insert(origin, destinations);
            }
        }
        moves
    }

    pub fn has_any_move(&self) -> bool {
        self.origins()
            .iter()
            .any(|origin| !self.possible_destinations(*origin).is_empty())
    }

    fn origins(&self) -> Vec<i8> {
        if self.board.bar(self.color) > 0 {
            vec![BAR]
        } else {
            self.board
                .color_points(self.color)
                .iter()
                .map(|(field, _)| *field)
                .collect()
        }
    }

    /// The die a legal move would consume: the exact distance when that die
    /// is unconsumed, otherwise the smallest larger die for a bear-off.
    pub fn die_for_move(&self, cmove: &CheckerMove) -> Option<u8> {
        let dist = cmove.pip_distance(self.color);
        if dist < 1 {
            return None;
        }
        if self.available.contains(&(dist as u8)) {
            return Some(dist as u8);
        }
        if cmove.is_bear_off(self.color) {
            return self.available.iter().copied().filter(|d| *d > dist as u8).min();
        }
        None
    }

    /// Two-ply exhaustive search: is there any ordering of the two distinct
    /// unconsumed dice that plays both to completion? Returns false when the
    /// dice are a double or fewer than two remain (nothing to force then).
    pub fn can_use_both_dice(&self) -> bool {
        if self.available.len() != 2 || self.available[0] == self.available[1] {
            return false;
        }
        for (index, first_die) in self.available.iter().enumerate() {
            let second_die = [self.available[1 - index]];
            for origin in self.origins() {
                let Some(cmove) = self.move_for_die(origin, *first_die) else {
                    continue;
                };
                let mut board = self.board.clone();
                if board.apply_move(self.color, &cmove).is_err() {
                    continue;
                }
                if MoveRules::new(self.color, &board, &second_die).has_any_move() {
                    return true;
                }
            }
        }
        false
    }

    /// Veto check for a prospective first move: true when both dice were
    /// provably playable before it but no continuation exists after it.
    pub fn strands_second_die(&self, cmove: &CheckerMove) -> bool {
        if !self.can_use_both_dice() {
            return false;
        }
        let Some(consumed) = self.die_for_move(cmove) else {
            return false;
        };
        let mut board = self.board.clone();
        if board.apply_move(self.color, cmove).is_err() {
            return false;
        }
        let mut remaining = self.available.to_vec();
        if let Some(pos) = remaining.iter().position(|d| *d == consumed) {
            remaining.remove(pos);
        }
        !MoveRules::new(self.color, &board, &remaining).has_any_move()
    }

    /// The move `die` yields from `origin`, when legal: the advanced point,
    /// or the bear-off sentinel when the die runs past the track end.
    fn move_for_die(&self, origin: i8, die: u8) -> Option<CheckerMove> {
        let to = match self.color {
            Color::White => {
                let from = if origin == BAR { 0 } else { origin };
                cmp::min(25, from + die as i8)
            }
            Color::Black => {
                let from = if origin == BAR { 25 } else { origin };
                cmp::max(0, from - die as i8)
            }
        };
        let cmove = CheckerMove::new(origin, to).ok()?;
        let single = [die];
        MoveRules::new(self.color, self.board, &single)
            .checker_move_allowed(&cmove)
            .then_some(cmove)
    }
}
