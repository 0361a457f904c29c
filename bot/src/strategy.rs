use crate::{ChosenMove, MoveRequest};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

/// A pluggable move chooser. Implementations only see the request payload,
/// never the game state itself.
pub trait BotStrategy {
    fn choose_move(&mut self, request: &MoveRequest) -> Option<ChosenMove>;
}

/// Picks the first listed destination of the first listed origin.
#[derive(Debug, Default)]
pub struct FirstMoveStrategy;

impl BotStrategy for FirstMoveStrategy {
    fn choose_move(&mut self, request: &MoveRequest) -> Option<ChosenMove> {
        let (origin, destinations) = request.moves.iter().next()?;
        let from = origin.parse().ok()?;
        let to = *destinations.first()?;
        Some(ChosenMove { from, to })
    }
}

/// Picks uniformly among all candidate moves.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RandomStrategy {
    pub fn new(opt_seed: Option<u64>) -> Self {
        Self {
            rng: match opt_seed {
                None => StdRng::from_rng(rand::thread_rng()).unwrap(),
                Some(seed) => SeedableRng::seed_from_u64(seed),
            },
        }
    }
}

impl BotStrategy for RandomStrategy {
    fn choose_move(&mut self, request: &MoveRequest) -> Option<ChosenMove> {
        let flattened: Vec<ChosenMove> = request
            .moves
            .iter()
            .filter_map(|(origin, destinations)| {
                let from: i8 = origin.parse().ok()?;
                Some(destinations.iter().map(move |to| ChosenMove { from, to: *to }))
            })
            .flatten()
            .collect();
        flattened.choose(&mut self.rng).copied()
    }
}

/// Always answers a move outside the candidate map. Test double for the
/// agent-failure recovery path.
#[derive(Debug, Default)]
pub struct ErroneousStrategy;

impl BotStrategy for ErroneousStrategy {
    fn choose_move(&mut self, _request: &MoveRequest) -> Option<ChosenMove> {
        Some(ChosenMove { from: 99, to: 99 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request() -> MoveRequest {
        let mut moves = BTreeMap::new();
        moves.insert("-1".to_string(), vec![20, 22]);
        MoveRequest {
            description: String::new(),
            moves,
        }
    }

    #[test]
    fn first_move_parses_the_bar_origin() {
        let chosen = FirstMoveStrategy.choose_move(&request()).unwrap();
        assert_eq!(chosen, ChosenMove { from: -1, to: 20 });
    }

    #[test]
    fn random_is_deterministic_with_a_seed() {
        let mut first = RandomStrategy::new(Some(42));
        let mut second = RandomStrategy::new(Some(42));
        assert_eq!(
            first.choose_move(&request()),
            second.choose_move(&request())
        );
    }

    #[test]
    fn empty_map_yields_no_move() {
        let empty = MoveRequest {
            description: String::new(),
            moves: BTreeMap::new(),
        };
        assert!(FirstMoveStrategy.choose_move(&empty).is_none());
        assert!(RandomStrategy::new(Some(1)).choose_move(&empty).is_none());
    }
}
