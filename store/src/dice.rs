use rand::distributions::{Distribution, Uniform};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct DiceRoller {
    rng: StdRng,
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DiceRoller {
    pub fn new(opt_seed: Option<u64>) -> Self {
        Self {
            rng: match opt_seed {
                None => StdRng::from_rng(rand::thread_rng()).unwrap(),
                Some(seed) => SeedableRng::seed_from_u64(seed),
            },
        }
    }

    /// Roll the dice which generates two random numbers between 1 and 6,
    /// replicating a perfect pair of dice.
    pub fn roll(&mut self) -> Dice {
        let between = Uniform::new_inclusive(1, 6);

        let v = (between.sample(&mut self.rng), between.sample(&mut self.rng));

        Dice { values: (v.0, v.1) }
    }
}

/// Represents the two dice
///
/// Backgammon is always played with two dice; a double grants four moves of
/// the rolled value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Deserialize, Default)]
pub struct Dice {
    /// The two dice values
    pub values: (u8, u8),
}

impl Dice {
    pub fn is_double(self) -> bool {
        self.values.0 == self.values.1
    }

    /// The values usable this turn: the pair, or four copies on a double.
    pub fn rolled_values(self) -> Vec<u8> {
        if self.is_double() {
            vec![self.values.0; 4]
        } else {
            vec![self.values.0, self.values.1]
        }
    }

    pub fn to_bits_string(self) -> String {
        format!("{:0>3b}{:0>3b}", self.values.0, self.values.1)
    }

    pub fn to_display_string(self) -> String {
        format!("{} & {}", self.values.0, self.values.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll() {
        let dice = DiceRoller::default().roll();
        assert!(dice.values.0 >= 1 && dice.values.0 <= 6);
        assert!(dice.values.1 >= 1 && dice.values.1 <= 6);
    }

    #[test]
    fn test_seed() {
        let dice = DiceRoller::new(Some(123)).roll();
        assert!(dice.values.0 == 3);
        assert!(dice.values.1 == 2);
    }

    #[test]
    fn test_rolled_values() {
        assert_eq!(Dice { values: (4, 2) }.rolled_values(), vec![4, 2]);
        assert_eq!(Dice { values: (5, 5) }.rolled_values(), vec![5, 5, 5, 5]);
    }

    #[test]
    fn test_to_bits_string() {
        let dice = Dice { values: (4, 2) };
        assert!(dice.to_bits_string() == "100010");
    }
}
