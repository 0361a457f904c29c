use crate::player::Color;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin sentinel for a checker entering from the bar.
pub const BAR: i8 = -1;

/// A single checker displacement, validated on construction.
///
/// `from` is `-1` for the bar or a point in 1..=24; `to` is a point in
/// 1..=24 or a bear-off sentinel (25 for white, 0 for black).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckerMove {
    from: i8,
    to: i8,
}

impl CheckerMove {
    pub fn new(from: i8, to: i8) -> Result<Self, Error> {
        if from != BAR && !(1..=24).contains(&from) {
            return Err(Error::FieldInvalid);
        }
        if !(0..=25).contains(&to) || from == to {
            return Err(Error::FieldInvalid);
        }
        Ok(Self { from, to })
    }

    pub fn get_from(&self) -> i8 {
        self.from
    }

    pub fn get_to(&self) -> i8 {
        self.to
    }

    /// Whether the checker enters from the bar.
    pub fn is_enter(&self) -> bool {
        self.from == BAR
    }

    /// Whether the move bears the checker off for the given color.
    pub fn is_bear_off(&self, color: Color) -> bool {
        self.to == color.bear_off_target()
    }

    /// Pip distance travelled in the color's forward direction.
    ///
    /// Negative for a backward move, which is never legal.
    pub fn pip_distance(&self, color: Color) -> i8 {
        let from = if self.from == BAR {
            color.bar_position()
        } else {
            self.from
        };
        match color {
            Color::White => self.to - from,
            Color::Black => from - self.to,
        }
    }
}

/// Represents the backgammon board: 24 points, the bar and the borne-off
/// trays. Point counts are signed: positive for white, negative for black.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    points: [i8; 24],
    /// checkers on the bar (white, black)
    bar: (u8, u8),
    /// checkers borne off (white, black)
    home: (u8, u8),
}

impl Default for Board {
    fn default() -> Self {
        Board {
            points: [
                2, 0, 0, 0, 0, -5, 0, -3, 0, 0, 0, 5, -5, 0, 0, 0, 3, 0, 5, 0, 0, 0, 0, -2,
            ],
            bar: (0, 0),
            home: (0, 0),
        }
    }
}

// implement Display trait
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:?} bar: {:?} home: {:?}",
            self.points, self.bar, self.home
        )
    }
}

impl Board {
    /// Create a new board with the classic opening layout
    pub fn new() -> Self {
        Board::default()
    }

    /// Checker count and owning color of a point
    pub fn checkers_at(&self, field: i8) -> Result<(u8, Option<Color>), Error> {
        if !(1..=24).contains(&field) {
            return Err(Error::FieldInvalid);
        }
        let count = self.points[field as usize - 1];
        Ok(match count.signum() {
            1 => (count as u8, Some(Color::White)),
            -1 => (count.unsigned_abs(), Some(Color::Black)),
            _ => (0, None),
        })
    }

    /// Check if a field is blocked for a color
    pub fn blocked(&self, color: Color, field: i8) -> Result<bool, Error> {
        let (count, owner) = self.checkers_at(field)?;
        Ok(count > 1 && owner == Some(color.opponent()))
    }

    pub fn bar(&self, color: Color) -> u8 {
        match color {
            Color::White => self.bar.0,
            Color::Black => self.bar.1,
        }
    }

    pub fn home(&self, color: Color) -> u8 {
        match color {
            Color::White => self.home.0,
            Color::Black => self.home.1,
        }
    }

    /// All points occupied by a color, with their checker counts
    pub fn color_points(&self, color: Color) -> Vec<(i8, u8)> {
        (1..=24)
            .filter_map(|field| {
                let (count, owner) = self.checkers_at(field).ok()?;
                (owner == Some(color)).then_some((field, count))
            })
            .collect()
    }

    /// Total checkers of a color across points, bar and home.
    /// Always 15 for a reachable state.
    pub fn count(&self, color: Color) -> u8 {
        let on_points: u8 = self.color_points(color).iter().map(|(_, n)| n).sum();
        on_points + self.bar(color) + self.home(color)
    }

    /// True when every checker of the color still on the board sits in the
    /// color's home board. Does not look at the bar.
    pub fn all_in_home(&self, color: Color) -> bool {
        self.color_points(color)
            .iter()
            .all(|(field, _)| color.home_range().contains(field))
    }

    /// The occupied point farthest from the color's home, if any.
    pub fn rearmost(&self, color: Color) -> Option<i8> {
        let fields = self.color_points(color);
        match color {
            Color::White => fields.iter().map(|(field, _)| *field).min(),
            Color::Black => fields.iter().map(|(field, _)| *field).max(),
        }
    }

    /// Apply one validated move mechanically: lift the checker from the bar
    /// or its origin point, resolve a hit on an opposing blot, then drop it
    /// on the destination or into the borne-off tray.
    ///
    /// Rule-level legality (dice, direction, forced usage) is the caller's
    /// responsibility; only structurally impossible applications error.
    pub fn apply_move(&mut self, color: Color, cmove: &CheckerMove) -> Result<(), Error> {
        // lift
        if cmove.is_enter() {
            if self.bar(color) == 0 {
                return Err(Error::MoveInvalid);
            }
            self.add_bar(color, -1);
        } else {
            let (count, owner) = self.checkers_at(cmove.get_from())?;
            if count == 0 || owner != Some(color) {
                return Err(Error::MoveInvalid);
            }
            self.add_checkers(color, cmove.get_from(), -1);
        }

        // drop
        if cmove.is_bear_off(color) {
            self.add_home(color, 1);
            return Ok(());
        }
        let (count, owner) = self.checkers_at(cmove.get_to())?;
        if owner == Some(color.opponent()) {
            if count > 1 {
                return Err(Error::FieldBlocked);
            }
            // hit: the opposing blot goes to the bar
            self.points[cmove.get_to() as usize - 1] = 0;
            self.add_bar(color.opponent(), 1);
        }
        self.add_checkers(color, cmove.get_to(), 1);
        Ok(())
    }

    fn add_checkers(&mut self, color: Color, field: i8, amount: i8) {
        let signed = match color {
            Color::White => amount,
            Color::Black => -amount,
        };
        self.points[field as usize - 1] += signed;
    }

    fn add_bar(&mut self, color: Color, amount: i8) {
        let slot = match color {
            Color::White => &mut self.bar.0,
            Color::Black => &mut self.bar.1,
        };
        *slot = slot.wrapping_add_signed(amount);
    }

    fn add_home(&mut self, color: Color, amount: i8) {
        let slot = match color {
            Color::White => &mut self.home.0,
            Color::Black => &mut self.home.1,
        };
        *slot = slot.wrapping_add_signed(amount);
    }

    /// Piece placement bit string, inspired by the gnubg position id: for
    /// each side, one `1` per checker on each point followed by a `0`
    /// separator, then the bar count, padded to 80 bits.
    pub fn to_position_bits(&self) -> String {
        let mut bits = String::new();
        for color in [Color::White, Color::Black] {
            let mut fields: Vec<i8> = (1..=24).collect();
            if color == Color::Black {
                fields.reverse();
            }
            for field in fields {
                let (count, owner) = self.checkers_at(field).unwrap_or((0, None));
                if owner == Some(color) {
                    bits.push_str(&"1".repeat(count as usize));
                }
                bits.push('0');
            }
            bits.push_str(&"1".repeat(self.bar(color) as usize));
            bits.push('0');
        }
        format!("{:0<80}", bits)
    }

    // ----- test & scenario scaffolding -----

    pub fn set_positions(&mut self, points: [i8; 24]) {
        self.points = points;
    }

    pub fn set_bar(&mut self, color: Color, count: u8) {
        match color {
            Color::White => self.bar.0 = count,
            Color::Black => self.bar.1 = count,
        }
    }

    pub fn set_home(&mut self, color: Color, count: u8) {
        match color {
            Color::White => self.home.0 = count,
            Color::Black => self.home.1 = count,
        }
    }
}
