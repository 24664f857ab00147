/// Sticker colors and their home faces
use strum::{Display, EnumIter};

use crate::lattice::Direction;

/// Sticker color. `None` marks an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    White,
    Red,
    Yellow,
    Orange,
    Green,
    Blue,
    #[default]
    None,
}

impl Color {
    /// The six face colors, in declaration order.
    pub const FACES: [Color; 6] = [
        Color::White,
        Color::Red,
        Color::Yellow,
        Color::Orange,
        Color::Green,
        Color::Blue,
    ];

    pub fn is_face(self) -> bool {
        self != Color::None
    }

    /// Direction of the face this color belongs to on a solved cube.
    pub fn home_direction(self) -> Option<Direction> {
        match self {
            Color::White => Some(Direction::PosZ),
            Color::Yellow => Some(Direction::NegZ),
            Color::Blue => Some(Direction::PosX),
            Color::Green => Some(Direction::NegX),
            Color::Orange => Some(Direction::PosY),
            Color::Red => Some(Direction::NegY),
            Color::None => None,
        }
    }

    /// Color of the solved face pointing along `direction`.
    pub fn of_face(direction: Direction) -> Color {
        match direction {
            Direction::PosZ => Color::White,
            Direction::NegZ => Color::Yellow,
            Direction::PosX => Color::Blue,
            Direction::NegX => Color::Green,
            Direction::PosY => Color::Orange,
            Direction::NegY => Color::Red,
        }
    }

    /// Color on the opposite face.
    pub fn opposite(self) -> Color {
        match self.home_direction() {
            Some(direction) => Color::of_face(direction.opposite()),
            None => Color::None,
        }
    }
}
