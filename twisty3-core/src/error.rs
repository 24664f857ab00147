/// Error types for the cube model and rotation engine
use thiserror::Error;

use crate::color::Color;
use crate::engine::Motion;

/// Result type for cube operations.
pub type CubeResult<T> = Result<T, CubeError>;

/// Errors raised by construction, configuration, turns and scripts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CubeError {
    /// A turn was requested while another one is still animating.
    #[error("a {active} turn is still in progress")]
    TurnInProgress {
        /// Motion of the turn currently animating.
        active: Motion,
    },

    /// Layer selection did not find a full face layer.
    #[error("{motion} layer selection found {found} cubelets, expected {expected}")]
    LayerSelection {
        /// Motion being started.
        motion: Motion,
        /// Number of cubelets a face layer must contain.
        expected: usize,
        /// Number of cubelets actually selected.
        found: usize,
    },

    /// Only the six face colors can be highlighted.
    #[error("{0} is not a face color")]
    InvalidFace(Color),

    /// A cubelet has at most three stickers.
    #[error("a cubelet holds at most 3 stickers, got {0}")]
    TooManyStickers(usize),

    /// `Color::None` cannot be bound to a sticker slot.
    #[error("sticker slot {slot} was given {color}")]
    InvalidSticker {
        /// Slot index.
        slot: usize,
        /// Offending color.
        color: Color,
    },

    /// The same color appears twice on one cubelet.
    #[error("color {0} appears more than once on a cubelet")]
    DuplicateSticker(Color),

    /// Position is not one of the 26 lattice cells.
    #[error("position {0:?} is not a cubelet lattice cell")]
    OffLattice([i8; 3]),

    /// The construction table has the wrong number of entries.
    #[error("construction table has {0} entries, expected 26")]
    TableSize(usize),

    /// Two table entries share a lattice cell.
    #[error("lattice cell {0:?} is used twice")]
    DuplicatePosition([i8; 3]),

    /// Sticker count does not match the kind of cell (center, edge, corner).
    #[error("cell {position:?} needs {expected} stickers, got {actual}")]
    StickerCount {
        /// Lattice cell.
        position: [i8; 3],
        /// Number of outward faces of the cell.
        expected: usize,
        /// Number of stickers in the entry.
        actual: usize,
    },

    /// Front and right facings of a table entry must be perpendicular.
    #[error("cell {0:?} has a degenerate orientation")]
    InvalidOrientation([i8; 3]),

    /// A sticker does not face outward, or faces a face of another color.
    #[error("sticker {color} at {position:?} faces the wrong way")]
    StickerMisplaced {
        /// Lattice cell.
        position: [i8; 3],
        /// Misplaced color.
        color: Color,
    },

    /// The step angle must divide a quarter turn into whole steps.
    #[error("step of {0} degrees does not divide 90 degrees")]
    InvalidStepAngle(f32),

    /// Tolerance must be positive and well below the lattice spacing.
    #[error("tolerance {0} is out of range")]
    InvalidTolerance(f32),

    /// Unknown token in a turn script.
    #[error("unexpected {token:?} at offset {offset} in turn script")]
    Notation {
        /// Byte offset of the token.
        offset: usize,
        /// Text starting at the offset.
        token: String,
    },
}
