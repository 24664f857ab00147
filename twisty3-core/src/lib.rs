/// twisty3 Core Library - 3×3×3 cube model and layer-turn animation
///
/// The puzzle is 26 rigid cubelets, each with a pose and up to three stickers.
/// The rotation engine turns one face layer at a time in fixed steps, driven
/// by an external tick. Rendering and input live outside this crate.

pub mod color;
pub mod cube;
pub mod cubelet;
pub mod engine;
pub mod error;
pub mod lattice;
pub mod notation;

// Re-export commonly used types
pub use color::Color;
pub use cube::{Cube, TableEntry, CUBELET_COUNT, SOLVED_TABLE};
pub use cubelet::{Cubelet, Slot};
pub use engine::{EngineConfig, Motion, RotationEngine, TurnCommand, LAYER_SIZE};
pub use error::{CubeError, CubeResult};
pub use lattice::{Axis, Direction};
pub use notation::parse_script;
