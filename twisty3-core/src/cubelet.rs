/// A single rigid sub-cube: sticker colors plus a world pose
use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};

use crate::color::Color;
use crate::error::{CubeError, CubeResult};
use crate::lattice::{self, Axis, Direction};

/// Logical sticker slot, bound to a fixed local face of the cubelet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Front,
    Right,
    Top,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Front, Slot::Right, Slot::Top];

    /// Local axis the slot's face points along before the pose is applied.
    pub fn local_axis(self) -> Axis {
        match self {
            Slot::Front => Axis::Z,
            Slot::Right => Axis::X,
            Slot::Top => Axis::Y,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::Front => 0,
            Slot::Right => 1,
            Slot::Top => 2,
        }
    }
}

/// One of the 26 pieces of the puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Cubelet {
    stickers: [Color; 3],
    pose: Isometry3<f32>,
    home: [i8; 3],
    is_center: bool,
}

impl Cubelet {
    /// Place a cubelet at a lattice cell with identity rotation and bind
    /// `colors` to the front, right and top slots in that order.
    pub fn new(cell: [i8; 3], colors: &[Color]) -> CubeResult<Self> {
        if !lattice::is_cubelet_cell(cell) {
            return Err(CubeError::OffLattice(cell));
        }
        if colors.len() > 3 {
            return Err(CubeError::TooManyStickers(colors.len()));
        }

        let mut stickers = [Color::None; 3];
        for (slot, &color) in colors.iter().enumerate() {
            if !color.is_face() {
                return Err(CubeError::InvalidSticker { slot, color });
            }
            if stickers.contains(&color) {
                return Err(CubeError::DuplicateSticker(color));
            }
            stickers[slot] = color;
        }

        Ok(Self {
            stickers,
            pose: Isometry3::from_parts(
                Translation3::from(lattice::cell_vector(cell)),
                UnitQuaternion::identity(),
            ),
            home: cell,
            is_center: lattice::outward_faces(cell) == 1,
        })
    }

    /// Replace the orientation, keeping the position. Construction only.
    pub(crate) fn with_orientation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.pose.rotation = rotation;
        self
    }

    /// Rotate the cubelet about one of its own axes, in place.
    ///
    /// Meant for construction, to line the sticker slots up with the faces
    /// they belong to. Turns go through [`Cubelet::apply`].
    pub fn pre_rotate(&mut self, axis: Axis, degrees: f32) {
        let local = UnitQuaternion::from_axis_angle(&axis.unit_axis(), degrees.to_radians());
        self.pose.rotation *= local;
    }

    /// Compose a world-space transform onto the pose: `pose = transform * pose`.
    pub fn apply(&mut self, transform: &Isometry3<f32>) {
        self.pose = transform * self.pose;
    }

    pub fn position(&self) -> Vector3<f32> {
        self.pose.translation.vector
    }

    pub fn orientation(&self) -> &UnitQuaternion<f32> {
        &self.pose.rotation
    }

    pub fn pose(&self) -> &Isometry3<f32> {
        &self.pose
    }

    /// Pose as a homogeneous model matrix.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.pose.to_homogeneous()
    }

    /// Colors in slot order (front, right, top). Empty slots are `Color::None`.
    pub fn sticker_colors(&self) -> [Color; 3] {
        self.stickers
    }

    pub fn sticker(&self, slot: Slot) -> Color {
        self.stickers[slot.index()]
    }

    pub fn sticker_count(&self) -> usize {
        self.stickers.iter().filter(|c| c.is_face()).count()
    }

    pub fn is_center(&self) -> bool {
        self.is_center
    }

    /// Cell the cubelet was built at.
    pub fn home_cell(&self) -> [i8; 3] {
        self.home
    }

    /// Cell the cubelet currently occupies.
    pub fn cell(&self) -> [i8; 3] {
        lattice::nearest_cell(&self.position())
    }

    /// World direction the slot's face currently points to.
    pub fn slot_facing(&self, slot: Slot) -> Vector3<f32> {
        self.pose.rotation * slot.local_axis().unit()
    }

    /// Sticker color facing (approximately) along `direction`.
    pub fn color_facing(&self, direction: Direction) -> Color {
        Slot::ALL
            .into_iter()
            .filter(|&slot| self.sticker(slot).is_face())
            .find(|&slot| Direction::nearest(&self.slot_facing(slot)) == direction)
            .map_or(Color::None, |slot| self.sticker(slot))
    }

    /// Distance of the pose from an exact lattice pose.
    pub fn lattice_drift(&self) -> f32 {
        lattice::translation_drift(&self.position()).max(lattice::rotation_drift(&self.pose.rotation))
    }

    /// Round the pose to the nearest lattice pose.
    ///
    /// Returns `false`, leaving the pose untouched, if the orientation is not
    /// close to any of the 24 cube rotations.
    pub fn snap_to_lattice(&mut self) -> bool {
        let Some(rotation) = lattice::snap_rotation(&self.pose.rotation) else {
            return false;
        };
        self.pose.rotation = rotation;
        self.pose.translation.vector = self.position().map(f32::round);
        true
    }
}
