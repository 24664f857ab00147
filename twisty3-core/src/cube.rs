/// The 26-cubelet assembly and its solved-state table
use std::collections::HashSet;

use log::debug;
use nalgebra::{Rotation3, UnitQuaternion};

use crate::color::Color;
use crate::cubelet::{Cubelet, Slot};
use crate::error::{CubeError, CubeResult};
use crate::lattice::{self, Direction};
use crate::lattice::Direction::{NegX, NegY, NegZ, PosX, PosY, PosZ};

/// Number of cubelets in a 3×3×3 puzzle.
pub const CUBELET_COUNT: usize = 26;

/// One row of a construction table.
///
/// The orientation is given by where the front (local +Z) and right (local +X)
/// slots face; the top slot follows from the right-hand rule.
#[derive(Debug, Clone, Copy)]
pub struct TableEntry {
    pub cell: [i8; 3],
    pub front: Direction,
    pub right: Direction,
    pub stickers: &'static [Color],
}

impl TableEntry {
    pub const fn new(
        cell: [i8; 3],
        front: Direction,
        right: Direction,
        stickers: &'static [Color],
    ) -> Self {
        Self {
            cell,
            front,
            right,
            stickers,
        }
    }

    /// Rotation taking local +Z to `front` and local +X to `right`.
    pub fn orientation(&self) -> Option<UnitQuaternion<f32>> {
        if self.front.axis() == self.right.axis() {
            return None;
        }
        let front = self.front.vector();
        let right = self.right.vector();
        let top = front.cross(&right);
        let basis = Rotation3::from_basis_unchecked(&[right, top, front]);
        Some(UnitQuaternion::from_rotation_matrix(&basis))
    }
}

const W: Color = Color::White;
const Y: Color = Color::Yellow;
const B: Color = Color::Blue;
const G: Color = Color::Green;
const O: Color = Color::Orange;
const R: Color = Color::Red;

/// Solved state: white +Z, yellow -Z, blue +X, green -X, orange +Y, red -Y.
#[rustfmt::skip]
pub const SOLVED_TABLE: [TableEntry; CUBELET_COUNT] = [
    // Centers
    TableEntry::new([ 0,  0,  1], PosZ, PosX, &[W]),
    TableEntry::new([ 0,  1,  0], PosY, PosX, &[O]),
    TableEntry::new([ 0, -1,  0], NegY, PosX, &[R]),
    TableEntry::new([ 1,  0,  0], PosX, NegZ, &[B]),
    TableEntry::new([-1,  0,  0], NegX, PosZ, &[G]),
    TableEntry::new([ 0,  0, -1], NegZ, NegX, &[Y]),
    // Edges
    TableEntry::new([-1,  0,  1], PosZ, NegX, &[W, G]),
    TableEntry::new([ 1,  0,  1], PosZ, PosX, &[W, B]),
    TableEntry::new([ 0,  1,  1], PosZ, PosY, &[W, O]),
    TableEntry::new([ 0, -1,  1], PosZ, NegY, &[W, R]),
    TableEntry::new([ 1, -1,  0], PosX, NegY, &[B, R]),
    TableEntry::new([ 1,  0, -1], PosX, NegZ, &[B, Y]),
    TableEntry::new([-1, -1,  0], NegX, NegY, &[G, R]),
    TableEntry::new([-1,  0, -1], NegX, NegZ, &[G, Y]),
    TableEntry::new([ 0,  1, -1], NegZ, PosY, &[Y, O]),
    TableEntry::new([ 0, -1, -1], NegZ, NegY, &[Y, R]),
    TableEntry::new([ 1,  1,  0], PosY, PosX, &[O, B]),
    TableEntry::new([-1,  1,  0], PosY, NegX, &[O, G]),
    // Corners
    TableEntry::new([ 1,  1,  1], PosZ, PosX, &[W, B, O]),
    TableEntry::new([-1,  1,  1], PosZ, PosY, &[W, O, G]),
    TableEntry::new([ 1, -1,  1], PosZ, NegY, &[W, R, B]),
    TableEntry::new([-1, -1,  1], PosZ, NegX, &[W, G, R]),
    TableEntry::new([ 1,  1, -1], PosX, NegZ, &[B, Y, O]),
    TableEntry::new([ 1, -1, -1], PosX, NegY, &[B, R, Y]),
    TableEntry::new([-1,  1, -1], NegX, PosY, &[G, O, Y]),
    TableEntry::new([-1, -1, -1], NegX, NegZ, &[G, Y, R]),
];

/// The whole puzzle: 26 cubelets in a fixed order plus the highlighted face.
///
/// Cubelet indices never change. Poses are only mutated by the rotation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    cubelets: Vec<Cubelet>,
    highlighted_face: Color,
}

impl Cube {
    /// Build the solved puzzle.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table is malformed, which is a programming error.
    pub fn solved() -> Self {
        Self::from_table(&SOLVED_TABLE)
            .unwrap_or_else(|e| panic!("solved-state table is malformed: {e}"))
    }

    /// Build and check a cube from a construction table.
    pub fn from_table(table: &[TableEntry]) -> CubeResult<Self> {
        if table.len() != CUBELET_COUNT {
            return Err(CubeError::TableSize(table.len()));
        }

        let mut seen = HashSet::with_capacity(CUBELET_COUNT);
        let mut cubelets = Vec::with_capacity(CUBELET_COUNT);
        for entry in table {
            if !seen.insert(entry.cell) {
                return Err(CubeError::DuplicatePosition(entry.cell));
            }
            let rotation = entry
                .orientation()
                .ok_or(CubeError::InvalidOrientation(entry.cell))?;
            let cubelet = Cubelet::new(entry.cell, entry.stickers)?.with_orientation(rotation);
            check_stickers(&cubelet)?;
            cubelets.push(cubelet);
        }

        debug!("built cube from a {}-entry table", cubelets.len());
        Ok(Self {
            cubelets,
            highlighted_face: Color::White,
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cubelet> {
        self.cubelets.iter()
    }

    pub fn cubelets(&self) -> &[Cubelet] {
        &self.cubelets
    }

    pub fn get(&self, index: usize) -> Option<&Cubelet> {
        self.cubelets.get(index)
    }

    pub(crate) fn cubelet_mut(&mut self, index: usize) -> &mut Cubelet {
        &mut self.cubelets[index]
    }

    pub fn len(&self) -> usize {
        self.cubelets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubelets.is_empty()
    }

    pub fn highlighted_face(&self) -> Color {
        self.highlighted_face
    }

    pub fn set_highlighted_face(&mut self, color: Color) -> CubeResult<()> {
        if !color.is_face() {
            return Err(CubeError::InvalidFace(color));
        }
        self.highlighted_face = color;
        Ok(())
    }

    /// True for the center cubelet of the highlighted face.
    ///
    /// Only centers qualify; edges and corners showing the color do not.
    pub fn is_on_highlighted_face(&self, cubelet: &Cubelet) -> bool {
        cubelet.is_center() && cubelet.sticker(Slot::Front) == self.highlighted_face
    }

    /// Stickers visible on one face, row by row as seen from outside.
    ///
    /// Rows run top to bottom, with +Y as "up" for the four side faces, -Z
    /// for the +Y face and +Z for the -Y face.
    pub fn face_colors(&self, face: Direction) -> [[Color; 3]; 3] {
        let normal = face.vector();
        let up = match face {
            PosY => NegZ.vector(),
            NegY => PosZ.vector(),
            _ => PosY.vector(),
        };
        let right = up.cross(&normal);

        let mut grid = [[Color::None; 3]; 3];
        for (row, line) in grid.iter_mut().enumerate() {
            for (col, color) in line.iter_mut().enumerate() {
                let target = normal + up * (1.0 - row as f32) + right * (col as f32 - 1.0);
                let cell = lattice::nearest_cell(&target);
                *color = self
                    .cubelets
                    .iter()
                    .find(|c| c.cell() == cell)
                    .map_or(Color::None, |c| c.color_facing(face));
            }
        }
        grid
    }

    /// Every face shows a single color.
    pub fn is_solved(&self) -> bool {
        Direction::ALL.into_iter().all(|face| {
            let grid = self.face_colors(face);
            let center = grid[1][1];
            center.is_face() && grid.iter().flatten().all(|&c| c == center)
        })
    }

    /// Largest distance of any cubelet from an exact lattice pose.
    pub fn max_drift(&self) -> f32 {
        self.cubelets
            .iter()
            .map(Cubelet::lattice_drift)
            .fold(0.0, f32::max)
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::solved()
    }
}

impl<'a> IntoIterator for &'a Cube {
    type Item = &'a Cubelet;
    type IntoIter = std::slice::Iter<'a, Cubelet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Every filled slot must face outward, toward the face of its own color.
fn check_stickers(cubelet: &Cubelet) -> CubeResult<()> {
    let cell = cubelet.home_cell();
    let expected = lattice::outward_faces(cell);
    if cubelet.sticker_count() != expected {
        return Err(CubeError::StickerCount {
            position: cell,
            expected,
            actual: cubelet.sticker_count(),
        });
    }

    for slot in Slot::ALL {
        let color = cubelet.sticker(slot);
        if !color.is_face() {
            continue;
        }
        let facing = Direction::from_vector(&cubelet.slot_facing(slot), 1e-3);
        let outward = facing.is_some_and(|d| {
            cell[d.axis().index()] as f32 == d.sign() && Color::of_face(d) == color
        });
        if !outward {
            return Err(CubeError::StickerMisplaced {
                position: cell,
                color,
            });
        }
    }
    Ok(())
}
