/// Axes, face directions and the integer lattice cubelets live on
use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};
use strum::{Display, EnumIter};

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f32> {
        let mut v = Vector3::zeros();
        v[self.index()] = 1.0;
        v
    }

    pub fn unit_axis(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }

    /// Coordinate of `v` along this axis.
    pub fn component(self, v: &Vector3<f32>) -> f32 {
        v[self.index()]
    }
}

/// An axis-aligned unit direction; one per face of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    pub fn new(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Direction::PosX,
            (Axis::X, false) => Direction::NegX,
            (Axis::Y, true) => Direction::PosY,
            (Axis::Y, false) => Direction::NegY,
            (Axis::Z, true) => Direction::PosZ,
            (Axis::Z, false) => Direction::NegZ,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::PosX | Direction::NegX => Axis::X,
            Direction::PosY | Direction::NegY => Axis::Y,
            Direction::PosZ | Direction::NegZ => Axis::Z,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::PosX | Direction::PosY | Direction::PosZ => 1.0,
            _ => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        Direction::new(self.axis(), self.sign() < 0.0)
    }

    pub fn vector(self) -> Vector3<f32> {
        self.axis().unit() * self.sign()
    }

    /// Axis-aligned direction within `tolerance` of the unit vector `v`.
    pub fn from_vector(v: &Vector3<f32>, tolerance: f32) -> Option<Self> {
        Direction::ALL
            .into_iter()
            .find(|d| (d.vector() - v).norm() < tolerance)
    }

    /// Axis-aligned direction closest to `v`. Ties resolve toward X, then Y.
    pub fn nearest(v: &Vector3<f32>) -> Self {
        let axis = if v.x.abs() >= v.y.abs() && v.x.abs() >= v.z.abs() {
            Axis::X
        } else if v.y.abs() >= v.z.abs() {
            Axis::Y
        } else {
            Axis::Z
        };
        Direction::new(axis, axis.component(v) >= 0.0)
    }

    /// Integer form, as used by construction tables.
    pub fn cell(self) -> [i8; 3] {
        let mut cell = [0; 3];
        cell[self.axis().index()] = self.sign() as i8;
        cell
    }
}

/// True for the 26 cells of a 3×3×3 puzzle: coordinates in {-1, 0, 1}, origin excluded.
pub fn is_cubelet_cell(cell: [i8; 3]) -> bool {
    cell.iter().all(|c| (-1..=1).contains(c)) && cell != [0, 0, 0]
}

/// Number of nonzero coordinates: 1 for centers, 2 for edges, 3 for corners.
pub fn outward_faces(cell: [i8; 3]) -> usize {
    cell.iter().filter(|&&c| c != 0).count()
}

pub fn cell_vector(cell: [i8; 3]) -> Vector3<f32> {
    Vector3::new(cell[0] as f32, cell[1] as f32, cell[2] as f32)
}

/// Nearest integer cell to a world position.
pub fn nearest_cell(v: &Vector3<f32>) -> [i8; 3] {
    [v.x.round() as i8, v.y.round() as i8, v.z.round() as i8]
}

/// Distance from `v` to the nearest integer point.
pub fn translation_drift(v: &Vector3<f32>) -> f32 {
    (v - v.map(f32::round)).norm()
}

/// Frobenius distance from a rotation to the nearest signed permutation matrix.
pub fn rotation_drift(rotation: &UnitQuaternion<f32>) -> f32 {
    let m = rotation.to_rotation_matrix().into_inner();
    (m - m.map(f32::round)).norm()
}

/// Rotation with exact 0/±1 entries closest to `rotation`.
///
/// Returns `None` when the rounded matrix is not a proper rotation, which means
/// the input was caught mid-turn rather than drifted.
pub fn snap_rotation(rotation: &UnitQuaternion<f32>) -> Option<UnitQuaternion<f32>> {
    let m: Matrix3<f32> = rotation.to_rotation_matrix().into_inner().map(f32::round);
    let signed_permutation = (0..3).all(|j| {
        m.column(j).iter().filter(|x| **x != 0.0).count() == 1
            && m.row(j).iter().filter(|x| **x != 0.0).count() == 1
    });
    if !signed_permutation || m.determinant() < 0.0 {
        return None;
    }
    Some(UnitQuaternion::from_rotation_matrix(
        &Rotation3::from_matrix_unchecked(m),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_lattice_cells() {
        assert!(is_cubelet_cell([1, -1, 0]));
        assert!(!is_cubelet_cell([0, 0, 0]));
        assert!(!is_cubelet_cell([2, 0, 0]));
        assert_eq!(outward_faces([1, 0, 0]), 1);
        assert_eq!(outward_faces([1, 0, -1]), 2);
        assert_eq!(outward_faces([-1, 1, -1]), 3);
    }

    #[test]
    fn test_direction_vectors() {
        for direction in Direction::ALL {
            let v = direction.vector();
            assert_eq!(Direction::from_vector(&v, 1e-3), Some(direction));
            assert_eq!(cell_vector(direction.cell()), v);
            assert_abs_diff_eq!(direction.opposite().vector(), -v);
        }
        assert_eq!(Direction::from_vector(&Vector3::new(0.7, 0.7, 0.0), 1e-3), None);
        assert_eq!(Direction::nearest(&Vector3::new(0.2, -0.9, 0.3)), Direction::NegY);
    }

    #[test]
    fn test_snap_rotation_removes_drift() {
        let exact = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let drifted = exact * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 2e-4);
        assert!(rotation_drift(&drifted) > 0.0);

        let snapped = snap_rotation(&drifted).unwrap();
        assert!(rotation_drift(&snapped) < 1e-5);
        assert_abs_diff_eq!(
            snapped.to_rotation_matrix(),
            exact.to_rotation_matrix(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_snap_rotation_rejects_mid_turn() {
        let halfway = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2 / 2.0);
        assert!(snap_rotation(&halfway).is_none());
    }

    #[test]
    fn test_translation_drift() {
        let v = Vector3::new(1.0004, -0.9998, 0.0);
        assert!(translation_drift(&v) < 1e-3);
        assert_eq!(nearest_cell(&v), [1, -1, 0]);
    }
}
