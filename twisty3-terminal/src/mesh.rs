/// Triangle mesh of a single cubelet, tagged by face
use nalgebra::{Point3, Vector3};
use twisty3_core::{Axis, Direction, Slot};

/// A triangle lying on one face of the cubelet, in cubelet-local space.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
    pub face: Direction,
}

impl Triangle {
    pub fn normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0)).normalize()
    }

    /// Sticker slot drawn on this triangle's face, if any.
    pub fn slot(&self) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|s| Direction::new(s.local_axis(), true) == self.face)
    }
}

/// Mesh shared by every cubelet; each cubelet draws it with its own pose.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// An axis-aligned cube of edge `size` centered at the origin, two
    /// counter-clockwise triangles per face.
    pub fn cubelet(size: f32) -> Self {
        let half = size / 2.0;
        let mut triangles = Vec::with_capacity(12);

        for face in Direction::ALL {
            let normal = face.vector();
            // Tangents with u × v = normal.
            let (u, v) = match face.axis() {
                Axis::X => (Vector3::y(), Vector3::z()),
                Axis::Y => (Vector3::z(), Vector3::x()),
                Axis::Z => (Vector3::x(), Vector3::y()),
            };
            let u = u * face.sign();

            let corner = |a: f32, b: f32| Point3::from((normal + u * a + v * b) * half);
            let (c00, c10, c11, c01) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            triangles.push(Triangle {
                vertices: [c00, c10, c11],
                face,
            });
            triangles.push(Triangle {
                vertices: [c00, c11, c01],
                face,
            });
        }

        Self { triangles }
    }
}
