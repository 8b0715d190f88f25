//! Uniform Cartesian meshes and the mesh lines along each axis.
use cutcell_traits::Real;
use nalgebra::{convert, Point3, Scalar, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;

/// One of the three axis directions of a mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    X,
    Y,
    Z,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::X, Direction::Y, Direction::Z];

    pub fn axis(&self) -> usize {
        match self {
            Direction::X => 0,
            Direction::Y => 1,
            Direction::Z => 2,
        }
    }

    pub fn from_axis(axis: usize) -> Option<Self> {
        Self::ALL.get(axis).copied()
    }

    /// The `(slow, fast)` axes that enumerate the lines along this direction.
    pub fn transverse_axes(&self) -> (usize, usize) {
        match self {
            Direction::X => (2, 1),
            Direction::Y => (2, 0),
            Direction::Z => (1, 0),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::X => "x",
            Direction::Y => "y",
            Direction::Z => "z",
        };
        write!(f, "{}", name)
    }
}

/// A uniform Cartesian mesh of `nx * ny * nz` points spanning the box `[min, max]`.
///
/// Points are numbered with `x` fastest: the flat index of `[i, j, k]` is
/// `i + nx * (j + ny * k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<T: Scalar> {
    extents: [usize; 3],
    min: Point3<T>,
    max: Point3<T>,
}

impl<T: Real> Mesh<T> {
    /// # Panics
    ///
    /// Panics if an extent is zero, or if `min` is not strictly below `max` along an axis with
    /// more than one point.
    pub fn new(extents: [usize; 3], min: Point3<T>, max: Point3<T>) -> Self {
        for axis in 0..3 {
            assert!(extents[axis] > 0, "Mesh extents must be positive.");
            assert!(
                extents[axis] == 1 || min[axis] < max[axis],
                "Mesh bounds must be increasing along axis {}.",
                axis
            );
        }
        Self { extents, min, max }
    }

    pub fn extents(&self) -> [usize; 3] {
        self.extents
    }

    pub fn extent(&self, direction: Direction) -> usize {
        self.extents[direction.axis()]
    }

    pub fn min(&self) -> &Point3<T> {
        &self.min
    }

    pub fn max(&self) -> &Point3<T> {
        &self.max
    }

    /// Total number of mesh points.
    pub fn num_points(&self) -> usize {
        self.extents.iter().product()
    }

    /// Distance between neighboring points along each axis. Axes with a single point have unit
    /// spacing.
    pub fn spacing(&self) -> Vector3<T> {
        Vector3::from_fn(|axis, _| match self.extents[axis] {
            1 => T::one(),
            n => (self.max[axis] - self.min[axis]) / convert::<f64, T>((n - 1) as f64),
        })
    }

    pub fn flat_index(&self, [i, j, k]: [usize; 3]) -> usize {
        let [nx, ny, _] = self.extents;
        i + nx * (j + ny * k)
    }

    pub fn grid_index(&self, flat: usize) -> [usize; 3] {
        let [nx, ny, _] = self.extents;
        [flat % nx, (flat / nx) % ny, flat / (nx * ny)]
    }

    pub fn position(&self, index: [usize; 3]) -> Point3<T> {
        let h = self.spacing();
        Point3::from(Vector3::from_fn(|axis, _| {
            self.min[axis] + h[axis] * convert::<f64, T>(index[axis] as f64)
        }))
    }

    /// The flat index step between consecutive points of a line along `direction`.
    pub fn stride(&self, direction: Direction) -> usize {
        let [nx, ny, _] = self.extents;
        match direction {
            Direction::X => 1,
            Direction::Y => nx,
            Direction::Z => nx * ny,
        }
    }

    /// Number of `(slow, fast)` line indices along `direction`.
    pub fn line_counts(&self, direction: Direction) -> (usize, usize) {
        let (slow, fast) = direction.transverse_axes();
        (self.extents[slow], self.extents[fast])
    }

    /// The grid index of point `coordinate` on line `(slow, fast)` along `direction`.
    pub fn line_index(&self, direction: Direction, slow: usize, fast: usize, coordinate: usize) -> [usize; 3] {
        let (slow_axis, fast_axis) = direction.transverse_axes();
        let mut index = [0; 3];
        index[slow_axis] = slow;
        index[fast_axis] = fast;
        index[direction.axis()] = coordinate;
        index
    }

    /// The flat index of point `coordinate` on line `(slow, fast)` along `direction`.
    pub fn line_point(&self, direction: Direction, slow: usize, fast: usize, coordinate: usize) -> usize {
        self.flat_index(self.line_index(direction, slow, fast, coordinate))
    }
}
