//! Rays and implicit surfaces used to locate embedded objects on a Cartesian mesh.
use cutcell_traits::Real;
use nalgebra::{Point3, Scalar, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod primitives;
mod ray;
mod shape;

pub use primitives::*;
pub use ray::*;
pub use shape::*;

/// The result of intersecting a [`Ray`] with a single [`Surface`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceHit<T: Scalar> {
    /// Ray parameter of the intersection.
    pub t: T,
    pub position: Point3<T>,
    /// `true` if the ray arrives from the outer side of the surface, i.e. the ray direction
    /// points against the outward normal. For closed shapes this is an entering hit.
    pub ray_outside: bool,
}

/// A surface that can be intersected with rays.
pub trait Surface<T: Real>: Debug {
    /// Returns the closest intersection with parameter in `[t_min, t_max]`, if any.
    fn hit(&self, ray: &Ray<T>, t_min: T, t_max: T) -> Option<SurfaceHit<T>>;

    /// The outward unit normal at a point assumed to lie on the surface.
    fn normal(&self, point: &Point3<T>) -> Vector3<T>;

    /// Whether the point lies strictly inside the enclosed volume.
    ///
    /// Surfaces that do not enclose a volume never contain any point.
    fn contains(&self, point: &Point3<T>) -> bool;

    fn bounding_box(&self) -> AxisAlignedBoundingBox<T>;
}

/// Determines whether a hit with the given direction and outward normal comes from outside.
pub(crate) fn arrives_from_outside<T: Real>(direction: &Vector3<T>, outward_normal: &Vector3<T>) -> bool {
    direction.dot(outward_normal) < T::zero()
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "Vector3<T>: Serialize",
    deserialize = "Vector3<T>: Deserialize<'de>"
))]
pub struct AxisAlignedBoundingBox<T: Scalar> {
    min: Vector3<T>,
    max: Vector3<T>,
}

impl<T: Real> AxisAlignedBoundingBox<T> {
    pub fn new(min: Vector3<T>, max: Vector3<T>) -> Self {
        for i in 0..3 {
            assert!(min[i] <= max[i]);
        }
        Self { min, max }
    }

    pub fn min(&self) -> &Vector3<T> {
        &self.min
    }

    pub fn max(&self) -> &Vector3<T> {
        &self.max
    }

    pub fn extents(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Computes the minimal bounding box which encloses both `this` and `other`.
    pub fn enclose(&self, other: &AxisAlignedBoundingBox<T>) -> Self {
        let min = self.min.zip_map(&other.min, |a, b| a.min(b));
        let max = self.max.zip_map(&other.max, |a, b| a.max(b));
        AxisAlignedBoundingBox::new(min, max)
    }

    /// Whether the closed interval of the box along `axis` contains `value`.
    pub fn spans(&self, axis: usize, value: T) -> bool {
        value >= self.min[axis] && value <= self.max[axis]
    }
}
