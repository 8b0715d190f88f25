use cutcell_traits::Real;
use nalgebra::{Point3, Scalar, Vector3};

/// A ray `x(t) = origin + t * direction`.
///
/// The direction is deliberately not normalized: mesh lines use the grid spacing as direction so
/// that the ray parameter counts grid points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray<T: Scalar> {
    origin: Point3<T>,
    direction: Vector3<T>,
}

impl<T: Real> Ray<T> {
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> &Point3<T> {
        &self.origin
    }

    pub fn direction(&self) -> &Vector3<T> {
        &self.direction
    }

    pub fn point_at(&self, t: T) -> Point3<T> {
        self.origin + self.direction * t
    }
}
