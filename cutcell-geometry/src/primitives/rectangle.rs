use crate::{arrives_from_outside, AxisAlignedBoundingBox, Ray, Surface, SurfaceHit};
use cutcell_traits::Real;
use nalgebra::{Point3, Scalar, Vector3};
use serde::{Deserialize, Serialize};

/// The coordinate plane an [`AxisRectangle`] lies in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectanglePlane {
    Xy,
    Xz,
    Yz,
}

impl RectanglePlane {
    /// The axis perpendicular to the plane.
    pub fn normal_axis(&self) -> usize {
        match self {
            RectanglePlane::Xy => 2,
            RectanglePlane::Xz => 1,
            RectanglePlane::Yz => 0,
        }
    }

    /// The two axes spanning the plane, in increasing order.
    pub fn tangent_axes(&self) -> [usize; 2] {
        match self {
            RectanglePlane::Xy => [0, 1],
            RectanglePlane::Xz => [0, 2],
            RectanglePlane::Yz => [1, 2],
        }
    }
}

/// Which side of a rectangle is considered outside.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outward {
    /// The outward normal points along the positive normal axis.
    Positive,
    Negative,
}

/// A planar, axis-aligned rectangle.
///
/// Rectangles do not enclose a volume by themselves, but several rectangles with consistent
/// outward sides describe the faces of a box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct AxisRectangle<T: Scalar> {
    plane: RectanglePlane,
    offset: T,
    /// Closed intervals along the two tangent axes.
    bounds: [[T; 2]; 2],
    outward: Outward,
}

impl<T: Real> AxisRectangle<T> {
    /// Creates a rectangle in `plane` at coordinate `offset` along the normal axis, covering
    /// `bounds[i]` along `plane.tangent_axes()[i]`.
    pub fn new(plane: RectanglePlane, offset: T, bounds: [[T; 2]; 2], outward: Outward) -> Self {
        for [lower, upper] in bounds {
            assert!(lower <= upper, "Rectangle bounds must be non-decreasing.");
        }
        Self {
            plane,
            offset,
            bounds,
            outward,
        }
    }

    pub fn plane(&self) -> RectanglePlane {
        self.plane
    }

    pub fn offset(&self) -> T {
        self.offset
    }

    pub fn bounds(&self) -> &[[T; 2]; 2] {
        &self.bounds
    }

    pub fn outward(&self) -> Outward {
        self.outward
    }

    /// Returns the same rectangle with the outward side flipped.
    pub fn flipped(&self) -> Self {
        let outward = match self.outward {
            Outward::Positive => Outward::Negative,
            Outward::Negative => Outward::Positive,
        };
        Self { outward, ..*self }
    }

    fn outward_normal(&self) -> Vector3<T> {
        let mut n = Vector3::zeros();
        n[self.plane.normal_axis()] = match self.outward {
            Outward::Positive => T::one(),
            Outward::Negative => -T::one(),
        };
        n
    }
}

impl<T: Real> Surface<T> for AxisRectangle<T> {
    fn hit(&self, ray: &Ray<T>, t_min: T, t_max: T) -> Option<SurfaceHit<T>> {
        let axis = self.plane.normal_axis();
        let d = ray.direction();
        if d[axis] == T::zero() {
            return None;
        }

        let t = (self.offset - ray.origin()[axis]) / d[axis];
        if t < t_min || t > t_max {
            return None;
        }

        let mut position = ray.point_at(t);
        position[axis] = self.offset;
        for (tangent_axis, [lower, upper]) in self.plane.tangent_axes().into_iter().zip(self.bounds) {
            let x = position[tangent_axis];
            if x < lower || x > upper {
                return None;
            }
        }

        Some(SurfaceHit {
            t,
            position,
            ray_outside: arrives_from_outside(d, &self.outward_normal()),
        })
    }

    fn normal(&self, _point: &Point3<T>) -> Vector3<T> {
        self.outward_normal()
    }

    fn contains(&self, _point: &Point3<T>) -> bool {
        false
    }

    fn bounding_box(&self) -> AxisAlignedBoundingBox<T> {
        let mut min = Vector3::repeat(self.offset);
        let mut max = Vector3::repeat(self.offset);
        for (axis, [lower, upper]) in self.plane.tangent_axes().into_iter().zip(self.bounds) {
            min[axis] = lower;
            max[axis] = upper;
        }
        AxisAlignedBoundingBox::new(min, max)
    }
}
