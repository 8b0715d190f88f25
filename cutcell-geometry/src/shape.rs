use crate::{AxisAlignedBoundingBox, AxisRectangle, Ray, Sphere, Surface, SurfaceHit};
use cutcell_traits::Real;
use nalgebra::{Point3, Scalar, Vector3};
use serde::{Deserialize, Serialize};

/// The closed set of shapes that can be embedded in a mesh.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub enum Shape<T: Scalar> {
    Sphere(Sphere<T>),
    Rectangle(AxisRectangle<T>),
}

impl<T: Scalar> From<Sphere<T>> for Shape<T> {
    fn from(sphere: Sphere<T>) -> Self {
        Self::Sphere(sphere)
    }
}

impl<T: Scalar> From<AxisRectangle<T>> for Shape<T> {
    fn from(rectangle: AxisRectangle<T>) -> Self {
        Self::Rectangle(rectangle)
    }
}

impl<T: Real> Surface<T> for Shape<T> {
    fn hit(&self, ray: &Ray<T>, t_min: T, t_max: T) -> Option<SurfaceHit<T>> {
        match self {
            Shape::Sphere(sphere) => sphere.hit(ray, t_min, t_max),
            Shape::Rectangle(rectangle) => rectangle.hit(ray, t_min, t_max),
        }
    }

    fn normal(&self, point: &Point3<T>) -> Vector3<T> {
        match self {
            Shape::Sphere(sphere) => sphere.normal(point),
            Shape::Rectangle(rectangle) => rectangle.normal(point),
        }
    }

    fn contains(&self, point: &Point3<T>) -> bool {
        match self {
            Shape::Sphere(sphere) => sphere.contains(point),
            Shape::Rectangle(rectangle) => rectangle.contains(point),
        }
    }

    fn bounding_box(&self) -> AxisAlignedBoundingBox<T> {
        match self {
            Shape::Sphere(sphere) => sphere.bounding_box(),
            Shape::Rectangle(rectangle) => rectangle.bounding_box(),
        }
    }
}

/// A [`SurfaceHit`] tagged with the id of the shape that produced it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitInfo<T: Scalar> {
    pub t: T,
    pub position: Point3<T>,
    pub ray_outside: bool,
    pub shape_id: usize,
}

/// Finds the closest hit in `[t_min, t_max]` among a collection of `(shape_id, surface)` pairs.
///
/// Ties are resolved in favor of the surface that comes first.
pub fn closest_hit<'a, T, S>(
    surfaces: impl IntoIterator<Item = (usize, &'a S)>,
    ray: &Ray<T>,
    t_min: T,
    t_max: T,
) -> Option<HitInfo<T>>
where
    T: Real,
    S: 'a + Surface<T> + ?Sized,
{
    let mut closest: Option<HitInfo<T>> = None;
    for (shape_id, surface) in surfaces {
        // Shrinking the upper bound lets each surface reject farther hits early
        let upper = closest.map(|hit| hit.t).unwrap_or(t_max);
        if let Some(hit) = surface.hit(ray, t_min, upper) {
            if closest.map_or(true, |current| hit.t < current.t) {
                closest = Some(HitInfo {
                    t: hit.t,
                    position: hit.position,
                    ray_outside: hit.ray_outside,
                    shape_id,
                });
            }
        }
    }
    closest
}
