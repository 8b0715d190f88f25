use crate::{arrives_from_outside, AxisAlignedBoundingBox, Ray, Surface, SurfaceHit};
use cutcell_traits::Real;
use nalgebra::{Point3, Scalar, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, Point3<T>: Serialize",
    deserialize = "T: Deserialize<'de>, Point3<T>: Deserialize<'de>"
))]
pub struct Sphere<T: Scalar> {
    center: Point3<T>,
    radius: T,
}

impl<T: Real> Sphere<T> {
    pub fn from_center_and_radius(center: Point3<T>, radius: T) -> Self {
        assert!(radius > T::zero(), "Sphere radius must be positive.");
        Self { center, radius }
    }

    pub fn center(&self) -> &Point3<T> {
        &self.center
    }

    pub fn radius(&self) -> T {
        self.radius
    }
}

impl<T: Real> Surface<T> for Sphere<T> {
    fn hit(&self, ray: &Ray<T>, t_min: T, t_max: T) -> Option<SurfaceHit<T>> {
        let d = ray.direction();
        let oc = ray.origin() - self.center;
        let a = d.norm_squared();
        let half_b = oc.dot(d);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;

        // Tangential rays touch the sphere without entering it
        if a == T::zero() || discriminant <= T::zero() {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let near = (-half_b - sqrt_d) / a;
        let far = (-half_b + sqrt_d) / a;
        let t = [near, far]
            .into_iter()
            .find(|t| *t >= t_min && *t <= t_max)?;

        let position = ray.point_at(t);
        let normal = self.normal(&position);
        Some(SurfaceHit {
            t,
            position,
            ray_outside: arrives_from_outside(d, &normal),
        })
    }

    fn normal(&self, point: &Point3<T>) -> Vector3<T> {
        (point - self.center) / self.radius
    }

    fn contains(&self, point: &Point3<T>) -> bool {
        (point - self.center).norm_squared() < self.radius * self.radius
    }

    fn bounding_box(&self) -> AxisAlignedBoundingBox<T> {
        let r = Vector3::repeat(self.radius);
        AxisAlignedBoundingBox::new(self.center.coords - r, self.center.coords + r)
    }
}
