use cutcell_geometry::{closest_hit, AxisRectangle, Outward, Ray, RectanglePlane, Shape, Sphere, Surface};
use matrixcompare::assert_scalar_eq;
use nalgebra::{point, Point3, Vector3};

fn shapes() -> Vec<(usize, Shape<f64>)> {
    vec![
        (7, Sphere::from_center_and_radius(point![5.0, 0.0, 0.0], 1.0).into()),
        (
            3,
            AxisRectangle::new(RectanglePlane::Yz, 2.0, [[-1.0, 1.0], [-1.0, 1.0]], Outward::Negative).into(),
        ),
    ]
}

#[test]
fn closest_hit_picks_nearest_surface_and_tags_id() {
    let shapes = shapes();
    let ray = Ray::new(Point3::origin(), Vector3::x());
    let surfaces = || shapes.iter().map(|(id, shape)| (*id, shape));

    let first = closest_hit(surfaces(), &ray, 0.0, 100.0).unwrap();
    assert_eq!(first.shape_id, 3);
    assert_scalar_eq!(first.t, 2.0, comp = abs, tol = 1e-14);
    assert!(first.ray_outside);

    let second = closest_hit(surfaces(), &ray, 2.5, 100.0).unwrap();
    assert_eq!(second.shape_id, 7);
    assert_scalar_eq!(second.t, 4.0, comp = abs, tol = 1e-14);

    let third = closest_hit(surfaces(), &ray, 4.5, 100.0).unwrap();
    assert_eq!(third.shape_id, 7);
    assert!(!third.ray_outside);

    assert!(closest_hit(surfaces(), &ray, 6.5, 100.0).is_none());
}

#[test]
fn shape_dispatches_to_variant() {
    let sphere = Sphere::from_center_and_radius(Point3::origin(), 1.0);
    let shape = Shape::from(sphere);
    let ray = Ray::new(point![-2.0, 0.0, 0.0], Vector3::x());
    assert_eq!(shape.hit(&ray, 0.0, 10.0), sphere.hit(&ray, 0.0, 10.0));
    assert!(shape.contains(&Point3::origin()));
    assert_eq!(shape.bounding_box(), sphere.bounding_box());
}

#[test]
fn shape_serde_uses_type_tag() {
    let json = r#"{ "type": "sphere", "center": [1.0, 2.0, 3.0], "radius": 0.5 }"#;
    let shape: Shape<f64> = serde_json::from_str(json).unwrap();
    assert_eq!(shape, Shape::Sphere(Sphere::from_center_and_radius(point![1.0, 2.0, 3.0], 0.5)));

    let rectangle: Shape<f64> =
        AxisRectangle::new(RectanglePlane::Xz, 1.0, [[0.0, 1.0], [2.0, 3.0]], Outward::Positive).into();
    let serialized = serde_json::to_string(&rectangle).unwrap();
    assert!(serialized.contains(r#""type":"rectangle""#));
    assert!(serialized.contains(r#""plane":"xz""#));
    let deserialized: Shape<f64> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, rectangle);
}
