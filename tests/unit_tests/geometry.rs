use super::unit_mesh;
use cutcell::boundary::{BoundaryKind, EmbeddedObject};
use cutcell::geometry::{GeometryError, MeshGeometry};
use cutcell::mesh::Direction;
use cutcell::shape::{AxisRectangle, Outward, RectanglePlane, Sphere};
use matrixcompare::assert_scalar_eq;
use nalgebra::{point, Point3};

fn sphere(id: usize, center: Point3<f64>, radius: f64) -> EmbeddedObject<f64> {
    EmbeddedObject::new(id, Sphere::from_center_and_radius(center, radius), BoundaryKind::Dirichlet)
}

#[test]
fn sphere_on_single_line() {
    let mesh = unit_mesh([8, 1, 1]);
    let objects = [sphere(7, point![3.5, 0.0, 0.0], 1.2)];
    let geometry = MeshGeometry::new(&mesh, &objects).unwrap();
    let x = geometry.direction(Direction::X);

    assert_eq!(x.records().len(), 2);
    let [entry, exit] = [x.records()[0], x.records()[1]];

    assert!(entry.ray_outside);
    assert_eq!(entry.fluid_coord, 2);
    assert_eq!(entry.solid_coord, 3);
    assert_scalar_eq!(entry.psi, 0.3, comp = abs, tol = 1e-12);
    assert_scalar_eq!(entry.position.x, 2.3, comp = abs, tol = 1e-12);

    assert!(!exit.ray_outside);
    assert_eq!(exit.fluid_coord, 5);
    assert_eq!(exit.solid_coord, 4);
    assert_scalar_eq!(exit.psi, 0.3, comp = abs, tol = 1e-12);

    assert!(entry.shape_id == 7 && exit.shape_id == 7);
    assert_eq!(x.records_for_shape(7), &[0, 1]);
    assert!(x.records_for_shape(3).is_empty());
    assert_eq!(x.solid_points(), &[3, 4]);
    assert_eq!(x.solid_points_on_line(0, 0), &[3, 4]);
    assert_eq!(x.storage_index(0), 3);
    assert_eq!(x.storage_index(1), 4);

    // Lines of a single point are not intersected
    assert!(geometry.direction(Direction::Y).records().is_empty());
    assert!(geometry.direction(Direction::Z).records().is_empty());
}

#[test]
fn line_starting_inside_object_is_solid_from_its_first_point() {
    let mesh = unit_mesh([6, 1, 1]);
    let objects = [sphere(0, point![0.0, 0.0, 0.0], 2.5)];
    let geometry = MeshGeometry::new(&mesh, &objects).unwrap();
    let x = geometry.direction(Direction::X);

    assert_eq!(x.records().len(), 1);
    let exit = x.records()[0];
    assert!(!exit.is_entering());
    assert_eq!(exit.fluid_coord, 3);
    assert_scalar_eq!(exit.psi, 0.5, comp = abs, tol = 1e-12);
    assert_eq!(x.solid_points(), &[0, 1, 2]);
}

#[test]
fn rectangles_bound_a_slab() {
    let mesh = unit_mesh([8, 2, 1]);
    let bounds = [[-1.0, 5.0], [-1.0, 1.0]];
    let objects = [
        EmbeddedObject::new(
            1,
            AxisRectangle::new(RectanglePlane::Yz, 2.5, bounds, Outward::Negative),
            BoundaryKind::Neumann,
        ),
        EmbeddedObject::new(
            2,
            AxisRectangle::new(RectanglePlane::Yz, 4.5, bounds, Outward::Positive),
            BoundaryKind::Neumann,
        ),
    ];
    let geometry = MeshGeometry::new(&mesh, &objects).unwrap();
    let x = geometry.direction(Direction::X);

    // Two lines (y = 0 and y = 1), each crossing both faces
    assert_eq!(x.records().len(), 4);
    for slow_fast in [(0, 0), (0, 1)] {
        let records = x.records_on_line(slow_fast.0, slow_fast.1);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_entering() && records[0].shape_id == 1);
        assert_eq!((records[0].fluid_coord, records[0].solid_coord), (2, 3));
        assert!(!records[1].is_entering() && records[1].shape_id == 2);
        assert_eq!((records[1].fluid_coord, records[1].solid_coord), (5, 4));
    }
    assert_eq!(x.solid_points(), &[3, 4, 11, 12]);
    assert_eq!(x.records_for_shape(2), &[1, 3]);
}

#[test]
fn sphere_geometry_is_consistent_in_all_directions() {
    let mesh = unit_mesh([11, 11, 11]);
    let center = point![5.0, 5.0, 5.0];
    let radius = 2.25;
    let objects = [sphere(3, center, radius)];
    let geometry = MeshGeometry::new(&mesh, &objects).unwrap();

    for direction in Direction::ALL {
        let g = geometry.direction(direction);
        // 21 lines pass through the sphere, and the ball contains 57 grid points
        assert_eq!(g.records().len(), 42);
        assert_eq!(g.solid_points().len(), 57);
        assert!(g.solid_points().len() >= g.records().len());

        for record in g.records() {
            assert!(record.psi > 0.0 && record.psi <= 1.0);
            let fluid = mesh.position(mesh.line_index(direction, record.slow, record.fast, record.fluid_coord));
            let solid = mesh.position(mesh.line_index(direction, record.slow, record.fast, record.solid_coord));
            assert!((fluid - center).norm() > radius);
            assert!((solid - center).norm() <= radius);
            assert_scalar_eq!((record.position - center).norm(), radius, comp = abs, tol = 1e-12);
        }
        for point in g.solid_points() {
            let position = mesh.position(mesh.grid_index(*point));
            assert!((position - center).norm() <= radius);
        }
    }
}

#[test]
fn thin_object_without_solid_points_violates_coverage() {
    let mesh = unit_mesh([4, 3, 3]);
    let objects = [sphere(0, point![1.5, 1.0, 1.0], 0.3)];
    assert_eq!(
        MeshGeometry::new(&mesh, &objects),
        Err(GeometryError::InsufficientSolidPoints {
            direction: Direction::X,
            solid_points: 0,
            records: 2
        })
    );
}

#[test]
fn overlapping_objects_are_rejected() {
    let mesh = unit_mesh([12, 1, 1]);
    let objects = [
        sphere(1, point![4.0, 0.0, 0.0], 2.1),
        sphere(2, point![6.5, 0.0, 0.0], 2.1),
    ];
    assert_eq!(
        MeshGeometry::new(&mesh, &objects),
        Err(GeometryError::NonAlternatingRecords {
            direction: Direction::X,
            slow: 0,
            fast: 0
        })
    );
}

#[test]
fn line_inside_object_is_rejected() {
    let mesh = unit_mesh([5, 2, 1]);
    let objects = [sphere(1, point![2.0, 0.0, 0.0], 10.0)];
    let error = MeshGeometry::new(&mesh, &objects).unwrap_err();
    assert_eq!(
        error,
        GeometryError::FullySolidLine {
            direction: Direction::X,
            slow: 0,
            fast: 0
        }
    );
    assert!(error.to_string().contains("entirely inside"));
}

#[test]
fn line_starting_on_surface_inside_object_is_rejected() {
    // The entering crossing lies exactly on the first point and the exit beyond the last
    let mesh = unit_mesh([5, 1, 1]);
    let objects = [sphere(1, point![5.0, 0.0, 0.0], 5.0)];
    assert_eq!(
        MeshGeometry::new(&mesh, &objects),
        Err(GeometryError::FullySolidLine {
            direction: Direction::X,
            slow: 0,
            fast: 0
        })
    );
}
