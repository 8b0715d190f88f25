use super::unit_mesh;
use cutcell::boundary::{object_boundaries, BoundaryKind, DomainBoundaries, EmbeddedObject};
use cutcell::geometry::MeshGeometry;
use cutcell::matrix::MatrixVisitor;
use cutcell::mesh::Direction;
use cutcell::operator::DirectionalOperator;
use cutcell::shape::Sphere;
use cutcell::stencil::PolynomialStencil;
use cutcell::visitor::{CooCollector, DenseMaterializer, UnitStrideRemap};
use nalgebra::{point, DMatrix};
use util::assert_approx_matrix_eq;

fn operator(
    extents: [usize; 3],
    direction: Direction,
    domain: DomainBoundaries,
    objects: &[EmbeddedObject<f64>],
) -> DirectionalOperator<f64> {
    let mesh = unit_mesh(extents);
    let geometry = MeshGeometry::new(&mesh, objects).unwrap();
    DirectionalOperator::new(
        direction,
        &PolynomialStencil::second_order(),
        &mesh,
        &geometry,
        &domain,
        &object_boundaries(objects),
    )
    .unwrap()
}

/// Second order first derivative on a line of `n` points with unit spacing and one-sided
/// closures at both ends.
fn one_sided_difference_matrix(n: usize) -> DMatrix<f64> {
    let mut expected = DMatrix::zeros(n, n);
    expected[(0, 0)] = -1.5;
    expected[(0, 1)] = 2.0;
    expected[(0, 2)] = -0.5;
    for i in 1..n - 1 {
        expected[(i, i - 1)] = -0.5;
        expected[(i, i + 1)] = 0.5;
    }
    expected[(n - 1, n - 3)] = 0.5;
    expected[(n - 1, n - 2)] = -2.0;
    expected[(n - 1, n - 1)] = 1.5;
    expected
}

#[test]
fn dense_materializer_can_exclude_dirichlet_columns() {
    let operator = operator(
        [5, 1, 1],
        Direction::X,
        DomainBoundaries::uniform(BoundaryKind::Dirichlet),
        &[],
    );

    let mut full = DenseMaterializer::new(5, 5);
    operator.accept_operator(&mut full);
    assert_approx_matrix_eq!(full.matrix(), &one_sided_difference_matrix(5), abstol = 1e-12);

    let mut unknowns = DenseMaterializer::new(5, 5).excluding_dirichlet();
    operator.accept_operator(&mut unknowns);
    let mut expected = one_sided_difference_matrix(5);
    expected[(0, 0)] = 0.0;
    expected[(4, 4)] = 0.0;
    assert_approx_matrix_eq!(unknowns.matrix(), &expected, abstol = 1e-12);
}

#[test]
fn coo_collector_agrees_with_dense_materializer() {
    let objects = [EmbeddedObject::new(
        3,
        Sphere::from_center_and_radius(point![5.0, 5.0, 5.0], 2.25),
        BoundaryKind::Dirichlet,
    )];
    let operator = operator([11, 11, 11], Direction::Z, DomainBoundaries::default(), &objects);
    let n = operator.num_points();

    let mut coo = CooCollector::new(n, n);
    operator.accept_operator(&mut coo);
    operator.accept_values(&mut coo);
    assert!(coo.coo().nnz() >= operator.values().nnz() + 2 * operator.block().len());

    let from_coo = DMatrix::from(&coo.to_csr());
    assert_approx_matrix_eq!(&from_coo, &operator.to_dense(), abstol = 1e-12);
}

#[test]
fn unit_stride_remap_extracts_a_single_line() {
    let extents = [4, 6, 3];
    let operator = operator(extents, Direction::Y, DomainBoundaries::default(), &[]);
    let mesh = unit_mesh(extents);
    let offset = mesh.flat_index([1, 0, 2]);
    let stride = mesh.stride(Direction::Y);

    let mut line = DenseMaterializer::new(6, 6);
    operator.accept_operator(&mut UnitStrideRemap::new(&mut line, offset, stride, 6));
    assert_approx_matrix_eq!(line.matrix(), &one_sided_difference_matrix(6), abstol = 1e-12);
}

#[test]
fn unit_stride_remap_forwards_dirichlet_entries() {
    struct Counter {
        regular: usize,
        dirichlet: usize,
    }

    impl MatrixVisitor<f64> for Counter {
        fn visit_entry(&mut self, _row: usize, _col: usize, _value: f64) {
            self.regular += 1;
        }

        fn visit_dirichlet_entry(&mut self, _row: usize, _col: usize, _value: f64) {
            self.dirichlet += 1;
        }
    }

    let extents = [3, 5, 2];
    let operator = operator(
        extents,
        Direction::Y,
        DomainBoundaries::default().with_walls(Direction::Y, [BoundaryKind::Dirichlet, BoundaryKind::Floating]),
        &[],
    );
    let mesh = unit_mesh(extents);
    let mut counter = Counter {
        regular: 0,
        dirichlet: 0,
    };
    let offset = mesh.flat_index([2, 0, 1]);
    operator.accept_operator(&mut UnitStrideRemap::new(&mut counter, offset, mesh.stride(Direction::Y), 5));
    // The flagged wall column of the left closure, then two nonzero taps per interior row
    assert_eq!(counter.dirichlet, 1);
    assert_eq!(counter.regular, 2 + 3 * 2 + 3);
}
