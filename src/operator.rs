//! Assembly and application of directional derivative operators.
use crate::boundary::{BoundaryKind, DomainBoundaries, ObjectBoundaries};
use crate::geometry::{DirectionGeometry, MeshGeometry};
use crate::lines::{lines, Boundary, Line};
use crate::mesh::{Direction, Mesh};
use crate::stencil::{Stencil, StencilShape};
use crate::visitor::DenseMaterializer;
use cutcell_matrix::{
    ApplyPolicy, Block, BlockBuilder, Circulant, Composite, Csr, CsrBuilder, Dense, MatrixVisitor, Operator,
};
use cutcell_traits::Real;
use log::debug;
use nalgebra::DMatrix;
use std::error::Error;
use std::fmt;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorError {
    /// A line has too few points to hold the boundary blocks of both of its ends.
    LineTooShort {
        direction: Direction,
        slow: usize,
        fast: usize,
        points: usize,
        required: usize,
    },
    /// A line ends at an object whose boundary kind is not known.
    UnknownObject(usize),
}

impl Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorError::LineTooShort {
                direction,
                slow,
                fast,
                points,
                required,
            } => write!(
                f,
                "A line at ({}, {}) along {} has {} points, but its boundary closures need {}.",
                slow, fast, direction, points, required
            ),
            OperatorError::UnknownObject(id) => write!(f, "No boundary kind is known for object {}.", id),
        }
    }
}

impl Error for OperatorError {}

/// The first derivative along one direction, assembled for a mesh with embedded objects.
///
/// The operator consists of three parts acting on fields of the full mesh size:
///
/// - `O`, a [`Block`] with one composite per line, acting on fluid points,
/// - `B`, a sparse map reading boundary values from the solid points where they are stored,
/// - `N`, a sparse map reading prescribed boundary derivatives, stored at solid points for
///   objects and at the wall point for domain walls.
///
/// Rows of solid points are never written.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalOperator<T: Real> {
    direction: Direction,
    num_points: usize,
    interior: Circulant<T>,
    block: Block<T>,
    values: Csr<T>,
    derivatives: Csr<T>,
}

/// Coefficients of one end of a line, ready to be placed.
struct WallClosure<T: Real> {
    dense: Dense<T>,
    shape: StencilShape,
}

impl<T: Real> WallClosure<T> {
    fn is_single_point(&self) -> bool {
        self.shape.rows == 1 && self.shape.columns == 1
    }
}

/// Collects the output of the stencil for one direction.
struct Assembler<'a, T: Real, S: ?Sized> {
    stencil: &'a S,
    geometry: &'a DirectionGeometry<T>,
    domain: [BoundaryKind; 2],
    objects: &'a ObjectBoundaries,
    spacing: T,
    values: CsrBuilder<T>,
    derivatives: CsrBuilder<T>,
    coefficients: Vec<T>,
    extra: Vec<T>,
}

impl<'a, T, S> Assembler<'a, T, S>
where
    T: Real,
    S: ?Sized + Stencil<T>,
{
    fn boundary_kind(&self, boundary: &Boundary<T>, is_right_wall: bool) -> Result<BoundaryKind, OperatorError> {
        match &boundary.object {
            None => Ok(self.domain[is_right_wall as usize]),
            Some(object) => self
                .objects
                .get(&object.object_id)
                .copied()
                .ok_or(OperatorError::UnknownObject(object.object_id)),
        }
    }

    /// Computes the boundary block of one end of `line` and routes boundary value and
    /// derivative coefficients into `B` and `N`.
    fn closure(&mut self, line: &Line<T>, is_right_wall: bool) -> Result<WallClosure<T>, OperatorError> {
        let boundary = if is_right_wall { &line.end } else { &line.start };
        let kind = self.boundary_kind(boundary, is_right_wall)?;

        // Domain walls lie on a mesh point: Dirichlet values are read from the wall point itself,
        // so its column uses floating coefficients
        let (stencil_kind, psi) = match (&boundary.object, kind) {
            (None, BoundaryKind::Dirichlet) => (BoundaryKind::Floating, T::zero()),
            (None, kind) => (kind, T::zero()),
            (Some(object), kind) => (kind, object.psi),
        };
        let shape = self.stencil.query(stencil_kind);
        self.coefficients.resize(shape.rows * shape.columns, T::zero());
        self.extra.resize(shape.rows * shape.extra, T::zero());
        self.stencil.coefficients(
            self.spacing,
            stencil_kind,
            psi,
            is_right_wall,
            &mut self.coefficients,
            &mut self.extra,
        );

        let n = line.len();
        let dense_columns = match (&boundary.object, stencil_kind) {
            (Some(_), BoundaryKind::Dirichlet) => shape.columns - 1,
            _ => shape.columns,
        };
        if shape.rows > n || dense_columns > n {
            return Err(OperatorError::LineTooShort {
                direction: line.direction,
                slow: line.slow,
                fast: line.fast,
                points: n,
                required: shape.rows.max(dense_columns),
            });
        }

        // Global index of row `i` of the block
        let row_index = |i: usize| {
            if is_right_wall {
                line.mesh_index(n - shape.rows + i)
            } else {
                line.mesh_index(i)
            }
        };
        let storage = boundary
            .object
            .map(|object| self.geometry.storage_index(object.object_coordinate))
            .unwrap_or(boundary.mesh_index);

        let dense = match (&boundary.object, kind) {
            (Some(_), BoundaryKind::Dirichlet) => {
                // Split off the boundary value column
                let boundary_column = if is_right_wall { shape.columns - 1 } else { 0 };
                let mut data = Vec::with_capacity(shape.rows * dense_columns);
                for i in 0..shape.rows {
                    for j in 0..shape.columns {
                        let c = self.coefficients[i * shape.columns + j];
                        if j == boundary_column {
                            if c != T::zero() {
                                self.values.add(row_index(i), storage, c);
                            }
                        } else {
                            data.push(c);
                        }
                    }
                }
                Dense::from_row_slice(shape.rows, dense_columns, &data)
            }
            (None, BoundaryKind::Dirichlet) => {
                Dense::from_row_slice(shape.rows, shape.columns, &self.coefficients)
                    .with_dirichlet(!is_right_wall, is_right_wall)
            }
            (_, BoundaryKind::Neumann) => {
                debug_assert_eq!(shape.extra, 1, "Neumann closures read a single boundary derivative.");
                for i in 0..shape.rows {
                    let e = self.extra[i * shape.extra];
                    if e != T::zero() {
                        self.derivatives.add(row_index(i), storage, e);
                    }
                }
                Dense::from_row_slice(shape.rows, shape.columns, &self.coefficients)
            }
            (_, BoundaryKind::Floating) => Dense::from_row_slice(shape.rows, shape.columns, &self.coefficients),
        };

        Ok(WallClosure {
            dense,
            shape: StencilShape {
                columns: dense_columns,
                ..shape
            },
        })
    }
}

impl<T: Real> DirectionalOperator<T> {
    /// Assembles the derivative along `direction`.
    ///
    /// Every line of fluid points contributes one composite: a left closure, the shared
    /// interior window and a right closure.
    pub fn new<S>(
        direction: Direction,
        stencil: &S,
        mesh: &Mesh<T>,
        geometry: &MeshGeometry<T>,
        domain: &DomainBoundaries,
        objects: &ObjectBoundaries,
    ) -> Result<Self, OperatorError>
    where
        S: ?Sized + Stencil<T>,
    {
        let num_points = mesh.num_points();
        let direction_geometry = geometry.direction(direction);
        let spacing = mesh.spacing()[direction.axis()];

        let mut window = vec![T::zero(); stencil.interior_width()];
        stencil.interior(spacing, &mut window);
        let interior = Circulant::new(window, 0);
        let p = interior.half_width();

        let mut assembler = Assembler {
            stencil,
            geometry: direction_geometry,
            domain: domain.along(direction),
            objects,
            spacing,
            values: CsrBuilder::new(num_points, num_points),
            derivatives: CsrBuilder::new(num_points, num_points),
            coefficients: Vec::new(),
            extra: Vec::new(),
        };

        let lines = lines(mesh, direction_geometry);
        let mut block = BlockBuilder::with_capacity(lines.len());
        for line in &lines {
            let left = assembler.closure(line, false)?;
            let right = assembler.closure(line, true)?;

            let n = line.len();
            let boundary_rows = left.shape.rows + right.shape.rows;
            if n == 1 && p == 0 && left.is_single_point() && right.is_single_point() {
                // Both closures act on the same point; the left one provides the row
                let dirichlet = left.dense.first_is_dirichlet() || right.dense.last_is_dirichlet();
                let composite = Composite::new(
                    left.dense.with_dirichlet(dirichlet, false),
                    interior.with_rows(0),
                    Dense::zeros(0, 0),
                )
                .with_placement(line.start.mesh_index, line.stride);
                block.add(composite);
                continue;
            }
            if n < boundary_rows || left.shape.rows < p || right.shape.rows < p {
                return Err(OperatorError::LineTooShort {
                    direction,
                    slow: line.slow,
                    fast: line.fast,
                    points: n,
                    required: boundary_rows.max(2 * p),
                });
            }

            let composite = Composite::new(left.dense, interior.with_rows(n - boundary_rows), right.dense)
                .with_placement(line.start.mesh_index, line.stride);
            block.add(composite);
        }

        let values = assembler.values.build();
        let derivatives = assembler.derivatives.build();
        debug!(
            "Assembled operator along {}: {} lines, {} boundary value entries, {} boundary derivative entries.",
            direction,
            lines.len(),
            values.nnz(),
            derivatives.nnz()
        );

        Ok(Self {
            direction,
            num_points,
            interior,
            block: block.build(),
            values,
            derivatives,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of mesh points the operator acts on.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// The interior window shared by all lines.
    pub fn interior(&self) -> &[T] {
        self.interior.coefficients()
    }

    pub fn block(&self) -> &Block<T> {
        &self.block
    }

    /// The boundary value map `B`.
    pub fn values(&self) -> &Csr<T> {
        &self.values
    }

    /// The boundary derivative map `N`.
    pub fn derivatives(&self) -> &Csr<T> {
        &self.derivatives
    }

    fn assert_sizes(&self, input: &[T], output: &[T]) {
        assert!(
            input.len() >= self.num_points && output.len() >= self.num_points,
            "Fields must hold at least {} points (input {}, output {}).",
            self.num_points,
            input.len(),
            output.len()
        );
    }

    /// Computes the derivative of `input` at every fluid point.
    ///
    /// Boundary values of Dirichlet objects are read from their storage points in `input`.
    /// Prescribed derivatives of Neumann boundaries are ignored, see
    /// [`apply_with_derivatives`](Self::apply_with_derivatives).
    pub fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.assert_sizes(input, output);
        self.block.apply(input, output, policy);
        self.values.apply(input, output, ApplyPolicy::Accumulate);
    }

    /// Like [`apply`](Self::apply), additionally reading prescribed boundary derivatives from
    /// `derivatives`.
    pub fn apply_with_derivatives(&self, input: &[T], derivatives: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.apply(input, output, policy);
        assert!(derivatives.len() >= self.num_points, "Derivative field is too short.");
        self.derivatives.apply(derivatives, output, ApplyPolicy::Accumulate);
    }

    /// Applies the part of the operator that acts on unknowns: `O` without the columns of
    /// Dirichlet domain walls.
    pub fn apply_unknowns(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.assert_sizes(input, output);
        self.block.apply_unknowns(input, output, policy);
    }

    /// Accumulates the contributions of Dirichlet boundary values, from domain walls and from
    /// objects, into `output`.
    ///
    /// Together with [`apply_unknowns`](Self::apply_unknowns) this gives
    /// [`apply`](Self::apply).
    pub fn apply_boundary_values(&self, input: &[T], output: &mut [T]) {
        self.assert_sizes(input, output);
        self.block.apply_dirichlet(input, output);
        self.values.apply(input, output, ApplyPolicy::Accumulate);
    }

    /// Visits the entries of `O`.
    pub fn accept_operator(&self, visitor: &mut dyn MatrixVisitor<T>) {
        self.block.accept(visitor);
    }

    /// Visits the entries of `B`.
    pub fn accept_values(&self, visitor: &mut dyn MatrixVisitor<T>) {
        self.values.accept(visitor);
    }

    /// Visits the entries of `N`.
    pub fn accept_derivatives(&self, visitor: &mut dyn MatrixVisitor<T>) {
        self.derivatives.accept(visitor);
    }

    /// The matrix of `O + B` as a dense `num_points x num_points` matrix.
    pub fn to_dense(&self) -> DMatrix<T> {
        let mut materializer = DenseMaterializer::new(self.num_points, self.num_points);
        self.accept_operator(&mut materializer);
        self.accept_values(&mut materializer);
        materializer.into_matrix()
    }
}
