use crate::{ApplyPolicy, MatrixBase, MatrixScalar, MatrixVisitor, Operator};
use nalgebra::DMatrix;

/// A small, explicitly stored coefficient block.
///
/// Used for the boundary closures of a mesh line. The first or last column may be flagged as a
/// Dirichlet column: it then refers to a known boundary value rather than an unknown, which lets
/// the same block either differentiate a field that already contains the boundary value
/// ([`Dense::apply`]) or split into an operator on unknowns ([`Dense::apply_unknowns`]) and a
/// right-hand side contribution ([`Dense::apply_dirichlet`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<T: MatrixScalar> {
    base: MatrixBase,
    matrix: DMatrix<T>,
    first_is_dirichlet: bool,
    last_is_dirichlet: bool,
}

impl<T: MatrixScalar> Dense<T> {
    pub fn from_matrix(matrix: DMatrix<T>) -> Self {
        Self {
            base: MatrixBase::new(matrix.nrows(), matrix.ncols()),
            matrix,
            first_is_dirichlet: false,
            last_is_dirichlet: false,
        }
    }

    /// Constructs a block from row-major data.
    pub fn from_row_slice(rows: usize, columns: usize, data: &[T]) -> Self {
        assert_eq!(data.len(), rows * columns, "Data length must be rows * columns.");
        Self::from_matrix(DMatrix::from_row_slice(rows, columns, data))
    }

    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self::from_matrix(DMatrix::zeros(rows, columns))
    }

    pub fn with_placement(mut self, row_offset: usize, col_offset: usize, stride: usize) -> Self {
        self.set_placement(row_offset, col_offset, stride);
        self
    }

    pub fn set_placement(&mut self, row_offset: usize, col_offset: usize, stride: usize) {
        self.base = self.base.placed(row_offset, col_offset, stride);
    }

    pub fn with_dirichlet(mut self, first: bool, last: bool) -> Self {
        assert!(
            !(first || last) || self.base.columns > 0,
            "A Dirichlet column requires at least one column."
        );
        self.first_is_dirichlet = first;
        self.last_is_dirichlet = last;
        self
    }

    pub fn base(&self) -> &MatrixBase {
        &self.base
    }

    pub fn matrix(&self) -> &DMatrix<T> {
        &self.matrix
    }

    /// The coefficient at local row `i` and column `j`.
    pub fn get(&self, i: usize, j: usize) -> T {
        self.matrix[(i, j)]
    }

    pub fn rows(&self) -> usize {
        self.base.rows
    }

    pub fn columns(&self) -> usize {
        self.base.columns
    }

    pub fn first_is_dirichlet(&self) -> bool {
        self.first_is_dirichlet
    }

    pub fn last_is_dirichlet(&self) -> bool {
        self.last_is_dirichlet
    }

    pub fn is_dirichlet_column(&self, j: usize) -> bool {
        (self.first_is_dirichlet && j == 0) || (self.last_is_dirichlet && j + 1 == self.base.columns)
    }

    fn apply_columns(&self, input: &[T], output: &mut [T], policy: ApplyPolicy, include: impl Fn(usize) -> bool) {
        self.base.assert_fits(input, output);
        for i in 0..self.base.rows {
            let mut sum = T::zero();
            for j in (0..self.base.columns).filter(|j| include(*j)) {
                sum += self.matrix[(i, j)] * input[self.base.col_index(j)];
            }
            policy.store(&mut output[self.base.row_index(i)], sum);
        }
    }

    /// Applies only the columns that correspond to unknowns.
    pub fn apply_unknowns(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.apply_columns(input, output, policy, |j| !self.is_dirichlet_column(j));
    }

    /// Accumulates the contribution of the Dirichlet columns, reading the known values from
    /// `input`.
    pub fn apply_dirichlet(&self, input: &[T], output: &mut [T]) {
        if self.first_is_dirichlet || self.last_is_dirichlet {
            self.apply_columns(input, output, ApplyPolicy::Accumulate, |j| self.is_dirichlet_column(j));
        }
    }
}

impl<T: MatrixScalar> Operator<T> for Dense<T> {
    fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.apply_columns(input, output, policy, |_| true);
    }

    fn accept(&self, visitor: &mut dyn MatrixVisitor<T>) {
        for i in 0..self.base.rows {
            for j in 0..self.base.columns {
                let value = self.matrix[(i, j)];
                if value == T::zero() {
                    continue;
                }
                let (row, col) = (self.base.row_index(i), self.base.col_index(j));
                if self.is_dirichlet_column(j) {
                    visitor.visit_dirichlet_entry(row, col, value);
                } else {
                    visitor.visit_entry(row, col, value);
                }
            }
        }
    }
}
