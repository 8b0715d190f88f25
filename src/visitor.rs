//! Visitors for inspecting assembled operators.
use cutcell_matrix::{local_index, MatrixScalar, MatrixVisitor};
use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Sums visited entries into a dense matrix.
#[derive(Debug, Clone)]
pub struct DenseMaterializer<T: MatrixScalar> {
    matrix: DMatrix<T>,
    include_dirichlet: bool,
}

impl<T: MatrixScalar> DenseMaterializer<T> {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(nrows, ncols),
            include_dirichlet: true,
        }
    }

    /// Skips entries whose columns hold Dirichlet values of domain walls, leaving only the map
    /// acting on unknowns.
    pub fn excluding_dirichlet(mut self) -> Self {
        self.include_dirichlet = false;
        self
    }

    pub fn matrix(&self) -> &DMatrix<T> {
        &self.matrix
    }

    pub fn into_matrix(self) -> DMatrix<T> {
        self.matrix
    }
}

impl<T: MatrixScalar> MatrixVisitor<T> for DenseMaterializer<T> {
    fn visit_entry(&mut self, row: usize, col: usize, value: T) {
        self.matrix[(row, col)] += value;
    }

    fn visit_dirichlet_entry(&mut self, row: usize, col: usize, value: T) {
        if self.include_dirichlet {
            self.visit_entry(row, col, value);
        }
    }
}

/// Collects visited entries as triplets.
#[derive(Debug, Clone)]
pub struct CooCollector<T: MatrixScalar> {
    coo: CooMatrix<T>,
}

impl<T: MatrixScalar> CooCollector<T> {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            coo: CooMatrix::new(nrows, ncols),
        }
    }

    pub fn coo(&self) -> &CooMatrix<T> {
        &self.coo
    }

    pub fn into_coo(self) -> CooMatrix<T> {
        self.coo
    }

    /// Compresses the collected triplets, summing duplicates.
    pub fn to_csr(&self) -> CsrMatrix<T> {
        CsrMatrix::from(&self.coo)
    }
}

impl<T: MatrixScalar> MatrixVisitor<T> for CooCollector<T> {
    fn visit_entry(&mut self, row: usize, col: usize, value: T) {
        self.coo.push(row, col, value);
    }
}

/// Forwards the entries that lie on one strided index set, renumbered to `0 .. count`.
///
/// Index `offset + k * stride` maps to `k` for `k < count`; entries with a row or column outside
/// of the set are dropped. Typically used to extract the operator of a single mesh line.
#[derive(Debug)]
pub struct UnitStrideRemap<'a, V: ?Sized> {
    inner: &'a mut V,
    offset: usize,
    stride: usize,
    count: usize,
}

impl<'a, V: ?Sized> UnitStrideRemap<'a, V> {
    pub fn new(inner: &'a mut V, offset: usize, stride: usize, count: usize) -> Self {
        assert!(stride > 0, "Stride must be positive.");
        Self {
            inner,
            offset,
            stride,
            count,
        }
    }

    fn local(&self, global: usize) -> Option<usize> {
        local_index(global, self.offset, self.stride, self.count)
    }
}

impl<'a, T, V> MatrixVisitor<T> for UnitStrideRemap<'a, V>
where
    V: ?Sized + MatrixVisitor<T>,
{
    fn visit_entry(&mut self, row: usize, col: usize, value: T) {
        if let (Some(row), Some(col)) = (self.local(row), self.local(col)) {
            self.inner.visit_entry(row, col, value);
        }
    }

    fn visit_dirichlet_entry(&mut self, row: usize, col: usize, value: T) {
        if let (Some(row), Some(col)) = (self.local(row), self.local(col)) {
            self.inner.visit_dirichlet_entry(row, col, value);
        }
    }
}
