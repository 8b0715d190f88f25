use crate::{ApplyPolicy, Circulant, Dense, MatrixBase, MatrixScalar, MatrixVisitor, Operator};

/// The operator of a single mesh line: a left boundary block, a banded interior and a right
/// boundary block.
///
/// In local indices the composite is an `n x n` map, where `n` is the total number of rows.
/// The left block starts at row and column zero, the interior starts at row `left.rows()` and
/// column `left.rows() - p` (with `p` the half width of the interior window), and the right
/// block ends at the last row and the last column.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite<T: MatrixScalar> {
    base: MatrixBase,
    left: Dense<T>,
    interior: Circulant<T>,
    right: Dense<T>,
}

impl<T: MatrixScalar> Composite<T> {
    /// Combines the three parts. Any previous placement of the parts is discarded.
    ///
    /// # Panics
    ///
    /// Panics if a boundary block has fewer rows than the interior half width, or if a
    /// boundary block has more columns than the composite has rows.
    pub fn new(left: Dense<T>, interior: Circulant<T>, right: Dense<T>) -> Self {
        let p = interior.half_width();
        assert!(
            interior.rows() == 0 || (left.rows() >= p && right.rows() >= p),
            "Boundary blocks must cover the interior half width ({} rows left, {} rows right, half width {}).",
            left.rows(),
            right.rows(),
            p
        );
        let n = left.rows() + interior.rows() + right.rows();
        assert!(
            left.columns() <= n && right.columns() <= n,
            "Boundary blocks reach outside of the line ({} and {} columns for {} rows).",
            left.columns(),
            right.columns(),
            n
        );
        let mut composite = Self {
            base: MatrixBase::new(n, n),
            left,
            interior,
            right,
        };
        composite.place(0, 1);
        composite
    }

    /// Places local index `k` at global index `offset + k * stride`, for rows and columns alike.
    pub fn with_placement(mut self, offset: usize, stride: usize) -> Self {
        self.place(offset, stride);
        self
    }

    fn place(&mut self, offset: usize, stride: usize) {
        self.base = self.base.placed(offset, offset, stride);
        let n = self.base.rows;
        let at = |k: usize| offset + k * stride;

        let left_rows = self.left.rows();
        let p = self.interior.half_width();
        self.left.set_placement(at(0), at(0), stride);
        // An empty interior has no columns, so its column offset is irrelevant
        let interior_col = left_rows.saturating_sub(p);
        self.interior.set_placement(at(left_rows), at(interior_col), stride);
        self.right.set_placement(at(n - self.right.rows()), at(n - self.right.columns()), stride);
    }

    pub fn base(&self) -> &MatrixBase {
        &self.base
    }

    pub fn left(&self) -> &Dense<T> {
        &self.left
    }

    pub fn interior(&self) -> &Circulant<T> {
        &self.interior
    }

    pub fn right(&self) -> &Dense<T> {
        &self.right
    }

    pub fn rows(&self) -> usize {
        self.base.rows
    }

    /// Applies the composite, skipping Dirichlet-flagged boundary columns.
    pub fn apply_unknowns(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.left.apply_unknowns(input, output, policy);
        self.interior.apply(input, output, policy);
        self.right.apply_unknowns(input, output, policy);
    }

    /// Accumulates the contribution of Dirichlet-flagged boundary columns.
    pub fn apply_dirichlet(&self, input: &[T], output: &mut [T]) {
        self.left.apply_dirichlet(input, output);
        self.right.apply_dirichlet(input, output);
    }
}

impl<T: MatrixScalar> Operator<T> for Composite<T> {
    fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.left.apply(input, output, policy);
        self.interior.apply(input, output, policy);
        self.right.apply(input, output, policy);
    }

    fn accept(&self, visitor: &mut dyn MatrixVisitor<T>) {
        self.left.accept(visitor);
        self.interior.accept(visitor);
        self.right.accept(visitor);
    }
}

/// An ordered collection of placed composites, typically one per mesh line.
///
/// Composites are expected to write disjoint rows, so that applying the block with
/// [`ApplyPolicy::Assign`] is well defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T: MatrixScalar> {
    composites: Vec<Composite<T>>,
}

impl<T: MatrixScalar> Default for Block<T> {
    fn default() -> Self {
        Self { composites: Vec::new() }
    }
}

impl<T: MatrixScalar> Block<T> {
    pub fn composites(&self) -> &[Composite<T>] {
        &self.composites
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }

    /// Appends the composites of `other`.
    pub fn extend(&mut self, other: Block<T>) {
        self.composites.extend(other.composites);
    }

    pub fn apply_unknowns(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        for composite in &self.composites {
            composite.apply_unknowns(input, output, policy);
        }
    }

    pub fn apply_dirichlet(&self, input: &[T], output: &mut [T]) {
        for composite in &self.composites {
            composite.apply_dirichlet(input, output);
        }
    }
}

impl<T: MatrixScalar> Operator<T> for Block<T> {
    fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        for composite in &self.composites {
            composite.apply(input, output, policy);
        }
    }

    fn accept(&self, visitor: &mut dyn MatrixVisitor<T>) {
        for composite in &self.composites {
            composite.accept(visitor);
        }
    }
}

/// Accumulates composites and hands them over to an immutable [`Block`].
#[derive(Debug, Clone)]
pub struct BlockBuilder<T: MatrixScalar> {
    composites: Vec<Composite<T>>,
}

impl<T: MatrixScalar> Default for BlockBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MatrixScalar> BlockBuilder<T> {
    pub fn new() -> Self {
        Self { composites: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            composites: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, composite: Composite<T>) -> &mut Self {
        self.composites.push(composite);
        self
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }

    pub fn build(self) -> Block<T> {
        Block {
            composites: self.composites,
        }
    }
}

impl<T: MatrixScalar> From<Vec<Composite<T>>> for Block<T> {
    fn from(composites: Vec<Composite<T>>) -> Self {
        Self { composites }
    }
}
