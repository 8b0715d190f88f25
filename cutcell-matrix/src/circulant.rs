use crate::{ApplyPolicy, MatrixBase, MatrixScalar, MatrixVisitor, Operator};

/// A banded Toeplitz operator defined by a single coefficient window.
///
/// Row `i` is the inner product of the window with columns `i .. i + width`. With a placement
/// stride, this is a sliding weighted sum along one axis of a flattened field.
#[derive(Debug, Clone, PartialEq)]
pub struct Circulant<T: MatrixScalar> {
    base: MatrixBase,
    coefficients: Vec<T>,
}

impl<T: MatrixScalar> Circulant<T> {
    pub fn new(coefficients: Vec<T>, rows: usize) -> Self {
        assert!(!coefficients.is_empty(), "Coefficient window must not be empty.");
        let columns = if rows == 0 { 0 } else { rows + coefficients.len() - 1 };
        Self {
            base: MatrixBase::new(rows, columns),
            coefficients,
        }
    }

    pub fn with_placement(mut self, row_offset: usize, col_offset: usize, stride: usize) -> Self {
        self.set_placement(row_offset, col_offset, stride);
        self
    }

    pub fn set_placement(&mut self, row_offset: usize, col_offset: usize, stride: usize) {
        self.base = self.base.placed(row_offset, col_offset, stride);
    }

    /// The same window with a different number of rows, unplaced.
    pub fn with_rows(&self, rows: usize) -> Self {
        Self::new(self.coefficients.clone(), rows)
    }

    pub fn base(&self) -> &MatrixBase {
        &self.base
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    /// Number of taps on each side of the center, for odd widths.
    pub fn half_width(&self) -> usize {
        (self.coefficients.len() - 1) / 2
    }

    pub fn rows(&self) -> usize {
        self.base.rows
    }
}

impl<T: MatrixScalar> Operator<T> for Circulant<T> {
    fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy) {
        self.base.assert_fits(input, output);
        let stride = self.base.stride;
        for i in 0..self.base.rows {
            let first = self.base.col_index(i);
            let mut sum = T::zero();
            for (k, w) in self.coefficients.iter().enumerate() {
                sum += *w * input[first + k * stride];
            }
            policy.store(&mut output[self.base.row_index(i)], sum);
        }
    }

    fn accept(&self, visitor: &mut dyn MatrixVisitor<T>) {
        for i in 0..self.base.rows {
            for (k, w) in self.coefficients.iter().enumerate() {
                if *w != T::zero() {
                    visitor.visit_entry(self.base.row_index(i), self.base.col_index(i + k), *w);
                }
            }
        }
    }
}
