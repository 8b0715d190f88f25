//! Matrix primitives for directional finite-difference operators.
//!
//! All matrices carry a [`MatrixBase`] that places them inside a larger, possibly strided,
//! global index space. This allows an operator for a single mesh line to act directly on a
//! multi-dimensional field stored as a flat slice, without gathering the line first.
use nalgebra::{ClosedAdd, ClosedMul, Scalar};
use num::Zero;

mod base;
mod block;
mod circulant;
mod csr;
mod dense;

pub use base::*;
pub use block::*;
pub use circulant::*;
pub use csr::*;
pub use dense::*;

/// Scalar types that matrices in this crate can store.
///
/// Used as a trait alias. `PartialOrd` is needed to make CSR assembly independent of insertion
/// order.
pub trait MatrixScalar: Scalar + Copy + Zero + ClosedAdd + ClosedMul + PartialOrd {}

impl<T> MatrixScalar for T where T: Scalar + Copy + Zero + ClosedAdd + ClosedMul + PartialOrd {}

/// Whether applying an operator overwrites or accumulates into the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ApplyPolicy {
    /// `y = A x`
    Assign,
    /// `y += A x`
    Accumulate,
}

impl ApplyPolicy {
    #[inline(always)]
    pub fn store<T: MatrixScalar>(self, target: &mut T, value: T) {
        match self {
            ApplyPolicy::Assign => *target = value,
            ApplyPolicy::Accumulate => *target += value,
        }
    }
}

/// Receives the non-zero entries of a matrix in global (placed) indices.
pub trait MatrixVisitor<T> {
    fn visit_entry(&mut self, row: usize, col: usize, value: T);

    /// Visits an entry whose column holds a known Dirichlet value rather than an unknown.
    fn visit_dirichlet_entry(&mut self, row: usize, col: usize, value: T) {
        self.visit_entry(row, col, value)
    }
}

/// A linear map acting on flat slices in global indices.
pub trait Operator<T> {
    /// Computes `output = A input` or `output += A input` depending on `policy`.
    ///
    /// Only the rows covered by the operator are written.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `output` are too short for the operator's placement.
    fn apply(&self, input: &[T], output: &mut [T], policy: ApplyPolicy);

    fn accept(&self, visitor: &mut dyn MatrixVisitor<T>);
}
