//! Finite difference stencils for first derivatives.
//!
//! A stencil provides the coefficients of a banded interior operator and of the boundary
//! closures at the two ends of a line. Boundary blocks are described for the left wall; the
//! rows of the block are the first points of the line, and the columns are
//!
//! - for [`BoundaryKind::Dirichlet`]: the boundary value, located `psi * h` before the first
//!   point, followed by the first points of the line,
//! - otherwise: the first points of the line.
//!
//! For [`BoundaryKind::Neumann`], `extra` holds one coefficient per row that multiplies the
//! derivative prescribed at the boundary. Right walls use the mirrored layout, with rows and
//! columns in reverse order, so that the boundary column comes last.
use crate::boundary::BoundaryKind;
use cutcell_traits::Real;
use std::fmt::Debug;

mod identity;
mod polynomial;

pub use identity::*;
pub use polynomial::*;

/// The shape of a boundary coefficient block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StencilShape {
    pub rows: usize,
    pub columns: usize,
    /// Number of coefficients per row that multiply a prescribed boundary derivative.
    pub extra: usize,
}

impl StencilShape {
    pub fn new(rows: usize, columns: usize, extra: usize) -> Self {
        Self { rows, columns, extra }
    }
}

pub trait Stencil<T: Real>: Debug {
    /// Width `2p + 1` of the interior coefficient window.
    fn interior_width(&self) -> usize;

    /// The half width `p` of the interior window.
    fn half_width(&self) -> usize {
        (self.interior_width() - 1) / 2
    }

    fn query(&self, kind: BoundaryKind) -> StencilShape;

    /// Fills the interior window for grid spacing `spacing`.
    fn interior(&self, spacing: T, coefficients: &mut [T]);

    /// Fills the boundary block for a wall of the given kind.
    ///
    /// `coefficients` is row-major with the shape returned by [`Stencil::query`], and `extra`
    /// holds `rows * extra` coefficients, also row-major. `psi` is the distance from the first
    /// point of the line to the boundary in units of `spacing`.
    fn coefficients(
        &self,
        spacing: T,
        kind: BoundaryKind,
        psi: T,
        is_right_wall: bool,
        coefficients: &mut [T],
        extra: &mut [T],
    );
}

/// Mirrors a left wall block into a right wall block.
///
/// Reverses the order of rows and columns of `coefficients`, negating them if `negate` is set
/// (as required for odd derivatives), and reverses the rows of `extra`.
pub fn mirror_to_right_wall<T: Real>(shape: &StencilShape, coefficients: &mut [T], extra: &mut [T], negate: bool) {
    debug_assert_eq!(coefficients.len(), shape.rows * shape.columns);
    debug_assert_eq!(extra.len(), shape.rows * shape.extra);
    // Reversing a row-major block reverses both rows and columns
    coefficients.reverse();
    if negate {
        for c in coefficients.iter_mut() {
            *c = -*c;
        }
    }
    extra.reverse();
    if shape.extra > 0 {
        for row in extra.chunks_mut(shape.extra) {
            row.reverse();
        }
    }
}

pub(crate) fn debug_check_request<T: Real>(
    shape: &StencilShape,
    kind: BoundaryKind,
    psi: T,
    coefficients: &[T],
    extra: &[T],
) {
    debug_assert_eq!(
        coefficients.len(),
        shape.rows * shape.columns,
        "Coefficient buffer does not match the stencil shape."
    );
    debug_assert_eq!(extra.len(), shape.rows * shape.extra, "Extra buffer does not match the stencil shape.");
    debug_assert!(psi >= T::zero() && psi <= T::one(), "psi must lie in [0, 1].");
    debug_assert!(
        kind != BoundaryKind::Neumann || shape.extra >= 1,
        "Neumann boundaries need at least one extra coefficient."
    );
}
