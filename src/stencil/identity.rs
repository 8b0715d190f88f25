use crate::boundary::BoundaryKind;
use crate::stencil::{debug_check_request, Stencil, StencilShape};
use cutcell_traits::Real;

/// A stencil that reproduces its input on every fluid point.
///
/// Not a derivative, but convenient to check the bookkeeping of assembled operators.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IdentityStencil;

impl<T: Real> Stencil<T> for IdentityStencil {
    fn interior_width(&self) -> usize {
        1
    }

    fn query(&self, kind: BoundaryKind) -> StencilShape {
        match kind {
            BoundaryKind::Dirichlet => StencilShape::new(1, 2, 0),
            BoundaryKind::Neumann => StencilShape::new(1, 1, 1),
            BoundaryKind::Floating => StencilShape::new(1, 1, 0),
        }
    }

    fn interior(&self, _spacing: T, coefficients: &mut [T]) {
        debug_assert_eq!(coefficients.len(), 1);
        coefficients[0] = T::one();
    }

    fn coefficients(
        &self,
        _spacing: T,
        kind: BoundaryKind,
        psi: T,
        is_right_wall: bool,
        coefficients: &mut [T],
        extra: &mut [T],
    ) {
        let shape = Stencil::<T>::query(self, kind);
        debug_check_request(&shape, kind, psi, coefficients, extra);
        extra.fill(T::zero());
        match kind {
            BoundaryKind::Dirichlet if is_right_wall => {
                coefficients.copy_from_slice(&[T::one(), T::zero()]);
            }
            BoundaryKind::Dirichlet => coefficients.copy_from_slice(&[T::zero(), T::one()]),
            BoundaryKind::Neumann | BoundaryKind::Floating => coefficients[0] = T::one(),
        }
    }
}
