use crate::boundary::BoundaryKind;
use crate::stencil::{debug_check_request, mirror_to_right_wall, Stencil, StencilShape};
use cutcell_traits::Real;
use nalgebra::{convert, DMatrix, DVector};
use numeric_literals::replace_float_literals;

/// Polynomial finite differences with interior half width `p`.
///
/// The interior uses central differences on `2p + 1` points, exact for polynomials of degree
/// `2p`. The `p` boundary rows of each wall use the first `2p + 1` points of the line together
/// with the boundary condition located `psi` grid spacings before the first point: a value for
/// Dirichlet walls, a derivative for Neumann walls, and nothing for floating walls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PolynomialStencil {
    half_width: usize,
}

impl PolynomialStencil {
    /// # Panics
    ///
    /// Panics if `half_width` is zero.
    pub fn new(half_width: usize) -> Self {
        assert!(half_width >= 1, "Half width must be at least one.");
        Self { half_width }
    }

    pub fn second_order() -> Self {
        Self::new(1)
    }

    pub fn fourth_order() -> Self {
        Self::new(2)
    }
}

impl<T: Real> Stencil<T> for PolynomialStencil {
    fn interior_width(&self) -> usize {
        2 * self.half_width + 1
    }

    fn query(&self, kind: BoundaryKind) -> StencilShape {
        let p = self.half_width;
        match kind {
            BoundaryKind::Dirichlet => StencilShape::new(p, 2 * p + 2, 0),
            BoundaryKind::Neumann => StencilShape::new(p, 2 * p + 1, 1),
            BoundaryKind::Floating => StencilShape::new(p, 2 * p + 1, 0),
        }
    }

    fn interior(&self, spacing: T, coefficients: &mut [T]) {
        let p = self.half_width as isize;
        debug_assert_eq!(coefficients.len(), (2 * p + 1) as usize);
        let nodes: Vec<T> = (-p..=p).map(|s| convert(s as f64)).collect();
        let weights = derivative_weights(T::zero(), &nodes, None);
        for (c, w) in coefficients.iter_mut().zip(weights.iter()) {
            *c = *w / spacing;
        }
    }

    fn coefficients(
        &self,
        spacing: T,
        kind: BoundaryKind,
        psi: T,
        is_right_wall: bool,
        coefficients: &mut [T],
        extra: &mut [T],
    ) {
        let shape = Stencil::<T>::query(self, kind);
        debug_check_request(&shape, kind, psi, coefficients, extra);

        let mut nodes: Vec<T> = Vec::with_capacity(shape.columns);
        if kind == BoundaryKind::Dirichlet {
            nodes.push(-psi);
        }
        nodes.extend((0..=2 * self.half_width).map(|s| convert::<f64, T>(s as f64)));
        let derivative_node = (kind == BoundaryKind::Neumann).then(|| -psi);

        extra.fill(T::zero());
        for row in 0..shape.rows {
            let x = convert(row as f64);
            let weights = derivative_weights(x, &nodes, derivative_node);
            let row_coefficients = &mut coefficients[row * shape.columns..(row + 1) * shape.columns];
            for (c, w) in row_coefficients.iter_mut().zip(weights.iter()) {
                *c = *w / spacing;
            }
            if derivative_node.is_some() {
                extra[row * shape.extra] = weights[nodes.len()];
            }
        }

        if is_right_wall {
            mirror_to_right_wall(&shape, coefficients, extra, true);
        }
    }
}

/// Computes weights `w` for the values at `value_nodes` and, if present, a weight `e` for the
/// derivative at `derivative_node`, such that `sum_j w_j f(s_j) + e f'(s_g) = f'(x)` for every
/// polynomial `f` of degree below the number of weights. Nodes are in units of the grid
/// spacing.
///
/// # Panics
///
/// Panics if the nodes do not determine the weights uniquely, e.g. if two value nodes coincide.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn derivative_weights<T: Real>(x: T, value_nodes: &[T], derivative_node: Option<T>) -> DVector<T> {
    let n = value_nodes.len() + derivative_node.is_some() as usize;
    let mut moments = DMatrix::zeros(n, n);
    let mut rhs = DVector::zeros(n);
    for m in 0..n {
        for (j, s) in value_nodes.iter().enumerate() {
            moments[(m, j)] = power(*s, m);
        }
        if m > 0 {
            let degree: T = convert(m as f64);
            if let Some(g) = derivative_node {
                moments[(m, n - 1)] = degree * power(g, m - 1);
            }
            rhs[m] = degree * power(x, m - 1);
        } else {
            rhs[m] = 0.0;
        }
    }
    moments
        .lu()
        .solve(&rhs)
        .expect("Stencil nodes must determine the weights uniquely")
}

fn power<T: Real>(base: T, exponent: usize) -> T {
    (0..exponent).fold(T::one(), |acc, _| acc * base)
}
