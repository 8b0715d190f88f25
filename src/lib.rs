//! Cut-cell finite difference operators on uniform Cartesian meshes.
//!
//! Objects embedded in the mesh are located by marching every mesh line as a ray
//! ([`geometry`]). The fluid points of each line are split into runs between domain walls and
//! object surfaces ([`lines`]), and a [`stencil::Stencil`] provides interior and boundary
//! coefficients that account for the fractional distance `psi` between the last fluid point
//! and the surface. The coefficients are assembled into a [`operator::DirectionalOperator`]
//! per axis.
pub mod boundary;
pub mod config;
pub mod geometry;
pub mod lines;
pub mod mesh;
pub mod operator;
pub mod stencil;
pub mod visitor;

pub mod shape {
    pub use cutcell_geometry::*;
}

pub mod matrix {
    pub use cutcell_matrix::*;
}

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

pub use cutcell_traits::Real;
