//! Test helpers shared by the crates of the workspace.
use num::Zero;

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x - $y;

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

/// Scatters `values` into a zero buffer of length `len`, value `k` landing at `offset + k * stride`.
pub fn scatter_strided<T: Copy + Zero>(values: &[T], offset: usize, stride: usize, len: usize) -> Vec<T> {
    let mut buffer = vec![T::zero(); len];
    for (k, v) in values.iter().enumerate() {
        buffer[offset + k * stride] = *v;
    }
    buffer
}

/// Reads `count` values starting at `offset` with the given stride.
pub fn gather_strided<T: Copy>(buffer: &[T], offset: usize, stride: usize, count: usize) -> Vec<T> {
    (0..count).map(|k| buffer[offset + k * stride]).collect()
}
