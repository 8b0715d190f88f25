use nalgebra::RealField;

pub use nalgebra;

/// Scalar type used throughout `cutcell`.
///
/// In addition to the usual field operations, ray marching needs to step past a previous
/// intersection by the smallest possible amount, which requires access to the floating-point
/// representation.
pub trait Real: RealField + Copy {
    /// Returns the smallest representable value strictly greater than `self`.
    ///
    /// Infinities and NaN are returned unchanged.
    fn next_up(self) -> Self;
}

macro_rules! impl_real_for_float {
    ($float:ty, $bits:ty) => {
        impl Real for $float {
            fn next_up(self) -> Self {
                if self.is_nan() || self == <$float>::INFINITY {
                    return self;
                }
                if self == 0.0 {
                    // Covers both +0 and -0: the smallest positive subnormal
                    return <$float>::from_bits(1);
                }
                let bits = self.to_bits();
                let next_bits: $bits = if self > 0.0 { bits + 1 } else { bits - 1 };
                <$float>::from_bits(next_bits)
            }
        }
    };
}

impl_real_for_float!(f32, u32);
impl_real_for_float!(f64, u64);
