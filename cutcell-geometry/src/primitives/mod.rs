mod rectangle;
mod sphere;

pub use rectangle::*;
pub use sphere::*;
