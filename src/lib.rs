pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod color;
pub mod material;

pub mod ray;
pub mod shape;
pub mod intersect;
pub mod pattern;

pub mod scene;

use crate::consts::FEQ_EPSILON;

/// Approximate floating point equality, used by every value type's `eq`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
