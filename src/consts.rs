// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Ray directions with a component smaller than this are treated as parallel
// to the corresponding axis plane.
pub const EPSILON: f64 = 0.00001;
