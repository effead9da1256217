/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Threshold below which a diameter counts as zero, and tolerance for the
/// neuromorpho soma-conformance comparison. Coordinates and diameters are
/// in micrometers.
pub const EPSILON: f64 = 1e-6;
