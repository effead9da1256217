use crate::math::Point3;

/// Shape classification of a soma, derived from its SWC encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SomaKind {
    /// No soma samples were present.
    #[default]
    Undefined,
    /// Exactly one soma sample.
    SinglePoint,
    /// Three soma samples where the second and third are both children of
    /// the first, per the neuromorpho.org convention.
    NeuromorphoThreePointCylinders,
    /// Any other arrangement: a chain of soma samples read as stacked
    /// cylinders.
    Cylinders,
}

/// The cell body of a morphology.
///
/// `points` and `diameters` are parallel arrays of equal length.
#[derive(Debug, Clone, Default)]
pub struct Soma {
    pub kind: SomaKind,
    pub points: Vec<Point3>,
    pub diameters: Vec<f64>,
}
