use super::section::SectionType;
use super::soma::Soma;
use crate::math::Point3;

/// Cell family of a morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFamily {
    #[default]
    Neuron,
    Glia,
}

/// Source format and version a morphology was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatVersion {
    pub format: &'static str,
    pub major: u32,
    pub minor: u32,
}

impl FormatVersion {
    /// Version tag stamped by the SWC reader.
    #[must_use]
    pub fn swc() -> Self {
        Self {
            format: "swc",
            major: 1,
            minor: 0,
        }
    }
}

impl Default for FormatVersion {
    /// Placeholder until a reader stamps the real version.
    fn default() -> Self {
        Self {
            format: "",
            major: 0,
            minor: 0,
        }
    }
}

/// One section of a read-only morphology.
#[derive(Debug, Clone)]
pub struct SectionProperties {
    /// Structural kind shared by every point of the section.
    pub section_type: SectionType,
    /// Ordered 3D sample points.
    pub points: Vec<Point3>,
    /// Per-point diameters, parallel to `points`.
    pub diameters: Vec<f64>,
    /// Index of the parent section in [`Properties::sections`], or `None`
    /// for a root section.
    pub parent: Option<usize>,
    /// Indices of child sections, in creation order.
    pub children: Vec<usize>,
}

/// Immutable result of reading a morphology.
#[derive(Debug, Clone)]
pub struct Properties {
    pub cell_family: CellFamily,
    pub version: FormatVersion,
    pub soma: Soma,
    /// Sections in creation order, which equals the assembly's depth-first
    /// pre-order; sibling order follows the source file.
    pub sections: Vec<SectionProperties>,
}

impl Properties {
    /// Indices of root sections, in creation order.
    #[must_use]
    pub fn root_sections(&self) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.parent.is_none())
            .map(|(index, _)| index)
            .collect()
    }
}
