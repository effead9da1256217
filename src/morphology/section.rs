use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a section in a morphology.
    pub struct SectionId;
}

/// Structural kind of a section, as encoded by the SWC `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    Soma,
    Axon,
    BasalDendrite,
    ApicalDendrite,
    /// Implementation-defined neurite kind (SWC codes 5 through 19).
    Custom(u8),
}

impl SectionType {
    /// First SWC type code rejected as out of range.
    pub const OUT_OF_RANGE_START: i64 = 20;

    /// Maps a raw SWC type code to a section type.
    ///
    /// Codes ≤ 0 or ≥ [`Self::OUT_OF_RANGE_START`] have no mapping.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_swc(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Self::Soma),
            2 => Some(Self::Axon),
            3 => Some(Self::BasalDendrite),
            4 => Some(Self::ApicalDendrite),
            t if (5..Self::OUT_OF_RANGE_START).contains(&t) => Some(Self::Custom(t as u8)),
            _ => None,
        }
    }

    /// The SWC integer code of this type.
    #[must_use]
    pub fn to_swc(self) -> u32 {
        match self {
            Self::Soma => 1,
            Self::Axon => 2,
            Self::BasalDendrite => 3,
            Self::ApicalDendrite => 4,
            Self::Custom(code) => u32::from(code),
        }
    }

    /// Whether this is the soma type.
    #[must_use]
    pub fn is_soma(self) -> bool {
        self == Self::Soma
    }
}

/// Data associated with one morphology section.
///
/// A section is a maximal run of same-type sample points with no
/// intermediate branching.
#[derive(Debug, Clone)]
pub struct SectionData {
    /// Structural kind shared by every point of the section.
    pub section_type: SectionType,
    /// Ordered 3D sample points.
    pub points: Vec<Point3>,
    /// Per-point diameters, parallel to `points`.
    pub diameters: Vec<f64>,
    /// Parent section, or `None` for a root section.
    pub parent: Option<SectionId>,
    /// Child sections, in creation order.
    pub children: Vec<SectionId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn named_codes_round_trip() {
        for code in 1..=4 {
            let section_type = SectionType::from_swc(code).unwrap();
            assert_eq!(i64::from(section_type.to_swc()), code);
        }
    }

    #[test]
    fn custom_codes_map_up_to_range_start() {
        assert_eq!(SectionType::from_swc(5), Some(SectionType::Custom(5)));
        assert_eq!(SectionType::from_swc(19), Some(SectionType::Custom(19)));
        assert_eq!(SectionType::from_swc(SectionType::OUT_OF_RANGE_START), None);
    }

    #[test]
    fn non_positive_codes_are_rejected() {
        assert_eq!(SectionType::from_swc(0), None);
        assert_eq!(SectionType::from_swc(-3), None);
    }

    #[test]
    fn only_code_1_is_soma() {
        assert!(SectionType::Soma.is_soma());
        assert!(!SectionType::Axon.is_soma());
        assert!(!SectionType::Custom(7).is_soma());
    }
}
