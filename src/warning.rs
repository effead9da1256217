use std::fmt;

/// Discriminant of a [`Warning`], for filtering and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    ZeroDiameter,
    DisconnectedNeurite,
    SomaNonConform,
    WrongRootPoint,
}

/// A non-fatal diagnostic emitted while reading a morphology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A sample's diameter is below [`crate::math::EPSILON`].
    ZeroDiameter { id: u32, line: u32 },
    /// A non-soma sample has no parent.
    DisconnectedNeurite { id: u32, line: u32 },
    /// A three-point soma that is coincident with its center in x, z and
    /// diameter but off the canonical neuromorpho arrangement along y.
    SomaNonConform { center_id: u32, line: u32 },
    /// A neuromorpho three-point soma whose neurites attach to a soma
    /// sample other than sample 1.
    WrongRootPoint { id: u32, line: u32 },
}

impl Warning {
    /// The kind of this warning.
    #[must_use]
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::ZeroDiameter { .. } => WarningKind::ZeroDiameter,
            Self::DisconnectedNeurite { .. } => WarningKind::DisconnectedNeurite,
            Self::SomaNonConform { .. } => WarningKind::SomaNonConform,
            Self::WrongRootPoint { .. } => WarningKind::WrongRootPoint,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDiameter { id, line } => {
                write!(f, "line {line}: sample {id} has a diameter close to zero")
            }
            Self::DisconnectedNeurite { id, line } => {
                write!(
                    f,
                    "line {line}: neurite sample {id} has no parent and is not connected to the soma"
                )
            }
            Self::SomaNonConform { center_id, line } => {
                write!(
                    f,
                    "line {line}: three-point soma around sample {center_id} does not follow the neuromorpho arrangement"
                )
            }
            Self::WrongRootPoint { id, line } => {
                write!(
                    f,
                    "line {line}: neurites of a three-point soma should be rooted at sample 1, found root {id}"
                )
            }
        }
    }
}

/// Sink for non-fatal diagnostics.
///
/// The reader invokes [`WarningHandler::warn`] synchronously from the pass
/// that detects the condition; emission order follows the passes (validation,
/// soma classification, assembly) and source order within a pass.
pub trait WarningHandler {
    fn warn(&mut self, warning: Warning);
}

/// Accumulates warnings in emission order.
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<Warning>,
}

impl WarningCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected warnings, in emission order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The kinds of the collected warnings, in emission order.
    #[must_use]
    pub fn kinds(&self) -> Vec<WarningKind> {
        self.warnings.iter().map(Warning::kind).collect()
    }

    /// Whether any collected warning has the given kind.
    #[must_use]
    pub fn contains(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind() == kind)
    }
}

impl WarningHandler for WarningCollector {
    fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// Forwards every warning to the `log` facade at warn level.
#[derive(Debug, Default)]
pub struct LogWarnings;

impl WarningHandler for LogWarnings {
    fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_preserves_emission_order() {
        let mut collector = WarningCollector::new();
        collector.warn(Warning::ZeroDiameter { id: 4, line: 4 });
        collector.warn(Warning::DisconnectedNeurite { id: 7, line: 9 });
        assert_eq!(
            collector.kinds(),
            vec![WarningKind::ZeroDiameter, WarningKind::DisconnectedNeurite]
        );
        assert!(collector.contains(WarningKind::ZeroDiameter));
        assert!(!collector.contains(WarningKind::WrongRootPoint));
    }

    #[test]
    fn warning_display_names_sample_and_line() {
        let text = Warning::ZeroDiameter { id: 12, line: 3 }.to_string();
        assert!(text.contains("12"), "{text}");
        assert!(text.contains("line 3"), "{text}");
    }
}
