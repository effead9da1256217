//! Reader for the SWC neuron-morphology text format.
//!
//! SWC is line oriented: each non-comment line declares one sample point as
//! seven whitespace-separated fields (`id type x y z radius parent`). The
//! reader runs a tolerant lexical pass, a forward-reference-tolerant
//! validation pass, soma classification, and a chain-collapsing assembly
//! pass that emits neurite sections into the morphology builder.

mod builder;
mod sample;
mod tokenizer;

use crate::error::Result;
use crate::morphology::{CellFamily, FormatVersion, Options, Properties};
use crate::warning::{LogWarnings, WarningHandler};

use builder::SwcBuilder;

/// Reads an SWC morphology, forwarding warnings to the `log` facade.
///
/// `path` identifies the source in diagnostics only; `contents` is the full
/// file text — no file I/O happens here.
///
/// # Errors
///
/// Returns an error on the first lexical, structural or soma violation; no
/// partial morphology is produced.
pub fn load(path: &str, contents: &str, options: Options) -> Result<Properties> {
    let mut handler = LogWarnings;
    load_with_handler(path, contents, options, &mut handler)
}

/// Reads an SWC morphology, forwarding warnings to `handler`.
///
/// # Errors
///
/// Returns an error on the first lexical, structural or soma violation; no
/// partial morphology is produced.
pub fn load_with_handler(
    path: &str,
    contents: &str,
    options: Options,
    handler: &mut dyn WarningHandler,
) -> Result<Properties> {
    log::debug!("reading swc morphology from {path}");

    let samples = sample::read_samples(contents)?;
    let mut properties = SwcBuilder::new(handler).build_properties(samples, options)?;
    properties.cell_family = CellFamily::Neuron;
    properties.version = FormatVersion::swc();
    Ok(properties)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::morphology::{SectionType, SomaKind};
    use crate::warning::{WarningCollector, WarningKind};

    #[test]
    fn load_stamps_cell_family_and_version() {
        let properties = load("soma.swc", "1 1 0 0 0 1 -1\n", Options::default()).unwrap();
        assert_eq!(properties.cell_family, CellFamily::Neuron);
        assert_eq!(properties.version, FormatVersion::swc());
        assert_eq!(properties.version.format, "swc");
        assert_eq!((properties.version.major, properties.version.minor), (1, 0));
    }

    #[test]
    fn load_builds_soma_and_sections_end_to_end() {
        let text = "# a tiny cell\n\
                    1 1 0 0 0 2 -1\n\
                    2 3 0 0 1 1 1\n\
                    3 3 0 0 2 1 2\n\
                    4 3 0 1 2 1 3\n\
                    5 3 0 2 2 1 3\n";
        let properties = load("cell.swc", text, Options::default()).unwrap();

        assert_eq!(properties.soma.kind, SomaKind::SinglePoint);
        assert_eq!(properties.sections.len(), 3);
        assert!(properties
            .sections
            .iter()
            .all(|s| s.section_type == SectionType::BasalDendrite));
        assert_eq!(properties.root_sections(), vec![0]);
    }

    #[test]
    fn load_applies_forwarded_options() {
        let text = "1 1 0 0 0 2 -1\n\
                    2 2 0 0 1 1 1\n\
                    3 2 0 0 2 1 2\n\
                    4 2 0 0 3 1 3\n";
        let properties = load(
            "cell.swc",
            text,
            Options {
                two_points_sections: true,
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(properties.sections.len(), 1);
        assert_eq!(
            properties.sections[0].points,
            vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 3.0)]
        );
    }

    #[test]
    fn load_with_handler_reports_warnings_in_pass_order() {
        // zero diameter on line 4 (validation) precedes the non-conform
        // soma warning (classification) despite the soma coming first
        let text = "1 1 0 0 0 1 -1\n\
                    2 1 0 -1 0 1 1\n\
                    3 1 0 2 0 1 1\n\
                    4 2 0 0 1 0 1\n";
        let mut collector = WarningCollector::new();
        load_with_handler("cell.swc", text, Options::default(), &mut collector).unwrap();
        assert_eq!(
            collector.kinds(),
            vec![WarningKind::ZeroDiameter, WarningKind::SomaNonConform]
        );
    }

    #[test]
    fn load_rejects_malformed_text() {
        assert!(load("bad.swc", "not an swc file\n", Options::default()).is_err());
        assert!(load("bad.swc", "1 1 0 0 0 1\n", Options::default()).is_err());
    }
}
