use super::tokenizer::Tokenizer;
use crate::error::RawDataError;
use crate::math::Point3;

/// One SWC record as lexed, before structural validation.
///
/// The section type is kept raw; the validation pass range-checks it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawSample {
    pub id: u32,
    pub raw_type: i64,
    pub point: Point3,
    /// Twice the radius read from the file.
    pub diameter: f64,
    /// Parent sample id; `None` encodes the `-1` no-parent sentinel.
    pub parent: Option<u32>,
    /// 1-based source line, kept for diagnostics.
    pub line: u32,
}

fn to_id(value: i64, line: u32) -> Result<u32, RawDataError> {
    if value < 0 {
        return Err(RawDataError::NegativeId { line });
    }
    u32::try_from(value).map_err(|_| RawDataError::NonParsableLine { line })
}

/// Materializes the flat, source-ordered sample list from SWC text.
///
/// Each record is seven numeric fields (`id type x y z radius parent`)
/// terminated by a newline or the end of the input.
pub(crate) fn read_samples(contents: &str) -> Result<Vec<RawSample>, RawDataError> {
    let mut samples = Vec::new();
    let mut tokenizer = Tokenizer::new(contents);
    tokenizer.consume_line_and_trailing_comments();

    while !tokenizer.done() {
        let line = tokenizer.line();

        let id = to_id(tokenizer.read_int()?, line)?;
        let raw_type = tokenizer.read_int()?;
        let x = tokenizer.read_float()?;
        let y = tokenizer.read_float()?;
        let z = tokenizer.read_float()?;
        // radii are stored as diameters
        let diameter = 2.0 * tokenizer.read_float()?;

        let parent = match tokenizer.read_int()? {
            -1 => None,
            value if value < -1 => return Err(RawDataError::NegativeId { line }),
            value => Some(to_id(value, line)?),
        };

        if !tokenizer.consume_line_and_trailing_comments() {
            return Err(RawDataError::NonParsableLine { line });
        }

        samples.push(RawSample {
            id,
            raw_type,
            point: Point3::new(x, y, z),
            diameter,
            parent,
            line,
        });
    }
    Ok(samples)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_single_record() {
        let samples = read_samples("1 1 0.5 -1.5 2 3.25 -1\n").unwrap();
        assert_eq!(samples.len(), 1);
        let sample = &samples[0];
        assert_eq!(sample.id, 1);
        assert_eq!(sample.raw_type, 1);
        assert_eq!(sample.point, Point3::new(0.5, -1.5, 2.0));
        assert!((sample.diameter - 6.5).abs() < f64::EPSILON);
        assert_eq!(sample.parent, None);
        assert_eq!(sample.line, 1);
    }

    #[test]
    fn radius_is_doubled_into_diameter() {
        let samples = read_samples("1 1 0 0 0 4 -1\n").unwrap();
        assert!((samples[0].diameter - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn comment_prelude_and_inline_comments_are_ignored() {
        let text = "# generated\n# by hand\n\n1 1 0 0 0 1 -1 # the soma\n2 2 0 0 1 1 1\n";
        let samples = read_samples(text).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].line, 4);
        assert_eq!(samples[1].line, 5);
        assert_eq!(samples[1].parent, Some(1));
    }

    #[test]
    fn fields_may_be_separated_by_tabs_and_carriage_returns() {
        let samples = read_samples("1\t1\r 0\t0 0\t1 -1\r\n").unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn record_may_span_lines() {
        let samples = read_samples("1 1\n0 0 0 1 -1\n").unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].line, 1);
    }

    #[test]
    fn source_order_is_preserved_without_sorting() {
        let samples = read_samples("3 2 0 0 2 1 1\n1 1 0 0 0 1 -1\n2 2 0 0 1 1 1\n").unwrap();
        let ids: Vec<u32> = samples.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn negative_id_is_fatal() {
        let err = read_samples("-1 1 0 0 0 1 -1\n").unwrap_err();
        assert!(matches!(err, RawDataError::NegativeId { line: 1 }));
    }

    #[test]
    fn parent_below_minus_one_is_fatal() {
        let err = read_samples("1 1 0 0 0 1 -2\n").unwrap_err();
        assert!(matches!(err, RawDataError::NegativeId { line: 1 }));
    }

    #[test]
    fn truncated_record_is_early_end_of_file() {
        let err = read_samples("1 1 0 0 0 1\n").unwrap_err();
        assert!(matches!(err, RawDataError::EarlyEndOfFile { .. }));
    }

    #[test]
    fn extra_field_on_a_record_is_fatal() {
        let err = read_samples("1 1 0 0 0 1 -1 99\n").unwrap_err();
        assert!(matches!(err, RawDataError::NonParsableLine { line: 1 }));
    }

    #[test]
    fn non_numeric_field_is_fatal() {
        let err = read_samples("1 1 x 0 0 1 -1\n").unwrap_err();
        assert!(matches!(err, RawDataError::NonParsableLine { line: 1 }));
    }

    #[test]
    fn error_reports_the_offending_line() {
        let err = read_samples("1 1 0 0 0 1 -1\n2 2 0 0 1 bad 1\n").unwrap_err();
        assert!(matches!(err, RawDataError::NonParsableLine { line: 2 }));
    }
}
