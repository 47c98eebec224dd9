//! Decoding of raw fixed-width surface observation records.

pub mod convert;
pub mod layout;
pub mod report;
pub mod sections;

pub use report::{DecodedReport, HEADER};

use layout::{extract, slice};
use sections::Section;

/// Length of the control and mandatory data sections.
pub const PREFIX_LENGTH: usize = 105;
const REMARKS_MARKER: &str = "REM";

/// One raw record with its remarks boundary located.
///
/// Tagged sub-records are searched from the end of the mandatory prefix;
/// only the first occurrence of a tag counts, and only if it starts before
/// the remarks marker.
#[derive(Debug, Clone, Copy)]
pub struct RawLine<'a> {
    text: &'a str,
    remarks: usize,
}

impl<'a> RawLine<'a> {
    pub fn new(text: &'a str) -> Self {
        let remarks = find_from(text, REMARKS_MARKER, PREFIX_LENGTH).unwrap_or(text.len());

        RawLine { text, remarks }
    }

    /// The `length` bytes starting at `tag`, if the tag precedes the remarks.
    pub fn window(&self, tag: &str, length: usize) -> Option<&'a str> {
        let start = find_from(self.text, tag, PREFIX_LENGTH)?;
        if start >= self.remarks {
            return None;
        }
        Some(slice(self.text, start, start + length))
    }
}

fn find_from(text: &str, pattern: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(pattern).map(|i| i + from)
}

/// Decodes a positional section of the prefix.
pub fn decode_prefix<'a, S: Section<'a>>(line: &RawLine<'a>) -> S {
    S::from_fields(&extract(line.text, S::LAYOUT))
}

/// Decodes the sub-record introduced by `tag`, or `None` when absent.
pub fn decode<'a, S: Section<'a>>(line: &RawLine<'a>, tag: &str) -> Option<S> {
    line.window(tag, S::LENGTH)
        .map(|window| S::from_fields(&extract(window, S::LAYOUT)))
}

// -- Tests ----------------------------------------------------------------------------

#[cfg(test)]
pub mod tests {

    use super::sections::*;
    use super::*;

    pub const CONTROL: &str = "0029029070999991901010106004+64333+023450FM-12+000599999V020";

    pub const MANDATORY: &str = concat!(
        "270", "1", "N", "0159", "1", "99999", "9", "9", "N", "000000", "1", "N", "9", "-", "0078", "1", "+",
        "9999", "9", "10200", "1"
    );

    /// A 1901 record with only a sky-layers sub-record.
    pub fn sample_record() -> String {
        format!("{}{}ADDGF108991999999999999999999", CONTROL, MANDATORY)
    }

    #[test]
    fn should_have_full_length_prefix() {
        assert_eq!(CONTROL.len(), 60);
        assert_eq!(MANDATORY.len(), 45);
    }

    #[test]
    fn should_decode_control_and_mandatory_sections() {
        let text = sample_record();
        let line = RawLine::new(&text);

        let control: ControlSection = decode_prefix(&line);
        assert_eq!(control.id, "029070");
        assert_eq!(control.wban, "99999");
        assert_eq!(control.year, "1901");
        assert_eq!(control.minute, "00");

        let mandatory: MandatorySection = decode_prefix(&line);
        assert_eq!(mandatory.direction, "270");
        assert_eq!(mandatory.speed, "0159");
        assert_eq!(mandatory.ceiling, "99999");
        assert_eq!(mandatory.visibility, "000000");
        assert_eq!(mandatory.temp_sign, "-");
        assert_eq!(mandatory.temp, "0078");
        assert_eq!(mandatory.dewp, "9999");
        assert_eq!(mandatory.sea_level_pressure, "10200");
    }

    #[test]
    fn should_find_tag_anywhere_after_prefix() {
        let text = format!("{}{}ADDAY121061GF108991999999999999999999", CONTROL, MANDATORY);
        let line = RawLine::new(&text);

        let sky: SkyLayers = decode(&line, SKY_LAYERS_TAG).unwrap();
        assert_eq!(sky.total, "08");
        let occurrence: PrecipitationOccurrence = decode(&line, PRECIPITATION_OCCURRENCE_TAG).unwrap();
        assert_eq!(occurrence.code, "2");
        assert_eq!(decode::<Gust>(&line, GUST_TAG), None);
    }

    #[test]
    fn should_ignore_tags_after_remarks() {
        let text = format!("{}{}ADDMW1051REMSYN004OC101501", CONTROL, MANDATORY);
        let line = RawLine::new(&text);

        assert!(decode::<WeatherCode>(&line, "MW1").is_some());
        assert_eq!(decode::<Gust>(&line, GUST_TAG), None);
    }

    #[test]
    fn should_use_first_occurrence_of_repeated_tag() {
        let text = format!("{}{}ADDMW1051MW1611", CONTROL, MANDATORY);
        let line = RawLine::new(&text);

        let code: WeatherCode = decode(&line, "MW1").unwrap();
        assert_eq!(code.code, "05");
    }

    #[test]
    fn should_not_search_tags_inside_prefix() {
        // "AA1" inside the control section is not a sub-record.
        let control = CONTROL.replacen("FM-12", "AA1xx", 1);
        let text = format!("{}{}", control, MANDATORY);
        let line = RawLine::new(&text);

        assert_eq!(decode::<PrecipitationAmount>(&line, "AA1"), None);
    }

    #[test]
    fn should_tolerate_short_lines() {
        let line = RawLine::new("0029029070");
        let control: ControlSection = decode_prefix(&line);

        assert_eq!(control.id, "029070");
        assert_eq!(control.wban, "");
        assert_eq!(decode::<Gust>(&line, GUST_TAG), None);
    }

    #[test]
    fn should_truncate_window_at_end_of_line() {
        let text = format!("{}{}ADDOC10", CONTROL, MANDATORY);
        let line = RawLine::new(&text);

        let gust: Gust = decode(&line, GUST_TAG).unwrap();
        assert_eq!(gust.speed, "0");
    }
}
