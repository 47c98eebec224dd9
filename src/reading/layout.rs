//! Positional field extraction from fixed-width text.

/// A named byte range `[start, end)` within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

pub const fn field(name: &'static str, start: usize, end: usize) -> FieldSpec {
    FieldSpec { name, start, end }
}

/// Tokens extracted from a window, looked up by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields<'a> {
    values: Vec<(&'static str, &'a str)>,
}

impl<'a> Fields<'a> {
    /// The token for `name`, or an empty string when the window was too
    /// short or the layout does not define it.
    pub fn get(&self, name: &str) -> &'a str {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .unwrap_or("")
    }
}

/// Slices every field of `layout` out of `window`.
pub fn extract<'a>(window: &'a str, layout: &[FieldSpec]) -> Fields<'a> {
    let values = layout
        .iter()
        .map(|spec| (spec.name, slice(window, spec.start, spec.end)))
        .collect();

    Fields { values }
}

/// Byte slice clamped to the text, like slicing a short line: out of range
/// yields what is there, possibly nothing.
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    let end = end.min(text.len());
    if start >= end {
        return "";
    }
    text.get(start..end).unwrap_or("")
}

#[cfg(test)]
mod tests {

    use super::*;

    const LAYOUT: &[FieldSpec] = &[field("a", 0, 2), field("b", 2, 5), field("c", 8, 10)];

    #[test]
    fn should_extract_named_fields() {
        let fields = extract("12345", LAYOUT);

        assert_eq!(fields.get("a"), "12");
        assert_eq!(fields.get("b"), "345");
        assert_eq!(fields.get("c"), "");
        assert_eq!(fields.get("missing"), "");
    }

    #[test]
    fn should_clamp_short_windows() {
        assert_eq!(slice("abc", 1, 10), "bc");
        assert_eq!(slice("abc", 5, 10), "");
        assert_eq!(slice("abc", 2, 1), "");
    }
}
