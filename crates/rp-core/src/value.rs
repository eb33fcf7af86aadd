use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How an incremented number is written back into a value label.
///
/// # Example
/// ```
/// use rp_core::value::IncrementPolicy;
/// assert_eq!(IncrementPolicy::default(), IncrementPolicy::PreserveSuffix);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum IncrementPolicy {
    /// Replace only the leading integer run. Units and trailing text are kept.
    #[default]
    PreserveSuffix,
    /// Replace the whole label with the incremented number.
    ReplaceLabel,
}

/// Leading integer found at the start of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeadingInteger {
    /// Parsed value, clamped to the `i64` range.
    pub value: i64,
    /// Byte offset of the sign (or first digit), after skipped whitespace.
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
}

/// Same set as C `isspace` in the "C" locale.
#[inline]
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Scan `text` like `strtol(text, &end, 10)`.
///
/// Leading whitespace is skipped, one optional `+`/`-` is accepted, then at
/// least one ASCII digit must follow. Everything after the digit run is ignored.
/// Out-of-range values clamp to `i64::MAX` / `i64::MIN`.
///
/// # Example
/// ```
/// use rp_core::value::parse_leading_integer;
/// let lead = parse_leading_integer("5920 M/S").unwrap();
/// assert_eq!(lead.value, 5920);
/// assert_eq!(lead.end, 4);
/// assert!(parse_leading_integer("us").is_none());
/// ```
#[must_use]
pub fn parse_leading_integer(text: &str) -> Option<LeadingInteger> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while bytes.get(pos).copied().is_some_and(is_c_space) {
        pos += 1;
    }
    let start = pos;

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let digits_start = pos;
    let mut value: i64 = 0;
    while let Some(&b) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        let digit = i64::from(b - b'0');
        // Accumulation dans le signe final : i64::MIN reste représentable.
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        pos += 1;
    }

    if pos == digits_start {
        return None;
    }

    Some(LeadingInteger {
        value,
        start,
        end: pos,
    })
}

/// Increment the leading integer of a label by one.
///
/// Returns the label unchanged (borrowed) when it has no leading integer.
/// The increment saturates at `i64::MAX`.
///
/// # Example
/// ```
/// use rp_core::value::{increment_leading_integer, IncrementPolicy};
/// assert_eq!(increment_leading_integer("100", IncrementPolicy::PreserveSuffix), "101");
/// assert_eq!(increment_leading_integer("25.0 dB", IncrementPolicy::PreserveSuffix), "26.0 dB");
/// assert_eq!(increment_leading_integer("25.0 dB", IncrementPolicy::ReplaceLabel), "26");
/// assert_eq!(increment_leading_integer("OFF", IncrementPolicy::ReplaceLabel), "OFF");
/// ```
#[must_use]
pub fn increment_leading_integer(text: &str, policy: IncrementPolicy) -> Cow<'_, str> {
    let Some(lead) = parse_leading_integer(text) else {
        return Cow::Borrowed(text);
    };
    let next = lead.value.saturating_add(1);

    match policy {
        IncrementPolicy::ReplaceLabel => Cow::Owned(next.to_string()),
        IncrementPolicy::PreserveSuffix => Cow::Owned(format!(
            "{}{next}{}",
            &text[..lead.start],
            &text[lead.end..]
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preserve(text: &str) -> String {
        increment_leading_integer(text, IncrementPolicy::PreserveSuffix).into_owned()
    }

    fn replace(text: &str) -> String {
        increment_leading_integer(text, IncrementPolicy::ReplaceLabel).into_owned()
    }

    #[test]
    fn plain_integer_counts_up() {
        assert_eq!(preserve("100"), "101");
        assert_eq!(preserve("101"), "102");
        assert_eq!(replace("100"), "101");
    }

    #[test]
    fn suffix_kept_or_dropped_by_policy() {
        assert_eq!(preserve("5920 M/S"), "5921 M/S");
        assert_eq!(replace("5920 M/S"), "5921");
        assert_eq!(preserve("25.0 dB"), "26.0 dB");
        assert_eq!(replace("25.0 dB"), "26");
        assert_eq!(preserve("7.81 us"), "8.81 us");
        assert_eq!(preserve("0.00 mm"), "1.00 mm");
    }

    #[test]
    fn whitespace_and_sign_follow_strtol() {
        assert_eq!(preserve("  42x"), "  43x");
        assert_eq!(preserve("\t+5"), "\t6");
        assert_eq!(preserve("-1 dB"), "0 dB");
        assert_eq!(replace(" -10"), "-9");
    }

    #[test]
    fn no_leading_digits_leaves_text_alone() {
        for text in ["", "us", "-", "+ 3", " .5", "x12", "\u{0661}\u{0662}"] {
            assert!(
                matches!(
                    increment_leading_integer(text, IncrementPolicy::PreserveSuffix),
                    Cow::Borrowed(_)
                ),
                "{text:?} ne devrait pas changer"
            );
            assert_eq!(replace(text), text);
        }
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(preserve("9223372036854775807"), "9223372036854775807");
        assert_eq!(preserve("99999999999999999999 km"), "9223372036854775807 km");
        assert_eq!(
            replace("-99999999999999999999"),
            (i64::MIN + 1).to_string()
        );
    }

    #[test]
    fn non_ascii_suffix_is_preserved() {
        assert_eq!(preserve("12é"), "13é");
        assert_eq!(preserve("3 µs"), "4 µs");
    }

    #[test]
    fn parse_reports_span() {
        let lead = parse_leading_integer("  -42 mm").unwrap();
        assert_eq!(lead.value, -42);
        assert_eq!(lead.start, 2);
        assert_eq!(lead.end, 5);
    }
}
