//! Numeric text formatting and validation for the display-range fields.

/// Format `value` the way C's `%.<precision>g` does.
///
/// Uses fixed notation when the decimal exponent lies in
/// `[-4, precision)` and exponent notation otherwise; trailing zeros are
/// stripped in both forms and the exponent has a sign and at least two digits.
///
/// ```
/// use skyview_core::format::format_g;
///
/// assert_eq!(format_g(1234.5678, 4), "1235");
/// assert_eq!(format_g(0.000_012_34, 4), "1.234e-05");
/// assert_eq!(format_g(-2.5, 4), "-2.5");
/// ```
#[must_use]
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let p = i32::try_from(precision).unwrap_or(i32::MAX);

    if exponent < -4 || exponent >= p {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = usize::try_from(p - 1 - exponent).unwrap_or(0);
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Outcome of validating text typed into a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// A complete, finite floating-point number.
    Acceptable,
    /// A prefix that may still become a number (`""`, `"-"`, `"1e"`).
    Intermediate,
    /// Text that can never become a number.
    Invalid,
}

/// Input filter for the display-range fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatValidator;

impl FloatValidator {
    /// Classify `text` (surrounding whitespace is ignored).
    #[must_use]
    pub fn validate(self, text: &str) -> Validation {
        let bytes = text.trim().as_bytes();
        let len = bytes.len();
        let mut i = 0;

        if i < len && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let mut mantissa_digits = 0;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
        if i < len && bytes[i] == b'.' {
            i += 1;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
                mantissa_digits += 1;
            }
        }
        if i == len {
            return if mantissa_digits > 0 {
                Self::finite_or_intermediate(text)
            } else {
                Validation::Intermediate
            };
        }

        if !matches!(bytes[i], b'e' | b'E') || mantissa_digits == 0 {
            return Validation::Invalid;
        }
        i += 1;
        if i < len && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let mut exponent_digits = 0;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
            exponent_digits += 1;
        }
        if i != len {
            Validation::Invalid
        } else if exponent_digits == 0 {
            Validation::Intermediate
        } else {
            Self::finite_or_intermediate(text)
        }
    }

    /// Whether `text` should be let into the field while typing.
    #[must_use]
    pub fn allows(self, text: &str) -> bool {
        self.validate(text) != Validation::Invalid
    }

    fn finite_or_intermediate(text: &str) -> Validation {
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Validation::Acceptable,
            _ => Validation::Intermediate,
        }
    }
}

/// Parse a committed field value; `None` unless the text is a complete finite number.
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    if FloatValidator.validate(text) != Validation::Acceptable {
        return None;
    }
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_g_fixed_range() {
        assert_eq!(format_g(0.0, 4), "0");
        assert_eq!(format_g(-0.0, 4), "-0");
        assert_eq!(format_g(0.5, 4), "0.5");
        assert_eq!(format_g(100.0, 4), "100");
        assert_eq!(format_g(1234.5678, 4), "1235");
        assert_eq!(format_g(3.141_592_65, 4), "3.142");
        assert_eq!(format_g(0.000_123_4, 4), "0.0001234");
    }

    #[test]
    fn test_format_g_exponent_range() {
        assert_eq!(format_g(123_456.0, 4), "1.235e+05");
        assert_eq!(format_g(1e-5, 4), "1e-05");
        assert_eq!(format_g(-2.5e-7, 4), "-2.5e-07");
        assert_eq!(format_g(9999.7, 4), "1e+04");
        assert_eq!(format_g(1.5e120, 4), "1.5e+120");
    }

    #[test]
    fn test_format_g_precision() {
        assert_eq!(format_g(1234.5678, 6), "1234.57");
        assert_eq!(format_g(1234.5678, 1), "1e+03");
        assert_eq!(format_g(f64::NAN, 4), "nan");
        assert_eq!(format_g(f64::NEG_INFINITY, 4), "-inf");
    }

    #[test]
    fn test_validator_states() {
        let v = FloatValidator;
        for ok in ["1", "-1.5", "+.5", "2.", "1e3", "1.5E-04", " 7 "] {
            assert_eq!(v.validate(ok), Validation::Acceptable, "{ok}");
        }
        for partial in ["", "-", "+", ".", "-.", "1e", "1e-", "1e999"] {
            assert_eq!(v.validate(partial), Validation::Intermediate, "{partial}");
        }
        for bad in ["abc", "1..2", "e5", "1e5x", "nan", "inf", "--1"] {
            assert_eq!(v.validate(bad), Validation::Invalid, "{bad}");
        }
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(" 2.5 "), Some(2.5));
        assert_eq!(parse_float("-1e-3"), Some(-0.001));
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("junk"), None);
        assert_eq!(parse_float("inf"), None);
    }
}
