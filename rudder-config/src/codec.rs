//! Per-type parse and format routines
//!
//! Covers the token encodings understood by the parameter registry:
//! yes/no booleans, plain integers, memory sizes with binary suffixes,
//! percentages and octal masks. Formatting is the left inverse of
//! parsing: a formatted value always re-parses to the same stored
//! integer, picking the canonical form (largest even memory suffix).

use rudder_utils::{Result, RudderError};

const KB: i64 = 1024;
const MB: i64 = 1024 * 1024;
const GB: i64 = 1024 * 1024 * 1024;

/// Which numeric encodings a parameter accepts.
///
/// With no flag set, only a plain base-10 signed integer is accepted.
/// `percent` stores the parsed magnitude negated into the shared signed
/// slot; a percent-enabled parameter therefore cannot also accept
/// negative absolute values, and is normally combined with `memory` so
/// that absolute values remain parsable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericEncoding {
    pub memory: bool,
    pub percent: bool,
    pub octal: bool,
}

impl NumericEncoding {
    pub const PLAIN: Self = Self {
        memory: false,
        percent: false,
        octal: false,
    };
    pub const MEMORY: Self = Self {
        memory: true,
        percent: false,
        octal: false,
    };
    pub const MEMORY_OR_PERCENT: Self = Self {
        memory: true,
        percent: true,
        octal: false,
    };
    pub const OCTAL: Self = Self {
        memory: false,
        percent: false,
        octal: true,
    };

    fn is_plain(self) -> bool {
        !self.memory && !self.percent && !self.octal
    }
}

/// Parse a case-insensitive "yes"/"no" token.
pub fn parse_yes_no(token: &str) -> Result<bool> {
    if token.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(RudderError::parse("argument must be 'yes' or 'no'"))
    }
}

/// Parse a memory-size token: decimal digits with an optional binary
/// multiplier suffix (k/kb/m/mb/g/gb, case-insensitive, base 1024).
///
/// Returns `None` when the token has no digits, an unknown suffix, or
/// overflows.
pub fn parse_memory(token: &str) -> Option<u64> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits_end == 0 {
        return None;
    }
    let value: u64 = token[..digits_end].parse().ok()?;
    let mul: u64 = match token[digits_end..].to_ascii_lowercase().as_str() {
        "" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        _ => return None,
    };
    value.checked_mul(mul)
}

/// Parse a numeric token under the declared set of encodings, in the
/// fixed priority order memory, percent, octal, plain.
pub fn parse_numeric(token: &str, enc: NumericEncoding) -> Result<i64> {
    if enc.memory {
        if let Some(v) = parse_memory(token) {
            return i64::try_from(v).map_err(|_| {
                RudderError::range("argument must be between 0 and 9223372036854775807 inclusive")
            });
        }
    }

    if enc.percent && token.len() > 1 && token.ends_with('%') {
        if let Ok(v) = token[..token.len() - 1].parse::<i64>() {
            if v >= 0 {
                // Percentages share the signed slot as negated magnitudes.
                return Ok(-v);
            }
        }
    }

    if enc.octal {
        if let Ok(v) = i64::from_str_radix(token, 8) {
            return Ok(v);
        }
    }

    if enc.is_plain() {
        if let Ok(v) = token.parse::<i64>() {
            return Ok(v);
        }
    }

    Err(RudderError::parse(expected_encodings(enc)))
}

/// Unsigned-slot variant of [`parse_numeric`], covering the full u64
/// range. Percent encoding does not apply here: the negated-magnitude
/// trick requires a signed slot.
pub fn parse_numeric_unsigned(token: &str, enc: NumericEncoding) -> Result<u64> {
    if enc.memory {
        if let Some(v) = parse_memory(token) {
            return Ok(v);
        }
    }

    if enc.octal {
        if let Ok(v) = u64::from_str_radix(token, 8) {
            return Ok(v);
        }
    }

    if enc.is_plain() {
        if let Ok(v) = token.parse::<u64>() {
            return Ok(v);
        }
    }

    Err(RudderError::parse(expected_encodings(enc)))
}

fn expected_encodings(enc: NumericEncoding) -> &'static str {
    if enc.memory && enc.percent {
        "argument must be a memory or percent value"
    } else if enc.memory {
        "argument must be a memory value"
    } else if enc.octal {
        "argument couldn't be parsed as an octal number"
    } else {
        "argument couldn't be parsed into an integer"
    }
}

/// Format a byte count using the largest binary suffix that divides it
/// evenly (gb, then mb, then kb), falling back to raw bytes.
pub fn format_memory(bytes: i64) -> String {
    if bytes != 0 && bytes % GB == 0 {
        format!("{}gb", bytes / GB)
    } else if bytes != 0 && bytes % MB == 0 {
        format!("{}mb", bytes / MB)
    } else if bytes != 0 && bytes % KB == 0 {
        format!("{}kb", bytes / KB)
    } else {
        format!("{}", bytes)
    }
}

/// Serialize a stored numeric value under its declared encodings.
pub fn format_numeric(value: i64, enc: NumericEncoding) -> String {
    if enc.percent && value < 0 {
        format!("{}%", -value)
    } else if enc.memory {
        format_memory(value)
    } else if enc.octal {
        format!("{:o}", value)
    } else {
        format!("{}", value)
    }
}

/// Unsigned-slot variant of [`format_numeric`].
pub fn format_numeric_unsigned(value: u64, enc: NumericEncoding) -> String {
    let (gb, mb, kb) = (GB as u64, MB as u64, KB as u64);
    if enc.memory && value != 0 && value % gb == 0 {
        format!("{}gb", value / gb)
    } else if enc.memory && value != 0 && value % mb == 0 {
        format!("{}mb", value / mb)
    } else if enc.memory && value != 0 && value % kb == 0 {
        format!("{}kb", value / kb)
    } else if enc.octal {
        format!("{:o}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no() {
        assert!(parse_yes_no("yes").unwrap());
        assert!(parse_yes_no("YES").unwrap());
        assert!(!parse_yes_no("No").unwrap());
        assert!(parse_yes_no("on").is_err());
        assert!(parse_yes_no("").is_err());
    }

    #[test]
    fn test_parse_memory_suffixes() {
        assert_eq!(parse_memory("0"), Some(0));
        assert_eq!(parse_memory("1024"), Some(1024));
        assert_eq!(parse_memory("1k"), Some(1024));
        assert_eq!(parse_memory("1KB"), Some(1024));
        assert_eq!(parse_memory("100mb"), Some(104_857_600));
        assert_eq!(parse_memory("2g"), Some(2 * 1024 * 1024 * 1024));
    }

    #[test]
    fn test_parse_memory_rejects() {
        assert_eq!(parse_memory("mb"), None);
        assert_eq!(parse_memory("10tb"), None);
        assert_eq!(parse_memory("10 mb"), None);
        assert_eq!(parse_memory(""), None);
        assert_eq!(parse_memory("-1"), None);
    }

    #[test]
    fn test_parse_numeric_plain_only_without_flags() {
        assert_eq!(parse_numeric("-42", NumericEncoding::PLAIN).unwrap(), -42);
        // A memory parameter does not fall back to plain parsing; bare
        // digits are the no-suffix memory form instead.
        assert_eq!(parse_numeric("42", NumericEncoding::MEMORY).unwrap(), 42);
        assert!(parse_numeric("-42", NumericEncoding::MEMORY).is_err());
    }

    #[test]
    fn test_parse_numeric_percent_negated() {
        let enc = NumericEncoding::MEMORY_OR_PERCENT;
        assert_eq!(parse_numeric("50%", enc).unwrap(), -50);
        assert_eq!(parse_numeric("0%", enc).unwrap(), 0);
        assert!(parse_numeric("-50%", enc).is_err());
        assert!(parse_numeric("%", enc).is_err());
    }

    #[test]
    fn test_parse_numeric_octal() {
        assert_eq!(parse_numeric("700", NumericEncoding::OCTAL).unwrap(), 0o700);
        assert!(parse_numeric("9", NumericEncoding::OCTAL).is_err());
        assert!(parse_numeric("70x", NumericEncoding::OCTAL).is_err());
    }

    #[test]
    fn test_parse_numeric_error_names_encodings() {
        let err = parse_numeric("bogus", NumericEncoding::MEMORY_OR_PERCENT).unwrap_err();
        assert!(err.to_string().contains("memory or percent"));
        let err = parse_numeric("bogus", NumericEncoding::PLAIN).unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_parse_numeric_unsigned_full_range() {
        let enc = NumericEncoding::PLAIN;
        assert_eq!(
            parse_numeric_unsigned("18446744073709551615", enc).unwrap(),
            u64::MAX
        );
        assert_eq!(
            parse_numeric_unsigned("9223372036854775808", enc).unwrap(),
            1u64 << 63
        );
        assert!(parse_numeric_unsigned("-1", enc).is_err());
        assert_eq!(
            parse_numeric_unsigned("16383gb", NumericEncoding::MEMORY).unwrap(),
            16383 * (1u64 << 30)
        );
    }

    #[test]
    fn test_format_numeric_unsigned() {
        assert_eq!(
            format_numeric_unsigned(u64::MAX, NumericEncoding::PLAIN),
            "18446744073709551615"
        );
        assert_eq!(
            format_numeric_unsigned(100 * 1024 * 1024, NumericEncoding::MEMORY),
            "100mb"
        );
        assert_eq!(format_numeric_unsigned(0o644, NumericEncoding::OCTAL), "644");
    }

    #[test]
    fn test_format_memory_largest_even_suffix() {
        assert_eq!(format_memory(0), "0");
        assert_eq!(format_memory(500), "500");
        assert_eq!(format_memory(1024), "1kb");
        assert_eq!(format_memory(104_857_600), "100mb");
        assert_eq!(format_memory(3 * 1024 * 1024 * 1024), "3gb");
        assert_eq!(format_memory(1536), "1536");
    }

    #[test]
    fn test_format_numeric_round_trips() {
        let enc = NumericEncoding::MEMORY_OR_PERCENT;
        for token in ["100mb", "50%", "1gb", "123"] {
            let v = parse_numeric(token, enc).unwrap();
            let formatted = format_numeric(v, enc);
            assert_eq!(parse_numeric(&formatted, enc).unwrap(), v);
        }
        assert_eq!(format_numeric(-50, enc), "50%");
        assert_eq!(format_numeric(104_857_600, enc), "100mb");
        assert_eq!(format_numeric(0o644, NumericEncoding::OCTAL), "644");
    }
}
