//! Duration strings such as `300ms`, `1h30m` or `1.5s`

use std::fmt;
use std::time::Duration;

/// Largest duration accepted, matching a signed 64-bit nanosecond count
const MAX_NANOS: u128 = i64::MAX as u128;

/// Error returned by [`parse_duration`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationError {
    input: String,
    reason: &'static str,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time: {} in duration {:?}", self.reason, self.input)
    }
}

impl std::error::Error for DurationError {}

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    })
}

/// Parse a sequence of decimal numbers, each with an optional fraction and a
/// unit suffix. Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
///
/// A bare `0` is accepted without a unit. Negative durations cannot be
/// represented and are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let fail = |reason| DurationError {
        input: input.to_string(),
        reason,
    };

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(fail("invalid duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_frac) = match after_int.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
                tail.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(fail("invalid duration"));
        }

        let unit_len = after_frac
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_frac.len());
        if unit_len == 0 {
            return Err(fail("missing unit"));
        }
        let (unit, tail) = after_frac.split_at(unit_len);
        let scale = unit_nanos(unit).ok_or_else(|| fail("unknown unit"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| fail("invalid duration"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .filter(|n| *n <= MAX_NANOS)
            .ok_or_else(|| fail("invalid duration"))?;

        // Fractions are truncated toward zero, digits past nanosecond
        // precision are ignored.
        let mut place = scale;
        for digit in frac_part.bytes() {
            place /= 10;
            if place == 0 {
                break;
            }
            nanos += u128::from(digit - b'0') * place;
        }

        total = total
            .checked_add(nanos)
            .filter(|n| *n <= MAX_NANOS)
            .ok_or_else(|| fail("invalid duration"))?;
        rest = tail;
    }

    if negative && total != 0 {
        return Err(fail("negative duration"));
    }

    Ok(Duration::from_nanos(total as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("10µs").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.s").unwrap(), Duration::from_secs(1));
        assert_eq!(
            parse_duration("2h45m30.5s").unwrap(),
            Duration::from_millis((2 * 3600 + 45 * 60 + 30) * 1000 + 500)
        );
        assert_eq!(parse_duration("+3s").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn test_zero_forms() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in ["", "s", "10", "1x", "1.5", ".s", "-", "1h-2m", "abc"] {
            assert!(parse_duration(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_rejects_negative() {
        let err = parse_duration("-5s").unwrap_err();
        assert_eq!(err.to_string(), "time: negative duration in duration \"-5s\"");
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(parse_duration("3000000h").is_err());
        assert!(parse_duration("2562047h").is_ok());
    }
}
