//! # Duration Values
//!
//! Parses and formats the duration strings used in config files and env
//! variables: a sequence of decimal numbers, each with an optional fraction
//! and a unit suffix (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`), e.g. `"1h30m"`,
//! `"250ms"`, `"1.5s"`. A bare `"0"` is accepted.
//!
//! Also provides `serialize`/`deserialize` for `#[serde(with = "crate::duration")]`.
//!
//! Integers in a file are read as whole seconds, so `timeout: 30` is thirty
//! seconds. This differs from Go's `time.Duration` decoding, which reads a
//! bare integer as nanoseconds; write `30ns` when nanoseconds are meant.

use configo_errors::DurationError;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Keeps the fraction multiplication inside `u128`.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a duration string such as `"1m30s"`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if unsigned.starts_with('-') {
        return Err(DurationError::Negative {
            input: input.to_string(),
        });
    }
    if unsigned == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = unsigned;
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (int_part, tail) = rest.split_at(int_len);

        let (frac_part, tail) = match tail.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after_dot.len());
                after_dot.split_at(frac_len)
            }
            None => ("", tail),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DurationError::Invalid {
                input: input.to_string(),
                reason: "expected a number".to_string(),
            });
        }

        let unit_len = tail
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        if unit.is_empty() {
            return Err(DurationError::MissingUnit {
                input: input.to_string(),
            });
        }

        let unit_nanos = unit_in_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            input: input.to_string(),
            unit: unit.to_string(),
        })?;

        let overflow = || DurationError::Overflow {
            input: input.to_string(),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut value = whole.checked_mul(unit_nanos).ok_or_else(overflow)?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let fraction: u128 = digits.parse().map_err(|_| overflow())?;
            let scale = 10u128.pow(digits.len() as u32);
            value = value
                .checked_add(fraction * unit_nanos / scale)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
        rest = next;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| DurationError::Overflow {
        input: input.to_string(),
    })?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn unit_in_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Format a duration in the largest unit that represents it exactly.
///
/// The output always parses back to the same value.
pub fn format_duration(value: Duration) -> String {
    if value.is_zero() {
        return "0s".to_string();
    }

    if value.subsec_nanos() == 0 {
        let secs = value.as_secs();
        if secs % 3_600 == 0 {
            return format!("{}h", secs / 3_600);
        }
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{}s", secs);
    }

    let nanos = value.as_nanos();
    if nanos % 1_000_000 == 0 {
        format!("{}ms", nanos / 1_000_000)
    } else if nanos % 1_000 == 0 {
        format!("{}us", nanos / 1_000)
    } else {
        format!("{}ns", nanos)
    }
}

pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_duration(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a duration string like \"30s\" or a number of seconds")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
        parse_duration(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
        u64::try_from(value)
            .map(Duration::from_secs)
            .map_err(|_| E::custom(format!("negative duration: {}", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Duration, E> {
        Duration::try_from_secs_f64(value).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_units() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("15us").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("15µs").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn test_parse_compound_and_fraction() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1_500));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("2m3.25s").unwrap(), Duration::from_millis(123_250));
    }

    #[test]
    fn test_parse_zero_forms() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("+0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert!(matches!(
            parse_duration("10"),
            Err(DurationError::MissingUnit { .. }),
        ));
        assert!(matches!(
            parse_duration("10d"),
            Err(DurationError::UnknownUnit { unit, .. }) if unit == "d",
        ));
        assert!(matches!(
            parse_duration("-5s"),
            Err(DurationError::Negative { .. }),
        ));
        assert!(matches!(
            parse_duration("s"),
            Err(DurationError::Invalid { .. }),
        ));
        assert!(matches!(
            parse_duration("99999999999999999999999999999999999999999h"),
            Err(DurationError::Overflow { .. }),
        ));
    }

    #[test]
    fn test_format_uses_largest_exact_unit() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(7_200)), "2h");
        assert_eq!(format_duration(Duration::from_secs(300)), "5m");
        assert_eq!(format_duration(Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1500us");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
    }

    #[test]
    fn test_format_parses_back() {
        for value in [
            Duration::from_millis(1_500),
            Duration::from_secs(3_661),
            Duration::from_nanos(1_000_000_001),
        ] {
            assert_eq!(parse_duration(&format_duration(value)).unwrap(), value);
        }
    }

    #[test]
    fn test_serde_accepts_strings_and_seconds() {
        #[derive(serde::Deserialize)]
        struct Holder {
            #[serde(with = "crate::duration")]
            timeout: Duration,
        }

        let holder: Holder = serde_yaml::from_str("timeout: 1m30s").unwrap();
        assert_eq!(holder.timeout, Duration::from_secs(90));

        let holder: Holder = serde_yaml::from_str("timeout: 45").unwrap();
        assert_eq!(holder.timeout, Duration::from_secs(45));

        assert!(serde_yaml::from_str::<Holder>("timeout: soon").is_err());
        assert!(serde_yaml::from_str::<Holder>("timeout: -3").is_err());
    }
}
