use std::time::Duration;

/// Width used when the interval token cannot be understood.
pub const DEFAULT_WIDTH: Duration = Duration::from_secs(5 * 60);

/// Width of a time bucket. Zero means no bucketing: rows group by their
/// exact timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BucketWidth(Duration);

impl BucketWidth {
    pub fn new(width: Duration) -> Self {
        BucketWidth(width)
    }

    /// Parses tokens such as `5m` or `1h`. Never fails: anything that is not
    /// a decimal magnitude followed by `m` or `h` yields [`DEFAULT_WIDTH`].
    pub fn parse(token: &str) -> Self {
        BucketWidth(parse_duration(token.trim()).unwrap_or(DEFAULT_WIDTH))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_micros(&self) -> u64 {
        u64::try_from(self.0.as_micros()).unwrap_or(u64::MAX)
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        BucketWidth(DEFAULT_WIDTH)
    }
}

fn parse_duration(token: &str) -> Option<Duration> {
    let unit = token.chars().last()?;
    let magnitude = &token[..token.len() - unit.len_utf8()];
    if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude: u64 = magnitude.parse().ok()?;

    let secs = match unit {
        'm' => magnitude.checked_mul(60)?,
        'h' => magnitude.checked_mul(60 * 60)?,
        _ => return None,
    };
    // Keep the width representable in microseconds.
    secs.checked_mul(1_000_000)?;
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_hours() {
        assert_eq!(BucketWidth::parse("1m").as_micros(), 60_000_000);
        assert_eq!(BucketWidth::parse("15m").as_micros(), 900_000_000);
        assert_eq!(BucketWidth::parse("2h").as_micros(), 7_200_000_000);
        assert_eq!(BucketWidth::parse(" 1h ").as_micros(), 3_600_000_000);
    }

    #[test]
    fn malformed_tokens_fall_back_to_five_minutes() {
        let expected = BucketWidth::parse("5m");
        for token in ["abc", "", "10x", "m", "h", "-5m", "1.5h", "5M", "5mm", "é", "5 m"] {
            assert_eq!(BucketWidth::parse(token), expected, "token {token:?}");
        }
        assert_eq!(BucketWidth::default(), expected);
    }

    #[test]
    fn overflowing_magnitude_falls_back() {
        assert_eq!(
            BucketWidth::parse("99999999999999999999h"),
            BucketWidth::default()
        );
        assert_eq!(
            BucketWidth::parse(&format!("{}h", u64::MAX / 60)),
            BucketWidth::default()
        );
    }

    #[test]
    fn zero_magnitude_is_kept() {
        let width = BucketWidth::parse("0m");
        assert!(width.is_zero());
        assert_eq!(width.as_micros(), 0);
    }
}
