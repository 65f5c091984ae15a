use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Fixed-point money amount with two fractional digits, held as hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost {
    cents: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CostParseError {
    #[error("cost is empty")]
    Empty,
    #[error("invalid cost format: {0}")]
    InvalidFormat(String),
    #[error("cost has more than 2 fractional digits: {value}")]
    TooPrecise { value: String },
    #[error("cost out of range: {0}")]
    OutOfRange(String),
}

impl Cost {
    pub const SCALE_DIGITS: usize = 2;
    const SCALE: u64 = 100;

    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn cents(&self) -> u64 {
        self.cents
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / Self::SCALE, self.cents % Self::SCALE)
    }
}

impl FromStr for Cost {
    type Err = CostParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CostParseError::Empty);
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(CostParseError::InvalidFormat(trimmed.to_string()));
        }
        if fraction.len() > Self::SCALE_DIGITS {
            return Err(CostParseError::TooPrecise {
                value: trimmed.to_string(),
            });
        }

        let out_of_range = || CostParseError::OutOfRange(trimmed.to_string());
        let whole: u64 = whole.parse().map_err(|_| out_of_range())?;
        let mut fraction_cents: u64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| out_of_range())?
        };
        if fraction.len() == 1 {
            fraction_cents *= 10;
        }

        let cents = whole
            .checked_mul(Self::SCALE)
            .and_then(|c| c.checked_add(fraction_cents))
            .filter(|c| i64::try_from(*c).is_ok())
            .ok_or_else(out_of_range)?;

        Ok(Self { cents })
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(Cost::from_str("12").unwrap().cents(), 1200);
        assert_eq!(Cost::from_str("12.5").unwrap().cents(), 1250);
        assert_eq!(Cost::from_str("12.05").unwrap().cents(), 1205);
        assert_eq!(Cost::from_str(" 0.99 ").unwrap().cents(), 99);
        assert_eq!(Cost::from_str("7.").unwrap().cents(), 700);
    }

    #[test]
    fn renders_two_fractional_digits() {
        assert_eq!(Cost::from_cents(1250).to_string(), "12.50");
        assert_eq!(Cost::from_cents(5).to_string(), "0.05");
        assert_eq!(Cost::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(Cost::from_str(""), Err(CostParseError::Empty));
        assert!(matches!(
            Cost::from_str("-3.00"),
            Err(CostParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Cost::from_str(".50"),
            Err(CostParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Cost::from_str("1.2.3"),
            Err(CostParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Cost::from_str("abc"),
            Err(CostParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        let err = Cost::from_str("1.005").unwrap_err();
        assert_eq!(
            err,
            CostParseError::TooPrecise {
                value: "1.005".to_string()
            }
        );
        assert!(err.to_string().contains("more than 2 fractional digits"));
    }

    #[test]
    fn rejects_amounts_beyond_storage_range() {
        assert!(matches!(
            Cost::from_str("99999999999999999999"),
            Err(CostParseError::OutOfRange(_))
        ));
        assert!(matches!(
            Cost::from_str("92233720368547758.08"),
            Err(CostParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Cost::from_cents(4999)).unwrap();
        assert_eq!(json, "\"49.99\"");
        let parsed: Cost = serde_json::from_str("\"49.9\"").unwrap();
        assert_eq!(parsed.cents(), 4990);
        assert!(serde_json::from_str::<Cost>("\"49.999\"").is_err());
    }
}
