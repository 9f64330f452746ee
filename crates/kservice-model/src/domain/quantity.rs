use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Internal precision: every quantity is stored as an integer count of nano units.
const NANO_EXP: i32 = -9;
const NANO_SCALE: i128 = 1_000_000_000;

/// Largest power of ten representable in `i128`.
const MAX_POW10: u32 = 38;

/// Error produced when a quantity string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity must not be empty")]
    Empty,
    #[error("quantities must match '<sign><digits>[.<digits>]<suffix>': {0:?}")]
    InvalidFormat(String),
    #[error("unable to parse quantity's suffix: {0:?}")]
    InvalidSuffix(String),
    #[error("quantity is out of range: {0:?}")]
    OutOfRange(String),
}

/// Notation a quantity was written in; it drives the canonical rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuantityFormat {
    /// `n u m k M G T P E` or no suffix.
    DecimalSi,
    /// `Ki Mi Gi Ti Pi Ei`.
    BinarySi,
    /// `e<n>` / `E<n>`.
    DecimalExponent,
}

/// Orchestrator resource quantity (`"200m"`, `"400Mi"`, `"1e3"`).
///
/// Values are rounded up to nano precision on parse. Two quantities compare
/// equal when they denote the same value, whatever notation they were written in,
/// so `"0.5"` and `"500m"` are equal and both render as `"500m"`.
#[derive(Debug, Clone, Copy)]
pub struct Quantity {
    nanos: i128,
    format: QuantityFormat,
}

enum Multiplier {
    Pow10(i32),
    Pow1024(u32),
}

impl Quantity {
    /// Parse a quantity string.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        if input.is_empty() {
            return Err(QuantityError::Empty);
        }
        let invalid = || QuantityError::InvalidFormat(input.to_string());

        let (negative, unsigned) = match input.as_bytes()[0] {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };

        let split = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(split);

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.contains('.') {
            return Err(invalid());
        }
        let frac = frac.trim_end_matches('0');

        let (multiplier, format) = parse_suffix(suffix)
            .ok_or_else(|| QuantityError::InvalidSuffix(suffix.to_string()))?;

        let out_of_range = || QuantityError::OutOfRange(input.to_string());
        let mantissa = parse_digits(whole, frac).ok_or_else(out_of_range)?;
        let scale = frac.len() as i32;

        let magnitude = match multiplier {
            Multiplier::Pow10(exp) => {
                shift_pow10(mantissa, exp.saturating_sub(scale).saturating_sub(NANO_EXP))
            }
            Multiplier::Pow1024(exp) => 1024i128
                .checked_pow(exp)
                .and_then(|m| mantissa.checked_mul(m))
                .and_then(|m| m.checked_mul(NANO_SCALE))
                .and_then(|m| shift_pow10(m, -scale)),
        }
        .ok_or_else(out_of_range)?;

        Ok(Self {
            nanos: if negative { -magnitude } else { magnitude },
            format,
        })
    }

    fn fmt_decimal(&self, f: &mut fmt::Formatter<'_>, format: QuantityFormat) -> fmt::Result {
        let mut mantissa = self.nanos;
        let mut exp = NANO_EXP;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exp += 1;
        }
        while exp.rem_euclid(3) != 0 {
            mantissa *= 10;
            exp -= 1;
        }

        let suffix = match (format, exp) {
            (QuantityFormat::DecimalExponent, 0) => String::new(),
            (QuantityFormat::DecimalExponent, e) => format!("e{e}"),
            (_, -9) => "n".into(),
            (_, -6) => "u".into(),
            (_, -3) => "m".into(),
            (_, 0) => String::new(),
            (_, 3) => "k".into(),
            (_, 6) => "M".into(),
            (_, 9) => "G".into(),
            (_, 12) => "T".into(),
            (_, 15) => "P".into(),
            (_, 18) => "E".into(),
            (_, e) => format!("e{e}"),
        };
        write!(f, "{mantissa}{suffix}")
    }

    fn fmt_binary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

        let mut value = self.nanos / NANO_SCALE;
        let mut idx = 0;
        while value % 1024 == 0 && idx < SUFFIXES.len() - 1 {
            value /= 1024;
            idx += 1;
        }
        write!(f, "{value}{}", SUFFIXES[idx])
    }
}

fn parse_suffix(suffix: &str) -> Option<(Multiplier, QuantityFormat)> {
    use Multiplier::*;
    use QuantityFormat::*;

    let parsed = match suffix {
        "" => (Pow10(0), DecimalSi),
        "n" => (Pow10(-9), DecimalSi),
        "u" => (Pow10(-6), DecimalSi),
        "m" => (Pow10(-3), DecimalSi),
        "k" => (Pow10(3), DecimalSi),
        "M" => (Pow10(6), DecimalSi),
        "G" => (Pow10(9), DecimalSi),
        "T" => (Pow10(12), DecimalSi),
        "P" => (Pow10(15), DecimalSi),
        "E" => (Pow10(18), DecimalSi),
        "Ki" => (Pow1024(1), BinarySi),
        "Mi" => (Pow1024(2), BinarySi),
        "Gi" => (Pow1024(3), BinarySi),
        "Ti" => (Pow1024(4), BinarySi),
        "Pi" => (Pow1024(5), BinarySi),
        "Ei" => (Pow1024(6), BinarySi),
        other => {
            let exp = other.strip_prefix(['e', 'E'])?;
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (Pow10(exp.parse().ok()?), DecimalExponent)
        }
    };
    Some(parsed)
}

fn parse_digits(whole: &str, frac: &str) -> Option<i128> {
    whole
        .bytes()
        .chain(frac.bytes())
        .try_fold(0i128, |acc, b| {
            acc.checked_mul(10)?.checked_add(i128::from(b - b'0'))
        })
}

/// Multiply `value` by `10^exp`; negative exponents divide, rounding away from zero.
fn shift_pow10(value: i128, exp: i32) -> Option<i128> {
    if value == 0 {
        return Some(0);
    }
    if exp >= 0 {
        return 10i128
            .checked_pow(exp as u32)
            .and_then(|m| value.checked_mul(m));
    }
    let exp = exp.unsigned_abs();
    if exp > MAX_POW10 {
        return Some(1);
    }
    let divisor = 10i128.pow(exp);
    let quotient = value / divisor;
    Some(if value % divisor == 0 { quotient } else { quotient + 1 })
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("0");
        }
        match self.format {
            QuantityFormat::BinarySi
                if self.nanos.abs() >= 1024 * NANO_SCALE && self.nanos % NANO_SCALE == 0 =>
            {
                self.fmt_binary(f)
            }
            QuantityFormat::BinarySi => self.fmt_decimal(f, QuantityFormat::DecimalSi),
            format => self.fmt_decimal(f, format),
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Quantity::parse(&raw).map_err(serde::de::Error::custom)
    }
}
