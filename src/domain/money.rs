use std::fmt;

use serde::Serializer;

/// Money is held as integer cents so that sums over many records stay exact.
/// 1 unit = 100 cents, so 1250.50 = 125050 cents.
pub type Cents = i64;

/// Format cents with two decimals and thousands separators.
/// Example: 123456789 -> "1,234,567.89", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{:02}", sign, grouped, abs_cents % 100)
}

/// Parse a decimal string into cents. Digits past the second decimal place
/// are truncated.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "0.999" -> 99
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let fraction_cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        _ => fraction[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction_cents))
        .ok_or(ParseCentsError::Overflow)?;

    Ok(if negative { -cents } else { cents })
}

/// Convert decimal units held as a float into cents, truncating past the
/// second decimal place. Example: 1e16 -> 1_000_000_000_000_000_000
pub fn cents_from_units(units: f64) -> Result<Cents, ParseCentsError> {
    if !units.is_finite() {
        return Err(ParseCentsError::InvalidFormat);
    }
    let cents = (units * 100.0).trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
        return Err(ParseCentsError::Overflow);
    }
    Ok(cents as Cents)
}

/// Add two amounts, failing instead of wrapping.
pub fn add_cents(a: Cents, b: Cents) -> Result<Cents, AmountOverflow> {
    a.checked_add(b).ok_or(AmountOverflow)
}

/// Subtract two amounts, failing instead of wrapping.
pub fn sub_cents(a: Cents, b: Cents) -> Result<Cents, AmountOverflow> {
    a.checked_sub(b).ok_or(AmountOverflow)
}

/// Convert cents to decimal units for JSON output.
pub fn cents_to_units(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Serde helper emitting a `Cents` value as decimal units.
pub fn serialize_units<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(cents_to_units(*cents))
}

/// Serde helper emitting a series of `Cents` as decimal units.
pub fn serialize_units_seq<S: Serializer>(
    series: &[Cents],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(series.iter().map(|c| cents_to_units(*c)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

/// A sum of amounts does not fit in `Cents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountOverflow;

impl fmt::Display for AmountOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "amount total out of range")
    }
}

impl std::error::Error for AmountOverflow {}
