//! Lenient numeric parsing for form input.
//!
//! Form fields hold text. Converting them back to numbers has to tell apart
//! "nothing entered" from "entered something that is not a number", because
//! a few fields (original price, pages) send `null` for the first and the
//! rest fall back to zero.

/// Outcome of parsing one form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    /// Empty or whitespace-only input
    Absent,
    /// Input present but without a numeric prefix
    Invalid,
}

impl<T: Copy + Default> Parsed<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Parsed::Value(v) => Some(v),
            Parsed::Absent | Parsed::Invalid => None,
        }
    }

    /// Parsed value, or zero for both absent and invalid input
    pub fn or_zero(self) -> T {
        self.value().unwrap_or_default()
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Parsed::Absent)
    }
}

impl Parsed<f64> {
    /// Treat infinities as invalid, for values that must be sent as numbers
    pub fn finite(self) -> Self {
        match self {
            Parsed::Value(v) if !v.is_finite() => Parsed::Invalid,
            other => other,
        }
    }
}

/// Parse the longest floating point prefix of `raw`.
///
/// `"12.5kg"` gives 12.5, `".5"` gives 0.5, `"abc"` is invalid.
pub fn parse_float(raw: &str) -> Parsed<f64> {
    let s = raw.trim_start();
    if s.trim_end().is_empty() {
        return Parsed::Absent;
    }

    let bytes = s.as_bytes();
    let mut end = sign_len(bytes);
    let int_digits = digit_run(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return Parsed::Invalid;
    }

    // Exponent only counts when followed by at least one digit
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let exp_sign = sign_len(&bytes[end + 1..]);
        let exp_digits = digit_run(bytes, end + 1 + exp_sign);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }

    // Overflowing input parses to an infinity, which still has a sign
    match s[..end].parse::<f64>() {
        Ok(v) => Parsed::Value(v),
        Err(_) => Parsed::Invalid,
    }
}

/// Format an amount with exactly two decimals, exact halves rounded away
/// from zero.
///
/// Plain `{:.2}` rounds exact ties to even (`5.125` gives `"5.12"`). Only
/// multiples of 1/8 can sit exactly on a half cent, and for those the
/// scaling by 100 is exact.
pub fn format_cents(value: f64) -> String {
    let scaled = value * 100.0;
    if (value * 8.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        format!("{:.2}", scaled.round() / 100.0)
    } else {
        format!("{:.2}", value)
    }
}

/// Parse the longest integer prefix of `raw`. `"12.9"` gives 12.
pub fn parse_int(raw: &str) -> Parsed<i32> {
    let s = raw.trim_start();
    if s.trim_end().is_empty() {
        return Parsed::Absent;
    }

    let bytes = s.as_bytes();
    let sign = sign_len(bytes);
    let digits = digit_run(bytes, sign);
    if digits == 0 {
        return Parsed::Invalid;
    }

    match s[..sign + digits].parse::<i32>() {
        Ok(v) => Parsed::Value(v),
        Err(_) => Parsed::Invalid,
    }
}

fn sign_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    }
}

fn digit_run(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
        .unwrap_or(0)
}
