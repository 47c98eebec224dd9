//! Unit conversions and column rendering for decoded tokens.
//!
//! Every converter takes the raw token and returns the rendered column.
//! A sentinel token (all 9s) or a token that is not a plain number renders
//! as the column's asterisk placeholder.

use std::fmt::Display;

const MPS_TO_MPH: f64 = 2.237;
const METRES_TO_FEET: f64 = 3.281;
const VISIBILITY_SCALE: f64 = 0.000625;
const VISIBILITY_MAX: f64 = 99.9;
const VISIBILITY_UNLIMITED: f64 = 10.058125;
const HPA_PER_INHG: f64 = 3386.39;
const MM_TO_INCHES: f64 = 0.03937008;
const CM_TO_INCHES: f64 = 0.3937008;
/// -17.8 °C in tenths; below it the Fahrenheit value rounds downwards.
const ROUNDING_PIVOT: i64 = -178;

pub fn placeholder(width: usize) -> String {
    "*".repeat(width)
}

pub fn is_sentinel(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b == b'9')
}

/// Parses a token made only of ASCII digits.
pub fn number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn measured(token: &str) -> Option<u32> {
    if is_sentinel(token) {
        None
    } else {
        number(token)
    }
}

pub fn right(value: impl Display, width: usize) -> String {
    format!("{:>width$}", value.to_string(), width = width)
}

pub fn left(value: impl Display, width: usize) -> String {
    format!("{:<width$}", value.to_string(), width = width)
}

/// Rounds to `digits` decimals and renders the shortest decimal that reads
/// back as the rounded value, keeping at least one decimal (`0.1`, `10.0`).
pub fn decimal(value: f64, digits: usize) -> String {
    let fixed = format!("{:.*}", digits, value);
    let rounded: f64 = fixed.parse().unwrap_or(value);

    let mut text = rounded.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Tenths of °C to whole °F.
pub fn fahrenheit(tenths: i64) -> i64 {
    let f = tenths as f64 / 10.0 * 1.8 + 32.0;
    if tenths < ROUNDING_PIVOT {
        (f - 0.5) as i64
    } else {
        (f + 0.5) as i64
    }
}

pub fn wban(token: &str) -> String {
    if is_sentinel(token) {
        placeholder(5)
    } else {
        token.to_string()
    }
}

pub fn direction(token: &str) -> String {
    if token == "999" {
        placeholder(3)
    } else {
        token.to_string()
    }
}

/// Tenths of m/s to mph.
pub fn wind_speed(token: &str) -> String {
    match measured(token) {
        Some(v) => right((v as f64 / 10.0 * MPS_TO_MPH + 0.5) as i64, 3),
        None => placeholder(3),
    }
}

/// Metres to hundreds of feet.
pub fn ceiling(token: &str) -> String {
    match measured(token) {
        Some(v) => right((v as f64 * METRES_TO_FEET / 100.0 + 0.5) as i64, 3),
        None => placeholder(3),
    }
}

/// Metres to statute miles, anything past ten miles reported as 10.0.
pub fn visibility(token: &str) -> String {
    match measured(token) {
        Some(v) => {
            let mut miles = (v as f64 * VISIBILITY_SCALE).min(VISIBILITY_MAX);
            if miles > VISIBILITY_UNLIMITED {
                miles = 10.0;
            }
            right(decimal(miles, 1), 4)
        }
        None => placeholder(4),
    }
}

pub fn temperature(sign: &str, token: &str) -> String {
    match measured(token) {
        Some(v) => {
            let tenths = if sign == "-" { -(v as i64) } else { v as i64 };
            right(fahrenheit(tenths), 4)
        }
        None => placeholder(4),
    }
}

/// Tenths of hPa to hPa. Used for sea level and station pressure.
pub fn hectopascals(token: &str) -> String {
    match measured(token) {
        Some(v) => right(decimal(v as f64 / 10.0, 1), 6),
        None => placeholder(6),
    }
}

/// Tenths of hPa to inches of mercury.
pub fn altimeter(token: &str) -> String {
    match measured(token) {
        Some(v) => right(decimal(v as f64 / 10.0 * 100.0 / HPA_PER_INHG, 2), 5),
        None => placeholder(5),
    }
}

/// Total coverage code 0-10 to its sky condition literal. Other numeric
/// codes pass through unchanged; `99` and non-numeric tokens render `**`.
pub fn sky_cover(token: &str) -> String {
    if token == "99" {
        return placeholder(2);
    }
    let literal = match number(token) {
        Some(0) => "CLR",
        Some(1..=4) => "SCT",
        Some(5..=7) => "BKN",
        Some(8) => "OVC",
        Some(9) => "OBS",
        Some(10) => "POB",
        Some(_) => token,
        None => return placeholder(2),
    };
    literal.to_string()
}

/// The oktas digit of a two character cloud amount code.
pub fn cloud_amount(token: &str) -> String {
    if token == "99" {
        return placeholder(1);
    }
    token.get(1..2).map(str::to_string).unwrap_or_else(|| placeholder(1))
}

/// Tenths of mm to inches, left justified. `None` for a sentinel.
pub fn precipitation(token: &str) -> Option<String> {
    measured(token).map(|v| left(decimal(v as f64 / 10.0 * MM_TO_INCHES, 2), 6))
}

/// Centimetres to inches.
pub fn snow_depth(token: &str) -> String {
    match measured(token) {
        Some(v) => left((v as f64 * CM_TO_INCHES + 0.5) as i64, 2),
        None => placeholder(2),
    }
}

/// Signed extreme temperature token (`+0123`) to °F. The code selects the
/// slot: `M` for maximum, `N` for minimum. Returns `(max, min)`.
pub fn extremes(code: &str, token: &str) -> (String, String) {
    let mut max = placeholder(3);
    let mut min = placeholder(3);

    let sign = token.get(..1).unwrap_or("");
    let digits = token.get(1..).unwrap_or("");
    if let (Some(v), true) = (measured(digits), sign == "+" || sign == "-") {
        let tenths = if sign == "-" { -(v as i64) } else { v as i64 };
        let value = right(fahrenheit(tenths), 3);
        match code {
            "M" => max = value,
            "N" => min = value,
            _ => {}
        }
    }

    (max, min)
}
