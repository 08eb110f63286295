//! Normalization of loosely typed host input into typed records.
//!
//! Hosts hand over numbers, strings and booleans more or less
//! interchangeably. Everything is converted here, once, so the registry only
//! ever sees `i32`, `f64` and `bool`. Nothing in this module fails: text that
//! does not parse falls back to a default and a `debug!` line is emitted.

use log::debug;

use crate::cell::clamp;
use crate::geom::Point;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A loosely typed argument as received from a host.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Integer reading of a value.
///
/// Numbers truncate toward zero without going through their decimal text,
/// so `1e21` saturates to `i32::MAX` and `5e-7` reads as 0 where a host
/// `parseInt` would see the digits of `"1e+21"` and `"5e-7"`. Text skips leading whitespace, accepts an
/// optional sign and an optional `0x` prefix, then reads the longest run of
/// digits; trailing garbage is ignored (`"12px"` is 12). Returns `None` when
/// no digit is found and for booleans. Out-of-range results saturate.
pub fn to_int(v: &Value) -> Option<i32> {
    match v {
        Value::Number(n) if n.is_finite() => Some(n.trunc() as i32),
        Value::Number(_) | Value::Bool(_) => None,
        Value::Text(s) => parse_int_prefix(s),
    }
}

fn parse_int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let mut acc: i64 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        seen = true;
        acc = acc.saturating_mul(radix as i64).saturating_add(d as i64);
    }
    if !seen {
        return None;
    }
    let signed = if negative { -acc } else { acc };
    Some(signed.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Floating point reading of a value.
///
/// Text skips leading whitespace and reads the longest decimal literal
/// prefix (`"0.5 lux"` is 0.5), or `Infinity`. Returns `None` when there is
/// no such prefix and for booleans.
pub fn to_float(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => Some(*n),
        Value::Bool(_) => None,
        Value::Text(s) => parse_float_prefix(s),
    }
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        let inf = f64::INFINITY;
        return Some(if bytes[0] == b'-' { -inf } else { inf });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// `true` only for `Bool(true)` and the exact text `"true"`.
pub fn to_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Text(s) => s == "true",
        Value::Number(_) => false,
    }
}

/// Registry key for a value. Integral numbers print without a fraction.
pub fn to_key(v: &Value) -> String {
    match v {
        Value::Text(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n == n.trunc() && n.abs() < 1e21 {
        // Covers -0.0 as "0".
        format!("{}", n as i128)
    } else {
        format!("{n}")
    }
}

/// Integer reading with a fallback of 0.
pub fn int_or_zero(v: &Value, what: &str) -> i32 {
    to_int(v).unwrap_or_else(|| {
        debug!("{what}: {v:?} is not an integer, using 0");
        0
    })
}

/// Luminance reading with a fallback of 0 (dark). Clamping happens in the
/// registry.
pub fn luminance_or_zero(v: &Value) -> f64 {
    match to_float(v) {
        Some(f) if !f.is_nan() => f,
        _ => {
            debug!("luminance: {v:?} is not a number, using 0");
            0.0
        }
    }
}

/// Coordinates of a by-position query. `None` when either one does not
/// parse: such a query names no cell, so nothing should be updated.
pub fn query_position(x: &Value, y: &Value) -> Option<Point> {
    match (to_int(x), to_int(y)) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => {
            debug!("position query ({x:?}, {y:?}) is not numeric, matching nothing");
            None
        }
    }
}

/// [`clamp`] of a host value. Unlike the luminance write point, a value that
/// does not parse, or parses to NaN, comes back as NaN.
pub fn clamp_value(v: &Value, min: f64, max: f64) -> f64 {
    match to_float(v) {
        Some(f) if !f.is_nan() => clamp(f, min, max),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// CellSpec / CellRow
// ---------------------------------------------------------------------------

/// Typed arguments for [`CellRegistry::create_cell`](crate::CellRegistry::create_cell).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSpec {
    pub position: Point,
    pub resolution: i32,
    pub key: String,
    pub blocks_light: bool,
}

impl CellSpec {
    pub fn new(x: i32, y: i32, resolution: i32, key: impl Into<String>, blocks_light: bool) -> Self {
        Self {
            position: Point::new(x, y),
            resolution,
            key: key.into(),
            blocks_light,
        }
    }

    /// Normalize host values. Never fails; see the module docs.
    pub fn from_values(
        x: &Value,
        y: &Value,
        resolution: &Value,
        key: &Value,
        blocks_light: &Value,
    ) -> Self {
        Self {
            position: Point::new(int_or_zero(x, "x"), int_or_zero(y, "y")),
            resolution: int_or_zero(resolution, "resolution"),
            key: to_key(key),
            blocks_light: to_bool(blocks_light),
        }
    }
}

/// One row of a bulk creation list: `(x, y, resolution, key, blocks_light)`.
///
/// With the `serde` feature a row deserializes from a 5-element JSON array
/// such as `[0, "12", 10, "torch", "true"]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRow(pub Value, pub Value, pub Value, pub Value, pub Value);

impl From<&CellRow> for CellSpec {
    fn from(row: &CellRow) -> Self {
        CellSpec::from_values(&row.0, &row.1, &row.2, &row.3, &row.4)
    }
}

impl From<CellRow> for CellSpec {
    fn from(row: CellRow) -> Self {
        CellSpec::from(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn int_from_numbers_truncates() {
        assert_eq!(to_int(&Value::from(12.7)), Some(12));
        assert_eq!(to_int(&Value::from(-2.5)), Some(-2));
        assert_eq!(to_int(&Value::Number(f64::NAN)), None);
        assert_eq!(to_int(&Value::Number(f64::INFINITY)), None);
        assert_eq!(to_int(&Value::from(5e-7)), Some(0));
        assert_eq!(to_int(&Value::from(1e21)), Some(i32::MAX));
    }

    #[test]
    fn int_from_text_reads_prefix() {
        assert_eq!(to_int(&t("42")), Some(42));
        assert_eq!(to_int(&t("  -3px")), Some(-3));
        assert_eq!(to_int(&t("+7")), Some(7));
        assert_eq!(to_int(&t("12.9")), Some(12));
        assert_eq!(to_int(&t("0x1f")), Some(31));
        assert_eq!(to_int(&t("abc")), None);
        assert_eq!(to_int(&t("")), None);
        assert_eq!(to_int(&t("-")), None);
        assert_eq!(to_int(&t("99999999999")), Some(i32::MAX));
    }

    #[test]
    fn int_from_bool_is_none() {
        assert_eq!(to_int(&Value::from(true)), None);
    }

    #[test]
    fn float_from_text_reads_prefix() {
        assert_eq!(to_float(&t("0.5")), Some(0.5));
        assert_eq!(to_float(&t(" 0.5 lux")), Some(0.5));
        assert_eq!(to_float(&t(".25")), Some(0.25));
        assert_eq!(to_float(&t("3.")), Some(3.0));
        assert_eq!(to_float(&t("1e2x")), Some(100.0));
        assert_eq!(to_float(&t("1e")), Some(1.0));
        assert_eq!(to_float(&t("-Infinity")), Some(f64::NEG_INFINITY));
        assert_eq!(to_float(&t(".")), None);
        assert_eq!(to_float(&t("bright")), None);
        assert_eq!(to_float(&Value::from(false)), None);
    }

    #[test]
    fn bool_accepts_literal_and_text() {
        assert!(to_bool(&Value::from(true)));
        assert!(to_bool(&t("true")));
        assert!(!to_bool(&t("false")));
        assert!(!to_bool(&t("TRUE")));
        assert!(!to_bool(&Value::from(1)));
    }

    #[test]
    fn keys_format_like_the_host() {
        assert_eq!(to_key(&t("cell1")), "cell1");
        assert_eq!(to_key(&Value::from(1)), "1");
        assert_eq!(to_key(&Value::from(-0.0)), "0");
        assert_eq!(to_key(&Value::from(2.5)), "2.5");
        assert_eq!(to_key(&Value::from(true)), "true");
    }

    #[test]
    fn spec_from_garbage_falls_back() {
        let spec = CellSpec::from_values(&t("left"), &t("5"), &t("ten"), &t("k"), &t("yes"));
        assert_eq!(spec, CellSpec::new(0, 5, 0, "k", false));
    }

    #[test]
    fn luminance_fallback() {
        assert_eq!(luminance_or_zero(&t("0.75")), 0.75);
        assert_eq!(luminance_or_zero(&t("dim")), 0.0);
        assert_eq!(luminance_or_zero(&Value::Number(f64::NAN)), 0.0);
        // left unclamped here
        assert_eq!(luminance_or_zero(&Value::from(4.0)), 4.0);
    }

    #[test]
    fn query_position_needs_both_coordinates() {
        assert_eq!(query_position(&t("20"), &Value::from(-40)), Some(Point::new(20, -40)));
        assert_eq!(query_position(&t("left"), &Value::from(0)), None);
        assert_eq!(query_position(&Value::from(0), &Value::Number(f64::NAN)), None);
        assert_eq!(query_position(&Value::from(true), &Value::from(0)), None);
    }

    #[test]
    fn clamp_value_keeps_nan() {
        assert_eq!(clamp_value(&t("300"), 0.0, 255.0), 255.0);
        assert_eq!(clamp_value(&Value::from(-1.5), 0.0, 1.0), 0.0);
        assert!(clamp_value(&t("bright"), 0.0, 1.0).is_nan());
        assert!(clamp_value(&Value::Number(f64::NAN), 0.0, 1.0).is_nan());
        assert!(clamp_value(&Value::from(false), 0.0, 1.0).is_nan());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rows_from_json_arrays() {
        let rows: Vec<CellRow> =
            serde_json::from_str(r#"[[0, "12", 10, "torch", "true"], [1.5, -2, "4", 7, false]]"#)
                .unwrap();
        let specs: Vec<CellSpec> = rows.iter().map(CellSpec::from).collect();
        assert_eq!(specs[0], CellSpec::new(0, 12, 10, "torch", true));
        assert_eq!(specs[1], CellSpec::new(1, -2, 4, "7", false));
    }
}
