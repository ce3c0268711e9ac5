//! Helpers for nodes that interpret payloads as numeric sequences
//!
//! Integers are kept exact: they are compared and added as integers, and
//! only a float operand moves the arithmetic to `f64`.

use std::cmp::Ordering;

use dataflow_engine::{EngineError, Result, Value};
use serde_json::Number;

/// Borrow `value` as an array, or fault naming `port`
pub fn sequence<'a>(value: &'a Value, port: &str) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(port, "a sequence of numbers"))
}

/// Borrow `value` as a number, or fault naming `port`
pub fn number<'a>(value: &'a Value, port: &str) -> Result<&'a Number> {
    match value {
        Value::Number(n) => Ok(n),
        _ => Err(invalid(port, "a number")),
    }
}

/// Compare two numeric values
pub fn compare(a: &Value, b: &Value, port: &str) -> Result<Ordering> {
    let (a, b) = (number(a, port)?, number(b, port)?);
    if let (Some(x), Some(y)) = (integer(a), integer(b)) {
        return Ok(x.cmp(&y));
    }
    let (x, y) = (float(a), float(b));
    // JSON numbers are never NaN
    Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
}

/// Add `shift` to `element`
///
/// An integer zero shift returns the element unchanged. Two integers stay
/// an integer while the sum fits in `i64` or `u64`; anything else is added
/// as floating point.
pub fn add(element: &Value, shift: &Value, port: &str) -> Result<Value> {
    let (a, b) = (number(element, port)?, number(shift, port)?);
    if let (Some(x), Some(y)) = (integer(a), integer(b)) {
        if y == 0 {
            return Ok(element.clone());
        }
        let sum = x + y;
        if let Ok(sum) = i64::try_from(sum) {
            return Ok(Value::from(sum));
        }
        if let Ok(sum) = u64::try_from(sum) {
            return Ok(Value::from(sum));
        }
    }
    Ok(Value::from(float(a) + float(b)))
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn invalid(port: &str, expected: &str) -> EngineError {
    EngineError::InvalidInputType {
        port: port.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence() {
        assert_eq!(sequence(&json!([1, 2]), "x").unwrap().len(), 2);
        assert!(matches!(
            sequence(&json!(3), "x"),
            Err(EngineError::InvalidInputType { ref port, .. }) if port == "x"
        ));
    }

    #[test]
    fn test_compare_integers_exactly() {
        let above = json!(9_007_199_254_740_993u64);
        let below = json!(9_007_199_254_740_992u64);
        assert_eq!(compare(&above, &below, "x").unwrap(), Ordering::Greater);
        assert_eq!(compare(&json!(-1), &json!(u64::MAX), "x").unwrap(), Ordering::Less);
        assert_eq!(compare(&json!(2), &json!(2.0), "x").unwrap(), Ordering::Equal);
        assert_eq!(compare(&json!(1.5), &json!(2), "x").unwrap(), Ordering::Less);
        assert!(compare(&json!(1), &json!("a"), "x").is_err());
    }

    #[test]
    fn test_add_keeps_integers() {
        assert_eq!(add(&json!(1), &json!(10), "x").unwrap(), json!(11));
        assert_eq!(add(&json!(1.5), &json!(10), "x").unwrap(), json!(11.5));
        assert_eq!(add(&json!(-5.0), &json!(0), "x").unwrap(), json!(-5.0));
        assert!(add(&json!("a"), &json!(1), "x").is_err());
        assert!(add(&json!("a"), &json!(0), "x").is_err());

        // Past i64 the sum stays exact as u64
        assert_eq!(
            add(&json!(i64::MAX), &json!(1), "x").unwrap(),
            json!(i64::MAX as u64 + 1)
        );
        assert_eq!(add(&json!(u64::MAX), &json!(0), "x").unwrap(), json!(u64::MAX));
        assert_eq!(add(&json!(u64::MAX), &json!(-1), "x").unwrap(), json!(u64::MAX - 1));
        assert_eq!(add(&json!(-3), &json!(u64::MAX), "x").unwrap(), json!(u64::MAX - 3));
        assert!(add(&json!(u64::MAX), &json!(1), "x").unwrap().is_f64());
    }
}
