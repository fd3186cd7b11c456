//! # Payload Coercion (Data Knitter support)
//!
//! Server payloads arrive as loosely-typed JSON. The knitter turns them into a
//! canonical model where every required field is present and every value has
//! its normalized type.
//!
//! - [`Coerce`] - lenient conversion of a single JSON value into a field type
//! - [`Knit`] - conversion of a whole payload into a model, optionally
//!   consulting the previous model
//!
//! Individual fields are never fatal: a field that cannot be coerced falls back
//! to its default. Only a payload whose top-level shape is unusable yields a
//! [`KnitError`].

use crate::error::KnitError;
use std::collections::BTreeMap;

/// A raw server payload.
pub type Payload = serde_json::Value;

/// Name of the JSON kind of `value`, used in shape errors.
pub fn kind_of(value: &Payload) -> &'static str {
    match value {
        Payload::Null => "null",
        Payload::Bool(_) => "boolean",
        Payload::Number(_) => "number",
        Payload::String(_) => "string",
        Payload::Array(_) => "array",
        Payload::Object(_) => "object",
    }
}

/// Lenient conversion from a JSON value.
///
/// Returns `None` when the value cannot reasonably represent `Self`; callers
/// then substitute a default.
pub trait Coerce: Sized {
    /// Attempt to coerce `value` into `Self`.
    fn coerce(value: &Payload) -> Option<Self>;
}

/// Reconciles a payload into a complete model value.
///
/// Implementations must be deterministic: the same `payload` with an equal
/// `previous` always yields an equal model.
pub trait Knit: Sized {
    /// Produce a model from `payload`, given the model it replaces (if any).
    fn knit(previous: Option<&Self>, payload: &Payload) -> Result<Self, KnitError>;
}

impl Coerce for Payload {
    fn coerce(value: &Payload) -> Option<Self> {
        Some(value.clone())
    }
}

impl Knit for Payload {
    fn knit(_previous: Option<&Self>, payload: &Payload) -> Result<Self, KnitError> {
        Ok(payload.clone())
    }
}

impl Coerce for String {
    fn coerce(value: &Payload) -> Option<Self> {
        match value {
            Payload::String(s) => Some(s.clone()),
            Payload::Number(n) => Some(n.to_string()),
            Payload::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl Coerce for bool {
    fn coerce(value: &Payload) -> Option<Self> {
        match value {
            Payload::Bool(b) => Some(*b),
            Payload::Number(n) => n.as_f64().map(|f| f != 0.0),
            Payload::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

macro_rules! coerce_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(value: &Payload) -> Option<Self> {
                    match value {
                        Payload::Number(n) => {
                            if let Some(i) = n.as_i64() {
                                <$ty>::try_from(i).ok()
                            } else if let Some(u) = n.as_u64() {
                                <$ty>::try_from(u).ok()
                            } else {
                                n.as_f64().and_then(float_to_int).and_then(|i| <$ty>::try_from(i).ok())
                            }
                        }
                        Payload::String(s) => s.trim().parse().ok(),
                        Payload::Bool(b) => Some(<$ty>::from(*b)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

coerce_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl Coerce for f64 {
    fn coerce(value: &Payload) -> Option<Self> {
        match value {
            Payload::Number(n) => n.as_f64(),
            Payload::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
            _ => None,
        }
    }
}

impl Coerce for f32 {
    fn coerce(value: &Payload) -> Option<Self> {
        f64::coerce(value).map(|f| f as f32)
    }
}

impl<T: Coerce> Coerce for Option<T> {
    fn coerce(value: &Payload) -> Option<Self> {
        match value {
            Payload::Null => Some(None),
            other => Some(T::coerce(other)),
        }
    }
}

impl<T: Coerce> Coerce for Vec<T> {
    fn coerce(value: &Payload) -> Option<Self> {
        match value {
            Payload::Array(items) => Some(items.iter().filter_map(T::coerce).collect()),
            Payload::Null => Some(Vec::new()),
            _ => None,
        }
    }
}

impl<T: Coerce> Coerce for BTreeMap<String, T> {
    fn coerce(value: &Payload) -> Option<Self> {
        match value {
            Payload::Object(map) => Some(
                map.iter()
                    .filter_map(|(k, v)| T::coerce(v).map(|v| (k.clone(), v)))
                    .collect(),
            ),
            Payload::Null => Some(BTreeMap::new()),
            _ => None,
        }
    }
}

/// Look up `key` in an object payload and coerce it, falling back to `fallback`.
///
/// Used by `#[derive(Knit)]`; also handy in hand-written `reconcile` bodies.
pub fn field_or<T: Coerce>(
    object: &serde_json::Map<String, Payload>,
    key: &str,
    fallback: impl FnOnce() -> T,
) -> T {
    object.get(key).and_then(T::coerce).unwrap_or_else(fallback)
}

/// Require `payload` to be a JSON object.
pub fn expect_object(payload: &Payload) -> Result<&serde_json::Map<String, Payload>, KnitError> {
    payload
        .as_object()
        .ok_or_else(|| KnitError::shape("object", payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_coercion() {
        assert_eq!(String::coerce(&json!("Ada")), Some("Ada".to_string()));
        assert_eq!(String::coerce(&json!(42)), Some("42".to_string()));
        assert_eq!(String::coerce(&json!(null)), None);
        assert_eq!(String::coerce(&json!([1])), None);
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(u32::coerce(&json!(7)), Some(7));
        assert_eq!(u32::coerce(&json!(" 12 ")), Some(12));
        assert_eq!(u32::coerce(&json!(-1)), None);
        assert_eq!(i64::coerce(&json!(3.0)), Some(3));
        assert_eq!(i64::coerce(&json!(3.5)), None);
        assert_eq!(u8::coerce(&json!(true)), Some(1));
    }

    #[test]
    fn test_out_of_range_float_is_not_saturated() {
        // 2^63 is exactly representable as f64 but not as i64
        assert_eq!(i64::coerce(&json!(9_223_372_036_854_775_808.0_f64)), None);
        assert_eq!(i64::coerce(&json!(-9_223_372_036_854_775_808.0_f64)), Some(i64::MIN));
        assert_eq!(i64::coerce(&json!(1e300)), None);
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(bool::coerce(&json!("yes")), Some(true));
        assert_eq!(bool::coerce(&json!(0)), Some(false));
        assert_eq!(bool::coerce(&json!("maybe")), None);
    }

    #[test]
    fn test_collections_skip_bad_elements() {
        let v: Vec<u32> = Vec::coerce(&json!([1, "2", "x", null, 4])).unwrap();
        assert_eq!(v, vec![1, 2, 4]);

        let m: BTreeMap<String, bool> = BTreeMap::coerce(&json!({"a": true, "b": "nope"})).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("a"), Some(&true));
    }

    #[test]
    fn test_option_distinguishes_null() {
        assert_eq!(Option::<u32>::coerce(&json!(null)), Some(None));
        assert_eq!(Option::<u32>::coerce(&json!(5)), Some(Some(5)));
        assert_eq!(Option::<u32>::coerce(&json!("bad")), Some(None));
    }

    #[test]
    fn test_expect_object_shape_error() {
        let err = expect_object(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            KnitError::Shape {
                expected: "object",
                found: "array"
            }
        );
    }

    #[test]
    fn test_field_or_defaults() {
        let payload = json!({"count": "nine"});
        let object = expect_object(&payload).unwrap();
        assert_eq!(field_or::<u32>(object, "count", || 0), 0);
        assert_eq!(field_or::<String>(object, "missing", || "x".into()), "x");
    }
}
