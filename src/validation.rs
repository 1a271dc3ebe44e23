//! Request body extraction and the field rules shared by the user and meal
//! DTOs.
//!
//! Bodies deserialize into typed request structs; the two fields that accept
//! loosely typed input (`age`, update-time `within_diet`) go through the
//! coercing `deserialize_with` helpers below.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, de::Error as _, Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;

/// A JSON request body whose framework-level rejections surface as `400`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Ok(Self(value))
    }
}

/// A string with at least one non-whitespace character.
pub fn non_blank(value: String, name: &str) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }
    Ok(value)
}

/// JavaScript truthiness: `false`, `0`, `""` and `null` are false, everything
/// else (including the string `"false"`) is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion: numbers pass through, numeric strings are parsed (a blank
/// string is `0`), booleans become `0`/`1` and `null` becomes `0`. Anything
/// else, and any non-finite result, is rejected.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// `deserialize_with` adapter for [`is_truthy`]. Pair with `#[serde(default)]`
/// so that a missing field reads as `false`.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// `deserialize_with` adapter for [`coerce_number`].
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_number(&value).ok_or_else(|| D::Error::custom(format!("expected a number, got {value}")))
}

/// Path ids for update/delete must be well-formed UUIDs.
pub fn uuid_param(raw: &str, name: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("{name} must be a valid UUID")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Coerced {
        #[serde(deserialize_with = "number")]
        n: f64,
        #[serde(default, deserialize_with = "truthy")]
        flag: bool,
    }

    #[test]
    fn non_blank_rejects_whitespace() {
        assert_eq!(
            non_blank("  ".into(), "name").unwrap_err().to_string(),
            "name must not be empty"
        );
        assert_eq!(non_blank("Salad".into(), "name").unwrap(), "Salad");
    }

    #[test]
    fn truthiness_follows_javascript_rules() {
        for falsy in [json!(false), json!(0), json!(""), json!(null)] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("false"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn numbers_coerce_like_number_constructor() {
        assert_eq!(coerce_number(&json!(31)), Some(31.0));
        assert_eq!(coerce_number(&json!(" 42.5 ")), Some(42.5));
        assert_eq!(coerce_number(&json!("")), Some(0.0));
        assert_eq!(coerce_number(&json!(true)), Some(1.0));
        assert_eq!(coerce_number(&json!(null)), Some(0.0));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!([1])), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
    }

    #[test]
    fn adapters_plug_into_derive() {
        let c: Coerced = serde_json::from_value(json!({ "n": "7", "flag": "no" })).unwrap();
        assert_eq!(c.n, 7.0);
        assert!(c.flag);

        let c: Coerced = serde_json::from_value(json!({ "n": 1 })).unwrap();
        assert!(!c.flag);

        let err = serde_json::from_value::<Coerced>(json!({ "n": "seven" })).unwrap_err();
        assert!(err.to_string().contains("expected a number"));

        let err = serde_json::from_value::<Coerced>(json!({ "flag": true })).unwrap_err();
        assert!(err.to_string().contains("missing field `n`"));
    }

    #[test]
    fn uuid_param_validates_format() {
        let id = Uuid::new_v4();
        assert_eq!(uuid_param(&id.to_string(), "id").unwrap(), id);
        assert_eq!(
            uuid_param("42", "id").unwrap_err().to_string(),
            "id must be a valid UUID"
        );
    }
}
