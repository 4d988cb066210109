// 🔎 Record access - explicit field lookups over raw JSON
// Missing key or JSON null = absent; anything else present must be usable

use crate::error::{EtlError, Result};
use serde_json::Value;

fn present<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

fn invalid(key: &str, value: &Value) -> EtlError {
    EtlError::InvalidField {
        field: key.to_string(),
        value: value.to_string(),
    }
}

/// Integer field. Integral floats (`35.0`) and numeric strings (`"40"`) are
/// coerced; any other present value is `InvalidField`.
pub fn opt_i64(record: &Value, key: &str) -> Result<Option<i64>> {
    let Some(value) = present(record, key) else {
        return Ok(None);
    };

    let coerced = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    coerced.map(Some).ok_or_else(|| invalid(key, value))
}

/// Text field. Numbers and booleans keep their JSON text; arrays and objects
/// are `InvalidField`.
pub fn opt_str(record: &Value, key: &str) -> Result<Option<String>> {
    match present(record, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(v) => Err(invalid(key, v)),
    }
}

/// `record[key].name` for `{name, url}` sub-objects such as `type` or `damage_class`.
pub fn nested_name(record: &Value, key: &str) -> Result<Option<String>> {
    match present(record, key) {
        None => Ok(None),
        Some(sub) if sub.is_object() => opt_str(sub, "name"),
        Some(v) => Err(invalid(key, v)),
    }
}

/// Array field; absent means empty.
pub fn list<'a>(record: &'a Value, key: &str) -> Result<&'a [Value]> {
    match present(record, key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(v) => Err(invalid(key, v)),
    }
}

/// Array field that must be there (list pages, for instance).
pub fn req_list<'a>(record: &'a Value, key: &'static str, entity: &'static str) -> Result<&'a [Value]> {
    match present(record, key) {
        None => Err(EtlError::MissingField { entity, field: key }),
        Some(_) => list(record, key),
    }
}

pub fn req_i64(record: &Value, key: &'static str, entity: &'static str) -> Result<i64> {
    opt_i64(record, key)?.ok_or(EtlError::MissingField { entity, field: key })
}

pub fn req_str(record: &Value, key: &'static str, entity: &'static str) -> Result<String> {
    opt_str(record, key)?.ok_or(EtlError::MissingField { entity, field: key })
}

pub fn req_nested_name(record: &Value, key: &'static str, entity: &'static str) -> Result<String> {
    nested_name(record, key)?.ok_or(EtlError::MissingField { entity, field: key })
}

/// Id encoded as the last path segment of a reference URL.
///
/// `https://pokeapi.co/api/v2/move/13/` → 13. A trailing slash is ignored;
/// a non-numeric segment is a data-integrity error.
pub fn extract_id(url: &str) -> Result<i64> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<i64>().ok())
        .ok_or_else(|| EtlError::MalformedReference { url: url.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_id_with_trailing_slash() {
        assert_eq!(extract_id("https://x/move/13/").unwrap(), 13);
    }

    #[test]
    fn test_extract_id_without_trailing_slash() {
        assert_eq!(extract_id("https://x/move/13").unwrap(), 13);
    }

    #[test]
    fn test_extract_id_non_numeric() {
        let err = extract_id("https://x/move/abc/").unwrap_err();
        assert!(matches!(err, EtlError::MalformedReference { ref url } if url == "https://x/move/abc/"));
        assert!(extract_id("").is_err());
    }

    #[test]
    fn test_null_counts_as_absent() {
        let record = json!({"power": null, "type": null, "moves": null});
        assert_eq!(opt_i64(&record, "power").unwrap(), None);
        assert_eq!(nested_name(&record, "type").unwrap(), None);
        assert!(list(&record, "moves").unwrap().is_empty());
    }

    #[test]
    fn test_nested_name() {
        let record = json!({"damage_class": {"name": "physical", "url": "https://x/move-damage-class/2/"}});
        assert_eq!(nested_name(&record, "damage_class").unwrap().as_deref(), Some("physical"));
        assert_eq!(nested_name(&record, "type").unwrap(), None);
    }

    #[test]
    fn test_integral_float_coerced() {
        let record = json!({"pp": 35.0});
        assert_eq!(opt_i64(&record, "pp").unwrap(), Some(35));
    }

    #[test]
    fn test_numeric_string_coerced() {
        let record = json!({"power": "40", "accuracy": " 95 "});
        assert_eq!(opt_i64(&record, "power").unwrap(), Some(40));
        assert_eq!(opt_i64(&record, "accuracy").unwrap(), Some(95));
    }

    #[test]
    fn test_unusable_integer_is_error() {
        let record = json!({"pp": 35.5, "power": "strong", "weight": [1]});
        for key in ["pp", "power", "weight"] {
            let err = opt_i64(&record, key).unwrap_err();
            assert!(matches!(err, EtlError::InvalidField { ref field, .. } if field == key), "{key}: {err}");
        }
    }

    #[test]
    fn test_scalar_text_kept() {
        let record = json!({"name": 151, "flag": true, "obj": {"a": 1}});
        assert_eq!(opt_str(&record, "name").unwrap().as_deref(), Some("151"));
        assert_eq!(opt_str(&record, "flag").unwrap().as_deref(), Some("true"));
        assert!(matches!(opt_str(&record, "obj"), Err(EtlError::InvalidField { .. })));
    }

    #[test]
    fn test_non_object_sub_record_is_error() {
        let record = json!({"type": "fire"});
        assert!(matches!(nested_name(&record, "type"), Err(EtlError::InvalidField { .. })));
    }

    #[test]
    fn test_list_wrong_type_is_error() {
        let record = json!({"stats": {"hp": 45}});
        assert!(matches!(list(&record, "stats"), Err(EtlError::InvalidField { .. })));
    }

    #[test]
    fn test_req_list_missing() {
        let page = json!({"detail": "Not found."});
        let err = req_list(&page, "results", "list page").unwrap_err();
        assert!(matches!(err, EtlError::MissingField { entity: "list page", field: "results" }));
    }

    #[test]
    fn test_required_field_missing() {
        let record = json!({"name": "bulbasaur"});
        let err = req_i64(&record, "id", "pokemon").unwrap_err();
        assert_eq!(err.to_string(), "pokemon record is missing required field `id`");
    }
}
