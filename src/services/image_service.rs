use log::debug;
use serde_json::Value;

/// Resolve an upstream image field to its first URL.
///
/// The webhook sends images as a plain URL, a JSON-encoded array inside a
/// string, a comma-separated list, or a native array. Anything that cannot be
/// read degrades to `None`.
pub fn first_image_url(field: &Value) -> Option<String> {
    match field {
        Value::String(raw) => first_url_in_string(raw),
        Value::Array(items) => items.first().and_then(first_image_url),
        _ => None,
    }
}

fn first_url_in_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(items) => return items.first().and_then(first_image_url),
            Err(err) => debug!("Image field is not a JSON array ({}), splitting on commas", err),
        }
    }

    trimmed
        .split(',')
        .next()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_encoded_array() {
        assert_eq!(first_image_url(&json!("[\"a.jpg\",\"b.jpg\"]")), Some("a.jpg".into()));
    }

    #[test]
    fn test_comma_separated_string() {
        assert_eq!(first_image_url(&json!("a.jpg,b.jpg")), Some("a.jpg".into()));
        assert_eq!(first_image_url(&json!(" a.jpg , b.jpg")), Some("a.jpg".into()));
    }

    #[test]
    fn test_native_array() {
        assert_eq!(first_image_url(&json!(["a.jpg"])), Some("a.jpg".into()));
        assert_eq!(first_image_url(&json!([])), None);
    }

    #[test]
    fn test_plain_url() {
        assert_eq!(
            first_image_url(&json!("https://cdn.example.com/sigiriya.jpg")),
            Some("https://cdn.example.com/sigiriya.jpg".into())
        );
    }

    #[test]
    fn test_malformed_json_falls_back_to_first_segment() {
        assert_eq!(first_image_url(&json!("[not json")), Some("[not json".into()));
    }

    #[test]
    fn test_absent_or_unusable_fields() {
        assert_eq!(first_image_url(&Value::Null), None);
        assert_eq!(first_image_url(&json!("")), None);
        assert_eq!(first_image_url(&json!(42)), None);
        assert_eq!(first_image_url(&json!("[]")), None);
    }
}
