use serde_json::{Map, Value};

use super::ContactRequest;

/// Parse an intake body based on the Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<ContactRequest, String> {
    let value: Value = match content_type {
        Some(ct) if ct.contains("application/json") => {
            serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?
        }
        Some(ct) if ct.contains("application/x-www-form-urlencoded") => {
            parse_form_urlencoded(body)?
        }
        Some(ct) if ct.contains("multipart/form-data") => {
            return Err("multipart bodies are not supported".to_string());
        }
        // Try JSON first, then form-urlencoded
        _ => serde_json::from_slice(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))?,
    };

    if !value.is_object() {
        return Err("Expected an object body".to_string());
    }

    serde_json::from_value(value).map_err(|e| format!("Invalid submission: {e}"))
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(Value::Object(map))
}
