use serde_json::Value;

/// Parse a request body as JSON. The `Content-Type` header is not consulted.
pub fn parse_body(body: &[u8]) -> Result<Value, String> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err("Body must be a JSON document, got an empty body".to_string());
    }
    serde_json::from_slice(body).map_err(|e| format!("Body must be valid JSON: {e}"))
}
