//! Creation request payload
//!
//! The body of `POST /cats` has no declared shape. It is classified for
//! diagnostics and then dropped; nothing here can reject a request.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateCatPayload {
    /// No body, or only whitespace
    Empty,
    /// Any well-formed JSON document
    Json(Value),
    /// Bytes that are not JSON
    Opaque { len: usize },
}

impl CreateCatPayload {
    pub fn read(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        serde_json::from_slice::<Value>(body).map_or(Self::Opaque { len: body.len() }, Self::Json)
    }

    /// Short description for debug logging
    pub fn describe(&self) -> String {
        match self {
            Self::Empty => "empty".to_string(),
            Self::Json(Value::Object(fields)) => format!("json object, {} field(s)", fields.len()),
            Self::Json(Value::Array(items)) => format!("json array, {} item(s)", items.len()),
            Self::Json(_) => "json scalar".to_string(),
            Self::Opaque { len } => format!("{len} non-json byte(s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_variants() {
        assert_eq!(CreateCatPayload::read(b""), CreateCatPayload::Empty);
        assert_eq!(CreateCatPayload::read(b" \n"), CreateCatPayload::Empty);
        assert_eq!(
            CreateCatPayload::read(br#"{"name":"Whiskers"}"#),
            CreateCatPayload::Json(json!({"name": "Whiskers"}))
        );
        assert_eq!(
            CreateCatPayload::read(b"{not json"),
            CreateCatPayload::Opaque { len: 9 }
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(CreateCatPayload::read(b"{}").describe(), "json object, 0 field(s)");
        assert_eq!(CreateCatPayload::read(b"[1,2]").describe(), "json array, 2 item(s)");
        assert_eq!(CreateCatPayload::read(b"42").describe(), "json scalar");
        assert_eq!(CreateCatPayload::read(b"meow").describe(), "4 non-json byte(s)");
    }
}
