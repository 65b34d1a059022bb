//! JSON-RPC 2.0 envelope codec.
//!
//! `decode` accepts exactly one JSON object shaped like a request; anything
//! else is a [`DecodeError`], answered on the wire as `-32700`. `params` is
//! left opaque here: method-specific interpretation happens in the
//! dispatcher, where a mismatch is `-32602` instead.

use serde_json::{Map, Value};

use crate::types::{ERR_CODE_INTERNAL, ERR_CODE_PARSE, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse};

/// Failure to turn a frame into a [`JsonRpcRequest`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("invalid envelope: {0}")]
    Envelope(&'static str),
    #[error("frame exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

impl DecodeError {
    pub fn code(&self) -> i32 {
        ERR_CODE_PARSE
    }

    /// Error response for an undecodable frame. The id is unknown, so `null`.
    pub fn to_response(&self) -> JsonRpcResponse {
        JsonRpcResponse::error(Value::Null, self.code(), format!("Parse error: {self}"))
    }
}

/// Decode one frame into a request.
pub fn decode(bytes: &[u8]) -> Result<JsonRpcRequest, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(mut obj) = value else {
        return Err(DecodeError::Envelope("message must be a JSON object"));
    };

    check_version(&obj)?;

    let method = match obj.remove("method") {
        Some(Value::String(m)) => m,
        Some(_) => return Err(DecodeError::Envelope("method must be a string")),
        None => return Err(DecodeError::Envelope("missing method")),
    };

    let id = match obj.remove("id") {
        None | Some(Value::Null) => None,
        Some(id @ (Value::String(_) | Value::Number(_))) => Some(id),
        Some(_) => {
            return Err(DecodeError::Envelope(
                "id must be a string, a number, or null",
            ));
        }
    };

    let params = obj.remove("params").filter(|p| !p.is_null());

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.into(),
        id,
        method,
        params,
    })
}

fn check_version(obj: &Map<String, Value>) -> Result<(), DecodeError> {
    match obj.get("jsonrpc") {
        Some(Value::String(v)) if v == JSONRPC_VERSION => Ok(()),
        _ => Err(DecodeError::Envelope("jsonrpc must be \"2.0\"")),
    }
}

/// Encode a response as compact JSON. Never contains a raw newline.
pub fn encode(resp: &JsonRpcResponse) -> Vec<u8> {
    match serde_json::to_vec(resp) {
        Ok(bytes) => bytes,
        Err(e) => {
            // Only reachable with non-string map keys smuggled into a Value.
            tracing::error!(error = %e, "encode response");
            let fallback = JsonRpcResponse::error(resp.id.clone(), ERR_CODE_INTERNAL, "Internal error");
            serde_json::to_vec(&fallback).unwrap_or_default()
        }
    }
}

/// Encode a response followed by `\n`, for line-delimited transports.
pub fn encode_line(resp: &JsonRpcResponse) -> Vec<u8> {
    let mut bytes = encode(resp);
    bytes.push(b'\n');
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ERR_CODE_NO_METHOD;
    use serde_json::json;

    #[test]
    fn test_decode_request() {
        let req = decode(br#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#).unwrap();
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.id, Some(json!(1)));
        assert_eq!(req.params, Some(json!({})));
    }

    #[test]
    fn test_decode_string_id() {
        let req = decode(br#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#).unwrap();
        assert_eq!(req.id, Some(json!("abc")));
        assert!(req.params.is_none());
    }

    #[test]
    fn test_decode_notification() {
        let req = decode(br#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(req.is_notification());

        let req = decode(br#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(req.is_notification());
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode(b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
        assert_eq!(err.code(), ERR_CODE_PARSE);
    }

    #[test]
    fn test_decode_rejects_bad_envelopes() {
        let cases: [&[u8]; 6] = [
            br#"[1,2,3]"#,
            br#"{"id":1,"method":"ping"}"#,
            br#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#,
            br#"{"jsonrpc":"2.0","id":1}"#,
            br#"{"jsonrpc":"2.0","id":1,"method":42}"#,
            br#"{"jsonrpc":"2.0","id":{"x":1},"method":"ping"}"#,
        ];
        for case in cases {
            let err = decode(case).unwrap_err();
            assert!(matches!(err, DecodeError::Envelope(_)), "{:?}", err);
            assert_eq!(err.to_response().rpc_error().unwrap().code, ERR_CODE_PARSE);
        }
    }

    #[test]
    fn test_too_large_is_parse_error() {
        let resp = DecodeError::TooLarge { limit: 16 }.to_response();
        let err = resp.rpc_error().unwrap();
        assert_eq!(err.code, ERR_CODE_PARSE);
        assert_eq!(err.message, "Parse error: frame exceeds 16 bytes");
        assert_eq!(resp.id, Value::Null);
    }

    #[test]
    fn test_parse_error_response_has_null_id() {
        let err = decode(b"garbage").unwrap_err();
        let v: Value = serde_json::from_slice(&encode(&err.to_response())).unwrap();
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["error"]["code"], json!(-32700));
    }

    #[test]
    fn test_encode_escapes_newlines() {
        let resp = JsonRpcResponse::error(json!(1), ERR_CODE_NO_METHOD, "line one\nline two \"quoted\"");
        let line = encode_line(&resp);
        assert_eq!(line.iter().filter(|b| **b == b'\n').count(), 1);
        assert_eq!(*line.last().unwrap(), b'\n');
        let v: Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(v["error"]["message"], "line one\nline two \"quoted\"");
    }
}
