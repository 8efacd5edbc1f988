//! Typed JSON-RPC envelope and wire models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request identifier.
    pub id: u64,
    /// Method name.
    pub method: String,
    /// Positional parameters.
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Builds a request for `method` with positional `params`.
    pub fn new(method: &str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: 1,
            method: method.to_string(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// `result` defaults to null so an explicit `"result": null` and a
/// missing field look the same; callers that care about absence (the
/// constant lookup) test for null themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    /// Protocol version echoed by the server.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request identifier echoed by the server.
    #[serde(default)]
    pub id: Option<Value>,
    /// Result payload; null when the call produced nothing.
    #[serde(default)]
    pub result: Value,
    /// Error object; present when the call failed.
    #[serde(default)]
    pub error: Option<RpcResponseError>,
}

/// The error member of a JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponseError {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(default)]
    pub data: Option<Value>,
}

/// One page of a bulk storage iteration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoragePage {
    /// `(key, value)` pairs in delivery order.
    #[serde(default)]
    pub entries: Vec<(String, Value)>,
    /// Continuation key; absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_as_json_rpc_envelope() {
        let request = RpcRequest::new("state_getStorage", vec![json!("System")]);
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "state_getStorage",
                "params": ["System"]
            })
        );
    }

    #[test]
    fn response_null_result_stays_null() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(response.result.is_null());
        assert!(response.error.is_none());
    }

    #[test]
    fn response_error_is_parsed() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}"#,
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "method not found");
    }

    #[test]
    fn storage_page_parses_entries_and_cursor() {
        let page: StoragePage = serde_json::from_value(json!({
            "entries": [["A", {"free": 1}], ["B", 2]],
            "next": "B"
        }))
        .unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].0, "A");
        assert_eq!(page.next.as_deref(), Some("B"));
    }

    #[test]
    fn storage_page_defaults_to_empty_last_page() {
        let page: StoragePage = serde_json::from_value(json!({})).unwrap();
        assert!(page.entries.is_empty());
        assert!(page.next.is_none());
    }
}
