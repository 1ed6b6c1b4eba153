//! JSON-RPC 2.0 binding of the legal-assistant tools (MCP-style surface).
//!
//! Handles `initialize`, `tools/list`, and `tools/call` over a single POST
//! endpoint. Tool lookups never fail the transport: misses surface as null
//! or empty results, and bad calls become JSON-RPC error objects.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::LegalTools;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A tool advertised through `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "lookup_legal_term".to_string(),
            description: "Looks up the plain-language definition of a legal term. Returns null if the term is not in the glossary.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "term": {
                        "type": "string",
                        "description": "The legal term to look up, e.g. 'force majeure'"
                    }
                },
                "required": ["term"]
            }),
        },
        ToolDefinition {
            name: "search_glossary".to_string(),
            description: "Searches glossary terms and definitions by substring. Returns a possibly empty list of matches.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Substring to search for"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "summarize_clause".to_string(),
            description: "Classifies a contract clause and returns a plain-language summary of what clauses of that kind mean.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "clause": {
                        "type": "string",
                        "description": "The clause text to summarize"
                    }
                },
                "required": ["clause"]
            }),
        },
        ToolDefinition {
            name: "find_legal_precedents".to_string(),
            description: "Returns notable case-law precedents relevant to a clause for a given jurisdiction (default: US).".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "clause": {
                        "type": "string",
                        "description": "The clause text"
                    },
                    "location": {
                        "type": "string",
                        "description": "Jurisdiction, e.g. 'California', 'New York', 'India'"
                    }
                },
                "required": ["clause"]
            }),
        },
    ]
}

/// Process one JSON-RPC request against the shared tool capability.
pub fn process_request(tools: &LegalTools, request: JsonRpcRequest) -> JsonRpcResponse {
    debug!("tools/rpc: method {}", request.method);
    let id = request.id.clone();

    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": "legal-demystifier",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            }),
        ),
        "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(
            id,
            json!({ "tools": tool_definitions() }),
        ),
        "tools/call" => {
            let name = request
                .params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            match handle_tool_call(tools, &name, &arguments) {
                Ok(result) => JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": result.to_string(),
                        }],
                        "isError": false,
                    }),
                ),
                Err(ToolError::UnknownTool(name)) => {
                    JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", name))
                }
                Err(e @ ToolError::InvalidArgument(_)) => {
                    JsonRpcResponse::error(id, -32602, e.to_string())
                }
            }
        }
        other => JsonRpcResponse::error(id, -32601, format!("Method not found: {}", other)),
    }
}

/// Route a tool call to the capability. Misses are data (`null`/empty), bad
/// arguments are errors.
fn handle_tool_call(
    tools: &LegalTools,
    name: &str,
    arguments: &Value,
) -> Result<Value, ToolError> {
    match name {
        "lookup_legal_term" => {
            let term = required_str(arguments, "term")?;
            Ok(tools
                .lookup_term(term)
                .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
                .unwrap_or(Value::Null))
        }
        "search_glossary" => {
            let query = required_str(arguments, "query")?;
            Ok(serde_json::to_value(tools.search_glossary(query)).unwrap_or(Value::Null))
        }
        "summarize_clause" => {
            let clause = required_str(arguments, "clause")?;
            match tools.summarize_clause(clause) {
                Some(summary) => Ok(serde_json::to_value(summary).unwrap_or(Value::Null)),
                None => Err(ToolError::InvalidArgument(
                    "clause must not be empty".to_string(),
                )),
            }
        }
        "find_legal_precedents" => {
            let clause = required_str(arguments, "clause")?;
            let location = arguments.get("location").and_then(|v| v.as_str());
            let result = tools.find_precedents(clause, location);
            Ok(serde_json::to_value(result).unwrap_or(Value::Null))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn required_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidArgument(format!("{} is required", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn list_names_all_four_tools() {
        let tools = LegalTools::new();
        let response = process_request(&tools, request("tools/list", json!({})));

        let result = response.result.unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "lookup_legal_term",
                "search_glossary",
                "summarize_clause",
                "find_legal_precedents",
            ]
        );
    }

    #[test]
    fn initialize_reports_server_info() {
        let tools = LegalTools::new();
        let response = process_request(&tools, request("initialize", json!({})));
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "legal-demystifier");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    }

    #[test]
    fn unknown_method_is_not_found() {
        let tools = LegalTools::new();
        let response = process_request(&tools, request("resources/list", json!({})));
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn call_looks_up_a_term() {
        let tools = LegalTools::new();
        let response = process_request(
            &tools,
            request(
                "tools/call",
                json!({"name": "lookup_legal_term", "arguments": {"term": "tort"}}),
            ),
        );

        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        let entry: Value = serde_json::from_str(text).unwrap();
        assert_eq!(entry["term"], "tort");
    }

    #[test]
    fn call_miss_returns_null_payload() {
        let tools = LegalTools::new();
        let response = process_request(
            &tools,
            request(
                "tools/call",
                json!({"name": "lookup_legal_term", "arguments": {"term": "zoning"}}),
            ),
        );

        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        assert_eq!(text, "null");
    }

    #[test]
    fn unknown_tool_is_an_error_response() {
        let tools = LegalTools::new();
        let response = process_request(
            &tools,
            request("tools/call", json!({"name": "upload_pdf", "arguments": {}})),
        );

        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("upload_pdf"));
    }

    #[test]
    fn missing_argument_is_an_error_response() {
        let tools = LegalTools::new();
        let response = process_request(
            &tools,
            request("tools/call", json!({"name": "summarize_clause", "arguments": {}})),
        );

        let error = response.error.unwrap();
        assert!(error.message.contains("clause is required"));
    }

    #[test]
    fn call_finds_precedents_with_default_location() {
        let tools = LegalTools::new();
        let response = process_request(
            &tools,
            request(
                "tools/call",
                json!({
                    "name": "find_legal_precedents",
                    "arguments": {"clause": "Either party may terminate with 30 days notice."}
                }),
            ),
        );

        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["location"], "US");
    }
}
