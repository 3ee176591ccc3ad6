use std::borrow::Cow;

use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode};
use sapporo_food_core::catalog::CatalogError;
use serde::Serialize;

/// Uniform `{success, result}` wrapper for aggregated tool payloads.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub result: T,
}

impl<T> Envelope<T> {
    pub(crate) const fn ok(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub(crate) fn invalid_input(message: impl Into<Cow<'static, str>>) -> ErrorData {
    mcp_err(ErrorCode::INVALID_PARAMS, message)
}

/// Applies the tool argument default and rejects a non-positive limit.
pub(crate) fn positive_limit(limit: Option<u32>, default: u32) -> Result<u32, ErrorData> {
    let limit = limit.unwrap_or(default);
    if limit == 0 {
        return Err(invalid_input("limit must be a positive integer"));
    }
    Ok(limit)
}

pub(crate) fn required_text(value: &str, name: &'static str) -> Result<(), ErrorData> {
    if value.trim().is_empty() {
        return Err(invalid_input(format!("{name} must be a non-empty string")));
    }
    Ok(())
}

/// Maps a fetch failure to a tool outcome.
///
/// A `success: false` envelope from the catalog is not a protocol error; it
/// becomes the tool payload, verbatim. Transport-level failures become MCP
/// errors, since there is no envelope to pass through.
pub(crate) fn catalog_failure(err: CatalogError) -> Result<CallToolResult, ErrorData> {
    match err {
        CatalogError::SourceFailure(envelope) => {
            Ok(CallToolResult::success(vec![Content::json(envelope)?]))
        }
        other => Err(mcp_err(ErrorCode::INTERNAL_ERROR, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn content_json(result: &CallToolResult) -> Value {
        let value = serde_json::to_value(result).expect("tool result should serialize");
        let text = value["content"][0]["text"]
            .as_str()
            .expect("tool result should carry text content")
            .to_string();
        serde_json::from_str(&text).expect("tool content should be JSON")
    }

    #[test]
    fn source_failure_passes_envelope_through() {
        let envelope = json!({"success": false, "error": {"message": "boom"}});
        let result = catalog_failure(CatalogError::SourceFailure(envelope.clone()))
            .expect("source failure should become a tool payload");
        assert_eq!(content_json(&result), envelope);
    }

    #[test]
    fn transport_failure_becomes_an_mcp_error() {
        let err = catalog_failure(CatalogError::Rejected {
            status: 503,
            body: String::new(),
        })
        .expect_err("a rejected request should surface as an MCP error");
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn zero_limit_is_rejected_before_any_fetch() {
        let err = positive_limit(Some(0), 10).expect_err("zero limit should be invalid");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(positive_limit(None, 10).expect("default applies"), 10);
        assert_eq!(positive_limit(Some(500), 10).expect("explicit limit wins"), 500);
    }

    #[test]
    fn blank_required_text_is_rejected() {
        assert!(required_text("  ", "q").is_err());
        assert!(required_text("中央区", "q").is_ok());
    }
}
