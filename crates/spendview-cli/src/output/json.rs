use std::io;

use serde::Serialize;
use serde_json::json;
use spendview_core::{ReportError, SuccessEnvelope};

/// Reports print their data record as-is; the envelope stays internal.
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "overview" | "spending" | "invest" | "cashback" => serialize_json_pretty(&success.data),
        _ => Err(io::Error::other(format!(
            "JSON output is not supported for command `{}`",
            success.command
        ))),
    }
}

pub fn render_error_json(error: &ReportError) -> io::Result<String> {
    let mut body = json!({
        "code": error.code,
        "message": error.message,
        "recovery_steps": error.recovery_steps,
    });
    if let (Some(data), Some(object)) = (error.data.as_ref(), body.as_object_mut()) {
        object.insert("data".to_string(), data.clone());
    }
    serialize_json_pretty(&json!({ "error": body }))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
