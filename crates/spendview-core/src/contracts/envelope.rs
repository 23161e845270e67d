use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

pub fn success<T>(command: &str, data: T) -> ReportResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| ReportError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data: json_data,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::success;

    #[test]
    fn success_wraps_data_with_command_and_version() {
        let envelope = success("invest", json!({"total_amount": 300.0}));
        assert!(envelope.is_ok());
        if let Ok(value) = envelope {
            assert!(value.ok);
            assert_eq!(value.command, "invest");
            assert_eq!(value.data["total_amount"], 300.0);
        }
    }
}
