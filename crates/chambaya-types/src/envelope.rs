//! Response wrappers used by the API.
//!
//! The backend is not uniform: notification routes answer with
//! `{ok, data?, message?}`, works answer with `{data}`, Google login with
//! `{success, data}` and several account routes with a bare `{message}`.

use serde::{Deserialize, Serialize};

/// `{ok, data?, message?}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_ok() -> bool {
    true
}

/// `{data}` envelope. `data` may be `null` when there is nothing to report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// `{success, data?}` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuccessEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Bare `{message}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    /// Set by the profile completion route when a picture was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_profile: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_defaults_ok_when_missing() {
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert!(env.ok);
        assert_eq!(env.data, Some(vec![1, 2]));
    }

    #[test]
    fn test_data_envelope_accepts_null() {
        let env: DataEnvelope<Vec<u32>> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert_eq!(env.data, None);
    }

    #[test]
    fn test_error_envelope() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"ok":false,"message":"No autorizado"}"#).unwrap();
        assert!(!env.ok);
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("No autorizado"));
    }
}
