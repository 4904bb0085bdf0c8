use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use leadflow_core::JobRequest;

// -------------------------
// Request DTOs
// -------------------------

/// Push-delivery envelope: the delivery layer wraps the job description in a
/// base64-encoded message body.
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded JSON job description.
    pub data: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
}

impl PushEnvelope {
    /// Decode the embedded job description.
    pub fn decode_job(&self) -> Result<JobRequest, String> {
        let bytes = BASE64
            .decode(&self.message.data)
            .map_err(|e| format!("message data is not valid base64: {e}"))?;
        let mut request: JobRequest = serde_json::from_slice(&bytes)
            .map_err(|e| format!("message data is not a valid job description: {e}"))?;
        request.source.get_or_insert_with(|| "push".to_string());
        Ok(request)
    }
}

// -------------------------
// Query DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}
