//! Message model for queueing jobs on a remote work service.
//!
//! Only the wire shapes live here: the request body, the payload codec,
//! the invocation record the service answers with, and the failure reported
//! for unsuccessful HTTP responses. Sending requests is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use nupkg::invoke::{InvocationRequest, parse_payload};
//!
//! let payload = parse_payload(Some(r#"{"PackageId":"TestPackage"}"#))?;
//! let request = InvocationRequest::new("RewriteManifest")
//!     .with_source("cli")
//!     .with_payload(payload);
//! let json = request.to_json()?;
//! assert!(json.contains(r#""Job":"RewriteManifest""#));
//! # Ok::<(), nupkg::Error>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Key/value arguments handed to a job.
pub type InvocationPayload = BTreeMap<String, String>;

/// Parses payload text into a key/value map.
///
/// Absent or blank text yields `None`.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] unless the text is a JSON object whose
/// values are all strings.
pub fn parse_payload(text: Option<&str>) -> Result<Option<InvocationPayload>> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| Error::InvalidPayload(e.to_string()))
}

/// Serializes a payload map as JSON text.
pub fn serialize_payload(payload: &InvocationPayload) -> Result<String> {
    serde_json::to_string(payload).map_err(|e| Error::InvalidPayload(e.to_string()))
}

/// Request to run a job.
///
/// The payload travels as JSON text nested inside the request document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    /// Name of the job to run.
    pub job: String,
    /// Free-form description of who queued the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Job arguments.
    #[serde(default, with = "payload_text", skip_serializing_if = "Option::is_none")]
    pub payload: Option<InvocationPayload>,
}

impl InvocationRequest {
    /// Creates a request for `job` with no source and no payload.
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            source: None,
            payload: None,
        }
    }

    /// Sets the source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the payload.
    pub fn with_payload(mut self, payload: Option<InvocationPayload>) -> Self {
        self.payload = payload;
        self
    }

    /// Serializes the request body.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidPayload(e.to_string()))
    }

    /// Parses a request body.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidPayload(e.to_string()))
    }
}

mod payload_text {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};

    use super::InvocationPayload;

    pub fn serialize<S: Serializer>(
        payload: &Option<InvocationPayload>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match payload {
            Some(map) => {
                let text =
                    serde_json::to_string(map).map_err(<S::Error as ser::Error>::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<InvocationPayload>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        super::parse_payload(text.as_deref()).map_err(<D::Error as de::Error>::custom)
    }
}

/// Lifecycle state of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationStatus {
    /// Waiting in the queue.
    Queued,
    /// Taken from the queue by a worker.
    Dequeued,
    /// Running.
    Executing,
    /// Finished.
    Executed,
    /// Cancelled before completion.
    Cancelled,
    /// Waiting to be resumed.
    Suspended,
    /// A state this client does not know.
    #[serde(other)]
    Unknown,
}

/// An invocation record returned by the work service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invocation {
    /// Invocation identifier.
    pub id: Uuid,
    /// Name of the job.
    pub job: String,
    /// Source recorded with the request.
    #[serde(default)]
    pub source: Option<String>,
    /// Current state.
    pub status: InvocationStatus,
}

impl Invocation {
    /// Parses an invocation record.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidPayload(e.to_string()))
    }

    /// Renders the id as 32 lowercase hex digits without separators.
    pub fn display_id(&self) -> String {
        self.id.simple().to_string()
    }
}

/// An unsuccessful HTTP response from the work service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP {status} {reason}")]
pub struct HttpFailure {
    /// Status code.
    pub status: u16,
    /// Reason phrase, as sent by the server.
    pub reason: String,
}

impl HttpFailure {
    /// Returns `Err` for any status outside the 2xx range.
    pub fn check(status: u16, reason: impl Into<String>) -> std::result::Result<(), HttpFailure> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(HttpFailure {
                status,
                reason: reason.into(),
            })
        }
    }
}
