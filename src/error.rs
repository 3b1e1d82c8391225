//! Error taxonomy for the A2UI runtime.
//!
//! Transport, action and validation failures are surfaced as a single typed
//! enum rather than ad hoc strings, so embedding code can match on kind
//! instead of sniffing a message.

use thiserror::Error;

use crate::a2ui::ValidationReport;

/// Errors observable at the runtime's public boundary.
#[derive(Debug, Error)]
pub enum A2uiError {
    /// The SSE connection failed to open or was dropped mid-stream.
    #[error("transport error for surface {surface_id}: {message}")]
    Transport { surface_id: String, message: String },

    /// An action POST failed at the network layer, returned a non-2xx
    /// status, or its body carried `"success": false`.
    #[error("action '{action}' failed for surface {surface_id}: {message}")]
    Action {
        surface_id: String,
        action: String,
        message: String,
    },

    /// The server sent a message body that failed structural validation.
    /// Carried for observability; the runtime still attempts best-effort
    /// application of the message (see `a2ui::validate`).
    #[error("message validation issues for surface {surface_id}: {report}")]
    Validation {
        surface_id: String,
        report: ValidationReport,
    },

    /// The action response body could not be parsed as JSON.
    #[error("could not parse action response for surface {surface_id}: {message}")]
    ActionResponseParse { surface_id: String, message: String },
}

impl A2uiError {
    pub fn surface_id(&self) -> &str {
        match self {
            A2uiError::Transport { surface_id, .. } => surface_id,
            A2uiError::Action { surface_id, .. } => surface_id,
            A2uiError::Validation { surface_id, .. } => surface_id,
            A2uiError::ActionResponseParse { surface_id, .. } => surface_id,
        }
    }
}
