//! Host configuration for a runtime instance.

use std::collections::HashMap;
use std::time::Duration;

/// Parameters a host supplies when wiring up a surface: endpoints, auth,
/// reconnect timing, and the success-event synthesis table.
#[derive(Clone, Debug)]
pub struct A2uiConfig {
    /// SSE stream endpoint. `surfaceId` is appended as a query parameter.
    pub stream_url: String,

    /// Action POST endpoint.
    pub action_url: String,

    /// Optional bearer token sent with both the stream and action requests.
    pub auth_token: Option<String>,

    /// Delay before attempting to reconnect after a dropped stream.
    pub reconnect_delay: Duration,

    /// Maps an action-response field name (e.g. `"ticketId"`) to the
    /// synthetic action name dispatched to `on_action` subscribers when that
    /// field is present in a successful response (e.g. `"create_success"`).
    pub success_events: HashMap<String, String>,

    /// Maps a named patch bag in an action response (e.g. `"paginationUpdate"`)
    /// to the data-model path prefix its fields are written under (e.g.
    /// `"/app/pagination"`). Bags with no entry here are ignored.
    pub patch_bag_prefixes: HashMap<String, String>,
}

impl Default for A2uiConfig {
    fn default() -> Self {
        A2uiConfig {
            stream_url: "/api/a2ui/stream".to_string(),
            action_url: "/api/a2ui/action".to_string(),
            auth_token: None,
            reconnect_delay: Duration::from_secs(3),
            success_events: HashMap::new(),
            patch_bag_prefixes: HashMap::new(),
        }
    }
}

impl A2uiConfig {
    pub fn new(stream_url: impl Into<String>, action_url: impl Into<String>) -> Self {
        A2uiConfig {
            stream_url: stream_url.into(),
            action_url: action_url.into(),
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_success_event(
        mut self,
        response_field: impl Into<String>,
        action_name: impl Into<String>,
    ) -> Self {
        self.success_events
            .insert(response_field.into(), action_name.into());
        self
    }

    pub fn with_patch_bag_prefix(
        mut self,
        bag_name: impl Into<String>,
        path_prefix: impl Into<String>,
    ) -> Self {
        self.patch_bag_prefixes
            .insert(bag_name.into(), path_prefix.into());
        self
    }
}
