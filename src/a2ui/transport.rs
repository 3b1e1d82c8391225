//! Transport & session controller.
//!
//! Opens one SSE stream per surface, parses and validates inbound frames,
//! applies them to a [`DataModel`]/[`Renderer`] pair, and POSTs resolved user
//! actions back to the server, applying the response as an authoritative
//! (non-dirty) model patch. Reconnects on stream failure with a fixed delay,
//! clearing dirty flags before the new connection opens.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::A2uiConfig;
use crate::error::A2uiError;

use super::data_model::DataModel;
use super::message::{A2uiMessage, DataContent, DataValue};
use super::renderer::{Renderer, ResolvedAction};
use super::validate::validate_message;

/// Structured hooks for observability tooling (DevTools overlays, test
/// harnesses). Every method has a no-op default; implement only what you need.
pub trait TransportObserver: Send + Sync {
    fn sse(&self, _surface_id: &str, _message: &A2uiMessage) {}
    fn action(&self, _surface_id: &str, _action: &str, _source_id: &str, _context: &HashMap<String, Value>) {}
    fn response(&self, _surface_id: &str, _response: &Value) {}
    fn error(&self, _surface_id: &str, _error: &A2uiError) {}
    fn validation(&self, _surface_id: &str, _raw: &Value, _issues: &super::validate::ValidationReport) {}
}

struct NoopObserver;
impl TransportObserver for NoopObserver {}

/// Incremental SSE line buffer, mirroring the `data:`/comment/blank-line
/// framing rules of the server-sent-events format.
#[derive(Default)]
struct SseFrameBuffer {
    data_lines: Vec<String>,
}

enum SseFrame {
    Data(String),
    Comment(String),
}

impl SseFrameBuffer {
    fn push_line(&mut self, line: &str) -> Option<SseFrame> {
        if let Some(rest) = line.strip_prefix("data:") {
            self.data_lines.push(rest.trim().to_string());
            None
        } else if let Some(rest) = line.strip_prefix(':') {
            Some(SseFrame::Comment(rest.trim().to_string()))
        } else if line.is_empty() {
            if self.data_lines.is_empty() {
                None
            } else {
                let data = self.data_lines.join("\n");
                self.data_lines.clear();
                Some(SseFrame::Data(data))
            }
        } else {
            None
        }
    }
}

/// Drives one surface: an SSE stream reader plus an action-POST sender.
pub struct Transport {
    surface_id: String,
    config: A2uiConfig,
    client: reqwest::Client,
    data_model: DataModel,
    renderer: Renderer,
    observer: Arc<dyn TransportObserver>,
}

impl Transport {
    pub fn new(surface_id: impl Into<String>, config: A2uiConfig, data_model: DataModel, renderer: Renderer) -> Self {
        Transport {
            surface_id: surface_id.into(),
            config,
            client: reqwest::Client::new(),
            data_model,
            renderer,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TransportObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Connect and apply inbound messages until the stream ends or the
    /// surface is deleted, reconnecting on failure until `stop` is signalled.
    /// `stop` is a best-effort cooperative cancellation channel; closing it
    /// (dropping the sender) ends the loop after the current attempt.
    pub async fn run(&self, mut stop: mpsc::Receiver<()>) {
        loop {
            tokio::select! {
                _ = stop.recv() => return,
                result = self.connect_once() => {
                    if let Err(err) = result {
                        self.observer.error(&self.surface_id, &err);
                        log::warn!("a2ui transport error for surface {}: {err}", self.surface_id);
                    }
                }
            }
            self.data_model.clear_all_dirty();
            tokio::select! {
                _ = stop.recv() => return,
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
            }
        }
    }

    async fn connect_once(&self) -> Result<(), A2uiError> {
        let url = format!(
            "{}?surfaceId={}",
            self.config.stream_url,
            urlencoding_escape(&self.surface_id)
        );
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "text/event-stream");
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| A2uiError::Transport {
            surface_id: self.surface_id.clone(),
            message: e.to_string(),
        })?;
        if !response.status().is_success() {
            return Err(A2uiError::Transport {
                surface_id: self.surface_id.clone(),
                message: format!("stream returned HTTP {}", response.status()),
            });
        }

        let mut stream = response.bytes_stream();
        let mut buffer = SseFrameBuffer::default();
        let mut leftover = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| A2uiError::Transport {
                surface_id: self.surface_id.clone(),
                message: e.to_string(),
            })?;
            leftover.push_str(&String::from_utf8_lossy(&bytes));
            while let Some(pos) = leftover.find('\n') {
                let line = leftover[..pos].trim_end_matches('\r').to_string();
                leftover.drain(..=pos);
                match buffer.push_line(&line) {
                    Some(SseFrame::Data(data)) => self.handle_frame(&data),
                    Some(SseFrame::Comment(_)) => {}
                    None => {}
                }
            }
        }
        Ok(())
    }

    fn handle_frame(&self, raw: &str) {
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            log::warn!("a2ui surface {}: could not parse SSE frame as JSON", self.surface_id);
            return;
        };

        let report = validate_message(&value);
        if !report.is_valid() {
            self.observer.validation(&self.surface_id, &value, &report);
            log::warn!(
                "a2ui surface {}: validation issues: {}",
                self.surface_id,
                report
            );
        }

        let Ok(message) = serde_json::from_value::<A2uiMessage>(value) else {
            return;
        };
        if message.surface_id() != self.surface_id {
            return;
        }
        self.observer.sse(&self.surface_id, &message);
        self.apply_message(message);
    }

    fn apply_message(&self, message: A2uiMessage) {
        match message {
            A2uiMessage::SurfaceUpdate(update) => {
                self.renderer.set_components(update.components);
            }
            A2uiMessage::BeginRendering(begin) => {
                self.renderer.set_root(begin.root);
            }
            A2uiMessage::DataModelUpdate(update) => {
                self.data_model.batch(|dm| dm.update(&update.path, &update.contents));
            }
            A2uiMessage::DeleteSurface(_) => {
                self.renderer.clear();
                self.data_model.clear_all();
            }
            A2uiMessage::UserAction(_) => {
                // Server-to-client streams never carry this variant in practice;
                // the validator accepts it symmetrically for reuse in tests.
            }
        }
    }

    /// POST a resolved action and apply the server's response patch, if any.
    pub async fn send_action(&self, action: ResolvedAction) -> Result<(), A2uiError> {
        let body = serde_json::json!({
            "name": action.name,
            "surfaceId": self.surface_id,
            "sourceComponentId": action.source_component_id,
            "timestamp": Utc::now().to_rfc3339(),
            "context": action.context,
        });

        self.observer
            .action(&self.surface_id, &action.name, &action.source_component_id, &action.context);

        let mut request = self.client.post(&self.config.action_url).json(&body);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| A2uiError::Action {
            surface_id: self.surface_id.clone(),
            action: action.name.clone(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(A2uiError::Action {
                surface_id: self.surface_id.clone(),
                action: action.name.clone(),
                message: format!("action POST returned HTTP {}", response.status()),
            });
        }

        let text = response.text().await.map_err(|e| A2uiError::ActionResponseParse {
            surface_id: self.surface_id.clone(),
            message: e.to_string(),
        })?;
        let parsed: Value = serde_json::from_str(&text).map_err(|e| A2uiError::ActionResponseParse {
            surface_id: self.surface_id.clone(),
            message: e.to_string(),
        })?;

        self.observer.response(&self.surface_id, &parsed);
        self.apply_action_response(&action.name, &parsed)
    }

    fn apply_action_response(&self, action_name: &str, response: &Value) -> Result<(), A2uiError> {
        let Some(obj) = response.as_object() else {
            return Ok(());
        };

        if let Some(Value::Bool(false)) = obj.get("success") {
            let message = obj
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("action rejected")
                .to_string();
            return Err(A2uiError::Action {
                surface_id: self.surface_id.clone(),
                action: action_name.to_string(),
                message,
            });
        }

        if let Some(update) = obj.get("dataUpdate").and_then(Value::as_object) {
            let path = update
                .get("path")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| "/".to_string());

            if let Some(items) = update.get("items").and_then(Value::as_array) {
                self.data_model.batch(|dm| {
                    dm.delete(&path);
                    for item in items {
                        let Some(id) = item.get("id").and_then(Value::as_str) else {
                            continue;
                        };
                        let Some(fields) = item.as_object() else { continue };
                        for (field, v) in fields {
                            dm.set(&format!("{path}/{id}/{field}"), v.clone(), false);
                        }
                    }
                });
            } else if let Some(value) = update.get("value") {
                self.data_model.set(&path, value.clone(), false);
            }
        }

        for (field, action_name) in &self.config.success_events {
            if obj.contains_key(field.as_str()) {
                self.renderer.dispatch_synthetic(ResolvedAction {
                    name: action_name.clone(),
                    source_component_id: String::new(),
                    context_path: None,
                    context: HashMap::new(),
                });
            }
        }

        for (key, value) in obj {
            let Some(prefix) = self.config.patch_bag_prefixes.get(key.as_str()) else {
                continue;
            };
            if let Some(patch) = value.as_object() {
                for (field, v) in patch {
                    self.data_model.set(&format!("{prefix}/{field}"), v.clone(), false);
                }
            }
        }

        Ok(())
    }
}

fn urlencoding_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_frame_buffer_assembles_multiline_data() {
        let mut buf = SseFrameBuffer::default();
        assert!(buf.push_line("data: line1").is_none());
        assert!(buf.push_line("data: line2").is_none());
        match buf.push_line("") {
            Some(SseFrame::Data(data)) => assert_eq!(data, "line1\nline2"),
            _ => panic!("expected data frame"),
        }
    }

    #[test]
    fn sse_frame_buffer_reports_comments() {
        let mut buf = SseFrameBuffer::default();
        match buf.push_line(": keep-alive") {
            Some(SseFrame::Comment(c)) => assert_eq!(c, "keep-alive"),
            _ => panic!("expected comment frame"),
        }
    }

    #[test]
    fn delete_surface_clears_renderer_and_model() {
        let dm = DataModel::new();
        let renderer = Renderer::new();
        renderer.set_root("root");
        dm.set_string("/app/form/name", "x", false);

        let transport = Transport::new("main", A2uiConfig::default(), dm.clone(), renderer.clone());
        transport.apply_message(A2uiMessage::DeleteSurface(super::super::message::DeleteSurface {
            surface_id: "main".to_string(),
        }));

        assert!(renderer.root_id().is_none());
        assert_eq!(dm.get("/app/form/name"), None);
    }

    #[test]
    fn url_escape_encodes_reserved_characters() {
        assert_eq!(urlencoding_escape("main surface"), "main%20surface");
        assert_eq!(urlencoding_escape("abc-123_XYZ.~"), "abc-123_XYZ.~");
    }

    #[test]
    fn action_response_data_update_with_value_patches_path() {
        let dm = DataModel::new();
        let renderer = Renderer::new();
        let transport = Transport::new("main", A2uiConfig::default(), dm.clone(), renderer);

        let response = serde_json::json!({
            "success": true,
            "dataUpdate": { "path": "/app/ticket", "value": "T-42" }
        });
        transport.apply_action_response("create", &response).unwrap();
        assert_eq!(dm.get_string("/app/ticket"), Some("T-42".to_string()));
    }

    #[test]
    fn action_response_success_false_is_an_error() {
        let dm = DataModel::new();
        let renderer = Renderer::new();
        let transport = Transport::new("main", A2uiConfig::default(), dm, renderer);

        let response = serde_json::json!({ "success": false, "error": "nope" });
        let result = transport.apply_action_response("create", &response);
        assert!(result.is_err());
    }

    #[test]
    fn action_response_items_replace_list_entries() {
        let dm = DataModel::new();
        let renderer = Renderer::new();
        let transport = Transport::new("main", A2uiConfig::default(), dm.clone(), renderer);

        dm.update(
            "/app/items",
            &[DataContent {
                key: "old".to_string(),
                value: DataValue::ValueMap(vec![DataContent {
                    key: "title".to_string(),
                    value: DataValue::ValueString("stale".to_string()),
                }]),
            }],
        );

        let response = serde_json::json!({
            "success": true,
            "dataUpdate": {
                "path": "/app/items",
                "items": [{ "id": "new1", "title": "Fresh" }]
            }
        });
        transport.apply_action_response("refresh", &response).unwrap();
        assert_eq!(dm.get_string("/app/items/new1/title"), Some("Fresh".to_string()));
    }

    #[test]
    fn named_patch_bag_writes_under_its_configured_prefix() {
        let dm = DataModel::new();
        let renderer = Renderer::new();
        let config = A2uiConfig::default()
            .with_patch_bag_prefix("paginationUpdate", "/app/pagination");
        let transport = Transport::new("main", config, dm.clone(), renderer);

        let response = serde_json::json!({
            "success": true,
            "paginationUpdate": { "page": 2, "hasMore": false }
        });
        transport.apply_action_response("loadMore", &response).unwrap();
        assert_eq!(dm.get_number("/app/pagination/page"), Some(2.0));
        assert_eq!(dm.get_bool("/app/pagination/hasMore"), Some(false));
    }

    #[test]
    fn patch_bag_with_no_configured_prefix_is_ignored() {
        let dm = DataModel::new();
        let renderer = Renderer::new();
        let transport = Transport::new("main", A2uiConfig::default(), dm.clone(), renderer);

        let response = serde_json::json!({
            "success": true,
            "paginationUpdate": { "page": 2 }
        });
        transport.apply_action_response("loadMore", &response).unwrap();
        assert_eq!(dm.get("/app/pagination/page"), None);
    }
}
