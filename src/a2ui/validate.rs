//! Structural validation of raw A2UI wire payloads.
//!
//! Validation is advisory, not a gate: the transport logs and records the
//! issues this module finds, but still attempts to decode and apply the
//! message (see SPEC_FULL.md §4.2). This module exists so those issues can
//! be reported with a path, instead of only a serde error string.

use std::fmt;

use serde_json::Value;

/// A single structural problem found while walking a raw message.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// JSON-Pointer-style path to the offending node, e.g. `/dataModelUpdate/contents/0`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All issues found validating one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(Issue::to_string).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate a raw message body against the structural rules of §4.2.
///
/// This does not replace serde deserialization; it runs independently over
/// the `serde_json::Value` so the caller gets path-qualified issues even when
/// the payload deserializes successfully under the lenient/untagged/`#[serde(other)]`
/// rules the wire types use.
pub fn validate_message(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(obj) = value.as_object() else {
        report.push("", "message must be a JSON object");
        return report;
    };

    let known_envelopes = [
        "beginRendering",
        "surfaceUpdate",
        "dataModelUpdate",
        "deleteSurface",
        "userAction",
    ];
    let present: Vec<&str> = known_envelopes
        .iter()
        .copied()
        .filter(|k| obj.contains_key(*k))
        .collect();

    match present.len() {
        0 => report.push("", "message has no recognized envelope key"),
        1 => {
            let key = present[0];
            let body = &obj[key];
            match key {
                "beginRendering" => validate_begin_rendering(body, &mut report),
                "surfaceUpdate" => validate_surface_update(body, &mut report),
                "dataModelUpdate" => validate_data_model_update(body, &mut report),
                "deleteSurface" => validate_delete_surface(body, &mut report),
                "userAction" => validate_user_action(body, &mut report),
                _ => unreachable!(),
            }
        }
        _ => report.push(
            "",
            format!("message carries more than one envelope key: {:?}", present),
        ),
    }

    report
}

fn require_string(obj: &Value, field: &str, path: &str, report: &mut ValidationReport) {
    match obj.get(field) {
        None => report.push(path, format!("missing required field `{field}`")),
        Some(Value::String(_)) => {}
        Some(_) => report.push(path, format!("field `{field}` must be a string")),
    }
}

fn validate_begin_rendering(body: &Value, report: &mut ValidationReport) {
    let path = "/beginRendering";
    require_string(body, "surfaceId", path, report);
    require_string(body, "root", path, report);
}

fn validate_surface_update(body: &Value, report: &mut ValidationReport) {
    let path = "/surfaceUpdate";
    require_string(body, "surfaceId", path, report);
    match body.get("components") {
        Some(Value::Array(components)) => {
            for (i, c) in components.iter().enumerate() {
                validate_component_definition(c, &format!("{path}/components/{i}"), report);
            }
        }
        Some(_) => report.push(path, "field `components` must be an array"),
        None => report.push(path, "missing required field `components`"),
    }
}

fn validate_component_definition(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(obj) = value.as_object() else {
        report.push(path, "component definition must be an object");
        return;
    };
    require_string(value, "id", path, report);
    match obj.get("component") {
        None => report.push(path, "missing required field `component`"),
        Some(Value::Object(m)) if m.len() == 1 => {}
        Some(Value::Object(m)) => report.push(
            path,
            format!("`component` must have exactly one type key, got {}", m.len()),
        ),
        Some(_) => report.push(path, "`component` must be an object keyed by type"),
    }
}

fn validate_data_model_update(body: &Value, report: &mut ValidationReport) {
    let path = "/dataModelUpdate";
    require_string(body, "surfaceId", path, report);
    match body.get("contents") {
        Some(Value::Array(contents)) => {
            for (i, c) in contents.iter().enumerate() {
                validate_data_content(c, &format!("{path}/contents/{i}"), report);
            }
        }
        Some(_) => report.push(path, "field `contents` must be an array"),
        None => report.push(path, "missing required field `contents`"),
    }
}

fn validate_data_content(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(obj) = value.as_object() else {
        report.push(path, "data content entry must be an object");
        return;
    };
    require_string(value, "key", path, report);

    let value_keys = [
        "valueString",
        "valueNumber",
        "valueBoolean",
        "valueMap",
        "valueArray",
    ];
    let present: Vec<&str> = value_keys
        .iter()
        .copied()
        .filter(|k| obj.contains_key(*k))
        .collect();
    if present.len() > 1 {
        report.push(
            path,
            format!("at most one value field may be set, got {:?}", present),
        );
    }
    if let Some(Value::Array(entries)) = obj.get("valueMap") {
        for (i, e) in entries.iter().enumerate() {
            validate_data_content(e, &format!("{path}/valueMap/{i}"), report);
        }
    }
}

fn validate_delete_surface(body: &Value, report: &mut ValidationReport) {
    require_string(body, "surfaceId", "/deleteSurface", report);
}

fn validate_user_action(body: &Value, report: &mut ValidationReport) {
    let path = "/userAction";
    require_string(body, "surfaceId", path, report);
    match body.get("action") {
        Some(Value::Object(action)) => {
            if !matches!(action.get("name"), Some(Value::String(_))) {
                report.push(format!("{path}/action"), "missing required field `name`");
            }
        }
        Some(_) => report.push(path, "field `action` must be an object"),
        None => report.push(path, "missing required field `action`"),
    }
}
