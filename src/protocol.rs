// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// One primitive step as the server receives it. Coordinates are always
/// resolved pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireStep {
    /// Finger down
    Press { x: i32, y: i32 },
    /// Finger down and hold; server default hold time when `durationMs` is absent
    #[serde(rename_all = "camelCase")]
    LongPress {
        x: i32,
        y: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    /// Drag the held finger
    MoveTo { x: i32, y: i32 },
    /// Timing gap, nothing touches the screen
    #[serde(rename_all = "camelCase")]
    Wait { duration_ms: u64 },
    /// Finger up
    Release,
}

/// One finger's ordered steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPayload {
    pub name: String,
    pub steps: Vec<WireStep>,
}

/// The body of a single gesture dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureRequest {
    pub streams: Vec<StreamPayload>,
}

impl GestureRequest {
    pub fn step_count(&self) -> usize {
        self.streams.iter().map(|s| s.steps.len()).sum()
    }
}

/// Server reply body. Legacy servers put a non-zero `status` on failure
/// even with HTTP 200; W3C servers put an `error` field inside `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

impl Ack {
    pub fn is_success(&self) -> bool {
        self.status.unwrap_or(0) == 0 && self.value.get("error").is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn step_shapes() {
        let steps = vec![
            WireStep::LongPress { x: 1, y: 2, duration_ms: None },
            WireStep::LongPress { x: 1, y: 2, duration_ms: Some(2000) },
            WireStep::MoveTo { x: 3, y: 4 },
            WireStep::Wait { duration_ms: 500 },
            WireStep::Release,
        ];
        assert_eq!(
            serde_json::to_value(&steps).unwrap(),
            json!([
                {"type": "longPress", "x": 1, "y": 2},
                {"type": "longPress", "x": 1, "y": 2, "durationMs": 2000},
                {"type": "moveTo", "x": 3, "y": 4},
                {"type": "wait", "durationMs": 500},
                {"type": "release"},
            ])
        );
    }

    #[test]
    fn ack_failure_detection() {
        let ok: Ack = serde_json::from_value(json!({"value": null})).unwrap();
        assert!(ok.is_success());

        let legacy: Ack = serde_json::from_value(json!({"status": 13, "value": "boom"})).unwrap();
        assert!(!legacy.is_success());

        let w3c: Ack =
            serde_json::from_value(json!({"value": {"error": "unknown error", "message": "x"}}))
                .unwrap();
        assert!(!w3c.is_success());
    }
}
