// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A live automation session: element lookup plus gesture dispatch over
//! one transport.

use log::{debug, info};
use serde_json::{json, Value};

use crate::chain::TouchAction;
use crate::config::SessionConfig;
use crate::dispatch::GestureDispatcher;
use crate::error::{GestureError, Result};
use crate::geometry::Rect;
use crate::locator::{ElementHandle, ElementLocator, Selector};
use crate::multi::MultiTouchAction;
use crate::protocol::Ack;
use crate::transport::{HttpTransport, RawResponse, RemoteTransport};

const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

// Legacy JSON wire protocol status codes
const STATUS_NO_SUCH_ELEMENT: i64 = 7;
const STATUS_STALE_ELEMENT: i64 = 10;

pub struct RemoteSession<T: RemoteTransport = HttpTransport> {
    transport: T,
    session_id: String,
    touch_endpoint: String,
}

impl RemoteSession<HttpTransport> {
    pub fn connect(cfg: &SessionConfig) -> Self {
        info!("using session {} on {}", cfg.session_id, cfg.server_url);
        let transport = HttpTransport::new(&cfg.server_url, cfg.request_timeout());
        Self::with_transport(transport, &cfg.session_id, &cfg.touch_endpoint)
    }
}

impl<T: RemoteTransport> RemoteSession<T> {
    pub fn with_transport(transport: T, session_id: &str, touch_endpoint: &str) -> Self {
        RemoteSession {
            transport,
            session_id: session_id.to_string(),
            touch_endpoint: touch_endpoint.trim_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn path(&self, tail: &str) -> String {
        format!("session/{}/{}", self.session_id, tail)
    }

    pub fn dispatcher(&self) -> GestureDispatcher<'_> {
        GestureDispatcher::new(&self.transport, self.path(&self.touch_endpoint))
    }

    pub fn perform(&self, chain: &mut TouchAction) -> Result<Ack> {
        chain.perform(self, &self.dispatcher())
    }

    pub fn perform_multi(&self, multi: &mut MultiTouchAction) -> Result<Ack> {
        multi.perform(self, &self.dispatcher())
    }
}

/// Server-side error name, from either protocol dialect.
fn error_name(body: &Value) -> Option<&str> {
    if let Some(name) = body.pointer("/value/error").and_then(Value::as_str) {
        return Some(name);
    }
    match body.get("status").and_then(Value::as_i64) {
        Some(STATUS_NO_SUCH_ELEMENT) => Some("no such element"),
        Some(STATUS_STALE_ELEMENT) => Some("stale element reference"),
        _ => None,
    }
}

/// Unwrap `value` from a response, turning element errors into their
/// `GestureError` counterparts via `not_found` and `stale`.
fn unwrap_value(
    raw: RawResponse,
    not_found: impl FnOnce() -> GestureError,
    stale: impl FnOnce() -> GestureError,
) -> Result<Value> {
    let body: Value = serde_json::from_str(&raw.body).unwrap_or(Value::Null);
    match error_name(&body) {
        Some("no such element") => return Err(not_found()),
        Some("stale element reference") => return Err(stale()),
        Some(_) => {
            return Err(GestureError::RemoteExecution { status: raw.status, detail: raw.body })
        }
        None => {}
    }
    if !raw.is_success() {
        return Err(GestureError::RemoteExecution { status: raw.status, detail: raw.body });
    }
    match body {
        Value::Object(mut map) => Ok(map.remove("value").unwrap_or(Value::Null)),
        _ => Err(GestureError::RemoteExecution { status: raw.status, detail: raw.body }),
    }
}

fn element_id(value: &Value) -> Option<ElementHandle> {
    value
        .get(W3C_ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(ElementHandle::new)
}

fn coord(value: &Value, key: &str) -> Option<i32> {
    let v = value.get(key).and_then(Value::as_f64)?.round();
    if v.is_finite() && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Some(v as i32)
    } else {
        None
    }
}

impl<T: RemoteTransport> ElementLocator for RemoteSession<T> {
    fn locate(&self, selector: &Selector) -> Result<ElementHandle> {
        let payload = json!({"using": selector.using(), "value": selector.value()});
        let raw = self.transport.post(&self.path("element"), &payload)?;
        let not_found = || GestureError::ElementNotFound(selector.to_string());
        let value = unwrap_value(raw, not_found, not_found)?;
        let handle = element_id(&value).ok_or_else(not_found)?;
        debug!("{} -> {}", selector, handle);
        Ok(handle)
    }

    fn locate_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>> {
        let payload = json!({"using": selector.using(), "value": selector.value()});
        let raw = self.transport.post(&self.path("elements"), &payload)?;
        let not_found = || GestureError::ElementNotFound(selector.to_string());
        let value = unwrap_value(raw, not_found, not_found)?;
        let handles: Vec<_> = value
            .as_array()
            .map(|items| items.iter().filter_map(element_id).collect())
            .unwrap_or_default();
        debug!("{} -> {} element(s)", selector, handles.len());
        Ok(handles)
    }

    fn geometry(&self, handle: &ElementHandle) -> Result<Rect> {
        let raw = self.transport.get(&self.path(&format!("element/{}/rect", handle.id())))?;
        let value = unwrap_value(
            raw,
            || GestureError::ElementNotFound(handle.to_string()),
            || GestureError::StaleElement(handle.clone()),
        )?;
        match (
            coord(&value, "x"),
            coord(&value, "y"),
            coord(&value, "width"),
            coord(&value, "height"),
        ) {
            (Some(x), Some(y), Some(width), Some(height)) => Ok(Rect { x, y, width, height }),
            _ => Err(GestureError::RemoteExecution {
                status: 200,
                detail: format!("malformed rect for {handle}: {value}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset::Offset;
    use crate::transport::testing::RecordingTransport;

    fn ok(body: &str) -> std::result::Result<RawResponse, crate::transport::TransportError> {
        Ok(RawResponse { status: 200, body: body.into() })
    }

    #[test]
    fn locate_reads_both_element_keys() {
        let t = RecordingTransport::ok()
            .answer(ok(r#"{"value":{"element-6066-11e4-a52e-4f735466cecf":"w3c-1"}}"#))
            .answer(ok(r#"{"status":0,"value":{"ELEMENT":"legacy-2"}}"#));
        let s = RemoteSession::with_transport(t, "s1", "touch/perform");
        let sel = Selector::Id("io.appium.android.apis:id/start".into());

        assert_eq!(s.locate(&sel).unwrap(), ElementHandle::new("w3c-1"));
        assert_eq!(s.locate(&sel).unwrap(), ElementHandle::new("legacy-2"));

        let sent = s.transport().requests();
        assert_eq!(sent[0].0, "session/s1/element");
        assert_eq!(sent[0].1, json!({"using": "id", "value": "io.appium.android.apis:id/start"}));
    }

    #[test]
    fn locate_all_collects_handles() {
        let t = RecordingTransport::ok()
            .answer(ok(r#"{"value":[{"ELEMENT":"a"},{"ELEMENT":"b"},{"ELEMENT":"c"}]}"#));
        let s = RemoteSession::with_transport(t, "s1", "touch/perform");
        let all = s.locate_all(&Selector::ClassName("android.widget.ImageView".into())).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2], ElementHandle::new("c"));
    }

    #[test]
    fn missing_element_maps_to_not_found() {
        let t = RecordingTransport::ok().answer(Ok(RawResponse {
            status: 404,
            body: r#"{"value":{"error":"no such element","message":"nope"}}"#.into(),
        }));
        let s = RemoteSession::with_transport(t, "s1", "touch/perform");
        let err = s.locate(&Selector::Id("gone".into())).unwrap_err();
        assert!(matches!(err, GestureError::ElementNotFound(_)));
    }

    #[test]
    fn geometry_parses_rect_and_stale_handles() {
        let t = RecordingTransport::ok()
            .answer(ok(r#"{"value":{"x":100,"y":200.4,"width":50,"height":50}}"#))
            .answer(ok(r#"{"status":10,"value":"stale"}"#));
        let s = RemoteSession::with_transport(t, "s1", "touch/perform");
        let h = ElementHandle::new("e1");

        assert_eq!(s.geometry(&h).unwrap(), Rect::new(100, 200, 50, 50));
        assert_eq!(s.transport().requests()[0].0, "session/s1/element/e1/rect");
        assert!(matches!(s.geometry(&h), Err(GestureError::StaleElement(_))));
    }

    #[test]
    fn out_of_range_rect_is_malformed() {
        let t = RecordingTransport::ok()
            .answer(ok(r#"{"value":{"x":1e12,"y":0,"width":50,"height":50}}"#))
            .answer(ok(r#"{"value":{"x":0,"y":-3000000000,"width":50,"height":50}}"#))
            .answer(ok(r#"{"value":{"x":0,"y":0,"width":"wide","height":50}}"#));
        let s = RemoteSession::with_transport(t, "s1", "touch/perform");
        let h = ElementHandle::new("e1");

        for _ in 0..3 {
            match s.geometry(&h) {
                Err(GestureError::RemoteExecution { detail, .. }) => {
                    assert!(detail.starts_with("malformed rect"), "{detail}")
                }
                other => panic!("expected malformed rect, got {other:?}"),
            }
        }
    }

    #[test]
    fn perform_resolves_then_dispatches_to_session_endpoint() {
        let t = RecordingTransport::ok()
            .answer(ok(r#"{"value":{"x":0,"y":0,"width":40,"height":20}}"#));
        let s = RemoteSession::with_transport(t, "s1", "/touch/perform/");
        let mut chain = TouchAction::new().tap(Offset::element_offset(&ElementHandle::new("stop"), 5, 5));

        s.perform(&mut chain).unwrap();
        let sent = s.transport().requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].0, "session/s1/touch/perform");
        assert_eq!(sent[1].1["streams"][0]["steps"][0], json!({"type": "press", "x": 25, "y": 15}));
    }
}
