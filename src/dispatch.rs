// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::{info, warn};

use crate::error::{GestureError, Result};
use crate::protocol::{Ack, GestureRequest};
use crate::transport::{RemoteTransport, TransportError};

/// Sends composed gestures to one endpoint. One attempt per gesture.
pub struct GestureDispatcher<'a> {
    transport: &'a dyn RemoteTransport,
    endpoint: String,
}

impl<'a> GestureDispatcher<'a> {
    pub fn new(transport: &'a dyn RemoteTransport, endpoint: impl Into<String>) -> Self {
        GestureDispatcher { transport, endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Deliver `request` and wait for the server's verdict.
    ///
    /// A timeout means the outcome on the device is unknown and is reported
    /// as `DispatchTimeout`, never as `RemoteExecution`.
    pub fn send(&self, request: &GestureRequest) -> Result<Ack> {
        let payload = serde_json::to_value(request)?;
        info!(
            "dispatching gesture to {}: {} stream(s), {} step(s)",
            self.endpoint,
            request.streams.len(),
            request.step_count()
        );

        let raw = match self.transport.post(&self.endpoint, &payload) {
            Ok(raw) => raw,
            Err(TransportError::Timeout { timeout_ms }) => {
                warn!("gesture dispatch to {} timed out after {}ms", self.endpoint, timeout_ms);
                return Err(GestureError::DispatchTimeout {
                    endpoint: self.endpoint.clone(),
                    timeout_ms,
                });
            }
            Err(e) => {
                warn!("gesture dispatch to {} failed: {}", self.endpoint, e);
                return Err(e.into());
            }
        };

        if !raw.is_success() {
            warn!("server rejected gesture: HTTP {}", raw.status);
            return Err(GestureError::RemoteExecution { status: raw.status, detail: raw.body });
        }

        let ack = if raw.body.trim().is_empty() {
            Ack::default()
        } else {
            match serde_json::from_str::<Ack>(&raw.body) {
                Ok(ack) => ack,
                Err(_) => Ack { value: serde_json::Value::String(raw.body.clone()), status: None },
            }
        };
        if !ack.is_success() {
            warn!("server reported gesture failure: {}", raw.body);
            return Err(GestureError::RemoteExecution { status: raw.status, detail: raw.body });
        }

        info!("gesture acknowledged");
        Ok(ack)
    }
}
