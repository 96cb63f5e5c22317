// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP plumbing to the automation server.
//!
//! A transport makes exactly one attempt per call. Any HTTP status is a
//! response; only a missing response is an error.

use std::io;
use std::time::Duration;

use log::debug;

use crate::error::GestureError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("connection failed: {0}")]
    Connection(String),
}

impl From<TransportError> for GestureError {
    fn from(e: TransportError) -> Self {
        GestureError::Transport(e.to_string())
    }
}

pub trait RemoteTransport {
    fn post(&self, endpoint: &str, payload: &serde_json::Value)
        -> Result<RawResponse, TransportError>;

    fn get(&self, endpoint: &str) -> Result<RawResponse, TransportError>;
}

/// Blocking JSON-over-HTTP transport with one timeout covering the whole
/// request.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        HttpTransport {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn finish(
        &self,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<RawResponse, TransportError> {
        let response = match result {
            Ok(r) => r,
            Err(ureq::Error::Status(_, r)) => r,
            Err(ureq::Error::Transport(t)) => {
                let timed_out = std::error::Error::source(&t)
                    .and_then(|s| s.downcast_ref::<io::Error>())
                    .is_some_and(is_timeout);
                return Err(if timed_out {
                    TransportError::Timeout { timeout_ms: self.timeout_ms() }
                } else {
                    TransportError::Connection(t.to_string())
                });
            }
        };

        let status = response.status();
        let body = response.into_string().map_err(|e| {
            if is_timeout(&e) {
                TransportError::Timeout { timeout_ms: self.timeout_ms() }
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;
        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(RawResponse { status, body })
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

impl RemoteTransport for HttpTransport {
    fn post(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        self.finish(self.agent.post(&url).send_json(payload))
    }

    fn get(&self, endpoint: &str) -> Result<RawResponse, TransportError> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        self.finish(self.agent.get(&url).call())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let t = HttpTransport::new("http://127.0.0.1:4723/wd/hub/", Duration::from_secs(1));
        assert_eq!(
            t.url("/session/abc/touch/perform"),
            "http://127.0.0.1:4723/wd/hub/session/abc/touch/perform"
        );
    }

    #[test]
    #[ignore = "opens a real socket to localhost:9"]
    fn refused_connection_is_not_a_timeout() {
        let t = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2));
        let err = t.get("status").unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)), "{err:?}");
    }
}
