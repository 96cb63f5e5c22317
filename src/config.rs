// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723/wd/hub";
pub const DEFAULT_TOUCH_ENDPOINT: &str = "touch/perform";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Where and how to reach an automation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub server_url: String,
    pub session_id: String,
    /// Client-side bound on a single request, dispatch included
    pub request_timeout_ms: u64,
    /// Gesture endpoint, relative to the session
    pub touch_endpoint: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            server_url: DEFAULT_SERVER_URL.to_string(),
            session_id: String::new(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            touch_endpoint: DEFAULT_TOUCH_ENDPOINT.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
