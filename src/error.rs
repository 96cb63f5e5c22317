// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::locator::ElementHandle;

pub type Result<T> = std::result::Result<T, GestureError>;

/// Everything that can go wrong between composing a gesture and the server
/// acknowledging it. Nothing here is retried by this crate.
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("stale element reference: {0}")]
    StaleElement(ElementHandle),

    #[error("invalid touch sequence at step {index}: {reason}")]
    InvalidSequence { index: usize, reason: String },

    #[error("touch action was already performed")]
    AlreadyPerformed,

    #[error("touch action was already performed and cannot join a multi-touch gesture")]
    ChainAlreadyConsumed,

    /// The request went out but no answer arrived in time. The gesture may
    /// or may not have run on the device.
    #[error("no acknowledgment from {endpoint} within {timeout_ms}ms")]
    DispatchTimeout { endpoint: String, timeout_ms: u64 },

    /// Server body, verbatim.
    #[error("remote execution failed (HTTP {status}): {detail}")]
    RemoteExecution { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("gesture script error: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GestureError {
    pub(crate) fn sequence(index: usize, reason: impl Into<String>) -> Self {
        GestureError::InvalidSequence { index, reason: reason.into() }
    }
}
