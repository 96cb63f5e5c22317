// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multi-finger gestures.
//!
//! Each added chain becomes one stream, numbered in the order it was added.
//! Streams run concurrently on the device and each keeps its own clock from
//! zero; lining fingers up in time is done with `wait_action` inside the
//! streams, not here.

use log::{debug, info};

use crate::chain::TouchAction;
use crate::dispatch::GestureDispatcher;
use crate::error::{GestureError, Result};
use crate::locator::ElementLocator;
use crate::protocol::{Ack, GestureRequest};

#[derive(Debug, Default)]
pub struct MultiTouchAction {
    streams: Vec<TouchAction>,
    performed: bool,
}

impl MultiTouchAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `chain` as the next stream.
    pub fn add(mut self, chain: TouchAction) -> Result<Self> {
        if chain.is_performed() {
            return Err(GestureError::ChainAlreadyConsumed);
        }
        self.streams.push(chain);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn is_performed(&self) -> bool {
        self.performed
    }

    /// Seal every stream independently and package them as one request.
    pub fn seal(&self, locator: &dyn ElementLocator) -> Result<GestureRequest> {
        if self.streams.is_empty() {
            return Err(GestureError::sequence(0, "multi-touch action has no streams"));
        }

        let mut streams = Vec::with_capacity(self.streams.len());
        for (i, chain) in self.streams.iter().enumerate() {
            let sealed = chain.seal(locator).map_err(|e| match e {
                GestureError::InvalidSequence { index, reason } => GestureError::InvalidSequence {
                    index,
                    reason: format!("finger{i}: {reason}"),
                },
                other => other,
            })?;
            debug!("finger{} timeline: {}ms", i, sealed.duration_ms());
            streams.push(sealed.into_stream(i));
        }
        Ok(GestureRequest { streams })
    }

    /// Seal all streams and send them as one atomic gesture.
    pub fn perform(
        &mut self,
        locator: &dyn ElementLocator,
        dispatcher: &GestureDispatcher<'_>,
    ) -> Result<Ack> {
        if self.performed {
            return Err(GestureError::AlreadyPerformed);
        }
        let request = self.seal(locator)?;

        info!("performing multi-touch action with {} finger(s)", request.streams.len());
        self.performed = true;
        dispatcher.send(&request)
    }
}
