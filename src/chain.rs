// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-finger touch chains.
//!
//! Appending never fails. Sequencing rules and coordinate resolution are
//! applied together in `seal`, which turns the chain into wire steps:
//!
//! ```text
//! Idle --press/longPress--> Down --moveTo--> Down --release--> Idle
//! Idle --tap--> Idle                 (press, release, repeated)
//! ```
//!
//! `wait` is legal in either state. A chain must end `Idle`.
//!
//! A chain is built by one caller; it carries no lock.

use std::time::Duration;

use log::{debug, info};

use crate::dispatch::GestureDispatcher;
use crate::error::{GestureError, Result};
use crate::locator::ElementLocator;
use crate::offset::{CoordinateResolver, Offset};
use crate::protocol::{Ack, GestureRequest, StreamPayload, WireStep};
use crate::step::{millis, GestureStep, DEFAULT_LONG_PRESS_MS, TAP_GAP_MS};

#[derive(Debug, Clone, Default)]
pub struct TouchAction {
    steps: Vec<GestureStep>,
    performed: bool,
}

impl TouchAction {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, step: GestureStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn press(self, offset: Offset) -> Self {
        self.push(GestureStep::Press(offset))
    }

    /// Long press with the server's default hold time.
    pub fn long_press(self, offset: Offset) -> Self {
        self.push(GestureStep::LongPress { offset, duration: None })
    }

    pub fn long_press_for(self, offset: Offset, duration: Duration) -> Self {
        self.push(GestureStep::LongPress { offset, duration: Some(duration) })
    }

    pub fn move_to(self, offset: Offset) -> Self {
        self.push(GestureStep::MoveTo(offset))
    }

    pub fn wait_action(self, duration: Duration) -> Self {
        self.push(GestureStep::Wait(duration))
    }

    pub fn release(self) -> Self {
        self.push(GestureStep::Release)
    }

    pub fn tap(self, offset: Offset) -> Self {
        self.push(GestureStep::Tap { offset, count: None })
    }

    /// `count` taps at the same spot, `TAP_GAP_MS` apart.
    pub fn tap_times(self, offset: Offset, count: u32) -> Self {
        self.push(GestureStep::Tap { offset, count: Some(count) })
    }

    /// Steps as appended, taps unexpanded.
    pub fn steps(&self) -> &[GestureStep] {
        &self.steps
    }

    pub fn is_performed(&self) -> bool {
        self.performed
    }

    /// Validate the sequence and resolve every offset against `locator`.
    pub fn seal(&self, locator: &dyn ElementLocator) -> Result<SealedChain> {
        if self.steps.is_empty() {
            return Err(GestureError::sequence(0, "touch action has no steps"));
        }

        let mut resolver = CoordinateResolver::new(locator);
        let mut out = Vec::with_capacity(self.steps.len() + 1);
        let mut down = false;

        for (i, step) in self.steps.iter().enumerate() {
            match step {
                GestureStep::Press(offset) => {
                    if down {
                        return Err(already_down(i, step));
                    }
                    let p = resolver.resolve(i, offset)?;
                    out.push(WireStep::Press { x: p.x, y: p.y });
                    down = true;
                }
                GestureStep::LongPress { offset, duration } => {
                    if down {
                        return Err(already_down(i, step));
                    }
                    let p = resolver.resolve(i, offset)?;
                    out.push(WireStep::LongPress {
                        x: p.x,
                        y: p.y,
                        duration_ms: duration.map(millis),
                    });
                    down = true;
                }
                GestureStep::MoveTo(offset) => {
                    if !down {
                        return Err(GestureError::sequence(i, "moveTo without a preceding press"));
                    }
                    let p = resolver.resolve(i, offset)?;
                    out.push(WireStep::MoveTo { x: p.x, y: p.y });
                }
                GestureStep::Wait(duration) => {
                    out.push(WireStep::Wait { duration_ms: millis(*duration) });
                }
                GestureStep::Release => {
                    if !down {
                        return Err(GestureError::sequence(i, "release without a preceding press"));
                    }
                    out.push(WireStep::Release);
                    down = false;
                }
                GestureStep::Tap { offset, count } => {
                    if down {
                        return Err(already_down(i, step));
                    }
                    let count = count.unwrap_or(1);
                    if count == 0 {
                        return Err(GestureError::sequence(i, "tap count must be at least 1"));
                    }
                    let p = resolver.resolve(i, offset)?;
                    for n in 0..count {
                        if n > 0 {
                            out.push(WireStep::Wait { duration_ms: TAP_GAP_MS });
                        }
                        out.push(WireStep::Press { x: p.x, y: p.y });
                        out.push(WireStep::Release);
                    }
                }
            }
        }

        if down {
            return Err(GestureError::sequence(
                self.steps.len(),
                "finger still down at the end of the action",
            ));
        }

        debug!("sealed {} steps into {} wire steps", self.steps.len(), out.len());
        Ok(SealedChain { steps: out })
    }

    /// Seal and send as a one-stream gesture. Blocks until the server
    /// answers or the request times out.
    ///
    /// The chain is consumed once a dispatch has been attempted, whatever
    /// its outcome. Seal failures leave it reusable.
    pub fn perform(
        &mut self,
        locator: &dyn ElementLocator,
        dispatcher: &GestureDispatcher<'_>,
    ) -> Result<Ack> {
        if self.performed {
            return Err(GestureError::AlreadyPerformed);
        }
        let sealed = self.seal(locator)?;
        let request = GestureRequest { streams: vec![sealed.into_stream(0)] };

        info!("performing touch action ({} steps)", request.step_count());
        self.performed = true;
        dispatcher.send(&request)
    }
}

fn already_down(index: usize, step: &GestureStep) -> GestureError {
    GestureError::sequence(index, format!("{} while a finger is already down", step.name()))
}

/// A validated, fully resolved stream of wire steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedChain {
    steps: Vec<WireStep>,
}

impl SealedChain {
    pub fn steps(&self) -> &[WireStep] {
        &self.steps
    }

    /// Length of this stream's own timeline, counted from its first step.
    pub fn duration_ms(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| match s {
                WireStep::Wait { duration_ms } => *duration_ms,
                WireStep::LongPress { duration_ms, .. } => {
                    duration_ms.unwrap_or(DEFAULT_LONG_PRESS_MS)
                }
                _ => 0,
            })
            .sum()
    }

    pub fn into_stream(self, index: usize) -> StreamPayload {
        StreamPayload { name: format!("finger{index}"), steps: self.steps }
    }
}
