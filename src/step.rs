// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use crate::offset::Offset;

/// Hold time the server applies to a long press without an explicit duration.
pub const DEFAULT_LONG_PRESS_MS: u64 = 1000;

/// Pause inserted between the presses of a multi-tap.
pub const TAP_GAP_MS: u64 = 100;

/// One step of a touch chain, as appended. Offsets are still symbolic and
/// `Tap` is not yet expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureStep {
    Press(Offset),
    LongPress { offset: Offset, duration: Option<Duration> },
    MoveTo(Offset),
    Wait(Duration),
    Release,
    Tap { offset: Offset, count: Option<u32> },
}

impl GestureStep {
    pub fn name(&self) -> &'static str {
        match self {
            GestureStep::Press(_) => "press",
            GestureStep::LongPress { .. } => "longPress",
            GestureStep::MoveTo(_) => "moveTo",
            GestureStep::Wait(_) => "wait",
            GestureStep::Release => "release",
            GestureStep::Tap { .. } => "tap",
        }
    }
}

pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
