// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON gesture scripts.
//!
//! ```json
//! {"streams": [[
//!     {"action": "longPress", "at": {"element": {"id": "drag_dot_1"}}, "ms": 2000},
//!     {"action": "moveTo", "at": {"element": {"id": "drag_dot_3"}, "dx": 5}},
//!     {"action": "moveTo", "at": {"dx": 0, "dy": 40}},
//!     {"action": "release"}
//! ]]}
//! ```
//!
//! A target is absolute (`x`/`y`), an element selector with optional
//! `dx`/`dy`, or a bare `dx`/`dy` from the previous pointer position.

use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::chain::TouchAction;
use crate::dispatch::GestureDispatcher;
use crate::error::{GestureError, Result};
use crate::locator::{ElementLocator, Selector};
use crate::multi::MultiTouchAction;
use crate::offset::Offset;
use crate::protocol::{Ack, GestureRequest};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Element {
        element: Selector,
        #[serde(default)]
        dx: i32,
        #[serde(default)]
        dy: i32,
    },
    Point { x: i32, y: i32 },
    FromPointer { dx: i32, dy: i32 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScriptStep {
    Press { at: Target },
    LongPress {
        at: Target,
        #[serde(default)]
        ms: Option<u64>,
    },
    MoveTo { at: Target },
    Wait { ms: u64 },
    Release,
    Tap {
        at: Target,
        #[serde(default)]
        count: Option<u32>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct GestureScript {
    pub streams: Vec<Vec<ScriptStep>>,
}

/// A compiled script, ready to seal or perform.
#[derive(Debug)]
pub enum Gesture {
    Single(TouchAction),
    Multi(MultiTouchAction),
}

impl GestureScript {
    pub fn from_json(text: &str) -> Result<Self> {
        let script: GestureScript = serde_json::from_str(text)?;
        if script.streams.is_empty() {
            return Err(GestureError::Script("script has no streams".into()));
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Locate every selector and build the chains. Element geometry is
    /// read later, when the gesture is sealed.
    pub fn compile(&self, locator: &dyn ElementLocator) -> Result<Gesture> {
        let mut chains = Vec::with_capacity(self.streams.len());
        for steps in &self.streams {
            let mut chain = TouchAction::new();
            for step in steps {
                chain = match step {
                    ScriptStep::Press { at } => chain.press(offset(at, locator)?),
                    ScriptStep::LongPress { at, ms: None } => chain.long_press(offset(at, locator)?),
                    ScriptStep::LongPress { at, ms: Some(ms) } => {
                        chain.long_press_for(offset(at, locator)?, Duration::from_millis(*ms))
                    }
                    ScriptStep::MoveTo { at } => chain.move_to(offset(at, locator)?),
                    ScriptStep::Wait { ms } => chain.wait_action(Duration::from_millis(*ms)),
                    ScriptStep::Release => chain.release(),
                    ScriptStep::Tap { at, count: None } => chain.tap(offset(at, locator)?),
                    ScriptStep::Tap { at, count: Some(n) } => {
                        chain.tap_times(offset(at, locator)?, *n)
                    }
                };
            }
            chains.push(chain);
        }
        debug!("compiled script into {} chain(s)", chains.len());

        if chains.len() == 1 {
            return Ok(Gesture::Single(chains.remove(0)));
        }
        let mut multi = MultiTouchAction::new();
        for chain in chains {
            multi = multi.add(chain)?;
        }
        Ok(Gesture::Multi(multi))
    }
}

fn offset(target: &Target, locator: &dyn ElementLocator) -> Result<Offset> {
    Ok(match target {
        Target::Point { x, y } => Offset::absolute(*x, *y),
        Target::Element { element, dx, dy } => {
            Offset::element_offset(&locator.locate(element)?, *dx, *dy)
        }
        Target::FromPointer { dx, dy } => Offset::from_pointer(*dx, *dy),
    })
}

impl Gesture {
    pub fn seal(&self, locator: &dyn ElementLocator) -> Result<GestureRequest> {
        match self {
            Gesture::Single(chain) => {
                Ok(GestureRequest { streams: vec![chain.seal(locator)?.into_stream(0)] })
            }
            Gesture::Multi(multi) => multi.seal(locator),
        }
    }

    pub fn perform(
        &mut self,
        locator: &dyn ElementLocator,
        dispatcher: &GestureDispatcher<'_>,
    ) -> Result<Ack> {
        match self {
            Gesture::Single(chain) => chain.perform(locator, dispatcher),
            Gesture::Multi(multi) => multi.perform(locator, dispatcher),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::geometry::Rect;
    use crate::locator::MockLocator;

    #[test]
    fn drag_script_compiles_to_single_chain() {
        let mut loc = MockLocator::new();
        loc.insert(Selector::Id("drag_dot_1".into()), Rect::new(0, 0, 20, 20));
        loc.insert(Selector::Id("drag_dot_3".into()), Rect::new(100, 100, 20, 20));

        let script = GestureScript::from_json(
            r#"{"streams": [[
                {"action": "longPress", "at": {"element": {"id": "drag_dot_1"}}, "ms": 2000},
                {"action": "moveTo", "at": {"element": {"id": "drag_dot_3"}, "dx": 5}},
                {"action": "moveTo", "at": {"dx": 0, "dy": 40}},
                {"action": "release"}
            ]]}"#,
        )
        .unwrap();
        let gesture = script.compile(&loc).unwrap();
        assert!(matches!(gesture, Gesture::Single(_)));

        let request = gesture.seal(&loc).unwrap();
        assert_eq!(
            serde_json::to_value(&request.streams[0].steps).unwrap(),
            json!([
                {"type": "longPress", "x": 10, "y": 10, "durationMs": 2000},
                {"type": "moveTo", "x": 115, "y": 110},
                {"type": "moveTo", "x": 115, "y": 150},
                {"type": "release"},
            ])
        );
    }

    #[test]
    fn several_streams_become_multi_touch() {
        let loc = MockLocator::new();
        let script = GestureScript::from_json(
            r#"{"streams": [
                [{"action": "tap", "at": {"x": 1, "y": 1}, "count": 2}],
                [{"action": "wait", "ms": 50}, {"action": "tap", "at": {"x": 9, "y": 9}}]
            ]}"#,
        )
        .unwrap();
        match script.compile(&loc).unwrap() {
            Gesture::Multi(multi) => assert_eq!(multi.len(), 2),
            other => panic!("expected multi-touch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_selector_fails_compile() {
        let loc = MockLocator::new();
        let script = GestureScript::from_json(
            r#"{"streams": [[{"action": "tap", "at": {"element": {"accessibility_id": "nope"}}}]]}"#,
        )
        .unwrap();
        assert!(matches!(script.compile(&loc), Err(GestureError::ElementNotFound(_))));
    }

    #[test]
    fn empty_and_malformed_scripts() {
        assert!(matches!(
            GestureScript::from_json(r#"{"streams": []}"#),
            Err(GestureError::Script(_))
        ));
        assert!(matches!(
            GestureScript::from_json(r#"{"streams": [[{"action": "fling"}]]}"#),
            Err(GestureError::Serialization(_))
        ));
    }
}
