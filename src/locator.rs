// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element lookup, consumed through the `ElementLocator` trait.
//!
//! Location strategies live on the server; this crate only forwards a
//! `Selector` and reads back the element's bounding box.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GestureError, Result};
use crate::geometry::Rect;

/// Opaque server-side element id. Holding one does not keep the element
/// alive on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        ElementHandle(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    Id(String),
    ClassName(String),
    AccessibilityId(String),
    Xpath(String),
}

impl Selector {
    /// WebDriver `using` strategy name.
    pub fn using(&self) -> &'static str {
        match self {
            Selector::Id(_) => "id",
            Selector::ClassName(_) => "class name",
            Selector::AccessibilityId(_) => "accessibility id",
            Selector::Xpath(_) => "xpath",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Selector::Id(v)
            | Selector::ClassName(v)
            | Selector::AccessibilityId(v)
            | Selector::Xpath(v) => v,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.using(), self.value())
    }
}

/// Live UI lookup. Implementations may block on the device.
///
/// `geometry` must report `ElementNotFound` for an element that has left
/// the screen and `StaleElement` for a handle the server no longer knows.
pub trait ElementLocator {
    fn locate(&self, selector: &Selector) -> Result<ElementHandle>;

    fn locate_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>>;

    fn geometry(&self, handle: &ElementHandle) -> Result<Rect>;
}

/// In-memory locator with a fixed set of elements.
///
/// Useful for composing and sealing gestures offline and in tests.
#[derive(Debug, Default)]
pub struct MockLocator {
    matches: HashMap<Selector, Vec<ElementHandle>>,
    bounds: HashMap<ElementHandle, Rect>,
    next_id: usize,
}

impl MockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element reachable through `selector`; returns its handle.
    pub fn insert(&mut self, selector: Selector, bounds: Rect) -> ElementHandle {
        self.next_id += 1;
        let handle = ElementHandle::new(format!("mock-{}", self.next_id));
        self.matches.entry(selector).or_default().push(handle.clone());
        self.bounds.insert(handle.clone(), bounds);
        handle
    }

    /// Take an element off the screen. Existing handles become dangling.
    pub fn remove(&mut self, handle: &ElementHandle) {
        self.bounds.remove(handle);
        for handles in self.matches.values_mut() {
            handles.retain(|h| h != handle);
        }
    }

    pub fn move_to(&mut self, handle: &ElementHandle, bounds: Rect) {
        if let Some(slot) = self.bounds.get_mut(handle) {
            *slot = bounds;
        }
    }
}

impl ElementLocator for MockLocator {
    fn locate(&self, selector: &Selector) -> Result<ElementHandle> {
        self.matches
            .get(selector)
            .and_then(|handles| handles.first())
            .cloned()
            .ok_or_else(|| GestureError::ElementNotFound(selector.to_string()))
    }

    fn locate_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>> {
        Ok(self.matches.get(selector).cloned().unwrap_or_default())
    }

    fn geometry(&self, handle: &ElementHandle) -> Result<Rect> {
        self.bounds
            .get(handle)
            .copied()
            .ok_or_else(|| GestureError::ElementNotFound(handle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_element_is_not_found() {
        let mut loc = MockLocator::new();
        let sel = Selector::Id("io.appium.android.apis:id/start".into());
        let h = loc.insert(sel.clone(), Rect::new(0, 0, 10, 10));
        assert_eq!(loc.locate(&sel).unwrap(), h);

        loc.remove(&h);
        assert!(matches!(loc.geometry(&h), Err(GestureError::ElementNotFound(_))));
        assert!(matches!(loc.locate(&sel), Err(GestureError::ElementNotFound(_))));
        assert!(loc.locate_all(&sel).unwrap().is_empty());
    }

    #[test]
    fn handles_are_not_reused_after_remove() {
        let mut loc = MockLocator::new();
        let a = loc.insert(Selector::Id("a".into()), Rect::new(0, 0, 10, 10));
        let b = loc.insert(Selector::Id("b".into()), Rect::new(100, 100, 10, 10));
        loc.remove(&a);
        let c = loc.insert(Selector::Id("c".into()), Rect::new(500, 500, 10, 10));

        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(loc.geometry(&b).unwrap(), Rect::new(100, 100, 10, 10));
        assert_eq!(loc.locate_all(&Selector::Id("b".into())).unwrap(), vec![b]);
        assert_eq!(loc.locate(&Selector::Id("c".into())).unwrap(), c);
    }

    #[test]
    fn selector_maps_to_webdriver_strategy() {
        let sel = Selector::ClassName("android.widget.ImageView".into());
        assert_eq!(sel.using(), "class name");
        assert_eq!(sel.to_string(), "class name=android.widget.ImageView");
    }
}
