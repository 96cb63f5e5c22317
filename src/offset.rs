// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symbolic touch coordinates and their resolution to screen pixels.
//!
//! Offsets are stored unresolved when a step is appended and resolved in
//! step order when the chain is sealed. An element that moved between
//! `locate` and `seal` is therefore touched at its new position, and one
//! that disappeared fails the seal before anything is sent.

use log::debug;

use crate::error::{GestureError, Result};
use crate::geometry::Point;
use crate::locator::{ElementHandle, ElementLocator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offset {
    /// Screen pixels. Bounds are checked by the server.
    Absolute(Point),
    /// Element center, shifted by `dx`/`dy`.
    Relative { element: ElementHandle, dx: i32, dy: i32 },
    /// Last resolved pointer position in the same stream, shifted by `dx`/`dy`.
    FromPointer { dx: i32, dy: i32 },
}

impl Offset {
    pub fn absolute(x: i32, y: i32) -> Self {
        Offset::Absolute(Point::new(x, y))
    }

    pub fn element(element: &ElementHandle) -> Self {
        Self::element_offset(element, 0, 0)
    }

    pub fn element_offset(element: &ElementHandle, dx: i32, dy: i32) -> Self {
        Offset::Relative { element: element.clone(), dx, dy }
    }

    pub fn from_pointer(dx: i32, dy: i32) -> Self {
        Offset::FromPointer { dx, dy }
    }
}

impl From<Point> for Offset {
    fn from(p: Point) -> Self {
        Offset::Absolute(p)
    }
}

/// Resolves offsets for one stream, remembering where the pointer was last.
pub struct CoordinateResolver<'a> {
    locator: &'a dyn ElementLocator,
    pointer: Option<Point>,
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(locator: &'a dyn ElementLocator) -> Self {
        CoordinateResolver { locator, pointer: None }
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Resolve the offset used by step `index`.
    ///
    /// Locator errors propagate unchanged; a touch at a guessed position is
    /// worse than a failed gesture.
    pub fn resolve(&mut self, index: usize, offset: &Offset) -> Result<Point> {
        let point = match offset {
            Offset::Absolute(p) => *p,
            Offset::Relative { element, dx, dy } => {
                let bounds = self.locator.geometry(element)?;
                debug!("{} bounds {:?}", element, bounds);
                bounds
                    .center()
                    .and_then(|c| c.checked_offset(*dx, *dy))
                    .ok_or_else(|| out_of_range(index))?
            }
            Offset::FromPointer { dx, dy } => match self.pointer {
                Some(p) => p.checked_offset(*dx, *dy).ok_or_else(|| out_of_range(index))?,
                None => {
                    return Err(GestureError::sequence(
                        index,
                        "pointer-relative offset with no previous position",
                    ))
                }
            },
        };
        self.pointer = Some(point);
        Ok(point)
    }
}

fn out_of_range(index: usize) -> GestureError {
    GestureError::sequence(index, "touch coordinate out of range")
}
