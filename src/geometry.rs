// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// Screen position in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// `None` when the shifted point leaves the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Point { x: self.x.checked_add(dx)?, y: self.y.checked_add(dy)? })
    }
}

/// Bounding box of an on-screen element, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    /// Top-left corner.
    pub const fn location(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// Visual center, rounded toward the top-left. `None` if it does not
    /// fit in `i32`.
    pub fn center(&self) -> Option<Point> {
        Some(Point {
            x: self.x.checked_add(self.width / 2)?,
            y: self.y.checked_add(self.height / 2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_even_box() {
        assert_eq!(Rect::new(100, 200, 50, 50).center(), Some(Point::new(125, 225)));
    }

    #[test]
    fn center_of_odd_box_rounds_down() {
        assert_eq!(Rect::new(0, 0, 5, 7).center(), Some(Point::new(2, 3)));
    }

    #[test]
    fn overflow_is_none() {
        assert_eq!(Rect::new(i32::MAX - 1, 0, 10, 10).center(), None);
        assert_eq!(Point::new(i32::MAX - 1, 0).checked_offset(10, 0), None);
        assert_eq!(Point::new(0, i32::MIN).checked_offset(0, -1), None);
        assert_eq!(Point::new(5, 5).checked_offset(-5, 5), Some(Point::new(0, 10)));
    }
}
