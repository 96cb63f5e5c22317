// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Touch gesture composition for remote device automation.
//!
//! - `TouchAction`: one finger's press/move/wait/release chain
//! - `MultiTouchAction`: several chains sent as one gesture
//! - `RemoteSession`: element lookup and dispatch against a server

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod locator;
pub mod multi;
pub mod offset;
pub mod protocol;
pub mod script;
pub mod session;
pub mod step;
pub mod transport;

pub use chain::{SealedChain, TouchAction};
pub use config::SessionConfig;
pub use dispatch::GestureDispatcher;
pub use error::{GestureError, Result};
pub use geometry::{Point, Rect};
pub use locator::{ElementHandle, ElementLocator, MockLocator, Selector};
pub use multi::MultiTouchAction;
pub use offset::{CoordinateResolver, Offset};
pub use protocol::{Ack, GestureRequest, StreamPayload, WireStep};
pub use script::{Gesture, GestureScript};
pub use session::RemoteSession;
pub use step::{GestureStep, DEFAULT_LONG_PRESS_MS, TAP_GAP_MS};
pub use transport::{HttpTransport, RawResponse, RemoteTransport, TransportError};
