// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the bus: listener handles, outcomes, and delivery reports.

/// Handle returned by [`EventBus::subscribe`](crate::EventBus::subscribe).
///
/// Pass it to [`EventBus::unsubscribe`](crate::EventBus::unsubscribe) to remove the listener.
/// Handles are never reused by the bus that issued them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Listener outcome controlling propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Continue delivering the event to later listeners.
    Continue,
    /// Stop delivery; later listeners do not see this event.
    Stop,
}

/// Summary of a single [`EventBus::publish`](crate::EventBus::publish) call.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Delivery {
    /// Number of listeners that were invoked.
    pub delivered: usize,
    /// True if a listener returned [`Outcome::Stop`].
    pub stopped: bool,
}

impl Delivery {
    /// True if nobody was listening.
    pub fn is_unobserved(&self) -> bool {
        self.delivered == 0
    }
}
