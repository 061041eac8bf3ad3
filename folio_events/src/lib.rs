// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folio Events: a deterministic, `no_std` publish/subscribe bus.
//!
//! ## Overview
//!
//! Listeners subscribe to a concrete event type and are invoked synchronously, in
//! subscription order, when an event of that type is published. Publishing runs every
//! listener to completion before returning; nothing is queued.
//!
//! ## Listener-presence guard
//!
//! Producers that would allocate or compute a payload should ask
//! [`EventBus::has_listener`] first. It is a single map lookup; empty listener groups are
//! dropped on unsubscribe so the answer is exact.
//!
//! ## Stopping delivery
//!
//! A listener returns an [`Outcome`]. [`Outcome::Stop`] ends delivery of the current event;
//! the returned [`Delivery`] reports how many listeners ran.
//!
//! # Example
//!
//! ```rust
//! use folio_events::{EventBus, Outcome};
//!
//! struct Repaint;
//!
//! let mut bus = EventBus::new();
//! assert!(!bus.has_listener::<Repaint>());
//!
//! let id = bus.subscribe(|_: &Repaint| Outcome::Continue);
//! assert_eq!(bus.publish(&Repaint).delivered, 1);
//!
//! bus.unsubscribe(id);
//! assert!(!bus.has_listener::<Repaint>());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod bus;
pub mod types;

pub use bus::EventBus;
pub use types::{Delivery, ListenerId, Outcome};
