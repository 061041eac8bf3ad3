// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bus implementation.
//!
//! ## Overview
//!
//! Listeners are grouped per event type. Within a group they run in subscription order.
//! A group is dropped as soon as its last listener unsubscribes, so
//! [`EventBus::has_listener`] is a map lookup and never walks listeners.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::types::{Delivery, ListenerId, Outcome};

type Callback = Box<dyn FnMut(&dyn Any) -> Outcome>;

struct Listener {
    id: ListenerId,
    callback: Callback,
}

/// Typed, synchronous publish/subscribe registry.
///
/// ## Usage
///
/// - [`EventBus::subscribe`] a closure for an event type `E`.
/// - Before building an expensive payload, check [`EventBus::has_listener`].
/// - [`EventBus::publish`] runs every listener for `E` before returning.
#[derive(Default)]
pub struct EventBus {
    listeners: BTreeMap<TypeId, Vec<Listener>>,
    next_id: u64,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let listeners: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("event_types", &self.listeners.len())
            .field("listeners", &listeners)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` for events of type `E`.
    pub fn subscribe<E, F>(&mut self, mut f: F) -> ListenerId
    where
        E: Any,
        F: FnMut(&E) -> Outcome + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let callback: Callback = Box::new(move |event: &dyn Any| match event.downcast_ref::<E>() {
            Some(event) => f(event),
            None => Outcome::Continue,
        });
        self.listeners
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Listener { id, callback });
        id
    }

    /// Remove a listener. Returns false if `id` is not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let mut emptied = None;
        let mut found = false;
        for (kind, group) in &mut self.listeners {
            if let Some(pos) = group.iter().position(|l| l.id == id) {
                group.remove(pos);
                found = true;
                if group.is_empty() {
                    emptied = Some(*kind);
                }
                break;
            }
        }
        if let Some(kind) = emptied {
            self.listeners.remove(&kind);
        }
        found
    }

    /// True if at least one listener is registered for `E`.
    pub fn has_listener<E: Any>(&self) -> bool {
        self.listeners.contains_key(&TypeId::of::<E>())
    }

    /// Number of listeners registered for `E`.
    pub fn listener_count<E: Any>(&self) -> usize {
        self.listeners.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Deliver `event` to every listener for `E`, in subscription order.
    pub fn publish<E: Any>(&mut self, event: &E) -> Delivery {
        let mut delivery = Delivery::default();
        let Some(group) = self.listeners.get_mut(&TypeId::of::<E>()) else {
            return delivery;
        };
        let event: &dyn Any = event;
        for listener in group.iter_mut() {
            delivery.delivered += 1;
            if (listener.callback)(event) == Outcome::Stop {
                delivery.stopped = true;
                break;
            }
        }
        delivery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[derive(Debug, PartialEq)]
    struct Ping(u32);

    #[derive(Debug, PartialEq)]
    struct Pong;

    #[test]
    fn no_listener_is_cheap_noop() {
        let mut bus = EventBus::new();
        assert!(!bus.has_listener::<Ping>());
        let d = bus.publish(&Ping(1));
        assert!(d.is_unobserved());
        assert!(!d.stopped);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in [1_u32, 2, 3] {
            let log = Rc::clone(&log);
            bus.subscribe(move |p: &Ping| {
                log.borrow_mut().push((tag, p.0));
                Outcome::Continue
            });
        }
        let d = bus.publish(&Ping(7));
        assert_eq!(d.delivered, 3);
        assert_eq!(*log.borrow(), vec![(1, 7), (2, 7), (3, 7)]);
    }

    #[test]
    fn events_are_routed_by_type() {
        let mut bus = EventBus::new();
        let pings = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&pings);
        bus.subscribe(move |_: &Ping| {
            *counter.borrow_mut() += 1;
            Outcome::Continue
        });
        assert!(bus.has_listener::<Ping>());
        assert!(!bus.has_listener::<Pong>());
        assert!(bus.publish(&Pong).is_unobserved());
        assert_eq!(*pings.borrow(), 0);
        bus.publish(&Ping(0));
        assert_eq!(*pings.borrow(), 1);
    }

    #[test]
    fn stop_ends_delivery() {
        let mut bus = EventBus::new();
        let late = Rc::new(RefCell::new(false));
        bus.subscribe(|_: &Ping| Outcome::Stop);
        let flag = Rc::clone(&late);
        bus.subscribe(move |_: &Ping| {
            *flag.borrow_mut() = true;
            Outcome::Continue
        });
        let d = bus.publish(&Ping(0));
        assert_eq!(d, Delivery { delivered: 1, stopped: true });
        assert!(!*late.borrow(), "listener after Stop must not run");
    }

    #[test]
    fn unsubscribe_removes_group_when_empty() {
        let mut bus = EventBus::new();
        let a = bus.subscribe(|_: &Ping| Outcome::Continue);
        let b = bus.subscribe(|_: &Ping| Outcome::Continue);
        assert_eq!(bus.listener_count::<Ping>(), 2);
        assert!(bus.unsubscribe(a));
        assert!(bus.has_listener::<Ping>());
        assert!(bus.unsubscribe(b));
        assert!(!bus.has_listener::<Ping>());
        assert!(!bus.unsubscribe(b), "second unsubscribe is a no-op");
    }
}
