//! Publishing configuration change notifications.
//!
//! The configuration facade only needs a way to hand a [`ConfigEvent`] to
//! whoever is interested; it never consumes notifications itself.  That
//! capability is the [`EventSink`] trait.  Two implementations ship here:
//!
//! - [`EventBus`] – an in-process bus that calls every subscriber in
//!   subscription order.  This is what the mod wires up at runtime.
//! - `std::sync::mpsc::Sender<ConfigEvent>` – forwards notifications into a
//!   channel, handy for tests and for consumers on another thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use highres_core::ConfigEvent;
use tracing::debug;

/// Something that accepts change notifications.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink {
    fn publish(&self, event: ConfigEvent);
}

impl EventSink for Sender<ConfigEvent> {
    fn publish(&self, event: ConfigEvent) {
        if self.send(event).is_err() {
            debug!("dropping {event:?}: receiver is gone");
        }
    }
}

impl<T: EventSink + ?Sized> EventSink for Rc<T> {
    fn publish(&self, event: ConfigEvent) {
        (**self).publish(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn publish(&self, event: ConfigEvent) {
        (**self).publish(event);
    }
}

type Subscriber = Box<dyn Fn(&ConfigEvent)>;

/// Single-threaded publish/subscribe bus for [`ConfigEvent`]s.
///
/// Subscribers must not subscribe to the same bus from inside a callback.
#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `subscriber` to be called for every later notification.
    pub fn subscribe(&self, subscriber: impl Fn(&ConfigEvent) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: ConfigEvent) {
        debug!("publishing {event:?}");
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use highres_core::{ScreenshotFormat, WidthChanged};
    use std::cell::Cell;
    use std::sync::mpsc;

    #[test]
    fn test_bus_delivers_to_every_subscriber_in_order() {
        // Arrange
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for id in 0..3 {
            let log = Rc::clone(&log);
            bus.subscribe(move |e| log.borrow_mut().push((id, *e)));
        }
        let event: ConfigEvent = WidthChanged { old: 1280, new: 1920 }.into();

        // Act
        bus.publish(event);

        // Assert
        assert_eq!(*log.borrow(), vec![(0, event), (1, event), (2, event)]);
    }

    #[test]
    fn test_bus_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.publish(WidthChanged { old: 1, new: 2 }.into());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_rc_bus_publishes_through_shared_handle() {
        let bus = Rc::new(EventBus::new());
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        bus.subscribe(move |_| counter.set(counter.get() + 1));

        let sink: Rc<EventBus> = Rc::clone(&bus);
        sink.publish(
            highres_core::FormatChanged {
                old: ScreenshotFormat::Png,
                new: ScreenshotFormat::Jpeg,
            }
            .into(),
        );

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_sender_sink_forwards_into_channel() {
        let (tx, rx) = mpsc::channel();
        tx.publish(WidthChanged { old: 1280, new: 640 }.into());
        assert_eq!(rx.try_recv(), Ok(WidthChanged { old: 1280, new: 640 }.into()));
    }

    #[test]
    fn test_sender_sink_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::channel::<ConfigEvent>();
        drop(rx);
        // Must not panic.
        tx.publish(WidthChanged { old: 1, new: 2 }.into());
    }
}
