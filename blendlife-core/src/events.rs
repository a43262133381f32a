//! Typed in-process notifications.
//!
//! An [`EventBus`] is created once per feature and handed to every
//! component that wants to publish or observe its events. Observers
//! hold a [`Subscription`] that unregisters them when dropped.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::entities::RecipeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEvent {
    Created { recipe_id: RecipeId },
}

/// The bus of the recipe feature.
pub type CommentEvents = EventBus<CommentEvent>;

type Callback<E> = Rc<dyn Fn(&E)>;

struct Subscribers<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

pub struct EventBus<E> {
    subscribers: Rc<RefCell<Subscribers<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            subscribers: Rc::default(),
        }
    }
}

impl<E> EventBus<E> {
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E: 'static> EventBus<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` until the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = {
            let mut subscribers = self.subscribers.borrow_mut();
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.push((id, Rc::new(callback)));
            id
        };
        let subscribers: Weak<RefCell<Subscribers<E>>> = Rc::downgrade(&self.subscribers);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(subscribers) = subscribers.upgrade() {
                    subscribers
                        .borrow_mut()
                        .entries
                        .retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Notifies all current subscribers and returns their number.
    ///
    /// Callbacks may subscribe or unsubscribe while being notified,
    /// such changes take effect with the next event.
    pub fn publish(&self, event: &E) -> usize {
        let callbacks: Vec<_> = self
            .subscribers
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in &callbacks {
            callback(event);
        }
        callbacks.len()
    }

}

/// Keeps a callback registered on an [`EventBus`].
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn created(id: &str) -> CommentEvent {
        CommentEvent::Created {
            recipe_id: id.into(),
        }
    }

    #[test]
    fn notify_all_subscribers() {
        let bus = CommentEvents::new();
        let received = Rc::new(RefCell::new(vec![]));
        let first = {
            let received = Rc::clone(&received);
            bus.subscribe(move |ev: &CommentEvent| received.borrow_mut().push(("first", ev.clone())))
        };
        let second = {
            let received = Rc::clone(&received);
            bus.subscribe(move |ev: &CommentEvent| received.borrow_mut().push(("second", ev.clone())))
        };
        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(bus.publish(&created("42")), 2);
        assert_eq!(
            *received.borrow(),
            vec![("first", created("42")), ("second", created("42"))]
        );
        drop(first);
        drop(second);
    }

    #[test]
    fn unsubscribe_on_drop() {
        let bus = CommentEvents::new();
        let count = Rc::new(Cell::new(0));
        let subscription = {
            let count = Rc::clone(&count);
            bus.subscribe(move |_: &CommentEvent| count.set(count.get() + 1))
        };
        bus.publish(&created("1"));
        drop(subscription);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&created("1")), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn explicit_unsubscribe_only_removes_own_callback() {
        let bus = CommentEvents::new();
        let a = bus.subscribe(|_: &CommentEvent| {});
        let b = bus.subscribe(|_: &CommentEvent| {});
        a.unsubscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(b);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn debug_shows_number_of_subscribers() {
        struct Opaque;
        let bus = EventBus::<Opaque>::new();
        let _subscription = bus.subscribe(|_: &Opaque| {});
        assert_eq!(format!("{bus:?}"), "EventBus { subscribers: 1 }");
    }

    #[test]
    fn outlive_the_bus() {
        let bus = CommentEvents::new();
        let subscription = bus.subscribe(|_: &CommentEvent| {});
        drop(bus);
        drop(subscription);
    }

    #[test]
    fn subscribe_while_publishing() {
        let bus = CommentEvents::new();
        let late = Rc::new(RefCell::new(None));
        let _subscription = {
            let bus = bus.clone();
            let late = Rc::clone(&late);
            bus.clone().subscribe(move |_: &CommentEvent| {
                if late.borrow().is_none() {
                    *late.borrow_mut() = Some(bus.subscribe(|_: &CommentEvent| {}));
                }
            })
        };
        assert_eq!(bus.publish(&created("1")), 1);
        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(bus.publish(&created("1")), 2);
    }
}
