use std::fmt;

/// Handle returned by [`EventDispatcher::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Synchronous observer list. Every subscriber is invoked, in subscription order, on
/// the caller's stack; nothing is queued.
pub struct EventDispatcher<S> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn Fn(&S)>)>,
}

impl<S> EventDispatcher<S> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl Fn(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn dispatch(&self, sender: &S) {
        for (_, handler) in &self.subscribers {
            handler(sender);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<S> Default for EventDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for EventDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_fans_out_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::<u32>::new();
        let first = Rc::clone(&seen);
        dispatcher.subscribe(move |value| first.borrow_mut().push(("first", *value)));
        let second = Rc::clone(&seen);
        dispatcher.subscribe(move |value| second.borrow_mut().push(("second", *value)));

        dispatcher.dispatch(&7);

        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribed_handlers_are_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut dispatcher = EventDispatcher::<()>::new();
        let counter = Rc::clone(&count);
        let id = dispatcher.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        dispatcher.dispatch(&());

        assert_eq!(*count.borrow(), 0);
        assert!(dispatcher.is_empty());
    }
}
