//! Push-based single-value channels.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Identifies one subscription on one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Options for [`Observable::map`] and [`Observable::filter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MapOptions {
    /// Eagerly seed the derived channel's last value from the upstream
    /// last value, so a downstream merge never observes an empty slot
    /// before the first real event.
    pub inherit_last_value: bool,
}

impl MapOptions {
    pub fn inherit() -> Self {
        Self {
            inherit_last_value: true,
        }
    }
}

type Handler<T> = Rc<RefCell<dyn FnMut(&T, Option<&T>)>>;

struct Entry<T> {
    id: SubscriptionId,
    handler: Handler<T>,
}

struct Inner<T> {
    name: Cell<&'static str>,
    persist_last: bool,
    last: RefCell<Option<T>>,
    subscribers: RefCell<Vec<Entry<T>>>,
    next_id: Cell<u64>,
}

/// A named push channel with last-value memory.
///
/// Handles are cheap to clone and refer to the same channel. Subscribers
/// run synchronously in subscription order; a subscriber receives the
/// broadcast value and the channel's *previous* last value (the last value
/// is updated only after all subscribers ran).
///
/// There is no error channel: a panicking subscriber unwinds through the
/// caller of [`Observable::broadcast`].
pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// A channel that remembers the most recent broadcast value.
    pub fn new(name: &'static str) -> Self {
        Self::with_persistence(name, true)
    }

    /// A channel that notifies subscribers but never stores a last value.
    ///
    /// Use this for transient events (e.g. clicks) whose stale value must
    /// not leak into merge snapshots.
    pub fn new_transient(name: &'static str) -> Self {
        Self::with_persistence(name, false)
    }

    fn with_persistence(name: &'static str, persist_last: bool) -> Self {
        Self {
            inner: Rc::new(Inner {
                name: Cell::new(name),
                persist_last,
                last: RefCell::new(None),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name.get()
    }

    /// Rename the channel (tracing label only).
    pub fn named(self, name: &'static str) -> Self {
        self.inner.name.set(name);
        self
    }

    /// Register a subscriber. Handlers receive `(value, previous_last)`.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&T, Option<&T>) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.subscribers.borrow_mut().push(Entry {
            id,
            handler: Rc::new(RefCell::new(handler)),
        });
        id
    }

    /// Remove a subscription. Returns `false` when the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|e| e.id != id);
        subs.len() != before
    }

    /// Notify all subscribers synchronously, then update the last value.
    pub fn broadcast(&self, value: T) {
        tracing::trace!(channel = self.inner.name.get(), "broadcast");
        let prev = self.inner.last.borrow().clone();
        // Snapshot handler refs so subscribers may subscribe/unsubscribe
        // or broadcast to sibling channels while we iterate.
        let handlers: Vec<Handler<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|e| Rc::clone(&e.handler))
            .collect();
        for handler in handlers {
            (handler.borrow_mut())(&value, prev.as_ref());
        }
        if self.inner.persist_last {
            *self.inner.last.borrow_mut() = Some(value);
        }
    }

    /// Snapshot of the most recent persisted broadcast, if any.
    pub fn last_value(&self) -> Option<T> {
        self.inner.last.borrow().clone()
    }

    /// Seed the channel by broadcasting `value` immediately.
    pub fn with_initial_event(self, value: T) -> Self {
        self.broadcast(value);
        self
    }

    /// Re-broadcast the last known value, forcing downstream recomputation.
    /// No-op when the channel never emitted.
    pub fn repeat_last(&self) {
        if let Some(value) = self.last_value() {
            self.broadcast(value);
        } else {
            tracing::trace!(channel = self.inner.name.get(), "repeat_last on empty channel");
        }
    }

    /// Derived channel broadcasting `f(value, prev_last)` per upstream emission.
    pub fn map<U, F>(&self, mut f: F, opts: MapOptions) -> Observable<U>
    where
        U: Clone + 'static,
        F: FnMut(&T, Option<&T>) -> U + 'static,
    {
        let child = Observable::new(self.inner.name.get());
        if opts.inherit_last_value {
            if let Some(last) = self.last_value() {
                *child.inner.last.borrow_mut() = Some(f(&last, None));
            }
        }
        let out = child.clone();
        self.subscribe(move |value, prev| out.broadcast(f(value, prev)));
        child
    }

    /// Derived channel forwarding only values where `pred(value, prev_last)` holds.
    pub fn filter<F>(&self, mut pred: F, opts: MapOptions) -> Observable<T>
    where
        F: FnMut(&T, Option<&T>) -> bool + 'static,
    {
        let child = Observable::new(self.inner.name.get());
        if opts.inherit_last_value {
            *child.inner.last.borrow_mut() = self.last_value();
        }
        let out = child.clone();
        self.subscribe(move |value, prev| {
            if pred(value, prev) {
                out.broadcast(value.clone());
            }
        });
        child
    }
}
