//! Change listeners and the event delivered to them.
//!
//! Both registration styles of `MediaQueryList` (the `addEventListener`
//! family and the deprecated `addListener` family) store into the same
//! [`ListenerList`], so one callback is only ever registered once no matter
//! which style added it.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Payload of a caught listener panic
pub(crate) type PanicPayload = Box<dyn Any + Send + 'static>;

/// Event types a `MediaQueryList` dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// `matches` flipped
    #[default]
    Change,
}

impl EventType {
    /// DOM name of the event type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Change => "change",
        }
    }

    /// Parse a DOM event type name; only `"change"` is known
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        (name == "change").then_some(Self::Change)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event passed to change listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQueryListEvent {
    /// Always [`EventType::Change`]
    pub event_type: EventType,
    /// New match result
    pub matches: bool,
    /// Query string of the list that changed
    pub media: String,
}

impl MediaQueryListEvent {
    /// Create a change event
    #[must_use]
    pub fn change(matches: bool, media: impl Into<String>) -> Self {
        Self {
            event_type: EventType::Change,
            matches,
            media: media.into(),
        }
    }
}

/// A change callback.
///
/// Clones share the callback; two listeners are equal when they wrap the
/// same allocation, which is what registration de-duplicates on.
#[derive(Clone)]
pub struct Listener {
    callback: Rc<dyn Fn(&MediaQueryListEvent)>,
}

impl Listener {
    /// Wrap a callback
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&MediaQueryListEvent) + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the callback
    pub fn call(&self, event: &MediaQueryListEvent) {
        (self.callback)(event);
    }

    /// Invoke the callback, catching a panic instead of unwinding further
    pub(crate) fn call_isolated(&self, event: &MediaQueryListEvent) -> Result<(), PanicPayload> {
        panic::catch_unwind(AssertUnwindSafe(|| self.call(event)))
    }

    /// Whether both handles wrap the same callback
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.callback).cast::<()>() == Rc::as_ptr(&other.callback).cast::<()>()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("ptr", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Options accepted by `add_event_listener_with_options`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListenerOptions {
    /// Remove the listener after its first invocation
    pub once: bool,
}

impl ListenerOptions {
    /// Options for a one-shot listener
    #[must_use]
    pub const fn once() -> Self {
        Self { once: true }
    }
}

/// A registered listener
#[derive(Debug, Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) listener: Listener,
    pub(crate) once: bool,
}

/// Ordered list of listeners with identity-based de-duplication
#[derive(Debug, Clone, Default)]
pub struct ListenerList {
    entries: Vec<ListenerEntry>,
}

impl ListenerList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener unless it is already registered.
    ///
    /// Returns whether the listener was added.
    pub fn add(&mut self, listener: &Listener, options: ListenerOptions) -> bool {
        if self.contains(listener) {
            return false;
        }
        self.entries.push(ListenerEntry {
            listener: listener.clone(),
            once: options.once,
        });
        true
    }

    /// Remove a listener; unknown listeners are ignored.
    ///
    /// Returns whether a listener was removed.
    pub fn remove(&mut self, listener: &Listener) -> bool {
        match self
            .entries
            .iter()
            .position(|entry| entry.listener.same_as(listener))
        {
            Some(index) => {
                let _ = self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether a listener is registered
    #[must_use]
    pub fn contains(&self, listener: &Listener) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.listener.same_as(listener))
    }

    /// Number of registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no listener is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copy of the entries in registration order
    pub(crate) fn snapshot(&self) -> Vec<ListenerEntry> {
        self.entries.clone()
    }
}
