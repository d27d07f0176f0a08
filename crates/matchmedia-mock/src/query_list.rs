//! Mock `MediaQueryList`
//!
//! What `matchMedia` returns: a live view of one query. Each list is backed
//! by a [`QueryRecord`] held in the [`MediaState`](crate::MediaState)
//! registry, which owns the cached match result, the listeners and the
//! `onchange` slot.
//!
//! ## Example
//!
//! ```rust
//! use matchmedia_mock::{Listener, MediaState, MediaValues};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let state = MediaState::new();
//! let list = state.observe("(prefers-color-scheme: dark)").unwrap();
//!
//! let seen = Rc::new(Cell::new(None));
//! let sink = Rc::clone(&seen);
//! list.add_event_listener("change", &Listener::new(move |event| sink.set(Some(event.matches))));
//!
//! state.set_values(&MediaValues::new().with("prefers-color-scheme", "dark"));
//! assert_eq!(seen.get(), Some(true));
//! assert!(list.matches());
//! ```

use crate::feature::MediaFeature;
use crate::listener::{
    EventType, Listener, ListenerList, ListenerOptions, MediaQueryListEvent, PanicPayload,
};
use crate::query::MediaQuery;
use crate::state::StateInner;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::panic;
use std::rc::{Rc, Weak};

/// One registered query: dependencies, cached result and listeners
#[derive(Debug)]
pub(crate) struct QueryRecord {
    media: String,
    queries: Vec<MediaQuery>,
    features: BTreeSet<MediaFeature>,
    matches: Cell<bool>,
    listeners: RefCell<ListenerList>,
    onchange: RefCell<Option<Listener>>,
    detached: Cell<bool>,
}

impl QueryRecord {
    pub(crate) fn new(
        media: &str,
        queries: Vec<MediaQuery>,
        features: BTreeSet<MediaFeature>,
        matches: bool,
    ) -> Self {
        Self {
            media: media.to_string(),
            queries,
            features,
            matches: Cell::new(matches),
            listeners: RefCell::new(ListenerList::new()),
            onchange: RefCell::new(None),
            detached: Cell::new(false),
        }
    }

    pub(crate) fn media(&self) -> &str {
        &self.media
    }

    pub(crate) fn queries(&self) -> &[MediaQuery] {
        &self.queries
    }

    pub(crate) fn features(&self) -> &BTreeSet<MediaFeature> {
        &self.features
    }

    pub(crate) fn depends_on_any(&self, changed: &[MediaFeature]) -> bool {
        changed.iter().any(|feature| self.features.contains(feature))
    }

    pub(crate) fn cached_matches(&self) -> bool {
        self.matches.get()
    }

    pub(crate) fn set_cached_matches(&self, matches: bool) {
        self.matches.set(matches);
    }

    pub(crate) fn is_detached(&self) -> bool {
        self.detached.get()
    }

    /// Drop every listener and the `onchange` handler; the record will never
    /// dispatch again.
    pub(crate) fn detach(&self) {
        self.detached.set(true);
        self.listeners.borrow_mut().clear();
        let _ = self.onchange.borrow_mut().take();
    }

    /// Deliver an event to `onchange` and then to each listener in
    /// registration order.
    ///
    /// A panicking callback does not stop delivery; the first panic payload
    /// is returned once every callback has run.
    pub(crate) fn dispatch(&self, event: &MediaQueryListEvent) -> Result<(), PanicPayload> {
        self.deliver(event, false)
    }

    /// Deliver a change computed by the engine.
    ///
    /// Stops as soon as a nested update flips the cached result away from
    /// `event.matches`: the nested pass has already delivered the newer
    /// event, and the remaining callbacks must not receive a stale one
    /// after it.
    pub(crate) fn notify_change(&self, event: &MediaQueryListEvent) -> Result<(), PanicPayload> {
        self.deliver(event, true)
    }

    fn deliver(
        &self,
        event: &MediaQueryListEvent,
        stop_when_superseded: bool,
    ) -> Result<(), PanicPayload> {
        let superseded = || stop_when_superseded && self.matches.get() != event.matches;
        let mut first_panic = None;

        let onchange = self.onchange.borrow().clone();
        if let Some(handler) = onchange {
            if let Err(payload) = handler.call_isolated(event) {
                tracing::warn!(media = %self.media, "onchange handler panicked");
                let _ = first_panic.get_or_insert(payload);
            }
        }

        let entries = self.listeners.borrow().snapshot();
        tracing::trace!(
            media = %self.media,
            matches = event.matches,
            listeners = entries.len(),
            "dispatching change event"
        );
        for entry in entries {
            if superseded() {
                tracing::trace!(media = %self.media, "change event superseded by nested update");
                break;
            }
            // Removed by a callback that ran earlier in this dispatch
            if !self.listeners.borrow().contains(&entry.listener) {
                continue;
            }
            // Deregistered before the call so a nested update cannot fire it again
            if entry.once {
                let _ = self.listeners.borrow_mut().remove(&entry.listener);
            }
            if let Err(payload) = entry.listener.call_isolated(event) {
                tracing::warn!(media = %self.media, "change listener panicked");
                let _ = first_panic.get_or_insert(payload);
            }
        }

        first_panic.map_or(Ok(()), Err)
    }
}

/// Live handle to a registered media query.
///
/// Clones share the same listeners and `onchange` handler.
#[derive(Debug, Clone)]
pub struct MediaQueryList {
    record: Rc<QueryRecord>,
    state: Weak<StateInner>,
}

impl MediaQueryList {
    pub(crate) fn new(record: Rc<QueryRecord>, state: Weak<StateInner>) -> Self {
        Self { record, state }
    }

    /// The query string this list was created with
    #[must_use]
    pub fn media(&self) -> &str {
        self.record.media()
    }

    /// Whether the query matches the current media values.
    ///
    /// Evaluated against the owning state on every call, so a list kept
    /// across a reset reflects the cleared values. Falls back to the last
    /// dispatched result once the state has been dropped.
    #[must_use]
    pub fn matches(&self) -> bool {
        match self.state.upgrade() {
            Some(state) => state.matches(self.record.queries()),
            None => self.record.cached_matches(),
        }
    }

    /// Features whose changes can flip `matches`
    #[must_use]
    pub fn features(&self) -> Vec<MediaFeature> {
        self.record.features().iter().cloned().collect()
    }

    /// Register a listener for `event_type`; anything but `"change"` is ignored
    pub fn add_event_listener(&self, event_type: &str, listener: &Listener) {
        self.add_event_listener_with_options(event_type, listener, ListenerOptions::default());
    }

    /// Register a listener with options.
    ///
    /// With `once`, the listener is removed the first time it is invoked.
    /// Registering an already registered listener does nothing.
    pub fn add_event_listener_with_options(
        &self,
        event_type: &str,
        listener: &Listener,
        options: ListenerOptions,
    ) {
        if EventType::from_name(event_type).is_none() {
            return;
        }
        let _ = self.record.listeners.borrow_mut().add(listener, options);
    }

    /// Remove a listener by identity; unknown listeners are ignored
    pub fn remove_event_listener(&self, event_type: &str, listener: &Listener) {
        if EventType::from_name(event_type).is_none() {
            return;
        }
        let _ = self.record.listeners.borrow_mut().remove(listener);
    }

    /// Register a change listener (legacy API)
    #[deprecated(note = "use `add_event_listener(\"change\", ..)`")]
    pub fn add_listener(&self, listener: &Listener) {
        let _ = self
            .record
            .listeners
            .borrow_mut()
            .add(listener, ListenerOptions::default());
    }

    /// Remove a change listener (legacy API)
    #[deprecated(note = "use `remove_event_listener(\"change\", ..)`")]
    pub fn remove_listener(&self, listener: &Listener) {
        let _ = self.record.listeners.borrow_mut().remove(listener);
    }

    /// Set or clear the `onchange` handler.
    ///
    /// The handler is a single slot: it is called before the listeners and
    /// is not subject to de-duplication.
    pub fn set_onchange(&self, handler: Option<Listener>) {
        *self.record.onchange.borrow_mut() = handler;
    }

    /// Current `onchange` handler
    #[must_use]
    pub fn onchange(&self) -> Option<Listener> {
        self.record.onchange.borrow().clone()
    }

    /// Number of registered listeners (not counting `onchange`)
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.record.listeners.borrow().len()
    }

    /// Whether the state this list belonged to has been reset
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.record.is_detached()
    }

    /// Deliver `event` to `onchange` and every listener.
    ///
    /// # Panics
    ///
    /// Re-raises the first panic of a callback after all callbacks ran.
    pub fn dispatch_event(&self, event: &MediaQueryListEvent) -> bool {
        if let Err(payload) = self.record.dispatch(event) {
            panic::resume_unwind(payload);
        }
        true
    }

    /// Whether both handles refer to the same registered query
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.record, &other.record)
    }
}
