//! Media State Engine
//!
//! Owns the simulated feature values and the registry of observed queries.
//! Updating values re-evaluates only the queries that depend on a changed
//! feature and notifies the ones whose result flipped.
//!
//! A `MediaState` is an explicit instance rather than a process-wide
//! singleton, so tests can each build their own and run in parallel.
//! Clones share the same state. Everything runs synchronously on the
//! calling thread.

use crate::feature::MediaFeature;
use crate::listener::MediaQueryListEvent;
use crate::query::{dependencies, CssMediaMatcher, MediaMatcher, MediaQuery};
use crate::query_list::{MediaQueryList, QueryRecord};
use crate::result::MediaResult;
use crate::value::{MediaValue, MediaValues};
use std::cell::RefCell;
use std::fmt;
use std::panic;
use std::rc::Rc;

/// Shared interior of a [`MediaState`]
pub(crate) struct StateInner {
    values: RefCell<MediaValues>,
    observers: RefCell<Vec<Rc<QueryRecord>>>,
    matcher: Box<dyn MediaMatcher>,
}

impl StateInner {
    /// Match parsed queries against the current values
    pub(crate) fn matches(&self, queries: &[MediaQuery]) -> bool {
        self.matcher.matches(queries, &self.values.borrow())
    }
}

impl fmt::Debug for StateInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateInner")
            .field("values", &self.values.borrow())
            .field("observers", &self.observers.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Registry of observed media queries plus the simulated feature values
#[derive(Debug, Clone)]
pub struct MediaState {
    inner: Rc<StateInner>,
}

impl Default for MediaState {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaState {
    /// Create an empty state using the built-in CSS matcher
    #[must_use]
    pub fn new() -> Self {
        Self::with_matcher(CssMediaMatcher)
    }

    /// Create an empty state using a custom parse/match capability
    #[must_use]
    pub fn with_matcher(matcher: impl MediaMatcher + 'static) -> Self {
        Self {
            inner: Rc::new(StateInner {
                values: RefCell::new(MediaValues::new()),
                observers: RefCell::new(Vec::new()),
                matcher: Box::new(matcher),
            }),
        }
    }

    /// Register a query and return its live list.
    ///
    /// The query's dependency set and initial match are computed here.
    /// Parse errors from the matcher are returned unchanged.
    pub fn observe(&self, media: &str) -> MediaResult<MediaQueryList> {
        let queries = self.inner.matcher.parse(media)?;
        let features = dependencies(&queries);
        let matches = self.inner.matches(&queries);
        tracing::debug!(media, matches, features = ?features, "observing media query");

        let record = Rc::new(QueryRecord::new(media, queries, features, matches));
        self.inner.observers.borrow_mut().push(Rc::clone(&record));
        Ok(MediaQueryList::new(record, Rc::downgrade(&self.inner)))
    }

    /// Merge `values` into the current values and notify affected queries.
    ///
    /// An empty update is ignored entirely. Otherwise every registered query
    /// that depends on one of the given features is re-evaluated, in
    /// registration order; the ones whose result changed get their listeners
    /// called before the next query is looked at. Queries that do not depend
    /// on any given feature are neither re-evaluated nor notified.
    ///
    /// Listeners may call back into the state. The set of queries to visit is
    /// fixed when the pass starts, and each one is evaluated against the
    /// values current at the time it is visited. When a nested update flips
    /// a query that is still dispatching, the older event is not delivered
    /// to the listeners that have not seen it yet.
    ///
    /// # Panics
    ///
    /// If a listener panics, delivery continues and the first panic is
    /// re-raised once the whole pass is done.
    pub fn set_values(&self, values: &MediaValues) {
        if values.is_empty() {
            return;
        }

        let changed = self.inner.values.borrow_mut().merge(values);
        let affected: Vec<Rc<QueryRecord>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .filter(|record| record.depends_on_any(&changed))
            .cloned()
            .collect();
        tracing::debug!(
            changed = ?changed,
            affected = affected.len(),
            "media values updated"
        );

        let mut first_panic = None;
        for record in affected {
            // Reset by a listener earlier in this pass
            if record.is_detached() {
                continue;
            }
            let matches = self.inner.matches(record.queries());
            if matches == record.cached_matches() {
                continue;
            }
            record.set_cached_matches(matches);

            let event = MediaQueryListEvent::change(matches, record.media());
            if let Err(payload) = record.notify_change(&event) {
                let _ = first_panic.get_or_insert(payload);
            }
        }

        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }

    /// Set a single feature value
    pub fn set_value(&self, feature: impl Into<MediaFeature>, value: impl Into<MediaValue>) {
        self.set_values(&MediaValues::new().with(feature, value));
    }

    /// One-shot match against the current values, without registering
    pub fn evaluate(&self, media: &str) -> MediaResult<bool> {
        self.inner
            .matcher
            .evaluate(media, &self.inner.values.borrow())
    }

    /// Copy of the current values
    #[must_use]
    pub fn values(&self) -> MediaValues {
        self.inner.values.borrow().clone()
    }

    /// Current value of one feature
    #[must_use]
    pub fn value(&self, feature: &MediaFeature) -> Option<MediaValue> {
        self.inner.values.borrow().get(feature).cloned()
    }

    /// Number of registered queries
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Clear every value and drop every registered query.
    ///
    /// Dropped queries lose their listeners and `onchange` handler, so a
    /// list kept by a caller can never fire again.
    pub fn reset(&self) {
        let observers = std::mem::take(&mut *self.inner.observers.borrow_mut());
        for record in &observers {
            record.detach();
        }
        self.inner.values.borrow_mut().clear();
        tracing::debug!(dropped = observers.len(), "media state reset");
    }

    /// Whether both handles share the same state
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::Listener;
    use crate::result::MediaError;
    use std::cell::{Cell, RefCell};

    fn counter() -> (Listener, Rc<Cell<usize>>) {
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        (Listener::new(move |_| sink.set(sink.get() + 1)), hits)
    }

    mod observe_tests {
        use super::*;

        #[test]
        fn test_observe_registers() {
            let state = MediaState::new();
            let list = state.observe("(min-width: 800px)").unwrap();
            assert_eq!(list.media(), "(min-width: 800px)");
            assert!(!list.matches());
            assert_eq!(state.observer_count(), 1);
        }

        #[test]
        fn test_observe_computes_initial_match() {
            let state = MediaState::new();
            state.set_values(&MediaValues::new().with("width", "800px").with("height", "600px"));
            let list = state
                .observe("(max-width: 1200px) and (max-height: 800px)")
                .unwrap();
            assert!(list.matches());
        }

        #[test]
        fn test_observe_propagates_parse_error() {
            let state = MediaState::new();
            let err = state.observe("screen and").unwrap_err();
            assert!(matches!(err, MediaError::InvalidQuery { .. }));
            assert_eq!(state.observer_count(), 0);
        }

        #[test]
        fn test_each_call_creates_a_record() {
            let state = MediaState::new();
            let a = state.observe("print").unwrap();
            let b = state.observe("print").unwrap();
            assert!(!a.ptr_eq(&b));
            assert_eq!(state.observer_count(), 2);
        }
    }

    mod set_values_tests {
        use super::*;

        #[test]
        fn test_merge_semantics() {
            let state = MediaState::new();
            state.set_values(&MediaValues::new().with("width", "800px").with("orientation", "landscape"));
            state.set_values(&MediaValues::new().with("width", "1024px"));
            assert_eq!(
                state.values(),
                MediaValues::new()
                    .with("width", "1024px")
                    .with("orientation", "landscape")
            );
        }

        #[test]
        fn test_empty_update_is_noop() {
            let state = MediaState::new();
            let list = state.observe("all").unwrap();
            let (listener, hits) = counter();
            list.add_event_listener("change", &listener);

            state.set_values(&MediaValues::new());
            assert_eq!(hits.get(), 0);
            assert!(state.values().is_empty());
        }

        #[test]
        fn test_unrelated_feature_not_reevaluated() {
            let state = MediaState::new();
            let list = state.observe("(prefers-color-scheme: dark)").unwrap();
            let (listener, hits) = counter();
            list.add_event_listener("change", &listener);

            state.set_value("width", "1000px");
            assert_eq!(hits.get(), 0);
        }

        #[test]
        fn test_notifies_only_on_flip() {
            let state = MediaState::new();
            let list = state.observe("(min-width: 800px)").unwrap();
            let (listener, hits) = counter();
            list.add_event_listener("change", &listener);

            state.set_value("width", "900px");
            state.set_value("width", "1000px");
            assert_eq!(hits.get(), 1);
            state.set_value("width", "700px");
            assert_eq!(hits.get(), 2);
        }

        #[test]
        fn test_records_notified_in_registration_order() {
            let state = MediaState::new();
            let order = Rc::new(RefCell::new(Vec::new()));
            for media in ["(min-width: 100px)", "(min-width: 200px)", "(max-height: 50px)"] {
                let list = state.observe(media).unwrap();
                let sink = Rc::clone(&order);
                list.add_event_listener(
                    "change",
                    &Listener::new(move |event| sink.borrow_mut().push(event.media.clone())),
                );
            }

            state.set_values(&MediaValues::new().with("height", "10px").with("width", "300px"));
            assert_eq!(
                *order.borrow(),
                vec!["(min-width: 100px)", "(min-width: 200px)", "(max-height: 50px)"]
            );
        }

        #[test]
        fn test_unknown_feature_stored() {
            let state = MediaState::new();
            state.set_value("x-foldable", "yes");
            assert_eq!(
                state.value(&MediaFeature::from("x-foldable")),
                Some(MediaValue::from("yes"))
            );
        }

        #[test]
        fn test_reentrant_update_from_listener() {
            let state = MediaState::new();
            let wide = state.observe("(min-width: 800px)").unwrap();
            let dark = state.observe("(prefers-color-scheme: dark)").unwrap();

            let inner_state = state.clone();
            wide.add_event_listener(
                "change",
                &Listener::new(move |event| {
                    if event.matches {
                        inner_state.set_value("prefers-color-scheme", "dark");
                    }
                }),
            );
            let (listener, hits) = counter();
            dark.add_event_listener("change", &listener);

            state.set_value("width", "900px");
            assert!(dark.matches());
            assert_eq!(hits.get(), 1);
        }

        #[test]
        fn test_reentrant_flip_of_same_query_supersedes_event() {
            let state = MediaState::new();
            let wide = state.observe("(min-width: 800px)").unwrap();

            let inner_state = state.clone();
            wide.add_event_listener(
                "change",
                &Listener::new(move |event| {
                    if event.matches {
                        inner_state.set_value("width", "100px");
                    }
                }),
            );
            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&seen);
            wide.add_event_listener(
                "change",
                &Listener::new(move |event| sink.borrow_mut().push(event.matches)),
            );

            state.set_value("width", "900px");

            // The nested `false` was delivered; the outer `true` is stale
            assert_eq!(*seen.borrow(), vec![false]);
            assert!(!wide.matches());
            assert_eq!(seen.borrow().last().copied(), Some(wide.matches()));
        }

        #[test]
        fn test_listener_panic_reraised_after_pass() {
            let state = MediaState::new();
            let first = state.observe("(min-width: 1px)").unwrap();
            let second = state.observe("(max-width: 5000px)").unwrap();
            first.add_event_listener("change", &Listener::new(|_| panic!("listener failure")));
            let (listener, hits) = counter();
            second.add_event_listener("change", &listener);

            let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                state.set_value("width", "10px");
            }));
            assert!(result.is_err());
            assert_eq!(hits.get(), 1);
            assert!(second.matches());
        }
    }

    mod evaluate_tests {
        use super::*;

        #[test]
        fn test_evaluate_does_not_register() {
            let state = MediaState::new();
            state.set_value("type", "print");
            assert!(state.evaluate("print").unwrap());
            assert!(!state.evaluate("screen").unwrap());
            assert_eq!(state.observer_count(), 0);
        }

        #[test]
        fn test_evaluate_propagates_parse_error() {
            assert!(MediaState::new().evaluate("(width:)").is_err());
        }
    }

    mod reset_tests {
        use super::*;

        #[test]
        fn test_reset_clears_everything() {
            let state = MediaState::new();
            let list = state.observe("(orientation: portrait)").unwrap();
            state.set_value("orientation", "portrait");
            assert!(list.matches());

            state.reset();
            assert!(state.values().is_empty());
            assert_eq!(state.observer_count(), 0);
            assert!(!list.matches());
            assert!(list.is_detached());
        }

        #[test]
        fn test_stale_list_never_fires() {
            let state = MediaState::new();
            let list = state.observe("(orientation: portrait)").unwrap();
            let (listener, hits) = counter();
            list.add_event_listener("change", &listener);

            state.reset();
            state.set_value("orientation", "portrait");
            assert_eq!(hits.get(), 0);
        }

        #[test]
        fn test_all_still_matches_after_reset() {
            let state = MediaState::new();
            let all = state.observe("all").unwrap();
            state.set_value("type", "print");
            state.reset();
            assert!(all.matches());
        }

        #[test]
        fn test_negated_feature_query_matches_after_reset() {
            // `not` negates the whole query: an unset feature fails the
            // condition, so its negation matches
            let state = MediaState::new();
            let no_color = state.observe("not (color)").unwrap();
            let color = state.observe("(color)").unwrap();
            state.set_value("color", 8);
            assert!(!no_color.matches());

            state.reset();
            assert!(no_color.matches());
            assert!(!color.matches());
        }
    }

    #[test]
    fn test_custom_matcher() {
        #[derive(Debug)]
        struct Always;
        impl MediaMatcher for Always {
            fn parse(&self, _media: &str) -> MediaResult<Vec<MediaQuery>> {
                Ok(vec![MediaQuery::all()])
            }
            fn matches(&self, _queries: &[MediaQuery], _values: &MediaValues) -> bool {
                true
            }
        }

        let state = MediaState::with_matcher(Always);
        assert!(state.observe("anything at all").unwrap().matches());
    }

    #[test]
    fn test_clones_share_state() {
        let state = MediaState::new();
        let other = state.clone();
        other.set_value("width", "10px");
        assert!(state.ptr_eq(&other));
        assert_eq!(state.values().len(), 1);
    }
}
