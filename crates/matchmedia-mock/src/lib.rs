//! matchmedia-mock: In-Memory `matchMedia` for Tests
//!
//! Simulates the browser's `window.matchMedia` without a browser. Tests set
//! feature values (viewport width, media type, color scheme, pointer
//! capabilities, ...) and every live `MediaQueryList` re-evaluates and
//! notifies its listeners just as a browser would on resize or a preference
//! change.
//!
//! # Architecture
//!
//! ```text
//!   Window::match_media(query)
//!            │  (binding installed by MockMatchMedia)
//!            ▼
//!   ┌─────────────────┐  parse/match  ┌─────────────────┐
//!   │   MediaState    │──────────────►│  MediaMatcher   │
//!   │ values+registry │               │ (cssparser)     │
//!   └────────┬────────┘               └─────────────────┘
//!            │ set_values: re-evaluate dependents
//!            ▼
//!   ┌─────────────────┐
//!   │ MediaQueryList  │──► onchange, then listeners
//!   └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use matchmedia_mock::{Listener, MediaValues, MockMatchMedia, Window};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let window = Window::new();
//! let mock = MockMatchMedia::install(&window);
//!
//! let dark = window.match_media("(prefers-color-scheme: dark)").unwrap();
//! let seen = Rc::new(Cell::new(false));
//! let listener = {
//!     let seen = Rc::clone(&seen);
//!     Listener::new(move |event| seen.set(event.matches))
//! };
//! dark.add_event_listener("change", &listener);
//!
//! mock.mock_media(&MediaValues::new().with("prefers-color-scheme", "dark"));
//! assert!(dark.matches());
//! assert!(seen.get());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod config;
mod feature;
mod lifecycle;
mod listener;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod mock;
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
mod query;
mod query_list;
mod result;
#[allow(clippy::missing_panics_doc)]
mod state;
mod value;

/// Device Emulation
///
/// Preset device profiles expanded into media feature values.
#[allow(clippy::missing_const_for_fn, clippy::must_use_candidate)]
pub mod emulation;

/// Proptest strategies for feature values and updates
#[cfg(any(test, feature = "proptest"))]
#[allow(clippy::missing_panics_doc)]
pub mod strategies;


pub use config::{MockConfig, AUTO_CLEANUP_ENV, VALUES_ENV};
pub use emulation::{ColorScheme, DeviceDescriptor, DeviceEmulator, TouchMode, Viewport};
pub use feature::{FeatureKind, MediaFeature};
pub use lifecycle::TestRunner;
pub use listener::{EventType, Listener, ListenerList, ListenerOptions, MediaQueryListEvent};
pub use mock::{MatchMediaFn, MediaQueryScope, MockMatchMedia, Window};
pub use query::{
    dependencies, parse_media_query_list, CssMediaMatcher, MediaExpression, MediaMatcher,
    MediaQuery, MediaType, Modifier,
};
pub use query_list::MediaQueryList;
pub use result::{MediaError, MediaResult};
pub use state::MediaState;
pub use value::{MediaValue, MediaValues};
