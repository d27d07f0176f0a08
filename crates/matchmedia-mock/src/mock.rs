//! `matchMedia` Mock
//!
//! [`Window`] stands in for the environment and holds a replaceable
//! `match_media` binding. [`MockMatchMedia`] swaps that binding for one
//! backed by a [`MediaState`] and hands tests the operations to drive it.
//!
//! ```
//! use matchmedia_mock::{MediaValues, MockMatchMedia, Window};
//!
//! let window = Window::new();
//! let mock = MockMatchMedia::install(&window);
//!
//! let list = window.match_media("(min-width: 800px)").unwrap();
//! assert!(!list.matches());
//!
//! mock.mock_media(&MediaValues::new().with("width", "1024px"));
//! assert!(list.matches());
//! assert!(mock.was_called_with("(min-width: 800px)"));
//! ```

use crate::config::MockConfig;
use crate::emulation::DeviceDescriptor;
use crate::feature::MediaFeature;
use crate::query_list::MediaQueryList;
use crate::result::{MediaError, MediaResult};
use crate::state::MediaState;
use crate::value::{MediaValue, MediaValues};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Signature of a `matchMedia` binding
pub type MatchMediaFn = Rc<dyn Fn(&str) -> MediaResult<MediaQueryList>>;

// ============================================================================
// Window
// ============================================================================

/// A test environment exposing a `match_media` binding.
///
/// Clones share the binding, so replacing it through one clone is seen by
/// every other.
#[derive(Clone)]
pub struct Window {
    match_media: Rc<RefCell<MatchMediaFn>>,
}

impl Window {
    /// Create a window whose binding behaves like a DOM without `matchMedia`
    #[must_use]
    pub fn new() -> Self {
        Self::with_match_media(Rc::new(|_: &str| -> MediaResult<MediaQueryList> {
            Err(MediaError::Unsupported {
                api: "matchMedia".to_string(),
            })
        }))
    }

    /// Create a window with a given native binding
    #[must_use]
    pub fn with_match_media(binding: MatchMediaFn) -> Self {
        Self {
            match_media: Rc::new(RefCell::new(binding)),
        }
    }

    /// Call the current binding
    pub fn match_media(&self, media: &str) -> MediaResult<MediaQueryList> {
        // The binding may replace itself, so no borrow is held across the call
        let binding = self.match_media_binding();
        binding(media)
    }

    /// The current binding
    #[must_use]
    pub fn match_media_binding(&self) -> MatchMediaFn {
        Rc::clone(&self.match_media.borrow())
    }

    /// Replace the binding, returning the previous one
    pub fn set_match_media(&self, binding: MatchMediaFn) -> MatchMediaFn {
        self.match_media.replace(binding)
    }

    /// Whether `binding` is the one currently installed
    #[must_use]
    pub fn is_bound_to(&self, binding: &MatchMediaFn) -> bool {
        same_binding(&self.match_media.borrow(), binding)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field(
                "match_media",
                &Rc::as_ptr(&self.match_media.borrow()).cast::<()>(),
            )
            .finish()
    }
}

fn same_binding(a: &MatchMediaFn, b: &MatchMediaFn) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

// ============================================================================
// MockMatchMedia
// ============================================================================

/// Installed `matchMedia` mock.
///
/// Every call through the window's binding is recorded and creates a new
/// query registered with [`MockMatchMedia::state`].
pub struct MockMatchMedia {
    window: Window,
    binding: MatchMediaFn,
    original: Option<MatchMediaFn>,
    state: MediaState,
    config: MockConfig,
    calls: Rc<RefCell<Vec<String>>>,
}

impl MockMatchMedia {
    /// Install a mock with the default configuration
    #[must_use]
    pub fn install(window: &Window) -> Self {
        Self::install_with(window, MockConfig::default(), MediaState::new())
    }

    /// Install a mock configured from the process environment
    pub fn install_from_env(window: &Window) -> MediaResult<Self> {
        Ok(Self::install_with(
            window,
            MockConfig::from_env()?,
            MediaState::new(),
        ))
    }

    /// Install a mock driving an existing state
    #[must_use]
    pub fn install_with(window: &Window, config: MockConfig, state: MediaState) -> Self {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let binding: MatchMediaFn = {
            let calls = Rc::clone(&calls);
            let state = state.clone();
            Rc::new(move |media: &str| {
                calls.borrow_mut().push(media.to_string());
                state.observe(media)
            })
        };

        let original = window.set_match_media(Rc::clone(&binding));
        state.set_values(&config.initial_values);
        tracing::debug!(
            auto_cleanup = config.auto_cleanup,
            initial_values = config.initial_values.len(),
            "installed matchMedia mock"
        );

        Self {
            window: window.clone(),
            binding,
            original: Some(original),
            state,
            config,
            calls,
        }
    }

    /// The engine behind the mock
    #[must_use]
    pub fn state(&self) -> &MediaState {
        &self.state
    }

    /// Configuration the mock was installed with
    #[must_use]
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// The binding installed on the window
    #[must_use]
    pub fn binding(&self) -> MatchMediaFn {
        Rc::clone(&self.binding)
    }

    /// Merge feature values and notify affected queries
    pub fn mock_media(&self, values: &MediaValues) {
        self.state.set_values(values);
    }

    /// Set a single feature value
    pub fn mock_media_value(&self, feature: impl Into<MediaFeature>, value: impl Into<MediaValue>) {
        self.state.set_value(feature, value);
    }

    /// Apply every media value a device exposes
    pub fn emulate_device(&self, device: &DeviceDescriptor) {
        tracing::debug!(device = %device.name, "emulating device");
        self.state.set_values(&device.media_values());
    }

    /// Drop every value and query, detaching their listeners.
    ///
    /// The configured initial values are applied again afterwards. The
    /// window keeps the mock binding.
    pub fn clear_media(&self) {
        self.state.reset();
        self.state.set_values(&self.config.initial_values);
    }

    /// Clear all state and put the original binding back.
    ///
    /// Calling it again does nothing. If something else replaced the binding
    /// after the mock was installed, that binding is left in place.
    pub fn restore_media(&mut self) {
        let Some(original) = self.original.take() else {
            return;
        };
        self.state.reset();
        if self.window.is_bound_to(&self.binding) {
            let _ = self.window.set_match_media(original);
            tracing::debug!("restored original matchMedia");
        } else {
            tracing::warn!("matchMedia was replaced after the mock was installed; leaving it");
        }
    }

    /// Whether the mock has not been restored yet
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.original.is_some()
    }

    /// Query strings passed to the binding, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of calls made through the binding
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether the binding was ever called with `media`
    #[must_use]
    pub fn was_called_with(&self, media: &str) -> bool {
        self.calls.borrow().iter().any(|call| call == media)
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Guard that calls [`clear_media`](Self::clear_media) when dropped
    #[must_use]
    pub fn scope(&self) -> MediaQueryScope<'_> {
        MediaQueryScope { mock: self }
    }
}

impl fmt::Debug for MockMatchMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockMatchMedia")
            .field("window", &self.window)
            .field("installed", &self.is_installed())
            .field("state", &self.state)
            .field("config", &self.config)
            .field("calls", &self.calls.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Drop for MockMatchMedia {
    fn drop(&mut self) {
        if self.config.auto_cleanup {
            self.restore_media();
        }
    }
}

/// Clears the mock's state when dropped, e.g. at the end of one test
#[derive(Debug)]
pub struct MediaQueryScope<'a> {
    mock: &'a MockMatchMedia,
}

impl MediaQueryScope<'_> {
    /// The mock this scope clears
    #[must_use]
    pub fn mock(&self) -> &MockMatchMedia {
        self.mock
    }
}

impl Drop for MediaQueryScope<'_> {
    fn drop(&mut self) {
        self.mock.clear_media();
    }
}
