//! Device Emulation
//!
//! Describe a device once and turn it into the media feature values a page
//! would observe on it.

use crate::feature::MediaFeature;
use crate::query::MediaType;
use crate::value::MediaValues;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Landscape version of this viewport
    #[must_use]
    pub const fn landscape(self) -> Self {
        if self.width > self.height {
            self
        } else {
            Self {
                width: self.height,
                height: self.width,
            }
        }
    }

    /// Portrait version of this viewport
    #[must_use]
    pub const fn portrait(self) -> Self {
        if self.height >= self.width {
            self
        } else {
            Self {
                width: self.height,
                height: self.width,
            }
        }
    }

    /// CSS `orientation`: portrait when height is at least width
    #[must_use]
    pub const fn orientation(&self) -> &'static str {
        if self.height >= self.width {
            "portrait"
        } else {
            "landscape"
        }
    }

    /// CSS `aspect-ratio` as `width/height`
    #[must_use]
    pub fn aspect_ratio(&self) -> String {
        format!("{}/{}", self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Primary input mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TouchMode {
    /// Mouse or trackpad
    #[default]
    None,
    /// Single touch
    Single,
    /// Multi-touch
    Multi,
}

impl TouchMode {
    /// Check if touch is enabled
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// CSS `pointer` value for this input
    #[must_use]
    pub const fn pointer(&self) -> &'static str {
        if self.is_enabled() {
            "coarse"
        } else {
            "fine"
        }
    }
}

/// User color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// `prefers-color-scheme: light`
    #[default]
    Light,
    /// `prefers-color-scheme: dark`
    Dark,
}

impl ColorScheme {
    /// CSS keyword
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Device descriptor with every emulated media characteristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device name (e.g., "iPhone 14")
    pub name: String,
    /// Media type
    pub media_type: MediaType,
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Device pixel ratio (e.g., 2.0 for Retina)
    pub device_scale_factor: f64,
    /// Touch support
    pub touch: TouchMode,
    /// Whether the primary input can hover
    pub has_hover: bool,
    /// Preferred color scheme, if the device reports one
    pub color_scheme: Option<ColorScheme>,
    /// Whether the user asked for reduced motion
    pub reduced_motion: bool,
}

impl DeviceDescriptor {
    /// Create a new desktop-like screen device
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: MediaType::Screen,
            viewport: Viewport::default(),
            device_scale_factor: 1.0,
            touch: TouchMode::None,
            has_hover: true,
            color_scheme: None,
            reduced_motion: false,
        }
    }

    /// Set viewport
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport_size(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Set media type
    #[must_use]
    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Set device scale factor
    #[must_use]
    pub const fn with_device_scale_factor(mut self, factor: f64) -> Self {
        self.device_scale_factor = factor;
        self
    }

    /// Set touch mode
    #[must_use]
    pub const fn with_touch(mut self, touch: TouchMode) -> Self {
        self.touch = touch;
        self
    }

    /// Set hover support
    #[must_use]
    pub const fn with_hover(mut self, has_hover: bool) -> Self {
        self.has_hover = has_hover;
        self
    }

    /// Set preferred color scheme
    #[must_use]
    pub const fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = Some(scheme);
        self
    }

    /// Set reduced motion preference
    #[must_use]
    pub const fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Media feature values this device exposes
    #[must_use]
    pub fn media_values(&self) -> MediaValues {
        let hover = if self.has_hover { "hover" } else { "none" };
        let motion = if self.reduced_motion {
            "reduce"
        } else {
            "no-preference"
        };
        let mut values = MediaValues::new()
            .with(MediaFeature::Type, self.media_type.name())
            .with(MediaFeature::Width, format!("{}px", self.viewport.width))
            .with(MediaFeature::Height, format!("{}px", self.viewport.height))
            .with(MediaFeature::AspectRatio, self.viewport.aspect_ratio())
            .with(MediaFeature::Orientation, self.viewport.orientation())
            .with(
                MediaFeature::Resolution,
                format!("{}dppx", self.device_scale_factor),
            )
            .with(MediaFeature::Hover, hover)
            .with(MediaFeature::AnyHover, hover)
            .with(MediaFeature::Pointer, self.touch.pointer())
            .with(MediaFeature::AnyPointer, self.touch.pointer())
            .with(MediaFeature::PrefersReducedMotion, motion);
        if let Some(scheme) = self.color_scheme {
            let _ = values.insert(MediaFeature::PrefersColorScheme, scheme.as_str());
        }
        values
    }
}

/// Device emulator with preset device profiles
#[derive(Debug, Default)]
pub struct DeviceEmulator {
    presets: BTreeMap<String, DeviceDescriptor>,
}

impl DeviceEmulator {
    /// Create a new device emulator with built-in presets
    #[must_use]
    pub fn new() -> Self {
        let mut emulator = Self::default();

        emulator.register_preset(Self::iphone_14());
        emulator.register_preset(Self::pixel_7());
        emulator.register_preset(Self::ipad_mini());
        emulator.register_preset(Self::desktop_1080p());
        emulator.register_preset(Self::desktop_4k());

        emulator
    }

    /// Register a custom device preset
    pub fn register_preset(&mut self, device: DeviceDescriptor) {
        let _ = self.presets.insert(device.name.clone(), device);
    }

    /// Get a device preset by name
    #[must_use]
    pub fn get_preset(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.presets.get(name)
    }

    /// All preset names, sorted
    #[must_use]
    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    // ========================================================================
    // Phone Presets
    // ========================================================================

    /// iPhone 14 device preset
    #[must_use]
    pub fn iphone_14() -> DeviceDescriptor {
        DeviceDescriptor::new("iPhone 14")
            .with_viewport_size(390, 844)
            .with_device_scale_factor(3.0)
            .with_touch(TouchMode::Multi)
            .with_hover(false)
    }

    /// Google Pixel 7 device preset
    #[must_use]
    pub fn pixel_7() -> DeviceDescriptor {
        DeviceDescriptor::new("Pixel 7")
            .with_viewport_size(412, 915)
            .with_device_scale_factor(2.625)
            .with_touch(TouchMode::Multi)
            .with_hover(false)
    }

    // ========================================================================
    // Tablet Presets
    // ========================================================================

    /// iPad Mini device preset
    #[must_use]
    pub fn ipad_mini() -> DeviceDescriptor {
        DeviceDescriptor::new("iPad Mini")
            .with_viewport_size(768, 1024)
            .with_device_scale_factor(2.0)
            .with_touch(TouchMode::Multi)
            .with_hover(false)
    }

    // ========================================================================
    // Desktop Presets
    // ========================================================================

    /// 1080p Desktop preset
    #[must_use]
    pub fn desktop_1080p() -> DeviceDescriptor {
        DeviceDescriptor::new("Desktop 1080p").with_viewport_size(1920, 1080)
    }

    /// 4K Desktop preset
    #[must_use]
    pub fn desktop_4k() -> DeviceDescriptor {
        DeviceDescriptor::new("Desktop 4K")
            .with_viewport_size(3840, 2160)
            .with_device_scale_factor(1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MediaValue;

    mod viewport_tests {
        use super::*;

        #[test]
        fn test_default() {
            let viewport = Viewport::default();
            assert_eq!(viewport.width, 1920);
            assert_eq!(viewport.height, 1080);
        }

        #[test]
        fn test_landscape_and_portrait() {
            let portrait = Viewport::new(600, 800);
            assert_eq!(portrait.landscape(), Viewport::new(800, 600));
            assert_eq!(portrait.portrait(), portrait);
            assert_eq!(Viewport::new(800, 600).portrait(), Viewport::new(600, 800));
        }

        #[test]
        fn test_orientation() {
            assert_eq!(Viewport::new(800, 600).orientation(), "landscape");
            assert_eq!(Viewport::new(600, 800).orientation(), "portrait");
            // Square viewports are portrait in CSS
            assert_eq!(Viewport::new(500, 500).orientation(), "portrait");
        }

        #[test]
        fn test_aspect_ratio() {
            assert_eq!(Viewport::new(1920, 1080).aspect_ratio(), "1920/1080");
        }
    }

    mod touch_mode_tests {
        use super::*;

        #[test]
        fn test_pointer() {
            assert_eq!(TouchMode::None.pointer(), "fine");
            assert_eq!(TouchMode::Single.pointer(), "coarse");
            assert!(TouchMode::Multi.is_enabled());
        }
    }

    mod device_descriptor_tests {
        use super::*;

        #[test]
        fn test_new_defaults() {
            let device = DeviceDescriptor::new("Test");
            assert_eq!(device.media_type, MediaType::Screen);
            assert!(device.has_hover);
            assert_eq!(device.color_scheme, None);
        }

        #[test]
        fn test_media_values_for_phone() {
            let values = DeviceEmulator::iphone_14()
                .with_color_scheme(ColorScheme::Dark)
                .media_values();
            let get = |feature: MediaFeature| values.get(&feature).cloned();

            assert_eq!(get(MediaFeature::Type), Some(MediaValue::from("screen")));
            assert_eq!(get(MediaFeature::Width), Some(MediaValue::from("390px")));
            assert_eq!(get(MediaFeature::Height), Some(MediaValue::from("844px")));
            assert_eq!(
                get(MediaFeature::Orientation),
                Some(MediaValue::from("portrait"))
            );
            assert_eq!(get(MediaFeature::Resolution), Some(MediaValue::from("3dppx")));
            assert_eq!(get(MediaFeature::Hover), Some(MediaValue::from("none")));
            assert_eq!(get(MediaFeature::Pointer), Some(MediaValue::from("coarse")));
            assert_eq!(
                get(MediaFeature::PrefersColorScheme),
                Some(MediaValue::from("dark"))
            );
        }

        #[test]
        fn test_media_values_without_scheme() {
            let values = DeviceEmulator::desktop_1080p().media_values();
            assert!(!values.contains(&MediaFeature::PrefersColorScheme));
            assert_eq!(
                values.get(&MediaFeature::PrefersReducedMotion),
                Some(&MediaValue::from("no-preference"))
            );
        }
    }

    mod device_emulator_tests {
        use super::*;

        #[test]
        fn test_presets() {
            let emulator = DeviceEmulator::new();
            assert_eq!(emulator.preset_names().len(), 5);
            assert_eq!(
                emulator.get_preset("Pixel 7").map(|d| d.viewport),
                Some(Viewport::new(412, 915))
            );
            assert!(emulator.get_preset("Nokia 3310").is_none());
        }

        #[test]
        fn test_register_custom_preset() {
            let mut emulator = DeviceEmulator::new();
            emulator.register_preset(
                DeviceDescriptor::new("Printer").with_media_type(MediaType::Print),
            );
            assert_eq!(
                emulator.get_preset("Printer").map(|d| d.media_type.clone()),
                Some(MediaType::Print)
            );
        }
    }
}
