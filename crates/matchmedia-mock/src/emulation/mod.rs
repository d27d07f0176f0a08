//! Device Emulation
//!
//! Preset device profiles that expand into the media feature values a page
//! would see on that device.

mod device;

pub use device::{ColorScheme, DeviceDescriptor, DeviceEmulator, TouchMode, Viewport};
