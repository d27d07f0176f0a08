//! Proptest Strategies for Media State Testing
//!
//! Strategies that generate feature values and updates. Use them against a
//! real [`MediaState`](crate::MediaState) rather than a model of one.
//!
//! ```rust,ignore
//! proptest! {
//!     #[test]
//!     fn prop_empty_update_is_silent(values in media_values()) {
//!         let state = MediaState::new();
//!         state.set_values(&values);
//!         // ... register listeners, then
//!         state.set_values(&MediaValues::new());
//!     }
//! }
//! ```

use crate::feature::MediaFeature;
use crate::value::{MediaValue, MediaValues};
use proptest::prelude::*;

/// Any known feature, or an unknown one with a plausible name
pub fn any_media_feature() -> impl Strategy<Value = MediaFeature> {
    prop_oneof![
        9 => prop::sample::select(MediaFeature::KNOWN.to_vec()),
        1 => "[a-z]{3,8}(-[a-z]{3,8})?".prop_map(|name| MediaFeature::from_name(&name)),
    ]
}

/// A value of the shape a test would pass for `feature`
pub fn media_value_for(feature: &MediaFeature) -> BoxedStrategy<MediaValue> {
    match feature {
        MediaFeature::Width
        | MediaFeature::Height
        | MediaFeature::DeviceWidth
        | MediaFeature::DeviceHeight => (0u32..4000)
            .prop_map(|px| MediaValue::from(format!("{px}px")))
            .boxed(),
        MediaFeature::Type => prop::sample::select(vec!["screen", "print", "speech", "all"])
            .prop_map(MediaValue::from)
            .boxed(),
        MediaFeature::Orientation => prop::sample::select(vec!["portrait", "landscape"])
            .prop_map(MediaValue::from)
            .boxed(),
        MediaFeature::Hover | MediaFeature::AnyHover => {
            prop::sample::select(vec!["hover", "none"])
                .prop_map(MediaValue::from)
                .boxed()
        }
        MediaFeature::Pointer | MediaFeature::AnyPointer => {
            prop::sample::select(vec!["fine", "coarse", "none"])
                .prop_map(MediaValue::from)
                .boxed()
        }
        MediaFeature::Color | MediaFeature::Monochrome | MediaFeature::Grid => {
            (0u32..16).prop_map(MediaValue::from).boxed()
        }
        _ => prop_oneof![
            (0u32..100).prop_map(MediaValue::from),
            "[a-z]{1,10}".prop_map(MediaValue::from),
        ]
        .boxed(),
    }
}

/// A feature paired with a matching value
pub fn feature_entry() -> impl Strategy<Value = (MediaFeature, MediaValue)> {
    any_media_feature().prop_flat_map(|feature| {
        let value = media_value_for(&feature);
        (Just(feature), value)
    })
}

/// A partial update of up to eight features, possibly empty
pub fn media_values() -> impl Strategy<Value = MediaValues> {
    prop::collection::vec(feature_entry(), 0..8).prop_map(|entries| entries.into_iter().collect())
}

/// Viewport widths around common breakpoints
pub fn breakpoint_width() -> impl Strategy<Value = MediaValue> {
    prop_oneof![
        prop::sample::select(vec![319u32, 320, 599, 600, 767, 768, 1023, 1024, 1279, 1280]),
        0u32..3000,
    ]
    .prop_map(|px| MediaValue::from(format!("{px}px")))
}
