//! OpenTimelineIO module.
//!
//! This module provides:
//! - `model`: Timeline, Stack, Track, Clip, MediaReference and the time types
//! - `adapter`: `otio_json` reading and writing for [`Timeline`]

pub mod adapter;
pub mod model;

pub use model::{
    track_kind, Clip, Item, MediaReference, RationalTime, Stack, TimeRange, Timeline, Track,
};
