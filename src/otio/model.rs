//! OpenTimelineIO object model.
//!
//! Only the schemas a storyboard round trip needs are modelled as structs.
//! Anything else found inside a track or stack is carried as raw JSON in
//! [`Item::Other`].

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ConvertError, ConvertResult};
use crate::lenient;

pub const TIMELINE_SCHEMA: &str = "Timeline.1";
pub const STACK_SCHEMA: &str = "Stack.1";
pub const TRACK_SCHEMA: &str = "Track.1";
pub const CLIP_SCHEMA: &str = "Clip.2";
pub const EXTERNAL_REFERENCE_SCHEMA: &str = "ExternalReference.1";
pub const TIME_RANGE_SCHEMA: &str = "TimeRange.1";
pub const RATIONAL_TIME_SCHEMA: &str = "RationalTime.1";

/// Key under which a Clip.2 stores its single media reference.
pub const DEFAULT_MEDIA_KEY: &str = "DEFAULT_MEDIA";

/// Track kinds as spelled by OTIO.
pub mod track_kind {
    pub const VIDEO: &str = "Video";
    pub const AUDIO: &str = "Audio";
}

/// Returns the schema name without its version, e.g. `Clip` for `Clip.2`.
pub fn schema_family(schema: &str) -> &str {
    schema.split('.').next().unwrap_or_default()
}

/// Reads the `OTIO_SCHEMA` tag of a raw object, empty if absent.
pub fn schema_of(value: &Value) -> &str {
    value
        .get("OTIO_SCHEMA")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn enabled_default() -> bool {
    true
}

// =============================================================================
// TIME
// =============================================================================

/// A point or length in time, counted in frames at `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RationalTime {
    pub value: f64,
    pub rate: f64,
}

impl RationalTime {
    pub fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// Converts a length in seconds to frames at `rate`.
    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds * rate, rate)
    }

    pub fn to_seconds(&self) -> f64 {
        if self.rate == 0.0 {
            0.0
        } else {
            self.value / self.rate
        }
    }
}

impl Serialize for RationalTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RationalTime", 3)?;
        state.serialize_field("OTIO_SCHEMA", RATIONAL_TIME_SCHEMA)?;
        state.serialize_field("rate", &self.rate)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

/// A span starting at `start_time` and lasting `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TimeRange {
    pub start_time: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    /// A range starting at zero on the duration's own rate.
    pub fn from_duration(duration: RationalTime) -> Self {
        Self::new(RationalTime::new(0.0, duration.rate), duration)
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TimeRange", 3)?;
        state.serialize_field("OTIO_SCHEMA", TIME_RANGE_SCHEMA)?;
        state.serialize_field("duration", &self.duration)?;
        state.serialize_field("start_time", &self.start_time)?;
        state.end()
    }
}

// =============================================================================
// MEDIA REFERENCE
// =============================================================================

/// Pointer to an external asset.
///
/// Any media reference schema deserializes into this struct; only external
/// references carry a `target_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaReference {
    #[serde(rename = "OTIO_SCHEMA", default)]
    pub otio_schema: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(default)]
    pub available_range: Option<TimeRange>,
    #[serde(default)]
    pub available_image_bounds: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_url: Option<String>,
}

impl MediaReference {
    /// Creates an ExternalReference pointing at `target_url`.
    pub fn external(target_url: impl Into<String>, available_range: TimeRange) -> Self {
        Self {
            otio_schema: EXTERNAL_REFERENCE_SCHEMA.to_string(),
            metadata: Map::new(),
            name: Some(String::new()),
            available_range: Some(available_range),
            available_image_bounds: None,
            target_url: Some(target_url.into()),
        }
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }
}

// =============================================================================
// CLIP
// =============================================================================

/// A segment of media placed in a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(rename = "OTIO_SCHEMA", default)]
    pub otio_schema: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default)]
    pub source_range: Option<TimeRange>,
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default)]
    pub markers: Vec<Value>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub media_references: BTreeMap<String, MediaReference>,
    #[serde(default)]
    pub active_media_reference_key: Option<String>,
    /// Single reference used by the older Clip.1 schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_reference: Option<MediaReference>,
}

impl Clip {
    pub fn new(name: impl Into<String>, source_range: TimeRange) -> Self {
        Self {
            otio_schema: CLIP_SCHEMA.to_string(),
            metadata: Map::new(),
            name: name.into(),
            source_range: Some(source_range),
            effects: Vec::new(),
            markers: Vec::new(),
            enabled: true,
            media_references: BTreeMap::new(),
            active_media_reference_key: None,
            media_reference: None,
        }
    }

    /// Builder: Set the active media reference.
    pub fn with_media_reference(mut self, reference: MediaReference) -> Self {
        self.media_references
            .insert(DEFAULT_MEDIA_KEY.to_string(), reference);
        self.active_media_reference_key = Some(DEFAULT_MEDIA_KEY.to_string());
        self
    }

    /// The active media reference, falling back to the Clip.1 field.
    pub fn media_reference(&self) -> Option<&MediaReference> {
        self.active_media_reference_key
            .as_deref()
            .and_then(|key| self.media_references.get(key))
            .or(self.media_reference.as_ref())
    }

    /// Stores `block` under `key` in the clip metadata.
    pub fn set_metadata_block<T: Serialize>(&mut self, key: &str, block: &T) -> ConvertResult<()> {
        let value = serde_json::to_value(block)?;
        self.metadata.insert(key.to_string(), value);
        Ok(())
    }

    /// Reads the metadata block under `key`; `None` when absent or of another shape.
    pub fn metadata_block<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.metadata.get(key).cloned().and_then(lenient::from_value)
    }

    /// Length of the clip: its source range, else what the media makes available.
    pub fn duration(&self) -> ConvertResult<RationalTime> {
        self.source_range
            .or_else(|| self.media_reference().and_then(|r| r.available_range))
            .map(|range| range.duration)
            .ok_or_else(|| ConvertError::missing_time_range(&self.name))
    }
}

// =============================================================================
// TRACK & STACK
// =============================================================================

/// Anything that can sit inside a track or stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Clip(Clip),
    Track(Track),
    /// Gaps, transitions, nested stacks and unknown schemas, kept verbatim
    Other(Value),
}

impl From<Clip> for Item {
    fn from(clip: Clip) -> Self {
        Item::Clip(clip)
    }
}

impl From<Track> for Item {
    fn from(track: Track) -> Self {
        Item::Track(track)
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Item::Clip(clip) => clip.serialize(serializer),
            Item::Track(track) => track.serialize(serializer),
            Item::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let family = schema_family(schema_of(&value)).to_string();
        match family.as_str() {
            "Clip" => serde_json::from_value(value)
                .map(Item::Clip)
                .map_err(de::Error::custom),
            "Track" => serde_json::from_value(value)
                .map(Item::Track)
                .map_err(de::Error::custom),
            _ => Ok(Item::Other(value)),
        }
    }
}

/// An ordered sequence of items of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "OTIO_SCHEMA", default)]
    pub otio_schema: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default)]
    pub source_range: Option<TimeRange>,
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default)]
    pub markers: Vec<Value>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub children: Vec<Item>,
    #[serde(default)]
    pub kind: String,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: &str) -> Self {
        Self {
            otio_schema: TRACK_SCHEMA.to_string(),
            metadata: Map::new(),
            name: name.into(),
            source_range: None,
            effects: Vec::new(),
            markers: Vec::new(),
            enabled: true,
            children: Vec::new(),
            kind: kind.to_string(),
        }
    }

    pub fn append(&mut self, item: impl Into<Item>) {
        self.children.push(item.into());
    }

    /// Clips in order, skipping every other kind of item.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.children.iter().filter_map(|item| match item {
            Item::Clip(clip) => Some(clip),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Tracks layered on top of each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    #[serde(rename = "OTIO_SCHEMA", default)]
    pub otio_schema: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default)]
    pub source_range: Option<TimeRange>,
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default)]
    pub markers: Vec<Value>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub children: Vec<Item>,
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            otio_schema: STACK_SCHEMA.to_string(),
            metadata: Map::new(),
            name: "tracks".to_string(),
            source_range: None,
            effects: Vec::new(),
            markers: Vec::new(),
            enabled: true,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// TIMELINE
// =============================================================================

/// Top-level OTIO document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(rename = "OTIO_SCHEMA", default)]
    pub otio_schema: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(default)]
    pub global_start_time: Option<RationalTime>,
    #[serde(default)]
    pub tracks: Stack,
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            otio_schema: TIMELINE_SCHEMA.to_string(),
            metadata: Map::new(),
            name: name.into(),
            global_start_time: None,
            tracks: Stack::default(),
        }
    }

    pub fn append_track(&mut self, track: Track) {
        self.tracks.children.push(Item::Track(track));
    }

    /// Top-level tracks in stacking order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.children.iter().filter_map(|item| match item {
            Item::Track(track) => Some(track),
            _ => None,
        })
    }
}
