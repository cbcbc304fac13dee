//! Conversion between Storyboarder documents and OTIO timelines.
//!
//! - `export`: [`StoryboardDocument`] → [`Timeline`](crate::otio::Timeline)
//! - `import`: [`Timeline`](crate::otio::Timeline) → [`StoryboardDocument`]
//!
//! Storyboard-only fields travel through OTIO in a clip metadata block keyed
//! [`METADATA_KEY`].

pub mod export;
pub mod import;

use serde::{Deserialize, Serialize};

use crate::error::ConvertResult;
use crate::lenient;
use crate::storyboard::StoryboardDocument;

pub use export::storyboard_to_timeline;
pub use import::{otio_to_storyboard, timeline_to_storyboard};

/// Metadata key owned by this converter on every clip it writes.
pub const METADATA_KEY: &str = "storyboarder";
pub const TIMELINE_NAME: &str = "Storyboarder Project";
pub const VIDEO_TRACK_NAME: &str = "Video Track";
pub const AUDIO_TRACK_NAME: &str = "Audio Track";

/// Stand-in uid for naming clips and images of boards without one.
pub const UNKNOWN_UID: &str = "unknown";
/// Uid given to imported boards whose clip carries none.
pub const NEW_UID: &str = "new-uid";

// =============================================================================
// METADATA BLOCKS
// =============================================================================

/// Board fields carried on a video clip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoardClipMetadata {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub dialogue: Option<String>,
    #[serde(rename = "newShot", default, deserialize_with = "lenient::optional")]
    pub new_shot: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration_seconds: Option<f64>,
}

/// Audio entry fields carried on an audio clip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioClipMetadata {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub filename: Option<String>,
    /// Seconds
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration: Option<f64>,
}

// =============================================================================
// TEXT ENTRY POINTS
// =============================================================================

/// Converts Storyboarder JSON into `otio_json` text.
pub fn export_storyboard(json: &str) -> ConvertResult<String> {
    let document = StoryboardDocument::from_json(json)?;
    storyboard_to_timeline(&document)?.write_to_string()
}

/// Converts `otio_json` text into Storyboarder JSON indented by two spaces.
pub fn import_timeline(otio: &str) -> ConvertResult<String> {
    let document = otio_to_storyboard(otio)?;
    Ok(serde_json::to_string_pretty(&document)?)
}
