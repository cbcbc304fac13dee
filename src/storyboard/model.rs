//! Data models for Storyboarder project files.
//!
//! These structs map to the JSON written by Storyboarder. Every scalar field is
//! optional and decoded leniently; defaults are applied by the converters, not
//! here, because export and import use different sentinels.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ConvertResult;
use crate::lenient;

/// Document version written on import.
pub const STORYBOARD_VERSION: &str = "2.0";
/// Frame rate used when a document does not specify one.
pub const DEFAULT_FPS: f64 = 24.0;
/// Board duration, in seconds, used when neither board nor document specify one.
pub const DEFAULT_BOARD_TIMING: f64 = 1.0;

// =============================================================================
// DOCUMENT ROOT
// =============================================================================

/// Root of a Storyboarder project file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardDocument {
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// Boards in playback order
    #[serde(default)]
    pub boards: Vec<Board>,

    /// Fallback board duration in seconds
    #[serde(default, deserialize_with = "lenient::optional")]
    pub default_board_timing: Option<f64>,

    /// Frames per second
    #[serde(default, deserialize_with = "lenient::optional")]
    pub fps: Option<f64>,
}

impl StoryboardDocument {
    /// Creates an empty document with no explicit rate or timing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a project file, which must be a JSON object.
    pub fn from_json(json: &str) -> ConvertResult<Self> {
        let object: Map<String, Value> = serde_json::from_str(json)?;
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// The document skeleton produced by import before any board is added.
    pub fn imported() -> Self {
        Self {
            version: Some(STORYBOARD_VERSION.to_string()),
            boards: Vec::new(),
            default_board_timing: Some(DEFAULT_BOARD_TIMING),
            fps: Some(DEFAULT_FPS),
        }
    }

    /// Builder: Set frames per second.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Builder: Set default board timing.
    pub fn with_default_board_timing(mut self, seconds: f64) -> Self {
        self.default_board_timing = Some(seconds);
        self
    }

    /// Builder: Append a board.
    pub fn with_board(mut self, board: Board) -> Self {
        self.boards.push(board);
        self
    }

    /// Effective frame rate.
    pub fn fps_or_default(&self) -> f64 {
        self.fps.unwrap_or(DEFAULT_FPS)
    }

    /// Effective fallback duration for boards without their own.
    pub fn board_timing_or_default(&self) -> f64 {
        self.default_board_timing.unwrap_or(DEFAULT_BOARD_TIMING)
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// A single storyboard panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub uid: Option<String>,
    /// Image path of the panel
    #[serde(default, deserialize_with = "lenient::optional")]
    pub url: Option<String>,
    /// Duration in seconds
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub dialogue: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub new_shot: Option<bool>,
    /// Audio entries; legacy files store a single object here
    #[serde(default, deserialize_with = "deserialize_audio")]
    pub audio: Vec<AudioEntry>,
}

impl Board {
    /// Creates a new Board with the given uid.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            ..Default::default()
        }
    }

    /// Builder: Set image url.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder: Set duration in seconds.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Builder: Set dialogue.
    pub fn with_dialogue(mut self, dialogue: impl Into<String>) -> Self {
        self.dialogue = Some(dialogue.into());
        self
    }

    /// Builder: Set new shot flag.
    pub fn with_new_shot(mut self, new_shot: bool) -> Self {
        self.new_shot = Some(new_shot);
        self
    }

    /// Builder: Append an audio entry.
    pub fn with_audio(mut self, entry: AudioEntry) -> Self {
        self.audio.push(entry);
        self
    }
}

// =============================================================================
// AUDIO
// =============================================================================

/// Audio attached to a board.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioEntry {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub filename: Option<String>,
    /// Duration in seconds
    #[serde(default, deserialize_with = "lenient::optional")]
    pub duration: Option<f64>,
}

impl AudioEntry {
    /// Creates a new AudioEntry for the given file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            duration: None,
        }
    }

    /// Builder: Set duration in seconds.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Filename if present and non-empty.
    pub fn usable_filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }
}

/// Accepts both `audio: [{..}, ..]` and the legacy `audio: {..}`.
///
/// Entries that are not objects (including `null`) are skipped.
fn deserialize_audio<'de, D>(deserializer: D) -> Result<Vec<AudioEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<AudioEntry> = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(lenient::from_value)
            .collect(),
        single @ Value::Object(_) => lenient::from_value(single).into_iter().collect(),
        _ => Vec::new(),
    };
    Ok(entries)
}
