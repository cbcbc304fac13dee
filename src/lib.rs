//! Storyboarder-OTIO - two-way bridge between Storyboarder projects and OpenTimelineIO.
//!
//! This crate converts the board list of a Storyboarder project into an OTIO
//! timeline and back:
//!
//! - **Export**: one video clip per board, one audio clip per named audio entry,
//!   all timed at the project frame rate
//! - **Import**: boards rebuilt from the `Video Track`, with uid, dialogue and
//!   new-shot flags recovered from clip metadata
//! - **Lossy by nature**: imported audio is attached to the first board only
//!
//! # Example
//!
//! ```rust
//! use storyboarder_otio::convert::{export_storyboard, import_timeline};
//!
//! let project = r#"{"fps": 24, "boards": [{"uid": "A1", "duration": 2, "dialogue": "Hi"}]}"#;
//!
//! let otio = export_storyboard(project).unwrap();
//! let storyboard = import_timeline(&otio).unwrap();
//!
//! assert!(storyboard.contains("\"dialogue\": \"Hi\""));
//! ```

pub mod convert;
pub mod error;
pub mod lenient;
pub mod otio;
pub mod storyboard;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use convert::{export_storyboard, import_timeline, otio_to_storyboard, storyboard_to_timeline};
pub use error::{ConvertError, ConvertResult};
pub use otio::Timeline;
pub use storyboard::{AudioEntry, Board, StoryboardDocument};
