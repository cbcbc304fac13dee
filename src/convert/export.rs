//! Storyboard → OTIO.

use super::{
    AudioClipMetadata, BoardClipMetadata, AUDIO_TRACK_NAME, METADATA_KEY, TIMELINE_NAME,
    UNKNOWN_UID, VIDEO_TRACK_NAME,
};
use crate::error::ConvertResult;
use crate::otio::{track_kind, Clip, MediaReference, RationalTime, TimeRange, Timeline, Track};
use crate::storyboard::{Board, StoryboardDocument};

/// Builds a timeline with one video clip per board and one audio clip per
/// named audio entry, all timed at the document frame rate.
///
/// Missing fields are defaulted; audio entries without a filename are dropped.
pub fn storyboard_to_timeline(document: &StoryboardDocument) -> ConvertResult<Timeline> {
    let fps = document.fps_or_default();
    let default_timing = document.board_timing_or_default();

    let mut video_track = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
    let mut audio_track = Track::new(AUDIO_TRACK_NAME, track_kind::AUDIO);

    for board in &document.boards {
        let duration_seconds = board.duration.unwrap_or(default_timing);
        video_track.append(board_clip(board, duration_seconds, fps)?);

        for entry in &board.audio {
            let Some(filename) = entry.usable_filename() else {
                log::debug!(
                    "Dropping audio entry without filename on board {}",
                    board.uid.as_deref().unwrap_or(UNKNOWN_UID)
                );
                continue;
            };
            let seconds = entry.duration.unwrap_or(duration_seconds);
            audio_track.append(audio_clip(filename, seconds, fps)?);
        }
    }

    log::debug!(
        "Exported {} boards and {} audio clips at {} fps",
        video_track.len(),
        audio_track.len(),
        fps
    );

    let mut timeline = Timeline::new(TIMELINE_NAME);
    timeline.append_track(video_track);
    timeline.append_track(audio_track);
    Ok(timeline)
}

fn board_clip(board: &Board, duration_seconds: f64, fps: f64) -> ConvertResult<Clip> {
    let uid = board.uid.as_deref().unwrap_or(UNKNOWN_UID);
    let url = board
        .url
        .clone()
        .unwrap_or_else(|| format!("board-{uid}.png"));
    let range = TimeRange::from_duration(RationalTime::from_seconds(duration_seconds, fps));

    let mut clip = Clip::new(format!("Board {uid}"), range)
        .with_media_reference(MediaReference::external(url, range));
    clip.set_metadata_block(
        METADATA_KEY,
        &BoardClipMetadata {
            uid: board.uid.clone(),
            dialogue: board.dialogue.clone(),
            new_shot: board.new_shot,
            duration_seconds: Some(duration_seconds),
        },
    )?;
    Ok(clip)
}

fn audio_clip(filename: &str, seconds: f64, fps: f64) -> ConvertResult<Clip> {
    let range = TimeRange::from_duration(RationalTime::from_seconds(seconds, fps));

    let mut clip = Clip::new(format!("Audio {filename}"), range)
        .with_media_reference(MediaReference::external(filename, range));
    clip.set_metadata_block(
        METADATA_KEY,
        &AudioClipMetadata {
            filename: Some(filename.to_string()),
            duration: Some(seconds),
        },
    )?;
    Ok(clip)
}
