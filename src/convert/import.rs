//! OTIO → storyboard.
//!
//! Audio is not matched to boards by time: every audio clip is attached to
//! the first board. Per-board placement would need overlap analysis between
//! audio and video ranges, which is not done here.
//!
//! Board fields come from the clip's `storyboarder` metadata block. A `null`
//! `uid`, `dialogue` or `newShot` there is read like a missing one and gets
//! the default (`new-uid`, `""`, `true`) rather than being kept as `null`.
//! Durations prefer the block's `duration_seconds` over the clip's range.

use super::{
    AudioClipMetadata, BoardClipMetadata, AUDIO_TRACK_NAME, METADATA_KEY, NEW_UID, UNKNOWN_UID,
    VIDEO_TRACK_NAME,
};
use crate::error::ConvertResult;
use crate::otio::{Clip, Item, MediaReference, Timeline};
use crate::storyboard::{AudioEntry, Board, StoryboardDocument};

/// Parses `otio_json` text and rebuilds the storyboard it describes.
pub fn otio_to_storyboard(text: &str) -> ConvertResult<StoryboardDocument> {
    let timeline = Timeline::read_from_string(text)?;
    timeline_to_storyboard(&timeline)
}

/// Rebuilds a storyboard from the tracks named `Video Track` and `Audio Track`.
///
/// A timeline without a video track yields an empty document.
pub fn timeline_to_storyboard(timeline: &Timeline) -> ConvertResult<StoryboardDocument> {
    let mut document = StoryboardDocument::imported();

    let mut video_track = None;
    let mut audio_clips: Vec<&Clip> = Vec::new();
    for track in timeline.tracks() {
        if track.name == VIDEO_TRACK_NAME {
            video_track = Some(track);
        } else if track.name == AUDIO_TRACK_NAME {
            audio_clips.extend(track.clips());
        }
    }

    let Some(video_track) = video_track else {
        log::debug!("Timeline '{}' has no video track", timeline.name);
        return Ok(document);
    };

    if let Some(Item::Clip(first)) = video_track.children.first() {
        if let Some(range) = first.source_range {
            document.fps = Some(range.duration.rate);
        }
    }

    for clip in video_track.clips() {
        let mut board = board_from_clip(clip)?;
        if document.boards.is_empty() {
            for audio in &audio_clips {
                if let Some(entry) = audio_entry_from_clip(audio)? {
                    board.audio.push(entry);
                }
            }
        }
        document.boards.push(board);
    }

    log::debug!(
        "Imported {} boards and {} audio clips at {} fps",
        document.boards.len(),
        audio_clips.len(),
        document.fps_or_default()
    );
    Ok(document)
}

fn board_from_clip(clip: &Clip) -> ConvertResult<Board> {
    let metadata: BoardClipMetadata = clip.metadata_block(METADATA_KEY).unwrap_or_default();
    // Exported clips carry the exact seconds; frames / rate can drift.
    let duration = match metadata.duration_seconds {
        Some(seconds) => seconds,
        None => clip.duration()?.to_seconds(),
    };

    let url = match clip.media_reference().and_then(MediaReference::target_url) {
        Some(url) => url.to_string(),
        None => format!(
            "board-{}.png",
            metadata.uid.as_deref().unwrap_or(UNKNOWN_UID)
        ),
    };

    Ok(Board {
        uid: Some(metadata.uid.unwrap_or_else(|| NEW_UID.to_string())),
        url: Some(url),
        duration: Some(duration),
        dialogue: Some(metadata.dialogue.unwrap_or_default()),
        new_shot: Some(metadata.new_shot.unwrap_or(true)),
        audio: Vec::new(),
    })
}

fn audio_entry_from_clip(clip: &Clip) -> ConvertResult<Option<AudioEntry>> {
    let metadata: AudioClipMetadata = clip.metadata_block(METADATA_KEY).unwrap_or_default();

    let filename = clip
        .media_reference()
        .and_then(MediaReference::target_url)
        .map(str::to_string)
        .or(metadata.filename);
    let Some(filename) = filename else {
        log::warn!("Skipping audio clip '{}' without a filename", clip.name);
        return Ok(None);
    };

    let duration = match metadata.duration {
        Some(seconds) => seconds,
        None => clip.duration()?.to_seconds(),
    };

    Ok(Some(AudioEntry {
        filename: Some(filename),
        duration: Some(duration),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::otio::{track_kind, RationalTime, TimeRange, Track};
    use serde_json::json;

    fn range(frames: f64, rate: f64) -> TimeRange {
        TimeRange::from_duration(RationalTime::new(frames, rate))
    }

    fn timeline_with(video: Track, audio: Option<Track>) -> Timeline {
        let mut timeline = Timeline::new("t");
        timeline.append_track(video);
        if let Some(audio) = audio {
            timeline.append_track(audio);
        }
        timeline
    }

    #[test]
    fn test_no_video_track() {
        let mut timeline = Timeline::new("t");
        timeline.append_track(Track::new("V1", track_kind::VIDEO));

        let document = timeline_to_storyboard(&timeline).unwrap();
        assert_eq!(document, StoryboardDocument::imported());
    }

    #[test]
    fn test_clip_without_metadata_gets_defaults() {
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(
            Clip::new("plain", range(60.0, 24.0))
                .with_media_reference(MediaReference::external("shot.png", range(60.0, 24.0))),
        );

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        assert_eq!(
            document.boards,
            vec![Board {
                uid: Some("new-uid".into()),
                url: Some("shot.png".into()),
                duration: Some(2.5),
                dialogue: Some(String::new()),
                new_shot: Some(true),
                audio: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_url_fallback_without_media_reference() {
        let mut with_uid = Clip::new("a", range(24.0, 24.0));
        with_uid.metadata.insert(METADATA_KEY.into(), json!({"uid": "ZZ"}));
        let without_uid = Clip::new("b", range(24.0, 24.0));

        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(with_uid);
        video.append(without_uid);

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        assert_eq!(document.boards[0].url.as_deref(), Some("board-ZZ.png"));
        assert_eq!(document.boards[1].url.as_deref(), Some("board-unknown.png"));
        assert_eq!(document.boards[1].uid.as_deref(), Some("new-uid"));
    }

    #[test]
    fn test_fps_from_first_clip_only() {
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(Clip::new("a", range(25.0, 25.0)));
        video.append(Clip::new("b", range(30.0, 30.0)));

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        assert_eq!(document.fps, Some(25.0));
        let durations: Vec<Option<f64>> = document.boards.iter().map(|b| b.duration).collect();
        assert_eq!(durations, vec![Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_fps_default_when_first_item_is_not_clip() {
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(Item::Other(json!({"OTIO_SCHEMA": "Gap.1"})));
        video.append(Clip::new("a", range(12.0, 12.0)));

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        assert_eq!(document.fps, Some(24.0));
        assert_eq!(document.boards.len(), 1);
    }

    #[test]
    fn test_fps_default_when_first_clip_has_no_source_range() {
        let mut first = Clip::new("a", range(48.0, 48.0))
            .with_media_reference(MediaReference::external("a.png", range(48.0, 48.0)));
        first.source_range = None;
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(first);

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        assert_eq!(document.fps, Some(24.0));
        assert_eq!(document.boards[0].duration, Some(1.0));
    }

    #[test]
    fn test_clip_without_any_range_fails() {
        let mut clip = Clip::new("broken", range(1.0, 24.0));
        clip.source_range = None;
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(clip);

        assert!(matches!(
            timeline_to_storyboard(&timeline_with(video, None)),
            Err(ConvertError::MissingTimeRange(_))
        ));
    }

    #[test]
    fn test_all_audio_goes_to_first_board() {
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(Clip::new("a", range(24.0, 24.0)));
        video.append(Clip::new("b", range(24.0, 24.0)));

        let mut described = Clip::new("Audio vo.wav", range(48.0, 24.0))
            .with_media_reference(MediaReference::external("vo.wav", range(48.0, 24.0)));
        described
            .set_metadata_block(
                METADATA_KEY,
                &AudioClipMetadata {
                    filename: Some("vo.wav".into()),
                    duration: Some(1.75),
                },
            )
            .unwrap();
        let bare = Clip::new("music", range(72.0, 24.0))
            .with_media_reference(MediaReference::external("music.mp3", range(72.0, 24.0)));

        let mut audio = Track::new(AUDIO_TRACK_NAME, track_kind::AUDIO);
        audio.append(described);
        audio.append(Item::Other(json!({"OTIO_SCHEMA": "Gap.1"})));
        audio.append(bare);

        let document = timeline_to_storyboard(&timeline_with(video, Some(audio))).unwrap();
        assert_eq!(
            document.boards[0].audio,
            vec![
                AudioEntry::new("vo.wav").with_duration(1.75),
                AudioEntry::new("music.mp3").with_duration(3.0),
            ]
        );
        assert!(document.boards[1].audio.is_empty());
    }

    #[test]
    fn test_audio_filename_falls_back_to_metadata() {
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(Clip::new("a", range(24.0, 24.0)));

        let mut named = Clip::new("n", range(24.0, 24.0));
        named.metadata.insert(METADATA_KEY.into(), json!({"filename": "meta.wav"}));
        let anonymous = Clip::new("x", range(24.0, 24.0));

        let mut audio = Track::new(AUDIO_TRACK_NAME, track_kind::AUDIO);
        audio.append(named);
        audio.append(anonymous);

        let document = timeline_to_storyboard(&timeline_with(video, Some(audio))).unwrap();
        assert_eq!(
            document.boards[0].audio,
            vec![AudioEntry::new("meta.wav").with_duration(1.0)]
        );
    }

    #[test]
    fn test_last_video_track_wins_and_audio_tracks_merge() {
        let mut first_video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        first_video.append(Clip::new("old", range(24.0, 24.0)));
        let mut second_video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        second_video.append(Clip::new("new", range(48.0, 24.0)));

        let mut audio_a = Track::new(AUDIO_TRACK_NAME, track_kind::AUDIO);
        audio_a.append(
            Clip::new("a", range(24.0, 24.0))
                .with_media_reference(MediaReference::external("a.wav", range(24.0, 24.0))),
        );
        let mut audio_b = Track::new(AUDIO_TRACK_NAME, track_kind::AUDIO);
        audio_b.append(
            Clip::new("b", range(24.0, 24.0))
                .with_media_reference(MediaReference::external("b.wav", range(24.0, 24.0))),
        );

        let mut timeline = Timeline::new("t");
        timeline.append_track(audio_a);
        timeline.append_track(first_video);
        timeline.append_track(second_video);
        timeline.append_track(audio_b);

        let document = timeline_to_storyboard(&timeline).unwrap();
        assert_eq!(document.boards.len(), 1);
        assert_eq!(document.boards[0].duration, Some(2.0));
        let files: Vec<Option<&str>> = document.boards[0]
            .audio
            .iter()
            .map(|a| a.filename.as_deref())
            .collect();
        assert_eq!(files, vec![Some("a.wav"), Some("b.wav")]);
    }

    #[test]
    fn test_duration_seconds_metadata_wins_over_range() {
        let mut exact = Clip::new("a", range(16.799999999999997, 24.0));
        exact
            .set_metadata_block(
                METADATA_KEY,
                &BoardClipMetadata {
                    duration_seconds: Some(0.7),
                    ..Default::default()
                },
            )
            .unwrap();
        let mut zero_rate = Clip::new("b", range(0.0, 0.0));
        zero_rate
            .metadata
            .insert(METADATA_KEY.into(), json!({"duration_seconds": 2.0}));
        let mut unreadable = Clip::new("c", range(36.0, 24.0));
        unreadable
            .metadata
            .insert(METADATA_KEY.into(), json!({"duration_seconds": "long"}));

        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(exact);
        video.append(zero_rate);
        video.append(unreadable);

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        let durations: Vec<Option<f64>> = document.boards.iter().map(|b| b.duration).collect();
        assert_eq!(durations, vec![Some(0.7), Some(2.0), Some(1.5)]);
    }

    #[test]
    fn test_null_board_fields_get_defaults() {
        let mut clip = Clip::new("a", range(24.0, 24.0));
        clip.metadata.insert(
            METADATA_KEY.into(),
            json!({"uid": null, "dialogue": null, "newShot": null, "duration_seconds": 1.0}),
        );
        let mut video = Track::new(VIDEO_TRACK_NAME, track_kind::VIDEO);
        video.append(clip);

        let document = timeline_to_storyboard(&timeline_with(video, None)).unwrap();
        let board = &document.boards[0];
        assert_eq!(board.uid.as_deref(), Some("new-uid"));
        assert_eq!(board.dialogue.as_deref(), Some(""));
        assert_eq!(board.new_shot, Some(true));
    }

    #[test]
    fn test_otio_to_storyboard_reads_text() {
        let text = json!({
            "OTIO_SCHEMA": "Timeline.1",
            "name": "from another tool",
            "tracks": {
                "OTIO_SCHEMA": "Stack.1",
                "children": [{
                    "OTIO_SCHEMA": "Track.1",
                    "name": "Video Track",
                    "kind": "Video",
                    "children": [{
                        "OTIO_SCHEMA": "Clip.1",
                        "name": "shot",
                        "metadata": {"storyboarder": {"uid": "U1", "dialogue": 5, "newShot": false}},
                        "source_range": {
                            "OTIO_SCHEMA": "TimeRange.1",
                            "start_time": {"OTIO_SCHEMA": "RationalTime.1", "rate": 30, "value": 0},
                            "duration": {"OTIO_SCHEMA": "RationalTime.1", "rate": 30, "value": 45}
                        },
                        "media_reference": {
                            "OTIO_SCHEMA": "ExternalReference.1",
                            "target_url": "file:///boards/u1.png"
                        }
                    }]
                }]
            }
        })
        .to_string();

        let document = otio_to_storyboard(&text).unwrap();
        assert_eq!(document.fps, Some(30.0));
        let board = &document.boards[0];
        assert_eq!(board.uid.as_deref(), Some("U1"));
        assert_eq!(board.url.as_deref(), Some("file:///boards/u1.png"));
        assert_eq!(board.duration, Some(1.5));
        // Non-string dialogue is treated as missing.
        assert_eq!(board.dialogue.as_deref(), Some(""));
        assert_eq!(board.new_shot, Some(false));
    }
}
