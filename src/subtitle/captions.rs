//! Convert the caption JSON served for a talk into a subtitle track.

use super::{millis_to_duration, SubtitleEntry, SubtitleTrack};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

/// Raw caption as served, timed relative to the start of the talk content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Caption {
    #[serde(rename = "startTime")]
    pub start_ms: f64,
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    #[serde(rename = "content")]
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct CaptionPayload {
    #[serde(default)]
    captions: Option<Vec<Caption>>,
    #[serde(default)]
    status: Option<RemoteStatus>,
}

#[derive(Debug, Deserialize)]
struct RemoteStatus {
    #[serde(default)]
    message: String,
}

/// Why a conversion produced no subtitles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleDiagnostic {
    /// The payload had no captions for the language.
    NotAvailable,
    /// The server answered with a status object instead of captions.
    RemoteStatus(String),
    /// The payload could not be decoded.
    Malformed(String),
}

impl fmt::Display for SubtitleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtitleDiagnostic::NotAvailable => write!(f, "subtitle not available"),
            SubtitleDiagnostic::RemoteStatus(message) => {
                write!(f, "server returned an error: {}", message)
            }
            SubtitleDiagnostic::Malformed(reason) => {
                write!(f, "malformed subtitle data: {}", reason)
            }
        }
    }
}

/// A converted track, with a diagnostic whenever the track is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionConversion {
    pub track: SubtitleTrack,
    pub diagnostic: Option<SubtitleDiagnostic>,
}

impl CaptionConversion {
    fn empty(diagnostic: SubtitleDiagnostic) -> Self {
        Self {
            track: SubtitleTrack::default(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Parse a caption payload and shift every caption by `intro_offset_ms`.
///
/// Never fails: undecodable or empty payloads give an empty track and a
/// diagnostic, so playback can continue without subtitles.
pub fn convert_captions(payload: &str, intro_offset_ms: f64) -> CaptionConversion {
    let payload: CaptionPayload = match serde_json::from_str(payload) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Caption payload failed to parse: {}", e);
            return CaptionConversion::empty(SubtitleDiagnostic::Malformed(e.to_string()));
        }
    };

    // a `captions` key wins over `status`, even when the list is empty
    match (payload.captions, payload.status) {
        (Some(captions), _) if !captions.is_empty() => CaptionConversion {
            track: captions_to_track(&captions, intro_offset_ms),
            diagnostic: None,
        },
        (Some(_), _) => CaptionConversion::empty(SubtitleDiagnostic::NotAvailable),
        (None, Some(status)) => {
            CaptionConversion::empty(SubtitleDiagnostic::RemoteStatus(status.message))
        }
        (None, None) => CaptionConversion::empty(SubtitleDiagnostic::NotAvailable),
    }
}

/// Number captions from 1 and place them on the playback timeline.
pub fn captions_to_track(captions: &[Caption], intro_offset_ms: f64) -> SubtitleTrack {
    let entries = captions
        .iter()
        .enumerate()
        .map(|(i, caption)| {
            let index = i + 1;
            let mut start_ms = intro_offset_ms + caption.start_ms;
            if start_ms < 0.0 {
                warn!(
                    "Caption {} starts before the stream ({}ms), clamping to 0",
                    index, start_ms
                );
                start_ms = 0.0;
            }
            if caption.duration_ms < 0.0 {
                warn!(
                    "Caption {} has negative duration ({}ms), clamping to 0",
                    index, caption.duration_ms
                );
            }
            let end_ms = start_ms + caption.duration_ms.max(0.0);

            SubtitleEntry {
                index,
                start: millis_to_duration(start_ms),
                end: millis_to_duration(end_ms),
                text: caption.text.clone(),
            }
        })
        .collect();

    SubtitleTrack::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_single_caption() {
        let payload = r#"{"captions":[{"startTime":2000,"duration":500,"content":"Hello"}]}"#;

        let result = convert_captions(payload, 1000.0);

        assert!(result.diagnostic.is_none());
        assert_eq!(
            result.track.entries(),
            &[SubtitleEntry {
                index: 1,
                start: Duration::from_millis(3000),
                end: Duration::from_millis(3500),
                text: "Hello".to_string(),
            }]
        );
        assert_eq!(
            result.track.to_srt(),
            "1\n00:00:03,000 --> 00:00:03,500\nHello\n\n"
        );
    }

    #[test]
    fn test_indices_sequential_regardless_of_timing() {
        let payload = r#"{"captions":[
            {"startTime":5000,"duration":1000,"content":"late"},
            {"startTime":0,"duration":8000,"content":"overlapping"},
            {"startTime":0,"duration":0,"content":"zero"}
        ]}"#;

        let track = convert_captions(payload, 0.0).track;

        let indices: Vec<usize> = track.entries().iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        // caption order is kept, not re-sorted
        assert_eq!(track.entries()[0].text, "late");
        assert_eq!(track.entries()[2].start, track.entries()[2].end);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let payload = r#"{"captions":[{"duration":1200,"content":"Hi","startOfParagraph":true,"startTime":800}]}"#;

        let track = convert_captions(payload, 13500.0).track;

        assert_eq!(track.entries()[0].start, Duration::from_millis(14300));
        assert_eq!(track.entries()[0].end, Duration::from_millis(15500));
    }

    #[test]
    fn test_fractional_offset() {
        let payload = r#"{"captions":[{"startTime":0,"duration":1000,"content":"x"}]}"#;

        let track = convert_captions(payload, 13345.6).track;

        assert_eq!(
            track.to_srt(),
            "1\n00:00:13,346 --> 00:00:14,346\nx\n\n"
        );
    }

    #[test]
    fn test_empty_captions() {
        let result = convert_captions(r#"{"captions":[]}"#, 1000.0);
        assert!(result.track.is_empty());
        assert_eq!(result.diagnostic, Some(SubtitleDiagnostic::NotAvailable));
    }

    #[test]
    fn test_absent_captions() {
        let result = convert_captions("{}", 1000.0);
        assert!(result.track.is_empty());
        assert_eq!(result.diagnostic, Some(SubtitleDiagnostic::NotAvailable));
    }

    #[test]
    fn test_status_message_verbatim() {
        let result = convert_captions(r#"{"status": {"message": "not found"}}"#, 1000.0);
        assert!(result.track.is_empty());
        assert_eq!(
            result.diagnostic,
            Some(SubtitleDiagnostic::RemoteStatus("not found".to_string()))
        );
    }

    #[test]
    fn test_malformed_payload() {
        let result = convert_captions("<html>Not JSON</html>", 1000.0);
        assert!(result.track.is_empty());
        assert!(matches!(
            result.diagnostic,
            Some(SubtitleDiagnostic::Malformed(_))
        ));
    }

    #[test]
    fn test_caption_missing_field_is_malformed() {
        let result = convert_captions(r#"{"captions":[{"startTime":1}]}"#, 0.0);
        assert!(matches!(
            result.diagnostic,
            Some(SubtitleDiagnostic::Malformed(_))
        ));
    }

    #[test]
    fn test_negative_duration_clamped() {
        let payload = r#"{"captions":[{"startTime":1000,"duration":-300,"content":"x"}]}"#;

        let track = convert_captions(payload, 0.0).track;

        let entry = &track.entries()[0];
        assert_eq!(entry.start, Duration::from_millis(1000));
        assert!(entry.end >= entry.start);
    }

    #[test]
    fn test_negative_start_within_intro_kept() {
        let payload = r#"{"captions":[{"startTime":-500,"duration":1000,"content":"x"}]}"#;

        let track = convert_captions(payload, 1000.0).track;

        assert_eq!(track.entries()[0].start, Duration::from_millis(500));
        assert_eq!(track.entries()[0].end, Duration::from_millis(1500));
    }

    #[test]
    fn test_negative_start_before_stream_clamped() {
        let payload = r#"{"captions":[{"startTime":-2000,"duration":1500,"content":"x"}]}"#;

        let track = convert_captions(payload, 1000.0).track;

        assert_eq!(track.entries()[0].start, Duration::ZERO);
        assert_eq!(track.entries()[0].end, Duration::from_millis(1500));
    }

    #[test]
    fn test_empty_captions_win_over_status() {
        let result = convert_captions(r#"{"captions":[],"status":{"message":"boom"}}"#, 0.0);
        assert!(result.track.is_empty());
        assert_eq!(result.diagnostic, Some(SubtitleDiagnostic::NotAvailable));
    }

    #[test]
    fn test_conversion_is_repeatable() {
        let payload = r#"{"captions":[
            {"startTime":0,"duration":1500,"content":"one"},
            {"startTime":1500,"duration":1500,"content":"two"}
        ]}"#;

        assert_eq!(convert_captions(payload, 2000.0), convert_captions(payload, 2000.0));
    }
}
