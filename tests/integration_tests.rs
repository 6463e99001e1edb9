//! Integration tests for tedstream
//!
//! These tests run the parsers and the caption converter together on
//! realistic page snippets, without touching the network.

use tedstream::search::parse_search_results;
use tedstream::stream::parse_talk_page;
use tedstream::subtitle::{convert_captions, SubtitleDiagnostic};
use tedstream::TedError;

const SEARCH_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Search | TED</title></head>
<body>
<div class="search__results">
  <article class="m1 search__result">
    <h3 class="h7 m4 search__result__title">
      <a class="ga-link" data-ga-context="search" href="/talks/ken_robinson_says_schools_kill_creativity">Ken Robinson: Do schools kill creativity?</a>
    </h3>
    <div class="search__result__description m4">
      Sir Ken Robinson makes an entertaining and profoundly moving case for creating an education system that nurtures creativity.
    </div>
  </article>
  <article class="m1 search__result">
    <h3 class="h7 m4 search__result__title">
      <a class="ga-link" href="/talks/amy_cuddy_your_body_language_shapes_who_you_are">Amy Cuddy: Your body language may shape who you are</a>
    </h3>
    <div class="search__result__description m4">Body language affects how others see us.</div>
  </article>
  <article class="m1 search__result search__result--playlist">
    <h3 class="h7 m4 search__result__title">
      <a class="ga-link" href="/playlists/171/the_most_popular_talks_of_all">The most popular talks of all time</a>
    </h3>
  </article>
</div>
</body>
</html>"#;

const TALK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<script>window.dataLayer = [];</script>
<script>q("talkPage.init", {"talks":[{"id":66,"slug":"ken_robinson_says_schools_kill_creativity","duration":1164,"htmlStreams":[{"id":"Low","file":"https://download.ted.com/talks/KenRobinson_2006-light.mp4"},{"id":"Standard","file":"https://download.ted.com/talks/KenRobinson_2006.mp4"},{"id":"High","file":"https://download.ted.com/talks/KenRobinson_2006-480p.mp4"}],"speaker":"Ken Robinson"}]})</script>
</head>
<body>
<div id="player" data-config="%7B%22talkId%22%3A66%2C%22introDuration%22%3A11.82%2C%22adDuration%22%3A3.33%7D"></div>
</body>
</html>"#;

const CAPTIONS: &str = r#"{"captions":[
  {"duration":3000,"content":"Good morning. How are you?","startOfParagraph":true,"startTime":0},
  {"duration":4000,"content":"It's been great, hasn't it?","startOfParagraph":false,"startTime":3000},
  {"duration":2500,"content":"(Laughter)","startOfParagraph":false,"startTime":7500}
]}"#;

mod search_page_tests {
    use super::*;

    #[test]
    fn test_search_page_entries() {
        let talks = parse_search_results(SEARCH_PAGE);

        assert_eq!(talks.len(), 3);
        assert_eq!(talks[0].title, "Ken Robinson: Do schools kill creativity?");
        assert_eq!(
            talks[0].relative_url,
            "/talks/ken_robinson_says_schools_kill_creativity"
        );
        assert!(talks[0]
            .description
            .starts_with("Sir Ken Robinson makes an entertaining"));
        assert_eq!(talks[1].description, "Body language affects how others see us.");
        assert_eq!(talks[2].description, "");
    }

    #[test]
    fn test_search_page_without_results() {
        let html = r#"<html><body><div class="search__results"><p>We couldn't find anything</p></div></body></html>"#;
        assert!(parse_search_results(html).is_empty());
    }
}

mod talk_page_tests {
    use super::*;

    #[test]
    fn test_talk_page_metadata() {
        let talk = parse_talk_page(TALK_PAGE).unwrap();

        assert_eq!(talk.metadata.talk_id, 66);
        assert!((talk.metadata.intro_offset_ms - 12820.0).abs() < 1e-6);
        assert_eq!(talk.streams.len(), 3);
        assert_eq!(
            talk.streams.get("high"),
            Some("https://download.ted.com/talks/KenRobinson_2006-480p.mp4")
        );
        assert_eq!(
            talk.streams.get("STANDARD"),
            Some("https://download.ted.com/talks/KenRobinson_2006.mp4")
        );
    }

    #[test]
    fn test_retired_talk_page() {
        let page = "<html><body><h1>This talk is no longer available</h1></body></html>";
        assert!(matches!(
            parse_talk_page(page),
            Err(TedError::StreamUnavailable(_))
        ));
    }
}

mod caption_tests {
    use super::*;

    #[test]
    fn test_page_offset_applied_to_captions() {
        let talk = parse_talk_page(TALK_PAGE).unwrap();

        let conversion = convert_captions(CAPTIONS, talk.metadata.intro_offset_ms);

        assert!(conversion.diagnostic.is_none());
        assert_eq!(
            conversion.track.to_srt(),
            "1\n00:00:12,820 --> 00:00:15,820\nGood morning. How are you?\n\n\
             2\n00:00:15,820 --> 00:00:19,820\nIt's been great, hasn't it?\n\n\
             3\n00:00:20,320 --> 00:00:22,820\n(Laughter)\n\n"
        );
    }

    #[test]
    fn test_unsupported_language_status() {
        let payload = r#"{"status":{"code":404,"message":"Subtitles not found for language xx"}}"#;

        let conversion = convert_captions(payload, 1000.0);

        assert!(conversion.track.is_empty());
        assert_eq!(
            conversion.diagnostic,
            Some(SubtitleDiagnostic::RemoteStatus(
                "Subtitles not found for language xx".to_string()
            ))
        );
    }

    #[test]
    fn test_diagnostic_messages() {
        assert_eq!(
            SubtitleDiagnostic::NotAvailable.to_string(),
            "subtitle not available"
        );
        assert_eq!(
            SubtitleDiagnostic::RemoteStatus("not found".to_string()).to_string(),
            "server returned an error: not found"
        );
    }
}
