use crate::config::Player;
use crate::error::TedError;
use crate::pipeline::{Playback, PlaybackOptions, ResolutionPipeline};
use crate::player;
use crate::search::TalkRecord;
use crate::subtitle::CaptionConversion;
use console::style;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by every talk played in one session.
pub struct Session {
    pub pipeline: ResolutionPipeline,
    pub options: PlaybackOptions,
    pub player: Player,
    pub save_subtitles: Option<PathBuf>,
}

impl Session {
    /// Resolve and play one talk.
    pub async fn play(&self, talk: &TalkRecord) -> anyhow::Result<()> {
        println!("Will now stream {}", style(&talk.title).bold());

        let playback = with_spinner(
            "Resolving stream...",
            self.pipeline.prepare_playback(talk, &self.options),
        )
        .await?;
        print_playback(&playback);

        let subtitle_file = match playback.subtitles {
            Some(ref conversion) => self.prepare_subtitles(conversion)?,
            None => None,
        };

        player::launch(
            self.player,
            &playback.stream_url,
            subtitle_file.as_ref().map(|f| f.path()),
        )
        .await?;

        Ok(())
    }

    fn prepare_subtitles(
        &self,
        conversion: &CaptionConversion,
    ) -> anyhow::Result<Option<tempfile::NamedTempFile>> {
        if let Some(ref diagnostic) = conversion.diagnostic {
            let language = self.options.subtitle_language.as_deref().unwrap_or("?");
            println!(
                "{} Subtitle '{}': {}",
                style("!").yellow(),
                language,
                diagnostic
            );
        }

        if conversion.track.is_empty() {
            return Ok(None);
        }

        if let Some(ref path) = self.save_subtitles {
            std::fs::write(path, conversion.track.to_srt())?;
            println!("{} Subtitles saved to {}", style("✓").green(), path.display());
        }

        Ok(Some(player::write_subtitle_file(&conversion.track)?))
    }
}

/// Show the talk menu until the user quits.
///
/// A failure for one talk is reported and the menu comes back.
pub async fn run_menu(session: &Session, talks: &[TalkRecord]) -> anyhow::Result<()> {
    let mut items: Vec<String> = talks.iter().map(menu_label).collect();
    items.push("Quit".to_string());

    let mut default = 0;
    loop {
        println!();
        let selection = Select::new()
            .with_prompt("Choose a video")
            .items(&items)
            .default(default)
            .interact()?;

        if selection == talks.len() {
            return Ok(());
        }
        default = selection;

        if let Err(e) = session.play(&talks[selection]).await {
            report_failure(&e);
        }
    }
}

pub fn report_failure(error: &anyhow::Error) {
    match error.downcast_ref::<TedError>() {
        Some(TedError::StreamUnavailable(_)) => {
            println!("{} Maybe this video is not available for download.", style("!").yellow())
        }
        _ => println!("{} {:#}", style("✗").red(), error),
    }
}

fn menu_label(talk: &TalkRecord) -> String {
    if talk.description.is_empty() {
        talk.title.clone()
    } else {
        format!("{} — {}", talk.title, truncate(&talk.description, 60))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Run a fetch with a spinner on screen.
pub async fn with_spinner<T, F>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    pb.finish_and_clear();
    result
}

fn print_playback(playback: &Playback) {
    println!("  Title:  {}", style(&playback.title).cyan());
    println!("  Stream: {}", playback.stream_url);
}
