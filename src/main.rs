use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tedstream::client::TedClient;
use tedstream::config::{Config, Player};
use tedstream::interactive::{report_failure, run_menu, with_spinner, Session};
use tedstream::pipeline::{PlaybackOptions, ResolutionPipeline};
use tedstream::player;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "tedstream")]
#[command(version, about = "Lists and streams TED talks (with optional subtitles) from the command line.")]
#[command(after_help = "e.g.:\n    tedstream zombie jesus")]
struct Cli {
    /// Search terms
    #[arg(required = true)]
    terms: Vec<String>,

    /// Subtitle language, e.g. en, es, zh-cn (default: no subtitles)
    #[arg(short, long = "sub", value_name = "SUBLANG")]
    sub: Option<String>,

    /// Video quality, e.g. standard or high
    #[arg(short, long)]
    quality: Option<String>,

    /// Video player: mpv, mplayer, vlc, cvlc
    #[arg(short, long)]
    player: Option<String>,

    /// Play the first talk found without showing a menu
    #[arg(short, long)]
    first: bool,

    /// Proxy for all requests, e.g. socks5://127.0.0.1:9050
    #[arg(long)]
    proxy: Option<String>,

    /// Also save the subtitles as an SRT file
    #[arg(long, value_name = "PATH")]
    save_subs: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn apply_cli(mut config: Config, cli: &Cli) -> Result<Config> {
    if let Some(ref lang) = cli.sub {
        config.subtitle_language = Some(lang.clone());
    }
    if let Some(ref quality) = cli.quality {
        config.quality = quality.clone();
    }
    if let Some(ref player) = cli.player {
        config.player = player.parse::<Player>()?;
    }
    if let Some(ref proxy) = cli.proxy {
        config.proxy = Some(proxy.clone());
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    let config = apply_cli(config, &cli)?;
    config
        .validate()
        .context("Configuration validation failed")?;

    if !player::is_installed(config.player) {
        warn!("{} does not seem to be installed", config.player);
    }

    let client = TedClient::new(&config).context("Failed to set up HTTP client")?;
    let session = Session {
        pipeline: ResolutionPipeline::new(client),
        options: PlaybackOptions::from(&config),
        player: config.player,
        save_subtitles: cli.save_subs.clone(),
    };

    let talks = with_spinner("Searching...", session.pipeline.resolve_talks(&cli.terms))
        .await
        .context("Search failed")?;

    if talks.is_empty() {
        println!("No talks found for '{}'", cli.terms.join(" "));
        return Ok(());
    }

    info!("Found {} talk(s)", talks.len());

    if cli.first {
        if let Err(e) = session.play(&talks[0]).await {
            report_failure(&e);
        }
        return Ok(());
    }

    run_menu(&session, &talks).await
}
