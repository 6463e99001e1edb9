use crate::config::Player;
use crate::error::{Result, TedError};
use crate::subtitle::SubtitleTrack;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info};

impl Player {
    /// Arguments passed to the player: the URL, then the subtitle flag and file.
    pub fn command_args(&self, stream_url: &str, subtitle_path: Option<&Path>) -> Vec<OsString> {
        let mut args = vec![OsString::from(stream_url)];
        if let Some(path) = subtitle_path {
            args.push(OsString::from(self.subtitle_flag()));
            args.push(path.as_os_str().to_owned());
        }
        args
    }
}

/// Write a track to a temporary `.srt` file that is removed when dropped.
pub fn write_subtitle_file(track: &SubtitleTrack) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("tedstream-")
        .suffix(".srt")
        .tempfile()?;
    file.write_all(track.to_srt().as_bytes())?;
    file.flush()?;
    debug!("Wrote {} subtitle entries to {:?}", track.len(), file.path());
    Ok(file)
}

/// Check whether the player executable can be started.
pub fn is_installed(player: Player) -> bool {
    std::process::Command::new(player.executable())
        .arg("--help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .and_then(|mut child| child.wait())
        .is_ok()
}

/// Run the player and wait for it to exit.
pub async fn launch(player: Player, stream_url: &str, subtitle_path: Option<&Path>) -> Result<()> {
    let args = player.command_args(stream_url, subtitle_path);
    info!("Starting {} for {}", player, stream_url);
    debug!("{} {:?}", player.executable(), args);

    let status = Command::new(player.executable())
        .args(&args)
        .status()
        .await
        .map_err(|e| TedError::Player(format!("Failed to start {}: {}", player, e)))?;

    if !status.success() {
        return Err(TedError::Player(format!("{} exited with {}", player, status)));
    }

    Ok(())
}
