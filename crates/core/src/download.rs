//! Helpers for fetching caption tracks with yt-dlp.

use anyhow::{anyhow, Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{info, trace, warn};

/// Program invoked to download captions.
pub const DOWNLOADER: &str = "yt-dlp";

/// Archive file yt-dlp uses to skip videos it already fetched.
pub const DOWNLOAD_ARCHIVE: &str = "downloaded.txt";

/// Channel tabs scanned for videos. `/shorts` is opt-in.
const CHANNEL_TABS: [&str; 3] = ["/videos", "/streams", "/podcasts"];

/// Build the list of channel tab URLs to download from.
pub fn channel_urls(channel: &str, include_shorts: bool) -> Vec<String> {
    let base = channel.trim_end_matches('/');
    let mut urls: Vec<String> = CHANNEL_TABS.iter().map(|t| format!("{base}{t}")).collect();
    if include_shorts {
        urls.push(format!("{base}/shorts"));
    }
    urls
}

/// Build the yt-dlp arguments that fetch `lang` captions for `url` into `out_dir`.
/// Files land as `<title> [<id>].vtt` so the video id can be recovered later.
pub fn yt_dlp_args(url: &str, lang: &str, out_dir: &Path) -> Vec<String> {
    let template = format!("{}/%(title)s [%(id)s].%(ext)s", out_dir.display());
    [
        "--write-sub",
        "--sub-lang",
        lang,
        "--write-auto-sub",
        "--skip-download",
        "--download-archive",
        DOWNLOAD_ARCHIVE,
        "-f",
        "best",
        "--sub-format",
        "vtt",
        "--convert-subs",
        "vtt",
        "-o",
        template.as_str(),
        url,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Download captions for every tab of `channel`.
/// A failing tab is logged and skipped; a missing yt-dlp binary is an error.
pub fn download_captions(
    channel: &str,
    lang: &str,
    include_shorts: bool,
    out_dir: &Path,
) -> Result<()> {
    trace!(
        "download_captions(channel={channel}, lang={lang}, out_dir={})",
        out_dir.display()
    );
    info!("downloading {lang} captions");
    for url in channel_urls(channel, include_shorts) {
        info!("  - {url}");
        let status = match Command::new(DOWNLOADER)
            .args(yt_dlp_args(&url, lang, out_dir))
            .status()
        {
            Ok(status) => status,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(anyhow!("{DOWNLOADER} not found, please install it first"));
            }
            Err(err) => return Err(err).with_context(|| format!("running {DOWNLOADER}")),
        };
        if !status.success() {
            warn!("error downloading from {url}: {status}");
        }
    }
    Ok(())
}

/// Ask yt-dlp to update itself to the latest release.
pub fn update_downloader() -> Result<()> {
    trace!("update_downloader(): invoking {DOWNLOADER} -U");
    info!("updating {DOWNLOADER}");
    let status = Command::new(DOWNLOADER)
        .arg("-U")
        .status()
        .with_context(|| format!("running {DOWNLOADER}"))?;
    if !status.success() {
        return Err(anyhow!("{DOWNLOADER} update failed"));
    }
    info!("{DOWNLOADER} updated");
    Ok(())
}
