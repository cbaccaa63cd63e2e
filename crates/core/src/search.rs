//! Cross-track substring search.
//! This module scans every caption track of a source, keeps matching entries
//! that have not already been reported in this session and collects them
//! with a deep link back to the video.

use crate::caption::{parse_track, CaptionEntry, ParseOptions, ParseStats, SeenTexts};
use crate::error::{ReadError, SearchError};
use crate::source::CaptionSource;
use crate::vtt;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Base of the deep links produced for matches.
pub const WATCH_URL: &str = "https://www.youtube.com/watch";

/// A validated, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    folded: String,
}

impl Query {
    /// Build a query, rejecting empty or whitespace-only text.
    pub fn new(text: impl Into<String>) -> Result<Self, SearchError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let folded = text.to_lowercase();
        Ok(Self { text, folded })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive substring test.
    pub fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }
}

/// Build the watch URL for `video_id` starting at `offset_seconds`.
pub fn watch_link(video_id: &str, offset_seconds: u64) -> String {
    format!("{WATCH_URL}?v={video_id}&t={offset_seconds}")
}

/// A caption entry that satisfied a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub query: String,
    #[serde(flatten)]
    pub entry: CaptionEntry,
    /// Deep link, absent when the track name carries no video id.
    pub link: Option<String>,
}

impl SearchMatch {
    fn new(query: &Query, entry: CaptionEntry) -> Self {
        let link = entry
            .video_id
            .as_deref()
            .map(|id| watch_link(id, entry.offset_seconds));
        Self {
            query: query.as_str().to_string(),
            entry,
            link,
        }
    }
}

/// A track that could not be read and was left out of the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTrack {
    pub track: String,
    pub reason: String,
}

/// Everything one search session produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub matches: Vec<SearchMatch>,
    pub episodes: BTreeSet<String>,
    pub tracks_scanned: usize,
    pub skipped: Vec<SkippedTrack>,
    pub stats: ParseStats,
}

impl SearchReport {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Number of distinct episodes with at least one match.
    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }

    /// `true` when every track was read successfully.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Runs queries against the tracks of a [`CaptionSource`].
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    options: ParseOptions,
}

impl SearchEngine {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Search every track of `source` for `query`.
    /// Matches come back in track-then-block order. A line already reported
    /// from an earlier track, compared case-insensitively, is not reported again.
    pub fn search<S: CaptionSource>(
        &self,
        source: &S,
        query: &Query,
    ) -> Result<SearchReport, SearchError> {
        let tracks = source.tracks().map_err(SearchError::Listing)?;
        if tracks.is_empty() {
            return Err(SearchError::NoCaptionFiles {
                location: source.location(),
            });
        }
        info!("searching {} caption tracks for {:?}", tracks.len(), query.as_str());
        let mut report = SearchReport {
            query: query.as_str().to_string(),
            ..SearchReport::default()
        };
        let mut seen = SeenTexts::new();
        for track in &tracks {
            let content = match read_track(source, track) {
                Ok(content) => content,
                Err(err) => {
                    warn!("skipping {track}: {err}");
                    report.skipped.push(SkippedTrack {
                        track: track.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            report.tracks_scanned += 1;
            let parsed = parse_track(track, &content, &self.options);
            report.stats.absorb(&parsed.stats);
            for entry in parsed.entries {
                let text = entry.normalized_text();
                if !query.matches(&text) || !seen.insert(&text.to_lowercase()) {
                    continue;
                }
                report.episodes.insert(entry.episode_id.clone());
                report.matches.push(SearchMatch::new(query, entry));
            }
        }
        debug!(
            "{} matches in {} episodes, {} tracks skipped",
            report.match_count(),
            report.episode_count(),
            report.skipped.len()
        );
        Ok(report)
    }
}

fn read_track<S: CaptionSource>(source: &S, track: &str) -> Result<String, ReadError> {
    let bytes = source.read(track)?;
    vtt::decode(&bytes)
}
