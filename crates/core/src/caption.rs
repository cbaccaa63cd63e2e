//! Caption entries and per-track parsing.
//! This module wires the block parser, timestamp conversion and the
//! per-file deduplication into one pass over a caption track.

use crate::timestamp::{offset_seconds, DEFAULT_LEAD_IN_SECS};
use crate::vtt::{self, BlockOutcome, MarkupPolicy};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Options controlling how caption tracks are turned into entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub markup: MarkupPolicy,
    pub lead_in_secs: u64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            markup: MarkupPolicy::default(),
            lead_in_secs: DEFAULT_LEAD_IN_SECS,
        }
    }
}

/// One deduplicated, timestamped caption line group from a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionEntry {
    /// Start timestamp exactly as written in the file.
    pub start_timestamp: String,
    /// Start in whole seconds, minus the lead-in.
    pub offset_seconds: u64,
    /// Cleaned text, one item per caption line. Never empty.
    pub text_lines: Vec<String>,
    pub episode_id: String,
    pub source_file: String,
    pub video_id: Option<String>,
}

impl CaptionEntry {
    /// Text lines joined by single spaces; the key used for dedup and matching.
    pub fn normalized_text(&self) -> String {
        self.text_lines.join(" ")
    }
}

/// Identifiers derived from a caption track's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub source_file: String,
    pub episode_id: String,
    pub video_id: Option<String>,
}

fn video_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\[([^\]]+)\]").unwrap())
}

impl TrackInfo {
    /// Derive the episode and video identifiers from `source_file`.
    /// `Title [abc123xyz45].vtt` has episode `Title [abc123xyz45]` and video `abc123xyz45`.
    pub fn from_source(source_file: &str) -> Self {
        let path = Path::new(source_file);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_file.to_string());
        let episode_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        let video_id = video_id_regex()
            .captures(&file_name)
            .map(|c| c[1].to_string());
        Self {
            source_file: source_file.to_string(),
            episode_id,
            video_id,
        }
    }
}

/// Add-if-absent set of normalized texts.
#[derive(Debug, Default)]
pub struct SeenTexts {
    texts: HashSet<String>,
}

impl SeenTexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text`, returning `true` if it had not been seen before.
    pub fn insert(&mut self, text: &str) -> bool {
        if self.texts.contains(text) {
            return false;
        }
        self.texts.insert(text.to_string())
    }
}

/// Counters describing what happened to the blocks of one or more tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub blocks: usize,
    pub headers: usize,
    pub fragments: usize,
    pub malformed: usize,
    pub duplicates: usize,
    pub entries: usize,
}

impl ParseStats {
    /// Accumulate another track's counters into this one.
    pub fn absorb(&mut self, other: &ParseStats) {
        self.blocks += other.blocks;
        self.headers += other.headers;
        self.fragments += other.fragments;
        self.malformed += other.malformed;
        self.duplicates += other.duplicates;
        self.entries += other.entries;
    }
}

/// The entries of one caption track together with its parse counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTrack {
    pub entries: Vec<CaptionEntry>,
    pub stats: ParseStats,
}

/// Parse a decoded caption track into entries, in block order.
/// Entries whose normalized text already appeared earlier in this track are dropped.
pub fn parse_track(source_file: &str, content: &str, options: &ParseOptions) -> ParsedTrack {
    let info = TrackInfo::from_source(source_file);
    let mut seen = SeenTexts::new();
    let mut stats = ParseStats::default();
    let mut entries = Vec::new();
    for block in vtt::split_blocks(content) {
        stats.blocks += 1;
        let cue = match vtt::parse_block(&block, options.markup) {
            BlockOutcome::Cue(cue) => cue,
            BlockOutcome::Header => {
                stats.headers += 1;
                continue;
            }
            BlockOutcome::Fragment => {
                stats.fragments += 1;
                continue;
            }
            BlockOutcome::NoTiming | BlockOutcome::NoText => {
                stats.malformed += 1;
                continue;
            }
        };
        if !seen.insert(&cue.text.join(" ")) {
            stats.duplicates += 1;
            continue;
        }
        entries.push(CaptionEntry {
            offset_seconds: offset_seconds(&cue.start, options.lead_in_secs),
            start_timestamp: cue.start,
            text_lines: cue.text,
            episode_id: info.episode_id.clone(),
            source_file: info.source_file.clone(),
            video_id: info.video_id.clone(),
        });
    }
    stats.entries = entries.len();
    debug!(
        "parsed {source_file}: {} blocks, {} entries, {} duplicates, {} malformed",
        stats.blocks, stats.entries, stats.duplicates, stats.malformed
    );
    ParsedTrack { entries, stats }
}
