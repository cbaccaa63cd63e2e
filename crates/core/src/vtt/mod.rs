//! This module is responsible for WebVTT decoding and cue extraction.
//! It turns raw caption bytes into blocks and blocks into cues.

use crate::error::ReadError;
use encoding_rs::WINDOWS_1252;
use regex::Regex;
use std::sync::OnceLock;

/// First-line prefixes of blocks that carry file metadata rather than cues.
/// `EBVTT` shows up in downloads whose first byte was mangled.
pub const HEADER_MARKERS: [&str; 4] = ["WEBVTT", "EBVTT", "Kind:", "Language:"];

/// Delimiter between the start and end timestamps of a cue.
pub const TIMING_DELIMITER: &str = "-->";

/// How text lines carrying inline markup such as `<c>` or `<00:00:01.000>` are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupPolicy {
    /// Drop any line that contains a tag.
    #[default]
    DropLine,
    /// Remove the tags and keep whatever text remains.
    Strip,
}

/// A cue's start timestamp and its cleaned text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub start: String,
    pub text: Vec<String>,
}

/// What became of a single block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Cue(Cue),
    /// `WEBVTT` header or `Kind:`/`Language:` metadata.
    Header,
    /// A block with fewer than two lines.
    Fragment,
    /// No line holds the timing delimiter.
    NoTiming,
    /// No text line survived cleaning.
    NoText,
}

fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn separator_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\n{2,}").unwrap())
}

/// Decode caption bytes, trying UTF-8 before falling back to Windows-1252.
pub fn decode(bytes: &[u8]) -> Result<String, ReadError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string());
    }
    WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(ReadError::Decode {
            encoding: WINDOWS_1252.name(),
        })
}

/// Split caption content into blocks separated by one or more blank lines.
pub fn split_blocks(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    separator_regex()
        .split(trimmed)
        .map(|block| block.to_string())
        .collect()
}

/// Whether `line` contains an angle-bracket tag.
pub fn has_tag(line: &str) -> bool {
    tag_regex().is_match(line)
}

/// Remove every angle-bracket tag from `text` and trim the result.
pub fn strip_tags(text: &str) -> String {
    tag_regex().replace_all(text, "").trim().to_string()
}

/// Turn one block into a cue, or report why it is not one.
pub fn parse_block(block: &str, policy: MarkupPolicy) -> BlockOutcome {
    if HEADER_MARKERS.iter().any(|m| block.starts_with(m)) {
        return BlockOutcome::Header;
    }
    let lines: Vec<&str> = block.split('\n').collect();
    if lines.len() < 2 {
        return BlockOutcome::Fragment;
    }
    let Some(timing) = lines.iter().position(|l| l.contains(TIMING_DELIMITER)) else {
        return BlockOutcome::NoTiming;
    };
    let start = lines[timing]
        .split(TIMING_DELIMITER)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let text: Vec<String> = lines[timing + 1..]
        .iter()
        .filter_map(|line| clean_line(line, policy))
        .collect();
    if text.is_empty() {
        return BlockOutcome::NoText;
    }
    BlockOutcome::Cue(Cue { start, text })
}

fn clean_line(line: &str, policy: MarkupPolicy) -> Option<String> {
    let cleaned = match policy {
        MarkupPolicy::DropLine if has_tag(line) => return None,
        MarkupPolicy::DropLine => line.trim().to_string(),
        MarkupPolicy::Strip => strip_tags(line),
    };
    (!cleaned.is_empty()).then_some(cleaned)
}
