//! Human readable and JSON rendering of search results.

use crate::search::{SearchMatch, SearchReport};
use anyhow::Result;

/// Printed in place of a link when the track name has no video id.
pub const NO_LINK_MARKER: &str = "[No YouTube ID found in filename]";

/// Format one match as a multi-line record.
pub fn format_match(m: &SearchMatch) -> String {
    let link = m.link.as_deref().unwrap_or(NO_LINK_MARKER);
    format!(
        "Found in: {} ({})\n{} -->\n{}\nLink: {}",
        m.entry.source_file,
        m.entry.episode_id,
        m.entry.start_timestamp,
        m.entry.text_lines.join("\n"),
        link
    )
}

/// Format the trailing summary line, noting any tracks that were skipped.
pub fn format_summary(report: &SearchReport) -> String {
    let mut out = format!(
        "'{}' found {} unique times in {} files",
        report.query,
        report.match_count(),
        report.episode_count()
    );
    if !report.is_clean() {
        let n = report.skipped.len();
        out.push_str(&format!(
            " ({n} file{} could not be read)",
            if n == 1 { "" } else { "s" }
        ));
    }
    out
}

/// Format the whole report: every match separated by blank lines, then the summary.
pub fn format_report(report: &SearchReport) -> String {
    let mut out = String::new();
    for m in &report.matches {
        out.push('\n');
        out.push_str(&format_match(m));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format_summary(report));
    out
}

/// Serialize the report as pretty-printed JSON.
pub fn to_json(report: &SearchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionEntry;
    use crate::search::SkippedTrack;
    use serde_json::Value;

    fn sample_match(video_id: Option<&str>) -> SearchMatch {
        SearchMatch {
            query: "hello".into(),
            entry: CaptionEntry {
                start_timestamp: "00:01:05.000".into(),
                offset_seconds: 63,
                text_lines: vec!["Hello".into(), "there".into()],
                episode_id: "Talk Show [abc]".into(),
                source_file: "vtt_files/Talk Show [abc].vtt".into(),
                video_id: video_id.map(str::to_string),
            },
            link: video_id.map(|id| crate::search::watch_link(id, 63)),
        }
    }

    #[test]
    fn formats_match_with_link() {
        assert_eq!(
            format_match(&sample_match(Some("abc"))),
            "Found in: vtt_files/Talk Show [abc].vtt (Talk Show [abc])\n\
00:01:05.000 -->\n\
Hello\n\
there\n\
Link: https://www.youtube.com/watch?v=abc&t=63"
        );
    }

    #[test]
    fn formats_match_without_link() {
        let text = format_match(&sample_match(None));
        assert!(text.ends_with("Link: [No YouTube ID found in filename]"));
    }

    #[test]
    fn summary_mentions_skipped_files() {
        let mut report = SearchReport {
            query: "hello".into(),
            matches: vec![sample_match(Some("abc"))],
            ..SearchReport::default()
        };
        report.episodes.insert("Talk Show [abc]".into());
        assert_eq!(format_summary(&report), "'hello' found 1 unique times in 1 files");
        report.skipped.push(SkippedTrack {
            track: "bad.vtt".into(),
            reason: "boom".into(),
        });
        assert_eq!(
            format_summary(&report),
            "'hello' found 1 unique times in 1 files (1 file could not be read)"
        );
        let full = format_report(&report);
        assert!(full.starts_with("\nFound in:"));
        assert!(full.ends_with("(1 file could not be read)"));
    }

    #[test]
    fn json_flattens_entries() {
        let report = SearchReport {
            query: "hello".into(),
            matches: vec![sample_match(None)],
            ..SearchReport::default()
        };
        let value: Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        let first = &value["matches"][0];
        assert_eq!(first["offset_seconds"], 63);
        assert_eq!(first["episode_id"], "Talk Show [abc]");
        assert_eq!(first["link"], Value::Null);
        assert_eq!(value["query"], "hello");
    }
}
