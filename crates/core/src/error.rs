//! Error types shared by the caption parser and the search engine.

use std::io;
use thiserror::Error;

/// Failure to turn a caption track into text. Recoverable: the track is skipped.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read caption track: {0}")]
    Io(#[from] io::Error),

    #[error("caption track is neither UTF-8 nor {encoding}")]
    Decode { encoding: &'static str },
}

/// Preconditions a search session checks before scanning anything.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("no caption files found in {location}")]
    NoCaptionFiles { location: String },

    #[error("failed to list caption files: {0}")]
    Listing(#[source] io::Error),
}
