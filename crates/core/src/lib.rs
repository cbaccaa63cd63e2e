//! Search WebVTT caption tracks for a phrase and link each hit back to the
//! moment it is spoken.

pub mod caption;
pub mod download;
pub mod error;
pub mod render;
pub mod search;
pub mod source;
pub mod timestamp;
pub mod vtt;

pub use caption::{CaptionEntry, ParseOptions};
pub use error::{ReadError, SearchError};
pub use search::{Query, SearchEngine, SearchMatch, SearchReport};
pub use source::{CaptionSource, DirectorySource};
pub use vtt::MarkupPolicy;
