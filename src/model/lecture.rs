use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parsed video lecture. Records carry no index of their own: a
/// lecture's position in the vector returned by the parser is its only
/// ordering key, and downstream consumers (feeds, storage) use that
/// position as a stable per-course secondary key.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LectureRecord {
    /// "<truncated week header> - <lecture name>", sized for table columns.
    pub full_name: String,

    /// "MM:SS" free text; empty when the title carried no parseable
    /// duration.
    pub duration: String,

    /// Content-Length of the video as reported by the HEAD probe; empty
    /// when the server sent none.
    pub size_bytes: String,

    pub video_url: String,

    /// "<week header> : <lecture name>".
    pub description: String,

    /// Downloadable extras linked next to the lecture, title -> URL,
    /// ASCII-transliterated for storage compatibility.
    pub resources: BTreeMap<String, String>,
}
