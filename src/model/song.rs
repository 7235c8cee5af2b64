// Song entries of a playlist

use serde::{Deserialize, Serialize};

/// YouTube video used for songs added with the "add song" button
pub const PLACEHOLDER_YOUTUBE_ID: &str = "dQw4w9WgXcQ";

/// A single song in a playlist
///
/// Songs have no identity of their own: two songs are the same song when all
/// four fields match. Their position in the playlist is what the edit
/// commands address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub you_tube_id: String,
}

impl Song {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        year: i32,
        you_tube_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            year,
            you_tube_id: you_tube_id.into(),
        }
    }

    /// Placeholder song appended by "add song"
    pub fn untitled(year: i32) -> Self {
        Self::new("Untitled", "?", year, PLACEHOLDER_YOUTUBE_ID)
    }

    /// Link to the song's video
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.you_tube_id)
    }
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) by {}", self.title, self.year, self.artist)
    }
}
