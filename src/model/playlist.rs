// Playlist documents and the lightweight summaries used by listing screens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::song::Song;

/// Identifier assigned to a playlist by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id, used by the in-memory storage adapter
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A playlist document as stored by the backend
///
/// The whole document is what travels over the wire: every edit rewrites
/// the full song list rather than sending a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(rename = "_id")]
    pub id: PlaylistId,
    pub name: String,
    pub owner_email: String,
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub listener_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Playlist {
    pub fn new(id: PlaylistId, name: impl Into<String>, owner_email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner_email: owner_email.into(),
            songs: Vec::new(),
            listener_count: 0,
            created_at: None,
        }
    }

    pub fn with_songs(mut self, songs: Vec<Song>) -> Self {
        self.songs = songs;
        self
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email == email
    }

    pub fn id_name_pair(&self) -> IdNamePair {
        IdNamePair {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Case-insensitive substring match on the name or the owner's email
    ///
    /// A blank search matches every playlist.
    pub fn matches_search(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.owner_email.to_lowercase().contains(&needle)
    }
}

/// Order of the browse listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistSort {
    #[default]
    NameAscending,
    NameDescending,
    Owner,
}

impl PlaylistSort {
    pub fn compare(self, a: &Playlist, b: &Playlist) -> Ordering {
        match self {
            PlaylistSort::NameAscending => compare_text(&a.name, &b.name),
            PlaylistSort::NameDescending => compare_text(&b.name, &a.name),
            PlaylistSort::Owner => compare_text(&a.owner_email, &b.owner_email),
        }
    }
}

// Case-insensitive first, so "abba" sorts next to "ABBA"
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// The editable part of a playlist, sent as a whole on every update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistUpdate {
    pub name: String,
    pub songs: Vec<Song>,
}

impl From<&Playlist> for PlaylistUpdate {
    fn from(playlist: &Playlist) -> Self {
        Self {
            name: playlist.name.clone(),
            songs: playlist.songs.clone(),
        }
    }
}

/// Request body for creating a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlaylist {
    pub name: String,
    #[serde(default)]
    pub songs: Vec<Song>,
    pub owner_email: String,
}

/// Id/name summary shown on the owner's playlist screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdNamePair {
    #[serde(rename = "_id")]
    pub id: PlaylistId,
    pub name: String,
}
