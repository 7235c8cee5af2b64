// Storage adapter contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{NewPlaylist, Playlist, PlaylistId, PlaylistUpdate};

/// Identifier of a registered user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user and the playlists they created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub playlists: Vec<PlaylistId>,
}

/// Data needed to register a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Operations every storage adapter exposes, whatever the backing engine
///
/// The client's edit path only relies on `find_playlist_by_id` and
/// `update_playlist`; the rest serves account and listing screens plus test
/// resets.
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    // User operations
    async fn create_user(&self, user: NewUser) -> DbResult<User>;
    async fn find_user_by_id(&self, id: &UserId) -> DbResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;
    async fn update_user(&self, user: User) -> DbResult<User>;
    async fn delete_user(&self, id: &UserId) -> DbResult<()>;
    async fn add_playlist_to_user(&self, user_id: &UserId, playlist_id: &PlaylistId)
    -> DbResult<User>;
    async fn delete_all_users(&self) -> DbResult<()>;

    // Playlist operations
    async fn create_playlist(&self, playlist: NewPlaylist) -> DbResult<Playlist>;
    async fn find_playlist_by_id(&self, id: &PlaylistId) -> DbResult<Option<Playlist>>;
    async fn find_playlists_by_owner_email(&self, email: &str) -> DbResult<Vec<Playlist>>;
    async fn get_all_playlists(&self) -> DbResult<Vec<Playlist>>;
    async fn update_playlist(&self, id: &PlaylistId, update: PlaylistUpdate)
    -> DbResult<Playlist>;
    async fn delete_playlist(&self, id: &PlaylistId) -> DbResult<()>;
    async fn delete_all_playlists(&self) -> DbResult<()>;
}
