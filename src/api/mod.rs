// Client side of the store API
//
// The session talks to the backend only through the PlaylistApi trait:
// - HttpPlaylistApi: JSON over HTTP against a running server
// - LocalPlaylistApi: in-process calls into a StoreController (tests, offline use)

pub mod http;
pub mod local;
pub mod wire;

use async_trait::async_trait;

use crate::model::{IdNamePair, NewPlaylist, Playlist, PlaylistId, PlaylistUpdate};

pub use http::HttpPlaylistApi;
pub use local::LocalPlaylistApi;

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the store API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requester is not logged in or does not own the playlist
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request never got a response (connection, timeout, decoding)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Operations the client needs from the store backend
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// `GET /store/playlist/:id`
    async fn get_playlist(&self, id: &PlaylistId) -> ApiResult<Playlist>;

    /// `PUT /store/playlist/:id`, overwriting name and songs
    async fn update_playlist(&self, id: &PlaylistId, update: &PlaylistUpdate)
    -> ApiResult<PlaylistId>;

    /// `POST /store/playlist`
    async fn create_playlist(&self, request: &NewPlaylist) -> ApiResult<Playlist>;

    /// `DELETE /store/playlist/:id`
    async fn delete_playlist(&self, id: &PlaylistId) -> ApiResult<()>;

    /// `GET /store/playlistpairs`, the requester's own playlists
    async fn get_playlist_pairs(&self) -> ApiResult<Vec<IdNamePair>>;

    /// `GET /store/playlists`, every playlist
    async fn get_all_playlists(&self) -> ApiResult<Vec<Playlist>>;
}
