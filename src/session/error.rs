// Session error types

use crate::api::ApiError;
use crate::command::CommandError;
use crate::model::PlaylistId;

/// Result type for session operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by the playlist store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("No playlist is open")]
    NoCurrentList,

    #[error("Playlist {0} is open read-only")]
    ReadOnly(PlaylistId),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("No playlist is marked for deletion")]
    NothingMarked,

    #[error("Edit rejected: {0}")]
    Command(#[from] CommandError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Background sync needs a Tokio runtime")]
    NoRuntime,
}
