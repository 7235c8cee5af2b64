// Store endpoints and their ownership rules

use log::{debug, info, warn};
use std::sync::Arc;

use super::database::{DatabaseManager, DbError, UserId};
use crate::api::{ApiError, ApiResult};
use crate::model::{IdNamePair, NewPlaylist, Playlist, PlaylistId, PlaylistUpdate};

const UNAUTHORIZED: &str = "UNAUTHORIZED";
const NOT_OWNER: &str = "authentication error";

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => ApiError::NotFound(what),
            DbError::DuplicateEmail(_) => ApiError::BadRequest(err.to_string()),
            DbError::Backend(message) => ApiError::Server {
                status: 500,
                message,
            },
        }
    }
}

/// The store API as plain async operations over a storage adapter
///
/// `requester` is the id of the logged-in user making the call, or `None`
/// for a guest. Reads of single playlists and of the public listing are open
/// to guests; everything else needs a login, and changes to a playlist need
/// the requester to be its owner.
pub struct StoreController {
    db: Arc<dyn DatabaseManager>,
}

impl StoreController {
    pub fn new(db: Arc<dyn DatabaseManager>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<dyn DatabaseManager> {
        &self.db
    }

    fn require_login(requester: Option<&UserId>) -> ApiResult<&UserId> {
        requester.ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED.to_string()))
    }

    /// Check that the requester is the user registered under the playlist's owner email
    async fn authorize_owner(&self, requester: &UserId, playlist: &Playlist) -> ApiResult<()> {
        let owner = self.db.find_user_by_email(&playlist.owner_email).await?;
        match owner {
            Some(owner) if &owner.id == requester => Ok(()),
            _ => {
                warn!(
                    "User {} is not the owner of playlist {}",
                    requester, playlist.id
                );
                Err(ApiError::Unauthorized(NOT_OWNER.to_string()))
            }
        }
    }

    async fn find_playlist(&self, id: &PlaylistId) -> ApiResult<Playlist> {
        self.db
            .find_playlist_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Playlist {}", id)))
    }

    /// `POST /store/playlist`
    ///
    /// The new playlist must be owned by the requester.
    pub async fn create_playlist(
        &self,
        requester: Option<&UserId>,
        request: NewPlaylist,
    ) -> ApiResult<Playlist> {
        let requester = Self::require_login(requester)?;
        let user = self
            .db
            .find_user_by_id(requester)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED.to_string()))?;
        if user.email != request.owner_email {
            return Err(ApiError::Unauthorized(NOT_OWNER.to_string()));
        }

        let playlist = self.db.create_playlist(request).await?;
        self.db.add_playlist_to_user(&user.id, &playlist.id).await?;
        info!("Created playlist {} for {}", playlist.id, user.email);
        Ok(playlist)
    }

    /// `DELETE /store/playlist/:id`
    pub async fn delete_playlist(&self, requester: Option<&UserId>, id: &PlaylistId) -> ApiResult<()> {
        let requester = Self::require_login(requester)?;
        let playlist = self.find_playlist(id).await?;
        self.authorize_owner(requester, &playlist).await?;

        self.db.delete_playlist(id).await?;
        info!("Deleted playlist {}", id);
        Ok(())
    }

    /// `GET /store/playlist/:id`
    pub async fn get_playlist(&self, id: &PlaylistId) -> ApiResult<Playlist> {
        debug!("Find playlist {}", id);
        self.find_playlist(id).await
    }

    /// `GET /store/playlistpairs`
    ///
    /// An owner without playlists gets an empty list.
    pub async fn get_playlist_pairs(&self, requester: Option<&UserId>) -> ApiResult<Vec<IdNamePair>> {
        let requester = Self::require_login(requester)?;
        let user = self
            .db
            .find_user_by_id(requester)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED.to_string()))?;

        let playlists = self.db.find_playlists_by_owner_email(&user.email).await?;
        Ok(playlists.iter().map(Playlist::id_name_pair).collect())
    }

    /// `GET /store/playlists`
    pub async fn get_all_playlists(&self) -> ApiResult<Vec<Playlist>> {
        Ok(self.db.get_all_playlists().await?)
    }

    /// `PUT /store/playlist/:id`
    ///
    /// Overwrites name and songs with the given document. Owner only.
    pub async fn update_playlist(
        &self,
        requester: Option<&UserId>,
        id: &PlaylistId,
        update: PlaylistUpdate,
    ) -> ApiResult<PlaylistId> {
        let requester = Self::require_login(requester)?;
        let playlist = self.find_playlist(id).await?;
        self.authorize_owner(requester, &playlist).await?;

        let updated = self.db.update_playlist(id, update).await?;
        debug!("Updated playlist {} ({} songs)", updated.id, updated.songs.len());
        Ok(updated.id)
    }
}
