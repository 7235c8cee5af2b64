use async_trait::async_trait;
use std::sync::Arc;

use super::{ApiResult, PlaylistApi};
use crate::backend::{StoreController, UserId};
use crate::model::{IdNamePair, NewPlaylist, Playlist, PlaylistId, PlaylistUpdate};

/// Store API served in-process by a `StoreController`
///
/// Every call is made on behalf of `user` (a guest when `None`), which plays
/// the role of the session cookie.
pub struct LocalPlaylistApi {
    controller: Arc<StoreController>,
    user: Option<UserId>,
}

impl LocalPlaylistApi {
    pub fn new(controller: Arc<StoreController>, user: Option<UserId>) -> Self {
        Self { controller, user }
    }

    pub fn guest(controller: Arc<StoreController>) -> Self {
        Self::new(controller, None)
    }
}

#[async_trait]
impl PlaylistApi for LocalPlaylistApi {
    async fn get_playlist(&self, id: &PlaylistId) -> ApiResult<Playlist> {
        self.controller.get_playlist(id).await
    }

    async fn update_playlist(
        &self,
        id: &PlaylistId,
        update: &PlaylistUpdate,
    ) -> ApiResult<PlaylistId> {
        self.controller
            .update_playlist(self.user.as_ref(), id, update.clone())
            .await
    }

    async fn create_playlist(&self, request: &NewPlaylist) -> ApiResult<Playlist> {
        self.controller
            .create_playlist(self.user.as_ref(), request.clone())
            .await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> ApiResult<()> {
        self.controller.delete_playlist(self.user.as_ref(), id).await
    }

    async fn get_playlist_pairs(&self) -> ApiResult<Vec<IdNamePair>> {
        self.controller.get_playlist_pairs(self.user.as_ref()).await
    }

    async fn get_all_playlists(&self) -> ApiResult<Vec<Playlist>> {
        self.controller.get_all_playlists().await
    }
}
