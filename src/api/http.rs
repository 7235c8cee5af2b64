use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::wire::{
    CreatePlaylistResponse, ErrorResponse, IdNamePairsResponse, PlaylistResponse,
    PlaylistsResponse, UpdatePlaylistRequest, UpdatePlaylistResponse,
};
use super::{ApiError, ApiResult, PlaylistApi};
use crate::config::ClientConfig;
use crate::model::{IdNamePair, NewPlaylist, Playlist, PlaylistId, PlaylistUpdate};

/// Store API client speaking JSON over HTTP
pub struct HttpPlaylistApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPlaylistApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let cookie = HeaderValue::from_str(&format!("token={}", token))
                .map_err(|e| ApiError::BadRequest(format!("Invalid auth token: {}", e)))?;
            headers.insert(COOKIE, cookie);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/store{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, operation: &str) -> ApiResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, operation))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, operation))?;
        debug!("{} -> HTTP {}", operation, status.as_u16());

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(ErrorResponse::into_message)
                .unwrap_or_else(|| body.clone());
            warn!("{} failed with HTTP {}: {}", operation, status.as_u16(), message);
            return Err(error_for_status(status, message));
        }

        serde_json::from_str(&body).map_err(|e| {
            ApiError::Transport(format!("Failed to {}: unexpected response body: {}", operation, e))
        })
    }
}

fn transport_error(e: reqwest::Error, operation: &str) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport(format!("Failed to {}: request timed out", operation))
    } else if e.is_connect() {
        ApiError::Transport(format!("Failed to {}: connection error: {}", operation, e))
    } else {
        ApiError::Transport(format!("Failed to {}: {}", operation, e))
    }
}

/// Map a non-success status to an error
///
/// The server answers ownership failures with 400 and an
/// "authentication error" / "UNAUTHORIZED" message, so those are recognised
/// by their message as well.
pub(crate) fn error_for_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
        StatusCode::BAD_REQUEST
            if message.contains("UNAUTHORIZED") || message.contains("authentication error") =>
        {
            ApiError::Unauthorized(message)
        }
        StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
        _ => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl PlaylistApi for HttpPlaylistApi {
    async fn get_playlist(&self, id: &PlaylistId) -> ApiResult<Playlist> {
        let builder = self.request(Method::GET, &format!("/playlist/{}", id));
        let response: PlaylistResponse = self.send(builder, "get playlist").await?;
        Ok(response.playlist)
    }

    async fn update_playlist(
        &self,
        id: &PlaylistId,
        update: &PlaylistUpdate,
    ) -> ApiResult<PlaylistId> {
        let body = UpdatePlaylistRequest {
            playlist: update.clone(),
        };
        let builder = self
            .request(Method::PUT, &format!("/playlist/{}", id))
            .json(&body);
        let response: UpdatePlaylistResponse = self.send(builder, "update playlist").await?;
        Ok(response.id)
    }

    async fn create_playlist(&self, request: &NewPlaylist) -> ApiResult<Playlist> {
        let builder = self.request(Method::POST, "/playlist").json(request);
        let response: CreatePlaylistResponse = self.send(builder, "create playlist").await?;
        Ok(response.playlist)
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, &format!("/playlist/{}", id));
        let _: serde_json::Value = self.send(builder, "delete playlist").await?;
        Ok(())
    }

    async fn get_playlist_pairs(&self) -> ApiResult<Vec<IdNamePair>> {
        let builder = self.request(Method::GET, "/playlistpairs");
        let response: IdNamePairsResponse = self.send(builder, "get playlist pairs").await?;
        Ok(response.id_name_pairs)
    }

    async fn get_all_playlists(&self) -> ApiResult<Vec<Playlist>> {
        let builder = self.request(Method::GET, "/playlists");
        let response: PlaylistsResponse = self.send(builder, "get playlists").await?;
        Ok(response.playlists)
    }
}
