// JSON bodies exchanged with the store server

use serde::{Deserialize, Serialize};

use crate::model::{IdNamePair, Playlist, PlaylistId, PlaylistUpdate};

/// Body of `PUT /store/playlist/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub playlist: PlaylistUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    #[serde(default)]
    pub success: bool,
    pub playlist: Playlist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylistResponse {
    #[serde(default)]
    pub success: bool,
    pub id: PlaylistId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub playlist: Playlist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdNamePairsResponse {
    #[serde(default)]
    pub success: bool,
    pub id_name_pairs: Vec<IdNamePair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsResponse {
    #[serde(default)]
    pub success: bool,
    pub playlists: Vec<Playlist>,
}

/// Error body; the server uses a different key depending on the endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_message: Option<String>,
    pub error: Option<String>,
    pub description: Option<String>,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.error_message
            .or(self.description)
            .or(self.error)
            .or(self.message)
    }
}
