// Playlist data model shared by the client session, the API layer and the backend

pub mod playlist;
pub mod song;

pub use playlist::{IdNamePair, NewPlaylist, Playlist, PlaylistId, PlaylistSort, PlaylistUpdate};
pub use song::Song;
