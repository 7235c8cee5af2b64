// Playlister - playlist editing client with undo/redo and background sync

pub mod api;
pub mod backend;
pub mod command;
pub mod config;
pub mod messaging;
pub mod model;
pub mod session;

// Re-export commonly used types for convenience
pub use api::{ApiError, HttpPlaylistApi, LocalPlaylistApi, PlaylistApi};
pub use backend::{DatabaseManager, MemoryDatabase, StoreController};
pub use command::{CommandError, SongCommand, TransactionStack};
pub use config::ClientConfig;
pub use messaging::{Notification, NotificationCategory, create_notification_channel};
pub use model::{IdNamePair, Playlist, PlaylistId, PlaylistSort, Song};
pub use session::{PlaylistStore, StoreError, StoreOptions, SyncStatus};
