// In-memory storage adapter

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::database::{DatabaseManager, DbError, DbResult, NewUser, User, UserId};
use crate::model::{NewPlaylist, Playlist, PlaylistId, PlaylistUpdate};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    playlists: Vec<Playlist>,
}

/// Storage adapter keeping everything in process memory
///
/// Records are kept in insertion order, so listings come back oldest first
/// like the document store does.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseManager for MemoryDatabase {
    async fn create_user(&self, user: NewUser) -> DbResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DbError::DuplicateEmail(user.email));
        }

        let user = User {
            id: UserId::generate(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            playlists: Vec::new(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: &UserId) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: User) -> DbResult<User> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DbError::NotFound(format!("User {}", user.id)))?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| &u.id != id);
        if tables.users.len() == before {
            return Err(DbError::NotFound(format!("User {}", id)));
        }
        Ok(())
    }

    async fn add_playlist_to_user(
        &self,
        user_id: &UserId,
        playlist_id: &PlaylistId,
    ) -> DbResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| DbError::NotFound(format!("User {}", user_id)))?;
        user.playlists.push(playlist_id.clone());
        Ok(user.clone())
    }

    async fn delete_all_users(&self) -> DbResult<()> {
        self.tables.write().await.users.clear();
        Ok(())
    }

    async fn create_playlist(&self, playlist: NewPlaylist) -> DbResult<Playlist> {
        let mut created = Playlist::new(PlaylistId::generate(), playlist.name, playlist.owner_email)
            .with_songs(playlist.songs);
        created.created_at = Some(Utc::now());

        self.tables.write().await.playlists.push(created.clone());
        Ok(created)
    }

    async fn find_playlist_by_id(&self, id: &PlaylistId) -> DbResult<Option<Playlist>> {
        let tables = self.tables.read().await;
        Ok(tables.playlists.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_playlists_by_owner_email(&self, email: &str) -> DbResult<Vec<Playlist>> {
        let tables = self.tables.read().await;
        Ok(tables
            .playlists
            .iter()
            .filter(|p| p.is_owned_by(email))
            .cloned()
            .collect())
    }

    async fn get_all_playlists(&self) -> DbResult<Vec<Playlist>> {
        Ok(self.tables.read().await.playlists.clone())
    }

    async fn update_playlist(&self, id: &PlaylistId, update: PlaylistUpdate) -> DbResult<Playlist> {
        let mut tables = self.tables.write().await;
        let playlist = tables
            .playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DbError::NotFound(format!("Playlist {}", id)))?;
        playlist.name = update.name;
        playlist.songs = update.songs;
        Ok(playlist.clone())
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.playlists.len();
        tables.playlists.retain(|p| &p.id != id);
        if tables.playlists.len() == before {
            return Err(DbError::NotFound(format!("Playlist {}", id)));
        }
        for user in tables.users.iter_mut() {
            user.playlists.retain(|p| p != id);
        }
        Ok(())
    }

    async fn delete_all_playlists(&self) -> DbResult<()> {
        let mut tables = self.tables.write().await;
        tables.playlists.clear();
        for user in tables.users.iter_mut() {
            user.playlists.clear();
        }
        Ok(())
    }
}
