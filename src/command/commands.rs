// Concrete song commands

use crate::command::error::{CommandError, CommandResult};
use crate::command::sequence;
use crate::model::{Playlist, Song};

/// A reversible edit of a playlist's song list
///
/// Each variant carries exactly what it needs to both apply and reverse
/// itself. Commands hold no reference to a store or playlist, so the same
/// value can be replayed against any playlist in the right state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongCommand {
    /// Insert `song` at `index`
    CreateSong { index: usize, song: Song },
    /// Remove `song`, expected at `index`
    RemoveSong { index: usize, song: Song },
    /// Move the song at `start` to `end`
    MoveSong { start: usize, end: usize },
    /// Replace the fields of the song at `index`
    UpdateSong { index: usize, old: Song, new: Song },
}

impl SongCommand {
    pub fn create(index: usize, song: Song) -> Self {
        SongCommand::CreateSong { index, song }
    }

    pub fn remove(index: usize, song: Song) -> Self {
        SongCommand::RemoveSong { index, song }
    }

    pub fn move_song(start: usize, end: usize) -> Self {
        SongCommand::MoveSong { start, end }
    }

    /// Build an update command, capturing the current fields of the song at
    /// `index` so the edit can be reversed later
    pub fn update(playlist: &Playlist, index: usize, new: Song) -> CommandResult<Self> {
        let old = playlist
            .songs
            .get(index)
            .cloned()
            .ok_or(CommandError::IndexOutOfRange {
                index,
                len: playlist.len(),
            })?;
        Ok(SongCommand::UpdateSong { index, old, new })
    }

    /// Check that `apply` can run against `playlist`
    pub fn validate_apply(&self, playlist: &Playlist) -> CommandResult<()> {
        let len = playlist.len();
        match self {
            SongCommand::CreateSong { index, .. } => check_insert(*index, len),
            SongCommand::RemoveSong { index, song } => check_expected(playlist, *index, song),
            SongCommand::MoveSong { start, end } => {
                check_index(*start, len)?;
                check_index(*end, len)
            }
            SongCommand::UpdateSong { index, .. } => check_index(*index, len),
        }
    }

    /// Check that `reverse` can run against `playlist`
    pub fn validate_reverse(&self, playlist: &Playlist) -> CommandResult<()> {
        let len = playlist.len();
        match self {
            SongCommand::CreateSong { index, song } => check_expected(playlist, *index, song),
            SongCommand::RemoveSong { index, .. } => check_insert(*index, len),
            SongCommand::MoveSong { start, end } => {
                check_index(*start, len)?;
                check_index(*end, len)
            }
            SongCommand::UpdateSong { index, .. } => check_index(*index, len),
        }
    }

    /// Human-readable description, used for undo/redo labels
    pub fn description(&self) -> String {
        match self {
            SongCommand::CreateSong { index, song } => {
                format!("Add \"{}\" at position {}", song.title, index + 1)
            }
            SongCommand::RemoveSong { index, song } => {
                format!("Remove \"{}\" from position {}", song.title, index + 1)
            }
            SongCommand::MoveSong { start, end } => {
                format!("Move song from position {} to {}", start + 1, end + 1)
            }
            SongCommand::UpdateSong { new, .. } => format!("Edit \"{}\"", new.title),
        }
    }
}

fn check_index(index: usize, len: usize) -> CommandResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(CommandError::IndexOutOfRange { index, len })
    }
}

fn check_insert(index: usize, len: usize) -> CommandResult<()> {
    if index <= len {
        Ok(())
    } else {
        Err(CommandError::IndexOutOfRange { index, len })
    }
}

fn check_expected(playlist: &Playlist, index: usize, expected: &Song) -> CommandResult<()> {
    check_index(index, playlist.len())?;
    let found = &playlist.songs[index];
    if found == expected {
        Ok(())
    } else {
        Err(CommandError::SongMismatch {
            index,
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

/// Apply `command` to the playlist's song list
///
/// The command is validated first; on error the playlist is left untouched.
pub fn apply(command: &SongCommand, playlist: &mut Playlist) -> CommandResult<()> {
    command.validate_apply(playlist)?;
    let songs = &mut playlist.songs;
    match command {
        SongCommand::CreateSong { index, song } => {
            sequence::insert_song(songs, *index, song.clone())
        }
        SongCommand::RemoveSong { index, .. } => sequence::remove_song(songs, *index).map(|_| ()),
        SongCommand::MoveSong { start, end } => sequence::move_song(songs, *start, *end),
        SongCommand::UpdateSong { index, new, .. } => {
            sequence::update_song(songs, *index, new).map(|_| ())
        }
    }
}

/// Undo the effect of `command` on the playlist's song list
///
/// The command is validated first; on error the playlist is left untouched.
pub fn reverse(command: &SongCommand, playlist: &mut Playlist) -> CommandResult<()> {
    command.validate_reverse(playlist)?;
    let songs = &mut playlist.songs;
    match command {
        SongCommand::CreateSong { index, .. } => sequence::remove_song(songs, *index).map(|_| ()),
        SongCommand::RemoveSong { index, song } => {
            sequence::insert_song(songs, *index, song.clone())
        }
        SongCommand::MoveSong { start, end } => sequence::move_song(songs, *end, *start),
        SongCommand::UpdateSong { index, old, .. } => {
            sequence::update_song(songs, *index, old).map(|_| ())
        }
    }
}
