// Song list operations invoked by the commands
//
// Each function checks its indices first and leaves the list untouched when
// they are out of range.

use crate::command::error::{CommandError, CommandResult};
use crate::model::Song;

fn check_position(songs: &[Song], index: usize) -> CommandResult<()> {
    if index < songs.len() {
        Ok(())
    } else {
        Err(CommandError::IndexOutOfRange {
            index,
            len: songs.len(),
        })
    }
}

/// Insert `song` at `index`, shifting later songs right. `index == len` appends.
pub fn insert_song(songs: &mut Vec<Song>, index: usize, song: Song) -> CommandResult<()> {
    if index > songs.len() {
        return Err(CommandError::IndexOutOfRange {
            index,
            len: songs.len(),
        });
    }
    songs.insert(index, song);
    Ok(())
}

/// Remove and return the song at `index`
pub fn remove_song(songs: &mut Vec<Song>, index: usize) -> CommandResult<Song> {
    check_position(songs, index)?;
    Ok(songs.remove(index))
}

/// Move the song at `start` to `end`, shifting the songs in between by one
///
/// Moving forward shifts `[start, end)` left; moving backward shifts
/// `(end, start]` right. The displaced songs keep their relative order.
pub fn move_song(songs: &mut [Song], start: usize, end: usize) -> CommandResult<()> {
    check_position(songs, start)?;
    check_position(songs, end)?;

    if start < end {
        songs[start..=end].rotate_left(1);
    } else if start > end {
        songs[end..=start].rotate_right(1);
    }
    Ok(())
}

/// Overwrite the four fields of the song at `index`, returning the previous values
pub fn update_song(songs: &mut [Song], index: usize, fields: &Song) -> CommandResult<Song> {
    check_position(songs, index)?;
    Ok(std::mem::replace(&mut songs[index], fields.clone()))
}
