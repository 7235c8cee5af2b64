// Validation errors raised before a command touches the song list

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that reject a command before it mutates anything
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// An index does not address a valid position in the song list
    #[error("Index {index} is out of range for a playlist of {len} songs")]
    IndexOutOfRange { index: usize, len: usize },

    /// The song at the index is not the one the command expects to remove
    #[error("Song at index {index} is \"{found}\", expected \"{expected}\"")]
    SongMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}
