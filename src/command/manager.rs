// TransactionStack - undo/redo history for the open playlist

use crate::command::commands::{self, SongCommand};
use crate::command::error::CommandResult;
use crate::model::Playlist;
use log::debug;

/// Undo/redo history of song commands
///
/// The history is a single array plus a cursor:
/// - `transactions[..cursor]` have been executed and can be undone
/// - `transactions[cursor..]` have been undone and can be redone
///
/// Performing a new command truncates everything above the cursor, so there
/// is never more than one redo branch.
///
/// # Memory Management
/// An optional history limit drops the oldest executed command once the
/// number of executed commands exceeds it. Without a limit the history grows
/// for as long as the playlist stays open.
#[derive(Debug, Default)]
pub struct TransactionStack {
    transactions: Vec<SongCommand>,
    cursor: usize,
    max_history: Option<usize>,
}

impl TransactionStack {
    /// Create an empty, unbounded stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack keeping at most `max_history` undoable commands
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            transactions: Vec::with_capacity(max_history),
            cursor: 0,
            max_history: Some(max_history),
        }
    }

    /// Execute a command and push it onto the history
    ///
    /// This will:
    /// 1. Validate the command against the playlist
    /// 2. Drop the redo suffix above the cursor
    /// 3. Apply the command and push it
    /// 4. Trim history if needed
    ///
    /// # Errors
    /// Returns the validation error if the command does not fit the playlist.
    /// The stack and the playlist are unchanged in that case.
    pub fn perform(&mut self, command: SongCommand, playlist: &mut Playlist) -> CommandResult<()> {
        command.validate_apply(playlist)?;

        if self.cursor < self.transactions.len() {
            debug!(
                "Discarding {} redoable transaction(s)",
                self.transactions.len() - self.cursor
            );
            self.transactions.truncate(self.cursor);
        }

        commands::apply(&command, playlist)?;
        debug!("Performed: {}", command.description());
        self.transactions.push(command);
        self.cursor += 1;

        if let Some(max) = self.max_history
            && self.cursor > max
        {
            self.transactions.remove(0);
            self.cursor -= 1;
        }

        Ok(())
    }

    /// Reverse the command just below the cursor
    ///
    /// Returns the description of the undone command, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, playlist: &mut Playlist) -> CommandResult<Option<String>> {
        if !self.can_undo() {
            return Ok(None);
        }

        let command = &self.transactions[self.cursor - 1];
        commands::reverse(command, playlist)?;
        self.cursor -= 1;

        let description = command.description();
        debug!("Undid: {}", description);
        Ok(Some(description))
    }

    /// Re-apply the command just above the cursor
    ///
    /// Returns the description of the redone command, or `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self, playlist: &mut Playlist) -> CommandResult<Option<String>> {
        if !self.can_redo() {
            return Ok(None);
        }

        let command = &self.transactions[self.cursor];
        commands::apply(command, playlist)?;
        self.cursor += 1;

        let description = command.description();
        debug!("Redid: {}", description);
        Ok(Some(description))
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        self.cursor < self.transactions.len()
    }

    /// Description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.transactions.get(i))
            .map(SongCommand::description)
    }

    /// Description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.transactions
            .get(self.cursor)
            .map(SongCommand::description)
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.transactions.clear();
        self.cursor = 0;
    }

    /// Number of commands that can be undone
    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    /// Number of commands that can be redone
    pub fn redo_count(&self) -> usize {
        self.transactions.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
