// Command pattern for playlist editing with undo/redo
//
// Every change to the song list of the open playlist goes through a SongCommand.
//
// Architecture:
// - SongCommand: enum of the four reversible edits (create, remove, move, update)
// - apply()/reverse(): free functions mutating a Playlist's song list in place
// - sequence: the low-level splice/rotate/overwrite operations on a song list
// - TransactionStack: one history array plus a cursor separating undoable
//   commands from redoable ones
//
// Commands never talk to the network. The session persists the playlist after
// every perform/undo/redo, so each step is individually durable.

pub mod commands;
pub mod error;
pub mod manager;
pub mod sequence;

pub use commands::{SongCommand, apply, reverse};
pub use error::{CommandError, CommandResult};
pub use manager::TransactionStack;
