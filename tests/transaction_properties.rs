//! Property-based tests for song commands and the transaction stack
//!
//! Random edit sequences are performed against a playlist, then undone and
//! redone, checking that history reproduces every intermediate state.

use playlister::command::{SongCommand, TransactionStack, apply, reverse};
use playlister::model::{Playlist, PlaylistId, Song};
use proptest::prelude::*;

/// An edit whose indices are reduced modulo the playlist length at perform time
#[derive(Debug, Clone)]
enum Edit {
    Create(usize, Song),
    Remove(usize),
    Move(usize, usize),
    Update(usize, Song),
}

fn song_strategy() -> impl Strategy<Value = Song> {
    ("[A-Z][a-z]{0,8}", "[A-Z][a-z]{0,8}", 1950..2030i32, "[a-zA-Z0-9_-]{11}")
        .prop_map(|(title, artist, year, id)| Song::new(title, artist, year, id))
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), song_strategy()).prop_map(|(i, s)| Edit::Create(i, s)),
        any::<usize>().prop_map(Edit::Remove),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Edit::Move(a, b)),
        (any::<usize>(), song_strategy()).prop_map(|(i, s)| Edit::Update(i, s)),
    ]
}

fn playlist_strategy() -> impl Strategy<Value = Playlist> {
    prop::collection::vec(song_strategy(), 0..8).prop_map(|songs| {
        Playlist::new(PlaylistId::new("p"), "Mix", "joe@example.com").with_songs(songs)
    })
}

/// Turn an edit into a command that is valid for `playlist`, if any
fn to_command(edit: Edit, playlist: &Playlist) -> Option<SongCommand> {
    let len = playlist.songs.len();
    match edit {
        Edit::Create(i, song) => Some(SongCommand::create(i % (len + 1), song)),
        Edit::Remove(_) | Edit::Move(..) | Edit::Update(..) if len == 0 => None,
        Edit::Remove(i) => {
            let index = i % len;
            Some(SongCommand::remove(index, playlist.songs[index].clone()))
        }
        Edit::Move(a, b) => Some(SongCommand::move_song(a % len, b % len)),
        Edit::Update(i, song) => SongCommand::update(playlist, i % len, song).ok(),
    }
}

fn sort_key(song: &Song) -> (String, String, i32, String) {
    (
        song.title.clone(),
        song.artist.clone(),
        song.year,
        song.you_tube_id.clone(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn undo_all_then_redo_all_round_trips(
        initial in playlist_strategy(),
        edits in prop::collection::vec(edit_strategy(), 1..30),
    ) {
        let mut playlist = initial.clone();
        let mut stack = TransactionStack::new();
        let mut states = vec![playlist.songs.clone()];

        for edit in edits {
            if let Some(command) = to_command(edit, &playlist) {
                stack.perform(command, &mut playlist).unwrap();
                states.push(playlist.songs.clone());
            }
        }
        let performed = states.len() - 1;
        prop_assert_eq!(stack.undo_count(), performed);

        // Each undo steps back exactly one state
        for expected in states.iter().rev().skip(1) {
            prop_assert!(stack.undo(&mut playlist).unwrap().is_some());
            prop_assert_eq!(&playlist.songs, expected);
        }
        prop_assert!(!stack.can_undo());
        prop_assert_eq!(&playlist.songs, &initial.songs);

        for expected in states.iter().skip(1) {
            prop_assert!(stack.redo(&mut playlist).unwrap().is_some());
            prop_assert_eq!(&playlist.songs, expected);
        }
        prop_assert!(!stack.can_redo());
    }

    #[test]
    fn reverse_undoes_apply(initial in playlist_strategy(), edit in edit_strategy()) {
        let mut playlist = initial.clone();
        if let Some(command) = to_command(edit, &playlist) {
            apply(&command, &mut playlist).unwrap();
            reverse(&command, &mut playlist).unwrap();
        }
        prop_assert_eq!(playlist.songs, initial.songs);
    }

    #[test]
    fn move_only_reorders(
        initial in playlist_strategy(),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        prop_assume!(!initial.songs.is_empty());
        let len = initial.songs.len();
        let (start, end) = (a % len, b % len);

        let mut playlist = initial.clone();
        apply(&SongCommand::move_song(start, end), &mut playlist).unwrap();

        prop_assert_eq!(playlist.songs.len(), len);
        prop_assert_eq!(&playlist.songs[end], &initial.songs[start]);
        let mut before = initial.songs.clone();
        let mut after = playlist.songs.clone();
        before.sort_by_key(sort_key);
        after.sort_by_key(sort_key);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn perform_after_undo_discards_redo_branch(
        initial in playlist_strategy(),
        songs in prop::collection::vec(song_strategy(), 3..6),
        undos in 1..3usize,
    ) {
        let mut playlist = initial;
        let mut stack = TransactionStack::new();
        for song in songs {
            let end = playlist.songs.len();
            stack.perform(SongCommand::create(end, song), &mut playlist).unwrap();
        }
        for _ in 0..undos {
            stack.undo(&mut playlist).unwrap();
        }
        prop_assert_eq!(stack.redo_count(), undos);

        stack.perform(SongCommand::create(0, Song::untitled(2024)), &mut playlist).unwrap();
        prop_assert!(!stack.can_redo());
        prop_assert_eq!(stack.redo(&mut playlist).unwrap(), None);
    }
}
