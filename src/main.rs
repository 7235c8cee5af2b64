use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use playlister::config::ClientConfig;
use playlister::messaging::create_notification_channel;
use playlister::model::{PlaylistId, PlaylistSort, Song};
use playlister::session::{PlaylistStore, StoreOptions, SyncStatus};
use playlister::HttpPlaylistApi;
use ringbuf::traits::Consumer;
use std::path::PathBuf;
use std::sync::Arc;

// Enough for every notification one command can raise
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "playlister")]
#[command(about = "Edit playlists on a playlist store server", long_about = None)]
struct Args {
    /// Config file (defaults to <config dir>/playlister/config.ron)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Server base URL, overrides the config file
    #[arg(short = 's', long)]
    server: Option<String>,

    /// Session token, overrides the config file
    #[arg(long)]
    token: Option<String>,

    /// Email of the logged-in user (owner of created playlists)
    #[arg(short = 'u', long)]
    email: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List your playlists (id and name)
    Pairs,
    /// List every playlist on the server
    Browse {
        /// Only playlists whose name or owner email contains this text
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SortOrder::Name)]
        sort: SortOrder,
    },
    /// Print one playlist
    Show { id: String },
    /// Create an empty playlist
    Create,
    /// Rename a playlist
    Rename { id: String, name: String },
    /// Delete a playlist
    Delete { id: String },
    /// Add a song (appends the placeholder song when no title is given)
    Add {
        id: String,
        /// Position to insert at (defaults to the end)
        #[arg(long)]
        index: Option<usize>,
        #[command(flatten)]
        fields: SongFields,
    },
    /// Remove the song at an index
    Remove { id: String, index: usize },
    /// Move a song from one index to another
    Move { id: String, from: usize, to: usize },
    /// Change fields of the song at an index
    Update {
        id: String,
        index: usize,
        #[command(flatten)]
        fields: SongFields,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortOrder {
    Name,
    NameDesc,
    Owner,
}

impl From<SortOrder> for PlaylistSort {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Name => PlaylistSort::NameAscending,
            SortOrder::NameDesc => PlaylistSort::NameDescending,
            SortOrder::Owner => PlaylistSort::Owner,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct SongFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    artist: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long = "youtube-id")]
    youtube_id: Option<String>,
}

impl SongFields {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.year.is_none()
            && self.youtube_id.is_none()
    }

    /// Overlay the given fields on `base`
    fn apply_to(self, base: &Song) -> Song {
        Song {
            title: self.title.unwrap_or_else(|| base.title.clone()),
            artist: self.artist.unwrap_or_else(|| base.artist.clone()),
            year: self.year.unwrap_or(base.year),
            you_tube_id: self.youtube_id.unwrap_or_else(|| base.you_tube_id.clone()),
        }
    }
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => match ClientConfig::default_path() {
            Ok(path) => ClientConfig::load_or_default(&path)?,
            Err(err) => {
                log::warn!("{}, using default settings", err);
                ClientConfig::default()
            }
        },
    };

    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(token) = &args.token {
        config.auth_token = Some(token.clone());
    }
    Ok(config)
}

fn print_playlist(store: &PlaylistStore) {
    let Some(list) = store.current_list() else {
        return;
    };
    println!("{} \"{}\" by {}", list.id, list.name, list.owner_email);
    for (index, song) in list.songs.iter().enumerate() {
        println!("  {:>3}. {}  {}", index, song, song.youtube_url());
    }
}

fn song_at(store: &PlaylistStore, index: usize) -> Result<Song> {
    store
        .current_list()
        .and_then(|list| list.songs.get(index))
        .cloned()
        .with_context(|| format!("No song at index {}", index))
}

async fn run(store: &mut PlaylistStore, command: Command) -> Result<()> {
    match command {
        Command::Pairs => {
            store.load_id_name_pairs().await?;
            for pair in store.id_name_pairs() {
                println!("{}  {}", pair.id, pair.name);
            }
        }
        Command::Browse { search, sort } => {
            store.load_all_playlists().await?;
            store.set_filtered_playlists(search.as_deref().unwrap_or(""), sort.into());
            for list in store.filtered_playlists() {
                println!(
                    "{}  {} ({} songs, {} listeners) by {}",
                    list.id,
                    list.name,
                    list.songs.len(),
                    list.listener_count,
                    list.owner_email
                );
            }
        }
        Command::Show { id } => {
            store.view_playlist(&PlaylistId::new(id)).await?;
            print_playlist(store);
        }
        Command::Create => {
            store.create_new_list().await?;
            print_playlist(store);
        }
        Command::Rename { id, name } => {
            store.change_list_name(&PlaylistId::new(id), &name).await?;
            print_playlist(store);
        }
        Command::Delete { id } => {
            store.delete_list(&PlaylistId::new(id)).await?;
            log::info!("Deleted, {} playlists left", store.all_playlists().len());
        }
        Command::Add { id, index, fields } => {
            store.set_current_list(&PlaylistId::new(id)).await?;
            if fields.is_empty() && index.is_none() {
                store.add_new_song()?;
            } else {
                let song = fields.apply_to(&Song::untitled(chrono::Local::now().year()));
                let end = store.current_list().map_or(0, |list| list.len());
                store.add_create_song_transaction(index.unwrap_or(end), song)?;
            }
            print_playlist(store);
        }
        Command::Remove { id, index } => {
            store.set_current_list(&PlaylistId::new(id)).await?;
            let song = song_at(store, index)?;
            store.add_remove_song_transaction(index, song)?;
            print_playlist(store);
        }
        Command::Move { id, from, to } => {
            store.set_current_list(&PlaylistId::new(id)).await?;
            store.add_move_song_transaction(from, to)?;
            print_playlist(store);
        }
        Command::Update { id, index, fields } => {
            if fields.is_empty() {
                bail!("Nothing to update, pass at least one of --title, --artist, --year, --youtube-id");
            }
            store.set_current_list(&PlaylistId::new(id)).await?;
            let song = fields.apply_to(&song_at(store, index)?);
            store.add_update_song_transaction(index, song)?;
            print_playlist(store);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(&args)?;
    log::debug!("Using server {}", config.server_url);

    let api = Arc::new(HttpPlaylistApi::new(&config)?);
    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let mut store = PlaylistStore::new(api, StoreOptions::from(&config), notification_tx)?;
    store.set_user_email(args.email.clone());

    let result = run(&mut store, args.command).await;

    // Edits are persisted in the background; wait for them before exiting
    store.settle().await;
    while let Some(notification) = notification_rx.try_pop() {
        eprintln!("{}", notification);
    }
    result?;
    if let SyncStatus::Failed(reason) = store.sync_status() {
        bail!("Playlist was changed locally but not saved: {}", reason);
    }
    Ok(())
}
