//! songbook - terminal client for songbook-server

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use songbook_cli::render::{song_table, stats_report};
use songbook_cli::{calculate_pagination, SearchField, SongCatalog, SongbookClient, DEFAULT_PAGE_SIZE};
use songbook_common::{NewSong, SongPatch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for songbook
#[derive(Parser, Debug)]
#[command(name = "songbook")]
#[command(about = "Browse and edit a songbook-server catalog")]
#[command(version)]
struct Cli {
    /// Base URL of songbook-server
    #[arg(long, global = true, env = "SONGBOOK_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List songs, newest first
    List {
        /// Field the search term is matched against
        #[arg(long, value_enum, default_value_t = SearchField::Title)]
        field: SearchField,

        /// Case-insensitive substring to search for
        #[arg(short, long, default_value = "")]
        search: String,

        /// Page to show (1-indexed)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Songs per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: usize,
    },

    /// Add a song
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        artist: String,

        #[arg(long)]
        album: Option<String>,

        #[arg(long)]
        genre: Option<String>,
    },

    /// Change fields of an existing song
    Edit(EditArgs),

    /// Delete a song
    Delete {
        /// Song id
        id: String,
    },

    /// Show catalog statistics
    Stats,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Song id
    id: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    artist: Option<String>,

    #[arg(long, conflicts_with = "clear_album")]
    album: Option<String>,

    #[arg(long, conflicts_with = "clear_genre")]
    genre: Option<String>,

    /// Remove the album
    #[arg(long)]
    clear_album: bool,

    /// Remove the genre
    #[arg(long)]
    clear_genre: bool,
}

impl EditArgs {
    fn patch(&self) -> SongPatch {
        let mut patch = SongPatch::default();
        if let Some(title) = &self.title {
            patch = patch.title(title.as_str());
        }
        if let Some(artist) = &self.artist {
            patch = patch.artist(artist.as_str());
        }
        if self.clear_album || self.album.is_some() {
            patch = patch.album(self.album.clone());
        }
        if self.clear_genre || self.genre.is_some() {
            patch = patch.genre(self.genre.clone());
        }
        patch
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = SongbookClient::new(&cli.api_url)?;
    let mut catalog = SongCatalog::new();

    match cli.command {
        Command::List { field, search, page, per_page } => {
            catalog
                .refresh(&client)
                .await
                .context("Failed to fetch songs")?;

            let matching = catalog.filter(field, &search);
            let pagination = calculate_pagination(matching.len(), page, per_page);

            print!("{}", song_table(pagination.slice(&matching), pagination.offset + 1));
            if pagination.total_pages > 1 {
                println!(
                    "Page {} of {} ({} songs)",
                    pagination.page,
                    pagination.total_pages,
                    matching.len()
                );
            }
        }
        Command::Add { title, artist, album, genre } => {
            let new_song = NewSong { title: Some(title), artist: Some(artist), album, genre };
            let song = catalog
                .create(&client, &new_song)
                .await
                .context("Failed to create song")?;
            println!("Created {} - {} ({})", song.artist, song.title, song.id);
        }
        Command::Edit(args) => {
            let patch = args.patch();
            if patch.is_empty() {
                bail!("Nothing to change; pass at least one field");
            }
            let song = catalog
                .update(&client, &args.id, &patch)
                .await
                .context("Failed to update song")?;
            println!("Updated {} - {} ({})", song.artist, song.title, song.id);
        }
        Command::Delete { id } => {
            catalog
                .delete(&client, &id)
                .await
                .context("Failed to delete song")?;
            println!("Deleted {}", id);
        }
        Command::Stats => {
            let stats = client
                .stats_summary()
                .await
                .context("Failed to fetch statistics")?;
            print!("{}", stats_report(&stats));
        }
    }

    Ok(())
}
