use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use folio::app::{self, App, AppEvent, DetailState, View};
use folio::catalog::CatalogClient;
use folio::config::Config;
use folio::storage::{Database, DatabaseError};
use folio::ui;

/// Get the config directory path (~/.config/folio/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("folio");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Terminal book catalog viewer for Project Gutenberg")]
struct Args {
    /// Start in the wishlist view
    #[arg(long)]
    wishlist: bool,

    /// Open a single book's details by catalog ID
    #[arg(long, value_name = "ID", conflicts_with = "wishlist")]
    book: Option<i64>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config = Config::load(&config_dir.join("config.toml")).context("Failed to load config")?;

    let db_path = config_dir.join("folio.db");

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of folio appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let wishlist = db.load_wishlist().await.context("Failed to load wishlist")?;
    tracing::info!(count = wishlist.len(), "Loaded wishlist");

    // Build the shared HTTP client and catalog API client
    let http = app::build_http_client(Duration::from_secs(config.request_timeout_secs))
        .context("Failed to build HTTP client")?;
    let catalog = CatalogClient::new(
        http,
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    );

    let mut app = App::new(db, catalog, wishlist);

    // Create event channel for background fetches
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Kick off the initial fetch for the requested view
    if let Some(book_id) = args.book {
        app.view = View::Detail;
        app.detail = DetailState::Loading { book_id };
        ui::spawn_book_fetch(&mut app, book_id, &event_tx);
    } else if args.wishlist {
        app.view = View::Wishlist;
        ui::spawn_default_fetch(&mut app, &event_tx);
    } else {
        ui::spawn_page_fetch(&mut app, 1, &event_tx);
    }

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
