use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use whatapi::{Client, Config};

#[derive(Parser)]
#[command(name = "whatapi", version, about = "Gazelle tracker JSON API client")]
struct Cli {
    #[command(flatten)]
    conn: Connection,
    /// Print the decoded API response as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Connection {
    /// Tracker root URL
    #[arg(long, env = "WHATAPI_URL")]
    url: String,
    /// Account name
    #[arg(short, long, env = "WHATAPI_USERNAME")]
    username: String,
    /// Account password
    #[arg(short, long, env = "WHATAPI_PASSWORD", hide_env_values = true)]
    password: String,
    /// Cache and cookie database (defaults to the user cache directory)
    #[arg(long, env = "WHATAPI_DB", value_name = "PATH")]
    db: Option<PathBuf>,
    /// Disable the response cache and saved sessions
    #[arg(long, conflicts_with = "db")]
    no_cache: bool,
    /// Seconds a cached response stays fresh
    #[arg(long, env = "WHATAPI_CACHE_SECS", default_value = "3600")]
    cache_secs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Log in (or resume the saved session) and show the account
    Login,
    /// End the session on the tracker
    Logout,
    /// Show an artist and their releases
    Artist {
        /// Artist ID
        id: u64,
    },
    /// Show a single torrent and its release
    Torrent {
        /// Torrent ID
        id: u64,
    },
    /// Show a release and its torrents
    Group {
        /// Torrent group ID
        id: u64,
    },
    /// Search torrents
    Search {
        /// Search string
        query: String,
        /// Result page
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show the top 10 lists
    Top {
        /// What to rank
        #[arg(short, long, value_enum, default_value_t = TopKind::Torrents)]
        kind: TopKind,
        /// Entries per list (10, 100 or 250)
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Print the download URL of a torrent
    DownloadUrl {
        /// Torrent ID
        id: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TopKind {
    Torrents,
    Tags,
    Users,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut client = connect(&cli.conn)?;
    let json = cli.json;
    match cli.command {
        Command::Login => cmd_login(&mut client, json),
        Command::Logout => cmd_logout(&mut client),
        Command::Artist { id } => cmd_artist(&client, id, json),
        Command::Torrent { id } => cmd_torrent(&client, id, json),
        Command::Group { id } => cmd_group(&client, id, json),
        Command::Search { query, page } => cmd_search(&client, &query, page, json),
        Command::Top { kind, limit } => cmd_top(&client, kind, limit, json),
        Command::DownloadUrl { id } => cmd_download_url(&client, id),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn connect(conn: &Connection) -> Result<Client> {
    let mut config = Config::new(&conn.url);
    config.cache_ttl = Duration::from_secs(conn.cache_secs);
    if !conn.no_cache {
        let path = match &conn.db {
            Some(p) => p.clone(),
            None => Config::default_database_path()?,
        };
        config = config.with_database(path);
    }

    let mut client = Client::from_config(&config).context("failed to create client")?;
    client
        .login(&conn.username, &conn.password)
        .context("login failed")?;
    Ok(client)
}

// ── login / logout ──

fn cmd_login(client: &mut Client, json: bool) -> Result<()> {
    let account = client.account()?;
    if json {
        return print_json(&account);
    }
    println!("Logged in as: {} (id={})", account.username, account.id);
    println!("Class:        {}", account.user_stats.class);
    println!(
        "Up/Down:      {} / {} (ratio {:.2})",
        account.user_stats.uploaded, account.user_stats.downloaded, account.user_stats.ratio
    );
    Ok(())
}

fn cmd_logout(client: &mut Client) -> Result<()> {
    client.logout()?;
    println!("Logged out.");
    Ok(())
}

// ── artist / group ──

fn cmd_artist(client: &Client, id: u64, json: bool) -> Result<()> {
    let artist = client.artist(id, &[])?;
    if json {
        return print_json(&artist);
    }
    println!("Artist:   {} (id={})", artist.name, artist.id);
    println!(
        "Releases: {}  Torrents: {}",
        artist.statistics.num_groups, artist.statistics.num_torrents
    );
    if !artist.tags.is_empty() {
        let tags: Vec<&str> = artist.tags.iter().map(|t| t.name.as_str()).collect();
        println!("Tags:     {}", tags.join(", "));
    }
    println!();
    for g in &artist.torrent_groups {
        println!("  [{}] {} ({})", g.group_id, g.group_name, g.group_year);
    }
    Ok(())
}

fn cmd_torrent(client: &Client, id: u64, json: bool) -> Result<()> {
    let detail = client.torrent(id, &[])?;
    if json {
        return print_json(&detail);
    }
    let (g, t) = (&detail.group, &detail.torrent);
    println!("Release: {} (id={}, {})", g.name, g.id, g.year);
    println!("Torrent: [{}] {} {} {}", t.id, t.media, t.format, t.encoding);
    println!(
        "Seeders: {}  Leechers: {}  Snatched: {}  Size: {} bytes",
        t.seeders, t.leechers, t.snatched, t.size
    );
    Ok(())
}

fn cmd_group(client: &Client, id: u64, json: bool) -> Result<()> {
    let group = client.torrent_group(id, &[])?;
    if json {
        return print_json(&group);
    }
    let g = &group.group;
    println!("Release: {} (id={}, {})", g.name, g.id, g.year);
    if !g.record_label.is_empty() {
        println!("Label:   {} {}", g.record_label, g.catalogue_number);
    }
    println!();
    for t in &group.torrents {
        println!(
            "  [{}] {} {} {} ({} seeders, {} bytes)",
            t.id, t.media, t.format, t.encoding, t.seeders, t.size
        );
    }
    Ok(())
}

// ── search / top ──

fn cmd_search(client: &Client, query: &str, page: u32, json: bool) -> Result<()> {
    let page = page.to_string();
    let result = client.search_torrents(query, &[("page", page.as_str())])?;
    if json {
        return print_json(&result);
    }
    println!("Page {} of {}\n", result.current_page, result.pages);
    for g in &result.results {
        println!("  [{}] {} - {} ({})", g.group_id, g.artist, g.group_name, g.group_year);
    }
    Ok(())
}

fn cmd_top(client: &Client, kind: TopKind, limit: u32, json: bool) -> Result<()> {
    let limit = limit.to_string();
    let params = [("limit", limit.as_str())];
    match kind {
        TopKind::Torrents => {
            let lists = client.top_ten_torrents(&params)?;
            if json {
                return print_json(&lists);
            }
            print_top_torrents(&lists);
        }
        TopKind::Tags => {
            let lists = client.top_ten_tags(&params)?;
            if json {
                return print_json(&lists);
            }
            for list in &lists {
                println!("{}", list.caption);
                for (rank, t) in list.results.iter().enumerate() {
                    println!("  {:>3}. {} ({} uses)", rank + 1, t.name, t.uses);
                }
                println!();
            }
        }
        TopKind::Users => {
            let lists = client.top_ten_users(&params)?;
            if json {
                return print_json(&lists);
            }
            for list in &lists {
                println!("{}", list.caption);
                for (rank, u) in list.results.iter().enumerate() {
                    println!(
                        "  {:>3}. {} (up {} / down {}, {} uploads)",
                        rank + 1,
                        u.username,
                        u.uploaded,
                        u.downloaded,
                        u.num_uploads
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}

fn print_top_torrents(lists: &whatapi::types::TopTenTorrents) {
    for list in lists {
        println!("{}", list.caption);
        for (rank, t) in list.results.iter().enumerate() {
            println!(
                "  {:>3}. [{}] {} - {} [{} {}]",
                rank + 1,
                t.torrent_id,
                t.artist,
                t.group_name,
                t.format,
                t.encoding
            );
        }
        println!();
    }
}

// ── download ──

fn cmd_download_url(client: &Client, id: u64) -> Result<()> {
    println!("{}", client.download_url(id)?);
    Ok(())
}
