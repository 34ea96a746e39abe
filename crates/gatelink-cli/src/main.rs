//! Gatelink CLI - administration tool for a self-hosted gated short-link
//! service.
//!
//! This binary drives the core store for operators: creating and
//! inspecting entries, scoped deletion, and bulk clearing. The serving
//! front end lives elsewhere; this tool only talks to the database.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use gatelink_core::storage::{EntryStore, SqliteStore};
use gatelink_core::{Claims, Entry, GatelinkError, VERSION};

mod config;

/// Gatelink - self-hosted gated short-link service
#[derive(Parser)]
#[command(name = "gatelink")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the entry database
    #[arg(short, long, global = true, env = "GATELINK_DB")]
    db: Option<String>,

    /// Token identifying the calling principal
    #[arg(short, long, global = true, env = "GATELINK_TOKEN")]
    token: Option<String>,

    /// Override ownership checks
    #[arg(long, global = true)]
    admin: bool,

    /// Config path override
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level filter (e.g. "debug", "gatelink_core=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the entry database
    Init {
        /// Path where the database will be created
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },

    /// Create an entry, or modify an existing one
    Set {
        /// The public path the entry is served under
        #[arg(value_name = "NAME")]
        name: String,

        /// Target URL (required when creating)
        #[arg(value_name = "URL")]
        url: Option<String>,

        /// Redirect to the target instead of proxying it
        #[arg(long, conflicts_with = "proxy")]
        redirect: bool,

        /// Proxy the target instead of redirecting
        #[arg(long)]
        proxy: bool,

        /// Serve an uploaded file instead of the URL
        #[arg(long, value_name = "PATH")]
        filename: Option<String>,

        /// MIME type to serve as Content-Type
        #[arg(long, value_name = "MIME")]
        content_type: Option<String>,

        /// Entry to redirect to when access is denied
        #[arg(long, value_name = "NAME")]
        deny_redirect: Option<String>,

        /// Expire the entry after this many accesses
        #[arg(long, value_name = "COUNT", conflicts_with = "no_expire")]
        expire_after: Option<u64>,

        /// Remove a previously set access limit
        #[arg(long)]
        no_expire: bool,

        /// Replace the blacklist with these rule lines
        #[arg(long, value_name = "RULE")]
        blacklist: Vec<String>,

        /// Put the blacklist into training mode
        #[arg(long, conflicts_with = "no_train")]
        train: bool,

        /// Take the blacklist out of training mode
        #[arg(long)]
        no_train: bool,
    },

    /// Show a single entry
    Show {
        /// Entry name
        #[arg(value_name = "NAME")]
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries, most recent first
    List {
        /// Only entries owned by this token
        #[arg(long, value_name = "TOKEN")]
        owner: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry
    Rm {
        /// Entry name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Delete every entry the caller owns (all entries with --admin)
    Clear,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Init { ref path }) => {
            let target = match path {
                Some(path) => PathBuf::from(path),
                None => resolve_db_path(&cli, &config)?,
            };
            open_store_at(&target)?;
            if !cli.quiet {
                println!("Initialized entry database at {}", target.display());
            }
        }
        Some(Commands::Set {
            ref name,
            ref url,
            redirect,
            proxy,
            ref filename,
            ref content_type,
            ref deny_redirect,
            expire_after,
            no_expire,
            ref blacklist,
            train,
            no_train,
        }) => {
            let store = open_store(&cli, &config)?;
            let claims = resolve_claims(&cli, &config)?;

            let mut entry = match store.get(name) {
                Ok(existing) => existing,
                Err(GatelinkError::NotFound(_)) => {
                    let url = url.clone().ok_or_else(|| {
                        anyhow::anyhow!("New entry {:?} needs a target URL", name)
                    })?;
                    Entry::new(name, url)
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(url) = url {
                entry.url = url.clone();
            }
            if redirect {
                entry.redirect = true;
            }
            if proxy {
                entry.redirect = false;
            }
            if let Some(filename) = filename {
                entry.filename = Some(filename.clone());
            }
            if let Some(content_type) = content_type {
                entry.content_type = Some(content_type.clone());
            }
            if let Some(deny_redirect) = deny_redirect {
                entry.deny_redirect = Some(deny_redirect.clone());
            }
            if let Some(limit) = expire_after {
                entry.expires = true;
                entry.expire_after = limit;
            }
            if no_expire {
                entry.expires = false;
            }
            if !blacklist.is_empty() {
                entry.blacklist.rules = blacklist.clone();
            }
            if train {
                entry.set_training(true);
            }
            if no_train {
                entry.set_training(false);
            }

            store.update(&entry, &claims)?;
            if !cli.quiet {
                println!("Saved entry {}", entry);
            }
        }
        Some(Commands::Show { ref name, json }) => {
            let store = open_store(&cli, &config)?;
            let entry = store.get(name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?);
            } else {
                print_entry(&entry);
            }
        }
        Some(Commands::List { ref owner, json }) => {
            let store = open_store(&cli, &config)?;
            let entries = store.list(owner.as_deref())?;
            if json {
                let values: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                if !cli.quiet {
                    println!("NAME | CREATED | ACCESSES | TARGET");
                }
                for entry in &entries {
                    let expired = if entry.is_expired() { " (expired)" } else { "" };
                    println!(
                        "{} | {} | {}{} | {}",
                        entry.name, entry.creation, entry.access_count, expired, entry.url
                    );
                }
            }
        }
        Some(Commands::Rm { ref name }) => {
            let store = open_store(&cli, &config)?;
            let claims = resolve_claims(&cli, &config)?;
            store.remove(name, &claims)?;
            if !cli.quiet {
                println!("Removed entry {:?}", name);
            }
        }
        Some(Commands::Clear) => {
            let store = open_store(&cli, &config)?;
            let claims = resolve_claims(&cli, &config)?;
            store.clear(&claims)?;
            if !cli.quiet {
                if claims.admin {
                    println!("Cleared all entries");
                } else {
                    println!("Cleared entries owned by the current token");
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "gatelink", &mut std::io::stdout());
        }
        None => {
            println!("Gatelink v{}", VERSION);
            println!("\nRun `gatelink --help` for usage information.");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<config::GatelinkConfig> {
    let path = match cli.config {
        Some(ref path) => PathBuf::from(path),
        None => config::default_config_path()?,
    };
    config::load(&path)
}

fn resolve_db_path(cli: &Cli, config: &config::GatelinkConfig) -> anyhow::Result<PathBuf> {
    if let Some(ref db) = cli.db {
        return Ok(PathBuf::from(db));
    }
    if let Some(ref path) = config.store.path {
        return Ok(PathBuf::from(path));
    }
    config::default_store_path()
}

fn open_store(cli: &Cli, config: &config::GatelinkConfig) -> anyhow::Result<SqliteStore> {
    let path = resolve_db_path(cli, config)?;
    open_store_at(&path)
}

fn open_store_at(path: &Path) -> anyhow::Result<SqliteStore> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }
    Ok(SqliteStore::open(path)?)
}

fn resolve_claims(cli: &Cli, config: &config::GatelinkConfig) -> anyhow::Result<Claims> {
    let token = cli
        .token
        .clone()
        .or_else(|| config.auth.token.clone());

    if cli.admin {
        return Ok(Claims::admin(token.unwrap_or_default()));
    }

    let token = token.ok_or_else(|| {
        anyhow::anyhow!("No token provided. Use --token, GATELINK_TOKEN, or the config file.")
    })?;
    Ok(Claims::with_token(token))
}

fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "name": entry.name,
        "url": entry.url,
        "filename": entry.filename,
        "content_type": entry.content_type,
        "redirect": entry.redirect,
        "creation": entry.creation,
        "deny_redirect": entry.deny_redirect,
        "blacklist_rules": entry.blacklist.rules,
        "blacklist_hits": entry.blacklist_hits,
        "expires": entry.expires,
        "expire_after": entry.expire_after,
        "access_count": entry.access_count,
        "training": entry.training,
        "expired": entry.is_expired(),
    })
}

fn print_entry(entry: &Entry) {
    println!("Name: {}", entry);
    println!("Target: {}", entry.url);
    println!(
        "Mode: {}",
        if entry.redirect { "redirect" } else { "proxy" }
    );
    println!("Created: {}", entry.creation);
    if let Some(ref filename) = entry.filename {
        println!("File: {}", filename);
    }
    if let Some(ref content_type) = entry.content_type {
        println!("Content-Type: {}", content_type);
    }
    if let Some(ref deny_redirect) = entry.deny_redirect {
        println!("Deny redirect: {:?}", deny_redirect);
    }
    if entry.expires {
        let state = if entry.is_expired() { " (expired)" } else { "" };
        println!(
            "Accesses: {} of {} allowed{}",
            entry.access_count, entry.expire_after, state
        );
    } else {
        println!("Accesses: {}", entry.access_count);
    }
    if !entry.blacklist.is_empty() || entry.blacklist_hits > 0 {
        println!(
            "Blacklist: {} rules, {} hits{}",
            entry.blacklist.len(),
            entry.blacklist_hits,
            if entry.training { ", training" } else { "" }
        );
    }
}
