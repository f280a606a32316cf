//! Command-line entry point over `pressroom_core`.
//!
//! # Responsibility
//! - Provide smoke probes (`ping`, `version`, `schema`) for core linkage.
//! - Offer small author/post admin commands against a SQLite store.
//!
//! Output is plain text, one record per line, so it stays easy to diff.

use clap::{Parser, Subcommand};
use pressroom_core::db::migrations::schema_version;
use pressroom_core::db::{open_db, open_db_in_memory};
use pressroom_core::{
    AuthorListQuery, AuthorService, NewPost, PostCategory, PostListQuery, PostService,
    SqliteAuthorRepository, SqlitePostRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pressroom", version, about = "Author and post record store")]
struct Cli {
    /// SQLite database file; an in-memory store is used when absent.
    #[arg(long, global = true, env = "PRESSROOM_DB_PATH")]
    db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "PRESSROOM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logging is off when absent.
    #[arg(long, global = true, env = "PRESSROOM_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Health check against the core crate.
    Ping,
    /// Print the core crate version.
    Version,
    /// Open the store and print its schema version.
    Schema,
    /// Author records.
    Author {
        #[command(subcommand)]
        action: AuthorAction,
    },
    /// Post records.
    Post {
        #[command(subcommand)]
        action: PostAction,
    },
}

#[derive(Subcommand, Debug)]
enum AuthorAction {
    Add {
        name: String,
        /// Exactly 10 digits, no separators.
        phone: Option<String>,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum PostAction {
    Add {
        title: String,
        /// `Fiction` or `Non-Fiction`.
        category: String,
        summary: String,
        /// File holding the post body.
        content_file: PathBuf,
    },
    List {
        /// Only list posts in this category.
        category: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .unwrap_or_else(|| pressroom_core::default_log_level().to_string());
        pressroom_core::init_logging(&level, log_dir)?;
    }

    match cli.command {
        Command::Ping => println!("pressroom_core ping={}", pressroom_core::ping()),
        Command::Version => {
            println!("pressroom_core version={}", pressroom_core::core_version())
        }
        Command::Schema => {
            let conn = open_store(cli.db.as_ref())?;
            let version = schema_version(&conn).map_err(|err| err.to_string())?;
            println!("schema_version={version}");
        }
        Command::Author { action } => {
            let conn = open_store(cli.db.as_ref())?;
            run_author(&conn, action)?;
        }
        Command::Post { action } => {
            let conn = open_store(cli.db.as_ref())?;
            run_post(&conn, action)?;
        }
    }
    Ok(())
}

fn open_store(path: Option<&PathBuf>) -> Result<Connection, String> {
    let opened = match path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    opened.map_err(|err| err.to_string())
}

fn run_author(conn: &Connection, action: AuthorAction) -> Result<(), String> {
    let service = AuthorService::new(SqliteAuthorRepository::new(conn));
    match action {
        AuthorAction::Add { name, phone } => {
            let author = service
                .register(name, phone)
                .map_err(|err| err.to_string())?;
            println!("{}\t{}", author.id, author.name);
        }
        AuthorAction::List => {
            let authors = service
                .list_authors(&AuthorListQuery::default())
                .map_err(|err| err.to_string())?;
            for author in authors {
                println!(
                    "{}\t{}\t{}",
                    author.id,
                    author.name,
                    author.phone_number.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn run_post(conn: &Connection, action: PostAction) -> Result<(), String> {
    let service = PostService::new(SqlitePostRepository::new(conn));
    match action {
        PostAction::Add {
            title,
            category,
            summary,
            content_file,
        } => {
            let content = std::fs::read_to_string(&content_file).map_err(|err| {
                format!("failed to read `{}`: {err}", content_file.display())
            })?;
            let post = service
                .create_post(&NewPost {
                    title,
                    content,
                    summary,
                    category,
                })
                .map_err(|err| err.to_string())?;
            println!("{}\t{}\t{}", post.id, post.category, post.title);
        }
        PostAction::List { category } => {
            let category = category
                .map(|value| {
                    PostCategory::parse(&value)
                        .ok_or_else(|| format!("unknown category `{value}`"))
                })
                .transpose()?;
            let posts = service
                .list_posts(&PostListQuery {
                    category,
                    ..PostListQuery::default()
                })
                .map_err(|err| err.to_string())?;
            for post in posts {
                println!("{}\t{}\t{}", post.id, post.category, post.title);
            }
        }
    }
    Ok(())
}
