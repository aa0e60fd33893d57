//! # Mikra CLI Module
//!
//! This module implements the CLI interface for Mikra.
//!
//! ## Available Commands
//!
//! - `init` - Initialize a new verse database
//! - `import` - Transform and store every verse of an OSIS file
//! - `verse` - Show one stored verse
//! - `chapter` - Show every stored verse of a chapter
//! - `strongs` - List occurrences of a Strong's number
//! - `lemma` - Show the Strong's codes in a raw lemma string
//! - `gematria` - Compute standard and ordinal gematria of a word
//! - `status` - Show store statistics
//! - `server` - Start the HTTP server

mod commands;

use clap::{Parser, Subcommand};
use mikra::api::DEFAULT_OCCURRENCE_LIMIT;
use mikra::config::Config;
use mikra_core::MikraError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Mikra - Hebrew Bible verse transform and lookup
///
/// Imports annotated OSIS text into word-level verse records with
/// Strong's numbers, ketiv/qere tags and optional gematria.
#[derive(Parser, Debug)]
#[command(name = "mikra")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: ./mikra.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the verse database (overrides [store] path)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Transform every verse of an OSIS file and store it
    Import {
        /// Path to the OSIS XML file
        #[arg(short, long)]
        file: PathBuf,

        /// Edition name to store the verses under
        #[arg(short, long)]
        edition: Option<String>,

        /// Keep cantillation marks in word text
        #[arg(long)]
        keep_cantillation: bool,

        /// Attach gematria to words and verses
        #[arg(long)]
        gematria: bool,
    },

    /// Show one stored verse
    Verse {
        /// Reference such as "Gen 1:1" or "Gen.1.1"
        reference: String,

        /// Edition to read from
        #[arg(short, long)]
        edition: Option<String>,
    },

    /// Show every stored verse of a chapter
    Chapter {
        /// Book code, e.g. "Gen"
        book: String,

        /// Chapter number
        chapter: u32,

        /// Edition to read from
        #[arg(short, long)]
        edition: Option<String>,
    },

    /// List occurrences of a Strong's number
    Strongs {
        /// Code such as "H7225" or "7225"
        code: String,

        /// Maximum number of occurrences
        #[arg(short, long, default_value_t = DEFAULT_OCCURRENCE_LIMIT)]
        limit: usize,
    },

    /// Show the Strong's codes in a raw lemma string
    Lemma {
        /// Lemma attribute value, e.g. "b/7225"
        lemma: String,
    },

    /// Compute standard and ordinal gematria of a word
    Gematria {
        /// Hebrew word
        word: String,
    },

    /// Show store statistics
    Status,

    /// Start HTTP server
    Server {
        /// Host to bind to (overrides [server] host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MikraError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.store.path = database;
    }
    let json_mode = cli.json_mode;
    let db_path = config.store.path.clone();
    let edition_or_default =
        |edition: Option<String>| edition.unwrap_or_else(|| config.server.default_edition.clone());

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&db_path, force),
        Some(Commands::Import {
            file,
            edition,
            keep_cantillation,
            gematria,
        }) => {
            let mut options = config.transform;
            if keep_cantillation {
                options.strip_cantillation = false;
            }
            if gematria {
                options.gematria = true;
            }
            cmd_import(
                &db_path,
                json_mode,
                &file,
                &edition_or_default(edition),
                &options,
            )
        }
        Some(Commands::Verse { reference, edition }) => cmd_verse(
            &db_path,
            json_mode,
            &edition_or_default(edition),
            &reference,
        ),
        Some(Commands::Chapter {
            book,
            chapter,
            edition,
        }) => cmd_chapter(
            &db_path,
            json_mode,
            &edition_or_default(edition),
            &book,
            chapter,
        ),
        Some(Commands::Strongs { code, limit }) => cmd_strongs(&db_path, json_mode, &code, limit),
        Some(Commands::Lemma { lemma }) => cmd_lemma(json_mode, &lemma),
        Some(Commands::Gematria { word }) => cmd_gematria(json_mode, &word),
        Some(Commands::Status) => cmd_status(&db_path, json_mode),
        Some(Commands::Server { host, port }) => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            cmd_server(&db_path, &host, port, config.transform).await
        }
        None => {
            // No subcommand - show status by default
            cmd_status(&db_path, json_mode)
        }
    }
}
