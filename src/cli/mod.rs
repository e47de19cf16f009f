//! CLI command definitions and handlers
//!
//! Each subcommand maps 1:1 onto a store action; the handlers hold no note
//! logic of their own.

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// reef - markdown notes with a subscribable store and local persistence
#[derive(Parser, Debug)]
#[command(name = "reef", version, about, long_about = None)]
pub struct Cli {
    /// Note collection file (overrides config file)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes, newest first
    #[command(name = "ls")]
    List(ListArgs),

    /// Create a new note
    New(NewArgs),

    /// Show a note's contents
    Show(ShowArgs),

    /// Edit a note's title or content and save it
    Edit(EditArgs),

    /// Search notes by title or content
    Search(SearchArgs),

    /// Delete a note
    Rm(RmArgs),

    /// Seed sample notes when the collection is empty
    Seed(SeedArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Title for the new note (defaults to "Untitled")
    pub title: Option<String>,

    /// Initial markdown content
    #[arg(short, long, allow_hyphen_values = true)]
    pub content: Option<String>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID or unique ID prefix
    pub id: String,

    /// Render the markdown preview instead of raw content
    #[arg(short, long)]
    pub preview: bool,

    /// Output format (ignored with --preview)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Note ID or unique ID prefix
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New markdown content
    #[arg(short, long, allow_hyphen_values = true)]
    pub content: Option<String>,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query (case-insensitive substring over title and content)
    pub query: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Note ID or unique ID prefix
    pub id: String,
}

/// Arguments for the `seed` command
#[derive(Parser, Debug)]
pub struct SeedArgs {}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
