//! reef - markdown notes with a subscribable store and local persistence

pub mod cli;
pub mod domain;
pub mod infra;
pub mod render;
pub mod service;
pub mod store;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_completions, handle_edit, handle_list, handle_new, handle_rm, handle_search,
        handle_seed, handle_show,
    },
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = infra::logging::init(cli.verbose);
    let config = Config::load()?;
    let data_file = cli.data_file.as_ref();

    match &cli.command {
        Command::List(args) => handle_list(args, &config, data_file),
        Command::New(args) => handle_new(args, &config, data_file),
        Command::Show(args) => handle_show(args, &config, data_file),
        Command::Edit(args) => handle_edit(args, &config, data_file),
        Command::Search(args) => handle_search(args, &config, data_file),
        Command::Rm(args) => handle_rm(args, &config, data_file),
        Command::Seed(_) => handle_seed(&config, data_file),
        Command::Completions(args) => handle_completions(args),
    }
}
