//! clothier CLI - Command-line interface
//!
//! Downloads clothing textures by asset id or from a group listing and
//! composites them with the template image.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::assets::AssetsArgs;
use commands::config::ConfigCommands;
use commands::group::GroupArgs;
use commands::rename::RenameArgs;
use error::CliError;
use runner::Overrides;

#[derive(Parser)]
#[command(name = "clothier")]
#[command(version = clothier::VERSION)]
#[command(about = "Download clothing textures and composite them with a template", long_about = None)]
struct Cli {
    /// Runtime directory (holds assets/, template.png and roblox_cookie.txt)
    #[arg(long, global = true)]
    runtime_dir: Option<PathBuf>,

    /// Template image to overlay; must exist when given
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Maximum concurrent remote requests
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    max_concurrent: Option<u64>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download clothing by asset id
    Assets {
        /// One or more numeric asset ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Download the clothing a group has listed in the catalog
    Group {
        /// Numeric group id
        group_id: String,

        /// Catalog sort order (default from config: Updated)
        #[arg(long)]
        sort: Option<String>,

        /// Maximum number of items to download (default from config: 10)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rename downloaded artifacts after a saved catalog file
    Rename {
        /// Catalog JSON (default: <runtime-dir>/catalog_items.json)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Directory holding the artifacts (default: <runtime-dir>/assets)
        #[arg(long)]
        assets_dir: Option<PathBuf>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            runtime_dir: self.runtime_dir.clone(),
            template: self.template.clone(),
            max_concurrent: self.max_concurrent.map(|m| m as usize),
            debug: self.debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        e.exit();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let overrides = cli.overrides();

    match cli.command {
        Commands::Assets { ids } => commands::assets::run(AssetsArgs { ids }, overrides),
        Commands::Group {
            group_id,
            sort,
            limit,
        } => commands::group::run(
            GroupArgs {
                group_id,
                sort,
                limit,
            },
            overrides,
        ),
        Commands::Rename {
            catalog,
            assets_dir,
        } => commands::rename::run(
            RenameArgs {
                catalog,
                assets_dir,
            },
            overrides,
        ),
        Commands::Config { command } => commands::config::run(command),
    }
}
