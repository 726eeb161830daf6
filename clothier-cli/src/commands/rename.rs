//! Rename command - rename artifacts after a saved catalog file.

use std::path::PathBuf;

use clothier::catalog::rename_from_catalog;
use clothier::config::CATALOG_FILE_NAME;

use crate::error::CliError;
use crate::runner::{CliRunner, Overrides};

/// Arguments for the rename command.
pub struct RenameArgs {
    pub catalog: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
}

/// Run the rename command.
pub fn run(args: RenameArgs, overrides: Overrides) -> Result<(), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup("rename");
    let config = runner.pipeline_config();

    let catalog = args
        .catalog
        .unwrap_or_else(|| config.runtime_dir().join(CATALOG_FILE_NAME));
    let assets_dir = args.assets_dir.unwrap_or_else(|| config.assets_dir());

    let renamed = rename_from_catalog(&catalog, &assets_dir)?;

    for (from, to) in &renamed {
        println!(
            "Renamed: {} -> {}",
            from.file_name().unwrap_or_default().to_string_lossy(),
            to.file_name().unwrap_or_default().to_string_lossy()
        );
    }
    println!("{} files renamed", renamed.len());

    Ok(())
}
