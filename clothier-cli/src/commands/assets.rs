//! Assets command - download clothing by asset id.

use clothier::asset::AssetId;

use crate::error::CliError;
use crate::runner::{print_summary, CliRunner, Overrides};

/// Arguments for the assets command.
pub struct AssetsArgs {
    pub ids: Vec<String>,
}

/// Run the assets command.
pub fn run(args: AssetsArgs, overrides: Overrides) -> Result<(), CliError> {
    let ids = parse_ids(&args.ids)?;

    let runner = CliRunner::new(overrides)?;
    runner.log_startup("assets");
    let pipeline = runner.create_pipeline()?;

    println!("Downloading {} assets...", ids.len());
    let start = std::time::Instant::now();

    let report = runner.block_on(pipeline.download_assets_report(&ids))??;

    println!("Finished in {:.2}s", start.elapsed().as_secs_f64());
    for failure in &report.failures {
        println!("  ✗ {} ({}): {}", failure.asset_id, failure.stage, failure.error);
    }
    print_summary(ids.len(), &report.artifacts);

    Ok(())
}

/// Validates asset ids given on the command line.
fn parse_ids(raw: &[String]) -> Result<Vec<AssetId>, CliError> {
    raw.iter()
        .map(|id| {
            let asset_id = AssetId::from(id.trim());
            if asset_id.is_numeric() {
                Ok(asset_id)
            } else {
                Err(CliError::InvalidArgument(format!(
                    "'{}' is not a numeric asset id",
                    asset_id
                )))
            }
        })
        .collect()
}
