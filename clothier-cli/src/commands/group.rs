//! Group command - download the clothing a group has listed.

use crate::error::CliError;
use crate::runner::{print_summary, CliRunner, Overrides};

/// Arguments for the group command.
pub struct GroupArgs {
    pub group_id: String,
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

/// Run the group command.
pub fn run(args: GroupArgs, overrides: Overrides) -> Result<(), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup("group");

    let catalog = &runner.config().catalog;
    let sort = args.sort.unwrap_or_else(|| catalog.sort.clone());
    let limit = args.limit.unwrap_or(catalog.limit);

    let pipeline = runner.create_pipeline()?;

    println!("Listing up to {} items of group {} (sort: {})...", limit, args.group_id, sort);
    let start = std::time::Instant::now();

    let report = runner.block_on(pipeline.download_group_report(&args.group_id, &sort, limit))??;

    println!("Finished in {:.2}s", start.elapsed().as_secs_f64());
    let attempted = report.success_count() + report.failure_count();
    print_summary(attempted, &report.artifacts);

    Ok(())
}
