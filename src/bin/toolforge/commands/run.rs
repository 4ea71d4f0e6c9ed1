//! `toolforge run` command

use anyhow::Result;

use crate::cli::RunArgs;
use crate::commands::find_manifest;
use toolforge::ops::bootstrap::{run, RunOptions};

pub fn execute(args: RunArgs) -> Result<()> {
    let manifest_path = find_manifest(args.manifest)?;

    let opts = RunOptions {
        jobs: args.jobs,
        report_path: args.report,
    };

    let report = run(&manifest_path, &opts)?;

    for stage in &report.stages {
        eprintln!(
            "    Finished stage {} ({}) -> {}",
            stage.index,
            stage.status,
            stage.work_dir.display()
        );
    }
    eprintln!("    Bootstrap {}", report.phase);

    Ok(())
}
