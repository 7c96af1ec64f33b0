use super::{run_pipeline, RunFlags};
use anyhow::Context;
use jrw_core::build::{self, BuildTarget};
use jrw_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, target: Option<&str>, flags: RunFlags) -> anyhow::Result<()> {
    let target = BuildTarget::from_arg(target)?;
    let config = Config::load(root).context("failed to load config")?;
    tracing::info!(%target, root = %root.display(), "building images");

    let steps = build::plan(target, &config.docker);
    run_pipeline(
        root,
        "build",
        &steps,
        flags,
        &format!("Docker build ({target}) completed successfully!"),
    )
}
