//! `rind build-wheel` command

use anyhow::Result;

use super::HookContext;
use crate::cli::BuildWheelArgs;
use rind::ops::build_wheel;

pub fn execute(args: BuildWheelArgs, ctx: &HookContext) -> Result<()> {
    let filename = build_wheel(
        &ctx.project_root,
        &args.wheel_directory,
        &ctx.settings,
        args.metadata_directory.as_deref(),
    )?;
    println!("{}", filename);
    Ok(())
}
