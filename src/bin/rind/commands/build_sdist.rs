//! `rind build-sdist` command

use anyhow::Result;

use super::HookContext;
use crate::cli::BuildSdistArgs;
use rind::ops::build_sdist;

pub fn execute(args: BuildSdistArgs, ctx: &HookContext) -> Result<()> {
    let filename = build_sdist(&ctx.project_root, &args.sdist_directory, &ctx.settings)?;
    println!("{}", filename);
    Ok(())
}
