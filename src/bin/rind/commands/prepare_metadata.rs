//! `rind prepare-metadata-for-build-wheel` command

use anyhow::Result;

use super::HookContext;
use crate::cli::PrepareMetadataArgs;
use rind::ops::prepare_metadata_for_build_wheel;

pub fn execute(args: PrepareMetadataArgs, ctx: &HookContext) -> Result<()> {
    let dist_info =
        prepare_metadata_for_build_wheel(&ctx.project_root, &args.metadata_directory, &ctx.settings)?;
    println!("{}", dist_info);
    Ok(())
}
