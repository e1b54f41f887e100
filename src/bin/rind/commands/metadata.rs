//! `rind metadata` command

use anyhow::Result;

use super::HookContext;
use rind::ops::build_metadata;

pub fn execute(ctx: &HookContext) -> Result<()> {
    let meta = build_metadata(&ctx.project_root, &ctx.settings)?;
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}
