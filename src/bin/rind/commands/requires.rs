//! `rind get-requires-for-build-wheel` and `get-requires-for-build-sdist`

use anyhow::Result;

use super::HookContext;
use crate::cli::RequiresArgs;
use rind::ops::{get_requires_for_build_sdist, get_requires_for_build_wheel};

pub fn execute_wheel(args: RequiresArgs, ctx: &HookContext) -> Result<()> {
    let requires = get_requires_for_build_wheel(&ctx.project_root, &ctx.settings)?;
    print_requires(&requires, args.json)
}

pub fn execute_sdist(args: RequiresArgs, ctx: &HookContext) -> Result<()> {
    let requires = get_requires_for_build_sdist(&ctx.project_root, &ctx.settings)?;
    print_requires(&requires, args.json)
}

fn print_requires(requires: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(requires)?);
    } else {
        for requirement in requires {
            println!("{}", requirement);
        }
    }
    Ok(())
}
