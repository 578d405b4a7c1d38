//! Print the engine calls for a patch or a pair of patches.

use bitscape_sync::{EngineCall, diff_patches};
use clap::Args;
use std::path::PathBuf;

use super::common::load_patch;

/// Show what one sync pass would send.
#[derive(Args)]
pub struct SyncArgs {
    /// Patch to sync
    pub file: PathBuf,

    /// Previously synced patch; without it every parameter is sent
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Print worker messages as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Run the sync command.
pub fn run(args: SyncArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.file)?;
    let prev = args.from.as_deref().map(load_patch).transpose()?;

    let calls = diff_patches(prev.as_ref(), &patch);
    tracing::info!(calls = calls.len(), full = prev.is_none(), "sync pass planned");
    print_calls(&calls, args.json, "")?;
    Ok(())
}

/// Print calls one per line, as `name(args)` or as JSON messages.
pub fn print_calls(calls: &[EngineCall], json: bool, indent: &str) -> anyhow::Result<()> {
    for call in calls {
        if json {
            println!("{indent}{}", serde_json::to_string(&call.to_message())?);
        } else {
            println!("{indent}{call}");
        }
    }
    Ok(())
}
