//! Replay an edit script through a live session.

use anyhow::Context as _;
use bitscape_config::{export_patch, load_last_session, save_last_session};
use bitscape_patch::{Patch, PatchAction};
use bitscape_sync::{RecordingEngine, Session};
use clap::Args;
use std::path::PathBuf;

use super::common::{Context, load_patch};
use super::sync::print_calls;

/// Apply actions one by one and print the calls each one sends.
#[derive(Args)]
pub struct ReplayArgs {
    /// JSON array of actions, e.g. `[{"type": "ADD_CONNECTION", "src": 1, "dst": 0}]`
    pub actions: PathBuf,

    /// Starting patch; defaults to the last session (if enabled) or the initial patch
    #[arg(long)]
    pub patch: Option<PathBuf>,

    /// Print worker messages as JSON lines; progress goes to stderr
    #[arg(long)]
    pub json: bool,

    /// Write the final patch here
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Run the replay command.
pub fn run(ctx: &Context, args: ReplayArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.actions)
        .with_context(|| format!("cannot read {}", args.actions.display()))?;
    let actions: Vec<PatchAction> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a list of actions", args.actions.display()))?;

    let start = starting_patch(ctx, args.patch.as_deref())?;
    let mut session = Session::new(start, RecordingEngine::new());

    // stdout stays pure JSON lines under --json
    let progress = |line: String| {
        if args.json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };
    let indent = if args.json { "" } else { "    " };

    let primed = session.resync();
    progress(format!("initial sync: {} calls", primed.calls()));
    session.engine_mut().take();

    for (i, action) in actions.iter().enumerate() {
        session.dispatch(action);
        let calls = session.engine_mut().take();
        progress(format!("[{}] {} -> {} calls", i, action.name(), calls.len()));
        print_calls(&calls, args.json, indent)?;
    }

    let (patch, _) = session.into_parts();

    if let Some(out) = &args.out {
        export_patch(&patch, out)?;
        progress(format!("wrote {}", out.display()));
    }
    if ctx.settings.autosave_session {
        save_last_session(&ctx.library_dir, &patch)?;
    }
    Ok(())
}

fn starting_patch(ctx: &Context, path: Option<&std::path::Path>) -> anyhow::Result<Patch> {
    if let Some(path) = path {
        return load_patch(path);
    }
    if ctx.settings.restore_last_session
        && let Some(patch) = load_last_session(&ctx.library_dir)
    {
        return Ok(patch);
    }
    Ok(Patch::initial())
}
