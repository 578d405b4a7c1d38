//! Last-session slot commands.

use bitscape_config::{clear_last_session, load_last_session, save_last_session, session_path};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::common::{Context, load_patch};
use super::info::print_patch;

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Show the stored session patch
    Show,

    /// Remove the stored session
    Clear,

    /// Store a patch file as the session
    Save {
        /// Patch JSON file
        file: PathBuf,
    },
}

pub fn run(ctx: &Context, args: SessionArgs) -> anyhow::Result<()> {
    let dir = &ctx.library_dir;
    match args.command {
        SessionCommand::Show => {
            let path = session_path(dir);
            match load_last_session(dir) {
                Some(patch) => {
                    println!("Session:     {}", path.display());
                    print_patch(&patch);
                }
                None => println!("No stored session at {}", path.display()),
            }
        }
        SessionCommand::Clear => {
            if clear_last_session(dir)? {
                println!("Session cleared");
            } else {
                println!("No stored session");
            }
        }
        SessionCommand::Save { file } => {
            let patch = load_patch(&file)?;
            save_last_session(dir, &patch)?;
            println!("Session saved from {}", file.display());
        }
    }
    Ok(())
}
