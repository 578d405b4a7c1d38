//! Patch library commands.
//!
//! Entries are addressed by id or by exact name.

use bitscape_config::export_patch;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::common::{Context, age, load_patch, resolve_entry};
use super::info::print_patch;

#[derive(Args)]
pub struct LibraryArgs {
    #[command(subcommand)]
    command: LibraryCommand,
}

#[derive(Subcommand)]
enum LibraryCommand {
    /// List saved patches
    List,

    /// Show a saved patch
    Show {
        /// Entry id or name
        entry: String,
    },

    /// Save a patch file into the library
    Save {
        /// Name for the new entry
        name: String,

        /// Patch JSON file
        file: PathBuf,
    },

    /// Rename an entry
    Rename {
        /// Entry id or name
        entry: String,

        /// New name
        name: String,
    },

    /// Delete an entry
    Delete {
        /// Entry id or name
        entry: String,
    },

    /// Export an entry to a JSON file
    Export {
        /// Entry id or name
        entry: String,

        /// Destination file
        file: PathBuf,
    },

    /// Import a patch file into the library
    Import {
        /// Patch JSON file
        file: PathBuf,

        /// Entry name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

pub fn run(ctx: &Context, args: LibraryArgs) -> anyhow::Result<()> {
    let mut library = ctx.library();

    match args.command {
        LibraryCommand::List => {
            println!("Library: {}", ctx.library_dir.display());
            println!();
            if library.is_empty() {
                println!("  (none)");
                println!();
                println!("  Add a patch with: bitscape library save <name> <file>");
            }
            for entry in library.entries() {
                println!("  {}  {:24} {}", entry.id, entry.name, age(entry.created_at));
            }
            if library.unreadable_count() > 0 {
                println!();
                println!(
                    "  {} entries from a newer version were kept but not shown",
                    library.unreadable_count()
                );
            }
        }
        LibraryCommand::Show { entry } => {
            let entry = resolve_entry(&library, &entry)?;
            println!("Name:        {}", entry.name);
            println!("Id:          {}", entry.id);
            print_patch(&entry.patch);
        }
        LibraryCommand::Save { name, file } => {
            let patch = load_patch(&file)?;
            let entry = library.save(&name, &patch)?;
            println!("Saved '{}' as {}", entry.name, entry.id);
        }
        LibraryCommand::Rename { entry, name } => {
            let id = resolve_entry(&library, &entry)?.id;
            library.rename(id, &name)?;
            println!("Renamed {} to '{}'", id, name);
        }
        LibraryCommand::Delete { entry } => {
            let id = resolve_entry(&library, &entry)?.id;
            let removed = library.delete(id)?;
            println!("Deleted '{}'", removed.name);
        }
        LibraryCommand::Export { entry, file } => {
            let entry = resolve_entry(&library, &entry)?;
            export_patch(&entry.patch, &file)?;
            println!("Exported '{}' to {}", entry.name, file.display());
        }
        LibraryCommand::Import { file, name } => {
            let patch = load_patch(&file)?;
            let name = name.unwrap_or_else(|| {
                file.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Imported")
                    .to_string()
            });
            let entry = library.save(&name, &patch)?;
            println!("Imported '{}' as {}", entry.name, entry.id);
        }
    }
    Ok(())
}
