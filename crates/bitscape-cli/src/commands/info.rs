//! Describe a patch file.

use bitscape_patch::algorithm;
use bitscape_patch::{ALGORITHMS, OperatorRole, Patch};
use clap::Args;
use std::path::PathBuf;

use super::common::{labels, load_patch, op_label};

/// Display patch information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the patch JSON file
    pub file: PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.file)?;
    println!("File:        {}", args.file.display());
    print_patch(&patch);
    Ok(())
}

/// Print the operator table and routing summary.
pub fn print_patch(patch: &Patch) {
    println!();
    println!("Operators:");
    println!("  {:4} {:>16} {:>7} {:9} {:>8}", "", "position", "ratio", "waveform", "feedback");
    for role in OperatorRole::ALL {
        let i = role.index();
        let op = &patch.operators[i];
        println!(
            "  {:4} ({:>6.1}, {:>6.1}) {:>7} {:9} {:>8.1}",
            role.label(),
            op.position.x,
            op.position.y,
            op.ratio,
            op.waveform.name(),
            patch.operator_feedback[i],
        );
    }

    println!();
    if patch.connections.is_empty() {
        println!("Connections: (none)");
    } else {
        let edges: Vec<String> = patch
            .connections
            .iter()
            .map(|c| format!("{}->{}", op_label(c.src), op_label(c.dst)))
            .collect();
        println!("Connections: {}", edges.join(" "));
    }
    if !patch.self_loops.is_empty() {
        let loops: Vec<String> = patch
            .self_loops
            .iter()
            .map(|l| format!("{}(r={:.0})", op_label(l.op_index), l.radius))
            .collect();
        println!("Self-loops:  {}", loops.join(" "));
    }

    println!("Mod depth:   A={} B={}", patch.mod_depth_a, patch.mod_depth_b);
    println!("Carriers:    {}", labels(&patch.carriers()));

    let matched = patch.matched_algorithm();
    let name = ALGORITHMS.get(matched).map_or("?", |a| a.name);
    println!(
        "Algorithm:   {} (carriers {})",
        name,
        labels(algorithm::carriers(matched))
    );
}
