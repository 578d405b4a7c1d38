//! List the reference algorithms.

use bitscape_patch::ALGORITHMS;

use super::common::{labels, op_label};

/// Run the algorithms command.
pub fn run() -> anyhow::Result<()> {
    println!("Reference Algorithms:");
    println!("=====================");
    for (i, algo) in ALGORITHMS.iter().enumerate() {
        let edges: Vec<String> = algo
            .modulations
            .iter()
            .map(|&(src, dst)| {
                if src == dst {
                    format!("{}(fb)", op_label(src))
                } else {
                    format!("{}->{}", op_label(src), op_label(dst))
                }
            })
            .collect();
        let edges = if edges.is_empty() {
            "(none)".to_string()
        } else {
            edges.join(" ")
        };
        println!(
            "  {} {:8} carriers {:16} {}",
            i,
            algo.name,
            labels(algo.carriers),
            edges
        );
    }
    Ok(())
}
