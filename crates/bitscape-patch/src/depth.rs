//! Spatial depth mapping.
//!
//! The distance between connected operator nodes is the only way canvas
//! layout reaches the synthesis engine. Non-self edges are grouped by source
//! (C/A → group A, B1/B2 → group B), their lengths averaged per group, and
//! the average mapped through an exponential decay:
//!
//! ```text
//! depth = round(127 * e^(-avg_distance / 200))
//!
//!   0 px → 127     200 px → 47     400 px → 17
//! ```
//!
//! An empty group yields depth 0.

use crate::constants::{DEPTH_DECAY_CONSTANT, MAX_PARAM, OPERATOR_COUNT};
use crate::graph::Connection;
use crate::operator::Point;

/// Modulation depths for the two source groups, each 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModDepths {
    /// Depth for edges sourced at operators 0 or 1.
    pub a: u8,
    /// Depth for edges sourced at operators 2 or 3.
    pub b: u8,
}

/// Map a pixel distance to a modulation depth.
pub fn distance_to_depth(distance: f32) -> u8 {
    let normalized = (-f64::from(distance) / f64::from(DEPTH_DECAY_CONSTANT)).exp();
    (normalized * f64::from(MAX_PARAM)).round().clamp(0.0, f64::from(MAX_PARAM)) as u8
}

/// Derive both group depths from the edge set and operator positions.
///
/// Self-loops are ignored. Edges naming an operator outside the layout are
/// skipped.
pub fn compute_mod_depths(
    connections: &[Connection],
    positions: &[Point; OPERATOR_COUNT],
) -> ModDepths {
    let mut sum_a = 0.0_f64;
    let mut count_a = 0_u32;
    let mut sum_b = 0.0_f64;
    let mut count_b = 0_u32;

    for c in connections.iter().filter(|c| !c.is_self_loop()) {
        let (Some(&src), Some(&dst)) = (positions.get(c.src), positions.get(c.dst)) else {
            continue;
        };
        let dist = f64::from(src.distance(dst));
        if c.src <= 1 {
            sum_a += dist;
            count_a += 1;
        } else {
            sum_b += dist;
            count_b += 1;
        }
    }

    let group = |sum: f64, count: u32| {
        if count == 0 {
            0
        } else {
            distance_to_depth((sum / f64::from(count)) as f32)
        }
    };

    ModDepths {
        a: group(sum_a, count_a),
        b: group(sum_b, count_b),
    }
}
