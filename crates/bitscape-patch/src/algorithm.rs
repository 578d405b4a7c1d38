//! Reference algorithms and the graph matcher.
//!
//! The matcher classifies an arbitrary drawing against the eight fixed
//! routing topologies for display. It never drives engine routing; the raw
//! edges are transmitted as drawn.
//!
//! Matching strips self-loops, scores every candidate by Jaccard similarity
//! `|user ∩ algo| / |user ∪ algo|`, and breaks ties in favour of the
//! candidate with the fewest edges missing from the drawing.

use std::collections::BTreeSet;

use crate::graph::Connection;

/// One predefined routing topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Algorithm {
    /// Display name.
    pub name: &'static str,
    /// Modulation pairs `(src, dst)`; `src == dst` is built-in feedback.
    pub modulations: &'static [(usize, usize)],
    /// Audible operators.
    pub carriers: &'static [usize],
}

/// Index returned for a drawing without modulation edges.
pub const DEFAULT_ALGORITHM: usize = 7;

/// The eight reference algorithms.
pub const ALGORITHMS: [Algorithm; 8] = [
    // A(fb)→C, B2→B1→C
    Algorithm {
        name: "Algo 1",
        modulations: &[(1, 1), (1, 0), (3, 2), (2, 0)],
        carriers: &[0, 2],
    },
    // A→C, B2(fb)→B1
    Algorithm {
        name: "Algo 2",
        modulations: &[(1, 0), (3, 3), (3, 2)],
        carriers: &[0, 2],
    },
    // A(fb)→C,B2,B1
    Algorithm {
        name: "Algo 3",
        modulations: &[(1, 1), (1, 0), (1, 3), (1, 2)],
        carriers: &[0, 3, 2],
    },
    // B2(fb)→B1→A→C
    Algorithm {
        name: "Algo 4",
        modulations: &[(3, 3), (3, 2), (2, 1), (1, 0)],
        carriers: &[0, 1],
    },
    // B1(fb)→B2,A + B2→A, A→C
    Algorithm {
        name: "Algo 5",
        modulations: &[(2, 2), (2, 3), (2, 1), (3, 1), (1, 0)],
        carriers: &[1, 0],
    },
    // A(fb)→C,B1 + B2→C,B1
    Algorithm {
        name: "Algo 6",
        modulations: &[(1, 1), (1, 0), (1, 2), (3, 0), (3, 2)],
        carriers: &[0, 2],
    },
    // A(fb)→C, B2→B1
    Algorithm {
        name: "Algo 7",
        modulations: &[(1, 1), (1, 0), (3, 2)],
        carriers: &[0, 1, 2],
    },
    // A→C, B1(fb)
    Algorithm {
        name: "Algo 8",
        modulations: &[(1, 0), (2, 2)],
        carriers: &[0, 3, 2],
    },
];

type EdgeSet = BTreeSet<(usize, usize)>;

fn edge_set(pairs: impl IntoIterator<Item = (usize, usize)>) -> EdgeSet {
    pairs.into_iter().filter(|(s, d)| s != d).collect()
}

/// Jaccard similarity as an exact `(intersection, union)` fraction.
fn jaccard(user: &EdgeSet, algo: &EdgeSet) -> (usize, usize) {
    let intersection = user.intersection(algo).count();
    let union = user.len() + algo.len() - intersection;
    if union == 0 { (1, 1) } else { (intersection, union) }
}

/// Best-matching algorithm index (0-7) for a drawn edge set.
pub fn match_algorithm(connections: &[Connection]) -> usize {
    let user = edge_set(connections.iter().map(|c| (c.src, c.dst)));
    if user.is_empty() {
        return DEFAULT_ALGORITHM;
    }

    let mut best_index = 0;
    let mut best_score = (0, 1);
    let mut best_extra = usize::MAX;

    for (i, algo) in ALGORITHMS.iter().enumerate() {
        let algo_edges = edge_set(algo.modulations.iter().copied());
        let score = jaccard(&user, &algo_edges);
        let extra = algo_edges.difference(&user).count();

        // compare a/b against c/d without floating point
        let lhs = score.0 * best_score.1;
        let rhs = best_score.0 * score.1;
        let better = best_extra == usize::MAX || lhs > rhs || (lhs == rhs && extra < best_extra);
        if better {
            best_index = i;
            best_score = score;
            best_extra = extra;
        }
    }

    best_index
}

/// Carriers of an algorithm; unknown indices fall back to `[0]`.
pub fn carriers(index: usize) -> &'static [usize] {
    ALGORITHMS.get(index).map_or(&[0], |a| a.carriers)
}

/// Modulation pairs of an algorithm; unknown indices yield none.
pub fn modulations(index: usize) -> &'static [(usize, usize)] {
    ALGORITHMS.get(index).map_or(&[], |a| a.modulations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conns(pairs: &[(usize, usize)]) -> Vec<Connection> {
        pairs.iter().map(|&(s, d)| Connection::new(s, d)).collect()
    }

    #[test]
    fn empty_drawing_defaults_to_simplest() {
        assert_eq!(match_algorithm(&[]), DEFAULT_ALGORITHM);
        assert_eq!(match_algorithm(&conns(&[(0, 0), (3, 3)])), DEFAULT_ALGORITHM);
    }

    #[test]
    fn single_edge_matches_algo_8() {
        assert_eq!(match_algorithm(&conns(&[(1, 0)])), 7);
    }

    #[test]
    fn exact_topologies_are_recognised() {
        assert_eq!(match_algorithm(&conns(&[(1, 0), (3, 2), (2, 0)])), 0);
        assert_eq!(match_algorithm(&conns(&[(1, 0), (1, 3), (1, 2)])), 2);
        assert_eq!(match_algorithm(&conns(&[(3, 2), (2, 1), (1, 0)])), 3);
        assert_eq!(
            match_algorithm(&conns(&[(2, 3), (2, 1), (3, 1), (1, 0)])),
            4
        );
        assert_eq!(
            match_algorithm(&conns(&[(1, 0), (1, 2), (3, 0), (3, 2)])),
            5
        );
    }

    #[test]
    fn identical_topologies_prefer_the_lower_index() {
        // algorithms 2 and 7 share {A→C, B2→B1}
        assert_eq!(match_algorithm(&conns(&[(1, 0), (3, 2)])), 1);
    }

    #[test]
    fn self_loops_do_not_affect_matching() {
        let with_loops = conns(&[(1, 1), (1, 0), (3, 2), (2, 0), (0, 0)]);
        assert_eq!(match_algorithm(&with_loops), 0);
    }

    #[test]
    fn edge_order_is_irrelevant() {
        let a = conns(&[(3, 2), (2, 1), (1, 0)]);
        let b = conns(&[(1, 0), (2, 1), (3, 2)]);
        assert_eq!(match_algorithm(&a), match_algorithm(&b));
    }

    #[test]
    fn partial_drawing_picks_closest() {
        // {B1→A} shares one edge with algo 4 (1/3) and algo 5 (1/4)
        assert_eq!(match_algorithm(&conns(&[(2, 1)])), 3);
    }

    #[test]
    fn accessors_fall_back_for_unknown_index() {
        assert_eq!(carriers(0), &[0, 2]);
        assert_eq!(carriers(42), &[0]);
        assert_eq!(modulations(7), &[(1, 0), (2, 2)]);
        assert!(modulations(42).is_empty());
    }
}
