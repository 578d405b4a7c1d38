//! Property-based tests for the patch reducer and derived-state mappers.
//!
//! Random edit sequences are pushed through the reducer and the patch
//! invariants checked afterwards: duplicate-free connections, consistent
//! ratio rings, freshly computed mod depths.

use std::f32::consts::TAU;

use bitscape_patch::constants::snap_index_for_angle;
use bitscape_patch::{
    Connection, OPERATOR_COUNT, Patch, PatchAction, Point, RATIO_SNAPS, compute_mod_depths,
    distance_to_depth, reduce,
};
use proptest::prelude::*;

fn op_index() -> impl Strategy<Value = usize> {
    0usize..OPERATOR_COUNT
}

fn position() -> impl Strategy<Value = Point> {
    (0.0f32..1000.0, 0.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
}

fn edit() -> impl Strategy<Value = PatchAction> {
    prop_oneof![
        (op_index(), op_index()).prop_map(|(src, dst)| PatchAction::AddConnection { src, dst }),
        (op_index(), op_index()).prop_map(|(src, dst)| PatchAction::RemoveConnection { src, dst }),
        (op_index(), position())
            .prop_map(|(op_index, position)| PatchAction::MoveOperator { op_index, position }),
        (op_index(), -1.0f32..8.0)
            .prop_map(|(op_index, angle)| PatchAction::SetRingAngle { op_index, angle }),
        (op_index(), 0.0f32..20.0)
            .prop_map(|(op_index, ratio)| PatchAction::SetRatio { op_index, ratio }),
        (op_index(), 0.0f32..120.0)
            .prop_map(|(op_index, radius)| PatchAction::SetSelfLoop { op_index, radius }),
        op_index().prop_map(|op_index| PatchAction::RemoveSelfLoop { op_index }),
        (op_index(), 0.0f32..127.0)
            .prop_map(|(op_index, value)| PatchAction::SetOperatorFeedback { op_index, value }),
    ]
}

fn edited_patch() -> impl Strategy<Value = Patch> {
    prop::collection::vec(edit(), 0..24)
        .prop_map(|edits| edits.iter().fold(Patch::initial(), |p, a| reduce(&p, a)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Invariants hold after any sequence of edits.
    #[test]
    fn invariants_survive_random_edits(patch in edited_patch()) {
        let mut seen = std::collections::HashSet::new();
        for c in &patch.connections {
            prop_assert!(seen.insert((c.src, c.dst)), "duplicate edge {:?}", c);
        }

        for op in &patch.operators {
            prop_assert!(RATIO_SNAPS.contains(&op.ratio), "ratio {} off table", op.ratio);
            prop_assert!(op.is_ratio_consistent());
        }

        let expected = compute_mod_depths(&patch.connections, &patch.positions());
        prop_assert_eq!(patch.mod_depths(), expected);

        let mut loop_ops: Vec<usize> = patch.self_loops.iter().map(|l| l.op_index).collect();
        loop_ops.sort_unstable();
        loop_ops.dedup();
        prop_assert_eq!(loop_ops.len(), patch.self_loops.len());
    }

    /// Adding an edge twice equals adding it once.
    #[test]
    fn add_connection_idempotent(patch in edited_patch(), src in op_index(), dst in op_index()) {
        let action = PatchAction::AddConnection { src, dst };
        let once = reduce(&patch, &action);
        let twice = reduce(&once, &action);
        prop_assert_eq!(once.connections, twice.connections);
    }

    /// Remove after add restores the connection set and depths.
    #[test]
    fn remove_undoes_add(patch in edited_patch(), src in op_index(), dst in op_index()) {
        prop_assume!(!patch.has_connection(src, dst));
        let added = reduce(&patch, &PatchAction::AddConnection { src, dst });
        let removed = reduce(&added, &PatchAction::RemoveConnection { src, dst });
        prop_assert_eq!(&removed.connections, &patch.connections);
        prop_assert_eq!(removed.mod_depths(), patch.mod_depths());
    }

    /// The ring angle wraps into one turn, then selects the entry at the
    /// rounded index.
    #[test]
    fn ring_angle_snaps(op in op_index(), angle in -10.0f32..20.0) {
        let p = reduce(&Patch::initial(), &PatchAction::SetRingAngle { op_index: op, angle });
        let wrapped = if (0.0..=TAU).contains(&angle) { angle } else { angle.rem_euclid(TAU) };
        let index = (wrapped / TAU * 14.0).round().clamp(0.0, 14.0) as usize;
        prop_assert_eq!(snap_index_for_angle(angle), index);
        prop_assert_eq!(p.operators[op].ratio, RATIO_SNAPS[index]);
        prop_assert_eq!(p.operators[op].ring_angle, wrapped);
        prop_assert!((0.0..=TAU).contains(&p.operators[op].ring_angle));
        prop_assert!(p.operators[op].is_ratio_consistent());
    }

    /// Depth never increases with distance.
    #[test]
    fn depth_monotonic(a in 0.0f32..2000.0, b in 0.0f32..2000.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(distance_to_depth(near) >= distance_to_depth(far));
    }

    /// Single-edge depth follows the edge length, whatever the layout.
    #[test]
    fn single_edge_depth_matches_distance(from in position(), to in position()) {
        let mut p = Patch::initial();
        p.operators[1].position = from;
        p.operators[0].position = to;
        let p = reduce(&p, &PatchAction::AddConnection { src: 1, dst: 0 });
        prop_assert_eq!(p.mod_depth_a, distance_to_depth(from.distance(to)));
        prop_assert_eq!(p.mod_depth_b, 0);
    }

    /// Setting then removing a loop zeroes that operator and leaves the rest.
    #[test]
    fn self_loop_set_then_remove(patch in edited_patch(), op in op_index(), radius in 20.0f32..80.0) {
        let with_loop = reduce(&patch, &PatchAction::SetSelfLoop { op_index: op, radius });
        let removed = reduce(&with_loop, &PatchAction::RemoveSelfLoop { op_index: op });
        prop_assert_eq!(removed.operator_feedback[op], 0.0);
        for i in (0..OPERATOR_COUNT).filter(|&i| i != op) {
            prop_assert_eq!(removed.operator_feedback[i], with_loop.operator_feedback[i]);
        }
    }

    /// Loading any patch yields exactly that patch.
    #[test]
    fn load_patch_round_trip(current in edited_patch(), incoming in edited_patch()) {
        let loaded = reduce(&current, &PatchAction::LoadPatch { patch: Box::new(incoming.clone()) });
        prop_assert_eq!(loaded, incoming);
    }

    /// Self-loop edges never reach the depth computation.
    #[test]
    fn self_edges_do_not_change_depths(patch in edited_patch(), op in op_index()) {
        let p = reduce(&patch, &PatchAction::AddConnection { src: op, dst: op });
        let only_real: Vec<Connection> =
            p.connections.iter().copied().filter(|c| !c.is_self_loop()).collect();
        prop_assert_eq!(p.mod_depths(), compute_mod_depths(&only_real, &p.positions()));
    }
}
