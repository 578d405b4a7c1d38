//! Canvas geometry, ratio snap table and related conversions.
//!
//! The ratio ring maps a continuous angle in radians onto the discrete
//! [`RATIO_SNAPS`] table: index `round(angle / 2π * (N - 1))`, clamped to
//! the table bounds. Angles outside `[0, 2π]` first wrap into one turn.

use core::f32::consts::TAU;

use crate::operator::Point;

/// Number of operators in a patch. Indices are stable identities.
pub const OPERATOR_COUNT: usize = 4;

/// Width and height of the square editing canvas, in pixels.
pub const CANVAS_SIZE: f32 = 1000.0;

/// Ratio snap points, in ascending order.
pub const RATIO_SNAPS: [f32; 15] = [
    0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 12.0, 16.0,
];

/// Default diamond layout: C bottom, A top, B1 left, B2 right.
pub const DEFAULT_POSITIONS: [Point; OPERATOR_COUNT] = [
    Point::new(500.0, 700.0),
    Point::new(500.0, 300.0),
    Point::new(300.0, 500.0),
    Point::new(700.0, 500.0),
];

/// Default ratios per operator (C, A, B1, B2).
pub const DEFAULT_RATIOS: [f32; OPERATOR_COUNT] = [1.0, 2.0, 3.0, 4.0];

/// Smallest self-loop radius, in pixels. Maps to feedback 0.
pub const SELF_LOOP_MIN_RADIUS: f32 = 20.0;

/// Largest self-loop radius, in pixels. Maps to feedback 127.
pub const SELF_LOOP_MAX_RADIUS: f32 = 80.0;

/// Radius given to a freshly drawn self-loop.
pub const SELF_LOOP_DEFAULT_RADIUS: f32 = 30.0;

/// Exponential decay constant for the distance → depth mapping, in pixels.
pub const DEPTH_DECAY_CONSTANT: f32 = 200.0;

/// Upper bound of every 7-bit engine parameter.
pub const MAX_PARAM: f32 = 127.0;

const LAST_SNAP: usize = RATIO_SNAPS.len() - 1;

/// Bring a ring angle into one turn.
///
/// Angles already in `[0, 2π]` are kept as is, so `2π` still selects the
/// last table entry; anything else wraps into `[0, 2π)`. Non-finite angles
/// read as 0.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    if (0.0..=TAU).contains(&angle) {
        angle
    } else {
        angle.rem_euclid(TAU)
    }
}

/// Snap table index selected by a ring angle.
///
/// The angle is wrapped with [`normalize_angle`] first.
pub fn snap_index_for_angle(angle: f32) -> usize {
    let idx = (normalize_angle(angle) / TAU * LAST_SNAP as f32).round();
    idx.clamp(0.0, LAST_SNAP as f32) as usize
}

/// Ratio selected by a ring angle.
pub fn ratio_for_angle(angle: f32) -> f32 {
    RATIO_SNAPS[snap_index_for_angle(angle)]
}

/// Ring angle that exactly selects the given snap index.
pub fn angle_for_snap_index(index: usize) -> f32 {
    index.min(LAST_SNAP) as f32 / LAST_SNAP as f32 * TAU
}

/// Index of the snap table entry closest to `ratio`.
///
/// Ties resolve to the lower entry. Non-finite input selects `1.0`.
pub fn nearest_snap_index(ratio: f32) -> usize {
    if !ratio.is_finite() {
        return 3;
    }
    let mut best = 0;
    let mut best_diff = f32::INFINITY;
    for (i, &snap) in RATIO_SNAPS.iter().enumerate() {
        let diff = (snap - ratio).abs();
        if diff < best_diff {
            best = i;
            best_diff = diff;
        }
    }
    best
}

/// Whether `ratio` is exactly one of the snap table entries.
pub fn is_snap_ratio(ratio: f32) -> bool {
    RATIO_SNAPS.contains(&ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_table_is_sorted_and_bounded() {
        assert_eq!(RATIO_SNAPS.len(), 15);
        assert_eq!(RATIO_SNAPS[0], 0.25);
        assert_eq!(RATIO_SNAPS[14], 16.0);
        assert!(RATIO_SNAPS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn angle_zero_selects_first_entry() {
        assert_eq!(snap_index_for_angle(0.0), 0);
        assert_eq!(ratio_for_angle(0.0), 0.25);
    }

    #[test]
    fn full_turn_selects_last_entry() {
        assert_eq!(snap_index_for_angle(TAU), 14);
        assert_eq!(ratio_for_angle(TAU), 16.0);
    }

    #[test]
    fn out_of_range_angles_wrap() {
        // -3 rad sits at 3.283 rad on the ring: index 7
        assert_eq!(snap_index_for_angle(-3.0), 7);
        assert_eq!(ratio_for_angle(-3.0), 4.0);
        assert_eq!(snap_index_for_angle(-0.01), 14);
        assert_eq!(snap_index_for_angle(TAU + 0.01), 0);
        // 100 rad wraps to 5.752 rad: index 13
        assert_eq!(snap_index_for_angle(100.0), 13);
        assert_eq!(snap_index_for_angle(f32::NAN), 0);
        assert_eq!(snap_index_for_angle(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn normalize_keeps_one_turn() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(TAU), TAU);
        assert_eq!(normalize_angle(1.5), 1.5);
        assert!((normalize_angle(-1.0) - (TAU - 1.0)).abs() < 1e-5);
        assert!((normalize_angle(TAU * 3.0 + 0.5) - 0.5).abs() < 1e-4);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn angle_for_index_round_trips() {
        for i in 0..RATIO_SNAPS.len() {
            assert_eq!(snap_index_for_angle(angle_for_snap_index(i)), i);
        }
    }

    #[test]
    fn nearest_snap_picks_closest_value() {
        assert_eq!(RATIO_SNAPS[nearest_snap_index(1.0)], 1.0);
        assert_eq!(RATIO_SNAPS[nearest_snap_index(2.9)], 3.0);
        assert_eq!(RATIO_SNAPS[nearest_snap_index(11.0)], 10.0);
        assert_eq!(RATIO_SNAPS[nearest_snap_index(100.0)], 16.0);
        assert_eq!(RATIO_SNAPS[nearest_snap_index(0.0)], 0.25);
        assert_eq!(RATIO_SNAPS[nearest_snap_index(f32::NAN)], 1.0);
    }
}
