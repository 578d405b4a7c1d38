//! Operator records and their value types.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    OPERATOR_COUNT, RATIO_SNAPS, angle_for_snap_index, nearest_snap_index, normalize_angle,
    snap_index_for_angle,
};
use crate::error::PatchError;

/// A coordinate in canvas space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy) as f32
    }
}

/// Oscillator waveform of an operator.
///
/// Serialized as its engine id (`0..=4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Waveform {
    /// Pure sine.
    #[default]
    Sine = 0,
    /// Square.
    Square = 1,
    /// Sawtooth.
    Saw = 2,
    /// Triangle.
    Triangle = 3,
    /// White noise.
    Noise = 4,
}

impl Waveform {
    /// All waveforms in engine id order.
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Saw,
        Waveform::Triangle,
        Waveform::Noise,
    ];

    /// Engine id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Saw => "Saw",
            Waveform::Triangle => "Triangle",
            Waveform::Noise => "Noise",
        }
    }
}

impl TryFrom<u8> for Waveform {
    type Error = PatchError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Waveform::ALL
            .get(id as usize)
            .copied()
            .ok_or(PatchError::InvalidWaveform(id))
    }
}

impl From<Waveform> for u8 {
    fn from(w: Waveform) -> Self {
        w.id()
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed role of an operator, determined by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorRole {
    /// Index 0, the default carrier.
    C,
    /// Index 1.
    A,
    /// Index 2.
    B1,
    /// Index 3.
    B2,
}

impl OperatorRole {
    /// Roles in index order.
    pub const ALL: [OperatorRole; OPERATOR_COUNT] =
        [OperatorRole::C, OperatorRole::A, OperatorRole::B1, OperatorRole::B2];

    /// Role for an operator index.
    pub fn from_index(index: usize) -> Result<Self, PatchError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(PatchError::InvalidOperator(index))
    }

    /// Operator index of this role.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short label shown on the canvas.
    pub fn label(self) -> &'static str {
        match self {
            OperatorRole::C => "C",
            OperatorRole::A => "A",
            OperatorRole::B1 => "B1",
            OperatorRole::B2 => "B2",
        }
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canvas-visible state of one operator.
///
/// `ratio` and `ring_angle` are two views of one value: after any write
/// through [`set_ratio_by_angle`](Self::set_ratio_by_angle) or
/// [`set_ratio_by_value`](Self::set_ratio_by_value), `ratio` is the snap
/// table entry selected by `ring_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    /// Node centre on the canvas.
    pub position: Point,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Frequency multiplier, one of [`RATIO_SNAPS`].
    pub ratio: f32,
    /// Ratio ring angle in radians.
    pub ring_angle: f32,
}

impl Operator {
    /// Create a sine operator at `position`, snapping `ratio` to the table.
    pub fn new(position: Point, ratio: f32) -> Self {
        let mut op = Self {
            position,
            waveform: Waveform::Sine,
            ratio: 1.0,
            ring_angle: 0.0,
        };
        op.set_ratio_by_value(ratio);
        op
    }

    /// Set the ring angle, wrapped into one turn, and derive the ratio from it.
    pub fn set_ratio_by_angle(&mut self, angle: f32) {
        self.ring_angle = normalize_angle(angle);
        self.ratio = RATIO_SNAPS[snap_index_for_angle(self.ring_angle)];
    }

    /// Snap `ratio` to the nearest table entry and move the ring to match.
    pub fn set_ratio_by_value(&mut self, ratio: f32) {
        let index = nearest_snap_index(ratio);
        self.ratio = RATIO_SNAPS[index];
        self.ring_angle = angle_for_snap_index(index);
    }

    /// Snap table index currently selected by the ring.
    pub fn snap_index(&self) -> usize {
        snap_index_for_angle(self.ring_angle)
    }

    /// Whether `ratio` agrees with `ring_angle`.
    pub fn is_ratio_consistent(&self) -> bool {
        RATIO_SNAPS[self.snap_index()] == self.ratio
    }
}

/// Per-operator modulation envelope (attack, decay, end level), each 0-127.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModEnvelope {
    /// Attack time.
    pub attack: f32,
    /// Decay time.
    pub decay: f32,
    /// Level the envelope settles at.
    pub end: f32,
}

impl ModEnvelope {
    /// Create an envelope.
    pub const fn new(attack: f32, decay: f32, end: f32) -> Self {
        Self { attack, decay, end }
    }
}

impl Default for ModEnvelope {
    fn default() -> Self {
        Self::new(64.0, 64.0, 64.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(500.0, 300.0);
        let b = Point::new(500.0, 700.0);
        assert_eq!(a.distance(b), 400.0);
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn waveform_ids_round_trip() {
        for w in Waveform::ALL {
            assert_eq!(Waveform::try_from(w.id()), Ok(w));
        }
        assert_eq!(Waveform::try_from(5), Err(PatchError::InvalidWaveform(5)));
    }

    #[test]
    fn waveform_serializes_as_integer() {
        let json = serde_json::to_string(&Waveform::Triangle).unwrap();
        assert_eq!(json, "3");
        let w: Waveform = serde_json::from_str("2").unwrap();
        assert_eq!(w, Waveform::Saw);
        assert!(serde_json::from_str::<Waveform>("7").is_err());
    }

    #[test]
    fn roles_follow_index() {
        assert_eq!(OperatorRole::from_index(0).unwrap().label(), "C");
        assert_eq!(OperatorRole::from_index(3).unwrap().label(), "B2");
        assert_eq!(OperatorRole::B1.index(), 2);
        assert!(OperatorRole::from_index(4).is_err());
    }

    #[test]
    fn new_operator_has_consistent_ring() {
        let op = Operator::new(Point::new(0.0, 0.0), 2.0);
        assert_eq!(op.ratio, 2.0);
        assert!(op.is_ratio_consistent());
        assert_eq!(op.snap_index(), 5);
    }

    #[test]
    fn ratio_by_value_snaps_and_moves_ring() {
        let mut op = Operator::new(Point::default(), 1.0);
        op.set_ratio_by_value(6.4);
        assert_eq!(op.ratio, 6.0);
        assert!(op.is_ratio_consistent());
    }

    #[test]
    fn ratio_by_angle_keeps_raw_angle() {
        let mut op = Operator::new(Point::default(), 1.0);
        let angle = TAU * 0.51;
        op.set_ratio_by_angle(angle);
        assert_eq!(op.ring_angle, angle);
        assert_eq!(op.ratio, RATIO_SNAPS[7]);
        assert!(op.is_ratio_consistent());
    }

    #[test]
    fn ratio_by_negative_angle_wraps() {
        let mut op = Operator::new(Point::default(), 1.0);
        op.set_ratio_by_angle(-TAU * 0.3);
        assert!((op.ring_angle - TAU * 0.7).abs() < 1e-5);
        // 0.7 of a turn: round(9.8) = 10
        assert_eq!(op.ratio, RATIO_SNAPS[10]);
        assert!(op.is_ratio_consistent());
    }
}
