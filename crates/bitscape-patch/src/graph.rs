//! Connection graph: modulation edges, self-loops and routing views.
//!
//! A [`Connection`] with `src == dst` is feedback, not modulation. Feedback
//! drawn as a [`SelfLoop`] lives in its own list; its radius maps linearly to
//! a 0-127 feedback amount.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PARAM, OPERATOR_COUNT, SELF_LOOP_MAX_RADIUS, SELF_LOOP_MIN_RADIUS};

/// Directed modulation edge between two operator indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    /// Modulating operator.
    pub src: usize,
    /// Modulated operator.
    pub dst: usize,
}

impl Connection {
    /// Create an edge.
    pub const fn new(src: usize, dst: usize) -> Self {
        Self { src, dst }
    }

    /// Whether this edge feeds an operator back into itself.
    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

/// Feedback loop drawn on one operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfLoop {
    /// Operator carrying the loop.
    pub op_index: usize,
    /// Visual radius in pixels.
    pub radius: f32,
}

impl SelfLoop {
    /// Create a loop, clamping the radius to the drawable range.
    pub fn new(op_index: usize, radius: f32) -> Self {
        Self {
            op_index,
            radius: clamp_radius(radius),
        }
    }

    /// Feedback amount this loop produces.
    pub fn feedback(&self) -> f32 {
        self_loop_feedback(self.radius)
    }
}

/// Clamp a radius into `[SELF_LOOP_MIN_RADIUS, SELF_LOOP_MAX_RADIUS]`.
pub fn clamp_radius(radius: f32) -> f32 {
    if radius.is_nan() {
        return SELF_LOOP_MIN_RADIUS;
    }
    radius.clamp(SELF_LOOP_MIN_RADIUS, SELF_LOOP_MAX_RADIUS)
}

/// Map a self-loop radius to feedback (0-127).
pub fn self_loop_feedback(radius: f32) -> f32 {
    let span = SELF_LOOP_MAX_RADIUS - SELF_LOOP_MIN_RADIUS;
    let t = ((radius - SELF_LOOP_MIN_RADIUS) / span).clamp(0.0, 1.0);
    (t * MAX_PARAM).round()
}

/// Feedback array implied by a set of self-loops; operators without a loop read 0.
pub fn feedback_from_loops(loops: &[SelfLoop]) -> [f32; OPERATOR_COUNT] {
    let mut feedback = [0.0; OPERATOR_COUNT];
    for l in loops {
        if let Some(slot) = feedback.get_mut(l.op_index) {
            *slot = l.feedback();
        }
    }
    feedback
}

/// Operators the engine should mix into the audible output.
///
/// An operator is a carrier if it has no outgoing non-self edge, or if
/// anything (including itself) feeds into it. Falls back to `[0]` when the
/// rule selects nothing.
pub fn transmission_carriers(connections: &[Connection]) -> Vec<usize> {
    let mut carriers: Vec<usize> = (0..OPERATOR_COUNT)
        .filter(|&i| {
            let modulates = connections.iter().any(|c| c.src == i && !c.is_self_loop());
            let fed = connections.iter().any(|c| c.dst == i);
            !modulates || fed
        })
        .collect();
    if carriers.is_empty() {
        carriers.push(0);
    }
    carriers
}

/// Edge list sent to the engine: the user's edges in order, then a synthetic
/// `(i, i)` loop for every operator with feedback above zero that lacks one.
pub fn routing_edges(
    connections: &[Connection],
    feedback: &[f32; OPERATOR_COUNT],
) -> Vec<Connection> {
    let mut edges = connections.to_vec();
    for (i, &fb) in feedback.iter().enumerate() {
        if fb > 0.0 && !edges.iter().any(|c| c.src == i && c.dst == i) {
            edges.push(Connection::new(i, i));
        }
    }
    edges
}
