use std::time::Instant;

use crate::model::*;

use super::CancelFlag;
use super::sweep::CollisionMatrix;

// ── Backtracking Solver ──────────────────────────────────────────
//
// Depth-first search over frames in sweep-completion order; one frame is one
// variable, its domain the pruned candidate set. Every candidate trial first
// checks the wall-clock deadline and the cancellation flag, so the search
// never runs more than one trial past either.

/// Terminal outcome of one search. `Exhausted` (the root ran out of
/// candidates) is handled identically to `TimedOut` by the caller: both fall
/// through to the backup tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved,
    TimedOut,
    Exhausted,
    Cancelled,
}

enum Step {
    Solved,
    Exhausted,
    Aborted(SearchOutcome),
}

struct Search<'a> {
    frames: &'a mut [EventFrame],
    domains: &'a [Vec<Candidate>],
    matrix: &'a CollisionMatrix,
    order: &'a [usize],
    deadline: Instant,
    cancel: &'a CancelFlag,
}

pub fn run(
    frames: &mut [EventFrame],
    domains: &[Vec<Candidate>],
    matrix: &CollisionMatrix,
    order: &[usize],
    deadline: Instant,
    cancel: &CancelFlag,
) -> SearchOutcome {
    let mut search = Search {
        frames,
        domains,
        matrix,
        order,
        deadline,
        cancel,
    };
    match search.descend(0) {
        Step::Solved => SearchOutcome::Solved,
        Step::Exhausted => SearchOutcome::Exhausted,
        Step::Aborted(outcome) => outcome,
    }
}

impl Search<'_> {
    fn descend(&mut self, depth: usize) -> Step {
        if depth == self.order.len() {
            return Step::Solved;
        }
        let frame = self.order[depth];

        // Domains are pre-sorted widest-then-leftmost by the generator, so
        // iteration order is the deterministic tie-break.
        for ci in 0..self.domains[frame].len() {
            if self.cancel.is_set() {
                return Step::Aborted(SearchOutcome::Cancelled);
            }
            if Instant::now() >= self.deadline {
                return Step::Aborted(SearchOutcome::TimedOut);
            }

            let candidate = self.domains[frame][ci];
            self.frames[frame].rect.x = candidate.x;
            self.frames[frame].rect.width = candidate.width;

            if self.consistent(depth, frame) {
                match self.descend(depth + 1) {
                    Step::Exhausted => continue,
                    step => return step,
                }
            }
        }
        Step::Exhausted
    }

    /// The frame's current rect is horizontally disjoint from every earlier
    /// assigned frame it collides with.
    fn consistent(&self, depth: usize, frame: usize) -> bool {
        let rect = self.frames[frame].rect;
        for &earlier in &self.order[..depth] {
            if self.matrix.collides(frame, earlier)
                && rect.overlaps_horizontally(&self.frames[earlier].rect)
            {
                return false;
            }
        }
        true
    }
}
