use crate::limits::EPSILON;
use crate::model::*;

// ── Candidate Domain Generator ───────────────────────────────────
//
// For each frame, the admissible (x, width) placements come from splitting
// the column into `i` equal slots for a curated range of `i`. Enumerating
// every split from 1 to the maximum blows up the search on wide columns, so
// the explored range is pruned toward fewer, wider columns.

/// First split to explore for a frame whose width hint fits `count` equal
/// columns.
fn start_split(count: usize) -> usize {
    match count {
        0 | 1 => 1,
        2..=6 => 2,
        7..=8 => count - 2,
        9 => count - 1,
        _ => count,
    }
}

/// Candidates for one frame, pre-sorted by descending width then ascending x
/// so the solver's trial order is deterministic.
pub fn candidates_for(column_width: f64, width_hint: f64) -> Vec<Candidate> {
    // The hint is an exact division of the column width, but float rounding
    // can push W / (W / k) fractionally below k.
    let count = ((column_width / width_hint + EPSILON).floor() as usize).max(1);

    let mut candidates = Vec::new();
    for split in start_split(count)..=count {
        let width = column_width / split as f64;
        for slot in 0..split {
            candidates.push(Candidate {
                x: slot as f64 * width,
                width,
            });
        }
    }
    candidates.sort_by(|a, b| b.width.total_cmp(&a.width).then(a.x.total_cmp(&b.x)));
    candidates.dedup();
    candidates
}

/// Per-frame domains, using each frame's pre-pass width as its hint.
pub fn generate(column_width: f64, frames: &[EventFrame]) -> Vec<Vec<Candidate>> {
    frames
        .iter()
        .map(|frame| candidates_for(column_width, frame.rect.width))
        .collect()
}
